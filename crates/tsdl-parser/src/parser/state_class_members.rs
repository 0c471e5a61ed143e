//! Class declarations, expressions, and member parsing.

use crate::ast::{ClassData, FunctionData, ModifierFlags, NodeId, NodeKind, PropertyData};
use tsdl_scanner::SyntaxKind;

use super::ParserState;

impl ParserState<'_> {
    pub(crate) fn parse_class_like(
        &mut self,
        start: u32,
        decorators: Vec<NodeId>,
        modifiers: ModifierFlags,
        is_expression: bool,
    ) -> NodeId {
        self.expect(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() && !self.at(SyntaxKind::ImplementsKeyword) {
            self.parse_identifier()
        } else {
            NodeId::NONE
        };
        let type_parameters = self.skip_type_parameters();

        let mut extends = NodeId::NONE;
        let mut implements_clause = NodeId::NONE;
        if self.eat(SyntaxKind::ExtendsKeyword) {
            let estart = self.start();
            let expression = self.parse_left_hand_side_expression();
            let type_arguments = self.skip_type_parameters();
            extends = self.arena.alloc(
                self.finish_span(estart),
                NodeKind::ExpressionWithTypeArguments {
                    expression,
                    type_arguments,
                },
            );
        }
        if self.eat(SyntaxKind::ImplementsKeyword) {
            implements_clause = self.parse_implements_clause();
        }

        self.expect(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            let before = self.start();
            members.push(self.parse_class_member());
            if self.start() == before
                && !self.at(SyntaxKind::CloseBraceToken)
                && !self.at(SyntaxKind::EndOfFileToken)
            {
                self.next_token();
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);

        let data = Box::new(ClassData {
            modifiers,
            decorators,
            name,
            type_parameters,
            extends,
            implements_clause,
            members,
        });
        let kind = if is_expression {
            NodeKind::ClassExpression(data)
        } else {
            NodeKind::ClassDeclaration(data)
        };
        self.arena.alloc(self.finish_span(start), kind)
    }

    fn parse_class_member(&mut self) -> NodeId {
        let start = self.start();
        if self.at(SyntaxKind::SemicolonToken) {
            self.next_token();
            return self
                .arena
                .alloc(self.finish_span(start), NodeKind::SemicolonClassElement);
        }

        let decorators = self.parse_decorators();
        let modifiers = self.parse_member_modifiers();

        if self.at(SyntaxKind::OpenBraceToken) && modifiers.contains(ModifierFlags::STATIC) {
            let body = self.parse_block();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::ClassStaticBlockDeclaration { body },
            );
        }

        if self.at(SyntaxKind::OpenBracketToken) && self.is_index_signature_start() {
            self.skip_index_signature();
            return self
                .arena
                .alloc(self.finish_span(start), NodeKind::IndexSignature);
        }

        if (self.at(SyntaxKind::GetKeyword) || self.at(SyntaxKind::SetKeyword))
            && self.next_starts_member_name()
        {
            let is_get = self.at(SyntaxKind::GetKeyword);
            self.next_token();
            let name = self.parse_property_name();
            let parameters = self.parse_parameter_list();
            let return_type = self.parse_type_annotation_opt();
            let body = self.parse_member_body();
            let data = Box::new(FunctionData {
                modifiers,
                decorators,
                asterisk: false,
                name,
                question: false,
                type_parameters: NodeId::NONE,
                parameters,
                return_type,
                body,
                is_arrow_expression_body: false,
                parenthesized_parameters: true,
            });
            let kind = if is_get {
                NodeKind::GetAccessorDeclaration(data)
            } else {
                NodeKind::SetAccessorDeclaration(data)
            };
            return self.arena.alloc(self.finish_span(start), kind);
        }

        if self.at(SyntaxKind::Identifier)
            && self.scanner.token_text() == "constructor"
            && self.look_ahead(|p| {
                p.next_token();
                p.at(SyntaxKind::OpenParenToken) || p.at(SyntaxKind::LessThanToken)
            })
        {
            let name = self.parse_identifier();
            let type_parameters = self.skip_type_parameters();
            let parameters = self.parse_parameter_list();
            let return_type = self.parse_type_annotation_opt();
            let body = self.parse_member_body();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::ConstructorDeclaration(Box::new(FunctionData {
                    modifiers,
                    decorators,
                    asterisk: false,
                    name,
                    question: false,
                    type_parameters,
                    parameters,
                    return_type,
                    body,
                    is_arrow_expression_body: false,
                    parenthesized_parameters: true,
                })),
            );
        }

        let asterisk = self.eat(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name();
        let question = self.eat(SyntaxKind::QuestionToken);
        let exclamation = !question
            && self.at(SyntaxKind::ExclamationToken)
            && self.look_ahead(|p| {
                p.next_token();
                p.at(SyntaxKind::ColonToken)
            });
        if exclamation {
            self.next_token();
        }

        if self.at(SyntaxKind::OpenParenToken) || self.at(SyntaxKind::LessThanToken) {
            let type_parameters = self.skip_type_parameters();
            let parameters = self.parse_parameter_list();
            let return_type = self.parse_type_annotation_opt();
            let body = self.parse_member_body();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::MethodDeclaration(Box::new(FunctionData {
                    modifiers,
                    decorators,
                    asterisk,
                    name,
                    question,
                    type_parameters,
                    parameters,
                    return_type,
                    body,
                    is_arrow_expression_body: false,
                    parenthesized_parameters: true,
                })),
            );
        }

        let ty = self.parse_type_annotation_opt();
        let initializer = if self.eat(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeId::NONE
        };
        self.parse_semicolon();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::PropertyDeclaration(Box::new(PropertyData {
                modifiers,
                decorators,
                name,
                question,
                exclamation,
                ty,
                initializer,
            })),
        )
    }

    /// Block body, or none for overload signatures and abstract or
    /// ambient members.
    fn parse_member_body(&mut self) -> NodeId {
        if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            self.parse_semicolon();
            NodeId::NONE
        }
    }

    fn parse_member_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        loop {
            let (flag, require_same_line) = match self.token() {
                SyntaxKind::StaticKeyword => (ModifierFlags::STATIC, false),
                SyntaxKind::PublicKeyword => (ModifierFlags::PUBLIC, false),
                SyntaxKind::PrivateKeyword => (ModifierFlags::PRIVATE, false),
                SyntaxKind::ProtectedKeyword => (ModifierFlags::PROTECTED, false),
                SyntaxKind::ReadonlyKeyword => (ModifierFlags::READONLY, false),
                SyntaxKind::OverrideKeyword => (ModifierFlags::OVERRIDE, false),
                SyntaxKind::AbstractKeyword => (ModifierFlags::ABSTRACT, false),
                SyntaxKind::DeclareKeyword => (ModifierFlags::DECLARE, false),
                SyntaxKind::AccessorKeyword => (ModifierFlags::ACCESSOR, false),
                SyntaxKind::AsyncKeyword => (ModifierFlags::ASYNC, true),
                _ => break,
            };
            let is_modifier = self.look_ahead(|p| {
                p.next_token();
                if require_same_line && p.scanner.has_preceding_line_break() {
                    return false;
                }
                p.token() == SyntaxKind::Identifier
                    || p.token().is_keyword()
                    || matches!(
                        p.token(),
                        SyntaxKind::StringLiteral
                            | SyntaxKind::NumericLiteral
                            | SyntaxKind::OpenBracketToken
                            | SyntaxKind::AsteriskToken
                            | SyntaxKind::PrivateIdentifier
                            | SyntaxKind::OpenBraceToken
                    )
            });
            if !is_modifier {
                break;
            }
            flags |= flag;
            self.next_token();
        }
        flags
    }

    /// After `get`/`set`: does a member name follow, or is the keyword
    /// itself the member name (`get() {}`, `get = 1`)?
    pub(crate) fn next_starts_member_name(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.token() == SyntaxKind::Identifier
                || p.token().is_keyword()
                || matches!(
                    p.token(),
                    SyntaxKind::StringLiteral
                        | SyntaxKind::NumericLiteral
                        | SyntaxKind::OpenBracketToken
                        | SyntaxKind::PrivateIdentifier
                )
        })
    }

    fn is_index_signature_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if !p.is_identifier() {
                return false;
            }
            p.next_token();
            p.at(SyntaxKind::ColonToken)
        })
    }

    fn skip_index_signature(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBracketToken => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        break;
                    }
                }
                _ => {}
            }
            self.next_token();
        }
        self.parse_type_annotation_opt();
        self.parse_semicolon();
    }

    pub(crate) fn parse_property_name(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral => {
                let span = self.token_span();
                let raw = self.scanner.token_text().to_string();
                self.next_token();
                self.arena.alloc(span, NodeKind::NumericLiteral { raw })
            }
            SyntaxKind::PrivateIdentifier => {
                let span = self.token_span();
                let text = self.scanner.token_text().to_string();
                self.next_token();
                self.arena.alloc(span, NodeKind::PrivateIdentifier { text })
            }
            SyntaxKind::OpenBracketToken => {
                let start = self.start();
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.expect(SyntaxKind::CloseBracketToken);
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::ComputedPropertyName { expression },
                )
            }
            _ => self.parse_identifier_name(),
        }
    }
}
