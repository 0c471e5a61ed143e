//! Expression parsing: precedence climbing for binary operators, member
//! and call chains, literals, arrows, and the speculative parses that
//! separate arrows from parenthesized expressions and type arguments
//! from comparisons.

use crate::ast::{CallData, FunctionData, ModifierFlags, NodeId, NodeKind, ParameterData};
use tsdl_common::diagnostics::codes;
use tsdl_scanner::SyntaxKind;

use super::ParserState;

impl ParserState<'_> {
    /// Full expression including comma sequences.
    pub(crate) fn parse_expression(&mut self) -> NodeId {
        let start = self.start();
        let mut expression = self.parse_assignment_expression();
        while self.at(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression();
            expression = self.arena.alloc(
                self.finish_span(start),
                NodeKind::BinaryExpression {
                    left: expression,
                    operator: SyntaxKind::CommaToken,
                    right,
                },
            );
        }
        expression
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeId {
        if self.at(SyntaxKind::YieldKeyword) && self.in_yield_position() {
            return self.parse_yield_expression();
        }
        if self.at(SyntaxKind::AsyncKeyword) {
            if let Some(arrow) = self.try_parse(|p| p.parse_async_arrow()) {
                return arrow;
            }
        }
        if self.is_identifier()
            && self.look_ahead(|p| {
                p.next_token();
                p.at(SyntaxKind::EqualsGreaterThanToken)
            })
        {
            return self.parse_simple_arrow(ModifierFlags::empty());
        }
        if self.at(SyntaxKind::OpenParenToken) || self.at(SyntaxKind::LessThanToken) {
            if let Some(arrow) = self.try_parse(|p| {
                let start = p.start();
                p.parse_parenthesized_arrow(start, ModifierFlags::empty())
            }) {
                return arrow;
            }
        }

        let start = self.start();
        let expression = self.parse_binary_expression(1);
        if self.token().is_assignment_operator() {
            let operator = self.token();
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::BinaryExpression {
                    left: expression,
                    operator,
                    right,
                },
            );
        }
        self.parse_conditional_rest(start, expression)
    }

    fn in_yield_position(&mut self) -> bool {
        // `yield` in expression position; a same-line expression or `*`
        // or a statement terminator all mean a yield expression.
        self.look_ahead(|p| {
            p.next_token();
            if p.scanner.has_preceding_line_break() {
                return true;
            }
            p.at(SyntaxKind::AsteriskToken)
                || p.is_start_of_expression()
                || matches!(
                    p.token(),
                    SyntaxKind::SemicolonToken
                        | SyntaxKind::CloseBraceToken
                        | SyntaxKind::CloseParenToken
                        | SyntaxKind::CloseBracketToken
                        | SyntaxKind::CommaToken
                        | SyntaxKind::EndOfFileToken
                )
        })
    }

    fn parse_yield_expression(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        let (asterisk, expression) = if self.scanner.has_preceding_line_break() {
            (false, NodeId::NONE)
        } else {
            let asterisk = self.eat(SyntaxKind::AsteriskToken);
            if asterisk || self.is_start_of_expression() {
                (asterisk, self.parse_assignment_expression())
            } else {
                (false, NodeId::NONE)
            }
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::YieldExpression { asterisk, expression },
        )
    }

    fn parse_conditional_rest(&mut self, start: u32, condition: NodeId) -> NodeId {
        if !self.eat(SyntaxKind::QuestionToken) {
            return condition;
        }
        let when_true = self.parse_assignment_expression();
        self.expect(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ConditionalExpression {
                condition,
                when_true,
                when_false,
            },
        )
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeId {
        let start = self.start();
        let mut left = self.parse_unary_expression();
        loop {
            let operator = self.token();
            if operator == SyntaxKind::InKeyword && self.in_disallowed {
                break;
            }
            let Some(precedence) = operator.binary_precedence() else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            if operator == SyntaxKind::AsKeyword || operator == SyntaxKind::SatisfiesKeyword {
                // `x as const` and friends; the expression survives, the
                // type is erased.
                if self.scanner.has_preceding_line_break() {
                    break;
                }
                self.next_token();
                let ty = self.parse_type();
                let kind = if operator == SyntaxKind::AsKeyword {
                    NodeKind::AsExpression {
                        expression: left,
                        ty,
                    }
                } else {
                    NodeKind::SatisfiesExpression {
                        expression: left,
                        ty,
                    }
                };
                left = self.arena.alloc(self.finish_span(start), kind);
                continue;
            }
            self.next_token();
            // `**` is right associative.
            let next_min = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary_expression(next_min);
            left = self.arena.alloc(
                self.finish_span(start),
                NodeKind::BinaryExpression {
                    left,
                    operator,
                    right,
                },
            );
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeId {
        let start = self.start();
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token();
                self.next_token();
                let operand = self.parse_unary_expression();
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::PrefixUnaryExpression { operator, operand },
                )
            }
            SyntaxKind::DeleteKeyword => {
                self.next_token();
                let expression = self.parse_unary_expression();
                self.arena
                    .alloc(self.finish_span(start), NodeKind::DeleteExpression { expression })
            }
            SyntaxKind::TypeOfKeyword => {
                self.next_token();
                let expression = self.parse_unary_expression();
                self.arena
                    .alloc(self.finish_span(start), NodeKind::TypeOfExpression { expression })
            }
            SyntaxKind::VoidKeyword => {
                self.next_token();
                let expression = self.parse_unary_expression();
                self.arena
                    .alloc(self.finish_span(start), NodeKind::VoidExpression { expression })
            }
            SyntaxKind::AwaitKeyword if self.await_starts_expression() => {
                self.next_token();
                let expression = self.parse_unary_expression();
                self.arena
                    .alloc(self.finish_span(start), NodeKind::AwaitExpression { expression })
            }
            SyntaxKind::LessThanToken if !self.jsx_enabled => {
                // Angle-bracket type assertion `<T>expr`.
                self.next_token();
                let ty = self.parse_type();
                self.expect(SyntaxKind::GreaterThanToken);
                let expression = self.parse_unary_expression();
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::TypeAssertionExpression { ty, expression },
                )
            }
            SyntaxKind::LessThanToken => self.parse_jsx_element_or_fragment(),
            _ => self.parse_postfix_expression(),
        }
    }

    fn await_starts_expression(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.scanner.has_preceding_line_break() && p.is_start_of_expression()
        })
    }

    fn parse_postfix_expression(&mut self) -> NodeId {
        let start = self.start();
        let operand = self.parse_left_hand_side_expression();
        if (self.at(SyntaxKind::PlusPlusToken) || self.at(SyntaxKind::MinusMinusToken))
            && !self.scanner.has_preceding_line_break()
        {
            let operator = self.token();
            self.next_token();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::PostfixUnaryExpression { operand, operator },
            );
        }
        operand
    }

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeId {
        let start = self.start();
        let expression = if self.at(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_call_chain_rest(start, expression, true)
    }

    fn parse_call_chain_rest(&mut self, start: u32, mut expression: NodeId, allow_call: bool) -> NodeId {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier_name();
                    expression = self.arena.alloc(
                        self.finish_span(start),
                        NodeKind::PropertyAccessExpression {
                            expression,
                            question_dot: false,
                            name,
                        },
                    );
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken if allow_call => {
                            let arguments = self.parse_arguments();
                            self.arena.alloc(
                                self.finish_span(start),
                                NodeKind::CallExpression(Box::new(CallData {
                                    expression,
                                    question_dot: true,
                                    type_arguments: NodeId::NONE,
                                    arguments,
                                    has_arguments: true,
                                })),
                            )
                        }
                        SyntaxKind::OpenBracketToken => {
                            self.next_token();
                            let argument = self.parse_expression();
                            self.expect(SyntaxKind::CloseBracketToken);
                            self.arena.alloc(
                                self.finish_span(start),
                                NodeKind::ElementAccessExpression {
                                    expression,
                                    question_dot: true,
                                    argument,
                                },
                            )
                        }
                        _ => {
                            let name = self.parse_identifier_name();
                            self.arena.alloc(
                                self.finish_span(start),
                                NodeKind::PropertyAccessExpression {
                                    expression,
                                    question_dot: true,
                                    name,
                                },
                            )
                        }
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let argument = self.parse_expression();
                    self.expect(SyntaxKind::CloseBracketToken);
                    expression = self.arena.alloc(
                        self.finish_span(start),
                        NodeKind::ElementAccessExpression {
                            expression,
                            question_dot: false,
                            argument,
                        },
                    );
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let arguments = self.parse_arguments();
                    expression = self.arena.alloc(
                        self.finish_span(start),
                        NodeKind::CallExpression(Box::new(CallData {
                            expression,
                            question_dot: false,
                            type_arguments: NodeId::NONE,
                            arguments,
                            has_arguments: true,
                        })),
                    );
                }
                SyntaxKind::ExclamationToken if !self.scanner.has_preceding_line_break() => {
                    self.next_token();
                    expression = self.arena.alloc(
                        self.finish_span(start),
                        NodeKind::NonNullExpression { expression },
                    );
                }
                SyntaxKind::TemplateHead | SyntaxKind::NoSubstitutionTemplateLiteral => {
                    let template = self.parse_template_literal();
                    expression = self.arena.alloc(
                        self.finish_span(start),
                        NodeKind::TaggedTemplateExpression {
                            tag: expression,
                            template,
                        },
                    );
                }
                SyntaxKind::LessThanToken if allow_call => {
                    // `f<T>(...)`: only a following argument list or
                    // template commits to type arguments.
                    let Some(type_arguments) = self.try_parse(|p| {
                        let ta = p.skip_type_parameters();
                        if ta.is_none() {
                            return None;
                        }
                        match p.token() {
                            SyntaxKind::OpenParenToken
                            | SyntaxKind::TemplateHead
                            | SyntaxKind::NoSubstitutionTemplateLiteral => Some(ta),
                            _ => None,
                        }
                    }) else {
                        break;
                    };
                    if self.at(SyntaxKind::OpenParenToken) {
                        let arguments = self.parse_arguments();
                        expression = self.arena.alloc(
                            self.finish_span(start),
                            NodeKind::CallExpression(Box::new(CallData {
                                expression,
                                question_dot: false,
                                type_arguments,
                                arguments,
                                has_arguments: true,
                            })),
                        );
                    } else {
                        let template = self.parse_template_literal();
                        expression = self.arena.alloc(
                            self.finish_span(start),
                            NodeKind::TaggedTemplateExpression {
                                tag: expression,
                                template,
                            },
                        );
                    }
                }
                _ => break,
            }
        }
        expression
    }

    pub(crate) fn parse_arguments(&mut self) -> Vec<NodeId> {
        self.expect(SyntaxKind::OpenParenToken);
        let saved = self.in_disallowed;
        self.in_disallowed = false;
        let mut arguments = Vec::new();
        while !self.at(SyntaxKind::CloseParenToken) && !self.at(SyntaxKind::EndOfFileToken) {
            if self.at(SyntaxKind::DotDotDotToken) {
                let start = self.start();
                self.next_token();
                let expression = self.parse_assignment_expression();
                arguments.push(
                    self.arena
                        .alloc(self.finish_span(start), NodeKind::SpreadElement { expression }),
                );
            } else {
                arguments.push(self.parse_assignment_expression());
            }
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.in_disallowed = saved;
        self.expect(SyntaxKind::CloseParenToken);
        arguments
    }

    fn parse_new_expression(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        if self.eat(SyntaxKind::DotToken) {
            // new.target
            let name = if self.token().is_identifier_like() {
                let text = self.scanner.token_text().to_string();
                self.next_token();
                text
            } else {
                self.error_at_current("Identifier expected.", codes::IDENTIFIER_EXPECTED);
                String::new()
            };
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::MetaProperty {
                    keyword: String::from("new"),
                    name,
                },
            );
        }
        let cstart = self.start();
        let callee = if self.at(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = self.parse_call_chain_rest(cstart, callee, false);
        let type_arguments = if self.at(SyntaxKind::LessThanToken) {
            self.try_parse(|p| {
                let ta = p.skip_type_parameters();
                if ta.is_some() && p.at(SyntaxKind::OpenParenToken) {
                    Some(ta)
                } else {
                    None
                }
            })
            .unwrap_or(NodeId::NONE)
        } else {
            NodeId::NONE
        };
        let (arguments, has_arguments) = if self.at(SyntaxKind::OpenParenToken) {
            (self.parse_arguments(), true)
        } else {
            (Vec::new(), false)
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::NewExpression(Box::new(CallData {
                expression: callee,
                question_dot: false,
                type_arguments,
                arguments,
                has_arguments,
            })),
        )
    }

    fn parse_primary_expression(&mut self) -> NodeId {
        let start = self.start();
        match self.token() {
            SyntaxKind::NumericLiteral => {
                let raw = self.scanner.token_text().to_string();
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::NumericLiteral { raw })
            }
            SyntaxKind::BigIntLiteral => {
                let raw = self.scanner.token_text().to_string();
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::BigIntLiteral { raw })
            }
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_literal()
            }
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.scanner.rescan_slash_as_regex();
                let raw = self.scanner.token_text().to_string();
                let span = self.token_span();
                self.next_token();
                self.arena
                    .alloc(span, NodeKind::RegularExpressionLiteral { raw })
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.at(SyntaxKind::TrueKeyword);
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::BooleanLiteral { value })
            }
            SyntaxKind::NullKeyword => {
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::NullLiteral)
            }
            SyntaxKind::ThisKeyword => {
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::ThisExpression)
            }
            SyntaxKind::SuperKeyword => {
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::SuperExpression)
            }
            SyntaxKind::PrivateIdentifier => {
                // `#field in obj`
                let text = self.scanner.token_text().to_string();
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::PrivateIdentifier { text })
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let saved = self.in_disallowed;
                self.in_disallowed = false;
                let expression = self.parse_expression();
                self.in_disallowed = saved;
                self.expect(SyntaxKind::CloseParenToken);
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::ParenthesizedExpression { expression },
                )
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(ModifierFlags::empty()),
            SyntaxKind::AsyncKeyword
                if self.look_ahead(|p| {
                    p.next_token();
                    !p.scanner.has_preceding_line_break() && p.at(SyntaxKind::FunctionKeyword)
                }) =>
            {
                self.next_token();
                self.parse_function_expression(ModifierFlags::ASYNC)
            }
            SyntaxKind::ClassKeyword => {
                self.parse_class_like(start, Vec::new(), ModifierFlags::empty(), true)
            }
            SyntaxKind::NewKeyword => self.parse_new_expression(),
            SyntaxKind::ImportKeyword => self.parse_import_expression(),
            SyntaxKind::LessThanToken if self.jsx_enabled => self.parse_jsx_element_or_fragment(),
            t if t.is_identifier_like() => {
                let text = self.scanner.token_text().to_string();
                let span = self.token_span();
                self.next_token();
                self.arena.alloc(span, NodeKind::Identifier { text })
            }
            _ => {
                self.error_at_current("Expression expected.", codes::EXPRESSION_EXPECTED);
                let pos = self.start();
                self.arena.alloc(
                    tsdl_common::Span::new(pos, pos),
                    NodeKind::Identifier {
                        text: String::new(),
                    },
                )
            }
        }
    }

    /// `import(...)` or `import.meta` in expression position.
    fn parse_import_expression(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        if self.eat(SyntaxKind::DotToken) {
            let name = if self.token().is_identifier_like() {
                let text = self.scanner.token_text().to_string();
                self.next_token();
                text
            } else {
                self.error_at_current("Identifier expected.", codes::IDENTIFIER_EXPECTED);
                String::new()
            };
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::MetaProperty {
                    keyword: String::from("import"),
                    name,
                },
            );
        }
        let arguments = self.parse_arguments();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ImportCallExpression { arguments },
        )
    }

    pub(crate) fn parse_template_literal(&mut self) -> NodeId {
        let start = self.start();
        if self.at(SyntaxKind::NoSubstitutionTemplateLiteral) {
            let raw = self.scanner.token_text().to_string();
            let span = self.token_span();
            self.next_token();
            return self
                .arena
                .alloc(span, NodeKind::NoSubstitutionTemplateLiteral { raw });
        }
        let head_raw = self.scanner.token_text().to_string();
        self.next_token();
        let mut spans = Vec::new();
        loop {
            let sstart = self.start();
            let expression = self.parse_expression();
            if !self.at(SyntaxKind::CloseBraceToken) {
                self.error_at_current("'}' expected.", codes::TOKEN_EXPECTED);
                break;
            }
            let continuation = self.scanner.rescan_template_continuation();
            let literal_raw = self.scanner.token_text().to_string();
            self.next_token();
            spans.push(self.arena.alloc(
                self.finish_span(sstart),
                NodeKind::TemplateSpan {
                    expression,
                    literal_raw,
                },
            ));
            if continuation != SyntaxKind::TemplateMiddle {
                break;
            }
        }
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::TemplateExpression { head_raw, spans },
        )
    }

    fn parse_array_literal(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBracketToken);
        let saved = self.in_disallowed;
        self.in_disallowed = false;
        let mut elements = Vec::new();
        loop {
            if self.at(SyntaxKind::CloseBracketToken) || self.at(SyntaxKind::EndOfFileToken) {
                break;
            }
            if self.at(SyntaxKind::CommaToken) {
                let pos = self.start();
                elements.push(
                    self.arena
                        .alloc(tsdl_common::Span::new(pos, pos), NodeKind::OmittedExpression),
                );
                self.next_token();
                continue;
            }
            if self.at(SyntaxKind::DotDotDotToken) {
                let estart = self.start();
                self.next_token();
                let expression = self.parse_assignment_expression();
                elements.push(
                    self.arena
                        .alloc(self.finish_span(estart), NodeKind::SpreadElement { expression }),
                );
            } else {
                elements.push(self.parse_assignment_expression());
            }
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.in_disallowed = saved;
        self.expect(SyntaxKind::CloseBracketToken);
        let span = self.finish_span(start);
        let multiline = self.span_has_line_break(span);
        self.arena
            .alloc(span, NodeKind::ArrayLiteralExpression { elements, multiline })
    }

    fn parse_object_literal(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken);
        let saved = self.in_disallowed;
        self.in_disallowed = false;
        let mut properties = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            properties.push(self.parse_object_literal_member());
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.in_disallowed = saved;
        self.expect(SyntaxKind::CloseBraceToken);
        let span = self.finish_span(start);
        let multiline = self.span_has_line_break(span);
        self.arena.alloc(
            span,
            NodeKind::ObjectLiteralExpression {
                properties,
                multiline,
            },
        )
    }

    fn parse_object_literal_member(&mut self) -> NodeId {
        let start = self.start();
        if self.at(SyntaxKind::DotDotDotToken) {
            self.next_token();
            let expression = self.parse_assignment_expression();
            return self
                .arena
                .alloc(self.finish_span(start), NodeKind::SpreadAssignment { expression });
        }

        if (self.at(SyntaxKind::GetKeyword) || self.at(SyntaxKind::SetKeyword))
            && self.next_starts_member_name()
        {
            let is_get = self.at(SyntaxKind::GetKeyword);
            self.next_token();
            let name = self.parse_property_name();
            let parameters = self.parse_parameter_list();
            let return_type = self.parse_type_annotation_opt();
            let body = self.parse_block();
            let data = Box::new(FunctionData {
                modifiers: ModifierFlags::empty(),
                decorators: Vec::new(),
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

        let mut modifiers = ModifierFlags::empty();
        if self.at(SyntaxKind::AsyncKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                !p.scanner.has_preceding_line_break()
                    && (p.at(SyntaxKind::AsteriskToken)
                        || p.token() == SyntaxKind::Identifier
                        || p.token().is_keyword()
                        || matches!(
                            p.token(),
                            SyntaxKind::StringLiteral
                                | SyntaxKind::NumericLiteral
                                | SyntaxKind::OpenBracketToken
                        ))
            })
        {
            modifiers |= ModifierFlags::ASYNC;
            self.next_token();
        }
        let asterisk = self.eat(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name();

        if self.at(SyntaxKind::OpenParenToken) || self.at(SyntaxKind::LessThanToken) {
            let type_parameters = self.skip_type_parameters();
            let parameters = self.parse_parameter_list();
            let return_type = self.parse_type_annotation_opt();
            let body = self.parse_block();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::MethodDeclaration(Box::new(FunctionData {
                    modifiers,
                    decorators: Vec::new(),
                    asterisk,
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

        if self.eat(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::PropertyAssignment { name, initializer },
            );
        }
        let initializer = if self.eat(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeId::NONE
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ShorthandPropertyAssignment { name, initializer },
        )
    }

    fn parse_function_expression(&mut self, modifiers: ModifierFlags) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::FunctionKeyword);
        let asterisk = self.eat(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            NodeId::NONE
        };
        let type_parameters = self.skip_type_parameters();
        let parameters = self.parse_parameter_list();
        let return_type = self.parse_type_annotation_opt();
        let body = self.parse_block();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::FunctionExpression(Box::new(FunctionData {
                modifiers,
                decorators: Vec::new(),
                asterisk,
                name,
                question: false,
                type_parameters,
                parameters,
                return_type,
                body,
                is_arrow_expression_body: false,
                parenthesized_parameters: true,
            })),
        )
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    fn parse_async_arrow(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.next_token();
        if self.scanner.has_preceding_line_break() {
            return None;
        }
        if self.is_identifier()
            && self.look_ahead(|p| {
                p.next_token();
                p.at(SyntaxKind::EqualsGreaterThanToken)
            })
        {
            return Some(self.parse_simple_arrow_at(start, ModifierFlags::ASYNC));
        }
        if self.at(SyntaxKind::OpenParenToken) || self.at(SyntaxKind::LessThanToken) {
            return self.parse_parenthesized_arrow(start, ModifierFlags::ASYNC);
        }
        None
    }

    fn parse_simple_arrow(&mut self, modifiers: ModifierFlags) -> NodeId {
        let start = self.start();
        self.parse_simple_arrow_at(start, modifiers)
    }

    /// `x => body`: the parameter is a bare identifier.
    fn parse_simple_arrow_at(&mut self, start: u32, modifiers: ModifierFlags) -> NodeId {
        let pstart = self.start();
        let name = self.parse_identifier();
        let parameter = self.arena.alloc(
            self.finish_span(pstart),
            NodeKind::Parameter(Box::new(ParameterData {
                modifiers: ModifierFlags::empty(),
                decorators: Vec::new(),
                dot_dot_dot: false,
                name,
                question: false,
                ty: NodeId::NONE,
                initializer: NodeId::NONE,
            })),
        );
        self.finish_arrow(start, modifiers, NodeId::NONE, vec![parameter], NodeId::NONE, false)
    }

    /// `(params): T => body`. Returns None when the tokens do not form an
    /// arrow head; the caller rewinds.
    fn parse_parenthesized_arrow(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
    ) -> Option<NodeId> {
        let type_parameters = if self.at(SyntaxKind::LessThanToken) {
            let tp = self.skip_type_parameters();
            if tp.is_none() {
                return None;
            }
            tp
        } else {
            NodeId::NONE
        };
        if !self.at(SyntaxKind::OpenParenToken) {
            return None;
        }
        let parameters = self.parse_parameter_list();
        let return_type = if self.eat(SyntaxKind::ColonToken) {
            self.parse_arrow_return_type()
        } else {
            NodeId::NONE
        };
        if !self.at(SyntaxKind::EqualsGreaterThanToken) {
            return None;
        }
        Some(self.finish_arrow(start, modifiers, type_parameters, parameters, return_type, true))
    }

    fn finish_arrow(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        type_parameters: NodeId,
        parameters: Vec<NodeId>,
        return_type: NodeId,
        parenthesized_parameters: bool,
    ) -> NodeId {
        self.expect(SyntaxKind::EqualsGreaterThanToken);
        let (body, is_expression_body) = if self.at(SyntaxKind::OpenBraceToken) {
            (self.parse_block(), false)
        } else {
            (self.parse_assignment_expression(), true)
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ArrowFunction(Box::new(FunctionData {
                modifiers,
                decorators: Vec::new(),
                asterisk: false,
                name: NodeId::NONE,
                question: false,
                type_parameters,
                parameters,
                return_type,
                body,
                is_arrow_expression_body: is_expression_body,
                parenthesized_parameters,
            })),
        )
    }

    /// Whether the current token can begin an expression.
    pub(crate) fn is_start_of_expression(&self) -> bool {
        let token = self.token();
        token.is_identifier_like()
            || matches!(
                token,
                SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::NoSubstitutionTemplateLiteral
                    | SyntaxKind::TemplateHead
                    | SyntaxKind::RegularExpressionLiteral
                    | SyntaxKind::SlashToken
                    | SyntaxKind::SlashEqualsToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::FunctionKeyword
                    | SyntaxKind::ClassKeyword
                    | SyntaxKind::NewKeyword
                    | SyntaxKind::ThisKeyword
                    | SyntaxKind::SuperKeyword
                    | SyntaxKind::NullKeyword
                    | SyntaxKind::TrueKeyword
                    | SyntaxKind::FalseKeyword
                    | SyntaxKind::ImportKeyword
                    | SyntaxKind::TypeOfKeyword
                    | SyntaxKind::VoidKeyword
                    | SyntaxKind::DeleteKeyword
                    | SyntaxKind::PlusToken
                    | SyntaxKind::MinusToken
                    | SyntaxKind::TildeToken
                    | SyntaxKind::ExclamationToken
                    | SyntaxKind::PlusPlusToken
                    | SyntaxKind::MinusMinusToken
                    | SyntaxKind::LessThanToken
                    | SyntaxKind::PrivateIdentifier
            )
    }
}
