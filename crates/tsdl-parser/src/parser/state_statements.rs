//! Statement and declaration parsing.

use crate::ast::{
    EnumData, ExportData, ImportData, ImportEqualsData, ModifierFlags, ModuleData, NodeId,
    NodeKind, VarFlavor,
};
use tsdl_common::diagnostics::codes;
use tsdl_scanner::SyntaxKind;

use super::ParserState;

impl ParserState<'_> {
    /// Parse statements until `end` (or end of file). Recovery is
    /// positional: if a statement consumes nothing, the offending token
    /// is skipped so the loop always makes progress.
    pub(crate) fn parse_statement_list_until(&mut self, end: SyntaxKind) -> Vec<NodeId> {
        let mut statements = Vec::new();
        while !self.at(end) && !self.at(SyntaxKind::EndOfFileToken) {
            let before = self.start();
            if end == SyntaxKind::EndOfFileToken && self.at(SyntaxKind::CloseBraceToken) {
                self.error_at_current(
                    "Declaration or statement expected.",
                    codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.next_token();
                continue;
            }
            let stmt = self.parse_statement();
            if stmt.is_some() {
                statements.push(stmt);
            }
            if self.start() == before && !self.at(end) && !self.at(SyntaxKind::EndOfFileToken) {
                tracing::trace!(pos = before, "skipping token to resynchronize");
                self.next_token();
            }
        }
        statements
    }

    pub(crate) fn parse_statement(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let start = self.start();
                self.next_token();
                self.arena
                    .alloc(self.finish_span(start), NodeKind::EmptyStatement)
            }
            SyntaxKind::VarKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::AtToken => self.parse_declaration(),
            SyntaxKind::LetKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    p.is_identifier()
                        || p.at(SyntaxKind::OpenBracketToken)
                        || p.at(SyntaxKind::OpenBraceToken)
                }) {
                    self.parse_declaration()
                } else {
                    self.parse_expression_statement()
                }
            }
            SyntaxKind::ExportKeyword => self.parse_export_statement(),
            SyntaxKind::ImportKeyword => {
                // `import(...)` and `import.meta` are expressions.
                if self.look_ahead(|p| {
                    p.next_token();
                    p.at(SyntaxKind::OpenParenToken) || p.at(SyntaxKind::DotToken)
                }) {
                    self.parse_expression_statement()
                } else {
                    self.parse_import_declaration()
                }
            }
            SyntaxKind::InterfaceKeyword | SyntaxKind::TypeKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    !p.scanner.has_preceding_line_break() && p.is_identifier()
                }) {
                    self.parse_declaration()
                } else {
                    self.parse_expression_statement()
                }
            }
            SyntaxKind::NamespaceKeyword | SyntaxKind::ModuleKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    !p.scanner.has_preceding_line_break()
                        && (p.is_identifier() || p.at(SyntaxKind::StringLiteral))
                }) {
                    self.parse_declaration()
                } else {
                    self.parse_expression_statement()
                }
            }
            SyntaxKind::DeclareKeyword => {
                if self.declare_starts_declaration() {
                    self.parse_declaration()
                } else {
                    self.parse_expression_statement()
                }
            }
            SyntaxKind::AbstractKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    p.at(SyntaxKind::ClassKeyword)
                }) {
                    self.parse_declaration()
                } else {
                    self.parse_expression_statement()
                }
            }
            SyntaxKind::AsyncKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    !p.scanner.has_preceding_line_break() && p.at(SyntaxKind::FunctionKeyword)
                }) {
                    self.parse_declaration()
                } else {
                    self.parse_expression_statement()
                }
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ContinueKeyword => self.parse_break_or_continue(false),
            SyntaxKind::BreakKeyword => self.parse_break_or_continue(true),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                let start = self.start();
                self.next_token();
                self.parse_semicolon();
                self.arena
                    .alloc(self.finish_span(start), NodeKind::DebuggerStatement)
            }
            _ => self.parse_expression_statement(),
        }
    }

    pub(crate) fn parse_block(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list_until(SyntaxKind::CloseBraceToken);
        self.expect(SyntaxKind::CloseBraceToken);
        let span = self.finish_span(start);
        let multiline = self.span_has_line_break(span);
        self.arena
            .alloc(span, NodeKind::Block { statements, multiline })
    }

    pub(crate) fn span_has_line_break(&self, span: tsdl_common::Span) -> bool {
        let source = self.scanner.source();
        let start = (span.start as usize).min(source.len());
        let end = (span.end as usize).min(source.len());
        source[start..end].contains('\n')
    }

    // =========================================================================
    // Declarations and modifiers
    // =========================================================================

    fn parse_declaration(&mut self) -> NodeId {
        let start = self.start();
        let decorators = self.parse_decorators();
        let modifiers = self.parse_statement_modifiers();
        self.parse_declaration_core(start, decorators, modifiers)
    }

    pub(crate) fn parse_decorators(&mut self) -> Vec<NodeId> {
        let mut decorators = Vec::new();
        while self.at(SyntaxKind::AtToken) {
            let start = self.start();
            self.next_token();
            let expression = self.parse_left_hand_side_expression();
            decorators.push(
                self.arena
                    .alloc(self.finish_span(start), NodeKind::Decorator { expression }),
            );
        }
        decorators
    }

    fn parse_statement_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        loop {
            let flag = match self.token() {
                SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
                SyntaxKind::DefaultKeyword if flags.is_exported() => ModifierFlags::DEFAULT,
                SyntaxKind::DeclareKeyword if self.declare_starts_declaration() => {
                    ModifierFlags::DECLARE
                }
                SyntaxKind::AbstractKeyword
                    if self.look_ahead(|p| {
                        p.next_token();
                        p.at(SyntaxKind::ClassKeyword)
                    }) =>
                {
                    ModifierFlags::ABSTRACT
                }
                SyntaxKind::AsyncKeyword
                    if self.look_ahead(|p| {
                        p.next_token();
                        !p.scanner.has_preceding_line_break()
                            && p.at(SyntaxKind::FunctionKeyword)
                    }) =>
                {
                    ModifierFlags::ASYNC
                }
                _ => break,
            };
            flags |= flag;
            self.next_token();
        }
        flags
    }

    fn declare_starts_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.scanner.has_preceding_line_break() {
                return false;
            }
            matches!(
                p.token(),
                SyntaxKind::VarKeyword
                    | SyntaxKind::LetKeyword
                    | SyntaxKind::ConstKeyword
                    | SyntaxKind::FunctionKeyword
                    | SyntaxKind::ClassKeyword
                    | SyntaxKind::EnumKeyword
                    | SyntaxKind::InterfaceKeyword
                    | SyntaxKind::TypeKeyword
                    | SyntaxKind::NamespaceKeyword
                    | SyntaxKind::ModuleKeyword
                    | SyntaxKind::AbstractKeyword
                    | SyntaxKind::AsyncKeyword
            ) || (p.at(SyntaxKind::Identifier) && p.scanner.token_text() == "global")
        })
    }

    pub(crate) fn parse_declaration_core(
        &mut self,
        start: u32,
        decorators: Vec<NodeId>,
        modifiers: ModifierFlags,
    ) -> NodeId {
        match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword => {
                self.parse_variable_statement(start, modifiers)
            }
            SyntaxKind::ConstKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    p.at(SyntaxKind::EnumKeyword)
                }) {
                    self.next_token();
                    self.parse_enum_declaration(start, modifiers, true)
                } else {
                    self.parse_variable_statement(start, modifiers)
                }
            }
            SyntaxKind::FunctionKeyword => {
                self.parse_function_declaration(start, decorators, modifiers)
            }
            SyntaxKind::ClassKeyword => self.parse_class_like(start, decorators, modifiers, false),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start, modifiers, false),
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(start, modifiers),
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration(start, modifiers),
            SyntaxKind::NamespaceKeyword => {
                self.next_token();
                self.parse_module_declaration(start, modifiers, true)
            }
            SyntaxKind::ModuleKeyword => {
                self.next_token();
                self.parse_module_declaration(start, modifiers, false)
            }
            SyntaxKind::Identifier if self.scanner.token_text() == "global" => {
                self.parse_module_declaration(start, modifiers, false)
            }
            _ => {
                self.error_at_current(
                    "Declaration or statement expected.",
                    codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.parse_expression_statement()
            }
        }
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self, start: u32, modifiers: ModifierFlags) -> NodeId {
        let declarations = self.parse_variable_declaration_list(false);
        self.parse_semicolon();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::VariableStatement {
                modifiers,
                declarations,
            },
        )
    }

    pub(crate) fn parse_variable_declaration_list(&mut self, in_for_head: bool) -> NodeId {
        let start = self.start();
        let flavor = match self.token() {
            SyntaxKind::LetKeyword => VarFlavor::Let,
            SyntaxKind::ConstKeyword => VarFlavor::Const,
            _ => VarFlavor::Var,
        };
        self.next_token();
        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declaration());
            if in_for_head && (self.at(SyntaxKind::InKeyword) || self.at(SyntaxKind::OfKeyword)) {
                break;
            }
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::VariableDeclarationList {
                flavor,
                declarations,
            },
        )
    }

    fn parse_variable_declaration(&mut self) -> NodeId {
        let start = self.start();
        let name = self.parse_binding_name();
        // Definite assignment: `let x!: T;`
        let exclamation = self.at(SyntaxKind::ExclamationToken)
            && self.look_ahead(|p| {
                p.next_token();
                p.at(SyntaxKind::ColonToken)
            });
        if exclamation {
            self.next_token();
        }
        let ty = self.parse_type_annotation_opt();
        let initializer = if self.eat(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeId::NONE
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::VariableDeclaration {
                name,
                exclamation,
                ty,
                initializer,
            },
        )
    }

    pub(crate) fn parse_binding_name(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            elements.push(self.parse_object_binding_element());
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ObjectBindingPattern { elements },
        )
    }

    fn parse_object_binding_element(&mut self) -> NodeId {
        let start = self.start();
        let dot_dot_dot = self.eat(SyntaxKind::DotDotDotToken);
        let mut property_name = NodeId::NONE;
        let name;
        if self.at(SyntaxKind::StringLiteral)
            || self.at(SyntaxKind::NumericLiteral)
            || self.at(SyntaxKind::OpenBracketToken)
        {
            // `{ "a-b": local }` and computed keys always rename.
            property_name = self.parse_property_name();
            self.expect(SyntaxKind::ColonToken);
            name = self.parse_binding_name();
        } else {
            let first = self.parse_identifier_name();
            if self.eat(SyntaxKind::ColonToken) {
                property_name = first;
                name = self.parse_binding_name();
            } else {
                name = first;
            }
        }
        let initializer = if self.eat(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeId::NONE
        };
        self.alloc_binding_element(start, dot_dot_dot, property_name, name, initializer)
    }

    fn parse_array_binding_pattern(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBracketToken) && !self.at(SyntaxKind::EndOfFileToken) {
            if self.at(SyntaxKind::CommaToken) {
                let pos = self.start();
                elements.push(
                    self.arena
                        .alloc(tsdl_common::Span::new(pos, pos), NodeKind::OmittedExpression),
                );
                self.next_token();
                continue;
            }
            let estart = self.start();
            let dot_dot_dot = self.eat(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            let initializer = if self.eat(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeId::NONE
            };
            elements.push(self.alloc_binding_element(
                estart,
                dot_dot_dot,
                NodeId::NONE,
                name,
                initializer,
            ));
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBracketToken);
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ArrayBindingPattern { elements },
        )
    }

    fn alloc_binding_element(
        &mut self,
        start: u32,
        dot_dot_dot: bool,
        property_name: NodeId,
        name: NodeId,
        initializer: NodeId,
    ) -> NodeId {
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::BindingElement(Box::new(crate::ast::BindingElementData {
                dot_dot_dot,
                property_name,
                name,
                initializer,
            })),
        )
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn parse_function_declaration(
        &mut self,
        start: u32,
        decorators: Vec<NodeId>,
        modifiers: ModifierFlags,
    ) -> NodeId {
        tracing::trace!(start, "parse_function_declaration");
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
        let body = if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            // Overload signature or ambient declaration.
            self.parse_semicolon();
            NodeId::NONE
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::FunctionDeclaration(Box::new(crate::ast::FunctionData {
                modifiers,
                decorators,
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

    pub(crate) fn parse_parameter_list(&mut self) -> Vec<NodeId> {
        let mut parameters = Vec::new();
        self.expect(SyntaxKind::OpenParenToken);
        // A leading `this` parameter only types the call receiver.
        // Nothing of it reaches the output, so no node is built.
        if self.at(SyntaxKind::ThisKeyword) {
            self.next_token();
            self.parse_type_annotation_opt();
            self.eat(SyntaxKind::CommaToken);
        }
        while !self.at(SyntaxKind::CloseParenToken) && !self.at(SyntaxKind::EndOfFileToken) {
            parameters.push(self.parse_parameter());
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken);
        parameters
    }

    pub(crate) fn parse_parameter(&mut self) -> NodeId {
        let start = self.start();
        let decorators = self.parse_decorators();
        let modifiers = self.parse_parameter_modifiers();
        let dot_dot_dot = self.eat(SyntaxKind::DotDotDotToken);
        let name = self.parse_binding_name();
        let question = self.eat(SyntaxKind::QuestionToken);
        let ty = self.parse_type_annotation_opt();
        let initializer = if self.eat(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeId::NONE
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::Parameter(Box::new(crate::ast::ParameterData {
                modifiers,
                decorators,
                dot_dot_dot,
                name,
                question,
                ty,
                initializer,
            })),
        )
    }

    /// Accessibility and readonly keywords before a parameter name mark a
    /// parameter property. A lone keyword is the parameter's name.
    fn parse_parameter_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        loop {
            let flag = match self.token() {
                SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
                SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
                SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
                SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
                SyntaxKind::OverrideKeyword => ModifierFlags::OVERRIDE,
                _ => break,
            };
            let is_modifier = self.look_ahead(|p| {
                p.next_token();
                p.is_identifier()
                    || matches!(
                        p.token(),
                        SyntaxKind::OpenBraceToken
                            | SyntaxKind::OpenBracketToken
                            | SyntaxKind::DotDotDotToken
                            | SyntaxKind::ThisKeyword
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

    // =========================================================================
    // Enums, interfaces, type aliases, namespaces
    // =========================================================================

    fn parse_enum_declaration(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        is_const: bool,
    ) -> NodeId {
        self.expect(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        self.expect(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            let mstart = self.start();
            let member_name = if self.at(SyntaxKind::StringLiteral) {
                self.parse_string_literal()
            } else {
                self.parse_identifier_name()
            };
            let initializer = if self.eat(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeId::NONE
            };
            members.push(self.arena.alloc(
                self.finish_span(mstart),
                NodeKind::EnumMember {
                    name: member_name,
                    initializer,
                },
            ));
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::EnumDeclaration(Box::new(EnumData {
                modifiers,
                is_const,
                name,
                members,
            })),
        )
    }

    fn parse_interface_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        self.skip_type_parameters();
        if self.eat(SyntaxKind::ExtendsKeyword) {
            self.parse_implements_clause();
        }
        self.skip_balanced_braces();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::InterfaceDeclaration { modifiers, name },
        )
    }

    fn parse_type_alias_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        self.skip_type_parameters();
        self.expect(SyntaxKind::EqualsToken);
        self.parse_type();
        self.parse_semicolon();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::TypeAliasDeclaration { modifiers, name },
        )
    }

    /// Balanced `{...}` skip for erased bodies (interfaces). Template
    /// heads need a rescan so their `}` tokens do not end the body early.
    fn skip_balanced_braces(&mut self) {
        if !self.expect(SyntaxKind::OpenBraceToken) {
            return;
        }
        let mut depth = 1i32;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseBraceToken => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                SyntaxKind::TemplateHead => {
                    // Template literal type; its `}` tokens are not ours.
                    self.skip_template_type();
                    continue;
                }
                _ => {}
            }
            self.next_token();
        }
    }

    fn parse_module_declaration(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        is_namespace_keyword: bool,
    ) -> NodeId {
        if self.at(SyntaxKind::StringLiteral) {
            let name = self.parse_string_literal();
            let body = if self.at(SyntaxKind::OpenBraceToken) {
                self.parse_module_block()
            } else {
                self.parse_semicolon();
                NodeId::NONE
            };
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::ModuleDeclaration(Box::new(ModuleData {
                    modifiers,
                    name,
                    body,
                    is_namespace_keyword,
                })),
            );
        }
        let name = self.parse_identifier();
        self.parse_module_tail(start, modifiers, is_namespace_keyword, name)
    }

    /// Dotted names nest: `namespace A.B {}` is `A` containing an
    /// implicitly exported `B`.
    fn parse_module_tail(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        is_namespace_keyword: bool,
        name: NodeId,
    ) -> NodeId {
        let body = if self.eat(SyntaxKind::DotToken) {
            let inner_start = self.start();
            let inner_name = self.parse_identifier();
            self.parse_module_tail(
                inner_start,
                ModifierFlags::EXPORT,
                is_namespace_keyword,
                inner_name,
            )
        } else if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_module_block()
        } else {
            self.parse_semicolon();
            NodeId::NONE
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ModuleDeclaration(Box::new(ModuleData {
                modifiers,
                name,
                body,
                is_namespace_keyword,
            })),
        )
    }

    fn parse_module_block(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list_until(SyntaxKind::CloseBraceToken);
        self.expect(SyntaxKind::CloseBraceToken);
        self.arena
            .alloc(self.finish_span(start), NodeKind::ModuleBlock { statements })
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    fn parse_import_declaration(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();

        if self.at(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_string_literal();
            self.parse_semicolon();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::ImportDeclaration(Box::new(ImportData {
                    import_clause: NodeId::NONE,
                    module_specifier,
                })),
            );
        }

        let mut is_type_only = false;
        if self.at(SyntaxKind::TypeKeyword) {
            is_type_only = self.look_ahead(|p| {
                p.next_token();
                match p.token() {
                    SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken => true,
                    SyntaxKind::FromKeyword => {
                        // `import type from "m"` imports the name `type`;
                        // only a second `from` makes it type-only.
                        p.next_token();
                        p.at(SyntaxKind::FromKeyword)
                    }
                    t => t.is_identifier_like(),
                }
            });
            if is_type_only {
                self.next_token();
            }
        }

        let clause_start = self.start();
        let mut default_name = NodeId::NONE;
        let mut named_bindings = NodeId::NONE;
        if self.is_identifier() {
            default_name = self.parse_identifier();
            if self.at(SyntaxKind::EqualsToken) {
                return self.parse_import_equals_tail(
                    start,
                    ModifierFlags::empty(),
                    is_type_only,
                    default_name,
                );
            }
        }
        if default_name.is_none() || self.eat(SyntaxKind::CommaToken) {
            if self.at(SyntaxKind::AsteriskToken) {
                let nstart = self.start();
                self.next_token();
                self.expect(SyntaxKind::AsKeyword);
                let name = self.parse_identifier();
                named_bindings = self
                    .arena
                    .alloc(self.finish_span(nstart), NodeKind::NamespaceImport { name });
            } else if self.at(SyntaxKind::OpenBraceToken) {
                named_bindings = self.parse_named_imports();
            } else {
                self.error_at_current("Identifier expected.", codes::IDENTIFIER_EXPECTED);
            }
        }
        let import_clause = self.arena.alloc(
            self.finish_span(clause_start),
            NodeKind::ImportClause {
                is_type_only,
                name: default_name,
                named_bindings,
            },
        );
        self.expect(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_string_literal();
        self.parse_semicolon();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ImportDeclaration(Box::new(ImportData {
                import_clause,
                module_specifier,
            })),
        )
    }

    fn parse_import_equals_tail(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        is_type_only: bool,
        name: NodeId,
    ) -> NodeId {
        self.expect(SyntaxKind::EqualsToken);
        let (reference, is_require) = if self.at(SyntaxKind::RequireKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.at(SyntaxKind::OpenParenToken)
            }) {
            self.next_token();
            self.expect(SyntaxKind::OpenParenToken);
            let specifier = self.parse_string_literal();
            self.expect(SyntaxKind::CloseParenToken);
            (specifier, true)
        } else {
            (self.parse_entity_name(), false)
        };
        self.parse_semicolon();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ImportEqualsDeclaration(Box::new(ImportEqualsData {
                modifiers,
                is_type_only,
                name,
                reference,
                is_require,
            })),
        )
    }

    pub(crate) fn parse_entity_name(&mut self) -> NodeId {
        let start = self.start();
        let mut left = self.parse_identifier();
        while self.eat(SyntaxKind::DotToken) {
            let right = self.parse_identifier_name();
            left = self
                .arena
                .alloc(self.finish_span(start), NodeKind::QualifiedName { left, right });
        }
        left
    }

    fn parse_named_imports(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            elements.push(self.parse_import_specifier());
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.arena
            .alloc(self.finish_span(start), NodeKind::NamedImports { elements })
    }

    fn parse_import_specifier(&mut self) -> NodeId {
        let start = self.start();
        let is_type_only = self.at(SyntaxKind::TypeKeyword) && self.specifier_type_marker();
        if is_type_only {
            self.next_token();
        }
        let first = self.parse_identifier_name();
        let (property_name, name) = if self.eat(SyntaxKind::AsKeyword) {
            (first, self.parse_identifier())
        } else {
            (NodeId::NONE, first)
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ImportSpecifier {
                is_type_only,
                property_name,
                name,
            },
        )
    }

    /// Disambiguate `{ type x }` (type-only) from `{ type }` (the name
    /// `type`) and `{ type as x }` (importing `type` as `x`).
    fn specifier_type_marker(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.at(SyntaxKind::AsKeyword) {
                p.next_token();
                if p.at(SyntaxKind::AsKeyword) {
                    p.next_token();
                    return p.token() == SyntaxKind::Identifier || p.token().is_keyword();
                }
                // `type as x` imports `type`; `type as` followed by
                // punctuation is a type-only import of `as`.
                return !(p.token() == SyntaxKind::Identifier || p.token().is_keyword());
            }
            p.token() == SyntaxKind::Identifier || p.token().is_keyword()
        })
    }

    fn parse_export_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        match self.token() {
            SyntaxKind::EqualsToken => {
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.parse_semicolon();
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::ExportAssignment {
                        is_export_equals: true,
                        expression,
                    },
                )
            }
            SyntaxKind::DefaultKeyword => {
                self.next_token();
                let is_declaration = match self.token() {
                    SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword | SyntaxKind::AtToken => {
                        true
                    }
                    SyntaxKind::AbstractKeyword => self.look_ahead(|p| {
                        p.next_token();
                        p.at(SyntaxKind::ClassKeyword)
                    }),
                    SyntaxKind::AsyncKeyword => self.look_ahead(|p| {
                        p.next_token();
                        !p.scanner.has_preceding_line_break()
                            && p.at(SyntaxKind::FunctionKeyword)
                    }),
                    _ => false,
                };
                if is_declaration {
                    let decorators = self.parse_decorators();
                    let modifiers = self.parse_statement_modifiers()
                        | ModifierFlags::EXPORT
                        | ModifierFlags::DEFAULT;
                    return self.parse_declaration_core(start, decorators, modifiers);
                }
                let expression = self.parse_assignment_expression();
                self.parse_semicolon();
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::ExportAssignment {
                        is_export_equals: false,
                        expression,
                    },
                )
            }
            SyntaxKind::AsteriskToken => {
                self.next_token();
                let export_clause = if self.eat(SyntaxKind::AsKeyword) {
                    let nstart = self.start();
                    let name = self.parse_identifier_name();
                    self.arena
                        .alloc(self.finish_span(nstart), NodeKind::NamespaceExport { name })
                } else {
                    NodeId::NONE
                };
                self.expect(SyntaxKind::FromKeyword);
                let module_specifier = self.parse_string_literal();
                self.parse_semicolon();
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::ExportDeclaration(Box::new(ExportData {
                        is_type_only: false,
                        is_star: true,
                        export_clause,
                        module_specifier,
                    })),
                )
            }
            SyntaxKind::OpenBraceToken => self.parse_named_export_tail(start, false),
            SyntaxKind::TypeKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    p.at(SyntaxKind::OpenBraceToken) || p.at(SyntaxKind::AsteriskToken)
                }) {
                    self.next_token();
                    if self.at(SyntaxKind::AsteriskToken) {
                        self.next_token();
                        let export_clause = if self.eat(SyntaxKind::AsKeyword) {
                            let nstart = self.start();
                            let name = self.parse_identifier_name();
                            self.arena.alloc(
                                self.finish_span(nstart),
                                NodeKind::NamespaceExport { name },
                            )
                        } else {
                            NodeId::NONE
                        };
                        self.expect(SyntaxKind::FromKeyword);
                        let module_specifier = self.parse_string_literal();
                        self.parse_semicolon();
                        return self.arena.alloc(
                            self.finish_span(start),
                            NodeKind::ExportDeclaration(Box::new(ExportData {
                                is_type_only: true,
                                is_star: true,
                                export_clause,
                                module_specifier,
                            })),
                        );
                    }
                    self.parse_named_export_tail(start, true)
                } else {
                    let modifiers = self.parse_statement_modifiers() | ModifierFlags::EXPORT;
                    self.parse_declaration_core(start, Vec::new(), modifiers)
                }
            }
            SyntaxKind::ImportKeyword => {
                self.next_token();
                let name = self.parse_identifier();
                self.parse_import_equals_tail(start, ModifierFlags::EXPORT, false, name)
            }
            SyntaxKind::AsKeyword => {
                self.next_token();
                self.expect(SyntaxKind::NamespaceKeyword);
                let name = self.parse_identifier();
                self.parse_semicolon();
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::NamespaceExportDeclaration { name },
                )
            }
            _ => {
                let decorators = self.parse_decorators();
                let modifiers = self.parse_statement_modifiers() | ModifierFlags::EXPORT;
                self.parse_declaration_core(start, decorators, modifiers)
            }
        }
    }

    fn parse_named_export_tail(&mut self, start: u32, is_type_only: bool) -> NodeId {
        let export_clause = self.parse_named_exports();
        let module_specifier = if self.eat(SyntaxKind::FromKeyword) {
            self.parse_string_literal()
        } else {
            NodeId::NONE
        };
        self.parse_semicolon();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ExportDeclaration(Box::new(ExportData {
                is_type_only,
                is_star: false,
                export_clause,
                module_specifier,
            })),
        )
    }

    fn parse_named_exports(&mut self) -> NodeId {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            elements.push(self.parse_export_specifier());
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.arena
            .alloc(self.finish_span(start), NodeKind::NamedExports { elements })
    }

    fn parse_export_specifier(&mut self) -> NodeId {
        let start = self.start();
        let is_type_only = self.at(SyntaxKind::TypeKeyword) && self.specifier_type_marker();
        if is_type_only {
            self.next_token();
        }
        let first = self.parse_identifier_name();
        let (property_name, name) = if self.eat(SyntaxKind::AsKeyword) {
            (first, self.parse_identifier_name())
        } else {
            (NodeId::NONE, first)
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ExportSpecifier {
                is_type_only,
                property_name,
                name,
            },
        )
    }

    pub(crate) fn parse_string_literal(&mut self) -> NodeId {
        if self.at(SyntaxKind::StringLiteral) {
            let span = self.token_span();
            let raw = self.scanner.token_text().to_string();
            let value = self.scanner.token_value().to_string();
            self.next_token();
            return self
                .arena
                .alloc(span, NodeKind::StringLiteral { raw, value });
        }
        self.error_at_current("String literal expected.", codes::STRING_LITERAL_EXPECTED);
        let pos = self.start();
        self.arena.alloc(
            tsdl_common::Span::new(pos, pos),
            NodeKind::StringLiteral {
                raw: String::from("\"\""),
                value: String::new(),
            },
        )
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_if_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.expect(SyntaxKind::CloseParenToken);
        let then_statement = self.parse_statement();
        let else_statement = if self.eat(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeId::NONE
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::IfStatement {
                condition,
                then_statement,
                else_statement,
            },
        )
    }

    fn parse_do_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        let statement = self.parse_statement();
        self.expect(SyntaxKind::WhileKeyword);
        self.expect(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.expect(SyntaxKind::CloseParenToken);
        self.eat(SyntaxKind::SemicolonToken);
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::DoStatement { statement, condition },
        )
    }

    fn parse_while_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.expect(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::WhileStatement { condition, statement },
        )
    }

    fn parse_for_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        let await_modifier = self.eat(SyntaxKind::AwaitKeyword);
        self.expect(SyntaxKind::OpenParenToken);

        let saved = self.in_disallowed;
        self.in_disallowed = true;
        let initializer = if self.at(SyntaxKind::SemicolonToken) {
            NodeId::NONE
        } else if matches!(
            self.token(),
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword
        ) || (self.at(SyntaxKind::LetKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_identifier()
                    || p.at(SyntaxKind::OpenBracketToken)
                    || p.at(SyntaxKind::OpenBraceToken)
            }))
        {
            self.parse_variable_declaration_list(true)
        } else {
            self.parse_expression()
        };
        self.in_disallowed = saved;

        if self.eat(SyntaxKind::OfKeyword) {
            let expression = self.parse_assignment_expression();
            self.expect(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::ForOfStatement {
                    await_modifier,
                    initializer,
                    expression,
                    statement,
                },
            );
        }
        if self.eat(SyntaxKind::InKeyword) {
            let expression = self.parse_expression();
            self.expect(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::ForInStatement {
                    initializer,
                    expression,
                    statement,
                },
            );
        }
        self.expect(SyntaxKind::SemicolonToken);
        let condition = if self.at(SyntaxKind::SemicolonToken) {
            NodeId::NONE
        } else {
            self.parse_expression()
        };
        self.expect(SyntaxKind::SemicolonToken);
        let incrementor = if self.at(SyntaxKind::CloseParenToken) {
            NodeId::NONE
        } else {
            self.parse_expression()
        };
        self.expect(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::ForStatement {
                initializer,
                condition,
                incrementor,
                statement,
            },
        )
    }

    fn parse_break_or_continue(&mut self, is_break: bool) -> NodeId {
        let start = self.start();
        self.next_token();
        let label = if self.is_identifier() && !self.scanner.has_preceding_line_break() {
            self.parse_identifier()
        } else {
            NodeId::NONE
        };
        self.parse_semicolon();
        let span = self.finish_span(start);
        let kind = if is_break {
            NodeKind::BreakStatement { label }
        } else {
            NodeKind::ContinueStatement { label }
        };
        self.arena.alloc(span, kind)
    }

    fn parse_return_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        let expression = if self.at(SyntaxKind::SemicolonToken)
            || self.at(SyntaxKind::CloseBraceToken)
            || self.at(SyntaxKind::EndOfFileToken)
            || self.scanner.has_preceding_line_break()
        {
            NodeId::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.arena
            .alloc(self.finish_span(start), NodeKind::ReturnStatement { expression })
    }

    fn parse_with_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.expect(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::WithStatement { expression, statement },
        )
    }

    fn parse_switch_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.expect(SyntaxKind::CloseParenToken);
        self.expect(SyntaxKind::OpenBraceToken);
        let mut clauses = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            let cstart = self.start();
            let clause_expression = if self.eat(SyntaxKind::CaseKeyword) {
                let e = self.parse_expression();
                self.expect(SyntaxKind::ColonToken);
                e
            } else {
                self.expect(SyntaxKind::DefaultKeyword);
                self.expect(SyntaxKind::ColonToken);
                NodeId::NONE
            };
            let mut statements = Vec::new();
            while !matches!(
                self.token(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                let before = self.start();
                let stmt = self.parse_statement();
                if stmt.is_some() {
                    statements.push(stmt);
                }
                if self.start() == before {
                    break;
                }
            }
            clauses.push(self.arena.alloc(
                self.finish_span(cstart),
                NodeKind::CaseClause {
                    expression: clause_expression,
                    statements,
                },
            ));
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::SwitchStatement { expression, clauses },
        )
    }

    fn parse_throw_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        if self.scanner.has_preceding_line_break() {
            self.error_at_current("Expression expected.", codes::EXPRESSION_EXPECTED);
        }
        let expression = self.parse_expression();
        self.parse_semicolon();
        self.arena
            .alloc(self.finish_span(start), NodeKind::ThrowStatement { expression })
    }

    fn parse_try_statement(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        let try_block = self.parse_block();
        let catch_clause = if self.at(SyntaxKind::CatchKeyword) {
            let cstart = self.start();
            self.next_token();
            let variable_declaration = if self.eat(SyntaxKind::OpenParenToken) {
                let vstart = self.start();
                let name = self.parse_binding_name();
                let ty = self.parse_type_annotation_opt();
                let decl = self.arena.alloc(
                    self.finish_span(vstart),
                    NodeKind::VariableDeclaration {
                        name,
                        exclamation: false,
                        ty,
                        initializer: NodeId::NONE,
                    },
                );
                self.expect(SyntaxKind::CloseParenToken);
                decl
            } else {
                NodeId::NONE
            };
            let block = self.parse_block();
            self.arena.alloc(
                self.finish_span(cstart),
                NodeKind::CatchClause {
                    variable_declaration,
                    block,
                },
            )
        } else {
            NodeId::NONE
        };
        let finally_block = if self.eat(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeId::NONE
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            },
        )
    }

    fn parse_expression_statement(&mut self) -> NodeId {
        let start = self.start();
        if self.is_identifier()
            && self.look_ahead(|p| {
                p.next_token();
                p.at(SyntaxKind::ColonToken)
            })
        {
            let label = self.parse_identifier();
            self.next_token();
            let statement = self.parse_statement();
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::LabeledStatement { label, statement },
            );
        }
        let expression = self.parse_expression();
        self.parse_semicolon();
        self.arena
            .alloc(self.finish_span(start), NodeKind::ExpressionStatement { expression })
    }
}
