//! JavaScript output printer.
//!
//! Walks the lowered tree and renders text. Type syntax that survives
//! in the tree (annotation spans, `as`/`satisfies` wrappers, modifier
//! bits) is dropped here rather than by a separate erasure rewrite, so
//! the transforms only deal with statement-level erasure.
//!
//! Comments never live in the tree. Each emitted statement pulls its
//! leading and trailing comment runs from the scanner's comment list by
//! source position, looking through `original` links so synthesized
//! statements inherit the comments of the construct they replaced. A
//! position set keeps a comment from printing twice when several
//! statements share one original.

mod expressions;

use rustc_hash::FxHashSet;
use tsdl_common::CompilerOptions;
use tsdl_common::comments::{CommentRange, leading_comment_slice, trailing_comment_slice};
use tsdl_parser::{ModifierFlags, NodeArena, NodeId, NodeKind};

pub(crate) struct Printer<'a> {
    arena: &'a NodeArena,
    comments: &'a [CommentRange],
    source: &'a str,
    options: &'a CompilerOptions,
    out: String,
    indent: usize,
    at_line_start: bool,
    /// Start positions of comments already written.
    printed_comments: FxHashSet<u32>,
}

impl<'a> Printer<'a> {
    pub(crate) fn new(
        arena: &'a NodeArena,
        comments: &'a [CommentRange],
        source: &'a str,
        options: &'a CompilerOptions,
    ) -> Printer<'a> {
        Printer {
            arena,
            comments,
            source,
            options,
            out: String::with_capacity(source.len()),
            indent: 0,
            at_line_start: true,
            printed_comments: FxHashSet::default(),
        }
    }

    pub(crate) fn print(mut self, root: NodeId) -> String {
        let arena = self.arena;
        if let NodeKind::SourceFile(data) = &arena.get(root).kind {
            for &statement in &data.statements {
                self.emit_statement(statement);
            }
        }
        self.out
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    pub(super) fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent {
                self.out.push_str("    ");
            }
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    pub(super) fn write_line(&mut self) {
        self.out.push_str(self.options.new_line.as_str());
        self.at_line_start = true;
    }

    pub(super) fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub(super) fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Leading comment run of a statement, each comment at the current
    /// indent. A multi-line comment the source kept on the statement's
    /// own line stays inline.
    fn emit_leading_comments(&mut self, id: NodeId) {
        if self.options.remove_comments {
            return;
        }
        let Some(span) = self.arena.comment_anchor(id) else {
            return;
        };
        let slice = leading_comment_slice(self.comments, self.source, span.start);
        for range in slice {
            if !self.printed_comments.insert(range.pos) {
                continue;
            }
            self.write(range.text(self.source));
            if range.has_trailing_new_line {
                self.write_line();
            } else {
                self.write(" ");
            }
        }
    }

    /// Same-line comments after the statement's last token.
    fn emit_trailing_comments(&mut self, id: NodeId) {
        if self.options.remove_comments {
            return;
        }
        let Some(span) = self.arena.comment_anchor(id) else {
            return;
        };
        let slice = trailing_comment_slice(self.comments, self.source, span.end);
        for range in slice {
            if !self.printed_comments.insert(range.pos) {
                continue;
            }
            self.write(" ");
            self.write(range.text(self.source));
        }
    }

    /// Comment immediately before an embedded node (a parameter or call
    /// argument). Only multi-line comments can sit inside a line.
    pub(super) fn emit_inline_leading_comments(&mut self, id: NodeId) {
        if self.options.remove_comments {
            return;
        }
        let Some(span) = self.arena.comment_anchor(id) else {
            return;
        };
        let slice = leading_comment_slice(self.comments, self.source, span.start);
        for range in slice {
            if !range.is_multi_line || range.has_trailing_new_line {
                continue;
            }
            if !self.printed_comments.insert(range.pos) {
                continue;
            }
            self.write(range.text(self.source));
            let after = range.end as usize;
            if self.source.as_bytes().get(after).is_some_and(|b| *b == b' ' || *b == b'\t') {
                self.write(" ");
            }
        }
    }

    pub(super) fn emit_trailing_annotation(&mut self, id: NodeId) {
        if self.options.remove_comments {
            return;
        }
        if let Some(annotation) = self.arena.trailing_annotation(id) {
            self.write(" /* ");
            self.write(annotation);
            self.write(" */");
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(super) fn emit_statement(&mut self, id: NodeId) {
        let before = self.out.len();
        self.emit_leading_comments(id);
        let mark = self.out.len();
        self.emit_statement_body(id);
        if self.out.len() == mark {
            // Nothing printable; roll back any comments too.
            self.out.truncate(before);
            self.at_line_start = true;
            return;
        }
        self.emit_trailing_comments(id);
        self.write_line();
    }

    /// Statement text without surrounding trivia, for single-line block
    /// bodies.
    fn emit_statement_inline(&mut self, id: NodeId) {
        self.emit_statement_body(id);
    }

    fn emit_statement_body(&mut self, id: NodeId) {
        let arena = self.arena;
        match &arena.get(id).kind {
            NodeKind::Block { .. } => self.emit_block(id),
            NodeKind::EmptyStatement => self.write(";"),
            NodeKind::VariableStatement {
                modifiers,
                declarations,
            } => {
                self.emit_statement_modifiers(*modifiers);
                self.emit_variable_declaration_list(*declarations);
                self.write(";");
            }
            NodeKind::ExpressionStatement { expression } => {
                self.emit_expression(*expression);
                self.write(";");
            }
            NodeKind::IfStatement {
                condition,
                then_statement,
                else_statement,
            } => {
                self.write("if (");
                self.emit_expression(*condition);
                self.write(")");
                self.emit_embedded_statement(*then_statement);
                if else_statement.is_some() {
                    self.write_line();
                    self.write("else");
                    if matches!(arena.get(*else_statement).kind, NodeKind::IfStatement { .. }) {
                        self.write(" ");
                        self.emit_statement_body(*else_statement);
                    } else {
                        self.emit_embedded_statement(*else_statement);
                    }
                }
            }
            NodeKind::DoStatement {
                statement,
                condition,
            } => {
                self.write("do");
                let block_body = matches!(arena.get(*statement).kind, NodeKind::Block { .. });
                self.emit_embedded_statement(*statement);
                if block_body {
                    self.write(" while (");
                } else {
                    self.write_line();
                    self.write("while (");
                }
                self.emit_expression(*condition);
                self.write(");");
            }
            NodeKind::WhileStatement {
                condition,
                statement,
            } => {
                self.write("while (");
                self.emit_expression(*condition);
                self.write(")");
                self.emit_embedded_statement(*statement);
            }
            NodeKind::ForStatement {
                initializer,
                condition,
                incrementor,
                statement,
            } => {
                self.write("for (");
                if initializer.is_some() {
                    self.emit_for_initializer(*initializer);
                }
                self.write(";");
                if condition.is_some() {
                    self.write(" ");
                    self.emit_expression(*condition);
                }
                self.write(";");
                if incrementor.is_some() {
                    self.write(" ");
                    self.emit_expression(*incrementor);
                }
                self.write(")");
                self.emit_embedded_statement(*statement);
            }
            NodeKind::ForInStatement {
                initializer,
                expression,
                statement,
            } => {
                self.write("for (");
                self.emit_for_initializer(*initializer);
                self.write(" in ");
                self.emit_expression(*expression);
                self.write(")");
                self.emit_embedded_statement(*statement);
            }
            NodeKind::ForOfStatement {
                await_modifier,
                initializer,
                expression,
                statement,
            } => {
                if *await_modifier {
                    self.write("for await (");
                } else {
                    self.write("for (");
                }
                self.emit_for_initializer(*initializer);
                self.write(" of ");
                self.emit_expression(*expression);
                self.write(")");
                self.emit_embedded_statement(*statement);
            }
            NodeKind::ContinueStatement { label } => {
                self.write("continue");
                if label.is_some() {
                    self.write(" ");
                    self.emit_expression(*label);
                }
                self.write(";");
            }
            NodeKind::BreakStatement { label } => {
                self.write("break");
                if label.is_some() {
                    self.write(" ");
                    self.emit_expression(*label);
                }
                self.write(";");
            }
            NodeKind::ReturnStatement { expression } => {
                self.write("return");
                if expression.is_some() {
                    self.write(" ");
                    self.emit_expression(*expression);
                }
                self.write(";");
            }
            NodeKind::WithStatement {
                expression,
                statement,
            } => {
                self.write("with (");
                self.emit_expression(*expression);
                self.write(")");
                self.emit_embedded_statement(*statement);
            }
            NodeKind::SwitchStatement {
                expression,
                clauses,
            } => {
                self.write("switch (");
                self.emit_expression(*expression);
                self.write(") {");
                self.write_line();
                self.increase_indent();
                for &clause in clauses {
                    self.emit_case_clause(clause);
                }
                self.decrease_indent();
                self.write("}");
            }
            NodeKind::LabeledStatement { label, statement } => {
                self.emit_expression(*label);
                self.write(": ");
                self.emit_statement_body(*statement);
            }
            NodeKind::ThrowStatement { expression } => {
                self.write("throw ");
                self.emit_expression(*expression);
                self.write(";");
            }
            NodeKind::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            } => {
                self.write("try");
                self.emit_embedded_statement(*try_block);
                if catch_clause.is_some() {
                    self.write_line();
                    self.emit_catch_clause(*catch_clause);
                }
                if finally_block.is_some() {
                    self.write_line();
                    self.write("finally");
                    self.emit_embedded_statement(*finally_block);
                }
            }
            NodeKind::DebuggerStatement => self.write("debugger;"),
            NodeKind::FunctionDeclaration(data) => {
                self.emit_statement_modifiers(data.modifiers);
                self.emit_function_shape(data);
            }
            NodeKind::ClassDeclaration(data) => {
                for &decorator in &data.decorators {
                    self.emit_expression(decorator);
                    self.write_line();
                }
                self.emit_statement_modifiers(data.modifiers);
                self.write("class");
                if data.name.is_some() {
                    self.write(" ");
                    self.emit_expression(data.name);
                }
                self.emit_class_tail(data.extends, &data.members);
            }
            NodeKind::ImportDeclaration(data) => {
                self.write("import ");
                if data.import_clause.is_some() {
                    self.emit_import_clause(data.import_clause);
                    self.write(" from ");
                }
                self.emit_expression(data.module_specifier);
                self.write(";");
            }
            NodeKind::ExportAssignment {
                is_export_equals,
                expression,
            } => {
                if *is_export_equals {
                    self.write("export = ");
                } else {
                    self.write("export default ");
                }
                self.emit_expression(*expression);
                self.write(";");
            }
            NodeKind::ExportDeclaration(data) => {
                self.write("export ");
                if data.is_star {
                    self.write("*");
                    if data.export_clause.is_some() {
                        self.write(" as ");
                        self.emit_namespace_export_name(data.export_clause);
                    }
                } else {
                    self.emit_named_exports(data.export_clause);
                }
                if data.module_specifier.is_some() {
                    self.write(" from ");
                    self.emit_expression(data.module_specifier);
                }
                self.write(";");
            }
            // Erased and lowered forms that should not reach the
            // printer produce no text; emit_statement rolls them back.
            _ => {}
        }
    }

    /// `export` and `default` are the only statement modifiers with
    /// runtime meaning; everything else is type syntax.
    fn emit_statement_modifiers(&mut self, modifiers: ModifierFlags) {
        if modifiers.contains(ModifierFlags::EXPORT) {
            self.write("export ");
        }
        if modifiers.contains(ModifierFlags::DEFAULT) {
            self.write("default ");
        }
    }

    /// A statement in `if`/`while`/`for` position: blocks stay on the
    /// same line, anything else moves to the next line indented.
    fn emit_embedded_statement(&mut self, id: NodeId) {
        if matches!(self.arena.get(id).kind, NodeKind::Block { .. }) {
            self.write(" ");
            self.emit_block(id);
        } else {
            self.write_line();
            self.increase_indent();
            self.emit_leading_comments(id);
            self.emit_statement_body(id);
            self.emit_trailing_comments(id);
            self.decrease_indent();
        }
    }

    pub(super) fn emit_block(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::Block {
            statements,
            multiline,
        } = &arena.get(id).kind
        else {
            return;
        };
        if statements.is_empty() {
            if *multiline {
                self.write("{");
                self.write_line();
                self.write("}");
            } else {
                self.write("{ }");
            }
            return;
        }
        if !*multiline && statements.len() == 1 {
            self.write("{ ");
            self.emit_statement_inline(statements[0]);
            self.write(" }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for &statement in statements {
            self.emit_statement(statement);
        }
        self.decrease_indent();
        self.write("}");
    }

    fn emit_case_clause(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::CaseClause {
            expression,
            statements,
        } = &arena.get(id).kind
        else {
            return;
        };
        if expression.is_some() {
            self.write("case ");
            self.emit_expression(*expression);
            self.write(":");
        } else {
            self.write("default:");
        }
        // A lone block hangs off the colon; tsc keeps that shape.
        if statements.len() == 1
            && matches!(arena.get(statements[0]).kind, NodeKind::Block { .. })
        {
            self.write(" ");
            self.emit_block(statements[0]);
            self.write_line();
            return;
        }
        self.write_line();
        self.increase_indent();
        for &statement in statements {
            self.emit_statement(statement);
        }
        self.decrease_indent();
    }

    fn emit_catch_clause(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::CatchClause {
            variable_declaration,
            block,
        } = &arena.get(id).kind
        else {
            return;
        };
        self.write("catch");
        if variable_declaration.is_some() {
            self.write(" (");
            if let NodeKind::VariableDeclaration { name, .. } =
                &arena.get(*variable_declaration).kind
            {
                self.emit_binding_name(*name);
            }
            self.write(")");
        }
        self.emit_embedded_statement(*block);
    }

    fn emit_for_initializer(&mut self, id: NodeId) {
        if matches!(
            self.arena.get(id).kind,
            NodeKind::VariableDeclarationList { .. }
        ) {
            self.emit_variable_declaration_list(id);
        } else {
            self.emit_expression(id);
        }
    }

    fn emit_variable_declaration_list(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::VariableDeclarationList {
            flavor,
            declarations,
        } = &arena.get(id).kind
        else {
            return;
        };
        self.write(flavor.keyword());
        self.write(" ");
        let mut first = true;
        for &declaration in declarations {
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit_variable_declaration(declaration);
        }
    }

    fn emit_variable_declaration(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::VariableDeclaration {
            name, initializer, ..
        } = &arena.get(id).kind
        else {
            return;
        };
        self.emit_binding_name(*name);
        if initializer.is_some() {
            self.write(" = ");
            self.emit_expression(*initializer);
        }
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    /// `function` keyword form, shared by declarations and expressions.
    pub(super) fn emit_function_shape(&mut self, data: &tsdl_parser::ast::FunctionData) {
        if data.modifiers.contains(ModifierFlags::ASYNC) {
            self.write("async ");
        }
        self.write("function");
        if data.asterisk {
            self.write("*");
        }
        self.write(" ");
        if data.name.is_some() {
            self.emit_expression(data.name);
        }
        self.emit_parameter_list(&data.parameters);
        self.write(" ");
        self.emit_block(data.body);
    }

    pub(super) fn emit_parameter_list(&mut self, parameters: &[NodeId]) {
        self.write("(");
        let mut first = true;
        for &parameter in parameters {
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit_parameter(parameter);
        }
        self.write(")");
    }

    fn emit_parameter(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::Parameter(data) = &arena.get(id).kind else {
            return;
        };
        for &decorator in &data.decorators {
            self.emit_expression(decorator);
            self.write(" ");
        }
        self.emit_inline_leading_comments(data.name);
        if data.dot_dot_dot {
            self.write("...");
        }
        self.emit_binding_name(data.name);
        if data.initializer.is_some() {
            self.write(" = ");
            self.emit_expression(data.initializer);
        }
    }

    pub(super) fn emit_class_tail(&mut self, extends: NodeId, members: &[NodeId]) {
        if extends.is_some() {
            self.write(" extends ");
            self.emit_expression(extends);
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();
        for &member in members {
            self.emit_class_member(member);
        }
        self.decrease_indent();
        self.write("}");
    }

    fn emit_class_member(&mut self, id: NodeId) {
        let before = self.out.len();
        self.emit_leading_comments(id);
        let mark = self.out.len();
        self.emit_class_member_body(id);
        if self.out.len() == mark {
            self.out.truncate(before);
            self.at_line_start = true;
            return;
        }
        self.emit_trailing_comments(id);
        self.write_line();
    }

    fn emit_class_member_body(&mut self, id: NodeId) {
        let arena = self.arena;
        match &arena.get(id).kind {
            NodeKind::PropertyDeclaration(data) => {
                for &decorator in &data.decorators {
                    self.emit_expression(decorator);
                    self.write_line();
                }
                self.emit_member_modifiers(data.modifiers);
                self.emit_expression(data.name);
                if data.initializer.is_some() {
                    self.write(" = ");
                    self.emit_expression(data.initializer);
                }
                self.write(";");
            }
            NodeKind::MethodDeclaration(data) => {
                for &decorator in &data.decorators {
                    self.emit_expression(decorator);
                    self.write_line();
                }
                self.emit_member_modifiers(data.modifiers);
                if data.asterisk {
                    self.write("*");
                }
                self.emit_expression(data.name);
                self.emit_parameter_list(&data.parameters);
                self.write(" ");
                self.emit_block(data.body);
            }
            NodeKind::ConstructorDeclaration(data) => {
                self.write("constructor");
                self.emit_parameter_list(&data.parameters);
                self.write(" ");
                self.emit_block(data.body);
            }
            NodeKind::GetAccessorDeclaration(data) => {
                self.emit_member_modifiers(data.modifiers);
                self.write("get ");
                self.emit_expression(data.name);
                self.emit_parameter_list(&data.parameters);
                self.write(" ");
                self.emit_block(data.body);
            }
            NodeKind::SetAccessorDeclaration(data) => {
                self.emit_member_modifiers(data.modifiers);
                self.write("set ");
                self.emit_expression(data.name);
                self.emit_parameter_list(&data.parameters);
                self.write(" ");
                self.emit_block(data.body);
            }
            NodeKind::ClassStaticBlockDeclaration { body } => {
                self.write("static ");
                self.emit_block(*body);
            }
            NodeKind::SemicolonClassElement => self.write(";"),
            _ => {}
        }
    }

    fn emit_member_modifiers(&mut self, modifiers: ModifierFlags) {
        if modifiers.contains(ModifierFlags::STATIC) {
            self.write("static ");
        }
        if modifiers.contains(ModifierFlags::ACCESSOR) {
            self.write("accessor ");
        }
        if modifiers.contains(ModifierFlags::ASYNC) {
            self.write("async ");
        }
    }

    // =========================================================================
    // Module syntax (ESM pass-through)
    // =========================================================================

    fn emit_import_clause(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::ImportClause {
            name,
            named_bindings,
            ..
        } = &arena.get(id).kind
        else {
            return;
        };
        if name.is_some() {
            self.emit_expression(*name);
            if named_bindings.is_some() {
                self.write(", ");
            }
        }
        if named_bindings.is_none() {
            return;
        }
        match &arena.get(*named_bindings).kind {
            NodeKind::NamespaceImport { name } => {
                self.write("* as ");
                self.emit_expression(*name);
            }
            NodeKind::NamedImports { elements } => {
                if elements.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                let mut first = true;
                for &element in elements {
                    if !first {
                        self.write(", ");
                    }
                    first = false;
                    self.emit_import_export_specifier(element);
                }
                self.write(" }");
            }
            _ => {}
        }
    }

    fn emit_named_exports(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::NamedExports { elements } = &arena.get(id).kind else {
            return;
        };
        if elements.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        let mut first = true;
        for &element in elements {
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit_import_export_specifier(element);
        }
        self.write(" }");
    }

    fn emit_import_export_specifier(&mut self, id: NodeId) {
        let arena = self.arena;
        let (property_name, name) = match &arena.get(id).kind {
            NodeKind::ImportSpecifier {
                property_name,
                name,
                ..
            }
            | NodeKind::ExportSpecifier {
                property_name,
                name,
                ..
            } => (*property_name, *name),
            _ => return,
        };
        if property_name.is_some() {
            self.emit_expression(property_name);
            self.write(" as ");
        }
        self.emit_expression(name);
    }

    fn emit_namespace_export_name(&mut self, id: NodeId) {
        if let NodeKind::NamespaceExport { name } = &self.arena.get(id).kind {
            self.emit_expression(*name);
        }
    }

    // =========================================================================
    // Binding names
    // =========================================================================

    pub(super) fn emit_binding_name(&mut self, id: NodeId) {
        let arena = self.arena;
        match &arena.get(id).kind {
            NodeKind::ObjectBindingPattern { elements } => {
                if elements.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                let mut first = true;
                for &element in elements {
                    if !first {
                        self.write(", ");
                    }
                    first = false;
                    self.emit_binding_element(element);
                }
                self.write(" }");
            }
            NodeKind::ArrayBindingPattern { elements } => {
                self.write("[");
                let mut first = true;
                for &element in elements {
                    if !first {
                        self.write(", ");
                    }
                    first = false;
                    if matches!(arena.get(element).kind, NodeKind::OmittedExpression) {
                        continue;
                    }
                    self.emit_binding_element(element);
                }
                self.write("]");
            }
            _ => self.emit_expression(id),
        }
    }

    fn emit_binding_element(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::BindingElement(data) = &arena.get(id).kind else {
            return;
        };
        if data.dot_dot_dot {
            self.write("...");
        }
        if data.property_name.is_some() {
            self.emit_expression(data.property_name);
            self.write(": ");
        }
        self.emit_binding_name(data.name);
        if data.initializer.is_some() {
            self.write(" = ");
            self.emit_expression(data.initializer);
        }
    }
}
