//! Second binding pass: resolve identifier references.
//!
//! Re-enters the scopes built by the declaration pass, resolves every
//! value-position identifier, and marks the symbols that are read at
//! runtime. Declaration names, member names, labels, and JSX intrinsic
//! tags are skipped; type positions never show up at all because the
//! parser collapses them to opaque leaves.

use tsdl_parser::ast::{ClassData, FunctionData, fold};
use tsdl_parser::{NodeId, NodeKind};

use crate::state::BinderState;

impl BinderState<'_> {
    pub(crate) fn visit(&mut self, node: NodeId) {
        match self.arena.kind(node) {
            NodeKind::Identifier { text } => self.resolve_reference(node, text),

            // Member names are not references; only the base is.
            NodeKind::PropertyAccessExpression { expression, .. } => self.visit(*expression),
            NodeKind::QualifiedName { left, .. } => self.visit(*left),

            NodeKind::PropertyAssignment { name, initializer } => {
                self.visit_property_name(*name);
                if initializer.is_some() {
                    self.visit(*initializer);
                }
            }
            // Shorthand `{ a }` reads the binding named `a`.
            NodeKind::ShorthandPropertyAssignment { name, initializer } => {
                if name.is_some() {
                    self.visit(*name);
                }
                if initializer.is_some() {
                    self.visit(*initializer);
                }
            }

            NodeKind::VariableStatement {
                modifiers,
                declarations,
            } => {
                if modifiers.is_ambient() {
                    return;
                }
                self.visit(*declarations);
            }
            NodeKind::VariableDeclarationList { declarations, .. } => {
                for &declaration in declarations {
                    self.visit(declaration);
                }
            }
            NodeKind::VariableDeclaration {
                name, initializer, ..
            } => {
                self.visit_binding_name(*name);
                if initializer.is_some() {
                    self.visit(*initializer);
                }
            }

            NodeKind::FunctionDeclaration(data) => {
                if data.modifiers.is_ambient() {
                    return;
                }
                self.visit_callable(node, data);
            }
            NodeKind::FunctionExpression(data)
            | NodeKind::ArrowFunction(data)
            | NodeKind::MethodDeclaration(data)
            | NodeKind::ConstructorDeclaration(data)
            | NodeKind::GetAccessorDeclaration(data)
            | NodeKind::SetAccessorDeclaration(data) => self.visit_callable(node, data),

            NodeKind::ClassDeclaration(data) => {
                if data.modifiers.is_ambient() {
                    return;
                }
                self.visit_class_parts(data);
            }
            NodeKind::ClassExpression(data) => {
                let entered = self.reenter_scope(node);
                self.visit_class_parts(data);
                if entered {
                    self.leave_scope();
                }
            }
            NodeKind::PropertyDeclaration(data) => {
                for &decorator in &data.decorators {
                    self.visit(decorator);
                }
                self.visit_property_name(data.name);
                if data.initializer.is_some() {
                    self.visit(data.initializer);
                }
            }
            NodeKind::ClassStaticBlockDeclaration { body } => {
                let entered = self.reenter_scope(node);
                if body.is_some() {
                    self.visit(*body);
                }
                if entered {
                    self.leave_scope();
                }
            }

            NodeKind::EnumDeclaration(data) => {
                if data.modifiers.is_ambient() && !data.is_const {
                    return;
                }
                let Some(&symbol) = self.node_symbols.get(&node) else {
                    return;
                };
                let entered = self.reenter_scope(node);
                self.bind_enum_members(symbol, data);
                if entered {
                    self.leave_scope();
                }
            }
            NodeKind::ModuleDeclaration(data) => {
                if data.modifiers.is_ambient() {
                    return;
                }
                if !self.reenter_scope(node) {
                    return;
                }
                if data.body.is_some() {
                    if let NodeKind::ModuleBlock { statements } = self.arena.kind(data.body) {
                        for &statement in statements {
                            self.visit(statement);
                        }
                    } else {
                        self.visit(data.body);
                    }
                }
                self.leave_scope();
            }
            NodeKind::InterfaceDeclaration { .. } | NodeKind::TypeAliasDeclaration { .. } => {}

            NodeKind::ImportDeclaration(_) => {}
            NodeKind::ImportEqualsDeclaration(data) => {
                if data.is_type_only || data.is_require {
                    return;
                }
                // The alias always lowers to a `var` reading its
                // target, so the leftmost name is runtime-used no
                // matter what happens to the alias itself.
                self.resolve_entity_base(data.reference);
            }
            NodeKind::ExportDeclaration(data) => {
                // Re-exports and type-only clauses touch no local name.
                if data.is_type_only || data.is_star || data.module_specifier.is_some() {
                    return;
                }
                if data.export_clause.is_none() {
                    return;
                }
                let NodeKind::NamedExports { elements } = self.arena.kind(data.export_clause)
                else {
                    return;
                };
                for &specifier in elements {
                    let NodeKind::ExportSpecifier {
                        is_type_only,
                        property_name,
                        name,
                    } = self.arena.kind(specifier)
                    else {
                        continue;
                    };
                    if *is_type_only {
                        continue;
                    }
                    let local = if property_name.is_some() {
                        *property_name
                    } else {
                        *name
                    };
                    if local.is_some()
                        && let Some(text) = self.arena.identifier_text(local)
                    {
                        self.resolve_reference(local, text);
                    }
                }
            }
            NodeKind::NamespaceExportDeclaration { .. } => {}

            NodeKind::Block { statements, .. } => {
                let entered = self.reenter_scope(node);
                for &statement in statements {
                    self.visit(statement);
                }
                if entered {
                    self.leave_scope();
                }
            }
            NodeKind::ForStatement { .. }
            | NodeKind::ForInStatement { .. }
            | NodeKind::ForOfStatement { .. } => {
                let entered = self.reenter_scope(node);
                self.visit_children(node);
                if entered {
                    self.leave_scope();
                }
            }
            NodeKind::SwitchStatement {
                expression,
                clauses,
            } => {
                self.visit(*expression);
                let entered = self.reenter_scope(node);
                for &clause in clauses {
                    self.visit(clause);
                }
                if entered {
                    self.leave_scope();
                }
            }
            NodeKind::CatchClause {
                variable_declaration,
                block,
            } => {
                let entered = self.reenter_scope(node);
                if variable_declaration.is_some()
                    && let NodeKind::VariableDeclaration { name, .. } =
                        self.arena.kind(*variable_declaration)
                {
                    self.visit_binding_name(*name);
                }
                if block.is_some() {
                    self.visit(*block);
                }
                if entered {
                    self.leave_scope();
                }
            }

            NodeKind::LabeledStatement { statement, .. } => {
                if statement.is_some() {
                    self.visit(*statement);
                }
            }
            NodeKind::ContinueStatement { .. } | NodeKind::BreakStatement { .. } => {}

            NodeKind::JsxSelfClosingElement {
                tag_name,
                attributes,
                ..
            }
            | NodeKind::JsxOpeningElement {
                tag_name,
                attributes,
                ..
            } => {
                self.visit_jsx_tag(*tag_name);
                for &attribute in attributes {
                    self.visit(attribute);
                }
            }
            NodeKind::JsxClosingElement { tag_name } => self.visit_jsx_tag(*tag_name),
            NodeKind::JsxAttribute { initializer, .. } => {
                if initializer.is_some() {
                    self.visit(*initializer);
                }
            }

            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: NodeId) {
        fold::for_each_child(self.arena, node, &mut |child| self.visit(child));
    }

    /// Object and class member names reference nothing unless computed.
    fn visit_property_name(&mut self, name: NodeId) {
        if name.is_some() && matches!(self.arena.kind(name), NodeKind::ComputedPropertyName { .. })
        {
            self.visit(name);
        }
    }

    /// Pattern walk mirroring `declare_binding_name`: identifiers
    /// declare, computed keys and defaults reference.
    fn visit_binding_name(&mut self, name: NodeId) {
        if name.is_none() {
            return;
        }
        match self.arena.kind(name) {
            NodeKind::ObjectBindingPattern { elements }
            | NodeKind::ArrayBindingPattern { elements } => {
                for &element in elements {
                    if element.is_none() {
                        continue;
                    }
                    let NodeKind::BindingElement(data) = self.arena.kind(element) else {
                        continue;
                    };
                    self.visit_property_name(data.property_name);
                    self.visit_binding_name(data.name);
                    if data.initializer.is_some() {
                        self.visit(data.initializer);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_callable(&mut self, node: NodeId, data: &FunctionData) {
        for &decorator in &data.decorators {
            self.visit(decorator);
        }
        self.visit_property_name(data.name);
        let entered = self.reenter_scope(node);
        for &parameter in &data.parameters {
            let NodeKind::Parameter(parameter_data) = self.arena.kind(parameter) else {
                continue;
            };
            for &decorator in &parameter_data.decorators {
                self.visit(decorator);
            }
            self.visit_binding_name(parameter_data.name);
            if parameter_data.initializer.is_some() {
                self.visit(parameter_data.initializer);
            }
        }
        if data.body.is_some() {
            self.visit(data.body);
        }
        if entered {
            self.leave_scope();
        }
    }

    fn visit_class_parts(&mut self, data: &ClassData) {
        for &decorator in &data.decorators {
            self.visit(decorator);
        }
        if data.extends.is_some() {
            self.visit(data.extends);
        }
        for &member in &data.members {
            self.visit(member);
        }
    }

    /// Leftmost name of an entity reference (`a` in `a.b.c`), resolved
    /// and marked as runtime-used.
    fn resolve_entity_base(&mut self, reference: NodeId) {
        if reference.is_none() {
            return;
        }
        match self.arena.kind(reference) {
            NodeKind::Identifier { text } => self.resolve_reference(reference, text),
            NodeKind::QualifiedName { left, .. } => self.resolve_entity_base(*left),
            NodeKind::PropertyAccessExpression { expression, .. } => {
                self.resolve_entity_base(*expression)
            }
            _ => {}
        }
    }

    /// JSX tag in a value position. Lowercase-first identifiers name
    /// intrinsic elements, not bindings.
    fn visit_jsx_tag(&mut self, tag: NodeId) {
        if tag.is_none() {
            return;
        }
        match self.arena.kind(tag) {
            NodeKind::Identifier { text } => {
                if text.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
                    return;
                }
                self.resolve_reference(tag, text);
            }
            _ => self.visit(tag),
        }
    }
}
