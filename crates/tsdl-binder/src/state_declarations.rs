//! First binding pass: walk the tree, declare every symbol, and build
//! the scope structure the resolution pass re-enters.
//!
//! Ambient (`declare`) subtrees are skipped wholesale, so their names
//! stay unresolved and later rewrites leave references to them alone.
//! The one exception is `declare const enum`: its members must still be
//! evaluated, because reads of them are inlined.

use tsdl_parser::ast::{ClassData, EnumData, FunctionData, ImportData, ModuleData, fold};
use tsdl_parser::{NodeId, NodeKind, VarFlavor};

use crate::state::{BinderState, ContainerKind};
use crate::symbols::{ImportBinding, SymbolId, SymbolKind};

impl BinderState<'_> {
    pub(crate) fn declare_in(&mut self, node: NodeId) {
        match self.arena.kind(node) {
            NodeKind::VariableStatement {
                modifiers,
                declarations,
            } => {
                if modifiers.is_ambient() {
                    return;
                }
                self.declare_variable_list(*declarations, modifiers.is_exported());
            }
            // Reached directly from for-statement heads.
            NodeKind::VariableDeclarationList { .. } => {
                self.declare_variable_list(node, false);
            }

            NodeKind::FunctionDeclaration(data) => {
                if data.modifiers.is_ambient() {
                    return;
                }
                if data.name.is_some()
                    && let Some(text) = self.arena.identifier_text(data.name)
                    && !text.is_empty()
                {
                    self.declare_symbol(
                        text,
                        SymbolKind::Function,
                        node,
                        data.modifiers.is_exported(),
                    );
                }
                self.declare_callable(node, data, false);
            }
            NodeKind::FunctionExpression(data) | NodeKind::ArrowFunction(data) => {
                self.declare_callable(node, data, true);
            }
            NodeKind::MethodDeclaration(data)
            | NodeKind::ConstructorDeclaration(data)
            | NodeKind::GetAccessorDeclaration(data)
            | NodeKind::SetAccessorDeclaration(data) => {
                self.declare_callable(node, data, false);
            }

            NodeKind::ClassDeclaration(data) => {
                if data.modifiers.is_ambient() {
                    return;
                }
                if data.name.is_some()
                    && let Some(text) = self.arena.identifier_text(data.name)
                    && !text.is_empty()
                {
                    self.declare_symbol(
                        text,
                        SymbolKind::Class,
                        node,
                        data.modifiers.is_exported(),
                    );
                }
                self.declare_class_parts(data);
            }
            // A class expression's name is visible only inside it.
            NodeKind::ClassExpression(data) => {
                self.push_scope(ContainerKind::Class, node, SymbolId::NONE);
                if data.name.is_some()
                    && let Some(text) = self.arena.identifier_text(data.name)
                    && !text.is_empty()
                {
                    self.declare_symbol(text, SymbolKind::Class, node, false);
                }
                self.declare_class_parts(data);
                self.exit_scope();
            }
            NodeKind::ClassStaticBlockDeclaration { body } => {
                self.push_scope(ContainerKind::Function, node, SymbolId::NONE);
                if body.is_some() {
                    self.declare_in(*body);
                }
                self.exit_scope();
            }

            NodeKind::EnumDeclaration(data) => {
                if data.modifiers.is_ambient() && !data.is_const {
                    return;
                }
                self.declare_enum(node, data);
            }
            NodeKind::ModuleDeclaration(data) => {
                if data.modifiers.is_ambient() {
                    return;
                }
                self.declare_module(node, data);
            }
            NodeKind::InterfaceDeclaration { modifiers, name }
            | NodeKind::TypeAliasDeclaration { modifiers, name } => {
                if name.is_some()
                    && let Some(text) = self.arena.identifier_text(*name)
                    && !text.is_empty()
                {
                    self.declare_symbol(text, SymbolKind::TypeOnly, node, modifiers.is_exported());
                }
            }

            NodeKind::ImportDeclaration(data) => self.declare_import(node, data),
            NodeKind::ImportEqualsDeclaration(data) => {
                if data.is_type_only || data.name.is_none() {
                    return;
                }
                let Some(name) = self.arena.identifier_text(data.name) else {
                    return;
                };
                let kind = if data.is_require {
                    SymbolKind::Import(ImportBinding::EqualsRequire)
                } else {
                    SymbolKind::Alias
                };
                let id = self.declare_symbol(name, kind, node, data.modifiers.is_exported());
                self.symbols.get_mut(id).import_statement = node;
            }

            NodeKind::Block { .. }
            | NodeKind::ForStatement { .. }
            | NodeKind::ForInStatement { .. }
            | NodeKind::ForOfStatement { .. } => {
                self.push_scope(ContainerKind::Block, node, SymbolId::NONE);
                self.declare_children(node);
                self.exit_scope();
            }
            // The discriminant evaluates outside the case-block scope.
            NodeKind::SwitchStatement {
                expression,
                clauses,
            } => {
                self.declare_in(*expression);
                self.push_scope(ContainerKind::Block, node, SymbolId::NONE);
                for &clause in clauses {
                    self.declare_in(clause);
                }
                self.exit_scope();
            }
            NodeKind::CatchClause {
                variable_declaration,
                block,
            } => {
                self.push_scope(ContainerKind::Block, node, SymbolId::NONE);
                if variable_declaration.is_some()
                    && let NodeKind::VariableDeclaration { name, .. } =
                        self.arena.kind(*variable_declaration)
                {
                    self.declare_binding_name(*name, *variable_declaration, false, false);
                }
                if block.is_some() {
                    self.declare_in(*block);
                }
                self.exit_scope();
            }

            _ => self.declare_children(node),
        }
    }

    fn declare_children(&mut self, node: NodeId) {
        fold::for_each_child(self.arena, node, &mut |child| self.declare_in(child));
    }

    fn declare_variable_list(&mut self, list: NodeId, is_exported: bool) {
        let NodeKind::VariableDeclarationList {
            flavor,
            declarations,
        } = self.arena.kind(list)
        else {
            return;
        };
        let hoist = matches!(flavor, VarFlavor::Var);
        for &declaration in declarations {
            let NodeKind::VariableDeclaration {
                name, initializer, ..
            } = self.arena.kind(declaration)
            else {
                continue;
            };
            self.declare_binding_name(*name, declaration, hoist, is_exported);
            if initializer.is_some() {
                self.declare_in(*initializer);
            }
        }
    }

    /// Declare one binding name: a plain identifier, or every element
    /// of a destructuring pattern. Identifiers at the top of a
    /// declarator are keyed by the declarator node; identifiers nested
    /// in patterns are keyed by themselves.
    pub(crate) fn declare_binding_name(
        &mut self,
        name: NodeId,
        declaration: NodeId,
        hoist: bool,
        is_exported: bool,
    ) {
        if name.is_none() {
            return;
        }
        match self.arena.kind(name) {
            NodeKind::Identifier { text } => {
                if text.is_empty() {
                    return;
                }
                if hoist {
                    self.declare_hoisted_symbol(text, declaration, is_exported);
                } else {
                    self.declare_symbol(text, SymbolKind::Var, declaration, is_exported);
                }
            }
            NodeKind::ObjectBindingPattern { elements }
            | NodeKind::ArrayBindingPattern { elements } => {
                for &element in elements {
                    if element.is_none() {
                        continue;
                    }
                    let NodeKind::BindingElement(data) = self.arena.kind(element) else {
                        continue;
                    };
                    if data.property_name.is_some()
                        && matches!(
                            self.arena.kind(data.property_name),
                            NodeKind::ComputedPropertyName { .. }
                        )
                    {
                        self.declare_in(data.property_name);
                    }
                    self.declare_binding_name(data.name, data.name, hoist, is_exported);
                    if data.initializer.is_some() {
                        self.declare_in(data.initializer);
                    }
                }
            }
            _ => {}
        }
    }

    /// Shared tail for every function-like node: decorators and a
    /// computed name evaluate in the enclosing scope, then parameters
    /// and body bind inside a fresh function scope. Function
    /// expressions additionally bind their own name inside it.
    fn declare_callable(&mut self, node: NodeId, data: &FunctionData, bind_own_name: bool) {
        for &decorator in &data.decorators {
            self.declare_in(decorator);
        }
        if data.name.is_some()
            && matches!(
                self.arena.kind(data.name),
                NodeKind::ComputedPropertyName { .. }
            )
        {
            self.declare_in(data.name);
        }
        self.push_scope(ContainerKind::Function, node, SymbolId::NONE);
        if bind_own_name
            && data.name.is_some()
            && let Some(text) = self.arena.identifier_text(data.name)
            && !text.is_empty()
        {
            self.declare_symbol(text, SymbolKind::Function, node, false);
        }
        for &parameter in &data.parameters {
            self.declare_parameter(parameter);
        }
        if data.body.is_some() {
            self.declare_in(data.body);
        }
        self.exit_scope();
    }

    fn declare_parameter(&mut self, parameter: NodeId) {
        let NodeKind::Parameter(data) = self.arena.kind(parameter) else {
            return;
        };
        for &decorator in &data.decorators {
            self.declare_in(decorator);
        }
        self.declare_binding_name(data.name, parameter, false, false);
        if data.initializer.is_some() {
            self.declare_in(data.initializer);
        }
    }

    fn declare_class_parts(&mut self, data: &ClassData) {
        for &decorator in &data.decorators {
            self.declare_in(decorator);
        }
        if data.extends.is_some() {
            self.declare_in(data.extends);
        }
        for &member in &data.members {
            self.declare_in(member);
        }
    }

    fn declare_enum(&mut self, node: NodeId, data: &EnumData) {
        if data.name.is_none() {
            return;
        }
        let Some(name) = self.arena.declared_name_text(data.name) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        let kind = if data.is_const {
            SymbolKind::ConstEnum
        } else {
            SymbolKind::Enum
        };
        let symbol = self.declare_symbol(name, kind, node, data.modifiers.is_exported());
        self.push_scope(ContainerKind::Enum, node, symbol);
        for &member in &data.members {
            let NodeKind::EnumMember { name, initializer } = self.arena.kind(member) else {
                continue;
            };
            if name.is_some()
                && let Some(text) = self.arena.declared_name_text(*name)
            {
                self.declare_symbol(text, SymbolKind::EnumMember, member, false);
            }
            if initializer.is_some() {
                self.declare_in(*initializer);
            }
        }
        self.exit_scope();
    }

    fn declare_module(&mut self, node: NodeId, data: &ModuleData) {
        // String-named modules are ambient by nature; never bound.
        if data.name.is_none() {
            return;
        }
        let Some(name) = self.arena.identifier_text(data.name) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        let symbol =
            self.declare_symbol(name, SymbolKind::Namespace, node, data.modifiers.is_exported());
        self.push_scope(ContainerKind::Module, node, symbol);
        if data.body.is_some() {
            if let NodeKind::ModuleBlock { statements } = self.arena.kind(data.body) {
                for &statement in statements {
                    self.declare_in(statement);
                }
            } else {
                // `namespace a.b` nests; the inner declaration carries
                // an implicit export modifier from the parser.
                self.declare_in(data.body);
            }
        }
        self.exit_scope();
    }

    fn declare_import(&mut self, node: NodeId, data: &ImportData) {
        if data.import_clause.is_none() {
            return;
        }
        let NodeKind::ImportClause {
            is_type_only,
            name,
            named_bindings,
        } = self.arena.kind(data.import_clause)
        else {
            return;
        };
        if *is_type_only {
            return;
        }
        if name.is_some()
            && let Some(text) = self.arena.identifier_text(*name)
        {
            let id =
                self.declare_symbol(text, SymbolKind::Import(ImportBinding::Default), *name, false);
            self.symbols.get_mut(id).import_statement = node;
        }
        if named_bindings.is_none() {
            return;
        }
        match self.arena.kind(*named_bindings) {
            NodeKind::NamespaceImport { name } => {
                if name.is_some()
                    && let Some(text) = self.arena.identifier_text(*name)
                {
                    let id = self.declare_symbol(
                        text,
                        SymbolKind::Import(ImportBinding::Namespace),
                        *named_bindings,
                        false,
                    );
                    self.symbols.get_mut(id).import_statement = node;
                }
            }
            NodeKind::NamedImports { elements } => {
                for &specifier in elements {
                    let NodeKind::ImportSpecifier {
                        is_type_only,
                        property_name,
                        name,
                    } = self.arena.kind(specifier)
                    else {
                        continue;
                    };
                    if *is_type_only || name.is_none() {
                        continue;
                    }
                    let Some(local) = self.arena.identifier_text(*name) else {
                        continue;
                    };
                    let property = if property_name.is_some() {
                        self.arena
                            .declared_name_text(*property_name)
                            .unwrap_or(local)
                    } else {
                        local
                    };
                    let binding = ImportBinding::Named {
                        property: property.to_string(),
                    };
                    let id =
                        self.declare_symbol(local, SymbolKind::Import(binding), specifier, false);
                    self.symbols.get_mut(id).import_statement = node;
                }
            }
            _ => {}
        }
    }
}
