//! Module-format lowering.
//!
//! CommonJS output rewrites the whole top level: imports become
//! `require` temps, exported declarations publish onto `exports`, and
//! every read of an exported or imported binding is substituted with
//! the qualified access. ESM output leaves the syntax alone and only
//! elides bindings that were never read as values. Scripts skip all of
//! this and just run the statement lowering.

use rustc_hash::FxHashSet;
use tsdl_binder::{FileBinding, ImportBinding, SymbolId, SymbolKind};
use tsdl_common::diagnostics::{Diagnostic, codes};
use tsdl_parser::ast::{FunctionData, ParameterData};
use tsdl_parser::{ModifierFlags, NodeArena, NodeId, NodeKind, SyntaxKind, VarFlavor};

use crate::context::EmitContext;
use crate::transforms::{self, Mount, class_fields, enums, erase, namespaces, substitute};

/// Script files: no module wrapper, just statement lowering.
pub(crate) fn lower_plain(cx: &mut EmitContext, arena: &mut NodeArena, root: NodeId) {
    let statements = source_statements(arena, root);
    let mut out = Vec::with_capacity(statements.len());
    transforms::lower_statements(cx, arena, &statements, &mut out);
    set_source_statements(arena, root, out);
}

// =============================================================================
// CommonJS
// =============================================================================

pub(crate) fn lower_commonjs(cx: &mut EmitContext, arena: &mut NodeArena, root: NodeId) {
    let statements = source_statements(arena, root);
    let mut body = Vec::with_capacity(statements.len());
    // Export binding names in declaration order, for the void preamble.
    let mut exported_names: Vec<String> = Vec::new();
    // Hoisted function exports: (exported name, local name).
    let mut hoisted: Vec<(String, String)> = Vec::new();
    let mut uses_export_star = false;
    let mut export_equals = false;

    for (index, &statement) in statements.iter().enumerate() {
        if index == 0 && is_use_strict(arena, statement) {
            // Ours leads the output; don't print it twice.
            continue;
        }
        if erase::erases_statement(arena, statement) {
            continue;
        }
        match &arena.get(statement).kind {
            NodeKind::ImportDeclaration(data) => {
                let clause = data.import_clause;
                let specifier = data.module_specifier;
                lower_cjs_import(cx, arena, statement, clause, specifier, &mut body);
            }
            NodeKind::ImportEqualsDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let is_require = data.is_require;
                let reference = data.reference;
                let Some(name) = arena.declared_name_text(data.name).map(str::to_string) else {
                    continue;
                };
                if is_require {
                    if !exported && !alias_used(cx.binding, statement) {
                        continue;
                    }
                    let require = arena.synth_identifier("require");
                    let call = arena.synth_call(require, vec![reference]);
                    body.push(arena.synth_var_statement(
                        statement,
                        ModifierFlags::empty(),
                        VarFlavor::Const,
                        &name,
                        call,
                    ));
                } else {
                    transforms::note_unexported_alias_target(cx, arena, reference);
                    body.push(arena.synth_var_statement(
                        statement,
                        ModifierFlags::empty(),
                        VarFlavor::Var,
                        &name,
                        reference,
                    ));
                }
                if exported {
                    let value = arena.synth_identifier(&name);
                    body.push(exports_assignment(arena, &name, value, NodeId::NONE));
                    exported_names.push(name);
                }
            }
            NodeKind::VariableStatement {
                modifiers,
                declarations,
            } => {
                let declarations = *declarations;
                if modifiers.is_exported() {
                    lower_exported_cjs_variables(
                        cx,
                        arena,
                        statement,
                        declarations,
                        &mut body,
                        &mut exported_names,
                    );
                } else {
                    body.push(transforms::lower_node(cx, arena, statement));
                }
            }
            NodeKind::FunctionDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let default = data.modifiers.contains(ModifierFlags::DEFAULT);
                let name = arena.declared_name_text(data.name).map(str::to_string);
                let lowered = transforms::lower_node(cx, arena, statement);
                if exported {
                    let local = match name {
                        Some(name) => name,
                        None => name_anonymous_default(cx, arena, lowered),
                    };
                    let exported_as = if default { "default".to_string() } else { local.clone() };
                    hoisted.push((exported_as, local));
                    transforms::strip_export_modifiers(arena, lowered);
                }
                body.push(lowered);
            }
            NodeKind::ClassDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let default = data.modifiers.contains(ModifierFlags::DEFAULT);
                let name = arena.declared_name_text(data.name).map(str::to_string);
                // Name anonymous defaults before lowering so extracted
                // statics have a binding to hang off.
                let local = if exported {
                    Some(match name {
                        Some(name) => name,
                        None => name_anonymous_default(cx, arena, statement),
                    })
                } else {
                    None
                };
                let mut class_out = Vec::new();
                class_fields::lower_class_statement(cx, arena, statement, &mut class_out);
                if let Some(local) = local {
                    if let Some(&declaration) = class_out.first() {
                        transforms::strip_export_modifiers(arena, declaration);
                    }
                    body.append(&mut class_out);
                    let exported_as = if default { "default".to_string() } else { local.clone() };
                    let value = arena.synth_identifier(&local);
                    body.push(exports_assignment(arena, &exported_as, value, NodeId::NONE));
                    exported_names.push(exported_as);
                } else {
                    body.append(&mut class_out);
                }
            }
            NodeKind::EnumDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let name = arena.declared_name_text(data.name).map(str::to_string);
                let mount = if exported { Mount::CjsExport } else { Mount::Local };
                let emitted = enums::lower_enum(cx, arena, statement, mount, &mut body);
                if emitted
                    && exported
                    && let Some(name) = name
                {
                    exported_names.push(name);
                }
            }
            NodeKind::ModuleDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let name = arena.declared_name_text(data.name).map(str::to_string);
                let mount = if exported { Mount::CjsExport } else { Mount::Local };
                let emitted = namespaces::lower_namespace(cx, arena, statement, mount, &mut body);
                if emitted
                    && exported
                    && let Some(name) = name
                {
                    exported_names.push(name);
                }
            }
            NodeKind::ExportAssignment {
                is_export_equals,
                expression,
            } => {
                let is_equals = *is_export_equals;
                let expression = *expression;
                let value = transforms::lower_node(cx, arena, expression);
                if is_equals {
                    export_equals = true;
                    let module = arena.synth_identifier("module");
                    let target = arena.synth_prop_access(module, "exports");
                    let assign = arena.synth_assign(target, value);
                    body.push(arena.synth_expression_statement_for(statement, assign));
                } else {
                    body.push(exports_assignment(arena, "default", value, statement));
                    exported_names.push("default".to_string());
                }
            }
            NodeKind::ExportDeclaration(data) => {
                if data.is_type_only {
                    continue;
                }
                let is_star = data.is_star;
                let clause = data.export_clause;
                let specifier = data.module_specifier;
                lower_cjs_export_declaration(
                    cx,
                    arena,
                    root,
                    statement,
                    is_star,
                    clause,
                    specifier,
                    &mut body,
                    &mut exported_names,
                    &mut uses_export_star,
                );
            }
            _ => transforms::lower_statement(cx, arena, statement, &mut body),
        }
    }

    let binding = cx.binding;
    let temps = &cx.module_temps;
    for &statement in &body {
        substitute::rewrite_references(arena, statement, true, &|node| {
            let referenced = binding.reference(node)?;
            cjs_symbol_rewrite(binding, temps, root, referenced)
        });
    }

    let mut assembled = Vec::with_capacity(body.len() + 4);
    assembled.push(use_strict_prologue(arena));
    if !export_equals {
        assembled.push(es_module_marker(arena));
        let preamble: Vec<String> = dedup_names(exported_names);
        if !preamble.is_empty() {
            assembled.push(void_preamble(arena, &preamble));
        }
        if uses_export_star {
            assembled.push(export_star_helper(arena));
        }
        for (exported_as, local) in &hoisted {
            let value = arena.synth_identifier(local);
            assembled.push(exports_assignment(arena, exported_as, value, NodeId::NONE));
        }
    }
    assembled.extend(body);
    set_source_statements(arena, root, assembled);
}

fn lower_cjs_import(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    clause: NodeId,
    specifier: NodeId,
    body: &mut Vec<NodeId>,
) {
    if clause.is_none() {
        // Side-effect import keeps the require call alone.
        let require = arena.synth_identifier("require");
        let call = arena.synth_call(require, vec![specifier]);
        body.push(arena.synth_expression_statement_for(statement, call));
        return;
    }
    if !import_clause_used(cx.binding, arena, clause) {
        return;
    }
    let stem = arena
        .string_value(specifier)
        .map(EmitContext::module_temp_stem)
        .unwrap_or_else(|| "module".to_string());
    let temp = cx.unique_name(&stem);
    cx.module_temps.insert(statement, temp.clone());
    let require = arena.synth_identifier("require");
    let call = arena.synth_call(require, vec![specifier]);
    body.push(arena.synth_var_statement(
        statement,
        ModifierFlags::empty(),
        VarFlavor::Const,
        &temp,
        call,
    ));
    tracing::trace!(temp = %temp, "require temp");
}

/// Whether any binding of an import clause was read as a value.
fn import_clause_used(binding: &FileBinding, arena: &NodeArena, clause: NodeId) -> bool {
    let NodeKind::ImportClause {
        is_type_only,
        name,
        named_bindings,
    } = &arena.get(clause).kind
    else {
        return false;
    };
    if *is_type_only {
        return false;
    }
    if name.is_some() && binding.import_used(*name) {
        return true;
    }
    if named_bindings.is_none() {
        return false;
    }
    match &arena.get(*named_bindings).kind {
        NodeKind::NamespaceImport { .. } => binding.import_used(*named_bindings),
        NodeKind::NamedImports { elements } => elements.iter().any(|&element| {
            matches!(
                &arena.get(element).kind,
                NodeKind::ImportSpecifier { is_type_only: false, .. }
            ) && binding.import_used(element)
        }),
        _ => false,
    }
}

fn alias_used(binding: &FileBinding, statement: NodeId) -> bool {
    binding
        .symbol_of(statement)
        .is_some_and(|id| binding.symbol(id).value_referenced)
}

/// Give an anonymous `export default` declaration a local name so the
/// export assignment has something to reference.
fn name_anonymous_default(cx: &mut EmitContext, arena: &mut NodeArena, declaration: NodeId) -> String {
    let local = cx.unique_name("default");
    let name = arena.synth_identifier(&local);
    match &mut arena.get_mut(declaration).kind {
        NodeKind::FunctionDeclaration(data) => data.name = name,
        NodeKind::ClassDeclaration(data) => data.name = name,
        _ => {}
    }
    local
}

/// `export var a = 1, b = f();` collapses to `exports.a = 1;` and
/// `exports.b = f();`. Declarators whose initializer is a function,
/// arrow, or class expression keep the local declaration so the value
/// gets its name inferred, publishing afterwards; binding patterns keep
/// the declaration and copy each bound name.
fn lower_exported_cjs_variables(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    declarations: NodeId,
    body: &mut Vec<NodeId>,
    exported_names: &mut Vec<String>,
) {
    let NodeKind::VariableDeclarationList {
        declarations: declarators,
        ..
    } = &arena.get(declarations).kind
    else {
        return;
    };
    let declarators = declarators.clone();
    let mut names = Vec::new();
    for &declarator in &declarators {
        if let NodeKind::VariableDeclaration { name, .. } = &arena.get(declarator).kind {
            transforms::collect_bound_names(arena, *name, &mut names);
        }
    }
    exported_names.extend(names.iter().cloned());

    let collapsible = declarators.iter().all(|&declarator| {
        let NodeKind::VariableDeclaration {
            name, initializer, ..
        } = &arena.get(declarator).kind
        else {
            return true;
        };
        matches!(arena.get(*name).kind, NodeKind::Identifier { .. })
            && (initializer.is_none() || !keeps_local_binding(arena, *initializer))
    });
    if collapsible {
        let mut first = true;
        for &declarator in &declarators {
            let NodeKind::VariableDeclaration {
                name, initializer, ..
            } = &arena.get(declarator).kind
            else {
                continue;
            };
            let initializer = *initializer;
            let Some(name) = arena.identifier_text(*name).map(str::to_string) else {
                continue;
            };
            if initializer.is_none() {
                // `export var a;` only reaches the void preamble.
                continue;
            }
            let value = transforms::lower_node(cx, arena, initializer);
            let original = if first { statement } else { declarator };
            body.push(exports_assignment(arena, &name, value, original));
            first = false;
        }
    } else {
        let lowered = transforms::lower_node(cx, arena, statement);
        transforms::strip_export_modifiers(arena, lowered);
        body.push(lowered);
        for name in names {
            let value = arena.synth_identifier(&name);
            body.push(exports_assignment(arena, &name, value, NodeId::NONE));
        }
    }
}

fn keeps_local_binding(arena: &NodeArena, initializer: NodeId) -> bool {
    matches!(
        arena.get(initializer).kind,
        NodeKind::FunctionExpression(_) | NodeKind::ArrowFunction(_) | NodeKind::ClassExpression(_)
    )
}

#[allow(clippy::too_many_arguments)]
fn lower_cjs_export_declaration(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    root: NodeId,
    statement: NodeId,
    is_star: bool,
    clause: NodeId,
    specifier: NodeId,
    body: &mut Vec<NodeId>,
    exported_names: &mut Vec<String>,
    uses_export_star: &mut bool,
) {
    if is_star && clause.is_none() {
        // export * from "m"
        *uses_export_star = true;
        let helper = arena.synth_identifier("__export");
        let require = arena.synth_identifier("require");
        let call = arena.synth_call(require, vec![specifier]);
        let invoke = arena.synth_call(helper, vec![call]);
        body.push(arena.synth_expression_statement_for(statement, invoke));
        return;
    }
    if is_star {
        // export * as ns from "m"
        let NodeKind::NamespaceExport { name } = &arena.get(clause).kind else {
            return;
        };
        let Some(name) = arena.identifier_text(*name).map(str::to_string) else {
            return;
        };
        let require = arena.synth_identifier("require");
        let call = arena.synth_call(require, vec![specifier]);
        body.push(exports_assignment(arena, &name, call, statement));
        exported_names.push(name);
        return;
    }
    if clause.is_none() {
        return;
    }
    let NodeKind::NamedExports { elements } = &arena.get(clause).kind else {
        return;
    };
    let elements = elements.clone();
    if specifier.is_some() {
        // Re-export: pull the module in and copy each name over.
        let stem = arena
            .string_value(specifier)
            .map(EmitContext::module_temp_stem)
            .unwrap_or_else(|| "module".to_string());
        let temp = cx.unique_name(&stem);
        let require = arena.synth_identifier("require");
        let call = arena.synth_call(require, vec![specifier]);
        body.push(arena.synth_var_statement(
            statement,
            ModifierFlags::empty(),
            VarFlavor::Const,
            &temp,
            call,
        ));
        for &element in &elements {
            let NodeKind::ExportSpecifier {
                is_type_only: false,
                property_name,
                name,
            } = &arena.get(element).kind
            else {
                continue;
            };
            let property_name = *property_name;
            let Some(exported_as) = arena.identifier_text(*name).map(str::to_string) else {
                continue;
            };
            let property = if property_name.is_some() {
                arena
                    .identifier_text(property_name)
                    .unwrap_or(&exported_as)
                    .to_string()
            } else {
                exported_as.clone()
            };
            let base = arena.synth_identifier(&temp);
            let value = arena.synth_prop_access(base, &property);
            body.push(exports_assignment(arena, &exported_as, value, NodeId::NONE));
            exported_names.push(exported_as);
        }
        return;
    }
    // Local export list: exports.c = a; resolved through the symbol so
    // imported or exported locals publish their rewritten form.
    for &element in &elements {
        let NodeKind::ExportSpecifier {
            is_type_only: false,
            property_name,
            name,
        } = &arena.get(element).kind
        else {
            continue;
        };
        let local_node = if property_name.is_some() {
            *property_name
        } else {
            *name
        };
        let Some(exported_as) = arena.identifier_text(*name).map(str::to_string) else {
            continue;
        };
        let Some(local_text) = arena.identifier_text(local_node).map(str::to_string) else {
            continue;
        };
        let referenced = cx.binding.reference(local_node);
        if referenced
            .is_some_and(|id| !cx.binding.symbol(id).kind.is_value())
        {
            continue;
        }
        let value = arena.synth_identifier(&local_text);
        if let Some(rewrite) =
            referenced.and_then(|id| cjs_symbol_rewrite(cx.binding, &cx.module_temps, root, id))
        {
            substitute::apply(arena, value, rewrite);
        }
        body.push(exports_assignment(arena, &exported_as, value, NodeId::NONE));
        exported_names.push(exported_as);
    }
}

/// The one rewrite decision for CommonJS reads: imported bindings read
/// through their module temp, exported top-level vars and aliases read
/// through `exports`.
fn cjs_symbol_rewrite(
    binding: &FileBinding,
    temps: &rustc_hash::FxHashMap<NodeId, String>,
    root: NodeId,
    symbol_id: SymbolId,
) -> Option<substitute::Rewrite> {
    let symbol = binding.symbol(symbol_id);
    match &symbol.kind {
        SymbolKind::Import(import) => {
            let temp = temps.get(&symbol.import_statement)?;
            match import {
                ImportBinding::Default => Some(substitute::Rewrite::Property {
                    object: temp.clone(),
                    property: "default".to_string(),
                }),
                ImportBinding::Namespace => Some(substitute::Rewrite::Name(temp.clone())),
                ImportBinding::Named { property } => Some(substitute::Rewrite::Property {
                    object: temp.clone(),
                    property: property.clone(),
                }),
                // `import x = require(...)` keeps its local binding.
                ImportBinding::EqualsRequire => None,
            }
        }
        SymbolKind::Var | SymbolKind::Alias => {
            if symbol.is_exported && symbol.declared_in(root) {
                Some(substitute::Rewrite::Property {
                    object: "exports".to_string(),
                    property: symbol.name.clone(),
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

// =============================================================================
// ESM
// =============================================================================

pub(crate) fn lower_esnext(cx: &mut EmitContext, arena: &mut NodeArena, root: NodeId) {
    let statements = source_statements(arena, root);
    let mut body = Vec::with_capacity(statements.len());
    let mut has_module_syntax = false;

    for &statement in &statements {
        if erase::erases_statement(arena, statement) {
            continue;
        }
        match &arena.get(statement).kind {
            NodeKind::ImportDeclaration(data) => {
                if data.import_clause.is_none() {
                    has_module_syntax = true;
                    body.push(statement);
                    continue;
                }
                let clause = data.import_clause;
                if prune_import_clause(cx, arena, clause) {
                    has_module_syntax = true;
                    body.push(statement);
                }
            }
            NodeKind::ImportEqualsDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let is_require = data.is_require;
                let reference = data.reference;
                let span = arena.get(statement).span;
                let Some(name) = arena.declared_name_text(data.name).map(str::to_string) else {
                    continue;
                };
                let initializer = if is_require {
                    cx.diagnostics.push(Diagnostic::error(
                        span,
                        codes::IMPORT_ASSIGNMENT_IN_ESM,
                        "Import assignment cannot be used when targeting ECMAScript modules. \
                         Consider using 'import * as ns from \"mod\"' instead.",
                    ));
                    let require = arena.synth_identifier("require");
                    arena.synth_call(require, vec![reference])
                } else {
                    transforms::note_unexported_alias_target(cx, arena, reference);
                    reference
                };
                let modifiers = if exported {
                    ModifierFlags::EXPORT
                } else {
                    ModifierFlags::empty()
                };
                body.push(arena.synth_var_statement(
                    statement,
                    modifiers,
                    VarFlavor::Var,
                    &name,
                    initializer,
                ));
                has_module_syntax |= exported;
            }
            NodeKind::ExportDeclaration(data) => {
                if data.is_type_only {
                    continue;
                }
                if prune_export_declaration(cx, arena, statement) {
                    has_module_syntax = true;
                    body.push(statement);
                }
            }
            NodeKind::ExportAssignment {
                is_export_equals,
                expression,
            } => {
                let is_equals = *is_export_equals;
                let expression = *expression;
                let span = arena.get(statement).span;
                let value = transforms::lower_node(cx, arena, expression);
                if is_equals {
                    cx.diagnostics.push(Diagnostic::error(
                        span,
                        codes::EXPORT_ASSIGNMENT_IN_ESM,
                        "Export assignment cannot be used when targeting ECMAScript modules. \
                         Consider using 'export default' instead.",
                    ));
                    let module = arena.synth_identifier("module");
                    let target = arena.synth_prop_access(module, "exports");
                    let assign = arena.synth_assign(target, value);
                    body.push(arena.synth_expression_statement_for(statement, assign));
                    has_module_syntax = true;
                } else {
                    if let NodeKind::ExportAssignment { expression, .. } =
                        &mut arena.get_mut(statement).kind
                    {
                        *expression = value;
                    }
                    has_module_syntax = true;
                    body.push(statement);
                }
            }
            NodeKind::EnumDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let mount = if exported { Mount::EsmExport } else { Mount::Local };
                let emitted = enums::lower_enum(cx, arena, statement, mount, &mut body);
                has_module_syntax |= emitted && exported;
            }
            NodeKind::ModuleDeclaration(data) => {
                let exported = data.modifiers.is_exported();
                let mount = if exported { Mount::EsmExport } else { Mount::Local };
                let emitted = namespaces::lower_namespace(cx, arena, statement, mount, &mut body);
                has_module_syntax |= emitted && exported;
            }
            NodeKind::ClassDeclaration(data) => {
                has_module_syntax |= data.modifiers.is_exported();
                class_fields::lower_class_statement(cx, arena, statement, &mut body);
            }
            kind => {
                if let Some(modifiers) = tsdl_parser::ast::modifiers_of(kind) {
                    has_module_syntax |= modifiers.is_exported();
                }
                transforms::lower_statement(cx, arena, statement, &mut body);
            }
        }
    }

    if !has_module_syntax {
        // Every import and export was elided; keep the file a module.
        body.push(export_empty(arena));
    }
    set_source_statements(arena, root, body);
}

/// Drop unused bindings from an import clause in place. Returns false
/// when nothing is left and the whole statement goes away.
fn prune_import_clause(cx: &EmitContext, arena: &mut NodeArena, clause: NodeId) -> bool {
    let NodeKind::ImportClause {
        is_type_only,
        name,
        named_bindings,
    } = &arena.get(clause).kind
    else {
        return false;
    };
    if *is_type_only {
        return false;
    }
    let name = *name;
    let named = *named_bindings;
    let keep_default = name.is_some() && cx.binding.import_used(name);
    let kept_named = if named.is_none() {
        None
    } else {
        match &arena.get(named).kind {
            NodeKind::NamespaceImport { .. } => cx.binding.import_used(named).then_some(named),
            NodeKind::NamedImports { elements } => {
                let elements = elements.clone();
                let kept: Vec<NodeId> = elements
                    .iter()
                    .copied()
                    .filter(|&element| {
                        matches!(
                            &arena.get(element).kind,
                            NodeKind::ImportSpecifier { is_type_only: false, .. }
                        ) && cx.binding.import_used(element)
                    })
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    if kept.len() != elements.len()
                        && let NodeKind::NamedImports { elements } = &mut arena.get_mut(named).kind
                    {
                        *elements = kept;
                    }
                    Some(named)
                }
            }
            _ => None,
        }
    };
    if !keep_default && kept_named.is_none() {
        return false;
    }
    if let NodeKind::ImportClause {
        name,
        named_bindings,
        ..
    } = &mut arena.get_mut(clause).kind
    {
        if !keep_default {
            *name = NodeId::NONE;
        }
        *named_bindings = kept_named.unwrap_or(NodeId::NONE);
    }
    true
}

/// Prune type-only specifiers from an export declaration in place.
/// Returns false when the statement has nothing left to say.
fn prune_export_declaration(cx: &EmitContext, arena: &mut NodeArena, statement: NodeId) -> bool {
    let NodeKind::ExportDeclaration(data) = &arena.get(statement).kind else {
        return false;
    };
    if data.is_star {
        return true;
    }
    let clause = data.export_clause;
    let is_reexport = data.module_specifier.is_some();
    if clause.is_none() {
        return false;
    }
    let NodeKind::NamedExports { elements } = &arena.get(clause).kind else {
        return false;
    };
    if elements.is_empty() {
        // A written `export {};` stays; it marks the file a module.
        return true;
    }
    let elements = elements.clone();
    let kept: Vec<NodeId> = elements
        .iter()
        .copied()
        .filter(|&element| {
            let NodeKind::ExportSpecifier {
                is_type_only,
                property_name,
                name,
            } = &arena.get(element).kind
            else {
                return false;
            };
            if *is_type_only {
                return false;
            }
            if is_reexport {
                // Names live in the other module; nothing to resolve.
                return true;
            }
            let local = if property_name.is_some() {
                *property_name
            } else {
                *name
            };
            cx.binding
                .reference(local)
                .is_none_or(|id| cx.binding.symbol(id).kind.is_value())
        })
        .collect();
    if kept.is_empty() {
        return false;
    }
    if kept.len() != elements.len()
        && let NodeKind::NamedExports { elements } = &mut arena.get_mut(clause).kind
    {
        *elements = kept;
    }
    true
}

fn export_empty(arena: &mut NodeArena) -> NodeId {
    let clause = arena.synth(
        NodeId::NONE,
        NodeKind::NamedExports {
            elements: Vec::new(),
        },
    );
    arena.synth(
        NodeId::NONE,
        NodeKind::ExportDeclaration(Box::new(tsdl_parser::ast::ExportData {
            is_type_only: false,
            is_star: false,
            export_clause: clause,
            module_specifier: NodeId::NONE,
        })),
    )
}

// =============================================================================
// Shared pieces
// =============================================================================

/// `import(m)` becomes `Promise.resolve().then(() => require(m))`.
pub(crate) fn lower_dynamic_import(
    arena: &mut NodeArena,
    node: NodeId,
    arguments: Vec<NodeId>,
) -> NodeId {
    let specifier = arguments.into_iter().next();
    let require = arena.synth_identifier("require");
    let require_call = match specifier {
        Some(argument) => arena.synth_call(require, vec![argument]),
        None => arena.synth_call(require, Vec::new()),
    };
    let arrow = arena.synth(
        NodeId::NONE,
        NodeKind::ArrowFunction(Box::new(FunctionData {
            modifiers: ModifierFlags::empty(),
            decorators: Vec::new(),
            asterisk: false,
            name: NodeId::NONE,
            question: false,
            type_parameters: NodeId::NONE,
            parameters: Vec::new(),
            return_type: NodeId::NONE,
            body: require_call,
            is_arrow_expression_body: true,
            parenthesized_parameters: true,
        })),
    );
    let promise = arena.synth_identifier("Promise");
    let resolve = arena.synth_prop_access(promise, "resolve");
    let resolved = arena.synth_call(resolve, Vec::new());
    let then = arena.synth_prop_access(resolved, "then");
    let chained = arena.synth_call(then, vec![arrow]);
    arena.get_mut(chained).original = node;
    chained
}

/// Statement-position `import x = ...` inside function bodies and
/// blocks, where no export surface is involved.
pub(crate) fn lower_import_equals(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    out: &mut Vec<NodeId>,
) {
    let NodeKind::ImportEqualsDeclaration(data) = &arena.get(statement).kind else {
        return;
    };
    let is_require = data.is_require;
    let reference = data.reference;
    let Some(name) = arena.declared_name_text(data.name).map(str::to_string) else {
        return;
    };
    if !is_require {
        transforms::note_unexported_alias_target(cx, arena, reference);
    }
    let initializer = if is_require {
        let require = arena.synth_identifier("require");
        arena.synth_call(require, vec![reference])
    } else {
        reference
    };
    out.push(arena.synth_var_statement(
        statement,
        ModifierFlags::empty(),
        VarFlavor::Var,
        &name,
        initializer,
    ));
}

fn source_statements(arena: &NodeArena, root: NodeId) -> Vec<NodeId> {
    match &arena.get(root).kind {
        NodeKind::SourceFile(data) => data.statements.clone(),
        _ => Vec::new(),
    }
}

fn set_source_statements(arena: &mut NodeArena, root: NodeId, statements: Vec<NodeId>) {
    if let NodeKind::SourceFile(data) = &mut arena.get_mut(root).kind {
        data.statements = statements;
    }
}

fn is_use_strict(arena: &NodeArena, statement: NodeId) -> bool {
    let NodeKind::ExpressionStatement { expression } = &arena.get(statement).kind else {
        return false;
    };
    matches!(
        &arena.get(*expression).kind,
        NodeKind::StringLiteral { value, .. } if value == "use strict"
    )
}

fn use_strict_prologue(arena: &mut NodeArena) -> NodeId {
    let literal = arena.synth(
        NodeId::NONE,
        NodeKind::StringLiteral {
            raw: "\"use strict\"".to_string(),
            value: "use strict".to_string(),
        },
    );
    arena.synth_expression_statement(literal)
}

/// `Object.defineProperty(exports, "__esModule", { value: true });`
fn es_module_marker(arena: &mut NodeArena) -> NodeId {
    let object = arena.synth_identifier("Object");
    let define = arena.synth_prop_access(object, "defineProperty");
    let exports = arena.synth_identifier("exports");
    let key = arena.synth_string("__esModule");
    let value_name = arena.synth_identifier("value");
    let value = arena.synth(NodeId::NONE, NodeKind::BooleanLiteral { value: true });
    let property = arena.synth(
        NodeId::NONE,
        NodeKind::PropertyAssignment {
            name: value_name,
            initializer: value,
        },
    );
    let descriptor = arena.synth(
        NodeId::NONE,
        NodeKind::ObjectLiteralExpression {
            properties: vec![property],
            multiline: false,
        },
    );
    let call = arena.synth_call(define, vec![exports, key, descriptor]);
    arena.synth_expression_statement(call)
}

/// `exports.b = exports.a = void 0;` in reverse declaration order.
fn void_preamble(arena: &mut NodeArena, names: &[String]) -> NodeId {
    let zero = arena.synth_number(0.0);
    let mut value = arena.synth(NodeId::NONE, NodeKind::VoidExpression { expression: zero });
    for name in names {
        let exports = arena.synth_identifier("exports");
        let target = arena.synth_prop_access(exports, name);
        value = arena.synth_assign(target, value);
    }
    arena.synth_expression_statement(value)
}

fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// `exports.name = value;`
fn exports_assignment(
    arena: &mut NodeArena,
    name: &str,
    value: NodeId,
    original: NodeId,
) -> NodeId {
    let exports = arena.synth_identifier("exports");
    let target = arena.synth_prop_access(exports, name);
    let assign = arena.synth_assign(target, value);
    arena.synth_expression_statement_for(original, assign)
}

/// The legacy star-export helper:
/// `function __export(m) { for (var p in m) ... }`
fn export_star_helper(arena: &mut NodeArena) -> NodeId {
    let p_name = arena.synth_identifier("p");
    let p_declaration = arena.synth(
        NodeId::NONE,
        NodeKind::VariableDeclaration {
            name: p_name,
            exclamation: false,
            ty: NodeId::NONE,
            initializer: NodeId::NONE,
        },
    );
    let p_list = arena.synth(
        NodeId::NONE,
        NodeKind::VariableDeclarationList {
            flavor: VarFlavor::Var,
            declarations: vec![p_declaration],
        },
    );
    let exports = arena.synth_identifier("exports");
    let has_own = arena.synth_prop_access(exports, "hasOwnProperty");
    let p_read = arena.synth_identifier("p");
    let check = arena.synth_call(has_own, vec![p_read]);
    let negated = arena.synth(
        NodeId::NONE,
        NodeKind::PrefixUnaryExpression {
            operator: SyntaxKind::ExclamationToken,
            operand: check,
        },
    );
    let exports_target = arena.synth_identifier("exports");
    let p_key = arena.synth_identifier("p");
    let target = arena.synth_element_access(exports_target, p_key);
    let m_read = arena.synth_identifier("m");
    let p_key_read = arena.synth_identifier("p");
    let source = arena.synth_element_access(m_read, p_key_read);
    let copy = arena.synth_assign(target, source);
    let copy_statement = arena.synth_expression_statement(copy);
    let guarded = arena.synth(
        NodeId::NONE,
        NodeKind::IfStatement {
            condition: negated,
            then_statement: copy_statement,
            else_statement: NodeId::NONE,
        },
    );
    let m_expression = arena.synth_identifier("m");
    let for_in = arena.synth(
        NodeId::NONE,
        NodeKind::ForInStatement {
            initializer: p_list,
            expression: m_expression,
            statement: guarded,
        },
    );
    let block = arena.synth_block(vec![for_in], true);
    let m_param_name = arena.synth_identifier("m");
    let m_param = arena.synth(
        NodeId::NONE,
        NodeKind::Parameter(Box::new(ParameterData {
            modifiers: ModifierFlags::empty(),
            decorators: Vec::new(),
            dot_dot_dot: false,
            name: m_param_name,
            question: false,
            ty: NodeId::NONE,
            initializer: NodeId::NONE,
        })),
    );
    let fn_name = arena.synth_identifier("__export");
    arena.synth(
        NodeId::NONE,
        NodeKind::FunctionDeclaration(Box::new(FunctionData {
            modifiers: ModifierFlags::empty(),
            decorators: Vec::new(),
            asterisk: false,
            name: fn_name,
            question: false,
            type_parameters: NodeId::NONE,
            parameters: vec![m_param],
            return_type: NodeId::NONE,
            body: block,
            is_arrow_expression_body: false,
            parenthesized_parameters: true,
        })),
    )
}
