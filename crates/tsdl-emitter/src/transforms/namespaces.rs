//! Namespace lowering.
//!
//! An instantiated namespace becomes a binding plus an IIFE taking the
//! namespace object: `var N; (function (N) { ... })(N || (N = {}));`.
//! Exported members mount onto the parameter right after their own
//! declaration, and references to exported members from other blocks of
//! a merged namespace read through it. A namespace whose body lowers to
//! nothing (types only, or empty) produces no output at all.

use tsdl_binder::{FileBinding, SymbolId, SymbolKind};
use tsdl_parser::ast::modifiers_of;
use tsdl_parser::{ModifierFlags, NodeArena, NodeId, NodeKind, VarFlavor};

use crate::context::EmitContext;
use crate::transforms::{self, Mount, class_fields, enums, erase, substitute};

/// Lower one namespace declaration. Returns false when the namespace is
/// uninstantiated and vanished.
pub(crate) fn lower_namespace(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    mount: Mount,
    out: &mut Vec<NodeId>,
) -> bool {
    let NodeKind::ModuleDeclaration(data) = &arena.get(statement).kind else {
        return false;
    };
    let name_node = data.name;
    let body = data.body;
    if body.is_none() {
        return false;
    }
    let Some(name) = arena.declared_name_text(name_node).map(str::to_string) else {
        return false;
    };
    let Some(symbol) = cx.binding.symbol_of(statement) else {
        return false;
    };

    let mut lowered = Vec::new();
    match &arena.get(body).kind {
        NodeKind::ModuleBlock { statements } => {
            let statements = statements.clone();
            for &member in &statements {
                lower_member(cx, arena, &name, member, &mut lowered);
            }
        }
        // `namespace A.B` nests the right-hand segments as the body.
        NodeKind::ModuleDeclaration(_) => {
            let inner = Mount::NamespaceExport {
                container: name.clone(),
            };
            lower_namespace(cx, arena, body, inner, &mut lowered);
        }
        _ => return false,
    }
    if lowered.is_empty() {
        return false;
    }

    for &member in &lowered {
        qualify_references(cx.binding, arena, member, symbol, &name, statement);
    }

    transforms::declare_container(cx, arena, statement, symbol, &name, &mount, out);
    out.push(transforms::container_iife(arena, statement, &name, &mount, lowered));
    tracing::trace!(namespace = %name, "lowered namespace");
    true
}

fn lower_member(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    ns_name: &str,
    member: NodeId,
    out: &mut Vec<NodeId>,
) {
    if erase::erases_statement(arena, member) {
        return;
    }
    let exported = modifiers_of(&arena.get(member).kind)
        .is_some_and(|modifiers| modifiers.contains(ModifierFlags::EXPORT));
    match &arena.get(member).kind {
        NodeKind::VariableStatement { declarations, .. } if exported => {
            let declarations = *declarations;
            lower_exported_variables(cx, arena, ns_name, member, declarations, out);
        }
        NodeKind::FunctionDeclaration(data) => {
            let name = arena.declared_name_text(data.name).map(str::to_string);
            let lowered = transforms::lower_node(cx, arena, member);
            transforms::strip_export_modifiers(arena, lowered);
            out.push(lowered);
            if exported && let Some(name) = name {
                let value = arena.synth_identifier(&name);
                out.push(export_assignment(arena, ns_name, &name, value, NodeId::NONE));
            }
        }
        NodeKind::ClassDeclaration(data) => {
            let name = arena.declared_name_text(data.name).map(str::to_string);
            let mut class_out = Vec::new();
            class_fields::lower_class_statement(cx, arena, member, &mut class_out);
            if let Some(&declaration) = class_out.first() {
                transforms::strip_export_modifiers(arena, declaration);
            }
            out.append(&mut class_out);
            if exported && let Some(name) = name {
                let value = arena.synth_identifier(&name);
                out.push(export_assignment(arena, ns_name, &name, value, NodeId::NONE));
            }
        }
        NodeKind::EnumDeclaration(_) => {
            let mount = member_mount(ns_name, exported);
            enums::lower_enum(cx, arena, member, mount, out);
        }
        NodeKind::ModuleDeclaration(_) => {
            let mount = member_mount(ns_name, exported);
            lower_namespace(cx, arena, member, mount, out);
        }
        NodeKind::ImportEqualsDeclaration(data) => {
            let name = arena.declared_name_text(data.name).map(str::to_string);
            let reference = data.reference;
            let is_require = data.is_require;
            let Some(name) = name else { return };
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
                member,
                ModifierFlags::empty(),
                VarFlavor::Var,
                &name,
                initializer,
            ));
            if exported {
                let value = arena.synth_identifier(&name);
                out.push(export_assignment(arena, ns_name, &name, value, NodeId::NONE));
            }
        }
        // Export lists have no meaning inside a namespace body.
        NodeKind::ExportDeclaration(_) | NodeKind::ExportAssignment { .. } => {}
        _ => transforms::lower_statement(cx, arena, member, out),
    }
}

fn member_mount(ns_name: &str, exported: bool) -> Mount {
    if exported {
        Mount::NamespaceExport {
            container: ns_name.to_string(),
        }
    } else {
        Mount::Local
    }
}

/// `export var v = init;` collapses to `NS.v = init;` per declarator.
/// Binding patterns keep the declaration and copy each bound name onto
/// the namespace object afterwards.
fn lower_exported_variables(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    ns_name: &str,
    member: NodeId,
    declarations: NodeId,
    out: &mut Vec<NodeId>,
) {
    let NodeKind::VariableDeclarationList {
        declarations: declarators,
        ..
    } = &arena.get(declarations).kind
    else {
        return;
    };
    let declarators = declarators.clone();
    let has_pattern = declarators.iter().any(|&declarator| {
        matches!(
            &arena.get(declarator).kind,
            NodeKind::VariableDeclaration { name, .. }
                if !matches!(arena.get(*name).kind, NodeKind::Identifier { .. })
        )
    });
    if has_pattern {
        let lowered = transforms::lower_node(cx, arena, member);
        transforms::strip_export_modifiers(arena, lowered);
        out.push(lowered);
        let mut names = Vec::new();
        for &declarator in &declarators {
            if let NodeKind::VariableDeclaration { name, .. } = &arena.get(declarator).kind {
                transforms::collect_bound_names(arena, *name, &mut names);
            }
        }
        for name in names {
            let value = arena.synth_identifier(&name);
            out.push(export_assignment(arena, ns_name, &name, value, NodeId::NONE));
        }
        return;
    }
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
            // The namespace object property springs into being on first
            // assignment; a plain `export var v;` emits nothing.
            continue;
        }
        let value = transforms::lower_node(cx, arena, initializer);
        let original = if first { member } else { declarator };
        out.push(export_assignment(arena, ns_name, &name, value, original));
        first = false;
    }
}

/// `NS.name = value;`
fn export_assignment(
    arena: &mut NodeArena,
    ns_name: &str,
    name: &str,
    value: NodeId,
    original: NodeId,
) -> NodeId {
    let base = arena.synth_identifier(ns_name);
    let target = arena.synth_prop_access(base, name);
    let assign = arena.synth_assign(target, value);
    arena.synth_expression_statement_for(original, assign)
}

/// Rewrite reads of exported members into `NS.name`. Exported vars
/// always qualify because they have no local binding; other exported
/// member kinds only qualify when read from a different block of a
/// merged namespace, where the local binding is out of scope.
fn qualify_references(
    binding: &FileBinding,
    arena: &mut NodeArena,
    statement: NodeId,
    ns_symbol: SymbolId,
    ns_name: &str,
    block: NodeId,
) {
    substitute::rewrite_references(arena, statement, false, &|node| {
        let referenced = binding.reference(node)?;
        let symbol = binding.symbol(referenced);
        if symbol.parent != ns_symbol || !symbol.is_exported || !symbol.kind.is_value() {
            return None;
        }
        let qualifies =
            matches!(symbol.kind, SymbolKind::Var) || !symbol.declared_in(block);
        if qualifies {
            Some(substitute::Rewrite::Property {
                object: ns_name.to_string(),
                property: symbol.name.clone(),
            })
        } else {
            None
        }
    });
}
