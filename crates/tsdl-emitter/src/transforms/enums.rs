//! Enum materialization and const enum inlining.
//!
//! A runtime enum lowers to a `var` binding plus an IIFE that mounts
//! members onto the enum object. Numeric members get the two-way form
//! `E[E["A"] = 0] = "A"` so values map back to names; string members
//! only get the forward assignment. Const enum member reads are folded
//! into literals annotated with the member name, and the declaration
//! itself vanishes unless `preserveConstEnums` is set.

use tsdl_binder::{ConstValue, FileBinding, SymbolId, SymbolKind};
use tsdl_parser::{NodeArena, NodeId, NodeKind};

use crate::context::EmitContext;
use crate::transforms::{self, Mount, substitute};

/// Lower one enum declaration. Returns false when the declaration has
/// no runtime output (const enum without `preserveConstEnums`).
pub(crate) fn lower_enum(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    mount: Mount,
    out: &mut Vec<NodeId>,
) -> bool {
    let NodeKind::EnumDeclaration(data) = &arena.get(statement).kind else {
        return false;
    };
    let is_const = data.is_const;
    let name_node = data.name;
    let members = data.members.clone();
    if is_const && !cx.options.preserve_const_enums {
        // Reads were already folded to literals; nothing to declare.
        return false;
    }
    let Some(name) = arena.declared_name_text(name_node).map(str::to_string) else {
        return false;
    };
    let symbol = cx.binding.symbol_of(statement);

    let mut body = Vec::with_capacity(members.len());
    for &member in &members {
        lower_member(cx, arena, &name, symbol, member, &mut body);
    }

    if let Some(symbol) = symbol {
        transforms::declare_container(cx, arena, statement, symbol, &name, &mount, out);
    }
    out.push(transforms::container_iife(arena, statement, &name, &mount, body));
    true
}

fn lower_member(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    enum_name: &str,
    enum_symbol: Option<SymbolId>,
    member: NodeId,
    body: &mut Vec<NodeId>,
) {
    let NodeKind::EnumMember { name, initializer } = arena.get(member).kind else {
        return;
    };
    let Some(member_text) = arena.declared_name_text(name).map(str::to_string) else {
        return;
    };
    let const_value = cx
        .binding
        .symbol_of(member)
        .and_then(|id| cx.binding.symbol(id).const_value.clone());
    match const_value {
        Some(ConstValue::Str(value)) => {
            // String members get no reverse mapping.
            let base = arena.synth_identifier(enum_name);
            let key = arena.synth_string(&member_text);
            let target = arena.synth_element_access(base, key);
            let value = arena.synth_string(&value);
            let assign = arena.synth_assign(target, value);
            body.push(arena.synth_expression_statement_for(member, assign));
        }
        Some(ConstValue::Number(value)) => {
            let value = arena.synth_number(value);
            push_pair(arena, enum_name, &member_text, value, member, body);
        }
        None => {
            // Not a compile-time constant: keep the written expression,
            // qualifying sibling member reads through the enum object.
            if initializer.is_none() {
                // Missing initializer after a non-constant member; the
                // binder already reported it. Emit nothing.
                return;
            }
            let value = transforms::lower_node(cx, arena, initializer);
            if let Some(enum_symbol) = enum_symbol {
                qualify_member_reads(cx.binding, arena, value, enum_symbol, enum_name);
            }
            push_pair(arena, enum_name, &member_text, value, member, body);
        }
    }
}

/// `E[E["Name"] = value] = "Name";`
fn push_pair(
    arena: &mut NodeArena,
    enum_name: &str,
    member_text: &str,
    value: NodeId,
    member: NodeId,
    body: &mut Vec<NodeId>,
) {
    let base = arena.synth_identifier(enum_name);
    let key = arena.synth_string(member_text);
    let target = arena.synth_element_access(base, key);
    let forward = arena.synth_assign(target, value);
    let base = arena.synth_identifier(enum_name);
    let reverse_target = arena.synth_element_access(base, forward);
    let reverse_value = arena.synth_string(member_text);
    let assign = arena.synth_assign(reverse_target, reverse_value);
    body.push(arena.synth_expression_statement_for(member, assign));
}

fn qualify_member_reads(
    binding: &FileBinding,
    arena: &mut NodeArena,
    expression: NodeId,
    enum_symbol: SymbolId,
    enum_name: &str,
) {
    substitute::rewrite_references(arena, expression, false, &|node| {
        let referenced = binding.reference(node)?;
        let symbol = binding.symbol(referenced);
        if symbol.parent == enum_symbol && matches!(symbol.kind, SymbolKind::EnumMember) {
            Some(substitute::Rewrite::Property {
                object: enum_name.to_string(),
                property: symbol.name.clone(),
            })
        } else {
            None
        }
    });
}

/// Fold a `ConstEnum.member` read into its literal value, keeping the
/// member name as a trailing annotation. Returns `None` when the node
/// is not a resolvable const enum member access.
pub(crate) fn try_inline_const_enum(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    node: NodeId,
) -> Option<NodeId> {
    let (base, member_name) = match &arena.get(node).kind {
        NodeKind::PropertyAccessExpression {
            expression,
            question_dot: false,
            name,
        } => (*expression, arena.identifier_text(*name)?.to_string()),
        NodeKind::ElementAccessExpression {
            expression,
            question_dot: false,
            argument,
        } => (*expression, arena.string_value(*argument)?.to_string()),
        _ => return None,
    };
    let container = resolve_entity(cx.binding, arena, base)?;
    let symbol = cx.binding.symbol(container);
    if !matches!(symbol.kind, SymbolKind::ConstEnum) {
        return None;
    }
    let member = symbol.export(&member_name)?;
    let value = cx.binding.symbol(member).const_value.clone()?;
    let literal = match value {
        ConstValue::Number(value) => arena.synth_number(value),
        ConstValue::Str(value) => arena.synth_string(&value),
    };
    arena.get_mut(literal).original = node;
    arena.set_trailing_annotation(literal, member_name);
    Some(literal)
}

/// Resolve a dotted entity expression (`A.B.C`) to the symbol it names,
/// walking export tables from the leftmost identifier.
fn resolve_entity(binding: &FileBinding, arena: &NodeArena, node: NodeId) -> Option<SymbolId> {
    match &arena.get(node).kind {
        NodeKind::Identifier { .. } => binding.reference(node),
        NodeKind::PropertyAccessExpression {
            expression,
            question_dot: false,
            name,
        } => {
            let container = resolve_entity(binding, arena, *expression)?;
            let name = arena.identifier_text(*name)?;
            binding.member(container, name)
        }
        _ => None,
    }
}
