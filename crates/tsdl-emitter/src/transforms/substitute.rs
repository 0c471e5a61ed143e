//! In-place identifier substitution.
//!
//! Namespace lowering, enum bodies, and the CommonJS pass all rewrite
//! resolved identifier reads into qualified accesses. The walk mutates
//! identifier nodes in place, so child links stay valid and no parent
//! slots need fixing. Rewritten nodes stop being identifiers, which is
//! what makes repeated walks over the same tree harmless.

use tsdl_parser::ast::fold;
use tsdl_parser::{NodeArena, NodeId, NodeKind, SyntaxKind};

/// What a resolved identifier becomes.
pub(crate) enum Rewrite {
    /// `object.property`, for namespace members and export bindings.
    Property { object: String, property: String },
    /// A plain renamed identifier, for namespace imports that collapse
    /// onto the module temp.
    Name(String),
}

/// Walk `node`, applying `resolve` to every identifier in a value
/// position. With `wrap_calls`, a callee that rewrites to a property
/// access is wrapped as `(0, object.property)(...)` so the call keeps
/// an undefined `this`.
pub(crate) fn rewrite_references(
    arena: &mut NodeArena,
    node: NodeId,
    wrap_calls: bool,
    resolve: &dyn Fn(NodeId) -> Option<Rewrite>,
) {
    if matches!(arena.get(node).kind, NodeKind::Identifier { .. }) {
        if let Some(rewrite) = resolve(node) {
            apply(arena, node, rewrite);
        }
        return;
    }
    match &arena.get(node).kind {
        NodeKind::ShorthandPropertyAssignment { name, initializer } => {
            let name = *name;
            let initializer = *initializer;
            if let Some(rewrite) = resolve(name) {
                convert_shorthand(arena, node, name, initializer, rewrite);
            }
        }
        NodeKind::CallExpression(data) if wrap_calls => {
            let callee = data.expression;
            if matches!(arena.get(callee).kind, NodeKind::Identifier { .. })
                && let Some(rewrite @ Rewrite::Property { .. }) = resolve(callee)
            {
                apply(arena, callee, rewrite);
                wrap_callee(arena, node, callee);
            }
        }
        _ => {}
    }
    let mut children = Vec::new();
    fold::for_each_child(arena, node, &mut |child| children.push(child));
    for child in children {
        rewrite_references(arena, child, wrap_calls, resolve);
    }
}

pub(crate) fn apply(arena: &mut NodeArena, node: NodeId, rewrite: Rewrite) {
    match rewrite {
        Rewrite::Property { object, property } => {
            let object = arena.synth_identifier(&object);
            let name = arena.synth_identifier(&property);
            arena.get_mut(node).kind = NodeKind::PropertyAccessExpression {
                expression: object,
                question_dot: false,
                name,
            };
        }
        Rewrite::Name(text) => {
            arena.get_mut(node).kind = NodeKind::Identifier { text };
        }
    }
}

/// `{ x }` whose name rewrites becomes `{ x: exports.x }`; the
/// destructuring default form `{ x = 1 }` keeps its initializer on the
/// value side: `{ x: exports.x = 1 }`.
fn convert_shorthand(
    arena: &mut NodeArena,
    node: NodeId,
    name: NodeId,
    initializer: NodeId,
    rewrite: Rewrite,
) {
    let text = match arena.identifier_text(name) {
        Some(text) => text.to_string(),
        None => return,
    };
    apply(arena, name, rewrite);
    let property = arena.synth_identifier(&text);
    let value = if initializer.is_some() {
        arena.synth_assign(name, initializer)
    } else {
        name
    };
    arena.get_mut(node).kind = NodeKind::PropertyAssignment {
        name: property,
        initializer: value,
    };
}

/// `(0, exports.f)(...)`
fn wrap_callee(arena: &mut NodeArena, call: NodeId, callee: NodeId) {
    let zero = arena.synth_number(0.0);
    let sequence = arena.synth_binary(zero, SyntaxKind::CommaToken, callee);
    let wrapped = arena.synth_paren(sequence);
    if let NodeKind::CallExpression(data) = &mut arena.get_mut(call).kind {
        data.expression = wrapped;
    }
}
