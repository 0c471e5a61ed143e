//! Tree-to-tree lowering passes.
//!
//! Statement positions are lowered through [`lower_statement`], which
//! expands enums, namespaces, and classes into their downlevel shapes
//! and drops type-only constructs. Everything below statement level
//! goes through [`lower_node`], which rewrites dynamic imports, inlines
//! const enum member reads, and rebuilds nested blocks through the
//! statement path again. Module tops run their own loops in
//! [`modules`] because exported declarations grow extra statements
//! there.

pub(crate) mod class_fields;
pub(crate) mod enums;
pub(crate) mod erase;
pub(crate) mod modules;
pub(crate) mod namespaces;
pub(crate) mod substitute;

use tsdl_binder::{SymbolId, SymbolKind};
use tsdl_common::ModuleKind;
use tsdl_common::diagnostics::{Diagnostic, codes};
use tsdl_parser::ast::fold;
use tsdl_parser::{ModifierFlags, NodeArena, NodeId, NodeKind, SyntaxKind, VarFlavor};

use crate::context::EmitContext;

/// How a lowered enum or namespace binds its runtime object.
#[derive(Clone, Debug)]
pub(crate) enum Mount {
    /// Plain local: `var X;` and `(X || (X = {}))`.
    Local,
    /// Exported from an ES module: `export var X;`, same argument shape.
    EsmExport,
    /// Exported from a CommonJS top level:
    /// `(X || (exports.X = X = {}))`.
    CjsExport,
    /// Exported from an enclosing namespace block:
    /// `let X;` and `(X = NS.X || (NS.X = {}))`.
    NamespaceExport { container: String },
}

pub(crate) fn lower_statements(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statements: &[NodeId],
    out: &mut Vec<NodeId>,
) {
    for &statement in statements {
        lower_statement(cx, arena, statement, out);
    }
}

/// Lower one statement in a plain position (script top level, function
/// and block bodies). Module tops and namespace bodies wrap this with
/// their own export handling.
pub(crate) fn lower_statement(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    out: &mut Vec<NodeId>,
) {
    if erase::erases_statement(arena, statement) {
        return;
    }
    match arena.get(statement).kind {
        NodeKind::EnumDeclaration(_) => {
            enums::lower_enum(cx, arena, statement, Mount::Local, out);
        }
        NodeKind::ModuleDeclaration(_) => {
            namespaces::lower_namespace(cx, arena, statement, Mount::Local, out);
        }
        NodeKind::ClassDeclaration(_) => {
            class_fields::lower_class_statement(cx, arena, statement, out);
        }
        NodeKind::ImportEqualsDeclaration(_) => {
            modules::lower_import_equals(cx, arena, statement, out);
        }
        _ => out.push(lower_node(cx, arena, statement)),
    }
}

/// Generic recursion below statement level. Returns the same node when
/// nothing inside changed, or a replacement linked back to it.
pub(crate) fn lower_node(cx: &mut EmitContext, arena: &mut NodeArena, node: NodeId) -> NodeId {
    match &arena.get(node).kind {
        NodeKind::Block { statements, .. } => {
            let statements = statements.clone();
            let mut lowered = Vec::with_capacity(statements.len());
            lower_statements(cx, arena, &statements, &mut lowered);
            if let NodeKind::Block { statements, .. } = &mut arena.get_mut(node).kind {
                *statements = lowered;
            }
            node
        }
        NodeKind::CaseClause {
            expression,
            statements,
        } => {
            let expression = *expression;
            let statements = statements.clone();
            let lowered_expression = if expression.is_some() {
                lower_node(cx, arena, expression)
            } else {
                expression
            };
            let mut lowered = Vec::with_capacity(statements.len());
            lower_statements(cx, arena, &statements, &mut lowered);
            if let NodeKind::CaseClause {
                expression,
                statements,
            } = &mut arena.get_mut(node).kind
            {
                *expression = lowered_expression;
                *statements = lowered;
            }
            node
        }
        NodeKind::ClassExpression(_) => {
            class_fields::lower_class_expression(cx, arena, node);
            fold::map_children(arena, node, &mut |arena, child| lower_node(cx, arena, child))
        }
        NodeKind::ImportCallExpression { arguments } => {
            let arguments = arguments.clone();
            let lowered: Vec<NodeId> = arguments
                .iter()
                .map(|&argument| lower_node(cx, arena, argument))
                .collect();
            if matches!(cx.options.module, ModuleKind::CommonJs | ModuleKind::System) {
                modules::lower_dynamic_import(arena, node, lowered)
            } else {
                if let NodeKind::ImportCallExpression { arguments } = &mut arena.get_mut(node).kind
                {
                    *arguments = lowered;
                }
                node
            }
        }
        NodeKind::PropertyAccessExpression { .. } | NodeKind::ElementAccessExpression { .. } => {
            if let Some(inlined) = enums::try_inline_const_enum(cx, arena, node) {
                return inlined;
            }
            fold::map_children(arena, node, &mut |arena, child| lower_node(cx, arena, child))
        }
        _ => fold::map_children(arena, node, &mut |arena, child| lower_node(cx, arena, child)),
    }
}

/// Synthesize the `var X;` / `let X;` / `export var X;` binding for an
/// enum or namespace, once per merged symbol. Symbols that merge with a
/// class or function already have a binding and get nothing.
pub(crate) fn declare_container(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    symbol: SymbolId,
    name: &str,
    mount: &Mount,
    out: &mut Vec<NodeId>,
) {
    if matches!(
        cx.binding.symbol(symbol).kind,
        SymbolKind::Class | SymbolKind::Function
    ) {
        return;
    }
    if !cx.declared_containers.insert(symbol) {
        return;
    }
    let (modifiers, flavor) = match mount {
        Mount::EsmExport => (ModifierFlags::EXPORT, VarFlavor::Var),
        Mount::NamespaceExport { .. } => (ModifierFlags::empty(), VarFlavor::Let),
        Mount::Local | Mount::CjsExport => (ModifierFlags::empty(), VarFlavor::Var),
    };
    out.push(arena.synth_var_statement(statement, modifiers, flavor, name, NodeId::NONE));
}

/// Build the `(function (X) { body })(<mount argument>);` statement that
/// populates an enum or namespace object.
pub(crate) fn container_iife(
    arena: &mut NodeArena,
    statement: NodeId,
    name: &str,
    mount: &Mount,
    body: Vec<NodeId>,
) -> NodeId {
    let function = arena.synth_function_expression(name, body);
    let callee = arena.synth_paren(function);
    let argument = match mount {
        Mount::Local | Mount::EsmExport => {
            // X || (X = {})
            let read = arena.synth_identifier(name);
            let target = arena.synth_identifier(name);
            let object = empty_object(arena);
            let init = arena.synth_assign(target, object);
            let init = arena.synth_paren(init);
            arena.synth_binary(read, SyntaxKind::BarBarToken, init)
        }
        Mount::CjsExport => {
            // X || (exports.X = X = {})
            let read = arena.synth_identifier(name);
            let exports = arena.synth_identifier("exports");
            let exported = arena.synth_prop_access(exports, name);
            let target = arena.synth_identifier(name);
            let object = empty_object(arena);
            let init = arena.synth_assign(target, object);
            let publish = arena.synth_assign(exported, init);
            let publish = arena.synth_paren(publish);
            arena.synth_binary(read, SyntaxKind::BarBarToken, publish)
        }
        Mount::NamespaceExport { container } => {
            // X = NS.X || (NS.X = {})
            let target = arena.synth_identifier(name);
            let container_read = arena.synth_identifier(container);
            let read = arena.synth_prop_access(container_read, name);
            let container_write = arena.synth_identifier(container);
            let write = arena.synth_prop_access(container_write, name);
            let object = empty_object(arena);
            let init = arena.synth_assign(write, object);
            let init = arena.synth_paren(init);
            let fallback = arena.synth_binary(read, SyntaxKind::BarBarToken, init);
            arena.synth_assign(target, fallback)
        }
    };
    let call = arena.synth_call(callee, vec![argument]);
    arena.synth_expression_statement_for(statement, call)
}

pub(crate) fn empty_object(arena: &mut NodeArena) -> NodeId {
    arena.synth(
        NodeId::NONE,
        NodeKind::ObjectLiteralExpression {
            properties: Vec::new(),
            multiline: false,
        },
    )
}

/// `import X = A.B` lowers to a property read whether or not `B` is on
/// `A`'s export surface. A miss gets a message diagnostic; the emitted
/// alias is unchanged and reads `undefined` at runtime.
pub(crate) fn note_unexported_alias_target(
    cx: &mut EmitContext,
    arena: &NodeArena,
    reference: NodeId,
) {
    let binding = cx.binding;
    let mut segments = Vec::new();
    let mut node = reference;
    let head = loop {
        match &arena.get(node).kind {
            NodeKind::PropertyAccessExpression {
                expression, name, ..
            } => {
                segments.push(*name);
                node = *expression;
            }
            NodeKind::Identifier { .. } => break node,
            _ => return,
        }
    };
    let Some(mut container) = binding.reference(head) else {
        return;
    };
    for &segment in segments.iter().rev() {
        let symbol = binding.symbol(container);
        if !matches!(
            symbol.kind,
            SymbolKind::Namespace | SymbolKind::Enum | SymbolKind::ConstEnum
        ) {
            return;
        }
        let Some(text) = arena.identifier_text(segment) else {
            return;
        };
        match binding.member(container, text) {
            Some(next) => container = next,
            None => {
                cx.diagnostics.push(Diagnostic::message(
                    arena.get(reference).span,
                    codes::NO_EXPORTED_MEMBER,
                    format!(
                        "Namespace '{}' has no exported member '{text}'.",
                        symbol.name
                    ),
                ));
                return;
            }
        }
    }
}

/// Names bound by a declaration target: a plain identifier or every
/// identifier inside a binding pattern, in source order.
pub(crate) fn collect_bound_names(arena: &NodeArena, node: NodeId, out: &mut Vec<String>) {
    match &arena.get(node).kind {
        NodeKind::Identifier { text } => out.push(text.clone()),
        NodeKind::ObjectBindingPattern { elements } | NodeKind::ArrayBindingPattern { elements } => {
            for &element in elements {
                collect_bound_names(arena, element, out);
            }
        }
        NodeKind::BindingElement(data) => collect_bound_names(arena, data.name, out),
        _ => {}
    }
}

/// Remove `export`/`export default` from a declaration that stays in
/// the output as a plain local binding.
pub(crate) fn strip_export_modifiers(arena: &mut NodeArena, statement: NodeId) {
    let flags = ModifierFlags::EXPORT | ModifierFlags::DEFAULT;
    match &mut arena.get_mut(statement).kind {
        NodeKind::VariableStatement { modifiers, .. } => modifiers.remove(flags),
        NodeKind::FunctionDeclaration(data) => data.modifiers.remove(flags),
        NodeKind::ClassDeclaration(data) => data.modifiers.remove(flags),
        NodeKind::EnumDeclaration(data) => data.modifiers.remove(flags),
        NodeKind::ModuleDeclaration(data) => data.modifiers.remove(flags),
        NodeKind::ImportEqualsDeclaration(data) => data.modifiers.remove(flags),
        _ => {}
    }
}
