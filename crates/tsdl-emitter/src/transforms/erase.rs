//! Statement-level type erasure.
//!
//! Declarations that exist only in the type system vanish along with
//! their leading comments. Type annotations inside surviving nodes are
//! skipped by the printer instead; they never need tree surgery, and
//! any pass that wants to read them (decorator metadata would) can run
//! anywhere before printing.

use tsdl_parser::{NodeArena, NodeId, NodeKind};

/// True when the statement has no runtime output at all.
pub(crate) fn erases_statement(arena: &NodeArena, statement: NodeId) -> bool {
    match &arena.get(statement).kind {
        NodeKind::InterfaceDeclaration { .. } | NodeKind::TypeAliasDeclaration { .. } => true,
        NodeKind::NamespaceExportDeclaration { .. } => true,
        NodeKind::FunctionDeclaration(function) => {
            // Overload signatures and ambient functions have no body.
            function.body.is_none() || function.modifiers.is_ambient()
        }
        NodeKind::ClassDeclaration(class) => class.modifiers.is_ambient(),
        NodeKind::EnumDeclaration(data) => data.modifiers.is_ambient(),
        NodeKind::ModuleDeclaration(module) => {
            if module.modifiers.is_ambient() {
                return true;
            }
            // `declare module "name"` is ambient even without the
            // keyword when it appears in a declaration file; a string
            // name never instantiates.
            matches!(
                arena.get(module.name).kind,
                NodeKind::StringLiteral { .. }
            )
        }
        NodeKind::VariableStatement { modifiers, .. } => modifiers.is_ambient(),
        NodeKind::ImportEqualsDeclaration(import) => import.is_type_only,
        _ => false,
    }
}
