//! TypeScript parser and AST types for the tsdl downlevel compiler.
//!
//! The parser produces a full syntax tree for statements and
//! expressions, but deliberately not for types: every type annotation,
//! type argument list, interface body, and type alias right-hand side
//! becomes a single span-only [`ast::NodeKind::TypeNode`]. Downstream
//! phases erase types wholesale, so nothing ever needs to look inside
//! one, and value-position analysis gets type positions excluded for
//! free.
//!
//! Nodes live in a [`ast::NodeArena`] and reference each other through
//! [`ast::NodeId`] handles. Lowering passes allocate new nodes into the
//! same arena and link them to their originals for comment attachment.

pub mod ast;
pub mod parser;

pub use ast::{
    ModifierFlags, Node, NodeArena, NodeId, NodeKind, VarFlavor,
};
pub use parser::{ParseTree, ParserState};
pub use tsdl_scanner::SyntaxKind;
