//! Scope and symbol binding for the tsdl downlevel compiler.
//!
//! The binder sits between parsing and lowering. For each parsed file
//! it produces a [`FileBinding`]:
//!
//! - a symbol arena with one entry per declared name, merged across
//!   declarations the way `namespace`/`enum`/`function` merging works
//! - a map from declaration nodes to their symbols
//! - a map from value-position identifiers to the symbols they resolve
//!   to, driving import elision and namespace reference rewriting
//! - the folded constant value of every enum member
//!
//! Binding is deliberately not checking: nothing here reports
//! redeclaration or visibility errors. The only diagnostics produced
//! are the two enum shapes lowering cannot proceed without.

mod const_eval;
mod state;
mod state_declarations;
mod state_references;
pub mod symbols;

pub use state::{FileBinding, bind_source_file};
pub use symbols::{
    ConstValue, ImportBinding, Symbol, SymbolArena, SymbolId, SymbolKind, SymbolTable,
};
