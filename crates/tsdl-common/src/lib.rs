//! Common types and utilities for the tsdl TypeScript downlevel compiler.
//!
//! This crate provides foundational types used across all tsdl crates:
//! - Source spans (`Span`)
//! - Line/column mapping (`LineMap`, `Position`)
//! - Comment ranges and attachment queries (`CommentRange`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`)
//! - Compiler options (`CompilerOptions`, `ScriptTarget`, `ModuleKind`)

pub mod comments;
pub mod diagnostics;
pub mod options;
pub mod position;
pub mod span;

pub use comments::CommentRange;
pub use diagnostics::{Diagnostic, DiagnosticCategory};
pub use options::{CompilerOptions, JsxEmit, ModuleKind, NewLineKind, ScriptTarget};
pub use position::{LineMap, Position};
pub use span::Span;
