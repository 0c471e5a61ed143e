//! TypeScript scanner/tokenizer for the tsdl downlevel compiler.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with rescan support for
//!   regular expressions, template continuations, and JSX text
//!
//! The scanner also records every comment it skips as a
//! [`tsdl_common::CommentRange`]; comments never become tokens.

pub mod scanner;
pub mod syntax_kind;

pub use scanner::{ScannerSnapshot, ScannerState};
pub use syntax_kind::SyntaxKind;
