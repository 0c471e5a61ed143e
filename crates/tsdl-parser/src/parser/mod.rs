//! Parser state and entry points.
//!
//! `ParserState` drives the scanner one token at a time and builds nodes
//! into a `NodeArena`. Parsing never fails: unexpected input is reported
//! through diagnostics and the parser resynchronizes at the next
//! statement boundary, so every source file yields a tree.
//!
//! Parse methods are split across files the same way the grammar splits:
//! statements and declarations, class members, expressions, type-position
//! skipping, and JSX.

mod state_class_members;
mod state_expressions;
mod state_jsx;
mod state_statements;
mod state_types;

use crate::ast::{NodeArena, NodeId, NodeKind, SourceFileData};
use tsdl_common::{CommentRange, Diagnostic, Span, diagnostics::codes};
use tsdl_scanner::{ScannerSnapshot, ScannerState, SyntaxKind};

/// Result of parsing one source file. The arena owns every node; `root`
/// is the `SourceFile` node. Comments are token-exact ranges in source
/// order, consumed later by comment-aware emit.
pub struct ParseTree {
    pub arena: NodeArena,
    pub root: NodeId,
    pub comments: Vec<CommentRange>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseTree {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

pub struct ParserState<'a> {
    pub(crate) scanner: ScannerState<'a>,
    pub(crate) arena: NodeArena,
    file_name: String,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// `.tsx`/`.jsx` files parse `<` at expression start as JSX and
    /// disable angle-bracket type assertions.
    pub(crate) jsx_enabled: bool,
    /// Set while parsing a `for (init ...` head so `in` is not taken as
    /// a binary operator.
    pub(crate) in_disallowed: bool,
    /// End offset of the most recently consumed token.
    prev_end: u32,
    last_error_pos: u32,
}

impl<'a> ParserState<'a> {
    pub fn new(file_name: &str, source: &'a str) -> ParserState<'a> {
        let jsx_enabled = file_name.ends_with(".tsx") || file_name.ends_with(".jsx");
        ParserState {
            scanner: ScannerState::new(source),
            arena: NodeArena::new(),
            file_name: file_name.to_string(),
            diagnostics: Vec::new(),
            jsx_enabled,
            in_disallowed: false,
            prev_end: 0,
            last_error_pos: u32::MAX,
        }
    }

    /// Parse the whole file. Always returns a tree; syntax errors are
    /// collected in `ParseTree::diagnostics`.
    pub fn parse_source_file(mut self) -> ParseTree {
        let source_len = self.scanner.source().len() as u32;
        self.next_token();
        let statements = self.parse_statement_list_until(SyntaxKind::EndOfFileToken);

        let is_module = statements
            .iter()
            .any(|&stmt| self.statement_is_module_indicator(stmt));
        let root = self.arena.alloc(
            Span::new(0, source_len),
            NodeKind::SourceFile(Box::new(SourceFileData {
                file_name: self.file_name.clone(),
                statements,
                is_module,
            })),
        );

        let comments = self.scanner.take_comments();
        let mut diagnostics = self.scanner.take_diagnostics();
        diagnostics.append(&mut self.diagnostics);
        diagnostics.sort_by_key(|d| d.start);
        for diag in &mut diagnostics {
            diag.file = Some(self.file_name.clone());
        }

        ParseTree {
            arena: self.arena,
            root,
            comments,
            diagnostics,
        }
    }

    fn statement_is_module_indicator(&self, stmt: NodeId) -> bool {
        match self.arena.kind(stmt) {
            NodeKind::ImportDeclaration(_)
            | NodeKind::ExportDeclaration(_)
            | NodeKind::ExportAssignment { .. }
            | NodeKind::NamespaceExportDeclaration { .. } => true,
            NodeKind::ImportEqualsDeclaration(data) => {
                data.is_require || data.modifiers.is_exported()
            }
            other => crate::ast::modifiers_of(other).is_some_and(|m| m.is_exported()),
        }
    }

    // =========================================================================
    // Token management
    // =========================================================================

    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    pub(crate) fn token_span(&self) -> Span {
        self.scanner.token_span()
    }

    /// Start offset of the current token; statement parsers capture this
    /// before consuming anything.
    pub(crate) fn start(&self) -> u32 {
        self.scanner.token_span().start
    }

    /// Span from `start` through the end of the last consumed token.
    pub(crate) fn finish_span(&self, start: u32) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_end = self.scanner.token_span().end;
        self.scanner.scan()
    }

    /// Advance using JSX text scanning rules (inside element children).
    pub(crate) fn next_jsx_token(&mut self) -> SyntaxKind {
        self.prev_end = self.scanner.token_span().end;
        self.scanner.scan_jsx_token()
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_at_current(
            &format!("'{}' expected.", kind.text().unwrap_or("token")),
            codes::TOKEN_EXPECTED,
        );
        false
    }

    /// Automatic semicolon insertion: an explicit `;` is consumed, and a
    /// close brace, end of file, or preceding line break is accepted
    /// silently.
    pub(crate) fn parse_semicolon(&mut self) {
        if self.eat(SyntaxKind::SemicolonToken) {
            return;
        }
        if self.at(SyntaxKind::CloseBraceToken)
            || self.at(SyntaxKind::EndOfFileToken)
            || self.scanner.has_preceding_line_break()
        {
            return;
        }
        self.error_at_current("';' expected.", codes::TOKEN_EXPECTED);
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_at_current(&mut self, message: &str, code: u32) {
        let span = self.scanner.token_span();
        self.error_at(span, message, code);
    }

    pub(crate) fn error_at(&mut self, span: Span, message: &str, code: u32) {
        // One error per position keeps cascades out of the output.
        if span.start == self.last_error_pos {
            return;
        }
        self.last_error_pos = span.start;
        self.diagnostics.push(Diagnostic::error(span, code, message));
    }

    // =========================================================================
    // Speculation
    // =========================================================================

    /// Run `f` and rewind the scanner afterwards regardless of outcome.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.save_state();
        let result = f(self);
        self.restore_state(snapshot);
        result
    }

    /// Run `f`; keep its parse on `Some`, rewind scanner, arena, and
    /// diagnostics on `None`.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let snapshot = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(snapshot);
        }
        result
    }

    fn save_state(&self) -> SpeculationState {
        SpeculationState {
            scanner: self.scanner.snapshot(),
            arena_len: self.arena.len(),
            diagnostics_len: self.diagnostics.len(),
            prev_end: self.prev_end,
            last_error_pos: self.last_error_pos,
        }
    }

    fn restore_state(&mut self, snapshot: SpeculationState) {
        self.scanner.restore(&snapshot.scanner);
        self.arena.truncate(snapshot.arena_len);
        self.diagnostics.truncate(snapshot.diagnostics_len);
        self.prev_end = snapshot.prev_end;
        self.last_error_pos = snapshot.last_error_pos;
    }

    // =========================================================================
    // Identifiers and names
    // =========================================================================

    pub(crate) fn is_identifier(&self) -> bool {
        let token = self.token();
        token == SyntaxKind::Identifier || token.is_contextual_keyword()
    }

    /// Parse an identifier; reserved words are rejected. On failure a
    /// zero-width identifier is produced so parsing can continue.
    pub(crate) fn parse_identifier(&mut self) -> NodeId {
        if self.is_identifier() {
            let span = self.token_span();
            let text = self.scanner.token_text().to_string();
            self.next_token();
            return self.arena.alloc(span, NodeKind::Identifier { text });
        }
        self.error_at_current("Identifier expected.", codes::IDENTIFIER_EXPECTED);
        let pos = self.start();
        self.arena.alloc(
            Span::new(pos, pos),
            NodeKind::Identifier {
                text: String::new(),
            },
        )
    }

    /// Parse a member name where any keyword is allowed, e.g. after `.`
    /// or in `import { default as d }`.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeId {
        if self.token() == SyntaxKind::Identifier || self.token().is_keyword() {
            let span = self.token_span();
            let text = self.scanner.token_text().to_string();
            self.next_token();
            return self.arena.alloc(span, NodeKind::Identifier { text });
        }
        self.error_at_current("Identifier expected.", codes::IDENTIFIER_EXPECTED);
        let pos = self.start();
        self.arena.alloc(
            Span::new(pos, pos),
            NodeKind::Identifier {
                text: String::new(),
            },
        )
    }
}

struct SpeculationState {
    scanner: ScannerSnapshot,
    arena_len: usize,
    diagnostics_len: usize,
    prev_end: u32,
    last_error_pos: u32,
}
