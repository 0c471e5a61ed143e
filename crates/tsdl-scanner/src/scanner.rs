//! Tokenizer state machine.
//!
//! The scanner is driven one token at a time by the parser. Comments are
//! never returned as tokens; they are recorded into a side list of
//! [`CommentRange`]s while skipping trivia so the emitter can
//! re-associate them with nodes positionally.

use tsdl_common::comments::CommentRange;
use tsdl_common::diagnostics::{codes, Diagnostic};
use tsdl_common::span::Span;

use crate::syntax_kind::SyntaxKind;

/// Saved scanner position for speculative parsing. Restoring truncates
/// any comments and diagnostics recorded after the snapshot was taken.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    comments_len: usize,
    diagnostics_len: usize,
}

pub struct ScannerState<'a> {
    source: &'a str,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    /// Cooked value for string literals and identifiers.
    token_value: String,
    preceding_line_break: bool,
    comments: Vec<CommentRange>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ScannerState<'a> {
    pub fn new(source: &'a str) -> ScannerState<'a> {
        let mut scanner = ScannerState {
            source,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            preceding_line_break: false,
            comments: Vec::new(),
            diagnostics: Vec::new(),
        };
        scanner.skip_byte_order_mark();
        scanner.skip_shebang();
        scanner
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    pub fn token_span(&self) -> Span {
        Span::new(self.token_start as u32, self.pos as u32)
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    /// Cooked value: unescaped string contents, identifier text.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn take_comments(&mut self) -> Vec<CommentRange> {
        std::mem::take(&mut self.comments)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            comments_len: self.comments.len(),
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore(&mut self, snapshot: &ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.comments.truncate(snapshot.comments_len);
        self.diagnostics.truncate(snapshot.diagnostics_len);
        self.token_value.clear();
        self.token_value.push_str(&snapshot.token_value);
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    fn byte_at(&self, pos: usize) -> u8 {
        let bytes = self.bytes();
        if pos < bytes.len() { bytes[pos] } else { 0 }
    }

    fn skip_byte_order_mark(&mut self) {
        if self.source.as_bytes().starts_with(&[0xEF, 0xBB, 0xBF]) {
            self.pos = 3;
        }
    }

    fn skip_shebang(&mut self) {
        if self.source[self.pos..].starts_with("#!") {
            while self.pos < self.source.len() && self.byte_at(self.pos) != b'\n' {
                self.pos += 1;
            }
        }
    }

    fn error(&mut self, code: u32, message: &str) {
        let span = Span::new(self.token_start as u32, self.pos as u32);
        self.diagnostics.push(Diagnostic::error(span, code, message));
    }

    /// Skip whitespace and comments, recording comment ranges.
    fn skip_trivia(&mut self) {
        let bytes = self.bytes();
        let len = bytes.len();
        loop {
            if self.pos >= len {
                return;
            }
            match bytes[self.pos] {
                b' ' | b'\t' => self.pos += 1,
                b'\r' | b'\n' => {
                    self.preceding_line_break = true;
                    self.pos += 1;
                }
                b'/' if self.pos + 1 < len && bytes[self.pos + 1] == b'/' => {
                    let start = self.pos;
                    self.pos += 2;
                    self.pos = memchr::memchr2(b'\n', b'\r', &bytes[self.pos..])
                        .map(|offset| self.pos + offset)
                        .unwrap_or(len);
                    self.comments.push(CommentRange::new(
                        start as u32,
                        self.pos as u32,
                        false,
                        self.pos < len,
                    ));
                }
                b'/' if self.pos + 1 < len && bytes[self.pos + 1] == b'*' => {
                    let start = self.pos;
                    self.pos += 2;
                    let mut closed = false;
                    while self.pos + 1 < len {
                        if bytes[self.pos] == b'*' && bytes[self.pos + 1] == b'/' {
                            self.pos += 2;
                            closed = true;
                            break;
                        }
                        self.pos += 1;
                    }
                    if !closed {
                        self.pos = len;
                        self.token_start = start;
                        self.error(codes::ASTERISK_SLASH_EXPECTED, "'*/' expected.");
                    }
                    let has_newline = self.pos < len
                        && (bytes[self.pos] == b'\n'
                            || bytes[self.pos] == b'\r'
                            || {
                                // Only whitespace until the line end counts too.
                                let mut k = self.pos;
                                while k < len && (bytes[k] == b' ' || bytes[k] == b'\t') {
                                    k += 1;
                                }
                                k < len && (bytes[k] == b'\n' || bytes[k] == b'\r')
                            });
                    self.comments.push(CommentRange::new(
                        start as u32,
                        self.pos as u32,
                        true,
                        has_newline,
                    ));
                }
                _ => return,
            }
        }
    }

    /// Advance to the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;
        let bytes = self.bytes();
        let len = bytes.len();
        if self.pos >= len {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        }
        let ch = bytes[self.pos];
        self.token = match ch {
            b'{' => self.single(SyntaxKind::OpenBraceToken),
            b'}' => self.single(SyntaxKind::CloseBraceToken),
            b'(' => self.single(SyntaxKind::OpenParenToken),
            b')' => self.single(SyntaxKind::CloseParenToken),
            b'[' => self.single(SyntaxKind::OpenBracketToken),
            b']' => self.single(SyntaxKind::CloseBracketToken),
            b';' => self.single(SyntaxKind::SemicolonToken),
            b',' => self.single(SyntaxKind::CommaToken),
            b':' => self.single(SyntaxKind::ColonToken),
            b'@' => self.single(SyntaxKind::AtToken),
            b'~' => self.single(SyntaxKind::TildeToken),
            b'.' => {
                if self.byte_at(self.pos + 1).is_ascii_digit() {
                    self.scan_number()
                } else if self.byte_at(self.pos + 1) == b'.' && self.byte_at(self.pos + 2) == b'.' {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                } else {
                    self.single(SyntaxKind::DotToken)
                }
            }
            b'<' => {
                if self.byte_at(self.pos + 1) == b'<' {
                    if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::LessThanLessThanEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::LessThanLessThanToken
                    }
                } else if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::LessThanEqualsToken
                } else if self.byte_at(self.pos + 1) == b'/' {
                    self.pos += 2;
                    SyntaxKind::LessThanSlashToken
                } else {
                    self.single(SyntaxKind::LessThanToken)
                }
            }
            b'>' => {
                if self.byte_at(self.pos + 1) == b'>' {
                    if self.byte_at(self.pos + 2) == b'>' {
                        if self.byte_at(self.pos + 3) == b'=' {
                            self.pos += 4;
                            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
                        } else {
                            self.pos += 3;
                            SyntaxKind::GreaterThanGreaterThanGreaterThanToken
                        }
                    } else if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::GreaterThanGreaterThanEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::GreaterThanGreaterThanToken
                    }
                } else if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::GreaterThanEqualsToken
                } else {
                    self.single(SyntaxKind::GreaterThanToken)
                }
            }
            b'=' => {
                if self.byte_at(self.pos + 1) == b'=' {
                    if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::EqualsEqualsEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::EqualsEqualsToken
                    }
                } else if self.byte_at(self.pos + 1) == b'>' {
                    self.pos += 2;
                    SyntaxKind::EqualsGreaterThanToken
                } else {
                    self.single(SyntaxKind::EqualsToken)
                }
            }
            b'!' => {
                if self.byte_at(self.pos + 1) == b'=' {
                    if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::ExclamationEqualsEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::ExclamationEqualsToken
                    }
                } else {
                    self.single(SyntaxKind::ExclamationToken)
                }
            }
            b'+' => {
                if self.byte_at(self.pos + 1) == b'+' {
                    self.pos += 2;
                    SyntaxKind::PlusPlusToken
                } else if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::PlusEqualsToken
                } else {
                    self.single(SyntaxKind::PlusToken)
                }
            }
            b'-' => {
                if self.byte_at(self.pos + 1) == b'-' {
                    self.pos += 2;
                    SyntaxKind::MinusMinusToken
                } else if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::MinusEqualsToken
                } else {
                    self.single(SyntaxKind::MinusToken)
                }
            }
            b'*' => {
                if self.byte_at(self.pos + 1) == b'*' {
                    if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::AsteriskAsteriskEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::AsteriskAsteriskToken
                    }
                } else if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::AsteriskEqualsToken
                } else {
                    self.single(SyntaxKind::AsteriskToken)
                }
            }
            b'/' => {
                if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::SlashEqualsToken
                } else {
                    self.single(SyntaxKind::SlashToken)
                }
            }
            b'%' => {
                if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::PercentEqualsToken
                } else {
                    self.single(SyntaxKind::PercentToken)
                }
            }
            b'&' => {
                if self.byte_at(self.pos + 1) == b'&' {
                    if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::AmpersandAmpersandEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::AmpersandAmpersandToken
                    }
                } else if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::AmpersandEqualsToken
                } else {
                    self.single(SyntaxKind::AmpersandToken)
                }
            }
            b'|' => {
                if self.byte_at(self.pos + 1) == b'|' {
                    if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::BarBarEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::BarBarToken
                    }
                } else if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::BarEqualsToken
                } else {
                    self.single(SyntaxKind::BarToken)
                }
            }
            b'^' => {
                if self.byte_at(self.pos + 1) == b'=' {
                    self.pos += 2;
                    SyntaxKind::CaretEqualsToken
                } else {
                    self.single(SyntaxKind::CaretToken)
                }
            }
            b'?' => {
                if self.byte_at(self.pos + 1) == b'?' {
                    if self.byte_at(self.pos + 2) == b'=' {
                        self.pos += 3;
                        SyntaxKind::QuestionQuestionEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::QuestionQuestionToken
                    }
                } else if self.byte_at(self.pos + 1) == b'.'
                    && !self.byte_at(self.pos + 2).is_ascii_digit()
                {
                    self.pos += 2;
                    SyntaxKind::QuestionDotToken
                } else {
                    self.single(SyntaxKind::QuestionToken)
                }
            }
            b'"' | b'\'' => self.scan_string(ch),
            b'`' => self.scan_template(),
            b'#' => {
                self.pos += 1;
                if self.is_identifier_start_at(self.pos) {
                    self.scan_identifier_part();
                    self.token_value.push_str(self.token_text());
                    SyntaxKind::PrivateIdentifier
                } else {
                    SyntaxKind::Unknown
                }
            }
            b'0'..=b'9' => self.scan_number(),
            _ => {
                if self.is_identifier_start_at(self.pos) {
                    self.scan_identifier_part();
                    let text = self.token_text();
                    self.token_value.push_str(text);
                    SyntaxKind::keyword_from_text(text).unwrap_or(SyntaxKind::Identifier)
                } else {
                    // Skip one char (possibly multi-byte) and report Unknown.
                    let width = self.source[self.pos..]
                        .chars()
                        .next()
                        .map(char::len_utf8)
                        .unwrap_or(1);
                    self.pos += width;
                    SyntaxKind::Unknown
                }
            }
        };
        self.token
    }

    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn is_identifier_start_at(&self, pos: usize) -> bool {
        let b = self.byte_at(pos);
        b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
    }

    fn is_identifier_part_at(&self, pos: usize) -> bool {
        let b = self.byte_at(pos);
        b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
    }

    fn scan_identifier_part(&mut self) {
        while self.pos < self.source.len() && self.is_identifier_part_at(self.pos) {
            if self.byte_at(self.pos) >= 0x80 {
                let width = self.source[self.pos..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
                self.pos += width;
            } else {
                self.pos += 1;
            }
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let bytes = self.bytes();
        let len = bytes.len();
        if bytes[self.pos] == b'0' && self.pos + 1 < len {
            let marker = bytes[self.pos + 1].to_ascii_lowercase();
            if marker == b'x' || marker == b'o' || marker == b'b' {
                self.pos += 2;
                while self.pos < len
                    && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
                {
                    if bytes[self.pos] == b'n' {
                        self.pos += 1;
                        return SyntaxKind::BigIntLiteral;
                    }
                    self.pos += 1;
                }
                return SyntaxKind::NumericLiteral;
            }
        }
        while self.pos < len && (bytes[self.pos].is_ascii_digit() || bytes[self.pos] == b'_') {
            self.pos += 1;
        }
        if self.byte_at(self.pos) == b'n' {
            self.pos += 1;
            return SyntaxKind::BigIntLiteral;
        }
        if self.byte_at(self.pos) == b'.' {
            self.pos += 1;
            while self.pos < len && (bytes[self.pos].is_ascii_digit() || bytes[self.pos] == b'_') {
                self.pos += 1;
            }
        }
        if self.byte_at(self.pos) == b'e' || self.byte_at(self.pos) == b'E' {
            let mut k = self.pos + 1;
            if self.byte_at(k) == b'+' || self.byte_at(k) == b'-' {
                k += 1;
            }
            if self.byte_at(k).is_ascii_digit() {
                self.pos = k;
                while self.pos < len && bytes[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
            }
        }
        SyntaxKind::NumericLiteral
    }

    fn scan_string(&mut self, quote: u8) -> SyntaxKind {
        let bytes = self.bytes();
        let len = bytes.len();
        self.pos += 1;
        loop {
            if self.pos >= len {
                self.error(codes::UNTERMINATED_STRING_LITERAL, "Unterminated string literal.");
                break;
            }
            let b = bytes[self.pos];
            if b == quote {
                self.pos += 1;
                break;
            }
            if b == b'\n' || b == b'\r' {
                self.error(codes::UNTERMINATED_STRING_LITERAL, "Unterminated string literal.");
                break;
            }
            if b == b'\\' {
                self.scan_escape_sequence();
                continue;
            }
            if b >= 0x80 {
                let ch = self.source[self.pos..].chars().next().unwrap_or('\u{FFFD}');
                self.token_value.push(ch);
                self.pos += ch.len_utf8();
            } else {
                self.token_value.push(b as char);
                self.pos += 1;
            }
        }
        SyntaxKind::StringLiteral
    }

    fn scan_escape_sequence(&mut self) {
        // At the backslash.
        self.pos += 1;
        let b = self.byte_at(self.pos);
        self.pos += 1;
        match b {
            b'n' => self.token_value.push('\n'),
            b't' => self.token_value.push('\t'),
            b'r' => self.token_value.push('\r'),
            b'b' => self.token_value.push('\u{8}'),
            b'f' => self.token_value.push('\u{c}'),
            b'v' => self.token_value.push('\u{b}'),
            b'0' if !self.byte_at(self.pos).is_ascii_digit() => self.token_value.push('\0'),
            b'x' => {
                let hex = &self.source[self.pos..(self.pos + 2).min(self.source.len())];
                if let Ok(value) = u32::from_str_radix(hex, 16)
                    && let Some(ch) = char::from_u32(value)
                {
                    self.token_value.push(ch);
                    self.pos += 2;
                }
            }
            b'u' => {
                if self.byte_at(self.pos) == b'{' {
                    let rest = &self.source[self.pos + 1..];
                    if let Some(close) = rest.find('}') {
                        if let Ok(value) = u32::from_str_radix(&rest[..close], 16)
                            && let Some(ch) = char::from_u32(value)
                        {
                            self.token_value.push(ch);
                        }
                        self.pos += close + 2;
                    }
                } else {
                    let hex = &self.source[self.pos..(self.pos + 4).min(self.source.len())];
                    if let Ok(value) = u32::from_str_radix(hex, 16)
                        && let Some(ch) = char::from_u32(value)
                    {
                        self.token_value.push(ch);
                        self.pos += 4;
                    }
                }
            }
            b'\r' => {
                // Line continuation; swallow a following \n too.
                if self.byte_at(self.pos) == b'\n' {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            _ => {
                if b >= 0x80 {
                    self.pos -= 1;
                    let ch = self.source[self.pos..].chars().next().unwrap_or('\u{FFFD}');
                    self.token_value.push(ch);
                    self.pos += ch.len_utf8();
                } else {
                    self.token_value.push(b as char);
                }
            }
        }
    }

    fn scan_template(&mut self) -> SyntaxKind {
        // At the opening backtick.
        self.pos += 1;
        self.scan_template_rest(true)
    }

    /// Scan forward from the current position to the end of a template
    /// piece. Returns `NoSubstitutionTemplateLiteral`/`TemplateHead` when
    /// `from_backtick`, otherwise `TemplateTail`/`TemplateMiddle`.
    fn scan_template_rest(&mut self, from_backtick: bool) -> SyntaxKind {
        let bytes = self.bytes();
        let len = bytes.len();
        loop {
            if self.pos >= len {
                self.error(
                    codes::UNTERMINATED_TEMPLATE_LITERAL,
                    "Unterminated template literal.",
                );
                return if from_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            }
            match bytes[self.pos] {
                b'`' => {
                    self.pos += 1;
                    return if from_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                b'$' if self.byte_at(self.pos + 1) == b'{' => {
                    self.pos += 2;
                    return if from_backtick {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                b'\\' => {
                    self.pos += 2.min(len - self.pos);
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Rescan a `}` as the continuation of a template literal.
    /// The parser calls this when it reaches the close brace of a
    /// `${ ... }` substitution.
    pub fn rescan_template_continuation(&mut self) -> SyntaxKind {
        debug_assert_eq!(self.token, SyntaxKind::CloseBraceToken);
        self.pos = self.token_start + 1;
        self.token = self.scan_template_rest(false);
        self.token
    }

    /// Rescan `/` or `/=` as a regular expression literal. The parser
    /// calls this in expression-start position.
    pub fn rescan_slash_as_regex(&mut self) -> SyntaxKind {
        debug_assert!(matches!(
            self.token,
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
        ));
        let bytes = self.bytes();
        let len = bytes.len();
        self.pos = self.token_start + 1;
        let mut in_class = false;
        loop {
            if self.pos >= len {
                self.error(
                    codes::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                    "Unterminated regular expression literal.",
                );
                break;
            }
            match bytes[self.pos] {
                b'\n' | b'\r' => {
                    self.error(
                        codes::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                        "Unterminated regular expression literal.",
                    );
                    break;
                }
                b'\\' => self.pos += 2.min(len - self.pos),
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => {
                    self.pos += 1;
                    // Flags
                    while self.pos < len && self.is_identifier_part_at(self.pos) {
                        self.pos += 1;
                    }
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Scan the next token inside a JSX element body. Whitespace is
    /// significant here, so no trivia is skipped: runs of text become a
    /// single `JsxText` token, and `{`, `<` and `</` scan as usual.
    pub fn scan_jsx_token(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token_value.clear();
        self.token_start = self.pos;
        let bytes = self.bytes();
        let len = bytes.len();
        if self.pos >= len {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        }
        match bytes[self.pos] {
            b'<' => {
                if self.byte_at(self.pos + 1) == b'/' {
                    self.pos += 2;
                    self.token = SyntaxKind::LessThanSlashToken;
                } else {
                    self.pos += 1;
                    self.token = SyntaxKind::LessThanToken;
                }
            }
            b'{' => {
                self.pos += 1;
                self.token = SyntaxKind::OpenBraceToken;
            }
            _ => {
                while self.pos < len && bytes[self.pos] != b'<' && bytes[self.pos] != b'{' {
                    self.pos += 1;
                }
                self.token = SyntaxKind::JsxText;
            }
        }
        self.token
    }
}

/// Numeric value of a literal's source text, handling hex, octal,
/// binary, separators, and exponents. Used for constant enum folding.
pub fn parse_numeric_value(raw: &str) -> Option<f64> {
    let text: String = raw.chars().filter(|c| *c != '_').collect();
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return u64::from_str_radix(oct, 8).ok().map(|v| v as f64);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return u64::from_str_radix(bin, 2).ok().map(|v| v as f64);
    }
    text.parse::<f64>().ok()
}
