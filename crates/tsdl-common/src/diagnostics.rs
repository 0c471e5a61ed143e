//! Diagnostics reported by the scanner, parser, and transforms.

use serde::Serialize;

use crate::span::Span;

/// The severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    /// Construct is invalid; the offending node is dropped from output.
    Error,
    /// Construct is outside the supported surface; output continues with
    /// a best-effort fallback.
    Warning,
    /// Advisory note about an emit decision.
    Message,
    Suggestion,
}

/// A single diagnostic, positioned by byte offset into its file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub start: u32,
    pub length: u32,
    #[serde(rename = "messageText")]
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    pub fn error(span: Span, code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            file: None,
            start: span.start,
            length: span.len(),
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }

    pub fn warning(span: Span, code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            file: None,
            start: span.start,
            length: span.len(),
            message_text: message.into(),
            category: DiagnosticCategory::Warning,
            code,
        }
    }

    pub fn message(span: Span, code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            file: None,
            start: span.start,
            length: span.len(),
            message_text: message.into(),
            category: DiagnosticCategory::Message,
            code,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Diagnostic codes, numbered to match tsc where an equivalent message
/// exists. Codes in the 90xxx range are specific to this compiler.
pub mod codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const ASTERISK_SLASH_EXPECTED: u32 = 1010;
    pub const ENUM_MEMBER_MUST_HAVE_INITIALIZER: u32 = 1061;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const TYPE_EXPECTED: u32 = 1110;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const STRING_LITERAL_EXPECTED: u32 = 1141;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: u32 = 1161;
    pub const IMPORT_ASSIGNMENT_IN_ESM: u32 = 1202;
    pub const EXPORT_ASSIGNMENT_IN_ESM: u32 = 1203;
    pub const CONST_ENUM_INITIALIZER_NOT_CONSTANT: u32 = 2474;
    pub const NO_EXPORTED_MEMBER: u32 = 2694;
    pub const JSX_ELEMENT_NO_CLOSING_TAG: u32 = 17008;

    /// System module output is emitted in CommonJS shape.
    pub const SYSTEM_MODULE_FALLBACK: u32 = 90010;
    /// A construct was kept as-is because no lowering is implemented.
    pub const CONSTRUCT_NOT_LOWERED: u32 = 90011;
}
