//! Compiler options controlling lowering and emit.

use serde::Serialize;

/// Emit language level. Everything at or above ES2015 keeps classes,
/// `let`/`const`, arrow functions, and template literals in output; the
/// target mainly decides the class-field lowering default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTarget {
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    #[default]
    EsNext,
}

impl ScriptTarget {
    pub fn from_str_ignore_case(value: &str) -> Option<ScriptTarget> {
        Some(match value.to_ascii_lowercase().as_str() {
            "es2015" | "es6" => ScriptTarget::Es2015,
            "es2016" => ScriptTarget::Es2016,
            "es2017" => ScriptTarget::Es2017,
            "es2018" => ScriptTarget::Es2018,
            "es2019" => ScriptTarget::Es2019,
            "es2020" => ScriptTarget::Es2020,
            "es2021" => ScriptTarget::Es2021,
            "es2022" => ScriptTarget::Es2022,
            "esnext" => ScriptTarget::EsNext,
            _ => return None,
        })
    }
}

/// Module emit format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// No module lowering; import/export syntax is reported and kept.
    None,
    #[default]
    CommonJs,
    /// Leave module syntax in place (imports still elided).
    EsNext,
    /// Accepted but emitted in CommonJS shape, with an advisory note.
    System,
}

impl ModuleKind {
    pub fn from_str_ignore_case(value: &str) -> Option<ModuleKind> {
        Some(match value.to_ascii_lowercase().as_str() {
            "none" => ModuleKind::None,
            "commonjs" => ModuleKind::CommonJs,
            "esnext" | "es2015" | "es2020" | "es2022" | "es6" => ModuleKind::EsNext,
            "system" => ModuleKind::System,
            _ => return None,
        })
    }
}

/// JSX handling. Only preserve mode is supported: JSX is parsed and
/// re-printed structurally, never rewritten to factory calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsxEmit {
    #[default]
    Preserve,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum NewLineKind {
    #[default]
    LineFeed,
    CarriageReturnLineFeed,
}

impl NewLineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewLineKind::LineFeed => "\n",
            NewLineKind::CarriageReturnLineFeed => "\r\n",
        }
    }
}

/// Options for a single compilation.
#[derive(Clone, Debug, Default)]
pub struct CompilerOptions {
    pub target: ScriptTarget,
    pub module: ModuleKind,
    /// When unset, derived from the target (ES2022 and later default to
    /// define semantics).
    pub use_define_for_class_fields: Option<bool>,
    pub remove_comments: bool,
    /// Keep const enums as runtime objects instead of inlining reads.
    pub preserve_const_enums: bool,
    pub jsx: JsxEmit,
    pub new_line: NewLineKind,
}

impl CompilerOptions {
    /// Whether class fields keep their declarations and initializers in
    /// place (define semantics) rather than moving initializers into the
    /// constructor (assign semantics).
    pub fn class_fields_use_define(&self) -> bool {
        self.use_define_for_class_fields
            .unwrap_or(self.target >= ScriptTarget::Es2022)
    }
}
