//! tsdl: TypeScript-to-JavaScript downlevel compilation.
//!
//! The pipeline runs strictly per file: scan, parse, bind, transform,
//! print. Types are erased, enums and namespaces are materialized as
//! runtime objects, const enum reads are inlined, and module syntax is
//! lowered to the configured format. No stage sees more than one file,
//! so the CLI can compile files in parallel.
//!
//! [`compile_source`] runs the whole pipeline for one file; the member
//! crates are re-exported for callers that want a single stage.

// Pipeline stages, one crate each.
pub use tsdl_binder as binder;
pub use tsdl_common as common;
pub use tsdl_emitter as emitter;
pub use tsdl_parser as parser;
pub use tsdl_scanner as scanner;

pub use tsdl_common::{
    CompilerOptions, Diagnostic, DiagnosticCategory, JsxEmit, ModuleKind, NewLineKind,
    ScriptTarget,
};
pub use tsdl_emitter::EmitResult;

// Tracing configuration (TSDL_LOG / TSDL_LOG_FORMAT).
pub mod tracing_config;

// Native CLI for the tsdl binary.
#[cfg(feature = "cli")]
pub mod cli;

/// Everything produced by compiling one file: the JavaScript text and
/// the diagnostics of every stage, stamped with the file name.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Compile one TypeScript source text to JavaScript.
///
/// Parse errors are fatal for the unit: the returned text is empty and
/// the diagnostics carry only the syntax errors. After a clean parse
/// the binder and the transforms run to completion; their diagnostics
/// are collected but never stop the emit.
pub fn compile_source(file_name: &str, source: &str, options: &CompilerOptions) -> CompileOutput {
    let _span = tracing::debug_span!("compile", file = %file_name).entered();

    let mut tree = parser::ParserState::new(file_name, source).parse_source_file();
    if tree.has_errors() {
        tracing::debug!(count = tree.diagnostics.len(), "parse failed, unit discarded");
        return CompileOutput {
            text: String::new(),
            diagnostics: stamp(tree.diagnostics, file_name),
        };
    }
    let mut diagnostics = std::mem::take(&mut tree.diagnostics);

    let binding = binder::bind_source_file(&tree);
    diagnostics.extend(binding.diagnostics.iter().cloned());

    let result = emitter::emit_source_file(&mut tree, &binding, options, source);
    diagnostics.extend(result.diagnostics);

    CompileOutput {
        text: result.text,
        diagnostics: stamp(diagnostics, file_name),
    }
}

fn stamp(diagnostics: Vec<Diagnostic>, file_name: &str) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .map(|d| d.with_file(file_name))
        .collect()
}
