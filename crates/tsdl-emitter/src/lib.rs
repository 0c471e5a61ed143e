//! Downlevel transforms and JavaScript printer.
//!
//! [`emit_source_file`] rewrites a bound parse tree in place (type
//! erasure, class fields, enums, namespaces, module format) and prints
//! the result. The tree is consumed conceptually: lowering replaces
//! statement lists and node kinds, so a tree should be emitted once.

mod context;
mod printer;
mod transforms;

use tsdl_binder::FileBinding;
use tsdl_common::diagnostics::{Diagnostic, codes};
use tsdl_common::{CompilerOptions, ModuleKind, Span};
use tsdl_parser::{NodeKind, ParseTree};

use crate::context::EmitContext;
use crate::printer::Printer;

#[derive(Debug)]
pub struct EmitResult {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lower `tree` to plain JavaScript and print it.
///
/// `source` must be the text the tree was parsed from; literals and
/// comments print from it by span.
pub fn emit_source_file(
    tree: &mut ParseTree,
    binding: &FileBinding,
    options: &CompilerOptions,
    source: &str,
) -> EmitResult {
    let root = tree.root;
    let (is_module, file_name) = match &tree.arena.get(root).kind {
        NodeKind::SourceFile(data) => (data.is_module, data.file_name.clone()),
        _ => (false, String::new()),
    };
    let _span = tracing::debug_span!("emit", file = %file_name).entered();

    let mut cx = EmitContext::new(&tree.arena, binding, options);
    if !is_module {
        transforms::modules::lower_plain(&mut cx, &mut tree.arena, root);
    } else {
        match options.module {
            ModuleKind::CommonJs => {
                transforms::modules::lower_commonjs(&mut cx, &mut tree.arena, root);
            }
            ModuleKind::System => {
                cx.diagnostics.push(Diagnostic::message(
                    Span::new(0, 0),
                    codes::SYSTEM_MODULE_FALLBACK,
                    "System module output is not supported; emitting CommonJS shape instead.",
                ));
                transforms::modules::lower_commonjs(&mut cx, &mut tree.arena, root);
            }
            ModuleKind::EsNext => {
                transforms::modules::lower_esnext(&mut cx, &mut tree.arena, root);
            }
            ModuleKind::None => {
                cx.diagnostics.push(Diagnostic::error(
                    Span::new(0, 0),
                    codes::CONSTRUCT_NOT_LOWERED,
                    "File is a module but no module format is selected; \
                     import and export statements are left as written.",
                ));
                transforms::modules::lower_esnext(&mut cx, &mut tree.arena, root);
            }
        }
    }

    let diagnostics = cx.diagnostics;
    tracing::debug!(count = diagnostics.len(), "lowering complete");
    let text = Printer::new(&tree.arena, &tree.comments, source, options).print(root);
    EmitResult { text, diagnostics }
}
