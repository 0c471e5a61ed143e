//! Shared state threaded through the lowering passes.

use rustc_hash::{FxHashMap, FxHashSet};
use tsdl_binder::{FileBinding, SymbolId};
use tsdl_common::{CompilerOptions, Diagnostic};
use tsdl_parser::{NodeArena, NodeId, NodeKind};

/// Per-file lowering state. The arena is passed alongside rather than
/// held here so passes can rewrite nodes while the context stays
/// borrowed; everything in the context is resolution state, not tree
/// state.
pub(crate) struct EmitContext<'a> {
    pub binding: &'a FileBinding,
    pub options: &'a CompilerOptions,
    pub diagnostics: Vec<Diagnostic>,
    /// Container symbols whose local `var`/`let` has already been
    /// synthesized, so merged namespace and enum blocks declare once.
    pub declared_containers: FxHashSet<SymbolId>,
    /// Module temp per lowered import statement, e.g. `foo_1` for the
    /// first `require("foo")`.
    pub module_temps: FxHashMap<NodeId, String>,
    /// Every identifier spelled in the file, so generated names never
    /// collide with source bindings.
    used_names: FxHashSet<String>,
}

impl<'a> EmitContext<'a> {
    pub fn new(
        arena: &NodeArena,
        binding: &'a FileBinding,
        options: &'a CompilerOptions,
    ) -> EmitContext<'a> {
        let mut used_names = FxHashSet::default();
        for index in 0..arena.len() {
            if let NodeKind::Identifier { text } = &arena.get(NodeId::new(index)).kind {
                used_names.insert(text.clone());
            }
        }
        EmitContext {
            binding,
            options,
            diagnostics: Vec::new(),
            declared_containers: FxHashSet::default(),
            module_temps: FxHashMap::default(),
            used_names,
        }
    }

    /// `base_1`, `base_2`, ... skipping anything the file already
    /// spells. The chosen name is reserved for the rest of the file.
    pub fn unique_name(&mut self, base: &str) -> String {
        let mut counter = 1;
        loop {
            let candidate = format!("{base}_{counter}");
            if !self.used_names.contains(&candidate) {
                self.used_names.insert(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }

    /// Temp name stem for a module specifier: the last path segment
    /// with its extension dropped and non-identifier characters
    /// replaced, the way tsc derives `foo_1` from `"./a/foo.js"`.
    pub fn module_temp_stem(specifier: &str) -> String {
        let last = specifier
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(specifier);
        let stem = last.split('.').find(|part| !part.is_empty()).unwrap_or(last);
        let mut out = String::with_capacity(stem.len());
        for (i, ch) in stem.chars().enumerate() {
            let valid = ch == '_'
                || ch == '$'
                || if i == 0 {
                    ch.is_ascii_alphabetic()
                } else {
                    ch.is_ascii_alphanumeric()
                };
            if valid {
                out.push(ch);
            } else if i == 0 && ch.is_ascii_digit() {
                out.push('_');
                out.push(ch);
            } else {
                out.push('_');
            }
        }
        if out.chars().all(|c| c == '_') {
            "module".to_string()
        } else {
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_temp_stems() {
        assert_eq!(EmitContext::module_temp_stem("./test"), "test");
        assert_eq!(EmitContext::module_temp_stem("../a/b.js"), "b");
        assert_eq!(EmitContext::module_temp_stem("@scope/pkg"), "pkg");
        assert_eq!(EmitContext::module_temp_stem("some-lib"), "some_lib");
        assert_eq!(EmitContext::module_temp_stem("7zip"), "_7zip");
        assert_eq!(EmitContext::module_temp_stem("./"), "module");
    }
}
