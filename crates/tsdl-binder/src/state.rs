//! Binder state: scopes, symbol declaration, and name resolution.
//!
//! Binding runs in two passes over one parsed file. The first pass
//! declares every symbol and records the scope created for each
//! scope-owning node; the second pass re-enters those scopes, resolves
//! identifier references against them, and evaluates enum member
//! constants. Two passes because forward references are legal: a
//! function body may read a `var` declared later in the same namespace
//! block, or a member exported from a later merged block, and both must
//! resolve to the member rather than falling through to an outer name.

use rustc_hash::FxHashMap;
use tsdl_common::Diagnostic;
use tsdl_parser::ast::NodeArena;
use tsdl_parser::{NodeId, NodeKind, ParseTree};

use crate::symbols::{Symbol, SymbolArena, SymbolId, SymbolKind, SymbolTable};

/// Handle into the binder's scope list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct ScopeId(u32);

impl ScopeId {
    pub(crate) const NONE: ScopeId = ScopeId(u32::MAX);

    fn new(index: usize) -> ScopeId {
        debug_assert!(index < u32::MAX as usize);
        ScopeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }

    fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

/// What kind of construct owns a scope. `var` declarations hoist to the
/// nearest `SourceFile`, `Module`, or `Function` scope; everything else
/// binds where it stands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ContainerKind {
    SourceFile,
    Module,
    Function,
    /// Class expression scope holding the expression's own name.
    Class,
    Enum,
    Block,
}

pub(crate) struct Scope {
    pub(crate) kind: ContainerKind,
    /// Node the scope was created for; the second pass re-enters by it.
    pub(crate) node: NodeId,
    pub(crate) parent: ScopeId,
    pub(crate) locals: SymbolTable,
    /// Symbol of the namespace or enum this scope belongs to, `NONE`
    /// for plain lexical scopes. Name lookup falls through to its
    /// merged export table, and members declared here get it as parent.
    pub(crate) container_symbol: SymbolId,
}

pub(crate) struct BinderState<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) file_name: String,
    pub(crate) symbols: SymbolArena,
    scopes: Vec<Scope>,
    current: ScopeId,
    /// Scope created for each scope-owning node during the first pass.
    node_scopes: FxHashMap<NodeId, ScopeId>,
    pub(crate) node_symbols: FxHashMap<NodeId, SymbolId>,
    pub(crate) references: FxHashMap<NodeId, SymbolId>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> BinderState<'a> {
    pub(crate) fn new(arena: &'a NodeArena, file_name: String) -> BinderState<'a> {
        BinderState {
            arena,
            file_name,
            symbols: SymbolArena::new(),
            scopes: Vec::new(),
            current: ScopeId::NONE,
            node_scopes: FxHashMap::default(),
            node_symbols: FxHashMap::default(),
            references: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, root), fields(file = %self.file_name))]
    pub(crate) fn bind_root(&mut self, root: NodeId) {
        self.push_scope(ContainerKind::SourceFile, root, SymbolId::NONE);
        if let NodeKind::SourceFile(data) = self.arena.kind(root) {
            for &statement in &data.statements {
                self.declare_in(statement);
            }
            for &statement in &data.statements {
                self.visit(statement);
            }
        }
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    pub(crate) fn push_scope(
        &mut self,
        kind: ContainerKind,
        node: NodeId,
        container_symbol: SymbolId,
    ) -> ScopeId {
        let id = ScopeId::new(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            node,
            parent: self.current,
            locals: SymbolTable::new(),
            container_symbol,
        });
        self.node_scopes.insert(node, id);
        self.current = id;
        id
    }

    /// First-pass scope exit. Pushes members of a namespace or enum
    /// scope into the container symbol's export table, where merged
    /// blocks of the same name accumulate, then returns to the parent.
    pub(crate) fn exit_scope(&mut self) {
        let scope = &self.scopes[self.current.index()];
        let parent = scope.parent;
        let container = scope.container_symbol;
        if container.is_some() {
            let capture_all = matches!(scope.kind, ContainerKind::Enum);
            let mut captured = Vec::new();
            for (name, id) in scope.locals.iter() {
                if capture_all || self.symbols.get(id).is_exported {
                    captured.push((name.to_string(), id));
                }
            }
            for (name, id) in captured {
                self.symbols
                    .get_mut(container)
                    .exports
                    .get_or_insert_with(|| Box::new(SymbolTable::new()))
                    .set(name, id);
            }
        }
        self.current = parent;
    }

    /// Second-pass re-entry into a scope recorded by the first pass.
    /// Returns false when the node never got one (ambient subtrees).
    pub(crate) fn reenter_scope(&mut self, node: NodeId) -> bool {
        if let Some(&scope) = self.node_scopes.get(&node) {
            self.current = scope;
            true
        } else {
            false
        }
    }

    pub(crate) fn leave_scope(&mut self) {
        self.current = self.scopes[self.current.index()].parent;
    }

    // =========================================================================
    // Declaration
    // =========================================================================

    pub(crate) fn declare_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        declaration: NodeId,
        is_exported: bool,
    ) -> SymbolId {
        self.declare_symbol_in(self.current, name, kind, declaration, is_exported)
    }

    /// Declare into the nearest scope `var` declarations hoist to.
    pub(crate) fn declare_hoisted_symbol(
        &mut self,
        name: &str,
        declaration: NodeId,
        is_exported: bool,
    ) -> SymbolId {
        let mut scope = self.current;
        loop {
            match self.scopes[scope.index()].kind {
                ContainerKind::SourceFile | ContainerKind::Module | ContainerKind::Function => {
                    break;
                }
                _ => scope = self.scopes[scope.index()].parent,
            }
        }
        self.declare_symbol_in(scope, name, SymbolKind::Var, declaration, is_exported)
    }

    pub(crate) fn declare_symbol_in(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        declaration: NodeId,
        is_exported: bool,
    ) -> SymbolId {
        let container_node = self.scopes[scope.index()].node;
        let container_symbol = self.scopes[scope.index()].container_symbol;
        let existing = self.scopes[scope.index()].locals.get(name);
        let id = match existing {
            Some(id) if can_merge(&self.symbols.get(id).kind, &kind) => {
                let symbol = self.symbols.get_mut(id);
                if kind_rank(&kind) > kind_rank(&symbol.kind) {
                    symbol.kind = kind;
                }
                id
            }
            _ => {
                // Non-mergeable redeclarations are the checker's
                // problem; the later declaration wins the name.
                let id = self.symbols.alloc(name.to_string(), kind);
                self.scopes[scope.index()]
                    .locals
                    .set(name.to_string(), id);
                id
            }
        };
        let symbol = self.symbols.get_mut(id);
        symbol.declarations.push(declaration);
        symbol.containers.push(container_node);
        symbol.is_exported |= is_exported;
        if symbol.parent.is_none() {
            symbol.parent = container_symbol;
        }
        self.node_symbols.insert(declaration, id);
        tracing::debug!(name = %name, symbol = ?id, exported = is_exported, "declare");
        id
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Innermost binding for `name`, walking the scope chain. Namespace
    /// and enum scopes fall through their locals to the container's
    /// merged export table, so members of other blocks of the same
    /// container resolve too.
    pub(crate) fn resolve_name(&self, name: &str) -> Option<SymbolId> {
        let mut scope = self.current;
        while scope.is_some() {
            let s = &self.scopes[scope.index()];
            if let Some(id) = s.locals.get(name) {
                return Some(id);
            }
            if s.container_symbol.is_some()
                && let Some(id) = self.symbols.get(s.container_symbol).export(name)
            {
                return Some(id);
            }
            scope = s.parent;
        }
        None
    }

    pub(crate) fn mark_value_referenced(&mut self, id: SymbolId) {
        self.symbols.get_mut(id).value_referenced = true;
    }

    /// Resolve an identifier in value position: record the reference
    /// for the emitter and mark the target as runtime-used.
    pub(crate) fn resolve_reference(&mut self, node: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(id) = self.resolve_name(text) {
            self.references.insert(node, id);
            self.mark_value_referenced(id);
        }
    }

    pub(crate) fn error_at(&mut self, node: NodeId, code: u32, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(self.arena.span(node), code, message));
    }

    pub(crate) fn finish(self) -> FileBinding {
        tracing::debug!(
            file = %self.file_name,
            symbols = self.symbols.len(),
            references = self.references.len(),
            "binding complete"
        );
        FileBinding {
            symbols: self.symbols,
            node_symbols: self.node_symbols,
            references: self.references,
            diagnostics: self.diagnostics,
        }
    }
}

/// Declaration merging. Same-kind declarations merge (`var`
/// redeclaration, function overloads, namespace blocks, enum blocks);
/// namespaces additionally merge with classes, functions, and enums,
/// and interfaces with classes and namespaces. Const and non-const
/// enums never merge.
fn can_merge(existing: &SymbolKind, incoming: &SymbolKind) -> bool {
    use SymbolKind::*;
    match (existing, incoming) {
        (Var, Var) => true,
        (Function, Function) => true,
        (Enum, Enum) => true,
        (ConstEnum, ConstEnum) => true,
        (TypeOnly, TypeOnly) => true,
        (Namespace, Namespace | Class | Function | Enum | ConstEnum | TypeOnly) => true,
        (Class | Function | Enum | ConstEnum | TypeOnly, Namespace) => true,
        (Class, TypeOnly) | (TypeOnly, Class) => true,
        _ => false,
    }
}

/// Merged symbols keep the most specific kind: any value kind beats
/// `Namespace`, which beats `TypeOnly`.
fn kind_rank(kind: &SymbolKind) -> u8 {
    match kind {
        SymbolKind::TypeOnly => 0,
        SymbolKind::Namespace => 1,
        _ => 2,
    }
}

/// Everything the transforms need to know about one bound file.
pub struct FileBinding {
    pub symbols: SymbolArena,
    /// Declaration node to the symbol it declares.
    pub node_symbols: FxHashMap<NodeId, SymbolId>,
    /// Value-position identifier to the symbol it resolved to.
    pub references: FxHashMap<NodeId, SymbolId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileBinding {
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.symbols.get(id)
    }

    /// Symbol declared by `node`, if any.
    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    /// Symbol a value-position identifier resolved to, if any.
    pub fn reference(&self, node: NodeId) -> Option<SymbolId> {
        self.references.get(&node).copied()
    }

    /// Whether an import binding declared by `node` was read in a value
    /// position anywhere in the file. Unreferenced bindings are elided.
    pub fn import_used(&self, node: NodeId) -> bool {
        self.symbol_of(node)
            .is_some_and(|id| self.symbol(id).value_referenced)
    }

    /// Exported member `name` of a namespace, enum, or merged class.
    pub fn member(&self, container: SymbolId, name: &str) -> Option<SymbolId> {
        self.symbol(container).export(name)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Bind one parsed file. Infallible like parsing: problems surface as
/// diagnostics on the returned binding, and unresolved names simply
/// stay out of the reference map, leaving those identifiers untouched
/// by later rewrites.
pub fn bind_source_file(tree: &ParseTree) -> FileBinding {
    let file_name = match tree.arena.kind(tree.root) {
        NodeKind::SourceFile(data) => data.file_name.clone(),
        _ => String::new(),
    };
    let mut binder = BinderState::new(&tree.arena, file_name);
    binder.bind_root(tree.root);
    binder.finish()
}
