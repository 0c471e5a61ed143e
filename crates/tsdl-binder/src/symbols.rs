//! Symbols, symbol tables, and the arena that owns them.

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tsdl_parser::NodeId;

/// Handle into a [`SymbolArena`]. `NONE` is the absent sentinel, same
/// convention as [`NodeId`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    pub fn new(index: usize) -> SymbolId {
        debug_assert!(index < u32::MAX as usize);
        SymbolId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    pub fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "SymbolId(NONE)")
        } else {
            write!(f, "SymbolId({})", self.0)
        }
    }
}

/// How an `import` clause binding maps onto the module object once the
/// declaration is lowered to a `require` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportBinding {
    /// `import d from "m"`: reads become `m_1.default`.
    Default,
    /// `import * as ns from "m"`: reads become the module temp itself.
    Namespace,
    /// `import { a as b } from "m"`: reads become `m_1.a`. `property`
    /// is the module-side name (`a`), not the local one.
    Named { property: String },
    /// `import x = require("m")`.
    EqualsRequire,
}

/// What a declaration introduces. One kind per symbol; merged
/// declarations keep the most specific value kind (a namespace merged
/// with a class is a `Class` whose declaration list also carries the
/// module blocks).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Function,
    Class,
    Enum,
    ConstEnum,
    Namespace,
    /// Interface or type alias. No runtime emit; bound so export
    /// clauses can tell value exports from erased ones.
    TypeOnly,
    /// `import x = A.B` entity-name alias.
    Alias,
    Import(ImportBinding),
    EnumMember,
}

impl SymbolKind {
    pub fn is_enum(&self) -> bool {
        matches!(self, SymbolKind::Enum | SymbolKind::ConstEnum)
    }

    /// Kinds that produce a runtime value. `TypeOnly` and unreferenced
    /// imports are the ones that do not.
    pub fn is_value(&self) -> bool {
        !matches!(self, SymbolKind::TypeOnly)
    }
}

/// Compile-time constant of an enum member.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Number(f64),
    Str(String),
}

impl ConstValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConstValue::Number(n) => Some(*n),
            ConstValue::Str(_) => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ConstValue::Str(_))
    }
}

/// A named declaration, possibly merged across several declaration
/// sites (namespace blocks, enum blocks, function overloads).
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Declaration nodes in source order, one per merged site.
    pub declarations: SmallVec<[NodeId; 1]>,
    /// For each declaration, the body node of the container it sits in
    /// (module block, source file, function node). Parallel to
    /// `declarations`; lets the emitter ask whether a reference and a
    /// member live in the same block of a merged namespace.
    pub containers: SmallVec<[NodeId; 1]>,
    pub is_exported: bool,
    /// Enclosing namespace or enum symbol, `NONE` at top level and in
    /// plain lexical scopes.
    pub parent: SymbolId,
    /// Evaluated constant, enum members only.
    pub const_value: Option<ConstValue>,
    /// Exported members, accumulated across merged blocks. Present on
    /// namespace and enum symbols.
    pub exports: Option<Box<SymbolTable>>,
    /// An identifier for this symbol appeared in a value position.
    /// Drives import elision and alias retention.
    pub value_referenced: bool,
    /// For import bindings: the `import` statement that declared them,
    /// so reads can be rewritten against that statement's module temp.
    pub import_statement: NodeId,
}

impl Symbol {
    fn new(name: String, kind: SymbolKind) -> Symbol {
        Symbol {
            name,
            kind,
            declarations: SmallVec::new(),
            containers: SmallVec::new(),
            is_exported: false,
            parent: SymbolId::NONE,
            const_value: None,
            exports: None,
            value_referenced: false,
            import_statement: NodeId::NONE,
        }
    }

    /// Exported member by name, if this symbol carries an export table.
    pub fn export(&self, name: &str) -> Option<SymbolId> {
        self.exports.as_ref().and_then(|table| table.get(name))
    }

    /// Whether `container` is one of the blocks this symbol was
    /// declared in.
    pub fn declared_in(&self, container: NodeId) -> bool {
        self.containers.contains(&container)
    }
}

/// Name to symbol map for one scope or export surface.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.entries.get(name).copied()
    }

    pub fn set(&mut self, name: String, symbol: SymbolId) {
        self.entries.insert(name, symbol);
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owns every symbol of one bound file.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, name: String, kind: SymbolKind) -> SymbolId {
        let id = SymbolId::new(self.symbols.len());
        self.symbols.push(Symbol::new(name, kind));
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
