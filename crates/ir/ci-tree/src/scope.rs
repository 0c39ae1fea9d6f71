//! Scope tree for name lookup

use crate::{ScopeId, SymbolId};
use ci_intern::Name;
use indexmap::IndexMap;
use indexmap::map::Entry;
use la_arena::Arena;
use rustc_hash::FxBuildHasher;
use std::iter;

/// What introduced a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Program-level scope holding every top-level type
    Global,
    /// Members of a class or enum
    Type(SymbolId),
    /// Parameters of a method, constructor or destructor
    Method(SymbolId),
    /// Locals of a block, `for` statement or case body
    Block,
}

/// A single scope: an ordered name table plus a link to its parent
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    /// What introduced the scope
    pub kind: ScopeKind,
    /// Enclosing scope; `None` for the global scope
    pub parent: Option<ScopeId>,
    symbols: IndexMap<Name, SymbolId, FxBuildHasher>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            symbols: IndexMap::default(),
        }
    }

    /// Symbol declared under `name` in this scope only
    pub fn get(&self, name: Name) -> Option<SymbolId> {
        self.symbols.get(&name).copied()
    }

    /// Whether `name` is declared in this scope
    pub fn contains(&self, name: Name) -> bool {
        self.symbols.contains_key(&name)
    }

    /// Declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Name, SymbolId)> + '_ {
        self.symbols.iter().map(|(name, symbol)| (*name, *symbol))
    }

    /// Declared symbols in insertion order
    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols.values().copied()
    }

    /// Declared names in insertion order
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.symbols.keys().copied()
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether nothing is declared here
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// All scopes of a compilation unit
///
/// Scopes refer to their parents by index, so lookups never chase raw
/// references and the tree can be cloned freely.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeTree {
    scopes: Arena<Scope>,
    global: ScopeId,
}

impl ScopeTree {
    /// Creates a tree holding only the global scope
    pub fn new() -> Self {
        let mut scopes = Arena::new();
        let global = scopes.alloc(Scope::new(ScopeKind::Global, None));
        Self { scopes, global }
    }

    /// The root scope; it has no parent
    pub fn global(&self) -> ScopeId {
        self.global
    }

    /// Creates an empty scope nested in `parent`
    pub fn create_child(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        self.scopes.alloc(Scope::new(kind, Some(parent)))
    }

    /// Scope data
    pub fn get(&self, scope: ScopeId) -> &Scope {
        &self.scopes[scope]
    }

    /// Enclosing scope
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope].parent
    }

    /// Number of scopes, the global one included
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false: the global scope exists from construction
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Declares `name` in `scope`
    ///
    /// # Errors
    ///
    /// Returns the symbol already declared under `name` in this very scope.
    /// Enclosing scopes are not consulted: shadowing is allowed.
    pub fn add(&mut self, scope: ScopeId, name: Name, symbol: SymbolId) -> Result<(), SymbolId> {
        match self.scopes[scope].symbols.entry(name) {
            Entry::Occupied(existing) => Err(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(symbol);
                Ok(())
            }
        }
    }

    /// Declares `name` in `scope` unless it is already declared there
    pub(crate) fn add_if_absent(&mut self, scope: ScopeId, name: Name, symbol: SymbolId) {
        self.scopes[scope].symbols.entry(name).or_insert(symbol);
    }

    /// Looks `name` up in `scope` only
    pub fn lookup_local(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        self.scopes[scope].get(name)
    }

    /// Looks `name` up from `scope` outwards; the nearest declaration wins
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        self.ancestors(scope)
            .find_map(|current| self.scopes[current].get(name))
    }

    /// `scope` followed by each enclosing scope up to the global one
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), |current| self.scopes[*current].parent)
    }

    /// Every name visible from `scope`, innermost first
    pub fn visible_names(&self, scope: ScopeId) -> Vec<Name> {
        self.ancestors(scope)
            .flat_map(|current| self.scopes[current].names())
            .collect()
    }

    /// All scopes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Line, NamedValue, Symbol, SymbolKind};
    use ci_intern::Interner;

    fn placeholder_symbols(count: usize) -> Vec<SymbolId> {
        let mut exprs = Arena::new();
        let ty = exprs.alloc(crate::Expr::GotoDefault { line: Line::new(0) });
        let mut interner = Interner::new();
        let name = interner.intern("_");
        let mut symbols = Arena::new();
        (0..count)
            .map(|_| {
                symbols.alloc(Symbol::new(
                    name,
                    Line::new(0),
                    SymbolKind::Var(NamedValue { ty, value: None }),
                ))
            })
            .collect()
    }

    #[test]
    fn test_add_rejects_duplicate_in_same_scope() {
        let mut interner = Interner::new();
        let name = interner.intern("value");
        let ids = placeholder_symbols(2);

        let mut tree = ScopeTree::new();
        let global = tree.global();
        assert_eq!(tree.add(global, name, ids[0]), Ok(()));
        assert_eq!(tree.add(global, name, ids[1]), Err(ids[0]));
        assert_eq!(tree.lookup_local(global, name), Some(ids[0]));
    }

    #[test]
    fn test_lookup_prefers_nearest_scope() {
        let mut interner = Interner::new();
        let name = interner.intern("x");
        let ids = placeholder_symbols(2);

        let mut tree = ScopeTree::new();
        let outer = tree.global();
        let inner = tree.create_child(outer, ScopeKind::Block);
        let sibling = tree.create_child(outer, ScopeKind::Block);
        assert_eq!(tree.add(outer, name, ids[0]), Ok(()));
        assert_eq!(tree.add(inner, name, ids[1]), Ok(()));

        assert_eq!(tree.lookup(inner, name), Some(ids[1]));
        assert_eq!(tree.lookup(sibling, name), Some(ids[0]));
        assert_eq!(tree.lookup(outer, name), Some(ids[0]));
    }

    #[test]
    fn test_lookup_misses_at_root() {
        let mut interner = Interner::new();
        let name = interner.intern("missing");
        let tree = ScopeTree::new();
        assert_eq!(tree.lookup(tree.global(), name), None);
    }

    #[test]
    fn test_enumeration_keeps_insertion_order() {
        let mut interner = Interner::new();
        let names: Vec<Name> = ["zeta", "alpha", "mid"]
            .into_iter()
            .map(|text| interner.intern(text))
            .collect();
        let ids = placeholder_symbols(3);

        let mut tree = ScopeTree::new();
        let global = tree.global();
        for (name, id) in names.iter().zip(&ids) {
            assert_eq!(tree.add(global, *name, *id), Ok(()));
        }
        assert_eq!(tree.lookup(global, names[2]), Some(ids[2]));
        assert_eq!(tree.lookup(global, names[0]), Some(ids[0]));

        let order: Vec<Name> = tree.get(global).names().collect();
        assert_eq!(order, names);
        let symbols: Vec<SymbolId> = tree.get(global).symbols().collect();
        assert_eq!(symbols, ids);
    }

    #[test]
    fn test_ancestors_walks_to_global() {
        let mut tree = ScopeTree::new();
        let global = tree.global();
        let class = tree.create_child(global, ScopeKind::Block);
        let block = tree.create_child(class, ScopeKind::Block);

        let chain: Vec<ScopeId> = tree.ancestors(block).collect();
        assert_eq!(chain, vec![block, class, global]);
        assert_eq!(tree.parent(global), None);
    }
}
