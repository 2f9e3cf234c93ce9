use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::SymbolOverflow;

/// A 16-bit integer interning a local-name or namespace URI. `0` is
/// reserved and never assigned by [`InMemorySymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub u16);

impl Symbol {
    pub const RESERVED: Symbol = Symbol(0);
}

/// Bidirectional intern of local-names and namespace URIs to 16-bit
/// symbols, shared and thread-safe. Symbols are assigned monotonically and
/// never reassigned: because name-keys and doc-keys embed symbols directly,
/// an implementation that garbage-collected symbols would invalidate every
/// key already written.
pub trait SymbolTable: Send + Sync {
    fn get_symbol(&self, local_name: &str) -> Result<Symbol, SymbolOverflow>;

    fn get_ns_symbol(&self, uri: &str) -> Result<Symbol, SymbolOverflow>;

    fn get_name(&self, sym: Symbol) -> Option<String>;

    fn get_namespace(&self, sym: Symbol) -> Option<String>;
}

#[derive(Default)]
struct Interner {
    forward: HashMap<String, u16>,
    backward: Vec<String>,
}

impl Interner {
    fn intern(&mut self, value: &str) -> Result<Symbol, SymbolOverflow> {
        if let Some(&id) = self.forward.get(value) {
            return Ok(Symbol(id));
        }
        let next = self.backward.len() + 1;
        if next > u16::MAX as usize {
            return Err(SymbolOverflow);
        }
        let id = next as u16;
        self.backward.push(value.to_string());
        self.forward.insert(value.to_string(), id);
        Ok(Symbol(id))
    }

    fn lookup(&self, sym: Symbol) -> Option<String> {
        if sym == Symbol::RESERVED {
            return None;
        }
        self.backward.get(sym.0 as usize - 1).cloned()
    }
}

/// In-process [`SymbolTable`] suitable for embedding paired with a host that
/// snapshots/restores it across restarts, and for tests.
#[derive(Default)]
pub struct InMemorySymbolTable {
    names: RwLock<Interner>,
    namespaces: RwLock<Interner>,
}

impl InMemorySymbolTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymbolTable for InMemorySymbolTable {
    fn get_symbol(&self, local_name: &str) -> Result<Symbol, SymbolOverflow> {
        self.names.write().unwrap().intern(local_name)
    }

    fn get_ns_symbol(&self, uri: &str) -> Result<Symbol, SymbolOverflow> {
        self.namespaces.write().unwrap().intern(uri)
    }

    fn get_name(&self, sym: Symbol) -> Option<String> {
        self.names.read().unwrap().lookup(sym)
    }

    fn get_namespace(&self, sym: Symbol) -> Option<String> {
        self.namespaces.read().unwrap().lookup(sym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_start_at_one() {
        let table = InMemorySymbolTable::new();
        assert_eq!(table.get_symbol("book").unwrap(), Symbol(1));
        assert_eq!(table.get_ns_symbol("").unwrap(), Symbol(1));
    }

    #[test]
    fn repeated_names_return_the_same_symbol() {
        let table = InMemorySymbolTable::new();
        let a = table.get_symbol("book").unwrap();
        let b = table.get_symbol("book").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_names_get_distinct_symbols() {
        let table = InMemorySymbolTable::new();
        let a = table.get_symbol("book").unwrap();
        let b = table.get_symbol("title").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn names_and_namespaces_are_independent_spaces() {
        let table = InMemorySymbolTable::new();
        let name = table.get_symbol("a").unwrap();
        let ns = table.get_ns_symbol("b").unwrap();
        assert_eq!(name, Symbol(1));
        assert_eq!(ns, Symbol(1));
        assert_eq!(table.get_name(name).as_deref(), Some("a"));
        assert_eq!(table.get_namespace(ns).as_deref(), Some("b"));
    }

    #[test]
    fn round_trip_through_get_name() {
        let table = InMemorySymbolTable::new();
        let sym = table.get_symbol("book").unwrap();
        assert_eq!(table.get_name(sym).as_deref(), Some("book"));
    }

    #[test]
    fn reserved_symbol_has_no_name() {
        let table = InMemorySymbolTable::new();
        assert_eq!(table.get_name(Symbol::RESERVED), None);
    }

    #[test]
    fn unknown_symbol_has_no_name() {
        let table = InMemorySymbolTable::new();
        table.get_symbol("book").unwrap();
        assert_eq!(table.get_name(Symbol(42)), None);
    }
}
