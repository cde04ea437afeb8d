use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Symbol handle.
///
/// Symbols compare by name. Handles returned by the same `SymbolTable`
/// also share their name allocation.
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    /// Make a symbol without going through a table.
    pub fn new(name: &str) -> Self {
        Symbol(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbol interning table
///
/// Uses `Rc<str>` for symbol names so the map key and every handed-out
/// `Symbol` share a single allocation.
#[derive(Debug, Default)]
pub struct SymbolTable {
    map: FxHashMap<Rc<str>, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            map: FxHashMap::default(),
        }
    }

    /// Intern a symbol, returning the shared handle
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.map.get(name) {
            return sym.clone();
        }

        let shared_name: Rc<str> = Rc::from(name);
        let sym = Symbol(shared_name.clone());
        self.map.insert(shared_name, sym.clone());
        sym
    }

    /// Check if a symbol exists
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
