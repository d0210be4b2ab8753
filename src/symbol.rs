use std::fmt::Display;

use itertools::Itertools;
use tracing::{trace, warn};

use crate::{math::Map, Error, Result};

/// Distinguishes the two kinds of grammar symbols. A terminal and a nonterminal may
/// carry the same name, they are still different symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
    /// A symbol that appears in the words of the language.
    Terminal,
    /// A symbol that is replaced by applying rules.
    Nonterminal,
}

/// Handle to a symbol that lives in a [`SymbolPool`]. Handles are cheap to copy and two
/// handles are equal precisely if they refer to the same pooled symbol, i.e. if they have
/// the same kind and the same name.
///
/// A handle only makes sense together with the pool that created it, the name of the
/// symbol can be obtained through [`SymbolPool::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    id: u32,
    kind: SymbolKind,
}

impl Symbol {
    /// Returns the kind of `self`.
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Returns true if `self` is a terminal symbol.
    pub fn is_t(&self) -> bool {
        matches!(self.kind, SymbolKind::Terminal)
    }

    /// Returns true if `self` is a nonterminal symbol.
    pub fn is_nt(&self) -> bool {
        matches!(self.kind, SymbolKind::Nonterminal)
    }
}

/// Interning registry for grammar symbols. For every kind and name there is exactly one
/// [`Symbol`], which is created the first time it is requested. The pool owns the names
/// of all symbols it has handed out, so it has to outlive every grammar that refers to
/// them.
#[derive(Debug, Clone, Default)]
pub struct SymbolPool {
    names: Vec<String>,
    terminals: Map<String, Symbol>,
    nonterminals: Map<String, Symbol>,
}

impl SymbolPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the terminal with the given `name`, creating it if necessary.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let mut pool = SymbolPool::new();
    /// let a = pool.terminal("a").unwrap();
    /// assert_eq!(a, pool.terminal("a").unwrap());
    /// assert_ne!(a, pool.nonterminal("a").unwrap());
    /// assert!(pool.terminal("").is_err());
    /// ```
    pub fn terminal(&mut self, name: &str) -> Result<Symbol> {
        self.intern(name, SymbolKind::Terminal)
    }

    /// Returns the nonterminal with the given `name`, creating it if necessary.
    pub fn nonterminal(&mut self, name: &str) -> Result<Symbol> {
        self.intern(name, SymbolKind::Nonterminal)
    }

    fn intern(&mut self, name: &str, kind: SymbolKind) -> Result<Symbol> {
        if name.is_empty() {
            return Err(Error::EmptySymbolName);
        }
        let (own, other) = match kind {
            SymbolKind::Terminal => (&mut self.terminals, &self.nonterminals),
            SymbolKind::Nonterminal => (&mut self.nonterminals, &self.terminals),
        };
        if let Some(symbol) = own.get(name) {
            return Ok(*symbol);
        }
        if other.contains_key(name) {
            warn!("new {kind:?} {name} aliases an existing symbol of the other kind");
        }

        let symbol = Symbol {
            id: self.names.len() as u32,
            kind,
        };
        trace!("interning {kind:?} {name} as {}", symbol.id);
        own.insert(name.to_string(), symbol);
        self.names.push(name.to_string());
        Ok(symbol)
    }

    /// Looks up an existing symbol by name. Terminals take precedence over nonterminals
    /// of the same name. Fails with [`Error::UnknownSymbolName`] if no such symbol exists.
    pub fn symbol_for(&self, name: &str) -> Result<Symbol> {
        if name.is_empty() {
            return Err(Error::EmptySymbolName);
        }
        self.terminals
            .get(name)
            .or_else(|| self.nonterminals.get(name))
            .copied()
            .ok_or_else(|| Error::UnknownSymbolName(name.to_string()))
    }

    /// Returns the name of the given symbol.
    ///
    /// # Panics
    /// If `symbol` was not created by `self`.
    pub fn name(&self, symbol: Symbol) -> &str {
        &self.names[symbol.id as usize]
    }

    /// Iterates over all terminals in the pool, in the order of their creation.
    pub fn terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals.values().copied().sorted()
    }

    /// Iterates over all nonterminals in the pool, in the order of their creation.
    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.nonterminals.values().copied().sorted()
    }

    /// Returns the total number of symbols in the pool.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no symbol has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Display for SymbolPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "symbol pool: {} terminals and {} nonterminals",
            self.terminals.len(),
            self.nonterminals.len()
        )?;
        writeln!(
            f,
            "  terminals    = {{ {} }}",
            self.terminals().map(|t| self.name(t)).join(", ")
        )?;
        write!(
            f,
            "  nonterminals = {{ {} }}",
            self.nonterminals().map(|nt| self.name(nt)).join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn symbols_are_interned_per_kind() {
        let mut pool = SymbolPool::new();
        let s = pool.nonterminal("S").unwrap();
        let a = pool.terminal("a").unwrap();
        assert_eq!(pool.nonterminal("S").unwrap(), s);
        assert!(s.is_nt() && !s.is_t());
        assert!(a.is_t() && !a.is_nt());
        assert_eq!(pool.len(), 2);

        // aliasing only warns
        let alias = pool.terminal("S").unwrap();
        assert_ne!(alias, s);
        assert_eq!(pool.name(alias), pool.name(s));
        assert_eq!(pool.len(), 3);
    }

    #[test_log::test]
    fn lookup_prefers_terminals() {
        let mut pool = SymbolPool::new();
        let nt = pool.nonterminal("x").unwrap();
        assert_eq!(pool.symbol_for("x").unwrap(), nt);
        let t = pool.terminal("x").unwrap();
        assert_eq!(pool.symbol_for("x").unwrap(), t);

        assert!(matches!(
            pool.symbol_for("y"),
            Err(Error::UnknownSymbolName(name)) if name == "y"
        ));
        assert!(matches!(pool.nonterminal(""), Err(Error::EmptySymbolName)));
    }

    #[test]
    fn display_lists_symbols_in_creation_order() {
        let mut pool = SymbolPool::new();
        for name in ["b", "a"] {
            pool.terminal(name).unwrap();
        }
        pool.nonterminal("S").unwrap();
        assert_eq!(
            pool.to_string(),
            "symbol pool: 2 terminals and 1 nonterminals\n  terminals    = { b, a }\n  nonterminals = { S }"
        );
    }
}
