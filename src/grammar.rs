use std::{collections::BTreeMap, fmt::Display};

use itertools::Itertools;

use crate::{
    math::OrderedSet,
    symbol::{Symbol, SymbolPool},
};

mod builder;
pub use builder::GrammarBuilder;

mod conversion;
pub use conversion::{automaton_of, grammar_of};

/// The right-hand side of a rule. The empty sequence stands for epsilon.
pub type Sequence = Vec<Symbol>;

/// A grammar consisting of a root nonterminal and, for each nonterminal, a set of
/// alternatives it may be replaced by. Symbols are handles into the [`SymbolPool`] the
/// grammar was built with, so that pool is needed for anything involving names.
///
/// Grammars are produced by a [`GrammarBuilder`] or by [`grammar_of`] and are immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    root: Symbol,
    rules: BTreeMap<Symbol, OrderedSet<Sequence>>,
}

impl Grammar {
    pub(crate) fn new(root: Symbol, rules: BTreeMap<Symbol, OrderedSet<Sequence>>) -> Self {
        debug_assert!(root.is_nt(), "the root must be a nonterminal");
        debug_assert!(rules.keys().all(Symbol::is_nt));
        Self { root, rules }
    }

    /// Returns the root nonterminal.
    pub fn root(&self) -> Symbol {
        self.root
    }

    /// Gives access to all rules, grouped by their left-hand side.
    pub fn rules(&self) -> &BTreeMap<Symbol, OrderedSet<Sequence>> {
        &self.rules
    }

    /// Iterates over the alternatives of `nonterminal`, which may be none at all.
    pub fn alternatives(&self, nonterminal: Symbol) -> impl Iterator<Item = &Sequence> + '_ {
        self.rules.get(&nonterminal).into_iter().flatten()
    }

    /// Returns all nonterminals occurring in `self`, on either side of a rule.
    pub fn nonterminals(&self) -> OrderedSet<Symbol> {
        std::iter::once(self.root)
            .chain(self.rules.keys().copied())
            .chain(self.symbols().filter(Symbol::is_nt))
            .collect()
    }

    /// Returns all terminals occurring in `self`.
    pub fn terminals(&self) -> OrderedSet<Symbol> {
        self.symbols().filter(Symbol::is_t).collect()
    }

    fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.rules.values().flatten().flatten().copied()
    }

    /// Returns the total number of alternatives.
    pub fn size(&self) -> usize {
        self.rules.values().map(OrderedSet::len).sum()
    }

    /// Returns true if `nonterminal` has an epsilon alternative.
    pub fn has_epsilon(&self, nonterminal: Symbol) -> bool {
        self.alternatives(nonterminal).any(Vec::is_empty)
    }

    /// Returns a helper that displays `self` with the names taken from `pool`. The rules
    /// of the root come first, the others follow in the order in which their left-hand
    /// sides were interned. Epsilon is written as `eps`, so the output can be parsed
    /// again with [`GrammarBuilder::from_text`].
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let mut pool = SymbolPool::new();
    /// let grammar = GrammarBuilder::from_text("S -> a S | b A | \n A -> b", &mut pool).unwrap();
    /// assert_eq!(
    ///     grammar.display(&pool).to_string(),
    ///     "S -> eps | a S | b A\nA -> b"
    /// );
    /// ```
    pub fn display<'a>(&'a self, pool: &'a SymbolPool) -> GrammarDisplay<'a> {
        GrammarDisplay {
            grammar: self,
            pool,
        }
    }
}

/// Displays a [`Grammar`] together with the names from its [`SymbolPool`], see
/// [`Grammar::display`].
pub struct GrammarDisplay<'a> {
    grammar: &'a Grammar,
    pool: &'a SymbolPool,
}

impl GrammarDisplay<'_> {
    fn sequence(&self, sequence: &Sequence) -> String {
        if sequence.is_empty() {
            "eps".to_string()
        } else {
            sequence.iter().map(|s| self.pool.name(*s)).join(" ")
        }
    }
}

impl Display for GrammarDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let root = self.grammar.root;
        let lines = std::iter::once(root)
            .chain(self.grammar.rules.keys().copied().filter(|nt| *nt != root))
            .filter(|nt| self.grammar.rules.contains_key(nt))
            .map(|nt| {
                format!(
                    "{} -> {}",
                    self.pool.name(nt),
                    self.grammar
                        .alternatives(nt)
                        .map(|seq| self.sequence(seq))
                        .join(" | ")
                )
            });
        write!(f, "{}", lines.format("\n"))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn grammar_queries() {
        let mut pool = SymbolPool::new();
        let grammar = GrammarBuilder::from_text("S -> a S | b T | eps\nT -> b", &mut pool).unwrap();
        let s = pool.symbol_for("S").unwrap();
        let a = pool.terminal("a").unwrap();

        assert_eq!(grammar.root(), s);
        assert_eq!(grammar.size(), 4);
        assert!(grammar.has_epsilon(s));
        assert_eq!(grammar.nonterminals().len(), 2);
        assert_eq!(grammar.terminals().len(), 2);
        assert!(grammar.alternatives(s).any(|seq| seq.first() == Some(&a)));
    }

    #[test]
    fn display_can_be_parsed_again() {
        let mut pool = SymbolPool::new();
        let text = "S -> a A | eps\nA -> b A | c";
        let grammar = GrammarBuilder::from_text(text, &mut pool).unwrap();
        let shown = grammar.display(&pool).to_string();
        assert_eq!(shown, "S -> eps | a A\nA -> b A | c");

        let reparsed = GrammarBuilder::from_text(&shown, &mut pool).unwrap();
        assert_eq!(reparsed, grammar);
    }
}
