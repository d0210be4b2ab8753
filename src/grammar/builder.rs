use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    grammar::{Grammar, Sequence},
    math::{OrderedSet, Set},
    symbol::{Symbol, SymbolPool},
    Error, Result,
};

const EPSILON_NAMES: [&str; 2] = ["eps", "ε"];

/// Collects the rules of a [`Grammar`]. The builder borrows the [`SymbolPool`] in which
/// all symbols are interned for as long as it lives.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let mut pool = SymbolPool::new();
/// let mut builder = GrammarBuilder::new(&mut pool);
/// let s = builder.nonterminal("S").unwrap();
/// let a = builder.terminal("a").unwrap();
/// builder.add_rule(s, [a, s]).unwrap().add_rule(s, []).unwrap();
/// let grammar = builder.build().unwrap();
/// assert_eq!(grammar.root(), s);
/// assert!(grammar.has_epsilon(s));
/// ```
pub struct GrammarBuilder<'p> {
    pool: &'p mut SymbolPool,
    root: Option<Symbol>,
    rules: BTreeMap<Symbol, OrderedSet<Sequence>>,
}

impl<'p> GrammarBuilder<'p> {
    /// Creates a builder without rules that interns its symbols in `pool`.
    pub fn new(pool: &'p mut SymbolPool) -> Self {
        Self {
            pool,
            root: None,
            rules: BTreeMap::new(),
        }
    }

    /// Interns and returns the terminal called `name`.
    pub fn terminal(&mut self, name: &str) -> Result<Symbol> {
        self.pool.terminal(name)
    }

    /// Interns and returns the nonterminal called `name`.
    pub fn nonterminal(&mut self, name: &str) -> Result<Symbol> {
        self.pool.nonterminal(name)
    }

    /// Designates `root` as the root. If no root is set, the left-hand side of the first
    /// rule that was added becomes the root.
    pub fn set_root(&mut self, root: Symbol) -> Result<&mut Self> {
        if !root.is_nt() {
            return Err(Error::UnsupportedRuleShape {
                rule: self.pool.name(root).to_string(),
                reason: "the root must be a nonterminal".to_string(),
            });
        }
        self.root = Some(root);
        Ok(self)
    }

    /// Adds the alternative `rhs` for `lhs`, an empty `rhs` is an epsilon alternative.
    /// Fails with [`Error::UnsupportedRuleShape`] if `lhs` is a terminal.
    pub fn add_rule<I>(&mut self, lhs: Symbol, rhs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let rhs: Sequence = rhs.into_iter().collect();
        if !lhs.is_nt() {
            return Err(Error::UnsupportedRuleShape {
                rule: format!("{} -> ...", self.pool.name(lhs)),
                reason: "the left-hand side must be a nonterminal".to_string(),
            });
        }
        trace!(
            "adding rule {} -> {}",
            self.pool.name(lhs),
            rhs.iter().map(|s| self.pool.name(*s)).join(" ")
        );
        self.root.get_or_insert(lhs);
        self.rules.entry(lhs).or_default().insert(rhs);
        Ok(self)
    }

    /// Produces the grammar, fails with [`Error::MissingStartState`] if neither a root nor
    /// any rule was given.
    pub fn build(self) -> Result<Grammar> {
        let root = self.root.ok_or(Error::MissingStartState)?;
        debug!(
            "built grammar with {} nonterminals on the left",
            self.rules.len()
        );
        Ok(Grammar::new(root, self.rules))
    }

    /// Parses a grammar with one rule per line of the form
    /// ```text
    /// LHS -> RHS1 | RHS2 | ...
    /// ```
    /// where each alternative is a whitespace separated list of symbol names. Every name
    /// that occurs as a left-hand side is a nonterminal, all other names are terminals.
    /// An empty alternative, `eps` or `ε` denotes epsilon. The left-hand side of the first
    /// rule is the root. Several lines for the same left-hand side add up.
    ///
    /// Fails with [`Error::MalformedSpecification`] for lines without `->` or with a
    /// left-hand side that is not a single name.
    pub fn from_text(text: &str, pool: &'p mut SymbolPool) -> Result<Grammar> {
        let lines = text
            .lines()
            .enumerate()
            .filter(|(_, content)| !content.trim().is_empty())
            .map(|(number, content)| {
                let (lhs, rhs) = content.split_once("->").ok_or_else(|| {
                    malformed(number + 1, content, "expected a rule of the form LHS -> RHS")
                })?;
                let lhs = lhs.trim();
                if lhs.is_empty() || lhs.contains(char::is_whitespace) {
                    return Err(malformed(
                        number + 1,
                        content,
                        "the left-hand side must be a single name",
                    ));
                }
                Ok((lhs, rhs))
            })
            .collect::<Result<Vec<_>>>()?;

        let nonterminals: Set<&str> = lines.iter().map(|(lhs, _)| *lhs).collect();
        let mut builder = GrammarBuilder::new(pool);
        for (lhs, rhs) in lines {
            let lhs = builder.nonterminal(lhs)?;
            for alternative in rhs.split('|') {
                let names = alternative.split_whitespace().collect::<Vec<_>>();
                let sequence = match names.as_slice() {
                    [name] if EPSILON_NAMES.contains(name) => Vec::new(),
                    names => names
                        .iter()
                        .map(|name| {
                            if nonterminals.contains(name) {
                                builder.nonterminal(name)
                            } else {
                                builder.terminal(name)
                            }
                        })
                        .collect::<Result<Sequence>>()?,
                };
                builder.add_rule(lhs, sequence)?;
            }
        }
        builder.build()
    }
}

fn malformed(line: usize, content: &str, reason: &str) -> Error {
    Error::MalformedSpecification {
        line,
        content: content.trim().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn names_on_the_left_are_nonterminals() {
        let mut pool = SymbolPool::new();
        let grammar = GrammarBuilder::from_text(
            "S -> a A | b
             A -> a S | ε
             A -> c",
            &mut pool,
        )
        .unwrap();
        let (s, a_nt) = (
            pool.symbol_for("S").unwrap(),
            pool.symbol_for("A").unwrap(),
        );
        assert!(s.is_nt() && a_nt.is_nt());
        assert!(pool.symbol_for("a").unwrap().is_t());
        assert_eq!(grammar.root(), s);
        assert_eq!(grammar.alternatives(a_nt).count(), 3);
        assert!(grammar.has_epsilon(a_nt));
        assert!(!grammar.has_epsilon(s));
    }

    #[test]
    fn explicit_root_overrides_first_rule() {
        let mut pool = SymbolPool::new();
        let mut builder = GrammarBuilder::new(&mut pool);
        let s = builder.nonterminal("S").unwrap();
        let t = builder.nonterminal("T").unwrap();
        let x = builder.terminal("x").unwrap();
        builder.add_rule(s, [x, t]).unwrap();
        builder.add_rule(t, [x]).unwrap();
        builder.set_root(t).unwrap();
        assert!(builder.set_root(x).is_err());
        assert!(builder.add_rule(x, [s]).is_err());
        assert_eq!(builder.build().unwrap().root(), t);
    }

    #[test]
    fn malformed_grammars() {
        let mut pool = SymbolPool::new();
        for (text, line) in [("S -> a\nA b", 2), ("S T -> a", 1), (" -> a", 1)] {
            assert!(
                matches!(
                    GrammarBuilder::from_text(text, &mut pool),
                    Err(Error::MalformedSpecification { line: l, .. }) if l == line
                ),
                "{text:?} should be malformed in line {line}"
            );
        }
        assert!(matches!(
            GrammarBuilder::from_text("\n  \n", &mut pool),
            Err(Error::MissingStartState)
        ));
        assert!(GrammarBuilder::new(&mut pool).build().is_err());
    }
}
