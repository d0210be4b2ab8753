//! Library for building, transforming and running finite automata over single-character
//! alphabets, and for converting between automata and right-linear grammars.
//!
//! An automaton consists of a finite set of states, an alphabet, a designated start
//! state, a set of final states and a transition relation. The crate provides a single
//! generic [`Automaton`] type whose type parameter determines the shape of the relation.
//! For a [`DFA`] there is at most one successor for every state and symbol, whereas an
//! [`NFA`] may have arbitrarily many. A [`MooreMachine`] extends a DFA by an output symbol
//! for every state.
//!
//! Automata are immutable. They are assembled by an [`AutomatonBuilder`], either through
//! method calls or from a small textual format, and each transformation returns a new
//! automaton. The classic constructions are available
//! - membership testing, for NFAs with three different algorithms (backtracking, frontier
//!   simulation and a tabulated variant),
//! - the subset construction [`NFA::dfa_of`],
//! - minimization through partition refinement [`DFA::minimal_of`],
//! - renaming of states in breadth-first order [`Automaton::renamed_of`],
//! - conversions from grammars to automata and back, see [`automaton_of`] and
//!   [`grammar_of`].
//!
//! Grammar symbols are interned in a [`SymbolPool`], which is passed explicitly to every
//! operation that needs names.
//!
//! ```
//! use finite_automata::prelude::*;
//!
//! let nfa = AutomatonBuilder::from_text(
//!     "-> 1 -> a 2 | b 1
//!      () 2 -> a 2 | b 1 | b 3
//!         3 -> a 2 | b 4
//!      () 4 -> a 4 | b 4",
//! )
//! .unwrap()
//! .build_nfa()
//! .unwrap();
//! let dfa = nfa.dfa_of().minimal_of().renamed_of();
//! for tape in ["abba", "bbab", "", "aaaa"] {
//!     assert_eq!(nfa.accepts(tape), dfa.accepts(tape));
//! }
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use finite_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "dot")]
    pub use super::dot::Dottable;
    pub use super::{
        automaton::{
            Automaton, Delta, Deterministic, FiniteAutomaton, MooreMachine, Nondeterministic,
            State, TapeSymbol, DFA, NFA,
        },
        builder::AutomatonBuilder,
        error::{Error, Result},
        grammar::{automaton_of, grammar_of, Grammar, GrammarBuilder, Sequence},
        math,
        math::{Bijection, Map, OrderedSet, Partition, Set},
        symbol::{Symbol, SymbolKind, SymbolPool},
        word::words_up_to,
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

mod error;
pub use error::{Error, Result};

/// Interning of grammar symbols.
pub mod symbol;
pub use symbol::{Symbol, SymbolPool};

/// Defines the automaton data model, acceptance and renaming.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::{Automaton, FiniteAutomaton, MooreMachine, DFA, NFA};

/// Incremental and text based construction of automata.
pub mod builder;
pub use builder::AutomatonBuilder;

mod determinization;
mod minimization;

/// Right-linear grammars and their conversion from and to automata.
pub mod grammar;
pub use grammar::{automaton_of, grammar_of};

/// Module that contains definitions for dealing with words.
pub mod word;

#[cfg(feature = "dot")]
pub mod dot;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

/// Human readable representation of values, used for naming derived states and for
/// debug output.
pub trait Show {
    /// Returns a human readable representation of `self`.
    fn show(&self) -> String;

    /// Shows a collection of the thing, for a collection of states this is `{q0,q1,q2}`.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ",")
        )
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::prelude::*;

    /// Floyd and Beigel, The Language of Machines, p. 255.
    pub const FLOYD_BEIGEL: &str = "-> 1 -> a 2 | b 1
                                    () 2 -> a 2 | b 1 | b 3
                                       3 -> a 2 | b 4
                                    () 4 -> a 4 | b 4";

    pub fn floyd_beigel_nfa() -> NFA {
        AutomatonBuilder::from_text(FLOYD_BEIGEL)
            .unwrap()
            .build_nfa()
            .unwrap()
    }

    pub fn bz_dfa() -> DFA {
        AutomatonBuilder::from_text("-> B -> b R \n () R -> b R | z R")
            .unwrap()
            .build_dfa()
            .unwrap()
    }

    pub fn wiki_dfa() -> DFA {
        let mut builder = AutomatonBuilder::new();
        builder.set_start_state("0");
        for q in ["2", "3", "4"] {
            builder.add_final_state(q);
        }
        for (from, symbol, to) in [
            ("0", 'a', "1"),
            ("0", 'b', "2"),
            ("1", 'a', "0"),
            ("1", 'b', "3"),
            ("2", 'a', "4"),
            ("2", 'b', "5"),
            ("3", 'a', "4"),
            ("3", 'b', "5"),
            ("4", 'a', "4"),
            ("4", 'b', "5"),
            ("5", 'a', "5"),
            ("5", 'b', "5"),
        ] {
            builder.add_transition(from, symbol, to);
        }
        builder.build_dfa().unwrap()
    }

    #[test_log::test]
    fn scenario_pipeline() {
        let nfa = floyd_beigel_nfa();
        let dfa = nfa.dfa_of();
        let minimal = dfa.minimal_of();
        let renamed = minimal.renamed_of();
        for tape in ["abba", "bbab", "", "aaaa"] {
            let expected = nfa.accepts(tape);
            assert_eq!(dfa.accepts(tape), expected);
            assert_eq!(minimal.accepts(tape), expected);
            assert_eq!(renamed.accepts(tape), expected);
        }
        assert!(renamed.accepts("abba"));
        assert!(!renamed.accepts("bbab"));
        assert!(renamed.accepts("aaaa"));
        assert_eq!(renamed.start(), &State::from("0"));
    }

    #[test]
    fn show_collection_uses_braces() {
        let states = [State::from("b"), State::from("a")];
        assert_eq!(State::show_collection(states.iter()), "{b,a}");
        assert_eq!(char::show_collection(OrderedSet::from(['y', 'x']).iter()), "{x,y}");
    }
}
