use std::{collections::VecDeque, fmt::Display};

use itertools::Itertools;
use tracing::trace;

use crate::prelude::*;

mod state;
pub use state::{State, TapeSymbol};

mod delta;
pub use delta::{Delta, Deterministic, Nondeterministic};

mod dfa;
pub use dfa::DFA;

mod nfa;
pub use nfa::NFA;

mod moore;
pub use moore::MooreMachine;

mod renaming;

/// A finite automaton over single-character tape symbols. The type parameter `D`
/// determines the shape of the transition relation, see [`DFA`] and [`NFA`].
///
/// Automata are immutable: they are produced by an [`AutomatonBuilder`] or by one of the
/// transformations (`dfa_of`, `minimal_of`, `renamed_of`), each of which returns a new
/// automaton. The following invariants always hold
/// - the start state is a state of the automaton,
/// - every final state is a state of the automaton,
/// - every state and symbol occurring in a transition belongs to the automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<D> {
    states: OrderedSet<State>,
    alphabet: OrderedSet<TapeSymbol>,
    start: State,
    finals: OrderedSet<State>,
    delta: D,
}

impl<D: Delta> Automaton<D> {
    pub(crate) fn new(
        states: OrderedSet<State>,
        alphabet: OrderedSet<TapeSymbol>,
        start: State,
        finals: OrderedSet<State>,
        delta: D,
    ) -> Self {
        debug_assert!(states.contains(&start), "start state {start} is unknown");
        debug_assert!(finals.is_subset(&states), "final states must be states");
        debug_assert!(
            delta.transitions().all(|(from, symbol, to)| {
                states.contains(from) && states.contains(to) && alphabet.contains(&symbol)
            }),
            "transitions may only use known states and symbols"
        );
        Self {
            states,
            alphabet,
            start,
            finals,
            delta,
        }
    }

    /// Returns the set of all states.
    pub fn states(&self) -> &OrderedSet<State> {
        &self.states
    }

    /// Returns the input alphabet.
    pub fn alphabet(&self) -> &OrderedSet<TapeSymbol> {
        &self.alphabet
    }

    /// Returns the start state.
    pub fn start(&self) -> &State {
        &self.start
    }

    /// Returns the set of final states.
    pub fn finals(&self) -> &OrderedSet<State> {
        &self.finals
    }

    /// Returns true if `state` is a final state.
    pub fn is_final(&self, state: &State) -> bool {
        self.finals.contains(state)
    }

    /// Gives access to the transition relation.
    pub fn delta(&self) -> &D {
        &self.delta
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the transition relation is single-valued by construction.
    pub fn is_deterministic(&self) -> bool {
        D::DETERMINISTIC
    }

    /// Iterates over all successors of `from` on `symbol`.
    pub fn successors<'a>(
        &'a self,
        from: &'a State,
        symbol: TapeSymbol,
    ) -> impl Iterator<Item = &'a State> + 'a {
        self.delta.successors(from, symbol)
    }

    /// Iterates over all transitions, ordered by origin, then symbol, then target.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, TapeSymbol, &State)> + '_ {
        self.delta.transitions().sorted()
    }

    /// Computes the set of states that can be reached from the start state.
    pub fn reachable_states(&self) -> OrderedSet<&State> {
        let mut seen = OrderedSet::from([&self.start]);
        let mut queue = VecDeque::from([&self.start]);
        while let Some(q) = queue.pop_front() {
            for &symbol in &self.alphabet {
                for p in self.delta.successors(q, symbol) {
                    if seen.insert(p) {
                        queue.push_back(p);
                    }
                }
            }
        }
        trace!(
            "{} of {} states are reachable",
            seen.len(),
            self.states.len()
        );
        seen
    }

    /// Returns a string representation of the transition table. One row is produced for
    /// each state, start and final states are marked with `->` and `()` respectively. If
    /// `extra_header` is given, an additional column is appended whose cells are produced
    /// by `state_decorator`.
    pub(crate) fn build_transition_table<SD>(
        &self,
        extra_header: Option<&str>,
        state_decorator: SD,
    ) -> String
    where
        SD: Fn(&State) -> String,
    {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet.iter().map(|s| s.to_string()))
                .chain(extra_header.map(|h| h.to_string())),
        );
        for q in &self.states {
            let marker = match (q == &self.start, self.is_final(q)) {
                (true, true) => "-> () ",
                (true, false) => "-> ",
                (false, true) => "() ",
                (false, false) => "",
            };
            let mut row = vec![format!("{marker}{q}")];
            for &symbol in &self.alphabet {
                let targets = self.delta.successors(q, symbol).join(", ");
                row.push(if targets.is_empty() {
                    "-".to_string()
                } else {
                    targets
                });
            }
            if extra_header.is_some() {
                row.push(state_decorator(q));
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<D: Delta> Display for Automaton<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.build_transition_table(None, |_| String::new())
        )
    }
}

/// Either a deterministic or a non-deterministic automaton. This is what
/// [`AutomatonBuilder::build`] produces when the caller does not care about the kind,
/// the deterministic variant is chosen whenever the transition table allows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiniteAutomaton {
    /// At most one successor per state and symbol.
    Deterministic(DFA),
    /// Arbitrarily many successors per state and symbol.
    Nondeterministic(NFA),
}

impl FiniteAutomaton {
    /// Decides membership of `tape`.
    pub fn accepts(&self, tape: &str) -> bool {
        match self {
            FiniteAutomaton::Deterministic(dfa) => dfa.accepts(tape),
            FiniteAutomaton::Nondeterministic(nfa) => nfa.accepts(tape),
        }
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        match self {
            FiniteAutomaton::Deterministic(dfa) => dfa.size(),
            FiniteAutomaton::Nondeterministic(nfa) => nfa.size(),
        }
    }

    /// Returns a deterministic automaton for the same language. A deterministic
    /// automaton is returned as is, a non-deterministic one goes through the subset
    /// construction.
    pub fn into_dfa(self) -> DFA {
        match self {
            FiniteAutomaton::Deterministic(dfa) => dfa,
            FiniteAutomaton::Nondeterministic(nfa) => nfa.dfa_of(),
        }
    }

    /// Views `self` as a non-deterministic automaton.
    pub fn into_nfa(self) -> NFA {
        match self {
            FiniteAutomaton::Deterministic(dfa) => dfa.to_nfa(),
            FiniteAutomaton::Nondeterministic(nfa) => nfa,
        }
    }
}

impl Display for FiniteAutomaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FiniteAutomaton::Deterministic(dfa) => write!(f, "{dfa}"),
            FiniteAutomaton::Nondeterministic(nfa) => write!(f, "{nfa}"),
        }
    }
}

impl From<DFA> for FiniteAutomaton {
    fn from(value: DFA) -> Self {
        FiniteAutomaton::Deterministic(value)
    }
}

impl From<NFA> for FiniteAutomaton {
    fn from(value: NFA) -> Self {
        FiniteAutomaton::Nondeterministic(value)
    }
}
