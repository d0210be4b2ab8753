use std::{fmt::Display, ops::Deref};

use tracing::warn;

use crate::{
    automaton::{State, DFA},
    math::Map,
    Error, Result,
};

/// A Moore machine is a [`DFA`] that emits an output symbol whenever it enters a state,
/// including the start state at the beginning of a run. Running it on a tape thus
/// produces one output symbol more than the tape has symbols.
///
/// The machine dereferences to its underlying [`DFA`], so acceptance, runs and all other
/// DFA operations are available directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MooreMachine {
    dfa: DFA,
    lambda: Map<State, char>,
}

impl MooreMachine {
    /// Combines `dfa` with the output mapping `lambda`. Fails with
    /// [`Error::IncompleteOutputMapping`] naming the smallest reachable state that has no
    /// output. Entries for states that do not exist are dropped.
    pub(crate) fn new(dfa: DFA, mut lambda: Map<State, char>) -> Result<Self> {
        if let Some(missing) = dfa
            .reachable_states()
            .into_iter()
            .find(|q| !lambda.contains_key(*q))
        {
            return Err(Error::IncompleteOutputMapping(missing.clone()));
        }
        lambda.retain(|q, _| {
            let known = dfa.states().contains(q);
            if !known {
                warn!("dropping output for unknown state {q}");
            }
            known
        });
        Ok(Self { dfa, lambda })
    }

    /// Returns the output mapping.
    pub fn lambda(&self) -> &Map<State, char> {
        &self.lambda
    }

    /// Returns the symbol that is emitted upon entering `state`.
    pub fn output_of(&self, state: &State) -> Option<char> {
        self.lambda.get(state).copied()
    }

    /// Runs `tape` and collects the symbols emitted on entering each visited state. If the
    /// run gets stuck, the output produced so far is returned as an `Err`.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let moore = AutomatonBuilder::from_text(
    ///     "-> 0 -> 0 1 | 1 2
    ///      () 1 -> 0 1 | 1 2
    ///      () 2 -> 0 1 | 1 2",
    /// )
    /// .unwrap()
    /// .build_moore([("0", ' '), ("1", 'F'), ("2", 'T')])
    /// .unwrap();
    /// assert_eq!(moore.transduce("1010"), Ok(" TFTF".to_string()));
    /// ```
    pub fn transduce(&self, tape: &str) -> std::result::Result<String, String> {
        let emit = |path: Vec<&State>| -> String {
            path.into_iter()
                .filter_map(|q| self.output_of(q))
                .collect()
        };
        self.dfa.run(tape).map(emit).map_err(emit)
    }

    /// Returns the underlying [`DFA`].
    pub fn as_dfa(&self) -> &DFA {
        &self.dfa
    }

    /// Consumes `self` and returns the underlying [`DFA`].
    pub fn into_dfa(self) -> DFA {
        self.dfa
    }
}

impl Deref for MooreMachine {
    type Target = DFA;

    fn deref(&self) -> &Self::Target {
        &self.dfa
    }
}

impl Display for MooreMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.dfa.build_transition_table(Some("output"), |q| {
            self.output_of(q)
                .map(|c| format!("{c:?}"))
                .unwrap_or_else(|| "-".to_string())
        });
        write!(f, "{table}")
    }
}
