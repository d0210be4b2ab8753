use bit_set::BitSet;
use tracing::trace;

use crate::{
    automaton::{Automaton, Nondeterministic, State, TapeSymbol},
    math::{Map, OrderedSet},
};

/// A non-deterministic finite automaton (NFA) may have any number of transitions for a
/// state and symbol. A tape is accepted if at least one of the possible runs reads it
/// completely and ends in a final state.
///
/// Three different algorithms for deciding membership are provided, they always agree.
/// [`NFA::accepts1`] explores the runs by backtracking, [`NFA::accepts2`] simulates all
/// runs at once by tracking the set of active states and [`NFA::accepts3`] does the same
/// on a tabulated representation of the transitions with memoized steps.
pub type NFA = Automaton<Nondeterministic>;

impl NFA {
    /// Decides membership of `tape`, this is the same as [`NFA::accepts2`].
    pub fn accepts(&self, tape: &str) -> bool {
        self.accepts2(tape)
    }

    /// Decides membership of `tape` through a depth-first search over all possible
    /// runs. Takes time exponential in the length of the tape in the worst case. Pending
    /// branches are kept on an explicit stack of states and tape positions.
    pub fn accepts1(&self, tape: &str) -> bool {
        let tape = tape.chars().collect::<Vec<_>>();
        let mut pending: Vec<(&State, usize)> = vec![(self.start(), 0)];
        while let Some((state, position)) = pending.pop() {
            match tape.get(position) {
                None if self.is_final(state) => return true,
                None => {}
                Some(&symbol) => pending.extend(
                    self.successors(state, symbol)
                        .map(|next| (next, position + 1)),
                ),
            }
        }
        false
    }

    /// Decides membership of `tape` by advancing the set of all simultaneously active
    /// states symbol by symbol.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let nfa = AutomatonBuilder::from_text(
    ///     "-> 1 -> a 2 | b 1
    ///      () 2 -> a 2 | b 1 | b 3
    ///         3 -> a 2 | b 4
    ///      () 4 -> a 4 | b 4",
    /// )
    /// .unwrap()
    /// .build_nfa()
    /// .unwrap();
    /// assert!(nfa.accepts2("abba"));
    /// assert!(!nfa.accepts2("bbb"));
    /// ```
    pub fn accepts2(&self, tape: &str) -> bool {
        let mut frontier = OrderedSet::from([self.start()]);
        for symbol in tape.chars() {
            frontier = frontier
                .into_iter()
                .flat_map(|q| self.successors(q, symbol))
                .collect();
            if frontier.is_empty() {
                trace!("frontier on \"{tape}\" died out at '{symbol}'");
                return false;
            }
        }
        frontier.into_iter().any(|q| self.is_final(q))
    }

    /// Decides membership of `tape` on a tabulated form of the transition relation: the
    /// states are numbered, every symbol gets a boolean successor matrix and the frontier
    /// is a bit set. Steps for a frontier and symbol that were computed before are taken
    /// from a memo table instead of being recomputed.
    pub fn accepts3(&self, tape: &str) -> bool {
        SuccessorTable::new(self).accepts(tape)
    }
}

/// Boolean matrix representation of the transitions of an [`NFA`], one matrix per symbol,
/// each row stored as a [`BitSet`] over state numbers.
struct SuccessorTable {
    start: usize,
    finals: BitSet,
    matrices: Map<TapeSymbol, Vec<BitSet>>,
}

impl SuccessorTable {
    fn new(nfa: &NFA) -> Self {
        let numbering: Map<&State, usize> = nfa
            .states()
            .iter()
            .enumerate()
            .map(|(i, q)| (q, i))
            .collect();
        let size = numbering.len();

        let mut matrices: Map<TapeSymbol, Vec<BitSet>> = Map::default();
        for (from, symbol, to) in nfa.transitions() {
            let rows = matrices
                .entry(symbol)
                .or_insert_with(|| vec![BitSet::with_capacity(size); size]);
            rows[numbering[&from]].insert(numbering[&to]);
        }

        Self {
            start: numbering[&nfa.start()],
            finals: nfa.finals().iter().map(|q| numbering[&q]).collect(),
            matrices,
        }
    }

    fn step(&self, frontier: &BitSet, symbol: TapeSymbol) -> BitSet {
        let mut next = BitSet::new();
        if let Some(rows) = self.matrices.get(&symbol) {
            for q in frontier {
                next.union_with(&rows[q]);
            }
        }
        next
    }

    fn accepts(&self, tape: &str) -> bool {
        let mut memo: Map<(BitSet, TapeSymbol), BitSet> = Map::default();
        let mut frontier = BitSet::new();
        frontier.insert(self.start);

        for symbol in tape.chars() {
            let key = (frontier, symbol);
            frontier = match memo.get(&key) {
                Some(next) => next.clone(),
                None => {
                    let next = self.step(&key.0, symbol);
                    memo.insert(key, next.clone());
                    next
                }
            };
            if frontier.is_empty() {
                return false;
            }
        }
        trace!("memo table for \"{tape}\" holds {} steps", memo.len());
        !frontier.is_disjoint(&self.finals)
    }
}
