use std::fmt::Debug;

use itertools::Itertools;

use crate::{
    automaton::{State, TapeSymbol},
    math::{Map, OrderedSet},
    Error,
};

/// Abstracts over the two shapes a transition relation can have. [`Deterministic`]
/// relations map every (state, symbol) pair to at most one successor, [`Nondeterministic`]
/// ones to an arbitrary set of successors.
pub trait Delta: Clone + Debug + Default + PartialEq + Eq {
    /// Whether the relation guarantees at most one successor per state and symbol.
    const DETERMINISTIC: bool;

    /// Iterates over all successors of `from` on `symbol`. Yields nothing if there is no
    /// move, which includes symbols that are not part of the alphabet.
    fn successors<'a>(
        &'a self,
        from: &'a State,
        symbol: TapeSymbol,
    ) -> impl Iterator<Item = &'a State> + 'a;

    /// Iterates over all transitions as triples of origin, symbol and target. The order is
    /// unspecified.
    fn transitions(&self) -> impl Iterator<Item = (&State, TapeSymbol, &State)> + '_;

    /// Adds the transition from `from` to `to` on `symbol`. For a deterministic relation,
    /// an existing transition for `from` and `symbol` is replaced.
    fn insert(&mut self, from: State, symbol: TapeSymbol, to: State);

    /// Returns the number of transitions.
    fn size(&self) -> usize {
        self.transitions().count()
    }

    /// Returns a copy of `self` in which every state is replaced by its image under `f`.
    fn map_states<F: Fn(&State) -> State>(&self, f: F) -> Self {
        let mut out = Self::default();
        for (from, symbol, to) in self.transitions() {
            out.insert(f(from), symbol, f(to));
        }
        out
    }
}

/// A partial function from state and symbol to the successor state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deterministic(Map<State, Map<TapeSymbol, State>>);

impl Deterministic {
    /// Returns the unique successor of `from` on `symbol`, if there is one.
    pub fn successor<'a>(&'a self, from: &State, symbol: TapeSymbol) -> Option<&'a State> {
        self.0.get(from).and_then(|edges| edges.get(&symbol))
    }
}

impl Delta for Deterministic {
    const DETERMINISTIC: bool = true;

    fn successors<'a>(
        &'a self,
        from: &'a State,
        symbol: TapeSymbol,
    ) -> impl Iterator<Item = &'a State> + 'a {
        self.successor(from, symbol).into_iter()
    }

    fn transitions(&self) -> impl Iterator<Item = (&State, TapeSymbol, &State)> + '_ {
        self.0.iter().flat_map(|(from, edges)| {
            edges
                .iter()
                .map(move |(symbol, to)| (from, *symbol, to))
        })
    }

    fn insert(&mut self, from: State, symbol: TapeSymbol, to: State) {
        self.0.entry(from).or_default().insert(symbol, to);
    }
}

/// A relation that maps state and symbol to a (possibly empty) set of successors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nondeterministic(Map<State, Map<TapeSymbol, OrderedSet<State>>>);

impl Nondeterministic {
    /// Returns the set of successors of `from` on `symbol`, if any transition exists.
    pub fn targets<'a>(
        &'a self,
        from: &State,
        symbol: TapeSymbol,
    ) -> Option<&'a OrderedSet<State>> {
        self.0.get(from).and_then(|edges| edges.get(&symbol))
    }
}

impl Delta for Nondeterministic {
    const DETERMINISTIC: bool = false;

    fn successors<'a>(
        &'a self,
        from: &'a State,
        symbol: TapeSymbol,
    ) -> impl Iterator<Item = &'a State> + 'a {
        self.targets(from, symbol).into_iter().flatten()
    }

    fn transitions(&self) -> impl Iterator<Item = (&State, TapeSymbol, &State)> + '_ {
        self.0.iter().flat_map(|(from, edges)| {
            edges.iter().flat_map(move |(symbol, targets)| {
                targets.iter().map(move |to| (from, *symbol, to))
            })
        })
    }

    fn insert(&mut self, from: State, symbol: TapeSymbol, to: State) {
        self.0
            .entry(from)
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(to);
    }
}

impl From<&Deterministic> for Nondeterministic {
    fn from(value: &Deterministic) -> Self {
        let mut out = Nondeterministic::default();
        for (from, symbol, to) in value.transitions() {
            out.insert(from.clone(), symbol, to.clone());
        }
        out
    }
}

impl TryFrom<&Nondeterministic> for Deterministic {
    type Error = Error;

    /// Succeeds if every state has at most one successor per symbol. Otherwise the
    /// smallest offending (state, symbol) pair is reported.
    fn try_from(value: &Nondeterministic) -> Result<Self, Self::Error> {
        let mut out = Deterministic::default();
        let sorted = value
            .0
            .iter()
            .flat_map(|(from, edges)| edges.iter().map(move |(symbol, to)| (from, *symbol, to)))
            .sorted_by(|l, r| (l.0, l.1).cmp(&(r.0, r.1)));
        for (from, symbol, targets) in sorted {
            let mut it = targets.iter();
            match (it.next(), it.next()) {
                (Some(to), None) => out.insert(from.clone(), symbol, to.clone()),
                (None, _) => {}
                (Some(_), Some(_)) => {
                    return Err(Error::NonDeterministicSpecification {
                        state: from.clone(),
                        symbol,
                        targets: targets.iter().cloned().collect(),
                    })
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_relation_replaces_transitions() {
        let mut delta = Deterministic::default();
        delta.insert("p".into(), 'a', "q".into());
        delta.insert("p".into(), 'a', "r".into());
        assert_eq!(delta.size(), 1);
        assert_eq!(delta.successor(&"p".into(), 'a'), Some(&State::from("r")));
        assert_eq!(delta.successor(&"p".into(), 'b'), None);
    }

    #[test]
    fn conversion_to_deterministic_reports_smallest_conflict() {
        let mut delta = Nondeterministic::default();
        delta.insert("q".into(), 'a', "q".into());
        delta.insert("q".into(), 'a', "p".into());
        delta.insert("p".into(), 'b', "q".into());
        delta.insert("p".into(), 'b', "p".into());
        match Deterministic::try_from(&delta) {
            Err(Error::NonDeterministicSpecification {
                state,
                symbol,
                targets,
            }) => {
                assert_eq!(state, State::from("p"));
                assert_eq!(symbol, 'b');
                assert_eq!(targets, vec![State::from("p"), State::from("q")]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let mut delta = Nondeterministic::default();
        delta.insert("q".into(), 'a', "p".into());
        let det = Deterministic::try_from(&delta).unwrap();
        assert_eq!(Nondeterministic::from(&det), delta);
    }

    #[test]
    fn map_states_renames_both_ends() {
        let mut delta = Nondeterministic::default();
        delta.insert("x".into(), 'a', "y".into());
        delta.insert("x".into(), 'a', "x".into());
        let renamed = delta.map_states(|q| State::new(format!("{q}'")));
        assert_eq!(renamed.size(), 2);
        assert!(renamed
            .successors(&State::from("x'"), 'a')
            .any(|q| q.name() == "y'"));
    }
}
