use std::collections::VecDeque;

use tracing::debug;

use crate::{
    automaton::{Automaton, Delta, State},
    math::{Bijection, OrderedSet},
};

impl<D: Delta> Automaton<D> {
    /// Returns an isomorphic copy of `self` in which the states are called `0`, `1`, `2`,
    /// and so on. Numbers are handed out in breadth-first order from the start state,
    /// exploring symbols in ascending order, successors in ascending order of their name.
    /// Unreachable states are numbered last, in ascending order of their name.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::from_text("-> B -> b R \n () R -> b R | z R")
    ///     .unwrap()
    ///     .build_dfa()
    ///     .unwrap();
    /// let renamed = dfa.renamed_of();
    /// assert_eq!(renamed.start(), &State::from("0"));
    /// assert!(renamed.is_final(&State::from("1")));
    /// assert!(renamed.accepts("bzb"));
    /// ```
    pub fn renamed_of(&self) -> Self {
        self.renamed_with_bijection().0
    }

    /// Works like [`Automaton::renamed_of`], but additionally returns the bijection that
    /// maps every old state name to the new one.
    pub fn renamed_with_bijection(&self) -> (Self, Bijection<State, State>) {
        let mut order = Vec::with_capacity(self.size());
        let mut seen = OrderedSet::from([self.start()]);
        let mut queue = VecDeque::from([self.start()]);
        while let Some(q) = queue.pop_front() {
            order.push(q);
            for &symbol in self.alphabet() {
                let mut successors = self.successors(q, symbol).collect::<Vec<_>>();
                successors.sort();
                for p in successors {
                    if seen.insert(p) {
                        queue.push_back(p);
                    }
                }
            }
        }
        order.extend(self.states().iter().filter(|q| !seen.contains(q)));

        let bijection: Bijection<State, State> = order
            .into_iter()
            .enumerate()
            .map(|(i, q)| (q.clone(), State::new(i.to_string())))
            .collect();
        debug!("renaming {} states", bijection.len());

        let rename = |q: &State| {
            bijection
                .get_by_left(q)
                .cloned()
                .unwrap_or_else(|| q.clone())
        };
        let renamed = Automaton::new(
            self.states().iter().map(rename).collect(),
            self.alphabet().clone(),
            rename(self.start()),
            self.finals().iter().map(rename).collect(),
            self.delta().map_states(rename),
        );
        (renamed, bijection)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn renaming_is_an_isomorphism() {
        let nfa = crate::tests::floyd_beigel_nfa();
        let dfa = nfa.dfa_of();
        let (renamed, bijection) = dfa.renamed_with_bijection();

        assert_eq!(renamed.size(), dfa.size());
        assert_eq!(renamed.finals().len(), dfa.finals().len());
        assert_eq!(renamed.transitions().count(), dfa.transitions().count());
        assert_eq!(bijection.get_by_left(dfa.start()), Some(renamed.start()));
        for (from, symbol, to) in dfa.transitions() {
            let from = bijection.get_by_left(from).unwrap();
            let to = bijection.get_by_left(to).unwrap();
            assert_eq!(renamed.successor(from, symbol), Some(to));
        }
        for q in dfa.states() {
            let image = bijection.get_by_left(q).unwrap();
            assert_eq!(dfa.is_final(q), renamed.is_final(image));
        }
        assert!(renamed.equivalent(&dfa));
    }

    #[test]
    fn renaming_follows_breadth_first_order() {
        let dfa = AutomatonBuilder::from_text(
            "-> s -> b x | a y
                y -> a x
                x -> a x
                u -> a s",
        )
        .unwrap()
        .build_dfa()
        .unwrap();
        let (_, bijection) = dfa.renamed_with_bijection();
        let names = ["s", "y", "x", "u"]
            .into_iter()
            .map(|q| bijection.get_by_left(&State::from(q)).unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn renaming_is_reproducible() {
        let nfa = crate::tests::floyd_beigel_nfa();
        assert_eq!(nfa.renamed_of(), nfa.renamed_of());
        assert_eq!(nfa.renamed_of().renamed_of(), nfa.renamed_of());
    }
}
