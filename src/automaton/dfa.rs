use std::collections::VecDeque;

use tracing::trace;

use crate::{
    automaton::{Automaton, Deterministic, Nondeterministic, State},
    math::Set,
    NFA,
};

/// A deterministic finite automaton (DFA) has at most one transition for every state
/// and symbol. Missing transitions are not an error, a run that needs one simply gets
/// stuck and the input is rejected.
pub type DFA = Automaton<Deterministic>;

impl DFA {
    /// Returns the unique successor of `from` on `symbol`, if there is one.
    pub fn successor(&self, from: &State, symbol: char) -> Option<&State> {
        self.delta().successor(from, symbol)
    }

    /// Runs `tape` from the start state. If every symbol can be read, the sequence of
    /// visited states (beginning with the start state) is returned in an `Ok`. Otherwise
    /// the run got stuck and the states visited up to that point are returned as an `Err`.
    pub fn run<'a>(&'a self, tape: &str) -> Result<Vec<&'a State>, Vec<&'a State>> {
        let mut current = self.start();
        let mut path = vec![current];
        for symbol in tape.chars() {
            match self.successor(current, symbol) {
                Some(next) => {
                    current = next;
                    path.push(next);
                }
                None => {
                    trace!("run on \"{tape}\" is stuck in {current} on '{symbol}'");
                    return Err(path);
                }
            }
        }
        Ok(path)
    }

    /// Decides whether `tape` is accepted, i.e. whether the run on it can read the whole
    /// tape and ends in a final state.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::from_text("-> B -> b R \n () R -> b R | z R")
    ///     .unwrap()
    ///     .build_dfa()
    ///     .unwrap();
    /// assert!(dfa.accepts("bzb"));
    /// assert!(!dfa.accepts("z"));
    /// ```
    pub fn accepts(&self, tape: &str) -> bool {
        match self.run(tape) {
            Ok(path) => path.last().is_some_and(|q| self.is_final(q)),
            Err(_) => false,
        }
    }

    /// Attempts to find a tape on which `self` and `other` disagree, exploring the product
    /// of both automata breadth-first. The returned tape is therefore a shortest one. If
    /// no such tape exists, the two automata accept the same language and `None` is
    /// returned.
    pub fn separating_word(&self, other: &DFA) -> Option<String> {
        let symbols = self
            .alphabet()
            .union(other.alphabet())
            .copied()
            .collect::<Vec<_>>();

        let initial = (Some(self.start()), Some(other.start()));
        let mut seen = Set::from_iter([initial]);
        let mut queue = VecDeque::from([(initial, String::new())]);

        while let Some(((left, right), word)) = queue.pop_front() {
            let accepted_left = left.is_some_and(|q| self.is_final(q));
            let accepted_right = right.is_some_and(|q| other.is_final(q));
            if accepted_left != accepted_right {
                return Some(word);
            }
            for &symbol in &symbols {
                let next = (
                    left.and_then(|q| self.successor(q, symbol)),
                    right.and_then(|q| other.successor(q, symbol)),
                );
                if next == (None, None) {
                    continue;
                }
                if seen.insert(next) {
                    let mut extended = word.clone();
                    extended.push(symbol);
                    queue.push_back((next, extended));
                }
            }
        }
        None
    }

    /// Returns true if `self` and `other` accept precisely the same tapes.
    pub fn equivalent(&self, other: &DFA) -> bool {
        self.separating_word(other).is_none()
    }

    /// Views `self` as a non-deterministic automaton with the same states and transitions.
    pub fn to_nfa(&self) -> NFA {
        NFA::new(
            self.states().clone(),
            self.alphabet().clone(),
            self.start().clone(),
            self.finals().clone(),
            Nondeterministic::from(self.delta()),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn dfa_scenario() {
        let dfa = crate::tests::bz_dfa();
        assert_eq!(dfa.start(), &State::from("B"));
        assert_eq!(
            dfa.finals().iter().cloned().collect::<Vec<_>>(),
            vec![State::from("R")]
        );
        assert!(dfa.accepts("bzb"));
        assert!(!dfa.accepts("z"));
        assert!(!dfa.accepts(""));
        // symbols outside the alphabet are rejected
        assert!(!dfa.accepts("bx"));

        for _ in 0..3 {
            assert!(dfa.accepts("bzzb"));
        }
    }

    #[test]
    fn runs_report_where_they_get_stuck() {
        let dfa = crate::tests::bz_dfa();
        let path = dfa.run("bz").unwrap();
        assert_eq!(
            path.into_iter().map(|q| q.name()).collect::<Vec<_>>(),
            vec!["B", "R", "R"]
        );
        let stuck = dfa.run("zb").unwrap_err();
        assert_eq!(stuck, vec![&State::from("B")]);
    }

    #[test_log::test]
    fn separating_words_are_shortest() {
        let even_a = AutomatonBuilder::from_text(
            "-> () e -> a o | b e
                   o -> a e | b o",
        )
        .unwrap()
        .build_dfa()
        .unwrap();
        let everything = AutomatonBuilder::from_text("-> () x -> a x | b x")
            .unwrap()
            .build_dfa()
            .unwrap();
        assert_eq!(even_a.separating_word(&everything), Some("a".to_string()));
        assert!(even_a.equivalent(&even_a.clone()));

        // an explicit sink is equivalent to a missing transition
        let partial = AutomatonBuilder::from_text("-> () s -> a t \n t -> b s")
            .unwrap()
            .build_dfa()
            .unwrap();
        let completed = AutomatonBuilder::from_text(
            "-> () s -> a t | b d
                   t -> a d | b s
                   d -> a d | b d",
        )
        .unwrap()
        .build_dfa()
        .unwrap();
        assert!(partial.equivalent(&completed));
        assert!(completed.equivalent(&partial));
    }

    #[test]
    fn dfa_as_nfa_keeps_language() {
        let dfa = crate::tests::bz_dfa();
        let nfa = dfa.to_nfa();
        for tape in ["", "b", "z", "bz", "bzb", "zz"] {
            assert_eq!(dfa.accepts(tape), nfa.accepts(tape));
        }
    }
}
