use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::prelude::*;

/// Computes the canonical name of a macro state, which is the sorted list of the names of
/// its members, e.g. `{1,3}`.
pub(crate) fn macro_state_name<'a, I>(members: I) -> State
where
    I: IntoIterator<Item = &'a State>,
{
    State::new(State::show_collection(members))
}

/// Hands out names for macro states. Member names may themselves contain braces and
/// commas, so distinct sets can share a canonical name, e.g. `{1,2}` for the set holding
/// `1,2` and for the set holding `1` and `2`. A name that was handed out before is primed
/// until it is unused. Canonical names end in `}`, so a primed name never clashes with one.
#[derive(Default)]
pub(crate) struct MacroStateNames {
    taken: Set<State>,
}

impl MacroStateNames {
    pub(crate) fn fresh<'a, I>(&mut self, members: I) -> State
    where
        I: IntoIterator<Item = &'a State>,
    {
        let mut name = macro_state_name(members).name().to_string();
        while self.taken.contains(name.as_str()) {
            name.push('\'');
        }
        trace!("naming macro state {name}");
        let name = State::new(name);
        self.taken.insert(name.clone());
        name
    }
}

impl NFA {
    /// Turns `self` into an equivalent [`DFA`] through the subset construction. The
    /// states of the result are the sets of states of `self` that can be active at the
    /// same time, starting with the set containing only the start state. Each of them is
    /// named after its members, so `{2,3}` stands for the set containing `2` and `3`.
    /// Should two sets end up with the same name, the one discovered later is primed.
    /// A set of states that is empty is never created, instead no transition is added.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let nfa = AutomatonBuilder::from_text("-> p -> a p | a q \n () q")
    ///     .unwrap()
    ///     .build_nfa()
    ///     .unwrap();
    /// let dfa = nfa.dfa_of();
    /// assert_eq!(dfa.start(), &State::from("{p}"));
    /// assert_eq!(
    ///     dfa.successor(&State::from("{p}"), 'a'),
    ///     Some(&State::from("{p,q}"))
    /// );
    /// assert!(dfa.accepts("aa"));
    /// ```
    pub fn dfa_of(&self) -> DFA {
        let initial = OrderedSet::from([self.start()]);
        let mut namer = MacroStateNames::default();
        let start = namer.fresh(initial.iter().copied());

        let mut names: Map<OrderedSet<&State>, State> = Map::default();
        names.insert(initial.clone(), start.clone());
        let mut queue = VecDeque::from([initial]);

        let mut delta = Deterministic::default();
        let mut finals = OrderedSet::new();

        while let Some(macro_state) = queue.pop_front() {
            let from = names[&macro_state].clone();
            if macro_state.iter().any(|q| self.is_final(q)) {
                finals.insert(from.clone());
            }

            for &symbol in self.alphabet() {
                let target: OrderedSet<&State> = macro_state
                    .iter()
                    .flat_map(|&q| self.successors(q, symbol))
                    .collect();
                if target.is_empty() {
                    continue;
                }

                let to = match names.get(&target) {
                    Some(name) => name.clone(),
                    None => {
                        let name = namer.fresh(target.iter().copied());
                        names.insert(target.clone(), name.clone());
                        queue.push_back(target);
                        name
                    }
                };
                delta.insert(from.clone(), symbol, to);
            }
        }

        debug!(
            "subset construction turned {} states into {} macro states",
            self.size(),
            names.len()
        );
        DFA::new(
            names.into_values().collect(),
            self.alphabet().clone(),
            start,
            finals,
            delta,
        )
    }
}
