use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    determinization::{macro_state_name, MacroStateNames},
    math::Partition,
    prelude::*,
};

/// Computes the coarsest partition of the states `0..successors.len()` that separates
/// accepting from rejecting states and is compatible with the transitions, i.e. two
/// states in the same class move into the same class under every symbol.
///
/// `successors[q][i]` is the successor of `q` under the `i`-th symbol. Starting from the
/// partition into accepting and rejecting states, every round assigns each state the
/// signature consisting of its current class and the classes of its successors. States
/// with equal signatures stay together. As each round can only split classes, the
/// process stops once a round does not increase the number of classes.
pub(crate) fn partition_refinement(
    successors: &[Vec<usize>],
    accepting: &[bool],
) -> Partition<usize> {
    debug_assert_eq!(successors.len(), accepting.len());
    let mut classes: Vec<usize> = accepting.iter().map(|&a| usize::from(a)).collect();
    let mut count = classes.iter().unique().count();

    loop {
        let mut signatures: Map<(usize, Vec<usize>), usize> = Map::default();
        let refined: Vec<usize> = successors
            .iter()
            .enumerate()
            .map(|(q, row)| {
                let signature = (classes[q], row.iter().map(|&p| classes[p]).collect());
                let next = signatures.len();
                *signatures.entry(signature).or_insert(next)
            })
            .collect();
        let refined_count = signatures.len();
        trace!("refinement round produced {refined_count} classes from {count}");

        classes = refined;
        if refined_count == count {
            break;
        }
        count = refined_count;
    }

    let mut blocks = vec![OrderedSet::new(); count];
    for (q, &class) in classes.iter().enumerate() {
        blocks[class].insert(q);
    }
    Partition::from(blocks)
}

impl DFA {
    /// Computes the minimal [`DFA`] accepting the same language as `self`.
    ///
    /// Unreachable states are removed first, then the remaining states are merged with
    /// partition refinement. Missing transitions are treated as moves into an implicit
    /// rejecting sink state, so states from which no final state can be reached end up in
    /// the class of that sink. This class is dropped together with all transitions leading
    /// into it. Each remaining class becomes a state named after its members, for example
    /// `{p,q}`, primed if another class already carries that name. If the start state
    /// itself is dead, the result consists of a single non-final state without transitions.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::from_text(
    ///     "-> s -> a p | b q
    ///      () p -> a p | b q
    ///      () q -> a p | b q",
    /// )
    /// .unwrap()
    /// .build_dfa()
    /// .unwrap();
    /// let minimal = dfa.minimal_of();
    /// assert_eq!(minimal.size(), 2);
    /// assert!(minimal.equivalent(&dfa));
    /// ```
    pub fn minimal_of(&self) -> DFA {
        let reachable = self.reachable_states().into_iter().collect::<Vec<_>>();
        let numbering: Map<&State, usize> = reachable
            .iter()
            .enumerate()
            .map(|(i, q)| (*q, i))
            .collect();
        let sink = reachable.len();
        let symbols = self.alphabet().iter().copied().collect::<Vec<_>>();

        let successors = reachable
            .iter()
            .map(|q| {
                symbols
                    .iter()
                    .map(|&sym| {
                        self.successor(q, sym)
                            .map(|p| numbering[&p])
                            .unwrap_or(sink)
                    })
                    .collect::<Vec<_>>()
            })
            .chain(std::iter::once(vec![sink; symbols.len()]))
            .collect::<Vec<_>>();
        let accepting = reachable
            .iter()
            .map(|q| self.is_final(q))
            .chain(std::iter::once(false))
            .collect::<Vec<_>>();

        let partition = partition_refinement(&successors, &accepting);
        let mut class = vec![0; successors.len()];
        for (c, block) in partition.iter().enumerate() {
            for &q in block {
                class[q] = c;
            }
        }
        let dead = class[sink];
        let start = class[numbering[self.start()]];

        if start == dead {
            debug!("language is empty, minimal automaton has a single state");
            let start = macro_state_name(
                partition[dead]
                    .iter()
                    .filter(|&&q| q != sink)
                    .map(|&q| reachable[q]),
            );
            return DFA::new(
                OrderedSet::from([start.clone()]),
                self.alphabet().clone(),
                start,
                OrderedSet::new(),
                Deterministic::default(),
            );
        }

        let mut namer = MacroStateNames::default();
        let names: Map<usize, State> = partition
            .iter()
            .enumerate()
            .filter(|(c, _)| *c != dead)
            .map(|(c, block)| (c, namer.fresh(block.iter().map(|&q| reachable[q]))))
            .collect();

        let mut delta = Deterministic::default();
        let mut finals = OrderedSet::new();
        for (&c, name) in &names {
            let Some(&representative) = partition[c].first() else {
                continue;
            };
            if accepting[representative] {
                finals.insert(name.clone());
            }
            for (i, &symbol) in symbols.iter().enumerate() {
                let target = class[successors[representative][i]];
                if target != dead {
                    delta.insert(name.clone(), symbol, names[&target].clone());
                }
            }
        }

        debug!(
            "minimization reduced {} states to {}",
            self.size(),
            names.len()
        );
        DFA::new(
            names.values().cloned().collect(),
            self.alphabet().clone(),
            names[&start].clone(),
            finals,
            delta,
        )
    }
}
