use tracing::debug;

use crate::{
    automaton::{Automaton, Delta, Deterministic, Nondeterministic, State, TapeSymbol, DFA, NFA},
    math::OrderedSet,
};

fn alphabet_of_size(symbols: usize) -> OrderedSet<TapeSymbol> {
    ('a'..='z').take(symbols.clamp(1, 26)).collect()
}

fn states_of_size(size: usize) -> Vec<State> {
    (0..size.max(1)).map(|i| State::new(i.to_string())).collect()
}

fn assemble<D: Delta>(
    rng: &mut fastrand::Rng,
    states: Vec<State>,
    alphabet: OrderedSet<TapeSymbol>,
    delta: D,
) -> Automaton<D> {
    let finals = states.iter().filter(|_| rng.bool()).cloned().collect();
    let start = states[0].clone();
    Automaton::new(states.into_iter().collect(), alphabet, start, finals, delta)
}

/// Draws a random [`NFA`] with `size` states named `0`, `1`, ... over the first `symbols`
/// letters of the latin alphabet. Every possible transition is present with probability
/// `density`, every state is final with probability one half. State `0` is the start.
///
/// At least one state and one symbol are always used.
pub fn random_nfa(rng: &mut fastrand::Rng, size: usize, symbols: usize, density: f64) -> NFA {
    let states = states_of_size(size);
    let alphabet = alphabet_of_size(symbols);
    let mut delta = Nondeterministic::default();
    for from in &states {
        for &symbol in &alphabet {
            for to in &states {
                if rng.f64() < density {
                    delta.insert(from.clone(), symbol, to.clone());
                }
            }
        }
    }
    debug!("drew random NFA with {} transitions", delta.size());
    assemble(rng, states, alphabet, delta)
}

/// Works like [`random_nfa`], but draws a [`DFA`]. For every state and symbol, a
/// transition to a uniformly chosen target exists with probability `density`.
pub fn random_dfa(rng: &mut fastrand::Rng, size: usize, symbols: usize, density: f64) -> DFA {
    let states = states_of_size(size);
    let alphabet = alphabet_of_size(symbols);
    let mut delta = Deterministic::default();
    for from in &states {
        for &symbol in &alphabet {
            if rng.f64() < density {
                let to = &states[rng.usize(..states.len())];
                delta.insert(from.clone(), symbol, to.clone());
            }
        }
    }
    debug!("drew random DFA with {} transitions", delta.size());
    assemble(rng, states, alphabet, delta)
}
