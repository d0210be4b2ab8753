use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, Delta, State, NFA},
    builder::AutomatonBuilder,
    grammar::{Grammar, Sequence},
    math::OrderedSet,
    symbol::{Symbol, SymbolPool},
    Error, Result,
};

const FINAL_STATE_NAME: &str = "FIN";

/// Converts a right-linear `grammar` into an [`NFA`] whose states are the nonterminals
/// and whose start state is the root. The rules are translated as follows
/// - `A -> t B` becomes the transition `A --t--> B`,
/// - `A -> t` becomes `A --t--> FIN`, where `FIN` is an additional final state whose name
///   is primed until it differs from all nonterminals,
/// - `A -> ε` makes `A` final, this is only allowed if `A` is the root.
///
/// Fails with [`Error::InvalidEpsilonRule`] for an epsilon alternative of any other
/// nonterminal and with [`Error::UnsupportedRuleShape`] for alternatives of a different
/// form or terminals whose name is not a single character.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let mut pool = SymbolPool::new();
/// let grammar = GrammarBuilder::from_text("S -> a S | b A | eps\nA -> b", &mut pool).unwrap();
/// let nfa = automaton_of(&grammar, &pool).unwrap();
/// assert!(nfa.accepts(""));
/// assert!(nfa.accepts("aabb"));
/// assert!(!nfa.accepts("ab"));
/// ```
pub fn automaton_of(grammar: &Grammar, pool: &SymbolPool) -> Result<NFA> {
    let state_of = |nt: Symbol| State::from(pool.name(nt));
    let nonterminal_names = grammar
        .nonterminals()
        .into_iter()
        .map(|nt| pool.name(nt))
        .collect::<OrderedSet<_>>();
    let mut fin = FINAL_STATE_NAME.to_string();
    while nonterminal_names.contains(fin.as_str()) {
        fin.push('\'');
    }
    let fin = State::from(fin);

    let mut builder = AutomatonBuilder::new();
    builder.set_start_state(state_of(grammar.root()));
    for nt in grammar.nonterminals() {
        builder.add_state(state_of(nt));
    }

    for (&lhs, alternatives) in grammar.rules() {
        for alternative in alternatives {
            let shape_error = |reason: &str| Error::UnsupportedRuleShape {
                rule: rule_text(pool, lhs, alternative),
                reason: reason.to_string(),
            };
            match alternative.as_slice() {
                [] if lhs == grammar.root() => {
                    trace!("root {} derives epsilon", pool.name(lhs));
                    builder.add_final_state(state_of(lhs));
                }
                [] => return Err(Error::InvalidEpsilonRule(pool.name(lhs).to_string())),
                [t] if t.is_t() => {
                    let symbol = tape_symbol(pool, *t).ok_or_else(|| {
                        shape_error("terminals must consist of a single character")
                    })?;
                    builder
                        .add_final_state(fin.clone())
                        .add_transition(state_of(lhs), symbol, fin.clone());
                }
                [t, nt] if t.is_t() && nt.is_nt() => {
                    let symbol = tape_symbol(pool, *t).ok_or_else(|| {
                        shape_error("terminals must consist of a single character")
                    })?;
                    builder.add_transition(state_of(lhs), symbol, state_of(*nt));
                }
                _ => {
                    return Err(shape_error(
                        "only A -> t B, A -> t and A -> eps are right-linear",
                    ))
                }
            }
        }
    }

    let nfa = builder.build_nfa()?;
    debug!(
        "grammar with {} alternatives yields automaton with {} states",
        grammar.size(),
        nfa.size()
    );
    Ok(nfa)
}

fn tape_symbol(pool: &SymbolPool, terminal: Symbol) -> Option<char> {
    let mut chars = pool.name(terminal).chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}

fn rule_text(pool: &SymbolPool, lhs: Symbol, rhs: &Sequence) -> String {
    format!(
        "{} -> {}",
        pool.name(lhs),
        rhs.iter().map(|s| pool.name(*s)).join(" ")
    )
}

/// Derives a right-linear grammar from `automaton`. Every state becomes a nonterminal,
/// the start state becomes the root and every transition `S --t--> D` becomes the rule
/// `S -> t D`.
///
/// Final states do not give rise to any rules, in particular neither `S -> t` nor
/// `S -> ε` is ever produced. Converting the result back with [`automaton_of`] thus
/// yields an automaton without final states, which accepts nothing.
pub fn grammar_of<D: Delta>(automaton: &Automaton<D>, pool: &mut SymbolPool) -> Result<Grammar> {
    let root = pool.nonterminal(automaton.start().name())?;
    let mut rules: BTreeMap<Symbol, OrderedSet<Sequence>> = BTreeMap::new();
    for (from, symbol, to) in automaton.transitions() {
        let lhs = pool.nonterminal(from.name())?;
        let t = pool.terminal(&symbol.to_string())?;
        let target = pool.nonterminal(to.name())?;
        rules.entry(lhs).or_default().insert(vec![t, target]);
    }
    debug!(
        "derived {} rules from {} transitions",
        rules.values().map(OrderedSet::len).sum::<usize>(),
        automaton.transitions().count()
    );
    Ok(Grammar::new(root, rules))
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn epsilon_is_only_allowed_on_the_root() {
        let mut pool = SymbolPool::new();
        let grammar =
            GrammarBuilder::from_text("S -> a A | eps\nA -> b A | eps", &mut pool).unwrap();
        assert!(matches!(
            automaton_of(&grammar, &pool),
            Err(Error::InvalidEpsilonRule(nt)) if nt == "A"
        ));

        let grammar = GrammarBuilder::from_text("S -> a A | eps\nA -> b A | b", &mut pool).unwrap();
        let nfa = automaton_of(&grammar, &pool).unwrap();
        assert!(nfa.is_final(&State::from("S")));
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("abbb"));
        assert!(!nfa.accepts("a"));
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        let mut pool = SymbolPool::new();
        for text in ["S -> a b", "S -> A a\nA -> a", "S -> ab S", "S -> a S S", "S -> S\n"] {
            let grammar = GrammarBuilder::from_text(text, &mut pool).unwrap();
            assert!(
                matches!(
                    automaton_of(&grammar, &pool),
                    Err(Error::UnsupportedRuleShape { .. })
                ),
                "{text:?} should not be right-linear"
            );
        }
    }

    #[test_log::test]
    fn synthesized_final_state_avoids_nonterminals() {
        let mut pool = SymbolPool::new();
        let grammar = GrammarBuilder::from_text("FIN -> a FIN | b", &mut pool).unwrap();
        let nfa = automaton_of(&grammar, &pool).unwrap();
        assert_eq!(nfa.size(), 2);
        assert!(nfa.is_final(&State::from("FIN'")));
        assert!(!nfa.is_final(&State::from("FIN")));
        assert!(nfa.accepts("aab"));
        assert!(!nfa.accepts("aa"));

        // no terminal-only rule, no extra state
        let grammar = GrammarBuilder::from_text("S -> a S | eps", &mut pool).unwrap();
        assert_eq!(automaton_of(&grammar, &pool).unwrap().size(), 1);
    }

    #[test_log::test]
    fn grammar_of_emits_one_rule_per_transition() {
        let mut pool = SymbolPool::new();
        let nfa = crate::tests::floyd_beigel_nfa();
        let grammar = grammar_of(&nfa, &mut pool).unwrap();
        assert_eq!(grammar.root(), pool.symbol_for("1").unwrap());
        assert_eq!(grammar.size(), nfa.transitions().count());
        assert!(grammar
            .rules()
            .keys()
            .all(|nt| !grammar.has_epsilon(*nt)));

        let two = pool.nonterminal("2").unwrap();
        assert_eq!(
            grammar
                .alternatives(two)
                .map(|seq| seq.iter().map(|s| pool.name(*s)).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            vec![vec!["a", "2"], vec!["b", "1"], vec!["b", "3"]]
        );
    }

    #[test_log::test]
    fn round_trip_loses_final_states() {
        let mut pool = SymbolPool::new();
        let grammar = GrammarBuilder::from_text("S -> a A\nA -> b", &mut pool).unwrap();
        let nfa = automaton_of(&grammar, &pool).unwrap();
        assert!(nfa.accepts("ab"));

        let derived = grammar_of(&nfa, &mut pool).unwrap();
        let again = automaton_of(&derived, &pool).unwrap();
        assert_eq!(again.transitions().count(), nfa.transitions().count());
        assert!(again.finals().is_empty());
        assert!(!again.accepts("ab"));
        assert!(words_up_to(again.alphabet(), 4).all(|tape| !again.accepts(&tape)));
    }
}
