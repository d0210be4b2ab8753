use thiserror::Error;

use crate::automaton::State;

/// Everything that can go wrong while building or converting automata and grammars.
/// All of these are reported at the point where they are detected, nothing is retried
/// and no partially constructed object is handed out.
#[derive(Error, Debug)]
pub enum Error {
    /// A line of a textual automaton or grammar description could not be parsed.
    #[error("malformed specification in line {line} \"{content}\": {reason}")]
    MalformedSpecification {
        /// One-based number of the offending line.
        line: usize,
        /// The offending line itself.
        content: String,
        /// What exactly is wrong with it.
        reason: String,
    },
    /// A deterministic automaton was requested, but some state has more than one
    /// successor on a symbol.
    #[error("state {state} has {} successors on '{symbol}', but a deterministic automaton allows at most one", .targets.len())]
    NonDeterministicSpecification {
        /// The state with the ambiguous move.
        state: State,
        /// The symbol on which the move is ambiguous.
        symbol: char,
        /// All candidate successors.
        targets: Vec<State>,
    },
    /// No start state was designated before building.
    #[error("no start state has been set")]
    MissingStartState,
    /// The output mapping of a Moore machine misses a reachable state.
    #[error("no output is defined for reachable state {0}")]
    IncompleteOutputMapping(State),
    /// An epsilon alternative appeared on a nonterminal other than the root.
    #[error("epsilon rule for nonterminal {0}, which is not the root")]
    InvalidEpsilonRule(String),
    /// A rule is not of the form `A -> t`, `A -> t B` or `A -> ε`.
    #[error("rule {rule} is not right-linear: {reason}")]
    UnsupportedRuleShape {
        /// The rule rendered as text.
        rule: String,
        /// Why it cannot be turned into transitions.
        reason: String,
    },
    /// A symbol lookup by name found nothing.
    #[error("no symbol named \"{0}\"")]
    UnknownSymbolName(String),
    /// Symbols must have a non-empty name.
    #[error("invalid empty string for symbol name")]
    EmptySymbolName,
    /// Reading a specification from a file failed.
    #[error("could not read specification: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
