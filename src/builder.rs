use std::{path::Path, str::FromStr};

use tracing::{debug, trace, warn};

use crate::{math::Map, prelude::*};

const START_MARKER: &str = "->";
const FINAL_MARKER: &str = "()";

/// Helper struct for the construction of automata. Transitions are collected in a table
/// that maps every state and symbol to a set of destinations, so deterministic and
/// non-deterministic descriptions are handled uniformly. Whether the table is
/// single-valued is only checked once a [`DFA`] is requested.
///
/// A builder can be filled through method calls or from a textual description, see
/// [`AutomatonBuilder::from_text`]. Building does not consume the builder, every call to
/// one of the `build_*` methods produces an independent automaton.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let mut builder = AutomatonBuilder::new();
/// builder
///     .set_start_state("B")
///     .add_final_state("R")
///     .add_transition("B", 'b', "R")
///     .add_transition("R", 'b', "R")
///     .add_transition("R", 'z', "R");
/// let dfa = builder.build_dfa().unwrap();
/// assert!(dfa.accepts("bzb"));
/// assert!(!dfa.accepts("z"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    start: Option<State>,
    states: OrderedSet<State>,
    finals: OrderedSet<State>,
    alphabet: OrderedSet<TapeSymbol>,
    table: Nondeterministic,
}

impl AutomatonBuilder {
    /// Creates an empty builder without start state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Designates `state` as the start state. A previously set start state is replaced.
    pub fn set_start_state<Q: Into<State>>(&mut self, state: Q) -> &mut Self {
        let state = state.into();
        if let Some(previous) = self.start.as_ref().filter(|q| *q != &state) {
            warn!("replacing start state {previous} with {state}");
        }
        self.states.insert(state.clone());
        self.start = Some(state);
        self
    }

    /// Marks `state` as final, adding it if it is not known yet.
    pub fn add_final_state<Q: Into<State>>(&mut self, state: Q) -> &mut Self {
        let state = state.into();
        self.states.insert(state.clone());
        self.finals.insert(state);
        self
    }

    /// Adds `state` without any transitions.
    pub fn add_state<Q: Into<State>>(&mut self, state: Q) -> &mut Self {
        self.states.insert(state.into());
        self
    }

    /// Adds a transition from `from` to `to` on `symbol`. Both states are added if
    /// necessary and `symbol` becomes part of the alphabet.
    pub fn add_transition<Q: Into<State>, P: Into<State>>(
        &mut self,
        from: Q,
        symbol: TapeSymbol,
        to: P,
    ) -> &mut Self {
        let (from, to) = (from.into(), to.into());
        trace!("adding transition {from} --{symbol}--> {to}");
        self.states.insert(from.clone());
        self.states.insert(to.clone());
        self.alphabet.insert(symbol);
        self.table.insert(from, symbol, to);
        self
    }

    /// Parses a textual description of an automaton. Every non-blank line describes one
    /// state and has the form
    /// ```text
    /// [->] [()] name [-> sym dest | sym dest | ...]
    /// ```
    /// where a leading `->` marks the start state and `()` marks a final state. Each
    /// alternative consists of a single character `sym` followed by the name of the
    /// destination `dest`, the separating whitespace may be omitted. A line consisting of
    /// a (possibly marked) name only declares a state without outgoing transitions.
    ///
    /// Fails with [`Error::MalformedSpecification`] on the first line that does not fit
    /// this form, or if two different states are marked as start.
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
    /// assert_eq!(nfa.size(), 4);
    /// assert!(nfa.accepts("abba"));
    /// ```
    pub fn from_text(text: &str) -> Result<Self> {
        let mut builder = Self::new();
        for (number, content) in text.lines().enumerate() {
            if content.trim().is_empty() {
                continue;
            }
            builder.parse_line(number + 1, content)?;
        }
        debug!(
            "parsed {} states with {} transitions",
            builder.states.len(),
            builder.table.size()
        );
        Ok(builder)
    }

    /// Reads the file at `path` and parses its content with [`AutomatonBuilder::from_text`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!("read specification from {}", path.as_ref().display());
        Self::from_text(&text)
    }

    fn parse_line(&mut self, line: usize, content: &str) -> Result<()> {
        let malformed = |reason: &str| Error::MalformedSpecification {
            line,
            content: content.trim().to_string(),
            reason: reason.to_string(),
        };

        let mut rest = content.trim();
        let (mut is_start, mut is_final) = (false, false);
        loop {
            if let Some(stripped) = rest.strip_prefix(START_MARKER) {
                is_start = true;
                rest = stripped.trim_start();
            } else if let Some(stripped) = rest.strip_prefix(FINAL_MARKER) {
                is_final = true;
                rest = stripped.trim_start();
            } else {
                break;
            }
        }

        let (name, alternatives) = match rest.split_once(START_MARKER) {
            Some((name, alternatives)) => (name.trim(), Some(alternatives)),
            None => (rest.trim(), None),
        };
        if name.is_empty() {
            return Err(malformed("missing state name"));
        }
        if name.contains(char::is_whitespace) || name.contains('|') {
            return Err(malformed("state names must not contain whitespace or '|'"));
        }
        let state = State::from(name);

        if is_start {
            if let Some(previous) = self.start.as_ref().filter(|q| *q != &state) {
                return Err(malformed(&format!(
                    "start state {previous} has already been declared"
                )));
            }
            self.set_start_state(state.clone());
        }
        if is_final {
            self.add_final_state(state.clone());
        }
        self.add_state(state.clone());

        let Some(alternatives) = alternatives else {
            return Ok(());
        };
        for alternative in alternatives.split('|') {
            let (symbol, destination) = parse_alternative(alternative).ok_or_else(|| {
                malformed(&format!("invalid alternative \"{}\"", alternative.trim()))
            })?;
            self.add_transition(state.clone(), symbol, destination);
        }
        Ok(())
    }

    fn start_state(&self) -> Result<&State> {
        self.start.as_ref().ok_or(Error::MissingStartState)
    }

    /// Produces an [`NFA`] from the collected states and transitions. Fails only if no
    /// start state has been set.
    pub fn build_nfa(&self) -> Result<NFA> {
        let start = self.start_state()?;
        Ok(NFA::new(
            self.states.clone(),
            self.alphabet.clone(),
            start.clone(),
            self.finals.clone(),
            self.table.clone(),
        ))
    }

    /// Produces a [`DFA`] from the collected states and transitions. Fails with
    /// [`Error::NonDeterministicSpecification`] if some state has more than one
    /// destination on a symbol.
    pub fn build_dfa(&self) -> Result<DFA> {
        let start = self.start_state()?;
        let delta = Deterministic::try_from(&self.table)?;
        Ok(DFA::new(
            self.states.clone(),
            self.alphabet.clone(),
            start.clone(),
            self.finals.clone(),
            delta,
        ))
    }

    /// Produces a [`FiniteAutomaton`], which is deterministic whenever the collected
    /// transitions allow it.
    pub fn build(&self) -> Result<FiniteAutomaton> {
        match self.build_dfa() {
            Ok(dfa) => Ok(dfa.into()),
            Err(Error::NonDeterministicSpecification { state, symbol, .. }) => {
                debug!("building an NFA since {state} is ambiguous on '{symbol}'");
                self.build_nfa().map(Into::into)
            }
            Err(e) => Err(e),
        }
    }

    /// Produces a [`MooreMachine`] that emits `lambda[q]` upon entering `q`. Requires the
    /// transitions to be deterministic and `lambda` to define an output for every state
    /// reachable from the start state, otherwise [`Error::IncompleteOutputMapping`] is
    /// returned.
    pub fn build_moore<I, Q>(&self, lambda: I) -> Result<MooreMachine>
    where
        I: IntoIterator<Item = (Q, char)>,
        Q: Into<State>,
    {
        let dfa = self.build_dfa()?;
        let lambda: Map<State, char> = lambda
            .into_iter()
            .map(|(q, c)| (q.into(), c))
            .collect();
        MooreMachine::new(dfa, lambda)
    }
}

/// Splits an alternative like `a q` or `aq` into its symbol and destination.
fn parse_alternative(alternative: &str) -> Option<(TapeSymbol, State)> {
    let tokens = alternative.split_whitespace().collect::<Vec<_>>();
    match tokens.as_slice() {
        [symbol, destination] => {
            let mut chars = symbol.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => Some((symbol, State::from(*destination))),
                _ => None,
            }
        }
        [joined] => {
            let mut chars = joined.chars();
            let symbol = chars.next()?;
            let destination = chars.as_str();
            (!destination.is_empty()).then(|| (symbol, State::from(destination)))
        }
        _ => None,
    }
}

impl FromStr for AutomatonBuilder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn api_and_text_agree() {
        let mut builder = AutomatonBuilder::new();
        builder
            .set_start_state("B")
            .add_final_state("R")
            .add_transition("B", 'b', "R")
            .add_transition("R", 'b', "R")
            .add_transition("R", 'z', "R");
        let dfa = builder.build_dfa().unwrap();
        assert_eq!(dfa, crate::tests::bz_dfa());
        assert_eq!(dfa.start(), &State::from("B"));
        assert_eq!(dfa.finals(), &OrderedSet::from([State::from("R")]));
        assert!(dfa.accepts("bzb"));
        assert!(!dfa.accepts("z"));
    }

    #[test]
    fn markers_and_alternatives() {
        let builder: AutomatonBuilder = "-> () s -> as | b t\n\n   t\n() u -> bs"
            .parse()
            .unwrap();
        let nfa = builder.build_nfa().unwrap();
        assert_eq!(nfa.size(), 3);
        assert_eq!(nfa.start(), &State::from("s"));
        assert!(nfa.is_final(&State::from("s")));
        assert!(nfa.is_final(&State::from("u")));
        assert!(!nfa.is_final(&State::from("t")));
        assert_eq!(nfa.alphabet(), &OrderedSet::from(['a', 'b']));
        assert_eq!(nfa.transitions().count(), 3);
        assert!(nfa.accepts("aa"));
        assert!(!nfa.accepts("ab"));
    }

    #[test]
    fn malformed_lines_are_reported_with_context() {
        for (text, line) in [
            ("-> s -> a t\n() -> a s", 2),
            ("-> s -> ab t", 1),
            ("-> s -> a t | ", 1),
            ("-> s\n t u -> a s", 2),
            ("-> s -> a t\n-> t", 2),
        ] {
            match AutomatonBuilder::from_text(text) {
                Err(Error::MalformedSpecification {
                    line: reported,
                    content,
                    ..
                }) => {
                    assert_eq!(reported, line, "wrong line for {text:?}");
                    assert_eq!(content, text.lines().nth(line - 1).unwrap().trim());
                }
                other => panic!("expected malformed specification for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_start_state() {
        let builder = AutomatonBuilder::from_text("() s -> a s").unwrap();
        assert!(matches!(builder.build_nfa(), Err(Error::MissingStartState)));
        assert!(matches!(builder.build_dfa(), Err(Error::MissingStartState)));
        assert!(matches!(
            AutomatonBuilder::new().build(),
            Err(Error::MissingStartState)
        ));
    }

    #[test_log::test]
    fn determinism_is_checked_at_build_time() {
        let builder = AutomatonBuilder::from_text(crate::tests::FLOYD_BEIGEL).unwrap();
        match builder.build_dfa() {
            Err(Error::NonDeterministicSpecification { state, symbol, .. }) => {
                assert_eq!(state, State::from("2"));
                assert_eq!(symbol, 'b');
            }
            other => panic!("expected non-determinism, got {other:?}"),
        }
        // the builder stays usable
        let nfa = builder.build_nfa().unwrap();
        assert_eq!(nfa, builder.build_nfa().unwrap());
    }

    #[test]
    fn repeated_start_state_through_the_api_is_replaced() {
        let mut builder = AutomatonBuilder::new();
        builder
            .set_start_state("p")
            .set_start_state("q")
            .add_transition("q", 'a', "p");
        let dfa = builder.build_dfa().unwrap();
        assert_eq!(dfa.start(), &State::from("q"));
        assert_eq!(dfa.size(), 2);
    }

    #[test]
    fn reading_from_a_missing_file_fails() {
        let result = AutomatonBuilder::from_file("/this/file/does/not/exist.fa");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
