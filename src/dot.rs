//! Export of automata in the DOT format of [GraphViz](https://graphviz.org). Rendering
//! the produced text is left to external tools.
use std::fmt::Display;

use itertools::Itertools;

use crate::{
    automaton::{Automaton, Delta, MooreMachine, State},
    math::OrderedSet,
};

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Enum that abstracts attributes of nodes in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label={}", quote(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape={}", quote(s)),
        }
    }
}

/// Types that can be turned into a GraphViz graph.
pub trait Dottable {
    /// Returns the states in the order in which they should be emitted.
    fn dot_states(&self) -> Vec<&State>;

    /// Returns the designated start state, which receives an incoming arrow.
    fn dot_start(&self) -> &State;

    /// Returns the edges as triples of origin, label and target.
    fn dot_edges(&self) -> Vec<(&State, String, &State)>;

    /// Returns the attributes of the node for `state`.
    fn dot_state_attributes(&self, state: &State) -> Vec<DotStateAttribute>;

    /// Compute the graphviz representation of `self`, the graph is called `name`. For
    /// more information on the DOT format, see the
    /// [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::from_text("-> B -> b R \n () R -> b R | z R")
    ///     .unwrap()
    ///     .build_dfa()
    ///     .unwrap();
    /// let dot = dfa.dot_representation("bz");
    /// assert!(dot.starts_with("digraph \"bz\" {"));
    /// assert!(dot.contains("\"R\" -> \"R\" [label=\"b, z\"]"));
    /// ```
    fn dot_representation(&self, name: &str) -> String {
        let header = [
            format!("digraph {} {{", quote(name)),
            "rankdir=LR".to_string(),
            "init [label=\"\", shape=none]".to_string(),
        ];

        let states = self.dot_states().into_iter().map(|q| {
            format!(
                "{} [{}]",
                quote(q.name()),
                self.dot_state_attributes(q).into_iter().join(", ")
            )
        });

        let start = format!("init -> {}", quote(self.dot_start().name()));

        let edges = self.dot_edges().into_iter().map(|(from, label, to)| {
            format!(
                "{} -> {} [label={}]",
                quote(from.name()),
                quote(to.name()),
                quote(&label)
            )
        });

        header
            .into_iter()
            .chain(states)
            .chain(std::iter::once(start))
            .chain(edges)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }
}

/// Groups parallel transitions into one edge labelled with all their symbols.
fn grouped_edges<D: Delta>(automaton: &Automaton<D>) -> Vec<(&State, String, &State)> {
    automaton
        .transitions()
        .map(|(from, symbol, to)| ((from, to), symbol))
        .into_group_map()
        .into_iter()
        .map(|((from, to), symbols)| {
            let symbols = symbols.into_iter().collect::<OrderedSet<_>>();
            (from, symbols.into_iter().join(", "), to)
        })
        .sorted()
        .collect()
}

impl<D: Delta> Dottable for Automaton<D> {
    fn dot_states(&self) -> Vec<&State> {
        self.states().iter().collect()
    }

    fn dot_start(&self) -> &State {
        self.start()
    }

    fn dot_edges(&self) -> Vec<(&State, String, &State)> {
        grouped_edges(self)
    }

    fn dot_state_attributes(&self, state: &State) -> Vec<DotStateAttribute> {
        let shape = if self.is_final(state) {
            "doublecircle"
        } else {
            "circle"
        };
        vec![
            DotStateAttribute::Shape(shape.into()),
            DotStateAttribute::Label(state.name().to_string()),
        ]
    }
}

impl Dottable for MooreMachine {
    fn dot_states(&self) -> Vec<&State> {
        self.as_dfa().dot_states()
    }

    fn dot_start(&self) -> &State {
        self.start()
    }

    fn dot_edges(&self) -> Vec<(&State, String, &State)> {
        grouped_edges(self.as_dfa())
    }

    fn dot_state_attributes(&self, state: &State) -> Vec<DotStateAttribute> {
        let mut attributes = self.as_dfa().dot_state_attributes(state);
        if let Some(output) = self.output_of(state) {
            attributes.pop();
            attributes.push(DotStateAttribute::Label(format!("{state} | {output}")));
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn dot_marks_finals_and_start() {
        let nfa = crate::tests::floyd_beigel_nfa();
        let dot = nfa.dot_representation("floyd \"beigel\"");
        assert!(dot.starts_with("digraph \"floyd \\\"beigel\\\"\" {"));
        assert!(dot.contains("\"2\" [shape=\"doublecircle\", label=\"2\"]"));
        assert!(dot.contains("\"3\" [shape=\"circle\", label=\"3\"]"));
        assert!(dot.contains("init -> \"1\""));
        assert!(dot.contains("\"4\" -> \"4\" [label=\"a, b\"]"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn moore_labels_carry_outputs() {
        let moore = AutomatonBuilder::from_text("-> s -> a t\n t -> a s")
            .unwrap()
            .build_moore([("s", '0'), ("t", '1')])
            .unwrap();
        let dot = moore.dot_representation("moore");
        assert!(dot.contains("label=\"t | 1\""));
        assert!(dot.contains("\"s\" -> \"t\" [label=\"a\"]"));
    }
}
