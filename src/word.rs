use itertools::Itertools;

use crate::{automaton::TapeSymbol, math::OrderedSet};

/// Enumerates all tapes over `alphabet` whose length is at most `max_len`, shorter tapes
/// first and tapes of equal length in lexicographic order. The empty tape is always
/// produced, even for an empty alphabet.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let words = words_up_to(&OrderedSet::from(['a', 'b']), 2).collect::<Vec<_>>();
/// assert_eq!(words, vec!["", "a", "b", "aa", "ab", "ba", "bb"]);
/// ```
pub fn words_up_to(
    alphabet: &OrderedSet<TapeSymbol>,
    max_len: usize,
) -> impl Iterator<Item = String> + '_ {
    std::iter::once(String::new()).chain((1..=max_len).flat_map(move |len| {
        itertools::repeat_n(alphabet.iter(), len)
            .multi_cartesian_product()
            .map(|word| word.into_iter().collect::<String>())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match() {
        let alphabet = OrderedSet::from(['x', 'y', 'z']);
        assert_eq!(words_up_to(&alphabet, 3).count(), 1 + 3 + 9 + 27);
        assert_eq!(words_up_to(&alphabet, 0).collect::<Vec<_>>(), vec![""]);
        assert_eq!(words_up_to(&OrderedSet::new(), 4).count(), 1);
    }
}
