//! Frequency ranking: rarest words first

use crate::resources::Lexicon;

/// Reorder `words` by ascending corpus frequency. The sort is stable, so
/// words with equal frequency (including unseen words at 0) keep their
/// input order.
pub fn sort_by_frequency<S, L>(words: &mut [S], lexicon: &L)
where
    S: AsRef<str>,
    L: Lexicon + ?Sized,
{
    words.sort_by_cached_key(|word| lexicon.frequency(word.as_ref()));
}
