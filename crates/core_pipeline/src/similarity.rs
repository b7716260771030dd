//! Near-duplicate removal
//!
//! The filter is greedy and order-dependent: each token is compared only
//! against tokens already accepted, so the first of a group of similar words
//! wins. Because every accepted token was checked against all earlier
//! accepted tokens, running the filter on its own output changes nothing.

use crate::config::SimilarityPolicy;
use crate::resources::Lexicon;
use strsim::normalized_levenshtein;

/// Tokens at or above this length are rejected by the strict policy
pub const STRICT_MAX_LEN: usize = 10;

/// Keep the tokens of `words` that are not too similar to an earlier kept token
pub fn filter_similar<L: Lexicon + ?Sized>(
    words: &[String],
    policy: SimilarityPolicy,
    lexicon: &L,
) -> Vec<String> {
    // (word, stem) of every accepted token
    let mut accepted: Vec<(String, String)> = Vec::new();

    for word in words {
        let stem = lexicon.stem(word);
        let reject = match policy {
            SimilarityPolicy::Strict { threshold } => {
                too_similar_strict(word, &stem, &accepted, threshold)
            }
            SimilarityPolicy::Relaxed { threshold } => {
                lexicon.is_reference_word(&stem)
                    && accepted
                        .iter()
                        .any(|(_, other)| normalized_levenshtein(&stem, other) >= threshold)
            }
        };

        if !reject {
            accepted.push((word.clone(), stem));
        }
    }

    accepted.into_iter().map(|(word, _)| word).collect()
}

fn too_similar_strict(
    word: &str,
    stem: &str,
    accepted: &[(String, String)],
    threshold: f64,
) -> bool {
    if word.chars().count() >= STRICT_MAX_LEN {
        return true;
    }

    accepted.iter().any(|(other, other_stem)| {
        word == other
            || stem == other_stem
            || sequence_ratio(word, other) >= threshold
            || sequence_ratio(stem, other_stem) >= threshold
    })
}

/// Ratcliff/Obershelp similarity: `2 * M / (|a| + |b|)` where `M` is the total
/// size of the matching blocks found by repeatedly taking the longest common
/// substring and recursing on both sides of it. Two empty strings score 1.0.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matches = matching_chars(&a, &b);
    2.0 * matches as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`. Among equally
/// long matches the one starting earliest in `a`, then in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run length of the match ending at (i - 1, j - 1)
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut curr = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;
            curr[k] = if a[i] == b[j] { prev[k - 1] + 1 } else { 0 };
            if curr[k] > best_size {
                best_size = curr[k];
                best_i = i + 1 - best_size;
                best_j = j + 1 - best_size;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_size)
}
