//! Label selection: ranked words, or the content hash when too few survive

use crate::types::{CandidateLabel, FileDigest};

/// Bounds on how many words make a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelBounds {
    /// Fewer words than this falls back to the digest
    pub min_words: usize,
    /// Words beyond this are dropped
    pub max_words: usize,
}

impl Default for LabelBounds {
    fn default() -> Self {
        Self {
            min_words: 2,
            max_words: 5,
        }
    }
}

/// Pick the label for a file. `digest` is only called on the fallback path,
/// so files that produce enough words are never read twice.
pub fn select_label<F, E>(
    words: &[String],
    bounds: LabelBounds,
    digest: F,
) -> Result<CandidateLabel, E>
where
    F: FnOnce() -> Result<FileDigest, E>,
{
    // an empty word label would name the file after its extension alone
    if words.is_empty() || words.len() < bounds.min_words {
        return digest().map(CandidateLabel::Digest);
    }

    let take = words.len().min(bounds.max_words);
    Ok(CandidateLabel::Words(words[..take].to_vec()))
}
