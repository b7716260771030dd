//! Core types for the naming pipeline
//!
//! Everything here is per-file and short-lived: built while one file is
//! processed and dropped once its rename has been applied.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Part-of-speech classes the pipeline distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosTag {
    /// Name of a person, place or brand (NNP)
    ProperNounSingular,
    /// Plural name (NNPS)
    ProperNounPlural,
    /// Any other word
    Word,
    /// Punctuation, numbers and symbols
    Other,
}

impl PosTag {
    /// Proper nouns are never spell-corrected
    pub fn is_proper_noun(self) -> bool {
        matches!(self, Self::ProperNounSingular | Self::ProperNounPlural)
    }
}

/// A token paired with its tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub tag: PosTag,
}

/// A token the spelling corrector actually changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub from: String,
    pub to: String,
}

/// Hex MD5 of a file's contents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDigest(pub String);

impl FileDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The stem of a new filename, before the extension is appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CandidateLabel {
    /// Up to the configured maximum number of ranked words
    Words(Vec<String>),
    /// Content hash, used when too few words survive filtering
    Digest(FileDigest),
}

impl CandidateLabel {
    /// Full filename: label followed by `extension` (which includes its dot)
    pub fn file_name(&self, extension: &str) -> String {
        match self {
            Self::Words(words) => format!("{}{}", words.join(" "), extension),
            Self::Digest(digest) => format!("{}{}", digest, extension),
        }
    }

    pub fn is_digest(&self) -> bool {
        matches!(self, Self::Digest(_))
    }
}

/// How a file was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileKind {
    Image,
    Other,
}

/// One planned rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    /// Current file name (no directory)
    pub original: String,
    /// New file name (no directory)
    pub renamed: String,
    pub kind: FileKind,
    /// Words the label was built from; empty for hash-named files
    pub words: Vec<String>,
}

impl RenamePlan {
    pub fn is_noop(&self) -> bool {
        self.original == self.renamed
    }
}
