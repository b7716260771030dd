//! Configuration for the renamer and the background cleaner
//!
//! Every field has a default, so a JSON config file only needs to list the
//! values it overrides.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the similarity filter decides that a token duplicates an accepted one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimilarityPolicy {
    /// Reject long tokens, exact and stem duplicates, and anything whose
    /// matching-blocks ratio (word or stem) reaches `threshold`.
    Strict { threshold: f64 },
    /// Reject only reference-corpus stems whose normalized Levenshtein
    /// similarity to an accepted stem reaches `threshold`.
    Relaxed { threshold: f64 },
}

impl SimilarityPolicy {
    pub const STRICT_THRESHOLD: f64 = 0.80;
    pub const RELAXED_THRESHOLD: f64 = 0.95;

    pub fn strict() -> Self {
        Self::Strict {
            threshold: Self::STRICT_THRESHOLD,
        }
    }

    pub fn relaxed() -> Self {
        Self::Relaxed {
            threshold: Self::RELAXED_THRESHOLD,
        }
    }

    pub fn threshold(&self) -> f64 {
        match self {
            Self::Strict { threshold } | Self::Relaxed { threshold } => *threshold,
        }
    }
}

impl Default for SimilarityPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// Settings for one `rename` run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamerConfig {
    /// Near-duplicate rule for the similarity filter
    pub similarity: SimilarityPolicy,
    /// Skip files whose name begins with `.`
    pub skip_hidden_files: bool,
    /// Shortest token (in characters) kept after ranking
    pub min_token_len: usize,
    /// Fewer tokens than this falls back to the content hash
    pub min_label_words: usize,
    /// Most tokens used in a label
    pub max_label_words: usize,
    /// Largest edit distance the spelling dictionary searches (1 or 2)
    pub max_edit_distance: usize,
    /// Spelling correction is switched off for dictionaries smaller than this
    pub min_dictionary_words: usize,
    /// Upper bound on a single OCR call
    pub ocr_timeout_secs: u64,
    /// Read size used while hashing file contents
    pub digest_chunk_size: usize,
    /// Lowercase extensions (with the dot) treated as images
    pub image_extensions: Vec<String>,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityPolicy::default(),
            skip_hidden_files: true,
            min_token_len: 5,
            min_label_words: 2,
            max_label_words: 5,
            max_edit_distance: 2,
            min_dictionary_words: 10_000,
            ocr_timeout_secs: 120,
            digest_chunk_size: 4096,
            image_extensions: [".gif", ".png", ".jpg", ".jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RenamerConfig {
    /// Load a config from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.similarity.threshold();
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity threshold {threshold} is outside 0.0..=1.0"
            )));
        }
        if !(1..=2).contains(&self.max_edit_distance) {
            return Err(ConfigError::Invalid(format!(
                "max_edit_distance must be 1 or 2, got {}",
                self.max_edit_distance
            )));
        }
        if self.min_label_words == 0 || self.min_label_words > self.max_label_words {
            return Err(ConfigError::Invalid(format!(
                "label word bounds {}..={} need 1 <= min <= max",
                self.min_label_words, self.max_label_words
            )));
        }
        if self.digest_chunk_size == 0 {
            return Err(ConfigError::Invalid("digest_chunk_size must be positive".into()));
        }
        if self.ocr_timeout_secs == 0 {
            return Err(ConfigError::Invalid("ocr_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Whether `path` has one of the configured image extensions
    pub fn is_image(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let dotted = format!(".{}", ext.to_lowercase());
                self.image_extensions.iter().any(|e| *e == dotted)
            }
            None => false,
        }
    }
}

/// Where the linguistic resources live on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePaths {
    /// Reference word list, one word per line
    pub word_list: PathBuf,
    /// `<word> <count>` lines from the reference corpus
    pub frequency_table: PathBuf,
    /// `<word> <count>` lines used for spelling; defaults to the frequency table
    pub spelling_dictionary: Option<PathBuf>,
}

impl ResourcePaths {
    /// Standard file names inside a resource directory
    pub fn in_dir(dir: &Path) -> Self {
        let spelling = dir.join("spelling.txt");
        Self {
            word_list: dir.join("words.txt"),
            frequency_table: dir.join("frequencies.txt"),
            spelling_dictionary: spelling.is_file().then_some(spelling),
        }
    }

    pub fn spelling_path(&self) -> &Path {
        self.spelling_dictionary
            .as_deref()
            .unwrap_or(&self.frequency_table)
    }
}

/// Acceptance rule for desktop background images
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundPolicy {
    /// Minimum resolution, compared after rounding to whole megapixels
    pub min_megapixels: f64,
    /// Minimum width / height
    pub min_aspect_ratio: f64,
    /// Lowercase extensions (without the dot) that are inspected
    pub extensions: Vec<String>,
}

impl BackgroundPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_megapixels.is_finite() || self.min_megapixels < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_megapixels must be a non-negative number, got {}",
                self.min_megapixels
            )));
        }
        if !self.min_aspect_ratio.is_finite() || self.min_aspect_ratio < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_aspect_ratio must be a non-negative number, got {}",
                self.min_aspect_ratio
            )));
        }
        Ok(())
    }
}

impl Default for BackgroundPolicy {
    fn default() -> Self {
        Self {
            min_megapixels: 6.0,
            min_aspect_ratio: 4.0 / 3.0,
            extensions: ["jpg", "jpeg", "png"].iter().map(|s| s.to_string()).collect(),
        }
    }
}
