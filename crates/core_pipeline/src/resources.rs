//! Linguistic resources shared by every pipeline invocation
//!
//! A run loads the word list, frequency table, spelling dictionary and
//! stemmer once into a [`LinguisticContext`]. Nothing mutates it afterwards,
//! so it is handed out by reference (or `Arc`) without locking.

use crate::config::ResourcePaths;
use crate::errors::ResourceError;
use crate::tagger::tag_tokens;
use crate::types::PosTag;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Everything the pipeline asks of its linguistic resources
pub trait Lexicon: Send + Sync {
    /// Whether the spelling dictionary knows `word` (case-insensitive)
    fn contains(&self, word: &str) -> bool;

    /// Best dictionary correction for an unknown word, if any
    fn correct(&self, word: &str) -> Option<String>;

    /// Root form used to group morphological variants
    fn stem(&self, word: &str) -> String;

    /// Part-of-speech tags for a token sequence
    fn tag(&self, tokens: &[&str]) -> Vec<PosTag>;

    /// Occurrences of `word` in the reference corpus; 0 when unseen
    fn frequency(&self, word: &str) -> u64;

    /// Membership in the reference word list
    fn is_reference_word(&self, word: &str) -> bool;
}

/// Word → occurrence count from a reference corpus
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut table = HashMap::new();
        for (word, count) in counts {
            *table.entry(word.into()).or_insert(0) += count;
        }
        Self { counts: table }
    }

    /// Load `<word> <count>` lines; blank lines and `#` comments are ignored
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let table = Self::from_counts(read_counts(path)?);
        if table.is_empty() {
            return Err(ResourceError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(table)
    }

    /// Case-sensitive lookup
    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Reference vocabulary, stored lowercase
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// One word per line
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let raw = read_resource(path)?;
        let list = Self::from_words(
            raw.lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );
        if list.is_empty() {
            return Err(ResourceError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(list)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Every word, alphabetically
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Frequency-weighted dictionary that proposes corrections within a small
/// edit distance
#[derive(Debug, Clone)]
pub struct SpellDictionary {
    words: HashMap<String, u64>,
    max_distance: usize,
}

impl SpellDictionary {
    pub fn from_counts<I, S>(counts: I, max_distance: usize) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut words = HashMap::new();
        for (word, count) in counts {
            *words.entry(word.as_ref().to_lowercase()).or_insert(0) += count;
        }
        Self {
            words,
            max_distance: max_distance.clamp(1, 2),
        }
    }

    pub fn load(path: &Path, max_distance: usize) -> Result<Self, ResourceError> {
        let dictionary = Self::from_counts(read_counts(path)?, max_distance);
        if dictionary.words.is_empty() {
            return Err(ResourceError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(dictionary)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The most frequent known word closest to `word`. Known words correct to
    /// themselves; ties go to the alphabetically first candidate.
    pub fn correction(&self, word: &str) -> Option<String> {
        let word = word.to_lowercase();
        if self.words.contains_key(&word) {
            return Some(word);
        }

        let first = edits1(&word);
        if let Some(best) = self.best_known(first.iter().cloned()) {
            return Some(best);
        }
        if self.max_distance < 2 {
            return None;
        }

        self.best_known(first.iter().flat_map(|w| edits1(w)))
    }

    fn best_known<I>(&self, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut best: Option<(String, u64)> = None;
        for candidate in candidates {
            let Some(&count) = self.words.get(&candidate) else {
                continue;
            };
            let better = match &best {
                Some((current, current_count)) => {
                    count > *current_count || (count == *current_count && candidate < *current)
                }
                None => true,
            };
            if better {
                best = Some((candidate, count));
            }
        }
        best.map(|(word, _)| word)
    }
}

/// All strings one delete, transpose, replace or insert away from `word`
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut edits: Vec<String> = Vec::with_capacity(54 * n + 25);

    for i in 0..=n {
        let (left, right) = chars.split_at(i);
        if !right.is_empty() {
            edits.push(left.iter().chain(&right[1..]).collect());
        }
        if right.len() > 1 {
            edits.push(
                left.iter()
                    .chain(std::iter::once(&right[1]))
                    .chain(std::iter::once(&right[0]))
                    .chain(&right[2..])
                    .collect(),
            );
        }
        for c in ALPHABET.chars() {
            if !right.is_empty() {
                edits.push(
                    left.iter()
                        .copied()
                        .chain(std::iter::once(c))
                        .chain(right[1..].iter().copied())
                        .collect(),
                );
            }
            edits.push(
                left.iter()
                    .copied()
                    .chain(std::iter::once(c))
                    .chain(right.iter().copied())
                    .collect(),
            );
        }
    }

    edits
}

/// The process-wide bundle of resources behind the [`Lexicon`] trait
pub struct LinguisticContext {
    reference_words: WordList,
    frequencies: FrequencyTable,
    dictionary: SpellDictionary,
    stemmer: Stemmer,
    corrections_enabled: bool,
}

impl LinguisticContext {
    pub fn new(
        reference_words: WordList,
        frequencies: FrequencyTable,
        dictionary: SpellDictionary,
    ) -> Self {
        Self {
            reference_words,
            frequencies,
            dictionary,
            stemmer: Stemmer::create(Algorithm::English),
            corrections_enabled: true,
        }
    }

    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    /// Switch spelling correction off when the dictionary has fewer than
    /// `min_words` entries. A small dictionary pulls ordinary words towards
    /// whatever few words it knows. Returns whether correction stays on.
    pub fn require_full_dictionary(&mut self, min_words: usize) -> bool {
        if self.dictionary.len() < min_words {
            warn!(
                "Spelling dictionary has only {} words (need {}); spelling correction is disabled. \
                 Build full resources with `imagetools resources`.",
                self.dictionary.len(),
                min_words
            );
            self.corrections_enabled = false;
        }
        self.corrections_enabled
    }

    pub fn corrections_enabled(&self) -> bool {
        self.corrections_enabled
    }

    /// Load every resource from disk
    pub fn load(paths: &ResourcePaths, max_edit_distance: usize) -> Result<Self, ResourceError> {
        let reference_words = WordList::load(&paths.word_list)?;
        let frequencies = FrequencyTable::load(&paths.frequency_table)?;
        let dictionary = SpellDictionary::load(paths.spelling_path(), max_edit_distance)?;

        info!(
            "Loaded {} reference words, {} frequency entries, {} dictionary words",
            reference_words.len(),
            frequencies.len(),
            dictionary.len()
        );

        Ok(Self::new(reference_words, frequencies, dictionary))
    }
}

impl Lexicon for LinguisticContext {
    fn contains(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    fn correct(&self, word: &str) -> Option<String> {
        if !self.corrections_enabled {
            return None;
        }
        self.dictionary.correction(word)
    }

    fn stem(&self, word: &str) -> String {
        self.stemmer.stem(&word.to_lowercase()).into_owned()
    }

    fn tag(&self, tokens: &[&str]) -> Vec<PosTag> {
        tag_tokens(tokens, |w| self.dictionary.contains(w))
    }

    fn frequency(&self, word: &str) -> u64 {
        self.frequencies.get(word)
    }

    fn is_reference_word(&self, word: &str) -> bool {
        self.reference_words.contains(word)
    }
}

fn read_resource(path: &Path) -> Result<String, ResourceError> {
    std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_counts(path: &Path) -> Result<Vec<(String, u64)>, ResourceError> {
    let raw = read_resource(path)?;
    let mut counts = Vec::new();

    for (index, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let parsed = match (fields.next(), fields.next(), fields.next()) {
            (Some(word), Some(count), None) => count.parse::<u64>().ok().map(|c| (word, c)),
            _ => None,
        };
        let Some((word, count)) = parsed else {
            return Err(ResourceError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                content: line.to_string(),
            });
        };
        counts.push((word.to_string(), count));
    }

    Ok(counts)
}
