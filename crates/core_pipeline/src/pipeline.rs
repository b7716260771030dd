//! The word pipeline for one OCR result
//!
//! raw text → spelling correction → frequency ranking → alphabetic/length
//! filter → similarity filter → label

use crate::config::RenamerConfig;
use crate::label::{select_label, LabelBounds};
use crate::rank::sort_by_frequency;
use crate::resources::Lexicon;
use crate::similarity::filter_similar;
use crate::spelling::correct_spelling;
use crate::types::{CandidateLabel, Correction, FileDigest};
use std::sync::Arc;

/// Words selected from one image, with the corrections made on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedWords {
    pub words: Vec<String>,
    pub corrections: Vec<Correction>,
}

/// OCR output with line breaks flattened to spaces
pub fn normalize_ocr_text(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ")
}

/// Shared, read-only pipeline state for a run
#[derive(Clone)]
pub struct NamingPipeline {
    lexicon: Arc<dyn Lexicon>,
    config: RenamerConfig,
}

impl NamingPipeline {
    pub fn new(lexicon: Arc<dyn Lexicon>, config: RenamerConfig) -> Self {
        Self { lexicon, config }
    }

    pub fn config(&self) -> &RenamerConfig {
        &self.config
    }

    pub fn bounds(&self) -> LabelBounds {
        LabelBounds {
            min_words: self.config.min_label_words,
            max_words: self.config.max_label_words,
        }
    }

    /// Run the word stages on raw OCR text
    pub fn extract_words(&self, raw: &str) -> ExtractedWords {
        let text = normalize_ocr_text(raw);
        if text.trim().is_empty() {
            return ExtractedWords::default();
        }

        let corrected = correct_spelling(&text, self.lexicon.as_ref());
        let mut tokens: Vec<&str> = corrected.text.split_whitespace().collect();
        sort_by_frequency(&mut tokens, self.lexicon.as_ref());

        let candidates: Vec<String> = tokens
            .into_iter()
            .filter(|token| is_label_word(token, self.config.min_token_len))
            .map(str::to_lowercase)
            .collect();

        ExtractedWords {
            words: filter_similar(&candidates, self.config.similarity, self.lexicon.as_ref()),
            corrections: corrected.corrections,
        }
    }

    /// Choose the label for already-extracted words
    pub fn label<F, E>(&self, words: &[String], digest: F) -> Result<CandidateLabel, E>
    where
        F: FnOnce() -> Result<FileDigest, E>,
    {
        select_label(words, self.bounds(), digest)
    }
}

/// Purely alphabetic and at least `min_len` characters long
fn is_label_word(token: &str, min_len: usize) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic) && token.chars().count() >= min_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResourcePaths, SimilarityPolicy};
    use crate::resources::{FrequencyTable, LinguisticContext, SpellDictionary, WordList};
    use std::convert::Infallible;

    const HASH: &str = "00112233445566778899aabbccddeeff";

    fn pipeline(config: RenamerConfig) -> NamingPipeline {
        let counts = [
            ("the", 69971u64),
            ("is", 10099),
            ("real", 241),
            ("thing", 333),
            ("coca", 2),
            ("cola", 5),
            ("great", 665),
            ("pizza", 3),
            ("party", 216),
            ("tonight", 40),
            ("friday", 60),
            ("delicious", 30),
            ("planet", 21),
            ("planets", 9),
        ];
        let context = LinguisticContext::new(
            WordList::from_words(counts.iter().map(|(w, _)| *w)),
            FrequencyTable::from_counts(counts),
            SpellDictionary::from_counts(counts, 2),
        );
        NamingPipeline::new(Arc::new(context), config)
    }

    fn digest() -> Result<FileDigest, Infallible> {
        Ok(FileDigest(HASH.into()))
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_ocr_text("one\ntwo\r\nthree"), "one two  three");
    }

    #[test]
    fn test_coca_cola_falls_back_to_hash() {
        // only "Thing" is alphabetic and five letters long
        let p = pipeline(RenamerConfig::default());
        let extracted = p.extract_words("Coca Cola is the Real Thing");
        assert_eq!(extracted.words, vec!["thing".to_string()]);

        let label = p.label(&extracted.words, digest).unwrap();
        assert_eq!(label.file_name(".jpg"), format!("{HASH}.jpg"));
    }

    #[test]
    fn test_empty_text_falls_back_to_hash() {
        let p = pipeline(RenamerConfig::default());
        for raw in ["", "   \n\n  "] {
            let extracted = p.extract_words(raw);
            assert!(extracted.words.is_empty());
            let label = p.label(&extracted.words, digest).unwrap();
            assert_eq!(label.file_name(".png"), format!("{HASH}.png"));
        }
    }

    #[test]
    fn test_words_ranked_rarest_first() {
        let p = pipeline(RenamerConfig::default());
        let extracted = p.extract_words("GREAT pizza party\ntonight, Friday!");
        // GREAT is all caps, so it is kept verbatim and then lowercased;
        // Friday is a proper noun; ranking uses the corrected tokens
        assert_eq!(
            extracted.words,
            vec!["great", "friday", "pizza", "tonight", "party"]
        );
        let label = p.label(&extracted.words, digest).unwrap();
        assert_eq!(label.file_name(".jpg"), "great friday pizza tonight party.jpg");
    }

    #[test]
    fn test_misspellings_are_corrected_before_ranking() {
        let p = pipeline(RenamerConfig::default());
        let extracted = p.extract_words("the pizzza is delicous tonigt");
        assert_eq!(extracted.words, vec!["pizza", "delicious", "tonight"]);
        assert_eq!(extracted.corrections.len(), 3);
    }

    #[test]
    fn test_similar_words_removed() {
        let p = pipeline(RenamerConfig::default());
        // ranked: pizza (3), planets (9), planet (21); planet shares a stem
        let extracted = p.extract_words("planets planet pizza");
        assert_eq!(extracted.words, vec!["pizza", "planets"]);
    }

    #[test]
    fn test_label_never_exceeds_max_words() {
        let p = pipeline(RenamerConfig::default());
        let extracted = p.extract_words("zebra mango lemon tiger piano walrus ocean robin");
        assert_eq!(extracted.words.len(), 8);
        match p.label(&extracted.words, digest).unwrap() {
            CandidateLabel::Words(words) => {
                assert_eq!(words, vec!["zebra", "mango", "lemon", "tiger", "piano"])
            }
            other => panic!("expected words, got {other:?}"),
        }
    }

    #[test]
    fn test_bundled_sample_leaves_words_uncorrected() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../resources");
        let config = RenamerConfig::default();
        let mut context =
            LinguisticContext::load(&ResourcePaths::in_dir(&dir), config.max_edit_distance)
                .unwrap();
        context.require_full_dictionary(config.min_dictionary_words);

        let p = NamingPipeline::new(Arc::new(context), config);
        let extracted = p.extract_words("water bottle lower prices");
        assert!(extracted.corrections.is_empty());
        assert_eq!(extracted.words, vec!["water", "bottle", "lower", "prices"]);
    }

    #[test]
    fn test_deterministic() {
        let p = pipeline(RenamerConfig {
            similarity: SimilarityPolicy::relaxed(),
            ..Default::default()
        });
        let text = "Sprocket wombat gadget\nsprockets planet planets";
        let first = p.extract_words(text);
        let second = p.extract_words(text);
        assert_eq!(first, second);
        assert_eq!(
            p.label(&first.words, digest).unwrap(),
            p.label(&second.words, digest).unwrap()
        );
    }
}
