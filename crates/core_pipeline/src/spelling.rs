//! Spelling correction with proper-noun preservation

use crate::resources::Lexicon;
use crate::types::{Correction, TaggedToken};
use unicode_segmentation::UnicodeSegmentation;

/// Corrected text plus the tokens that actually changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectedText {
    pub text: String,
    pub corrections: Vec<Correction>,
}

/// Split text into words and punctuation, dropping whitespace
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .filter(|t| !t.trim().is_empty())
        .collect()
}

/// Tokenize and tag `text`
pub fn tag_text<L: Lexicon + ?Sized>(text: &str, lexicon: &L) -> Vec<TaggedToken> {
    let tokens = tokenize(text);
    let tags = lexicon.tag(&tokens);
    tokens
        .into_iter()
        .zip(tags)
        .map(|(text, tag)| TaggedToken {
            text: text.to_string(),
            tag,
        })
        .collect()
}

/// Correct every token that is neither a proper noun nor a known word
pub fn correct_spelling<L: Lexicon + ?Sized>(text: &str, lexicon: &L) -> CorrectedText {
    let mut words = Vec::new();
    let mut corrections = Vec::new();

    for token in tag_text(text, lexicon) {
        if token.tag.is_proper_noun() || !token.text.chars().any(char::is_alphabetic) {
            words.push(token.text);
            continue;
        }

        if lexicon.contains(&token.text) {
            words.push(token.text);
            continue;
        }

        let corrected = lexicon
            .correct(&token.text)
            .unwrap_or_else(|| token.text.clone());
        if corrected != token.text {
            corrections.push(Correction {
                from: token.text,
                to: corrected.clone(),
            });
        }
        words.push(corrected);
    }

    CorrectedText {
        text: words.join(" "),
        corrections,
    }
}
