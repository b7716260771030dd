//! Part-of-speech tagging, reduced to what the spelling corrector needs
//!
//! The only distinction that matters downstream is proper noun versus
//! everything else, so the tagger works from capitalization and sentence
//! position rather than a trained model:
//! - tokens without letters are `Other`
//! - lowercase tokens are `Word`
//! - all-caps tokens of two or more letters are proper nouns
//! - a capitalized token that opens a sentence is a `Word` when its lowercase
//!   form is a known word, otherwise a proper noun
//! - any other capitalized token is a proper noun
//!
//! Proper nouns ending in a single `s` are tagged plural.

use crate::types::PosTag;

/// Tag `tokens` in order. `is_known` answers dictionary membership for a
/// lowercase word.
pub fn tag_tokens<F>(tokens: &[&str], is_known: F) -> Vec<PosTag>
where
    F: Fn(&str) -> bool,
{
    let mut tags = Vec::with_capacity(tokens.len());
    let mut sentence_start = true;

    for token in tokens {
        let tag = tag_one(token, sentence_start, &is_known);
        sentence_start = ends_sentence(token);
        tags.push(tag);
    }

    tags
}

fn tag_one<F>(token: &str, sentence_start: bool, is_known: &F) -> PosTag
where
    F: Fn(&str) -> bool,
{
    let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return PosTag::Other;
    }

    let first_upper = token.chars().next().is_some_and(char::is_uppercase);
    if !first_upper {
        return PosTag::Word;
    }

    let all_caps = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
    if !all_caps && sentence_start && is_known(&token.to_lowercase()) {
        return PosTag::Word;
    }

    if token.ends_with('s') && !token.ends_with("ss") && letters.len() > 3 {
        PosTag::ProperNounPlural
    } else {
        PosTag::ProperNounSingular
    }
}

fn ends_sentence(token: &str) -> bool {
    matches!(token, "." | "!" | "?")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(word: &str) -> bool {
        matches!(word, "the" | "is" | "real" | "thing" | "hello")
    }

    #[test]
    fn test_tag_brand_names() {
        let tokens = ["Coca", "Cola", "is", "the", "Real", "Thing"];
        let tags = tag_tokens(&tokens, known);
        assert_eq!(
            tags,
            vec![
                PosTag::ProperNounSingular,
                PosTag::ProperNounSingular,
                PosTag::Word,
                PosTag::Word,
                PosTag::ProperNounSingular,
                PosTag::ProperNounSingular,
            ]
        );
    }

    #[test]
    fn test_sentence_initial_known_word_is_not_proper() {
        let tokens = ["Hello", "there", ".", "Hello", "Hello"];
        let tags = tag_tokens(&tokens, known);
        assert_eq!(tags[0], PosTag::Word);
        assert_eq!(tags[2], PosTag::Other);
        assert_eq!(tags[3], PosTag::Word);
        assert_eq!(tags[4], PosTag::ProperNounSingular);
    }

    #[test]
    fn test_all_caps_and_plurals() {
        let tokens = ["NASA", "Smiths", "Glass", "42", ","];
        let tags = tag_tokens(&tokens, known);
        assert_eq!(tags[0], PosTag::ProperNounSingular);
        assert_eq!(tags[1], PosTag::ProperNounPlural);
        assert_eq!(tags[2], PosTag::ProperNounSingular);
        assert_eq!(tags[3], PosTag::Other);
        assert_eq!(tags[4], PosTag::Other);
    }

    #[test]
    fn test_empty_input() {
        assert!(tag_tokens(&[], known).is_empty());
    }
}
