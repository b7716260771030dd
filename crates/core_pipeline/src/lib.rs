//! Core pipeline for imagetools
//!
//! Turns the text found in an image into a short, filesystem-safe name:
//! OCR text is spell-corrected (proper nouns are left alone), ranked so the
//! rarest words come first, stripped of near-duplicates and truncated into a
//! label. When too few words survive, the file's MD5 is used instead.

pub mod backgrounds;
pub mod config;
pub mod corpus;
pub mod digest;
pub mod errors;
pub mod label;
pub mod ocr;
pub mod pipeline;
pub mod rank;
pub mod resources;
pub mod similarity;
pub mod spelling;
pub mod tagger;
pub mod types;

pub use config::{BackgroundPolicy, RenamerConfig, ResourcePaths, SimilarityPolicy};
pub use corpus::CorpusCounts;
pub use errors::{ConfigError, OcrError, ResourceError};
pub use pipeline::{ExtractedWords, NamingPipeline};
pub use resources::{Lexicon, LinguisticContext};
pub use types::*;
