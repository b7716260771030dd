//! Error types for the naming pipeline
//!
//! Callers branch on these variants (an OCR failure degrades to hash naming,
//! a resource failure aborts the run), so they are typed rather than
//! `anyhow` errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain text from an image
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("cannot read image {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("tesseract failed on {path}: {message}")]
    Engine { path: PathBuf, message: String },

    #[error("OCR of {path} timed out after {secs}s")]
    Timeout { path: PathBuf, secs: u64 },

    #[error("OCR worker for {path} stopped: {message}")]
    Worker { path: PathBuf, message: String },
}

/// Failure to load the linguistic resources
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cannot read resource file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: expected `<word> <count>`, found {content:?}")]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("resource file {path} contains no entries")]
    Empty { path: PathBuf },
}

/// Failure to load a JSON configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}
