//! OCR module
//!
//! Extracts text from image files using Tesseract (via leptess). The
//! pipeline only depends on the [`TextExtractor`] trait, so tests and other
//! engines can stand in for Tesseract.

use crate::errors::OcrError;
use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageError};
use leptess::LepTess;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Anything that can turn an image file into text
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, OcrError>;
}

/// Tesseract-backed extractor
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    /// Tesseract language code
    pub language: String,
    /// Directory holding `tessdata`; `None` uses Tesseract's default
    pub data_path: Option<String>,
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            data_path: None,
        }
    }
}

impl TextExtractor for TesseractExtractor {
    fn extract(&self, path: &Path) -> Result<String, OcrError> {
        let image = image::open(path).map_err(|source| match source {
            ImageError::IoError(source) => OcrError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
            source => OcrError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let gray = preprocess_image(&image);
        extract_text_tesseract(&gray, &self.language, self.data_path.as_deref()).map_err(|e| {
            OcrError::Engine {
                path: path.to_path_buf(),
                message: format!("{e:#}"),
            }
        })
    }
}

/// Prepare a decoded image for Tesseract
pub fn preprocess_image(input: &DynamicImage) -> GrayImage {
    input.to_luma8()
}

/// Extract text from an image using Tesseract OCR
///
/// # Errors
/// * Returns error if Tesseract is not installed or OCR fails
pub fn extract_text_tesseract(
    input: &GrayImage,
    language: &str,
    data_path: Option<&str>,
) -> Result<String> {
    let mut tesseract = LepTess::new(data_path, language)
        .context("Failed to initialize Tesseract. Is Tesseract installed?")?;

    // leptess wants an encoded image, not raw pixels
    let mut png_bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut png_bytes);
    input
        .write_to(&mut cursor, image::ImageFormat::Png)
        .context("Failed to encode image as PNG")?;

    tesseract
        .set_image_from_mem(&png_bytes)
        .context("Failed to load image into Tesseract")?;

    let text = tesseract
        .get_utf8_text()
        .context("Failed to extract text from image")?;

    Ok(text)
}

/// Run `extractor` on a blocking worker, giving up after `timeout`.
///
/// A timed-out worker is abandoned, not killed; the caller moves on and the
/// result is discarded when it eventually arrives.
pub async fn extract_with_timeout(
    extractor: Arc<dyn TextExtractor>,
    path: PathBuf,
    timeout: Duration,
) -> Result<String, OcrError> {
    let worker_path = path.clone();
    let task = tokio::task::spawn_blocking(move || extractor.extract(&worker_path));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(OcrError::Worker {
            path,
            message: join_error.to_string(),
        }),
        Err(_) => Err(OcrError::Timeout {
            path,
            secs: timeout.as_secs(),
        }),
    }
}
