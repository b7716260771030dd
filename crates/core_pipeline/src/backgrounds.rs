//! Background image screening
//!
//! Decides whether an image is big enough and wide enough to be used as a
//! desktop background. Only the header is read to get the dimensions.

use crate::config::BackgroundPolicy;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of inspecting one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundVerdict {
    pub path: PathBuf,
    /// `None` when the dimensions could not be read
    pub dimensions: Option<(u32, u32)>,
    pub keep: bool,
}

/// Resolution in whole megapixels, rounding halves to even
pub fn megapixels(width: u32, height: u32) -> f64 {
    (f64::from(width) * f64::from(height) / 1_000_000.0).round_ties_even()
}

impl BackgroundPolicy {
    /// Whether an image of this size is an acceptable background
    pub fn accepts(&self, width: u32, height: u32) -> bool {
        if height == 0 {
            return false;
        }
        let aspect = f64::from(width) / f64::from(height);
        megapixels(width, height) >= self.min_megapixels && aspect >= self.min_aspect_ratio
    }

    /// Whether `path` has an extension this policy inspects
    pub fn is_candidate(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e))
    }

    /// Read the image dimensions and judge them. Unreadable images are kept.
    pub fn inspect(&self, path: &Path) -> BackgroundVerdict {
        match image::image_dimensions(path) {
            Ok((width, height)) => BackgroundVerdict {
                path: path.to_path_buf(),
                dimensions: Some((width, height)),
                keep: self.accepts(width, height),
            },
            Err(e) => {
                debug!("Keeping {}: cannot read dimensions: {}", path.display(), e);
                BackgroundVerdict {
                    path: path.to_path_buf(),
                    dimensions: None,
                    keep: true,
                }
            }
        }
    }
}
