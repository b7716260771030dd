//! `backgrounds` subcommand: delete images too small or too narrow to be
//! desktop backgrounds. Non-image files are never touched.

use crate::listing::list_files;
use anyhow::{bail, Result};
use core_pipeline::BackgroundPolicy;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub inspected: usize,
    pub rejected: usize,
    pub deleted: usize,
}

pub fn clean_backgrounds(
    directory: &Path,
    policy: &BackgroundPolicy,
    test: bool,
) -> Result<CleanSummary> {
    if !directory.exists() {
        bail!("Directory {} does not exist.", directory.display());
    }
    if !directory.is_dir() {
        bail!("{} is not a directory.", directory.display());
    }

    let candidates: Vec<_> = list_files(directory)?
        .into_iter()
        .filter(|p| policy.is_candidate(p))
        .collect();

    let mut summary = CleanSummary {
        inspected: candidates.len(),
        ..Default::default()
    };
    if candidates.is_empty() {
        println!("Did not find any image files.");
        return Ok(summary);
    }
    println!("Found {} files to look at.", candidates.len());

    let rejected: Vec<_> = candidates
        .iter()
        .map(|p| policy.inspect(p))
        .filter(|v| !v.keep)
        .collect();
    summary.rejected = rejected.len();

    if rejected.is_empty() {
        println!("Found nothing to delete.");
        return Ok(summary);
    }

    for verdict in &rejected {
        if let Some((w, h)) = verdict.dimensions {
            debug!("{} is {}x{}", verdict.path.display(), w, h);
        }
        if test {
            println!("Would delete {}", verdict.path.display());
            continue;
        }
        match fs::remove_file(&verdict.path) {
            Ok(()) => summary.deleted += 1,
            Err(e) => warn!("Cannot delete {}: {}", verdict.path.display(), e),
        }
    }

    if test {
        println!("Would delete {} files.", summary.rejected);
    } else {
        println!("Deleted {} files.", summary.deleted);
    }
    Ok(summary)
}
