//! Applies rename plans to the filesystem

use core_pipeline::RenamePlan;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, warn};

/// Counts of what happened to each plan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    /// Already had the planned name
    pub unchanged: usize,
    /// Destination taken by another file
    pub skipped: usize,
    pub failed: usize,
    /// Dry-run plans that would have been applied
    pub planned: usize,
}

/// Apply `plans` inside `directory`. With `test` set nothing is moved, but the
/// same lines are written to `out` as in a verbose live run.
pub fn apply_plans<W: Write>(
    directory: &Path,
    plans: &[RenamePlan],
    test: bool,
    verbose: bool,
    out: &mut W,
) -> io::Result<RenameSummary> {
    let chatty = test || verbose;
    let mut summary = RenameSummary::default();

    for plan in plans {
        if plan.is_noop() {
            if chatty {
                writeln!(out, "No need to rename '{}', already done.", plan.original)?;
            }
            summary.unchanged += 1;
            continue;
        }

        if chatty {
            writeln!(out, "Renaming '{}' to '{}'", plan.original, plan.renamed)?;
        }
        if test {
            summary.planned += 1;
            continue;
        }

        let source = directory.join(&plan.original);
        let destination = directory.join(&plan.renamed);
        if destination.exists() {
            warn!(
                "Not renaming '{}': '{}' already exists",
                plan.original, plan.renamed
            );
            summary.skipped += 1;
            continue;
        }

        match fs::rename(&source, &destination) {
            Ok(()) => summary.renamed += 1,
            Err(e) => {
                error!(
                    "Unable to rename '{}' to '{}'",
                    source.display(),
                    destination.display()
                );
                match e.raw_os_error() {
                    Some(code) => error!("{} - {}", code, e),
                    None => error!("{}", e),
                }
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
