//! `resources` subcommand: build `words.txt`, `frequencies.txt` and
//! `spelling.txt` from plain-text corpus files

use crate::listing::is_hidden;
use anyhow::{bail, Context, Result};
use core_pipeline::resources::WordList;
use core_pipeline::{CorpusCounts, ResourcePaths};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Every corpus file named by `paths`. Directories are walked recursively,
/// hidden files are skipped.
pub fn corpus_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("Corpus path {} does not exist.", path.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && !is_hidden(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

pub fn build_resources<W: Write>(
    corpus: &[PathBuf],
    word_list: Option<&Path>,
    output: &Path,
    min_count: u64,
    out: &mut W,
) -> Result<ResourcePaths> {
    let files = corpus_files(corpus)?;
    if files.is_empty() {
        bail!("No corpus files found.");
    }

    let mut counts = CorpusCounts::new();
    for file in &files {
        debug!("Counting words in {}", file.display());
        counts.add_file(file)?;
    }

    let reference = word_list
        .map(WordList::load)
        .transpose()
        .context("Failed to load the reference word list")?;
    let paths = counts
        .write_resources(output, reference.as_ref(), min_count)
        .with_context(|| format!("Failed to write resources to {}", output.display()))?;

    writeln!(
        out,
        "Read {} corpus files, {} distinct words.",
        counts.documents(),
        counts.distinct_words()
    )?;
    writeln!(
        out,
        "Wrote {}, {} and {}.",
        paths.word_list.display(),
        paths.frequency_table.display(),
        paths.spelling_path().display()
    )?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_pipeline::{Lexicon, LinguisticContext};
    use std::fs;
    use std::io;

    #[test]
    fn test_corpus_files_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir_all(corpus.join("part2")).unwrap();
        fs::write(corpus.join("b.txt"), "b").unwrap();
        fs::write(corpus.join("part2").join("a.txt"), "a").unwrap();
        fs::write(corpus.join(".hidden"), "h").unwrap();
        let single = dir.path().join("single.txt");
        fs::write(&single, "s").unwrap();

        let files = corpus_files(&[single.clone(), corpus.clone()]).unwrap();
        assert_eq!(
            files,
            vec![single, corpus.join("b.txt"), corpus.join("part2").join("a.txt")]
        );
    }

    #[test]
    fn test_missing_corpus_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(corpus_files(&[dir.path().join("nope")]).is_err());

        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        let result = build_resources(&[empty], None, dir.path(), 1, &mut io::sink());
        assert!(result.is_err());
    }

    #[test]
    fn test_build_resources_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        fs::write(corpus.join("one.txt"), "Lower prices on water today.").unwrap();
        fs::write(corpus.join("two.txt"), "Drink water from the bottle.").unwrap();
        let words = dir.path().join("dict");
        fs::write(&words, "water\nbottle\nprices\nlower\n").unwrap();

        let output = dir.path().join("resources");
        let mut out = Vec::new();
        build_resources(&[corpus], Some(&words), &output, 1, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Read 2 corpus files, 9 distinct words."));

        let context = LinguisticContext::load(&ResourcePaths::in_dir(&output), 2).unwrap();
        assert_eq!(context.frequency("water"), 2);
        assert!(context.is_reference_word("bottle"));
        assert!(!context.is_reference_word("drink"));
        assert_eq!(context.correct("watr").as_deref(), Some("water"));
    }
}
