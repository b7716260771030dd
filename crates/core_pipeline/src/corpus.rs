//! Builds the resource files from plain-text corpora
//!
//! Feed any amount of English text (the Brown corpus as plain text, Project
//! Gutenberg books, ...) through [`CorpusCounts`] and write `words.txt`,
//! `frequencies.txt` and `spelling.txt` in the layout
//! [`ResourcePaths::in_dir`] expects.

use crate::config::ResourcePaths;
use crate::errors::ResourceError;
use crate::resources::WordList;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// Word counts gathered from one or more corpus texts
#[derive(Debug, Clone, Default)]
pub struct CorpusCounts {
    /// Counts keyed by the word as written
    cased: HashMap<String, u64>,
    /// Counts keyed by the lowercased word
    folded: HashMap<String, u64>,
    documents: usize,
}

impl CorpusCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the purely alphabetic words of `text`
    pub fn add_text(&mut self, text: &str) {
        for word in text.unicode_words() {
            if !word.chars().all(char::is_alphabetic) {
                continue;
            }
            *self.cased.entry(word.to_string()).or_insert(0) += 1;
            *self.folded.entry(word.to_lowercase()).or_insert(0) += 1;
        }
        self.documents += 1;
    }

    /// Count a text file; invalid UTF-8 is replaced, not rejected
    pub fn add_file(&mut self, path: &Path) -> Result<(), ResourceError> {
        let bytes = fs::read(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_text(&String::from_utf8_lossy(&bytes));
        Ok(())
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Distinct lowercase words seen
    pub fn distinct_words(&self) -> usize {
        self.folded.len()
    }

    /// Write the three resource files into `dir`, creating it if needed.
    ///
    /// Words seen fewer than `min_count` times are left out. `words.txt` is
    /// `reference` when given, otherwise every lowercase corpus word that
    /// made the cut.
    pub fn write_resources(
        &self,
        dir: &Path,
        reference: Option<&WordList>,
        min_count: u64,
    ) -> Result<ResourcePaths, ResourceError> {
        fs::create_dir_all(dir).map_err(|source| ResourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let frequencies = dir.join("frequencies.txt");
        let spelling = dir.join("spelling.txt");
        let words = dir.join("words.txt");

        let cased = ranked(&self.cased, min_count);
        let folded = ranked(&self.folded, min_count);

        write_lines(
            &frequencies,
            "# <word> <count>, case-sensitive",
            cased.iter().map(|(w, c)| format!("{w} {c}")),
        )?;
        write_lines(
            &spelling,
            "# <word> <count>, lowercase",
            folded.iter().map(|(w, c)| format!("{w} {c}")),
        )?;
        match reference {
            Some(list) => write_lines(
                &words,
                "# Reference word list",
                list.sorted().into_iter().map(str::to_string),
            )?,
            None => {
                let mut list: Vec<&str> = folded.iter().map(|(w, _)| *w).collect();
                list.sort_unstable();
                write_lines(
                    &words,
                    "# Reference word list",
                    list.into_iter().map(str::to_string),
                )?
            }
        }

        Ok(ResourcePaths {
            word_list: words,
            frequency_table: frequencies,
            spelling_dictionary: Some(spelling),
        })
    }
}

/// Entries with at least `min_count` occurrences, most frequent first, ties
/// alphabetical
fn ranked(counts: &HashMap<String, u64>, min_count: u64) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts
        .iter()
        .filter(|&(_, &count)| count >= min_count)
        .map(|(word, &count)| (word.as_str(), count))
        .collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

fn write_lines<I>(path: &Path, header: &str, lines: I) -> Result<(), ResourceError>
where
    I: IntoIterator<Item = String>,
{
    let io_error = |source: std::io::Error| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{header}").map_err(io_error)?;
    for line in lines {
        writeln!(out, "{line}").map_err(io_error)?;
    }
    out.flush().map_err(io_error)
}
