//! Rename planning
//!
//! Every file gets its new name decided before anything is renamed, so a
//! digest computed late in the run never sees a file that was already moved.
//! User-facing lines go to the writer passed in, which is stdout in the
//! binary; dry and live runs print the same plan lines.

use crate::listing::{dotted_extension, file_name, inaccessible_reason, is_hidden, list_files};
use anyhow::{Context, Result};
use core_pipeline::digest::digest_file;
use core_pipeline::ocr::{extract_with_timeout, TextExtractor};
use core_pipeline::pipeline::normalize_ocr_text;
use core_pipeline::{CandidateLabel, FileKind, NamingPipeline, RenamePlan};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Flags that change what planning prints and writes
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Dry run: nothing on disk changes
    pub test: bool,
    pub verbose: bool,
    /// Side log of raw OCR text, one line per image
    pub output_text: Option<PathBuf>,
}

impl PlanOptions {
    fn chatty(&self) -> bool {
        self.verbose || self.test
    }
}

/// Image and non-image files of a directory
#[derive(Debug, Default)]
pub struct FileListing {
    pub images: Vec<PathBuf>,
    pub others: Vec<PathBuf>,
}

/// Append-only log of raw OCR text
pub struct TextLog {
    path: PathBuf,
}

impl TextLog {
    /// Create or truncate the log file
    pub fn create(path: &Path) -> Result<Self> {
        File::create(path).with_context(|| format!("Cannot initialize {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        writeln!(file, "{line}")
    }
}

pub struct Planner {
    pipeline: NamingPipeline,
    extractor: Arc<dyn TextExtractor>,
    options: PlanOptions,
    text_log: Option<TextLog>,
}

impl Planner {
    pub fn new(
        pipeline: NamingPipeline,
        extractor: Arc<dyn TextExtractor>,
        options: PlanOptions,
    ) -> Result<Self> {
        // the side log is never touched in a dry run
        let text_log = match (&options.output_text, options.test) {
            (Some(path), false) => {
                println!("Initializing the file '{}'.", path.display());
                Some(TextLog::create(path)?)
            }
            _ => None,
        };

        Ok(Self {
            pipeline,
            extractor,
            options,
            text_log,
        })
    }

    /// Split the directory into images and everything else
    pub fn scan(&self, directory: &Path) -> Result<FileListing> {
        let config = self.pipeline.config();
        let mut listing = FileListing::default();

        for path in list_files(directory)? {
            if config.skip_hidden_files && is_hidden(&path) {
                debug!("Skipping hidden file {}", path.display());
                continue;
            }
            if config.is_image(&path) {
                listing.images.push(path);
            } else {
                listing.others.push(path);
            }
        }

        Ok(listing)
    }

    /// Plan renames for every file in `directory`
    pub async fn plan_directory<W: Write>(
        &self,
        directory: &Path,
        out: &mut W,
    ) -> Result<Vec<RenamePlan>> {
        let listing = self.scan(directory)?;
        if self.options.chatty() {
            writeln!(
                out,
                "Found {} image files and {} non-image files in '{}'.",
                listing.images.len(),
                listing.others.len(),
                directory.display()
            )?;
        }

        let mut plans = Vec::new();

        writeln!(out, "Planning rename of non-image files to MD5 hashes...")?;
        for path in &listing.others {
            if let Some(plan) = self.plan_other(path, out)? {
                plans.push(plan);
            }
        }

        writeln!(
            out,
            "Planning rename of image files, if no image text can be found images will be renamed to MD5 hash..."
        )?;
        for path in &listing.images {
            if let Some(plan) = self.plan_image(path, out).await? {
                plans.push(plan);
            }
        }

        Ok(plans)
    }

    /// Non-image files are always named by their digest
    pub fn plan_other<W: Write>(&self, path: &Path, out: &mut W) -> Result<Option<RenamePlan>> {
        let Some(name) = self.usable_name(path) else {
            return Ok(None);
        };
        let Some(label) = self.digest_label(path, &name) else {
            return Ok(None);
        };
        let plan = RenamePlan {
            renamed: label.file_name(&dotted_extension(path)),
            original: name,
            kind: FileKind::Other,
            words: Vec::new(),
        };
        self.announce(&plan, out)?;
        Ok(Some(plan))
    }

    /// Images are named by their words, or by digest when too few survive
    pub async fn plan_image<W: Write>(
        &self,
        path: &Path,
        out: &mut W,
    ) -> Result<Option<RenamePlan>> {
        let Some(name) = self.usable_name(path) else {
            return Ok(None);
        };
        let words = self.image_words(path, &name, out).await?;

        let chunk_size = self.pipeline.config().digest_chunk_size;
        let label = match self.pipeline.label(&words, || digest_file(path, chunk_size)) {
            Ok(label) => label,
            Err(e) => {
                error!("Cannot hash {}: {}", name, e);
                return Ok(None);
            }
        };

        let plan = RenamePlan {
            renamed: label.file_name(&dotted_extension(path)),
            original: name,
            kind: FileKind::Image,
            words,
        };
        self.announce(&plan, out)?;
        if self.options.chatty() {
            writeln!(out)?;
        }
        Ok(Some(plan))
    }

    async fn image_words<W: Write>(
        &self,
        path: &Path,
        name: &str,
        out: &mut W,
    ) -> Result<Vec<String>> {
        let timeout = Duration::from_secs(self.pipeline.config().ocr_timeout_secs);
        let extractor = self.extractor.clone();
        let raw = match extract_with_timeout(extractor, path.to_path_buf(), timeout).await {
            Ok(text) => normalize_ocr_text(&text),
            Err(e) => {
                warn!("Unexpected error processing image {}: {}", name, e);
                return Ok(Vec::new());
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            warn!("No text found in image: {}", name);
            return Ok(Vec::new());
        }

        if let Some(log) = &self.text_log {
            if let Err(e) = log.append(trimmed) {
                warn!("Cannot write OCR text to {}: {}", log.path.display(), e);
            }
        }

        let extracted = self.pipeline.extract_words(&raw);
        if self.options.chatty() {
            for correction in &extracted.corrections {
                writeln!(out, "Corrected {} to {}.", correction.from, correction.to)?;
            }
            writeln!(out, "Raw OCRed Text from {}:", name)?;
            writeln!(out, "{}", wrap_text(&raw, terminal_width()))?;
            writeln!(out)?;
        }

        Ok(extracted.words)
    }

    fn usable_name(&self, path: &Path) -> Option<String> {
        let Some(name) = file_name(path) else {
            warn!("Skipping {}: file name is not valid UTF-8", path.display());
            return None;
        };
        if let Some(reason) = inaccessible_reason(path) {
            warn!("File {} cannot be processed: {}", name, reason);
            return None;
        }
        Some(name.to_string())
    }

    fn digest_label(&self, path: &Path, name: &str) -> Option<CandidateLabel> {
        let chunk_size = self.pipeline.config().digest_chunk_size;
        match digest_file(path, chunk_size) {
            Ok(digest) => Some(CandidateLabel::Digest(digest)),
            Err(e) => {
                error!("Cannot hash {}: {}", name, e);
                None
            }
        }
    }

    fn announce<W: Write>(&self, plan: &RenamePlan, out: &mut W) -> std::io::Result<()> {
        if self.options.chatty() {
            writeln!(out, "Planning to rename {} -> {}.", plan.original, plan.renamed)?;
        }
        Ok(())
    }
}

/// Width from `COLUMNS`, else 80
fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .filter(|&w: &usize| w > 0)
        .unwrap_or(80)
}

/// Greedy word wrap; words longer than `width` get a line of their own
fn wrap_text(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core_pipeline::resources::{FrequencyTable, SpellDictionary, WordList};
    use core_pipeline::{LinguisticContext, OcrError, RenamerConfig};
    use crate::renamer::apply_plans;
    use std::collections::HashMap;
    use std::fs;
    use std::io;

    /// Returns canned text per file name; unknown files fail like a bad image
    pub(crate) struct CannedExtractor(pub HashMap<String, String>);

    impl TextExtractor for CannedExtractor {
        fn extract(&self, path: &Path) -> Result<String, OcrError> {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            self.0.get(name).cloned().ok_or_else(|| OcrError::Engine {
                path: path.to_path_buf(),
                message: "no text fixture".to_string(),
            })
        }
    }

    pub(crate) fn pipeline() -> NamingPipeline {
        let counts = [
            ("the", 69971u64),
            ("is", 10099),
            ("great", 665),
            ("pizza", 3),
            ("party", 216),
            ("tonight", 40),
        ];
        let context = LinguisticContext::new(
            WordList::from_words(counts.iter().map(|(w, _)| *w)),
            FrequencyTable::from_counts(counts),
            SpellDictionary::from_counts(counts, 2),
        );
        NamingPipeline::new(Arc::new(context), RenamerConfig::default())
    }

    pub(crate) fn planner(texts: &[(&str, &str)], options: PlanOptions) -> Planner {
        let canned = texts
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Planner::new(pipeline(), Arc::new(CannedExtractor(canned)), options).unwrap()
    }

    fn is_hash_name(name: &str, extension: &str) -> bool {
        let Some(stem) = name.strip_suffix(extension) else {
            return false;
        };
        stem.len() == 32 && stem.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[tokio::test]
    async fn test_image_with_words() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("IMG_0001.jpg"), "jpeg bytes").unwrap();

        let p = planner(
            &[("IMG_0001.jpg", "great pizza party\ntonight")],
            PlanOptions::default(),
        );
        let plans = p.plan_directory(dir.path(), &mut io::sink()).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].original, "IMG_0001.jpg");
        assert_eq!(plans[0].renamed, "pizza tonight party great.jpg");
        assert_eq!(plans[0].kind, FileKind::Image);
    }

    #[tokio::test]
    async fn test_image_without_text_uses_hash() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blank.png"), "png bytes").unwrap();
        fs::write(dir.path().join("broken.png"), "png bytes").unwrap();

        // broken.png has no fixture, so OCR fails
        let p = planner(&[("blank.png", "  \n ")], PlanOptions::default());
        let plans = p.plan_directory(dir.path(), &mut io::sink()).await.unwrap();
        assert_eq!(plans.len(), 2);
        for plan in &plans {
            assert!(is_hash_name(&plan.renamed, ".png"), "{}", plan.renamed);
            assert!(plan.words.is_empty());
        }
        // identical contents, identical digests
        assert_eq!(plans[0].renamed, plans[1].renamed);
    }

    #[tokio::test]
    async fn test_non_image_uses_hash() {
        let dir = tempfile::tempdir().unwrap();
        let text = "The quick brown fox jumps over the lazy dog";
        fs::write(dir.path().join("notes.txt"), text).unwrap();

        let p = planner(&[], PlanOptions::default());
        let plans = p.plan_directory(dir.path(), &mut io::sink()).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].renamed, "9e107d9d372bb6826bd81d3542a419d6.txt");
        assert_eq!(plans[0].kind, FileKind::Other);
    }

    #[tokio::test]
    async fn test_hidden_and_empty_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".DS_Store"), "junk").unwrap();
        fs::write(dir.path().join("empty.jpg"), "").unwrap();

        let p = planner(&[("empty.jpg", "great pizza party")], PlanOptions::default());
        let plans = p.plan_directory(dir.path(), &mut io::sink()).await.unwrap();
        assert!(plans.is_empty());
    }

    #[tokio::test]
    async fn test_hidden_files_planned_when_not_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".hidden.txt"), "data").unwrap();

        let mut config = RenamerConfig::default();
        config.skip_hidden_files = false;
        let context = LinguisticContext::new(
            WordList::from_words(["word"]),
            FrequencyTable::from_counts([("word", 1u64)]),
            SpellDictionary::from_counts([("word", 1u64)], 1),
        );
        let p = Planner::new(
            NamingPipeline::new(Arc::new(context), config),
            Arc::new(CannedExtractor(HashMap::new())),
            PlanOptions::default(),
        )
        .unwrap();

        let plans = p.plan_directory(dir.path(), &mut io::sink()).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert!(is_hash_name(&plans[0].renamed, ".txt"));
    }

    #[tokio::test]
    async fn test_text_log_written_unless_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        fs::write(images.join("a.gif"), "gif bytes").unwrap();
        let log = dir.path().join("ocr.txt");

        let live = planner(
            &[("a.gif", "  great pizza\nparty  ")],
            PlanOptions {
                output_text: Some(log.clone()),
                ..Default::default()
            },
        );
        live.plan_directory(&images, &mut io::sink()).await.unwrap();
        assert_eq!(fs::read_to_string(&log).unwrap(), "great pizza party\n");

        fs::remove_file(&log).unwrap();
        let dry = planner(
            &[("a.gif", "great pizza party")],
            PlanOptions {
                test: true,
                output_text: Some(log.clone()),
                ..Default::default()
            },
        );
        dry.plan_directory(&images, &mut io::sink()).await.unwrap();
        assert!(!log.exists());
    }

    fn plan_lines(output: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(output)
            .lines()
            .filter(|l| l.starts_with("Planning to rename ") || l.starts_with("Renaming '"))
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_dry_run_prints_the_live_plan() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("IMG_0001.jpg"), "jpeg bytes").unwrap();
        fs::write(dir.path().join("blank.png"), "png bytes").unwrap();
        fs::write(dir.path().join("notes.txt"), "some notes").unwrap();
        let texts = [("IMG_0001.jpg", "great pizza party\ntonight"), ("blank.png", "")];

        let dry = planner(
            &texts,
            PlanOptions {
                test: true,
                ..Default::default()
            },
        );
        let mut dry_out = Vec::new();
        let plans = dry.plan_directory(dir.path(), &mut dry_out).await.unwrap();
        let summary = apply_plans(dir.path(), &plans, true, false, &mut dry_out).unwrap();
        assert_eq!(summary.planned, 3);
        assert!(dir.path().join("IMG_0001.jpg").exists());

        let live = planner(
            &texts,
            PlanOptions {
                verbose: true,
                ..Default::default()
            },
        );
        let mut live_out = Vec::new();
        let plans = live.plan_directory(dir.path(), &mut live_out).await.unwrap();
        let summary = apply_plans(dir.path(), &plans, false, true, &mut live_out).unwrap();
        assert_eq!(summary.renamed, 3);
        assert!(dir.path().join("pizza tonight party great.jpg").exists());

        let dry_lines = plan_lines(&dry_out);
        assert_eq!(dry_lines.len(), 6);
        assert!(dry_lines.contains(
            &"Planning to rename IMG_0001.jpg -> pizza tonight party great.jpg.".to_string()
        ));
        assert!(dry_lines.contains(
            &"Renaming 'IMG_0001.jpg' to 'pizza tonight party great.jpg'".to_string()
        ));
        assert_eq!(dry_lines, plan_lines(&live_out));
    }

    #[tokio::test]
    async fn test_quiet_run_prints_no_plan_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "some notes").unwrap();

        let p = planner(&[], PlanOptions::default());
        let mut out = Vec::new();
        let plans = p.plan_directory(dir.path(), &mut out).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert!(plan_lines(&out).is_empty());
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three four", 9), "one two\nthree\nfour");
        assert_eq!(wrap_text("extraordinarily long", 5), "extraordinarily\nlong");
        assert_eq!(wrap_text("   ", 10), "");
    }
}
