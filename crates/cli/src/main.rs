//! imagetools CLI
//!
//! `rename` names images after the words found in them (or their MD5 when
//! there are too few), and names every other file after its MD5.
//! `backgrounds` deletes images unsuitable as desktop backgrounds.
//! `resources` builds the word list and frequency tables from a text corpus.
//!
//! Copyright (c) 2025 Michael A Wright

mod backgrounds;
mod bootstrap;
mod listing;
mod planner;
mod renamer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_pipeline::ocr::TesseractExtractor;
use core_pipeline::{
    BackgroundPolicy, LinguisticContext, NamingPipeline, RenamerConfig, ResourcePaths,
};
use planner::{PlanOptions, Planner};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nhost: ",
    env!("BUILT_HOST"),
    "\ncommit: ",
    env!("BUILT_GIT_COMMIT_HASH"),
    "\nbuilt: ",
    env!("BUILT_TIME_UTC"),
);

#[derive(Parser)]
#[command(name = "imagetools")]
#[command(about = "OCR-based file renamer and background image cleaner", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Print corrections, raw OCR text and planned renames
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename files after the text in them, or after their MD5 hash
    Rename {
        /// Directory containing files to process
        #[arg(short, long)]
        directory: PathBuf,

        /// Test mode: show intended actions without renaming
        #[arg(short, long)]
        test: bool,

        /// Append raw text from all scanned images to this file (ignored with --test)
        #[arg(short, long = "output_text", visible_alias = "output-text")]
        output_text: Option<PathBuf>,

        /// Directory with words.txt, frequencies.txt and optionally spelling.txt
        #[arg(short, long, default_value = "resources")]
        resources: PathBuf,

        /// JSON file overriding renamer settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Delete images below a resolution or aspect ratio
    Backgrounds {
        /// Directory containing candidate backgrounds
        #[arg(short, long)]
        directory: PathBuf,

        /// Test mode: list what would be deleted
        #[arg(short, long)]
        test: bool,

        /// Minimum resolution in megapixels
        #[arg(long)]
        min_megapixels: Option<f64>,

        /// Minimum width / height
        #[arg(long)]
        min_aspect_ratio: Option<f64>,
    },

    /// Build words.txt, frequencies.txt and spelling.txt from plain-text corpus files
    Resources {
        /// Corpus files or directories (walked recursively)
        #[arg(short, long, required = true, num_args = 1..)]
        corpus: Vec<PathBuf>,

        /// Reference word list, one word per line (e.g. /usr/share/dict/words);
        /// defaults to every corpus word
        #[arg(short, long)]
        word_list: Option<PathBuf>,

        /// Directory to write the resource files into
        #[arg(short, long, default_value = "resources")]
        output: PathBuf,

        /// Leave out words seen fewer times than this
        #[arg(short, long, default_value_t = 1)]
        min_count: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    debug!(
        "{} {} ({}, {})",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::PROFILE,
        built_info::RUSTC_VERSION
    );

    match cli.command {
        Commands::Rename {
            directory,
            test,
            output_text,
            resources,
            config,
        } => {
            let options = PlanOptions {
                test,
                verbose: cli.verbose,
                output_text,
            };
            run_blocking(rename(directory, resources, config, options))?
        }
        Commands::Backgrounds {
            directory,
            test,
            min_megapixels,
            min_aspect_ratio,
        } => {
            let policy = background_policy(min_megapixels, min_aspect_ratio)?;
            backgrounds::clean_backgrounds(&directory, &policy, test)?;
            Ok(())
        }
        Commands::Resources {
            corpus,
            word_list,
            output,
            min_count,
        } => {
            bootstrap::build_resources(
                &corpus,
                word_list.as_deref(),
                &output,
                min_count,
                &mut io::stdout(),
            )?;
            Ok(())
        }
    }
}

/// Default policy with the command-line overrides applied
fn background_policy(
    min_megapixels: Option<f64>,
    min_aspect_ratio: Option<f64>,
) -> Result<BackgroundPolicy> {
    let mut policy = BackgroundPolicy::default();
    if let Some(mp) = min_megapixels {
        policy.min_megapixels = mp;
    }
    if let Some(ratio) = min_aspect_ratio {
        policy.min_aspect_ratio = ratio;
    }
    policy.validate()?;
    Ok(policy)
}

/// Drive `future` to completion on a fresh runtime.
///
/// OCR calls that timed out leave their blocking workers running. Dropping
/// the runtime would wait for them, so it is shut down in the background
/// and the process exits without them.
fn run_blocking<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

async fn rename(
    directory: PathBuf,
    resources: PathBuf,
    config: Option<PathBuf>,
    options: PlanOptions,
) -> Result<()> {
    let start = Instant::now();

    listing::ensure_directory(&directory)?;

    let config = match config {
        Some(path) => RenamerConfig::from_json_file(&path)?,
        None => RenamerConfig::default(),
    };
    debug!("Similarity policy: {:?}", config.similarity);

    let paths = ResourcePaths::in_dir(&resources);
    let mut context = LinguisticContext::load(&paths, config.max_edit_distance)
        .context("Failed to load linguistic resources")?;
    context.require_full_dictionary(config.min_dictionary_words);
    let pipeline = NamingPipeline::new(Arc::new(context), config);

    let test = options.test;
    let verbose = options.verbose;
    let planner = Planner::new(pipeline, Arc::new(TesseractExtractor::default()), options)?;
    let mut out = io::stdout();
    let plans = planner.plan_directory(&directory, &mut out).await?;

    writeln!(out, "Renaming files where needed...")?;
    let summary = renamer::apply_plans(&directory, &plans, test, verbose, &mut out)?;
    debug!("{:?}", summary);

    let elapsed = start.elapsed().as_secs();
    writeln!(
        out,
        "Program completed in {:02}h:{:02}m:{:02}s.",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60
    )?;
    Ok(())
}
