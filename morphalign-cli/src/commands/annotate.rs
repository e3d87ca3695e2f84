//! Annotate command implementation

use crate::commands::init_logging;
use crate::config::CliConfig;
use crate::input::{resolve_patterns, CorpusLayout};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use morphalign_engine::{BatchExecutor, EngineConfig, ExecutionMode, SharedResources};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the annotate command
#[derive(Debug, Args)]
pub struct AnnotateArgs {
    /// Marked-up documents or glob patterns
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Directory of analyzer outputs (<stem>.json)
    #[arg(long, value_name = "DIR")]
    pub analysis_dir: PathBuf,

    /// Directory of plain-text renderings (<stem>.txt)
    #[arg(long, value_name = "DIR")]
    pub text_dir: PathBuf,

    /// Directory of terminology records (<stem>.json); optional layer
    #[arg(long, value_name = "DIR")]
    pub terms_dir: Option<PathBuf>,

    /// Directory of multi-word unit records (<stem>.json); optional layer
    #[arg(long, value_name = "DIR")]
    pub phraseology_dir: Option<PathBuf>,

    /// Output directory for annotated documents
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Language of the analyzer tagset; enables tag normalization
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Worker threads (default: available parallelism)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Process documents one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Delete analyzer output and plain-text files after successful runs
    #[arg(long)]
    pub clean_working_files: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl AnnotateArgs {
    /// Execute the annotate command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet)?;

        let file_config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        let threads = self.threads.or(file_config.threads);
        let language = self.language.clone().or(file_config.language);
        let clean_working_files = self.clean_working_files || file_config.clean_working_files;

        let markup_files = resolve_patterns(&self.input)?;
        log::info!("processing {} document(s)", markup_files.len());

        std::fs::create_dir_all(&self.output)
            .with_context(|| format!("Failed to create output directory: {}", self.output.display()))?;

        let layout = CorpusLayout {
            analysis_dir: self.analysis_dir.clone(),
            text_dir: self.text_dir.clone(),
            terms_dir: self.terms_dir.clone(),
            phraseology_dir: self.phraseology_dir.clone(),
        };
        let (jobs, skipped) = layout.jobs(&markup_files);
        for (markup, err) in &skipped {
            log::error!("skipping {}: {err:#}", markup.display());
        }
        if jobs.is_empty() {
            anyhow::bail!("no processable documents among {} input file(s)", markup_files.len());
        }

        let resources = SharedResources::for_language(language.as_deref())
            .context("could not set up shared resources")?;
        let mode = if self.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel
        };
        let engine_config = EngineConfig::builder()
            .output_dir(&self.output)
            .execution_mode(mode)
            .threads(threads)
            .clean_working_files(clean_working_files)
            .build()
            .context("invalid engine configuration")?;

        let executor = BatchExecutor::new(Arc::new(resources), engine_config);
        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_documents(jobs.len() as u64);
        let summary = executor.run_with(&jobs, |report| progress.document_done(&report.id));
        progress.finish();

        if !self.quiet {
            println!(
                "{} annotated, {} failed, {} skipped",
                summary.completed.len(),
                summary.failed.len(),
                skipped.len()
            );
        }
        if summary.all_failed() {
            anyhow::bail!("all {} document(s) failed", summary.failed.len());
        }
        Ok(())
    }
}
