//! Check command implementation
//!
//! Parses analyzer outputs the same way the annotate pipeline does, but
//! only reports per-file token statistics; nothing is written.

use crate::commands::init_logging;
use anyhow::{Context, Result};
use clap::Args;
use morphalign_core::AnalyzerOutputReader;
use std::fs::File;
use std::io::BufReader;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Analyzer output files or glob patterns
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Suppress per-file output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CheckArgs {
    /// Execute the check command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet)?;

        let files = crate::input::resolve_patterns(&self.input)?;
        let mut invalid = 0;
        for path in &files {
            let file = File::open(path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            match AnalyzerOutputReader::new(BufReader::new(file)).read_raw() {
                Ok(mut queue) => {
                    let tokens = queue.len();
                    let repaired = queue.clean();
                    if !self.quiet {
                        println!(
                            "{}: {} token(s), {} offset(s) repaired",
                            path.display(),
                            tokens,
                            repaired
                        );
                    }
                }
                Err(err) => {
                    invalid += 1;
                    log::error!("{}: {err}", path.display());
                }
            }
        }

        if invalid > 0 {
            anyhow::bail!("{invalid} of {} file(s) malformed", files.len());
        }
        Ok(())
    }
}
