//! Generate-config command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        match &self.output {
            Some(path) => {
                std::fs::write(path, CliConfig::default_toml())
                    .with_context(|| format!("Failed to write config file: {}", path.display()))?;
                println!("wrote {}", path.display());
            }
            None => print!("{}", CliConfig::default_toml()),
        }
        Ok(())
    }
}
