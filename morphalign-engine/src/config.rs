//! Engine configuration

use crate::error::{EngineError, Result};
use std::path::PathBuf;

/// How a batch of runs is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One document at a time, on the calling thread
    Sequential,
    /// One worker per document on a bounded pool
    #[default]
    Parallel,
}

/// Configuration of one batch execution.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory annotated documents are written to
    pub output_dir: PathBuf,
    /// Scheduling mode
    pub execution_mode: ExecutionMode,
    /// Worker pool width; defaults to available parallelism
    pub threads: Option<usize>,
    /// Delete per-document working files after a successful run
    pub clean_working_files: bool,
}

impl EngineConfig {
    /// Start building a configuration
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    output_dir: Option<PathBuf>,
    execution_mode: ExecutionMode,
    threads: Option<usize>,
    clean_working_files: bool,
}

impl EngineConfigBuilder {
    /// Set the output directory (required)
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the scheduling mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// Bound the worker pool width
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Delete per-document working files after successful runs
    pub fn clean_working_files(mut self, clean: bool) -> Self {
        self.clean_working_files = clean;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EngineConfig> {
        let output_dir = self
            .output_dir
            .ok_or_else(|| EngineError::Config("output directory not set".into()))?;
        if matches!(self.threads, Some(0)) {
            return Err(EngineError::Config("thread count must be non-zero".into()));
        }
        Ok(EngineConfig {
            output_dir,
            execution_mode: self.execution_mode,
            threads: self.threads,
            clean_working_files: self.clean_working_files,
        })
    }
}
