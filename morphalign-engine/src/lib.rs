//! Per-document orchestration for annotation runs
//!
//! This crate drives the alignment core over batches of documents: one
//! run per document, runs independent of each other, executed on a
//! bounded worker pool. Every failure is recovered at the run boundary;
//! one bad document never aborts a batch.

#![warn(missing_docs)]

pub mod cleanup;
pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod pipeline;
pub mod resources;

// Re-export key types
pub use config::{EngineConfig, EngineConfigBuilder, ExecutionMode};
pub use error::{EngineError, Result};
pub use executor::BatchExecutor;
pub use job::{BatchSummary, DocumentJob, RunReport};
pub use pipeline::DocumentPipeline;
pub use resources::SharedResources;
