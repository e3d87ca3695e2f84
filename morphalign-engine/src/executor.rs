//! Batch execution across documents
//!
//! Runs are embarrassingly parallel: each one owns its whole state and
//! the only shared objects are read-only resources. The parallel path
//! bounds a worker pool to the configured width or to available
//! parallelism; results come back as per-run values and are collected
//! into a [`BatchSummary`].

use crate::config::{EngineConfig, ExecutionMode};
use crate::job::{BatchSummary, DocumentJob, RunReport};
use crate::pipeline::DocumentPipeline;
use crate::resources::SharedResources;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::Arc;

/// Drives a batch of annotation runs.
pub struct BatchExecutor {
    resources: Arc<SharedResources>,
    config: EngineConfig,
}

impl BatchExecutor {
    /// Create an executor over shared resources
    pub fn new(resources: Arc<SharedResources>, config: EngineConfig) -> Self {
        Self { resources, config }
    }

    /// Run every job and collect the outcomes.
    pub fn run(&self, jobs: &[DocumentJob]) -> BatchSummary {
        self.run_with(jobs, |_| {})
    }

    /// Run every job, invoking `on_report` as each run finishes. Reports
    /// arrive from worker threads in completion order; the returned
    /// summary is in batch order.
    pub fn run_with<F>(&self, jobs: &[DocumentJob], on_report: F) -> BatchSummary
    where
        F: Fn(&RunReport) + Sync,
    {
        let pipeline = DocumentPipeline::new(&self.resources, &self.config);
        let reports: Vec<RunReport> = match self.config.execution_mode {
            ExecutionMode::Sequential => jobs
                .iter()
                .map(|job| run_one(&pipeline, job, &on_report))
                .collect(),
            ExecutionMode::Parallel => self.run_parallel(&pipeline, jobs, &on_report),
        };
        reports.into_iter().collect()
    }

    #[cfg(feature = "parallel")]
    fn run_parallel<F>(
        &self,
        pipeline: &DocumentPipeline,
        jobs: &[DocumentJob],
        on_report: &F,
    ) -> Vec<RunReport>
    where
        F: Fn(&RunReport) + Sync,
    {
        let width = self.config.threads.unwrap_or_else(num_cpus::get);
        match rayon::ThreadPoolBuilder::new().num_threads(width).build() {
            Ok(pool) => pool.install(|| {
                jobs.par_iter()
                    .map(|job| run_one(pipeline, job, on_report))
                    .collect()
            }),
            Err(err) => {
                log::warn!("worker pool unavailable ({err}), running sequentially");
                jobs.iter()
                    .map(|job| run_one(pipeline, job, on_report))
                    .collect()
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel<F>(
        &self,
        pipeline: &DocumentPipeline,
        jobs: &[DocumentJob],
        on_report: &F,
    ) -> Vec<RunReport>
    where
        F: Fn(&RunReport) + Sync,
    {
        jobs.iter()
            .map(|job| run_one(pipeline, job, on_report))
            .collect()
    }
}

fn run_one<F>(pipeline: &DocumentPipeline, job: &DocumentJob, on_report: &F) -> RunReport
where
    F: Fn(&RunReport) + Sync,
{
    let outcome = pipeline.run(job);
    if let Err(err) = &outcome {
        log::error!("document {} failed: {err}", job.id);
    }
    let report = RunReport {
        id: job.id.clone(),
        outcome,
    };
    on_report(&report);
    report
}
