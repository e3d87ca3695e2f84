//! Document jobs and run reports

use crate::error::EngineError;
use std::path::PathBuf;

/// The per-document input files of one annotation run.
#[derive(Debug, Clone)]
pub struct DocumentJob {
    /// Document identifier, used for the output file name and logging
    pub id: String,
    /// The marked-up source document
    pub markup: PathBuf,
    /// The plain-text rendering the analyzer offsets refer to
    pub plain_text: PathBuf,
    /// The analyzer output for this document
    pub analysis: PathBuf,
    /// Optional terminology occurrence records
    pub terms: Option<PathBuf>,
    /// Optional multi-word unit occurrence records
    pub phraseology: Option<PathBuf>,
}

impl DocumentJob {
    /// Create a job from the three required artifacts
    pub fn new(
        id: impl Into<String>,
        markup: impl Into<PathBuf>,
        plain_text: impl Into<PathBuf>,
        analysis: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            markup: markup.into(),
            plain_text: plain_text.into(),
            analysis: analysis.into(),
            terms: None,
            phraseology: None,
        }
    }

    /// Attach a terminology record file
    pub fn with_terms(mut self, terms: impl Into<PathBuf>) -> Self {
        self.terms = Some(terms.into());
        self
    }

    /// Attach a multi-word unit record file
    pub fn with_phraseology(mut self, phraseology: impl Into<PathBuf>) -> Self {
        self.phraseology = Some(phraseology.into());
        self
    }
}

/// Outcome of one document's run.
#[derive(Debug)]
pub struct RunReport {
    /// Document identifier
    pub id: String,
    /// Output path on success, the failure otherwise
    pub outcome: std::result::Result<PathBuf, EngineError>,
}

/// Collected outcomes of a whole batch.
///
/// Built from per-run return values; no state is shared between runs.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Output paths of completed documents, in batch order
    pub completed: Vec<PathBuf>,
    /// Failed documents with their failures, in batch order
    pub failed: Vec<(String, EngineError)>,
}

impl BatchSummary {
    /// Total number of documents in the batch
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    /// Whether every document in a non-empty batch failed
    pub fn all_failed(&self) -> bool {
        self.completed.is_empty() && !self.failed.is_empty()
    }
}

impl FromIterator<RunReport> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = RunReport>>(reports: I) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.outcome {
                Ok(path) => summary.completed.push(path),
                Err(err) => summary.failed.push((report.id, err)),
            }
        }
        summary
    }
}
