//! Corpus layout discovery
//!
//! A corpus is a set of marked-up documents plus per-document sibling
//! artifacts found by file stem: the analyzer output (`<stem>.json`), the
//! plain-text rendering (`<stem>.txt`), and optional term/multi-word
//! record files.

use crate::error::CliError;
use anyhow::Result;
use morphalign_engine::DocumentJob;
use std::path::{Path, PathBuf};

/// Directories the per-document artifacts live in.
#[derive(Debug, Clone)]
pub struct CorpusLayout {
    /// Analyzer outputs, `<stem>.json`
    pub analysis_dir: PathBuf,
    /// Plain-text renderings, `<stem>.txt`
    pub text_dir: PathBuf,
    /// Terminology records, `<stem>.json`, optional
    pub terms_dir: Option<PathBuf>,
    /// Multi-word unit records, `<stem>.json`, optional
    pub phraseology_dir: Option<PathBuf>,
}

impl CorpusLayout {
    /// Build the job for one marked-up document.
    ///
    /// Required artifacts must exist; optional layers are attached only
    /// when their record file is present.
    pub fn job_for(&self, markup: &Path) -> Result<DocumentJob> {
        let stem = markup
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CliError::MissingArtifact(markup.display().to_string()))?
            .to_string();

        let analysis = self.require(&self.analysis_dir.join(format!("{stem}.json")))?;
        let text = self.require(&self.text_dir.join(format!("{stem}.txt")))?;

        let mut job = DocumentJob::new(stem.clone(), markup, text, analysis);
        if let Some(terms) = Self::optional(self.terms_dir.as_deref(), &stem) {
            job = job.with_terms(terms);
        }
        if let Some(phraseology) = Self::optional(self.phraseology_dir.as_deref(), &stem) {
            job = job.with_phraseology(phraseology);
        }
        Ok(job)
    }

    /// Build jobs for a whole document set, splitting off the documents
    /// whose required artifacts are missing instead of aborting.
    pub fn jobs(&self, markup_files: &[PathBuf]) -> (Vec<DocumentJob>, Vec<(PathBuf, anyhow::Error)>) {
        let mut jobs = Vec::new();
        let mut skipped = Vec::new();
        for markup in markup_files {
            match self.job_for(markup) {
                Ok(job) => jobs.push(job),
                Err(err) => skipped.push((markup.clone(), err)),
            }
        }
        (jobs, skipped)
    }

    fn require(&self, path: &Path) -> Result<PathBuf> {
        if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(CliError::MissingArtifact(path.display().to_string()).into())
        }
    }

    fn optional(dir: Option<&Path>, stem: &str) -> Option<PathBuf> {
        let path = dir?.join(format!("{stem}.json"));
        path.is_file().then_some(path)
    }
}
