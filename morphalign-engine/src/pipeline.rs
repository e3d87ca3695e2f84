//! One document's alignment run
//!
//! A run reads its three input artifacts, streams the analyzer output
//! into a cleaned token queue, aligns the markup, projects the optional
//! term layers, and writes the annotated document. All state is local to
//! the run; abandoning it at any point cannot affect other runs.

use crate::cleanup;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::job::DocumentJob;
use crate::resources::SharedResources;
use morphalign_core::{
    project_wrapper_ids, AnalyzerOutputReader, AnnotationLayers, CoreError, MarkupAligner,
    MorphologySpan, StandoffSerializer, TermRecord, TermSpan, TextRegion,
};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Executes single-document runs against shared read-only resources.
pub struct DocumentPipeline<'a> {
    resources: &'a SharedResources,
    config: &'a EngineConfig,
}

impl<'a> DocumentPipeline<'a> {
    /// Create a pipeline for one batch's resources and configuration
    pub fn new(resources: &'a SharedResources, config: &'a EngineConfig) -> Self {
        Self { resources, config }
    }

    /// Run one document to completion and return its output path.
    pub fn run(&self, job: &DocumentJob) -> Result<PathBuf> {
        log::debug!("tokenization started: {}", job.id);

        let markup =
            fs::read_to_string(&job.markup).map_err(|e| EngineError::io(&job.markup, e))?;
        let plain_text =
            fs::read_to_string(&job.plain_text).map_err(|e| EngineError::io(&job.plain_text, e))?;
        let analysis =
            File::open(&job.analysis).map_err(|e| EngineError::io(&job.analysis, e))?;

        let reader = BufReader::new(analysis);
        let queue = match &self.resources.tags {
            Some(tags) => AnalyzerOutputReader::with_normalizer(reader, tags).read()?,
            None => AnalyzerOutputReader::new(reader).read()?,
        };

        let region = TextRegion::locate(&markup)?;
        let aligned = MarkupAligner::new(&plain_text, region.body, queue).align()?;
        log::debug!("tokenization finished: {}", job.id);

        let terminology = self.load_term_layer(job.terms.as_deref(), &aligned.morphology)?;
        let phraseology =
            self.load_term_layer(job.phraseology.as_deref(), &aligned.morphology)?;
        let layers = AnnotationLayers {
            morphology: aligned.morphology,
            terminology,
            phraseology,
        };

        let output = self.config.output_dir.join(format!("{}.xml", job.id));
        StandoffSerializer::new(&self.resources.templates)
            .write(&output, &region, &aligned.body, &layers)?;
        log::debug!("written: {}", output.display());

        if self.config.clean_working_files {
            if let Err(err) = cleanup::remove_working_files(job) {
                log::warn!("could not delete working files of {}: {err}", job.id);
            }
        }

        Ok(output)
    }

    /// Read a term-record file and project it onto the wrapper ids of the
    /// aligned tokens. Absent files mean an absent layer.
    fn load_term_layer(
        &self,
        path: Option<&Path>,
        morphology: &[MorphologySpan],
    ) -> Result<Vec<TermSpan>> {
        let Some(path) = path else {
            return Ok(Vec::new());
        };
        let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
        let records: Vec<TermRecord> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| CoreError::Parse(e.to_string()))?;
        Ok(project_wrapper_ids(morphology, records))
    }
}
