//! Working-file cleanup
//!
//! Once a document's annotated output is in place, its analyzer output
//! and plain-text rendering are intermediate artifacts with no further
//! use. Cleanup failures are reported but never fail the run that
//! already produced its output.

use crate::job::DocumentJob;
use std::fs;
use std::io;

/// Delete the per-document working files of a completed run. The
/// marked-up source document is never touched.
pub fn remove_working_files(job: &DocumentJob) -> io::Result<()> {
    fs::remove_file(&job.analysis)?;
    fs::remove_file(&job.plain_text)?;
    Ok(())
}
