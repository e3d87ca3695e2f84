//! Morphosyntactic token alignment and standoff annotation
//!
//! This crate takes a marked-up document and an externally produced,
//! offset-indexed stream of linguistic tokens (lemma, tag, begin/end
//! character offsets into a plain-text rendering of the same document) and
//! produces a new document in which every token is wrapped by a uniquely
//! identified inline `<w>` marker, plus per-layer span lists used to build
//! standoff annotation blocks referencing those markers.
//!
//! The pipeline for one document is:
//!
//! 1. [`feed::AnalyzerOutputReader`] streams the analyzer output into a
//!    [`token::TokenQueue`] and repairs degenerate offsets.
//! 2. [`aligner::MarkupAligner`] walks the markup character stream in
//!    lockstep with plain-text coordinates, inserting wrapper markers and
//!    collecting [`span::MorphologySpan`]s.
//! 3. [`standoff::StandoffSerializer`] renders the standoff blocks and
//!    splices them together with the wrapped body into the final document.

#![warn(missing_docs)]

pub mod aligner;
pub mod error;
pub mod escape;
pub mod feed;
pub mod span;
pub mod standoff;
pub mod tags;
pub mod token;

// Re-export key types
pub use aligner::{AlignedBody, MarkupAligner, TextRegion};
pub use error::{CoreError, Result};
pub use feed::AnalyzerOutputReader;
pub use span::{project_wrapper_ids, MorphologySpan, OffsetSpan, TermRecord, TermSpan, WrapperId};
pub use standoff::{AnnotationLayers, StandoffSerializer, StandoffTemplates};
pub use tags::TagNormalizer;
pub use token::{LexicalToken, TokenQueue};
