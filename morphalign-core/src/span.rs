//! Annotation spans and wrapper identifiers

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;

/// Identifier of one inline wrapper marker, unique within a document's
/// alignment run, 1-based and strictly increasing in document order.
pub type WrapperId = u32;

/// One annotation unit: a half-open plain-text range plus the wrapper ids
/// covering it.
///
/// `ids` has length 1 for a token not interrupted by markup; intervening
/// tags split a token into several wrapper fragments, all listed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetSpan {
    /// First plain-text coordinate of the unit
    pub begin: usize,
    /// One past the last plain-text coordinate of the unit
    pub end: usize,
    /// Wrapper ids covering the unit, in document order
    pub ids: SmallVec<[WrapperId; 2]>,
}

impl OffsetSpan {
    /// Create a span referencing a single wrapper
    pub fn new(begin: usize, end: usize, id: WrapperId) -> Self {
        Self {
            begin,
            end,
            ids: smallvec![id],
        }
    }

    /// Standoff serialization order: ascending first id; on ties, spans
    /// with more ids first, so broader spans serialize before spans they
    /// contain.
    pub fn standoff_order(&self, other: &Self) -> Ordering {
        self.ids
            .first()
            .cmp(&other.ids.first())
            .then(other.ids.len().cmp(&self.ids.len()))
    }

    /// Render the ids as a standoff `target` attribute value: `#t<N>`
    /// references joined by single spaces.
    pub fn target(&self) -> String {
        let mut target = String::new();
        for id in &self.ids {
            if !target.is_empty() {
                target.push(' ');
            }
            target.push_str("#t");
            target.push_str(&id.to_string());
        }
        target
    }
}

/// Morphology-layer span: one lexical token with its analyzer payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologySpan {
    /// Covered range and wrapper ids
    pub span: OffsetSpan,
    /// Lemma reported by the analyzer
    pub lemma: String,
    /// Normalized part-of-speech tag
    pub tag: String,
}

/// Terminology- or phraseology-layer span: a term occurrence projected
/// onto the wrapper ids of the tokens it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSpan {
    /// Covered range and wrapper ids
    pub span: OffsetSpan,
    /// Identifier of the term in the extraction pipeline's inventory
    pub term_id: u64,
    /// Surface form of the occurrence
    pub word: String,
}

/// One term occurrence as produced by the external extraction pipeline,
/// in plain-text coordinates. Wrapper ids are not known until after
/// alignment; see [`project_wrapper_ids`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    /// First plain-text coordinate of the occurrence
    pub begin: usize,
    /// One past the last plain-text coordinate of the occurrence
    pub end: usize,
    /// Term inventory identifier
    pub term_id: u64,
    /// Surface form
    pub word: String,
}

/// Project term occurrences onto wrapper ids.
///
/// A record collects the ids of every morphology span fully contained in
/// its `[begin, end)` range. Records covering no aligned token are dropped;
/// they have nothing to reference.
pub fn project_wrapper_ids(
    morphology: &[MorphologySpan],
    records: impl IntoIterator<Item = TermRecord>,
) -> Vec<TermSpan> {
    records
        .into_iter()
        .filter_map(|record| {
            let mut ids: SmallVec<[WrapperId; 2]> = SmallVec::new();
            for morph in morphology {
                if morph.span.begin >= record.begin && morph.span.end <= record.end {
                    ids.extend_from_slice(&morph.span.ids);
                }
            }
            if ids.is_empty() {
                return None;
            }
            Some(TermSpan {
                span: OffsetSpan {
                    begin: record.begin,
                    end: record.end,
                    ids,
                },
                term_id: record.term_id,
                word: record.word,
            })
        })
        .collect()
}
