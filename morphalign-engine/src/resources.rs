//! Read-only resources shared across workers

use crate::error::{EngineError, Result};
use morphalign_core::{StandoffTemplates, TagNormalizer};

/// Templates and normalization tables shared by reference across all
/// workers of a batch. Nothing here is mutated after construction.
#[derive(Debug, Clone)]
pub struct SharedResources {
    /// Standoff rendering templates
    pub templates: StandoffTemplates,
    /// Tag normalization table, when a language was configured
    pub tags: Option<TagNormalizer>,
}

impl SharedResources {
    /// Resources without tag normalization
    pub fn new() -> Self {
        Self {
            templates: StandoffTemplates::default(),
            tags: None,
        }
    }

    /// Resources with the bundled tag table for `language`, if given.
    pub fn for_language(language: Option<&str>) -> Result<Self> {
        let tags = match language {
            Some(code) => Some(TagNormalizer::for_language(code).ok_or_else(|| {
                EngineError::Config(format!("no tag table bundled for language '{code}'"))
            })?),
            None => None,
        };
        Ok(Self {
            templates: StandoffTemplates::default(),
            tags,
        })
    }
}

impl Default for SharedResources {
    fn default() -> Self {
        Self::new()
    }
}
