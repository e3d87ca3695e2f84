//! Analyzer tagset normalization
//!
//! The external analyzer emits language-specific part-of-speech tags; the
//! annotation layers use a normalized tagset. Tables are plain JSON objects
//! under a `"tag"` key, shared read-only across workers.

use crate::error::{CoreError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

const EN_TABLE: &str = include_str!("../resources/tags/en.json");
const FR_TABLE: &str = include_str!("../resources/tags/fr.json");

#[derive(Deserialize)]
struct TagResource {
    tag: HashMap<String, String>,
}

/// Maps analyzer part-of-speech tags onto the normalized tagset.
///
/// Tags without a table entry pass through unchanged.
#[derive(Debug, Clone)]
pub struct TagNormalizer {
    table: HashMap<String, String>,
}

impl TagNormalizer {
    /// Load a normalization table from a JSON resource.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let resource: TagResource =
            serde_json::from_reader(reader).map_err(|e| CoreError::Parse(e.to_string()))?;
        if resource.tag.is_empty() {
            return Err(CoreError::Parse("empty tag normalization table".into()));
        }
        Ok(Self {
            table: resource.tag,
        })
    }

    /// Built-in table for a language code, if one is bundled.
    pub fn for_language(code: &str) -> Option<Self> {
        let resource = match code {
            "en" | "eng" | "english" => EN_TABLE,
            "fr" | "fra" | "french" => FR_TABLE,
            _ => return None,
        };
        // bundled resources are validated by tests
        let resource: TagResource =
            serde_json::from_str(resource).expect("bundled tag table is valid JSON");
        Some(Self {
            table: resource.tag,
        })
    }

    /// Normalize one analyzer tag.
    pub fn normalize<'a>(&'a self, tag: &'a str) -> &'a str {
        self.table.get(tag).map(String::as_str).unwrap_or(tag)
    }
}
