//! Analyzer token feed
//!
//! The external analyzer writes one JSON document per input file; the
//! token list lives in its `word_annotations` array. The reader streams
//! that array straight into a [`TokenQueue`] through a
//! [`serde::de::DeserializeSeed`], so the analyzer output is never
//! materialized in memory as a whole, and ignores every other section of
//! the document.

use crate::error::Result;
use crate::tags::TagNormalizer;
use crate::token::{LexicalToken, TokenQueue};
use serde::de::{DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::Read;

const WORD_ANNOTATIONS: &str = "word_annotations";

/// Streams an analyzer output document into an ordered [`TokenQueue`].
pub struct AnalyzerOutputReader<'n, R> {
    reader: R,
    normalizer: Option<&'n TagNormalizer>,
}

impl<R: Read> AnalyzerOutputReader<'static, R> {
    /// Read tokens without tag normalization
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            normalizer: None,
        }
    }
}

impl<'n, R: Read> AnalyzerOutputReader<'n, R> {
    /// Read tokens, rewriting analyzer tags through `normalizer`
    pub fn with_normalizer(reader: R, normalizer: &'n TagNormalizer) -> Self {
        Self {
            reader,
            normalizer: Some(normalizer),
        }
    }

    /// Consume the analyzer output and return the cleaned token queue.
    pub fn read(self) -> Result<TokenQueue> {
        let mut queue = self.read_raw()?;
        queue.clean();
        Ok(queue)
    }

    /// Consume the analyzer output without repairing offsets.
    pub fn read_raw(self) -> Result<TokenQueue> {
        let mut queue = TokenQueue::new();
        let mut deserializer = serde_json::Deserializer::from_reader(self.reader);
        deserializer.deserialize_map(DocumentVisitor {
            queue: &mut queue,
            normalizer: self.normalizer,
        })?;
        Ok(queue)
    }
}

/// One record of the `word_annotations` array. Unknown fields are ignored;
/// missing fields default, matching the analyzer's sparse output.
#[derive(Deserialize)]
struct TokenRecord {
    #[serde(default)]
    lemma: String,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    begin: usize,
    #[serde(default)]
    end: usize,
}

struct DocumentVisitor<'a, 'n> {
    queue: &'a mut TokenQueue,
    normalizer: Option<&'n TagNormalizer>,
}

impl<'de> Visitor<'de> for DocumentVisitor<'_, '_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an analyzer output object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            if key == WORD_ANNOTATIONS {
                map.next_value_seed(TokenSeq {
                    queue: self.queue,
                    normalizer: self.normalizer,
                })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(())
    }
}

struct TokenSeq<'a, 'n> {
    queue: &'a mut TokenQueue,
    normalizer: Option<&'n TagNormalizer>,
}

impl<'de> DeserializeSeed<'de> for TokenSeq<'_, '_> {
    type Value = ();

    fn deserialize<D: serde::Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for TokenSeq<'_, '_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of word annotations")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        let mut source_id = 0;
        while let Some(record) = seq.next_element::<TokenRecord>()? {
            let tag = match self.normalizer {
                Some(normalizer) => normalizer.normalize(&record.tag).to_string(),
                None => record.tag,
            };
            self.queue.push(LexicalToken {
                begin: record.begin,
                end: record.end,
                lemma: record.lemma,
                tag,
                source_id,
            });
            source_id += 1;
        }
        Ok(())
    }
}
