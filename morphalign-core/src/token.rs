//! Lexical tokens and the per-document token queue

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One analyzer-produced token with half-open `[begin, end)` offsets into
/// the plain-text coordinate space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalToken {
    /// First plain-text coordinate covered by the token
    #[serde(default)]
    pub begin: usize,
    /// One past the last plain-text coordinate covered by the token
    #[serde(default)]
    pub end: usize,
    /// Lemma reported by the analyzer
    #[serde(default)]
    pub lemma: String,
    /// Part-of-speech tag reported by the analyzer
    #[serde(default)]
    pub tag: String,
    /// Position of the token in the analyzer's emission order
    #[serde(skip)]
    pub source_id: u32,
}

impl LexicalToken {
    /// Create a token. Argument order mirrors the analyzer record layout.
    pub fn new(tag: &str, lemma: &str, begin: usize, end: usize) -> Self {
        Self {
            begin,
            end,
            lemma: lemma.to_string(),
            tag: tag.to_string(),
            source_id: 0,
        }
    }
}

/// FIFO queue of [`LexicalToken`]s for one alignment run, sorted ascending
/// by `begin` and non-overlapping once [`TokenQueue::clean`] has run.
///
/// The queue is owned by exactly one run and consumed destructively.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenQueue {
    tokens: VecDeque<LexicalToken>,
}

impl TokenQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token at the back of the queue
    pub fn push(&mut self, token: LexicalToken) {
        self.tokens.push_back(token);
    }

    /// Look at the front token without removing it
    pub fn peek(&self) -> Option<&LexicalToken> {
        self.tokens.front()
    }

    /// Remove and return the front token
    pub fn poll(&mut self) -> Option<LexicalToken> {
        self.tokens.pop_front()
    }

    /// Number of tokens left in the queue
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the queue holds no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Repair degenerate offsets left by analyzer tokenization edge cases,
    /// in document order. Returns the number of offsets touched.
    ///
    /// For every token with `begin != 0`:
    /// - adjacency (`begin == previous.end`) shrinks the previous token's
    ///   end by one, so the aligner never has to close one wrapper and open
    ///   the next on the same character;
    /// - overlap (`begin < previous.end`) clamps `begin` to
    ///   `previous.end + 1`.
    ///
    /// The adjacency shrink is a compatibility patch for an analyzer quirk,
    /// not a documented tokenization rule; its numeric behavior is
    /// preserved exactly. Cleaning an already-clean queue changes nothing.
    pub fn clean(&mut self) -> usize {
        let mut repaired = 0;
        for i in 1..self.tokens.len() {
            if self.tokens[i].begin == 0 {
                continue;
            }
            if self.tokens[i].begin == self.tokens[i - 1].end {
                self.tokens[i - 1].end -= 1;
                repaired += 1;
            } else if self.tokens[i].begin < self.tokens[i - 1].end {
                self.tokens[i].begin = self.tokens[i - 1].end + 1;
                repaired += 1;
            }
        }
        repaired
    }

    /// Iterate over the queued tokens front to back
    pub fn iter(&self) -> impl Iterator<Item = &LexicalToken> {
        self.tokens.iter()
    }
}

impl FromIterator<LexicalToken> for TokenQueue {
    fn from_iter<I: IntoIterator<Item = LexicalToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TokenQueue {
    type Item = LexicalToken;
    type IntoIter = std::collections::vec_deque::IntoIter<LexicalToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
