//! Markup-to-plain-text alignment engine
//!
//! Two coordinate systems advance in lockstep here: character offsets into
//! the plain-text rendering the analyzer saw, and a cursor walking the
//! original markup stream. Tags and comments occupy markup characters but
//! no plain-text coordinates; entity references span several markup
//! characters but exactly one coordinate; whitespace normalization in the
//! plain-text extraction can leave newlines the markup does not have at
//! the same position. Losing sync anywhere corrupts every annotation that
//! follows, so every transition is driven by the token queue and checked
//! against the plain-text reference.

use crate::error::{CoreError, Result};
use crate::span::{MorphologySpan, OffsetSpan, WrapperId};
use crate::token::TokenQueue;
use std::collections::VecDeque;

/// The text-bearing subregion of a document.
///
/// Only the body between the `<text>` start marker and its `</text>` end
/// marker is aligned; preamble and postamble pass through unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRegion<'a> {
    /// Everything before the `<text>` start marker
    pub preamble: &'a str,
    /// The region from `<text>` through `</text>`, inclusive
    pub body: &'a str,
    /// Everything after the `</text>` end marker
    pub postamble: &'a str,
}

impl<'a> TextRegion<'a> {
    /// Split a document at its text boundary markers.
    pub fn locate(document: &'a str) -> Result<Self> {
        let start = find_text_start(document).ok_or(CoreError::MissingTextBoundary)?;
        const END_MARKER: &str = "</text>";
        let end = document[start..]
            .find(END_MARKER)
            .map(|at| start + at + END_MARKER.len())
            .ok_or(CoreError::MissingTextBoundary)?;
        Ok(Self {
            preamble: &document[..start],
            body: &document[start..end],
            postamble: &document[end..],
        })
    }
}

/// Byte offset of the first `<text>` or `<text ...>` start tag.
fn find_text_start(document: &str) -> Option<usize> {
    const START_MARKER: &str = "<text";
    let mut from = 0;
    while let Some(found) = document[from..].find(START_MARKER) {
        let at = from + found;
        let rest = &document[at + START_MARKER.len()..];
        match rest.chars().next() {
            Some(c) if c == '>' || c.is_whitespace() => return Some(at),
            _ => from = at + START_MARKER.len(),
        }
    }
    None
}

/// Result of one alignment run over a text region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedBody {
    /// The region text with wrapper markers inserted in place
    pub body: String,
    /// Morphology spans in document order, one per consumed token
    pub morphology: Vec<MorphologySpan>,
}

/// Whether a wrapper marker is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WrapperState {
    /// Between tokens
    Outside,
    /// A wrapper is open for the token at the queue front; the payload is
    /// the index of that token's span in the output list
    Inside(usize),
}

/// Walks one text region's markup stream and wraps every queued token in
/// a `<w xml:id="t<N>">` marker.
///
/// Wrapper ids are allocated when a wrapper opens, 1-based and strictly
/// increasing. A tag cluster interrupting an open token closes the
/// wrapper before the cluster and reopens a fresh fragment after it; all
/// fragment ids accumulate on the token's single [`OffsetSpan`].
pub struct MarkupAligner {
    text: Vec<char>,
    markup: VecDeque<char>,
    queue: TokenQueue,
    out: String,
    spans: Vec<MorphologySpan>,
    coordinate: usize,
    next_id: WrapperId,
    state: WrapperState,
}

impl MarkupAligner {
    /// Set up a run over `body` (a [`TextRegion`] body), aligned against
    /// `plain_text`, consuming `queue`.
    pub fn new(plain_text: &str, body: &str, queue: TokenQueue) -> Self {
        let capacity = body.len() + queue.len() * 24;
        Self {
            text: plain_text.chars().collect(),
            markup: body.chars().collect(),
            queue,
            out: String::with_capacity(capacity),
            spans: Vec::new(),
            coordinate: 0,
            next_id: 1,
            state: WrapperState::Outside,
        }
    }

    /// Run the alignment to completion.
    pub fn align(mut self) -> Result<AlignedBody> {
        while let Some(ch) = self.markup.pop_front() {
            if ch == '<' {
                self.copy_tag_cluster(ch)?;
            } else {
                self.skip_normalized_gaps(ch);
                self.consume_text_unit(ch);
                self.coordinate += 1;
            }
            self.discard_overrun_token()?;
        }
        self.finish()
    }

    fn alloc_id(&mut self) -> WrapperId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Copy a run of adjacent tags and comments verbatim.
    ///
    /// Adjacent tags with no interleaved text are buffered as one cluster,
    /// so a closing wrapper is never emitted in the middle of one: an open
    /// wrapper closes before the cluster and a new fragment reopens after
    /// it, on the same span.
    fn copy_tag_cluster(&mut self, first: char) -> Result<()> {
        let resume = if let WrapperState::Inside(span_index) = self.state {
            self.out.push_str("</w>");
            let id = self.alloc_id();
            self.spans[span_index].span.ids.push(id);
            Some(id)
        } else {
            None
        };

        let mut ch = first;
        loop {
            let cluster_continues = self.markup.front() == Some(&'<');
            if ch == '>' && !cluster_continues {
                self.out.push(ch);
                break;
            }
            self.out.push(ch);
            ch = self
                .markup
                .pop_front()
                .ok_or_else(|| CoreError::AlignmentDrift {
                    coordinate: self.coordinate,
                    reason: "markup stream ended inside a tag".into(),
                })?;
        }

        if let Some(id) = resume {
            self.out.push_str(&format!("<w xml:id=\"t{id}\">"));
        }
        Ok(())
    }

    /// Skip plain-text coordinates holding normalization artifacts.
    ///
    /// The plain-text extraction inserts newlines the markup stream does
    /// not have at the same position; when the reference at the current
    /// coordinate is such a newline and the markup character about to be
    /// consumed is not, the coordinate advances alone until the two
    /// streams re-agree.
    fn skip_normalized_gaps(&mut self, ch: char) {
        while self.coordinate + 1 < self.text.len()
            && self.text[self.coordinate] == '\n'
            && ch != '\n'
        {
            self.coordinate += 1;
        }
    }

    /// Consume one plain-text unit: an ordinary character, or an entity
    /// reference copied whole and counted as a single coordinate.
    fn consume_text_unit(&mut self, ch: char) {
        if self.state == WrapperState::Outside {
            let starting = self
                .queue
                .peek()
                .filter(|token| self.coordinate == token.begin)
                .cloned();
            if let Some(token) = starting {
                let id = self.alloc_id();
                self.out.push_str(&format!("<w xml:id=\"t{id}\">"));
                self.spans.push(MorphologySpan {
                    span: OffsetSpan::new(token.begin, token.end, id),
                    lemma: token.lemma,
                    tag: token.tag,
                });
                self.state = WrapperState::Inside(self.spans.len() - 1);
            }
        }

        self.out.push(ch);
        if ch == '&' {
            self.copy_entity();
        }

        if matches!(self.state, WrapperState::Inside(_)) {
            let closes = self
                .queue
                .peek()
                .is_some_and(|token| self.coordinate + 1 == token.end);
            if closes {
                self.out.push_str("</w>");
                self.queue.poll();
                self.state = WrapperState::Outside;
            }
        }
    }

    /// Copy the remainder of an entity reference through its `;`.
    fn copy_entity(&mut self) {
        while let Some(ch) = self.markup.pop_front() {
            self.out.push(ch);
            if ch == ';' {
                break;
            }
        }
    }

    /// Drop a token whose end the coordinate has passed without ever
    /// matching its begin; its surface text was normalized away. Passing a
    /// token's end while its wrapper is still open means the coordinate
    /// systems have diverged inside the token.
    fn discard_overrun_token(&mut self) -> Result<()> {
        let overrun = self
            .queue
            .peek()
            .is_some_and(|token| self.coordinate > token.end);
        if !overrun {
            return Ok(());
        }
        if let WrapperState::Inside(_) = self.state {
            return Err(CoreError::AlignmentDrift {
                coordinate: self.coordinate,
                reason: "wrapper still open past its token's end".into(),
            });
        }
        self.queue.poll();
        Ok(())
    }

    fn finish(self) -> Result<AlignedBody> {
        if let WrapperState::Inside(span_index) = self.state {
            return Err(CoreError::AlignmentDrift {
                coordinate: self.coordinate,
                reason: format!(
                    "wrapper t{} left open at end of text region",
                    self.spans[span_index]
                        .span
                        .ids
                        .last()
                        .copied()
                        .unwrap_or_default()
                ),
            });
        }
        if let Some(token) = self.queue.peek() {
            return Err(CoreError::AlignmentDrift {
                coordinate: self.coordinate,
                reason: format!(
                    "{} token(s) still pending, next begins at {}",
                    self.queue.len(),
                    token.begin
                ),
            });
        }
        Ok(AlignedBody {
            body: self.out,
            morphology: self.spans,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LexicalToken;

    fn queue(tokens: &[(&str, usize, usize)]) -> TokenQueue {
        tokens
            .iter()
            .map(|&(lemma, begin, end)| LexicalToken::new("N", lemma, begin, end))
            .collect()
    }

    fn align(text: &str, body: &str, tokens: &[(&str, usize, usize)]) -> AlignedBody {
        MarkupAligner::new(text, body, queue(tokens)).align().unwrap()
    }

    #[test]
    fn locate_splits_plain_text_marker() {
        let document = "<?xml version=\"1.0\"?>\n<TEI xmlns=\"x\">\n<teiHeader/>\n<text>\n<body>du texte</body>\n</text>\n</TEI>";
        let region = TextRegion::locate(document).unwrap();
        assert_eq!(region.preamble, "<?xml version=\"1.0\"?>\n<TEI xmlns=\"x\">\n<teiHeader/>\n");
        assert_eq!(region.body, "<text>\n<body>du texte</body>\n</text>");
        assert_eq!(region.postamble, "\n</TEI>");
    }

    #[test]
    fn locate_accepts_attributes_on_the_marker() {
        let document = "<teiHeader/><text xml:id=\"pas fraiche du tout\"><p>x</p></text><back/>";
        let region = TextRegion::locate(document).unwrap();
        assert_eq!(region.body, "<text xml:id=\"pas fraiche du tout\"><p>x</p></text>");
        assert_eq!(region.postamble, "<back/>");
    }

    #[test]
    fn locate_skips_lookalike_elements() {
        let document = "<textLang>fr</textLang><text>x</text>";
        let region = TextRegion::locate(document).unwrap();
        assert_eq!(region.preamble, "<textLang>fr</textLang>");
        assert_eq!(region.body, "<text>x</text>");
    }

    #[test]
    fn locate_without_boundary_fails() {
        assert!(matches!(
            TextRegion::locate("<TEI><teiHeader/></TEI>"),
            Err(CoreError::MissingTextBoundary)
        ));
    }

    #[test]
    fn wraps_every_token_in_flat_text() {
        let aligned = align(
            "le chien mange des pommes",
            "<text>le chien mange des pommes</text>",
            &[
                ("le", 0, 2),
                ("chien", 3, 8),
                ("mange", 9, 14),
                ("des", 15, 18),
                ("pommes", 19, 25),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <w xml:id=\"t1\">le</w> \
             <w xml:id=\"t2\">chien</w> \
             <w xml:id=\"t3\">mange</w> \
             <w xml:id=\"t4\">des</w> \
             <w xml:id=\"t5\">pommes</w>\
             </text>"
        );
        let ids: Vec<_> = aligned
            .morphology
            .iter()
            .map(|m| m.span.ids.as_slice().to_vec())
            .collect();
        assert_eq!(ids, vec![vec![1], vec![2], vec![3], vec![4], vec![5]]);
    }

    #[test]
    fn nested_tags_split_tokens_into_fragments() {
        let aligned = align(
            "le chien mange des pommes",
            "<text>le <hi>chi</hi><hi>en</hi> mange de<s>s</s> <hi>pommes</hi></text>",
            &[
                ("le", 0, 2),
                ("chien", 3, 8),
                ("mange", 9, 14),
                ("des", 15, 18),
                ("pommes", 19, 25),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <w xml:id=\"t1\">le</w> \
             <hi><w xml:id=\"t2\">chi</w></hi>\
             <hi><w xml:id=\"t3\">en</w></hi> \
             <w xml:id=\"t4\">mange</w> \
             <w xml:id=\"t5\">de</w>\
             <s><w xml:id=\"t6\">s</w></s> \
             <hi><w xml:id=\"t7\">pommes</w></hi>\
             </text>"
        );
        let spans: Vec<_> = aligned
            .morphology
            .iter()
            .map(|m| (m.span.begin, m.span.end, m.span.ids.as_slice().to_vec()))
            .collect();
        assert_eq!(
            spans,
            vec![
                (0, 2, vec![1]),
                (3, 8, vec![2, 3]),
                (9, 14, vec![4]),
                (15, 18, vec![5, 6]),
                (19, 25, vec![7]),
            ]
        );
    }

    #[test]
    fn deeply_nested_clusters_keep_ids_monotonic() {
        let aligned = align(
            "le chien mange des (bonnes) pommes",
            "<text>le <hi>chi</hi><hi>en</hi> mange de<s>s</s> <hi>(bonnes<hi>)</hi> pommes</hi></text>",
            &[
                ("le", 0, 2),
                ("chien", 3, 8),
                ("mange", 9, 14),
                ("des", 15, 18),
                ("(", 19, 20),
                ("bonnes", 20, 26),
                (")", 26, 27),
                ("pommes", 28, 34),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <w xml:id=\"t1\">le</w> \
             <hi><w xml:id=\"t2\">chi</w></hi>\
             <hi><w xml:id=\"t3\">en</w></hi> \
             <w xml:id=\"t4\">mange</w> \
             <w xml:id=\"t5\">de</w>\
             <s><w xml:id=\"t6\">s</w></s> \
             <hi><w xml:id=\"t7\">(</w>\
             <w xml:id=\"t8\">bonnes</w>\
             <hi><w xml:id=\"t9\">)</w></hi> \
             <w xml:id=\"t10\">pommes</w></hi>\
             </text>"
        );
    }

    #[test]
    fn comments_pass_through_like_tags() {
        let aligned = align(
            "le chien mange des pommes",
            "<text>le<!--testtest--> <hi>chi</hi>en \
             <!--test-->mange de<s>s</s><!--lalalal--><!--test--> \
             <hi>pommes</hi><!--lalala--></text>",
            &[
                ("le", 0, 2),
                ("chien", 3, 8),
                ("mange", 9, 14),
                ("des", 15, 18),
                ("pommes", 19, 25),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <w xml:id=\"t1\">le</w><!--testtest--> \
             <hi><w xml:id=\"t2\">chi</w></hi>\
             <w xml:id=\"t3\">en</w> \
             <!--test--><w xml:id=\"t4\">mange</w> \
             <w xml:id=\"t5\">de</w>\
             <s><w xml:id=\"t6\">s</w></s><!--lalalal--><!--test--> \
             <hi><w xml:id=\"t7\">pommes</w></hi><!--lalala-->\
             </text>"
        );
    }

    #[test]
    fn text_without_tokens_passes_through_unchanged() {
        let body = "le &amp; &amp; chi&eacute;ien ma&diams;nge des pommes&amp;";
        let aligned = align(body, body, &[]);
        assert_eq!(aligned.body, body);
        assert!(aligned.morphology.is_empty());
    }

    #[test]
    fn entity_references_count_as_one_coordinate() {
        let aligned = align(
            "le &amp; &amp; chi&eacute;ien ma&diams;nge &diams;des pommes&amp;",
            "<text>le &amp; &amp; chi&eacute;ien ma&diams;nge &diams;des pommes&amp;</text>",
            &[
                ("le", 0, 2),
                ("&amp;", 3, 4),
                ("&amp;", 5, 6),
                ("chien", 7, 14),
                ("mange", 15, 21),
                ("des", 22, 26),
                ("pommes", 27, 34),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <w xml:id=\"t1\">le</w> \
             <w xml:id=\"t2\">&amp;</w> \
             <w xml:id=\"t3\">&amp;</w> \
             <w xml:id=\"t4\">chi&eacute;ien</w> \
             <w xml:id=\"t5\">ma&diams;nge</w> \
             <w xml:id=\"t6\">&diams;des</w> \
             <w xml:id=\"t7\">pommes&amp;</w>\
             </text>"
        );
    }

    #[test]
    fn entities_and_tags_interleave() {
        let aligned = align(
            "le &amp; &amp; chi&eacute;ien ma&diams;&diams;nge &diams;des pommes&amp;",
            "<text><hi>le</hi> &amp; &amp; <hi>chi</hi>&eacute;ien \
             <hi>ma</hi><sub>&diams;&diams;</sub><sub>nge</sub> \
             <sub>&diams;d</sub>es \
             <hi>pommes&amp;</hi>\
             </text>",
            &[
                ("le", 0, 2),
                ("&amp;", 3, 4),
                ("&amp;", 5, 6),
                ("chien", 7, 14),
                ("mange", 15, 22),
                ("des", 23, 27),
                ("pommes", 28, 35),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <hi><w xml:id=\"t1\">le</w></hi> \
             <w xml:id=\"t2\">&amp;</w> \
             <w xml:id=\"t3\">&amp;</w> \
             <hi><w xml:id=\"t4\">chi</w></hi>\
             <w xml:id=\"t5\">&eacute;ien</w> \
             <hi><w xml:id=\"t6\">ma</w></hi>\
             <sub><w xml:id=\"t7\">&diams;&diams;</w></sub>\
             <sub><w xml:id=\"t8\">nge</w></sub> \
             <sub><w xml:id=\"t9\">&diams;d</w></sub>\
             <w xml:id=\"t10\">es</w> \
             <hi><w xml:id=\"t11\">pommes&amp;</w></hi>\
             </text>"
        );
    }

    #[test]
    fn extraction_newlines_are_skipped() {
        let aligned = align(
            "le chien\nmange un fromage assez\n\ndélicieux  \n\n\n\n<",
            "<text><head>le chien</head><p>mange \
             <div>un froma<sup>ge</sup> assez\
             </div></p><p>d&eacute;licieux  </p>\n\n\n&lt;</text>",
            &[
                ("le", 0, 2),
                ("chien", 3, 8),
                ("mange", 9, 14),
                ("un", 15, 17),
                ("fromage", 18, 25),
                ("assez", 26, 31),
                ("délicieux", 33, 42),
                ("<", 48, 49),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <head><w xml:id=\"t1\">le</w> \
             <w xml:id=\"t2\">chien</w></head>\
             <p><w xml:id=\"t3\">mange</w> \
             <div><w xml:id=\"t4\">un</w> \
             <w xml:id=\"t5\">froma</w>\
             <sup><w xml:id=\"t6\">ge</w></sup> \
             <w xml:id=\"t7\">assez</w></div></p>\
             <p><w xml:id=\"t8\">d&eacute;licieux</w>  </p>\n\n\n\
             <w xml:id=\"t9\">&lt;</w>\
             </text>"
        );
        let spans: Vec<_> = aligned
            .morphology
            .iter()
            .map(|m| (m.span.begin, m.span.end, m.span.ids.as_slice().to_vec()))
            .collect();
        assert_eq!(
            spans,
            vec![
                (0, 2, vec![1]),
                (3, 8, vec![2]),
                (9, 14, vec![3]),
                (15, 17, vec![4]),
                (18, 25, vec![5, 6]),
                (26, 31, vec![7]),
                (33, 42, vec![8]),
                (48, 49, vec![9]),
            ]
        );
    }

    #[test]
    fn escaped_markup_characters_align_as_text() {
        let aligned = align(
            "le chien\nmange \n< fromage assez\n\ndélicieux  \n\n\n\n",
            "<text><head>le chien</head><p>mange \
             <div>&lt; froma<sup>ge</sup> assez\
             </div></p><p>d&eacute;licieux  </p>\n\n\n</text>",
            &[
                ("le", 0, 2),
                ("chien", 3, 8),
                ("mange", 9, 14),
                ("<", 16, 17),
                ("fromage", 18, 25),
                ("assez", 26, 31),
                ("délicieux", 33, 42),
            ],
        );
        assert_eq!(
            aligned.body,
            "<text>\
             <head><w xml:id=\"t1\">le</w> \
             <w xml:id=\"t2\">chien</w></head>\
             <p><w xml:id=\"t3\">mange</w> \
             <div><w xml:id=\"t4\">&lt;</w> \
             <w xml:id=\"t5\">froma</w>\
             <sup><w xml:id=\"t6\">ge</w></sup> \
             <w xml:id=\"t7\">assez</w></div></p>\
             <p><w xml:id=\"t8\">d&eacute;licieux</w>  </p>\n\n\n\
             </text>"
        );
    }

    #[test]
    fn lemma_and_tag_travel_with_the_span() {
        let tokens: TokenQueue = [
            LexicalToken::new("D", "le", 0, 2),
            LexicalToken::new("N", "chien", 3, 8),
        ]
        .into_iter()
        .collect();
        let aligned = MarkupAligner::new("le chien", "<text>le chien</text>", tokens)
            .align()
            .unwrap();
        assert_eq!(aligned.morphology[0].lemma, "le");
        assert_eq!(aligned.morphology[0].tag, "D");
        assert_eq!(aligned.morphology[1].lemma, "chien");
        assert_eq!(aligned.morphology[1].tag, "N");
    }

    #[test]
    fn token_beyond_text_end_is_alignment_drift() {
        let err = MarkupAligner::new(
            "le chien",
            "<text>le chien</text>",
            queue(&[("le", 0, 2), ("chien", 3, 8), ("pommes", 9, 15)]),
        )
        .align()
        .unwrap_err();
        assert!(matches!(err, CoreError::AlignmentDrift { .. }));
    }

    #[test]
    fn wrapper_open_at_region_end_is_alignment_drift() {
        // the token claims more text than the region holds
        let err = MarkupAligner::new(
            "le chienne",
            "<text>le chien</text>",
            queue(&[("le", 0, 2), ("chienne", 3, 10)]),
        )
        .align()
        .unwrap_err();
        assert!(matches!(err, CoreError::AlignmentDrift { .. }));
    }

    #[test]
    fn truncated_tag_is_alignment_drift() {
        let err = MarkupAligner::new("x", "<text>x</tex", queue(&[]))
            .align()
            .unwrap_err();
        assert!(matches!(err, CoreError::AlignmentDrift { .. }));
    }

    #[test]
    fn token_inside_normalized_gap_is_discarded() {
        // the analyzer tokenized a newline run the markup renders as a
        // space; the token covering it can never match a coordinate and is
        // dropped once its end is passed, without failing the run
        let aligned = align(
            "le\n\n\nchien",
            "<text>le chien</text>",
            &[("le", 0, 2), ("\n", 3, 4), ("chien", 5, 10)],
        );
        assert_eq!(aligned.body, "<text><w xml:id=\"t1\">le</w> chien</text>");
        assert_eq!(aligned.morphology.len(), 1);
        assert_eq!(aligned.morphology[0].span.ids.as_slice(), &[1]);
    }
}
