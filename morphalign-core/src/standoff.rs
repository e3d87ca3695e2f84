//! Standoff block rendering and final document assembly
//!
//! Each non-empty annotation layer becomes one standoff block referencing
//! the inline wrapper markers by id. The final document is the unchanged
//! preamble (with the standoff namespace injected into the root tag), the
//! standoff blocks, the wrapped body, and the unchanged postamble.

use crate::aligner::TextRegion;
use crate::error::Result;
use crate::escape::{escape_lemma, escape_xml};
use crate::span::{MorphologySpan, TermSpan};
use std::fs;
use std::path::Path;

const STANDOFF_NS: &str = r#"xmlns:ns="http://standoff.proposal""#;

const STANDOFF_OPEN: &str = "  <ns:standOff type=\"@type\">\n";
const STANDOFF_CLOSE: &str = "  </ns:standOff>\n";
const LIST_ANNOTATION_OPEN: &str = "    <ns:listAnnotation>\n";
const LIST_ANNOTATION_CLOSE: &str = "    </ns:listAnnotation>\n";

const MORPHOLOGY_HEADER: &str = "    <teiHeader>
      <encodingDesc>
        <appInfo>
          <application ident=\"morphalign\">
            <label>morphosyntactic analysis</label>
          </application>
        </appInfo>
      </encodingDesc>
    </teiHeader>\n";

const TERMINOLOGY_HEADER: &str = "    <teiHeader>
      <encodingDesc>
        <appInfo>
          <application ident=\"morphalign\">
            <label>terminology candidates</label>
          </application>
        </appInfo>
      </encodingDesc>
    </teiHeader>\n";

const PHRASEOLOGY_HEADER: &str = "    <teiHeader>
      <encodingDesc>
        <appInfo>
          <application ident=\"morphalign\">
            <label>phraseological units</label>
          </application>
        </appInfo>
      </encodingDesc>
    </teiHeader>\n";

const MORPHOLOGY_SPAN: &str =
    "      <tei:span target=\"@target\" lemma=\"@lemma\" pos=\"@pos\"/>\n";
const TERM_SPAN: &str =
    "      <tei:span target=\"@target\" corresp=\"#@corresp\" string=\"@string\"/>\n";

/// Rendering templates for the standoff blocks, shared read-only across
/// workers. `@`-prefixed placeholders are substituted per span.
#[derive(Debug, Clone)]
pub struct StandoffTemplates {
    /// Namespace attribute injected into the root element start tag
    pub namespace: String,
    /// Block open tag; `@type` names the annotation layer
    pub standoff_open: String,
    /// Block close tag
    pub standoff_close: String,
    /// Annotation list open tag
    pub list_open: String,
    /// Annotation list close tag
    pub list_close: String,
    /// Header block for the morphology layer
    pub morphology_header: String,
    /// Header block for the terminology layer
    pub terminology_header: String,
    /// Header block for the phraseology layer
    pub phraseology_header: String,
    /// Span element for the morphology layer; `@target`, `@lemma`, `@pos`
    pub morphology_span: String,
    /// Span element for the term layers; `@target`, `@corresp`, `@string`
    pub term_span: String,
}

impl Default for StandoffTemplates {
    fn default() -> Self {
        Self {
            namespace: STANDOFF_NS.to_string(),
            standoff_open: STANDOFF_OPEN.to_string(),
            standoff_close: STANDOFF_CLOSE.to_string(),
            list_open: LIST_ANNOTATION_OPEN.to_string(),
            list_close: LIST_ANNOTATION_CLOSE.to_string(),
            morphology_header: MORPHOLOGY_HEADER.to_string(),
            terminology_header: TERMINOLOGY_HEADER.to_string(),
            phraseology_header: PHRASEOLOGY_HEADER.to_string(),
            morphology_span: MORPHOLOGY_SPAN.to_string(),
            term_span: TERM_SPAN.to_string(),
        }
    }
}

/// The accumulated span lists of one alignment run, one per layer.
#[derive(Debug, Default, Clone)]
pub struct AnnotationLayers {
    /// Word-form spans produced by the aligner
    pub morphology: Vec<MorphologySpan>,
    /// Term candidate occurrences projected onto wrapper ids
    pub terminology: Vec<TermSpan>,
    /// Multi-word unit occurrences projected onto wrapper ids
    pub phraseology: Vec<TermSpan>,
}

impl AnnotationLayers {
    /// Layers holding only the aligner's morphology output
    pub fn morphology_only(morphology: Vec<MorphologySpan>) -> Self {
        Self {
            morphology,
            ..Self::default()
        }
    }
}

/// Substitute the first occurrence of each placeholder.
fn render_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (placeholder, value) in substitutions {
        if let Some(at) = out.find(placeholder) {
            out.replace_range(at..at + placeholder.len(), value);
        }
    }
    out
}

/// Converts accumulated span lists into standoff blocks and splices them
/// with the wrapped body back into a single output document.
pub struct StandoffSerializer<'a> {
    templates: &'a StandoffTemplates,
}

impl<'a> StandoffSerializer<'a> {
    /// Create a serializer over shared templates
    pub fn new(templates: &'a StandoffTemplates) -> Self {
        Self { templates }
    }

    /// Assemble the final annotated document.
    pub fn render(&self, region: &TextRegion, body: &str, layers: &AnnotationLayers) -> String {
        let mut out = String::with_capacity(region.preamble.len() + body.len() + 1024);
        self.push_preamble(&mut out, region.preamble);
        if !layers.morphology.is_empty() {
            self.push_morphology(&mut out, &layers.morphology);
        }
        if !layers.terminology.is_empty() {
            self.push_terms(
                &mut out,
                &layers.terminology,
                "candidatsTermes",
                &self.templates.terminology_header,
            );
        }
        if !layers.phraseology.is_empty() {
            self.push_terms(
                &mut out,
                &layers.phraseology,
                "phraseology",
                &self.templates.phraseology_header,
            );
        }
        out.push_str(body);
        out.push('\n');
        out.push_str(region.postamble);
        out
    }

    /// Assemble and write the document, atomically: the content goes to a
    /// temporary sibling first and is renamed into place, so a failed
    /// write never leaves a partial output file behind.
    pub fn write(
        &self,
        path: &Path,
        region: &TextRegion,
        body: &str,
        layers: &AnnotationLayers,
    ) -> Result<()> {
        let document = self.render(region, body, layers);
        let tmp = path.with_extension("xml.tmp");
        let written = fs::write(&tmp, document.as_bytes()).and_then(|()| fs::rename(&tmp, path));
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        Ok(written?)
    }

    /// Copy the preamble, injecting the standoff namespace into the root
    /// element's start tag when one is present.
    fn push_preamble(&self, out: &mut String, preamble: &str) {
        const ROOT_TAG: &str = "<TEI ";
        match preamble.find(ROOT_TAG) {
            Some(at) => {
                let insert = at + ROOT_TAG.len();
                out.push_str(&preamble[..insert]);
                out.push_str(&self.templates.namespace);
                out.push(' ');
                out.push_str(&preamble[insert..]);
            }
            None => out.push_str(preamble),
        }
    }

    fn push_morphology(&self, out: &mut String, morphology: &[MorphologySpan]) {
        let mut ordered: Vec<&MorphologySpan> = morphology.iter().collect();
        ordered.sort_by(|a, b| a.span.standoff_order(&b.span));

        out.push_str(&render_template(
            &self.templates.standoff_open,
            &[("@type", "wordForms")],
        ));
        out.push_str(&self.templates.morphology_header);
        out.push_str(&self.templates.list_open);
        for span in ordered {
            out.push_str(&render_template(
                &self.templates.morphology_span,
                &[
                    ("@target", &span.span.target()),
                    ("@lemma", &escape_lemma(&span.lemma)),
                    ("@pos", &span.tag),
                ],
            ));
        }
        out.push_str(&self.templates.list_close);
        out.push_str(&self.templates.standoff_close);
    }

    fn push_terms(&self, out: &mut String, terms: &[TermSpan], layer: &str, header: &str) {
        let mut ordered: Vec<&TermSpan> = terms.iter().collect();
        ordered.sort_by(|a, b| a.span.standoff_order(&b.span));

        out.push_str(&render_template(
            &self.templates.standoff_open,
            &[("@type", layer)],
        ));
        out.push_str(header);
        out.push_str(&self.templates.list_open);
        for term in ordered {
            out.push_str(&render_template(
                &self.templates.term_span,
                &[
                    ("@target", &term.span.target()),
                    ("@corresp", &term.term_id.to_string()),
                    ("@string", &escape_xml(&term.word)),
                ],
            ));
        }
        out.push_str(&self.templates.list_close);
        out.push_str(&self.templates.standoff_close);
    }
}
