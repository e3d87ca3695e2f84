//! Full single-document pass: analyzer output to annotated document

use morphalign_core::{
    project_wrapper_ids, AnalyzerOutputReader, AnnotationLayers, MarkupAligner,
    StandoffSerializer, StandoffTemplates, TermRecord, TextRegion,
};

const DOCUMENT: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<TEI xmlns=\"http://www.tei-c.org/ns/1.0\" xml:lang=\"fr\">\n\
  <teiHeader>\n\
    <fileDesc>\n\
      <titleStmt>\n\
        <title/>\n\
      </titleStmt>\n\
    </fileDesc>\n\
  </teiHeader>\n\
  <text><body><p>le chien mange des pommes</p></body></text>\n\
</TEI>\n";

const PLAIN_TEXT: &str = "le chien mange des pommes";

const ANALYZER_OUTPUT: &str = r#"{
    "sdi": {"uri": "corpus/1"},
    "word_annotations": [
        {"tag": "DT", "lemma": "le", "begin": 0, "end": 2},
        {"tag": "NN", "lemma": "chien", "begin": 3, "end": 8},
        {"tag": "VVZ", "lemma": "manger", "begin": 9, "end": 14},
        {"tag": "DT", "lemma": "un", "begin": 15, "end": 18},
        {"tag": "NNS", "lemma": "pomme", "begin": 19, "end": 25}
    ]
}"#;

#[test]
fn analyzer_output_becomes_an_annotated_document() {
    let queue = AnalyzerOutputReader::new(ANALYZER_OUTPUT.as_bytes())
        .read()
        .unwrap();
    let region = TextRegion::locate(DOCUMENT).unwrap();
    let aligned = MarkupAligner::new(PLAIN_TEXT, region.body, queue)
        .align()
        .unwrap();

    assert_eq!(
        aligned.body,
        "<text><body><p>\
         <w xml:id=\"t1\">le</w> \
         <w xml:id=\"t2\">chien</w> \
         <w xml:id=\"t3\">mange</w> \
         <w xml:id=\"t4\">des</w> \
         <w xml:id=\"t5\">pommes</w>\
         </p></body></text>"
    );

    let terminology = project_wrapper_ids(
        &aligned.morphology,
        [TermRecord {
            begin: 3,
            end: 14,
            term_id: 7,
            word: "chien mange".into(),
        }],
    );
    let layers = AnnotationLayers {
        morphology: aligned.morphology,
        terminology,
        phraseology: Vec::new(),
    };

    let templates = StandoffTemplates::default();
    let document = StandoffSerializer::new(&templates).render(&region, &aligned.body, &layers);

    // namespace lands on the root element
    assert!(document.contains(
        "<TEI xmlns:ns=\"http://standoff.proposal\" xmlns=\"http://www.tei-c.org/ns/1.0\""
    ));
    // both layers serialize, morphology first
    let morphology_at = document.find("type=\"wordForms\"").unwrap();
    let terms_at = document.find("type=\"candidatsTermes\"").unwrap();
    let body_at = document.find("<w xml:id=\"t1\"").unwrap();
    assert!(morphology_at < terms_at);
    assert!(terms_at < body_at);
    assert!(document.contains("<tei:span target=\"#t3\" lemma=\"manger\" pos=\"VVZ\"/>"));
    assert!(document.contains(
        "<tei:span target=\"#t2 #t3\" corresp=\"#7\" string=\"chien mange\"/>"
    ));
    // preamble and postamble pass through
    assert!(document.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(document.ends_with("</text>\n\n</TEI>\n"));
}
