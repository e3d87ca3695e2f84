//! XML attribute escaping for annotation payloads

use std::borrow::Cow;

/// Replace XML-special characters with entity references.
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Escape a lemma for use in a standoff attribute.
///
/// The analyzer reports tokens it cannot lemmatize as `<unknown>`; these
/// are rendered as `@unknown` rather than escaped markup.
pub fn escape_lemma(lemma: &str) -> Cow<'_, str> {
    if lemma.contains("<unknown>") {
        Cow::Owned(escape_xml(&lemma.replace("<unknown>", "@unknown")).into_owned())
    } else {
        escape_xml(lemma)
    }
}
