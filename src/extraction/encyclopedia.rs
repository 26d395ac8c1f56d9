//! Encyclopedia article extraction
//!
//! Pulls the article body out of a Hebrew Wikipedia page: boilerplate
//! containers are detached first, then the "see also" / "external links"
//! sections, and whatever paragraph-like text remains becomes the content.

use crate::document::{NodeId, ParsedDocument};
use crate::error::ExtractionError;
use crate::record::Record;
use crate::site::SiteFamily;
use crate::text::{char_len, normalize};
use tracing::{debug, info, instrument, warn};

const TITLE_SELECTOR: &str = "h1#firstHeading";
const CONTENT_SELECTOR: &str = "div#mw-content-text";

/// Subtrees removed from the content container before collecting text
const DENYLIST: &[&str] = &[
    ".navbox",
    ".infobox",
    ".thumbcaption",
    ".reference",
    ".reflist",
    ".mw-editsection",
    "table",
    ".ambox",
    ".hatnote",
    "sup.reference",
];

/// Heading texts whose whole section is dropped
const EXCLUDED_SECTIONS: &[&str] = &["ראו גם", "קישורים חיצוניים"];

/// Ancestor classes that disqualify a paragraph-like node
const BLOCKED_ANCESTOR_CLASSES: &[&str] = &["navbox", "infobox", "reflist", "ambox"];

/// Class substrings that disqualify a div's direct text
const BLOCKED_DIV_CLASSES: &[&str] = &["navbox", "infobox", "reflist", "ambox", "hatnote"];

const MIN_BLOCK_CHARS: usize = 10;
const MIN_DIV_CHARS: usize = 30;

/// Extract a record from an encyclopedia article, or `None` when the page
/// does not have the expected shape.
#[instrument(skip(doc))]
pub fn extract_encyclopedia(doc: &mut ParsedDocument) -> Option<Record> {
    match try_extract(doc) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Encyclopedia extraction failed: {}", e);
            None
        }
    }
}

pub(crate) fn try_extract(doc: &mut ParsedDocument) -> Result<Record, ExtractionError> {
    let title = doc
        .select_first(TITLE_SELECTOR)?
        .map(|id| normalize(&doc.text(id)))
        .unwrap_or_default();
    if title.is_empty() {
        return Err(ExtractionError::NoTitleFound);
    }

    let content_root = doc
        .select_first(CONTENT_SELECTOR)?
        .ok_or(ExtractionError::NoContentContainer)?;

    remove_denylisted(doc, content_root)?;
    remove_excluded_sections(doc, content_root)?;

    let parts = collect_text(doc, content_root)?;
    let content = parts.join(" ");

    info!(
        "Extracted {} content parts, total length: {} characters",
        parts.len(),
        char_len(&content)
    );

    if content.is_empty() {
        return Err(ExtractionError::NoContentFound);
    }

    Ok(Record::for_family(SiteFamily::Encyclopedia, title, content))
}

fn remove_denylisted(doc: &mut ParsedDocument, root: NodeId) -> Result<(), ExtractionError> {
    let mut doomed = Vec::new();
    for selector in DENYLIST {
        doomed.extend(doc.select_within(root, selector)?);
    }
    debug!("Removing {} boilerplate subtrees", doomed.len());
    for id in doomed {
        doc.detach(id);
    }
    Ok(())
}

/// Heading level of a node: `h2`..`h6` directly, or a `div.mw-heading`
/// wrapper taking the level of the heading inside it.
fn heading_level(doc: &ParsedDocument, id: NodeId) -> Option<u8> {
    match doc.tag_name(id) {
        Some("div") if doc.has_class(id, "mw-heading") => doc
            .element_children(id)
            .into_iter()
            .find_map(|child| tag_level(doc.tag_name(child)?)),
        Some(tag) => tag_level(tag),
        None => None,
    }
}

fn tag_level(tag: &str) -> Option<u8> {
    let bytes = tag.as_bytes();
    if bytes.len() == 2 && bytes[0] == b'h' && bytes[1].is_ascii_digit() {
        Some(bytes[1] - b'0')
    } else {
        None
    }
}

fn heading_text(doc: &ParsedDocument, heading: NodeId) -> Result<String, ExtractionError> {
    let raw = match doc.select_first_within(heading, "span.mw-headline")? {
        Some(span) => doc.text(span),
        None => doc.text(heading),
    };
    Ok(normalize(&raw))
}

/// Drop every excluded section.
///
/// The first pass only computes which nodes go: the heading (or its
/// `mw-heading` wrapper) and all following siblings up to the next heading
/// of equal or shallower level. The second pass detaches them.
fn remove_excluded_sections(doc: &mut ParsedDocument, root: NodeId) -> Result<(), ExtractionError> {
    let headings = doc.select_within(root, "h2, h3, h4, h5, h6")?;

    let mut doomed = Vec::new();
    for heading in headings {
        let text = heading_text(doc, heading)?;
        if !EXCLUDED_SECTIONS.iter().any(|marker| text.contains(marker)) {
            continue;
        }

        let anchor = match doc.parent(heading) {
            Some(parent) if doc.has_class(parent, "mw-heading") => parent,
            _ => heading,
        };
        let Some(level) = heading_level(doc, anchor) else {
            continue;
        };

        debug!("Dropping section '{}' (h{})", text, level);
        doomed.push(anchor);
        for sibling in doc.next_siblings(anchor) {
            if heading_level(doc, sibling).is_some_and(|next| next <= level) {
                break;
            }
            doomed.push(sibling);
        }
    }

    for id in doomed {
        doc.detach(id);
    }
    Ok(())
}

fn has_blocked_ancestor(doc: &ParsedDocument, id: NodeId) -> bool {
    doc.ancestors(id).into_iter().any(|ancestor| {
        matches!(doc.tag_name(ancestor), Some("table") | Some("div"))
            && BLOCKED_ANCESTOR_CLASSES
                .iter()
                .any(|class| doc.has_class(ancestor, class))
    })
}

fn collect_text(doc: &ParsedDocument, root: NodeId) -> Result<Vec<String>, ExtractionError> {
    let mut parts = Vec::new();

    for block in doc.select_within(root, "p, li, dd, dt")? {
        if has_blocked_ancestor(doc, block) {
            continue;
        }
        let text = normalize(&doc.text(block));
        if char_len(&text) > MIN_BLOCK_CHARS {
            parts.push(text);
        }
    }

    for div in doc.select_within(root, "div")? {
        let classes = doc.class_string(div);
        if BLOCKED_DIV_CLASSES.iter().any(|skip| classes.contains(skip)) {
            continue;
        }
        let text = normalize(&doc.direct_text(div));
        if char_len(&text) > MIN_DIV_CHARS {
            parts.push(text);
        }
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> ParsedDocument {
        ParsedDocument::parse(&format!(
            r#"<html><body><h1 id="firstHeading">מבצע <span>יונתן</span>[1]</h1>
            <div id="mw-content-text">{}</div></body></html>"#,
            body
        ))
    }

    #[test]
    fn test_missing_title_fails() {
        let mut doc = ParsedDocument::parse(
            r#"<html><body><div id="mw-content-text"><p>Long enough paragraph text</p></div></body></html>"#,
        );
        assert!(matches!(try_extract(&mut doc), Err(ExtractionError::NoTitleFound)));
    }

    #[test]
    fn test_missing_container_fails() {
        let mut doc = ParsedDocument::parse(
            r#"<html><body><h1 id="firstHeading">Title</h1><p>Long enough paragraph text</p></body></html>"#,
        );
        assert!(matches!(
            try_extract(&mut doc),
            Err(ExtractionError::NoContentContainer)
        ));
        assert!(extract_encyclopedia(&mut doc).is_none());
    }

    #[test]
    fn test_empty_content_fails() {
        let mut doc = page("<p>short</p>");
        assert!(matches!(try_extract(&mut doc), Err(ExtractionError::NoContentFound)));
    }

    #[test]
    fn test_denylisted_boxes_removed() {
        let mut doc = page(
            r#"<table><tr><td><p>Table paragraph that is long</p></td></tr></table>
            <div class="navbox"><p>Navigation paragraph text</p></div>
            <p>Kept paragraph with content<sup class="reference">[2]</sup></p>"#,
        );
        let record = extract_encyclopedia(&mut doc).unwrap();
        assert_eq!(record.title, "מבצע יונתן");
        assert_eq!(record.content, "Kept paragraph with content");
        assert_eq!(record.author, "Wikipedia contributors");
        assert_eq!(record.category, "PastBattles");
    }

    #[test]
    fn test_nested_subsection_removed_with_parent_section() {
        let mut doc = page(
            r#"<p>Introduction paragraph text</p>
            <h2><span class="mw-headline">ראו גם</span></h2>
            <p>See also paragraph one</p>
            <h3>Nested subsection</h3>
            <p>Nested paragraph text here</p>
            <h2>היסטוריה</h2>
            <p>History paragraph text</p>"#,
        );
        let record = extract_encyclopedia(&mut doc).unwrap();
        assert!(record.content.contains("Introduction paragraph text"));
        assert!(record.content.contains("History paragraph text"));
        assert!(!record.content.contains("See also"));
        assert!(!record.content.contains("Nested paragraph"));
    }

    #[test]
    fn test_deeper_excluded_section_stops_at_shallower_heading() {
        let mut doc = page(
            r#"<h2>Background</h2>
            <h3>קישורים חיצוניים</h3>
            <li>An external link entry</li>
            <h2>Aftermath</h2>
            <p>Aftermath paragraph text</p>"#,
        );
        let record = extract_encyclopedia(&mut doc).unwrap();
        assert!(!record.content.contains("external link"));
        assert!(record.content.contains("Aftermath paragraph text"));
    }

    #[test]
    fn test_wrapped_headings() {
        let mut doc = page(
            r#"<p>Opening paragraph text</p>
            <div class="mw-heading mw-heading2"><h2>ראו גם</h2></div>
            <ul><li>Related article link</li></ul>
            <div class="mw-heading mw-heading2"><h2>Later</h2></div>
            <p>Closing paragraph text</p>"#,
        );
        let record = extract_encyclopedia(&mut doc).unwrap();
        assert!(!record.content.contains("Related article"));
        assert!(record.content.contains("Closing paragraph text"));
    }

    #[test]
    fn test_div_direct_text_collected() {
        let mut doc = page(
            r#"<div class="prose">Loose text sitting directly in a div block<p>Paragraph inside the div</p></div>
            <div class="hatnote">Hatnote text that should never appear anywhere</div>"#,
        );
        let record = extract_encyclopedia(&mut doc).unwrap();
        assert_eq!(
            record.content,
            "Paragraph inside the div Loose text sitting directly in a div block"
        );
    }
}
