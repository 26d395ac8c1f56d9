//! Memorial biography extraction
//!
//! Yizkor pages are rendered client-side and their markup shifts between
//! deployments, so both the name and the life story are located by a
//! cascade that starts precise and ends heuristic.

use crate::document::ParsedDocument;
use crate::error::ExtractionError;
use crate::record::Record;
use crate::site::SiteFamily;
use crate::text::{char_len, normalize};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, instrument, warn};

/// Name selectors, highest priority first
const TITLE_SELECTORS: &[&str] = &["h1", ".soldier-name", "[class*=\"name\"]", "h2", ".title"];

/// Life-story containers, from the exact rendered layout down to loose class matches
const STORY_SELECTORS: &[&str] = &[
    "app-root div:nth-child(2) worldpresentationcomponent div:nth-child(2) div:nth-child(3) div div div:nth-child(3) div:nth-child(2) world-life-story-component div div:nth-child(2)",
    "world-life-story-component div div:nth-child(2)",
    "world-life-story-component .life-story",
    "[class*=\"life-story\"]",
    "[class*=\"story\"]",
];

/// Section captions that precede the life story
const STORY_KEYWORDS: &[&str] = &["סיפור חייו", "סיפור החיים", "קורות חיים", "ביוגרפיה"];

const MIN_SELECTOR_CHARS: usize = 50;
const MIN_BLOCK_CHARS: usize = 100;

fn site_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*-\s*(יזכור|אתר יזכור).*$").expect("valid suffix pattern"))
}

/// Ways of locating the life story, tried in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryStrategy {
    /// Known structural paths, precise to loose
    StructuralSelectors,
    /// The block following a biographical section caption
    KeywordAnchor,
    /// The longest standalone paragraph or div
    LongestBlock,
}

impl StoryStrategy {
    /// Every strategy, in the order they are attempted
    pub const CASCADE: [StoryStrategy; 3] = [
        StoryStrategy::StructuralSelectors,
        StoryStrategy::KeywordAnchor,
        StoryStrategy::LongestBlock,
    ];

    /// Run this strategy against the page
    pub fn locate(self, doc: &ParsedDocument) -> Result<Option<String>, ExtractionError> {
        match self {
            StoryStrategy::StructuralSelectors => by_structure(doc),
            StoryStrategy::KeywordAnchor => Ok(by_keyword(doc)),
            StoryStrategy::LongestBlock => by_longest_block(doc),
        }
    }
}

fn by_structure(doc: &ParsedDocument) -> Result<Option<String>, ExtractionError> {
    for selector in STORY_SELECTORS {
        if let Some(id) = doc.select_first(selector)? {
            let text = normalize(&doc.text(id));
            if char_len(&text) > MIN_SELECTOR_CHARS {
                debug!("Story matched selector {}", selector);
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

fn by_keyword(doc: &ParsedDocument) -> Option<String> {
    for keyword in STORY_KEYWORDS {
        for text_node in doc.text_nodes_containing(keyword) {
            let Some(caption) = doc.parent(text_node) else {
                continue;
            };
            for sibling in doc.next_element_siblings(caption) {
                let text = normalize(&doc.text(sibling));
                if char_len(&text) > MIN_BLOCK_CHARS {
                    debug!("Story found after keyword {}", keyword);
                    return Some(text);
                }
            }
        }
    }
    None
}

/// Only elements whose content is a single string count as blocks, so
/// layout wrappers around the whole page never win.
fn by_longest_block(doc: &ParsedDocument) -> Result<Option<String>, ExtractionError> {
    let mut longest: Option<(usize, String)> = None;
    for id in doc.select_all("p, div")? {
        let Some(raw) = doc.sole_string(id) else {
            continue;
        };
        let text = normalize(&raw);
        let len = char_len(&text);
        if len > MIN_BLOCK_CHARS && longest.as_ref().map_or(true, |(best, _)| len > *best) {
            longest = Some((len, text));
        }
    }
    Ok(longest.map(|(_, text)| text))
}

fn resolve_title(doc: &ParsedDocument) -> Result<String, ExtractionError> {
    for selector in TITLE_SELECTORS {
        if let Some(id) = doc.select_first(selector)? {
            let title = normalize(&doc.text(id));
            if !title.is_empty() {
                return Ok(title);
            }
        }
    }

    let fallback = doc
        .select_first("title")?
        .map(|id| normalize(&doc.text(id)))
        .unwrap_or_default();
    Ok(site_suffix_re().replace(&fallback, "").into_owned())
}

/// Extract a record from a memorial page, or `None` when no name or life
/// story can be found.
#[instrument(skip(doc))]
pub fn extract_memorial(doc: &mut ParsedDocument) -> Option<Record> {
    match try_extract(doc) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Memorial extraction failed: {}", e);
            None
        }
    }
}

pub(crate) fn try_extract(doc: &mut ParsedDocument) -> Result<Record, ExtractionError> {
    if let Some(id) = doc.select_first("title")? {
        debug!("Page title tag content: {}", doc.text(id).trim());
    }
    debug!(
        "First 500 chars of page: {}",
        doc.full_text().chars().take(500).collect::<String>()
    );

    let title = resolve_title(doc)?;
    if title.is_empty() {
        return Err(ExtractionError::NoTitleFound);
    }

    for strategy in StoryStrategy::CASCADE {
        if let Some(content) = strategy.locate(doc)? {
            info!(
                "Life story located via {:?}, {} characters",
                strategy,
                char_len(&content)
            );
            return Ok(Record::for_family(SiteFamily::Memorial, title, content));
        }
    }

    Err(ExtractionError::NoContentFound)
}
