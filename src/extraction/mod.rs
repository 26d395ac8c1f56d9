//! Content extraction module
//!
//! One extractor per site family. Both take the parsed page by mutable
//! reference: extraction may detach subtrees, so a document is good for a
//! single extraction only.

pub mod encyclopedia;
pub mod memorial;

pub use encyclopedia::extract_encyclopedia;
pub use memorial::{extract_memorial, StoryStrategy};

use crate::document::ParsedDocument;
use crate::record::Record;
use crate::site::SiteFamily;

/// Run the extractor matching `family`. `Unknown` never extracts.
pub fn extract(family: SiteFamily, doc: &mut ParsedDocument) -> Option<Record> {
    match family {
        SiteFamily::Encyclopedia => extract_encyclopedia(doc),
        SiteFamily::Memorial => extract_memorial(doc),
        SiteFamily::Unknown => None,
    }
}
