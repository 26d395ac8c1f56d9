//! The unit persisted per URL

use crate::site::SiteFamily;
use serde::Serialize;

/// Column order of the CSV store
pub const CSV_HEADERS: [&str; 4] = ["title", "content", "author", "category"];

/// One extracted page, ready for the CSV store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Page title or the soldier's name
    pub title: String,
    /// Extracted body text
    pub content: String,
    /// Fixed attribution of the site family
    pub author: String,
    /// Fixed category of the site family
    pub category: String,
}

impl Record {
    /// Build a record carrying the family's fixed author and category.
    pub fn for_family(family: SiteFamily, title: String, content: String) -> Self {
        Self {
            title,
            content,
            author: family.author().unwrap_or_default().to_string(),
            category: family.category().unwrap_or_default().to_string(),
        }
    }

    /// Names of the fields that are empty, in column order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        CSV_HEADERS
            .iter()
            .zip(self.fields())
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// A record is only written when every field is non-empty
    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Field values in column order
    pub fn fields(&self) -> [&str; 4] {
        [&self.title, &self.content, &self.author, &self.category]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_family_fills_attribution() {
        let record = Record::for_family(
            SiteFamily::Encyclopedia,
            "Title".to_string(),
            "Body".to_string(),
        );
        assert_eq!(record.author, "Wikipedia contributors");
        assert_eq!(record.category, "PastBattles");
        assert!(record.is_valid());
    }

    #[test]
    fn test_missing_fields_in_column_order() {
        let record = Record {
            title: String::new(),
            content: "body".to_string(),
            author: String::new(),
            category: "cat".to_string(),
        };
        assert_eq!(record.missing_fields(), vec!["title", "author"]);
        assert!(!record.is_valid());
    }
}
