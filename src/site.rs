//! Site classification
//!
//! Maps a URL to the family of site it belongs to. The family decides which
//! extractor runs and the fixed attribution stored with each record.

use std::fmt;
use url::Url;

/// Host marker for Hebrew Wikipedia
pub const ENCYCLOPEDIA_HOST: &str = "he.wikipedia.org";

/// Host marker for the Yizkor memorial site
pub const MEMORIAL_HOST: &str = "izkor.gov.il";

/// Known site families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteFamily {
    /// Encyclopedia articles (Hebrew Wikipedia)
    Encyclopedia,
    /// Memorial biographies (Yizkor)
    Memorial,
    /// Anything else
    Unknown,
}

impl SiteFamily {
    /// Author stored with every record of this family
    pub fn author(self) -> Option<&'static str> {
        match self {
            SiteFamily::Encyclopedia => Some("Wikipedia contributors"),
            SiteFamily::Memorial => Some("אתר יזכור"),
            SiteFamily::Unknown => None,
        }
    }

    /// Category stored with every record of this family
    pub fn category(self) -> Option<&'static str> {
        match self {
            SiteFamily::Encyclopedia => Some("PastBattles"),
            SiteFamily::Memorial => Some("FallenSoldiers"),
            SiteFamily::Unknown => None,
        }
    }
}

impl fmt::Display for SiteFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SiteFamily::Encyclopedia => "encyclopedia",
            SiteFamily::Memorial => "memorial",
            SiteFamily::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classify a URL by its host. Never fails: unparsable URLs are `Unknown`.
pub fn classify(url: &str) -> SiteFamily {
    let host = match Url::parse(url.trim()) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_lowercase(),
            None => return SiteFamily::Unknown,
        },
        Err(_) => return SiteFamily::Unknown,
    };

    if host.contains(ENCYCLOPEDIA_HOST) {
        SiteFamily::Encyclopedia
    } else if host.contains(MEMORIAL_HOST) {
        SiteFamily::Memorial
    } else {
        SiteFamily::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_encyclopedia() {
        assert_eq!(
            classify("https://he.wikipedia.org/wiki/מלחמת_העצמאות"),
            SiteFamily::Encyclopedia
        );
        assert_eq!(
            classify("https://HE.Wikipedia.ORG/wiki/Test"),
            SiteFamily::Encyclopedia
        );
    }

    #[test]
    fn test_classify_memorial() {
        assert_eq!(
            classify("https://www.izkor.gov.il/HallenHeroes/Details/123456"),
            SiteFamily::Memorial
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("https://en.wikipedia.org/wiki/Test"), SiteFamily::Unknown);
        assert_eq!(classify("https://example.com/izkor.gov.il"), SiteFamily::Unknown);
        assert_eq!(classify("not a url"), SiteFamily::Unknown);
        assert_eq!(classify(""), SiteFamily::Unknown);
    }

    #[test]
    fn test_fixed_attribution() {
        assert_eq!(SiteFamily::Encyclopedia.category(), Some("PastBattles"));
        assert_eq!(SiteFamily::Memorial.author(), Some("אתר יזכור"));
        assert_eq!(SiteFamily::Unknown.author(), None);
    }
}
