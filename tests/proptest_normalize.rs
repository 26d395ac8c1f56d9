//! Property-based testing for text normalization and site classification.
//!
//! Uses proptest to throw noisy page text and arbitrary hosts at the
//! pure helpers and check the guarantees the CSV store relies on.

use heritage_scraper::{classify, normalize, SiteFamily};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Fragments that show up in scraped Hebrew pages, markers included
pub fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[א-ת]{1,12}",
        "[a-zA-Z0-9 ]{1,12}",
        (0u32..500).prop_map(|n| format!("[{}]", n)),
        Just("\u{2020}".to_string()),
        Just("\u{2021}".to_string()),
        Just("**".to_string()),
        Just("\"".to_string()),
        Just("\u{200E}".to_string()),
        Just("\u{200F}".to_string()),
        Just("\u{202B}".to_string()),
        Just("\u{0}".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        prop::sample::select(vec![" ", "\t", "\n", "\r\n", "\u{00A0}", "  "])
            .prop_map(str::to_string),
    ]
}

/// Raw text built from noisy fragments
pub fn arb_raw_text() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..40).prop_map(|parts| parts.concat())
}

/// Hostnames that contain neither site marker
pub fn arb_foreign_host() -> impl Strategy<Value = String> {
    "[a-z]{1,10}(\\.[a-z]{2,8}){1,2}".prop_filter("must not name a known site", |host| {
        !host.contains("he.wikipedia.org") && !host.contains("izkor.gov.il")
    })
}

// ============================================================================
// NORMALIZATION PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(raw in arb_raw_text()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalize_output_is_single_line(raw in arb_raw_text()) {
        let out = normalize(&raw);
        prop_assert!(!out.contains('\n'), "newline survived in {:?}", out);
        prop_assert!(!out.contains('\r'), "carriage return survived in {:?}", out);
        prop_assert!(!out.contains('\t'), "tab survived in {:?}", out);
        prop_assert!(!out.contains("  "), "double space in {:?}", out);
        prop_assert_eq!(out.trim(), out.as_str());
    }

    #[test]
    fn prop_normalize_strips_markers(raw in arb_raw_text()) {
        let out = normalize(&raw);
        prop_assert!(!out.contains('"'), "double quote survived in {:?}", out);
        prop_assert!(!out.contains('\u{0}'), "NUL survived in {:?}", out);
        prop_assert!(!out.contains('\u{2020}'), "dagger survived in {:?}", out);
        prop_assert!(!out.contains('\u{2021}'), "double dagger survived in {:?}", out);
        prop_assert!(!out.contains('*'), "asterisk survived in {:?}", out);
        for control in ['\u{200E}', '\u{200F}', '\u{202A}', '\u{202B}', '\u{202C}', '\u{202D}', '\u{202E}'] {
            prop_assert!(!out.contains(control), "control {:?} survived in {:?}", control, out);
        }
    }

    #[test]
    fn prop_normalize_keeps_plain_words(word in "[א-ת]{1,20}") {
        prop_assert_eq!(normalize(&format!("  {}\n", word)), word);
    }

    // ========================================================================
    // CLASSIFICATION PROPERTIES
    // ========================================================================

    #[test]
    fn prop_foreign_hosts_are_unknown(host in arb_foreign_host(), path in "[a-z/]{0,20}") {
        let url = format!("https://{}/{}", host, path);
        prop_assert_eq!(classify(&url), SiteFamily::Unknown);
    }

    #[test]
    fn prop_known_hosts_ignore_path_and_case(path in "[a-zA-Z0-9_/]{0,30}", upper in any::<bool>()) {
        let (wiki, izkor) = if upper {
            ("HE.WIKIPEDIA.ORG", "WWW.IZKOR.GOV.IL")
        } else {
            ("he.wikipedia.org", "www.izkor.gov.il")
        };
        prop_assert_eq!(
            classify(&format!("https://{}/wiki/{}", wiki, path)),
            SiteFamily::Encyclopedia
        );
        prop_assert_eq!(
            classify(&format!("https://{}/{}", izkor, path)),
            SiteFamily::Memorial
        );
    }

    #[test]
    fn prop_marker_in_path_only_is_unknown(path in "[a-z]{0,10}") {
        let url = format!("https://example.com/he.wikipedia.org/{}", path);
        prop_assert_eq!(classify(&url), SiteFamily::Unknown);
    }
}
