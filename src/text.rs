//! Text normalization
//!
//! Turns raw extracted page text into a single-line string that can be
//! stored in a quoted CSV field without escaping ambiguity.

use regex::Regex;
use std::sync::OnceLock;

/// Bracketed numeric citation markers: `[1]`, `[23]`
fn citation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\d+\]").expect("valid citation pattern"))
}

/// Dagger, double dagger and asterisk runs
fn footnote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x{2020}|\x{2021}|\*+").expect("valid footnote pattern"))
}

/// LRM/RLM plus the embedding and override controls. NUL rides along here.
fn control_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\x{200E}\x{200F}\x{202A}-\x{202E}\x{0}]").expect("valid control pattern")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Clean and normalize extracted text.
///
/// Citation markers, footnote glyphs and bidi controls are stripped, every
/// whitespace run becomes one space, double quotes become single quotes,
/// NUL bytes are dropped and the result is trimmed.
///
/// Stripping repeats until nothing more matches, because removing one
/// marker can expose another (`[[1]2]`, `[1*2]`). That keeps the function
/// idempotent.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut text = raw.to_string();
    loop {
        let before = text.len();
        text = citation_re().replace_all(&text, "").into_owned();
        text = footnote_re().replace_all(&text, "").into_owned();
        text = control_re().replace_all(&text, "").into_owned();
        if text.len() == before {
            break;
        }
    }

    let text = whitespace_re().replace_all(&text, " ");
    let text = text.replace('"', "'");

    text.trim().to_string()
}

/// Length in characters, the unit all extraction thresholds are expressed in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
