// Text normalization for proposal content - prefix stripping and word counting

use regex::Regex;

/// Replace Unicode non-breaking spaces with regular ASCII spaces.
///
/// Word auto-numbering leaves U+00A0 (no-break space) and U+202F (narrow
/// no-break space) in exported text, which would otherwise defeat both
/// prefix matching and whitespace-based word counting.
pub fn normalize_spaces(text: &str) -> String {
    text.replace('\u{00A0}', " ").replace('\u{202F}', " ")
}

/// Strip a single leading ordinal marker (e.g. "1. ", "2) ") from a list item.
///
/// The marker is a presentation artifact inserted by Word's auto-numbering
/// and must not count toward word limits. Only one leading occurrence is
/// removed, and only when the digits are immediately followed by `.` or
/// `)`: a bare leading number is content ("24 hour support", "24/7").
pub fn strip_number_prefix(text: &str) -> String {
    let normalized = normalize_spaces(text);
    let re = Regex::new(r"^\s*\d+[.)]\s*").unwrap();
    re.replace(&normalized, "").to_string()
}

/// Count words in text: whitespace-delimited non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
