//! Comparison-form normalization for names, companies and locations.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form of free text.
///
/// NFD-decomposes, drops combining marks (so `"José"` becomes `"jose"`),
/// lowercases, replaces everything outside `[a-z0-9]` with a space and
/// collapses runs of whitespace.
///
/// ```
/// use agary::matching::normalize::normalize;
///
/// assert_eq!(normalize("  Zoë O'Brien-Smith "), "zoe o brien smith");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(value: &str) -> String {
    let folded: String = value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize an optional value; absent input yields an empty string.
pub fn normalize_opt(value: Option<&str>) -> String {
    value.map(normalize).unwrap_or_default()
}

/// Significant tokens of an already-normalized string (longer than two chars).
pub fn significant_tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() > 2)
        .collect()
}
