//! LinkedIn profile URL canonicalization.

use url::Url;

/// Canonical form of a LinkedIn URL: its lowercased path without one trailing
/// slash. Unparseable input yields `""`. An input that is already a rooted
/// path is treated as canonical, so canonicalization is idempotent.
///
/// ```
/// use agary::matching::linkedin::canonicalize;
///
/// assert_eq!(canonicalize("https://www.linkedin.com/in/Jane-Doe/"), "/in/jane-doe");
/// assert_eq!(canonicalize("/in/jane-doe"), "/in/jane-doe");
/// assert_eq!(canonicalize("not a url"), "");
/// ```
pub fn canonicalize(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with('/') && !raw.starts_with("//") {
        return canonical_path(raw);
    }
    match Url::parse(raw) {
        Ok(url) => canonical_path(url.path()),
        Err(_) => String::new(),
    }
}

fn canonical_path(path: &str) -> String {
    let path = path.strip_suffix('/').unwrap_or(path);
    path.to_lowercase()
}

/// Whether two LinkedIn URLs identify the same profile.
///
/// Both canonical forms must be non-empty: two blank or unparseable URLs are
/// never treated as the same identity.
pub fn same_profile(a: &str, b: &str) -> bool {
    let a = canonicalize(a);
    !a.is_empty() && a == canonicalize(b)
}

/// Whether two URLs canonicalize to different non-empty profiles. Absence on
/// either side is not a conflict.
pub fn conflicting_profiles(a: Option<&str>, b: Option<&str>) -> bool {
    match (a.map(canonicalize), b.map(canonicalize)) {
        (Some(a), Some(b)) => !a.is_empty() && !b.is_empty() && a != b,
        _ => false,
    }
}

/// Whether the URL points at a linkedin.com host.
pub fn is_linkedin_host(raw: &str) -> bool {
    Url::parse(raw.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .is_some_and(|h| h.contains("linkedin.com"))
}
