//! Name variants, nicknames, initials and link-derived search hints.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::matching::normalize::normalize;

static URL_IN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s,]+").expect("valid regex"));

const NICKNAMES: &[(&str, &[&str])] = &[
    ("michael", &["mike", "mick", "mickey"]),
    ("william", &["bill", "will", "billy"]),
    ("robert", &["bob", "rob", "bobby"]),
    ("richard", &["rick", "dick", "richie"]),
    ("james", &["jim", "jimmy", "jamie"]),
    ("christopher", &["chris", "christy"]),
    ("daniel", &["dan", "danny"]),
    ("matthew", &["matt", "matty"]),
    ("anthony", &["tony"]),
    ("elizabeth", &["liz", "beth", "betty"]),
    ("jennifer", &["jen", "jenny"]),
    ("michelle", &["shelly", "mish"]),
    ("stephanie", &["steph", "steffi"]),
];

/// Known nicknames for a first name (matched after normalization).
pub fn nicknames(first_name: &str) -> &'static [&'static str] {
    let key = normalize(first_name);
    NICKNAMES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, nicks)| *nicks)
        .unwrap_or(&[])
}

fn first_char(s: &str) -> String {
    s.trim().chars().next().map(String::from).unwrap_or_default()
}

/// Aliases folded into the enrichment prompt: full name, initial + last name,
/// joined, and reversed.
pub fn alias_variants(first: &str, last: &str) -> Vec<String> {
    dedup(vec![
        format!("{first} {last}"),
        format!("{}. {last}", first_char(first)),
        format!("{first}{last}"),
        format!("{last} {first}"),
    ])
}

/// Broader variations used by candidate discovery: orderings, initials,
/// single names, and nickname forms.
pub fn discovery_variations(first: &str, last: &str) -> Vec<String> {
    let mut variations = vec![
        format!("{first} {last}"),
        format!("{last}, {first}"),
        format!("{}. {last}", first_char(first)),
        format!("{first} {}.", first_char(last)),
        format!("{}{}", first_char(first), first_char(last)),
        first.to_string(),
        last.to_string(),
    ];
    for nick in nicknames(first) {
        variations.push(format!("{nick} {last}"));
        variations.push(format!("{}. {last}", first_char(nick)));
    }
    dedup(variations)
}

/// Up to two uppercase initials from a display name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Hostnames of URLs found in a comma-separated `other_links` value.
pub fn hint_domains(other_links: Option<&str>) -> Vec<String> {
    let Some(links) = other_links else {
        return Vec::new();
    };
    let hosts = links
        .split(',')
        .filter_map(|entry| URL_IN_TEXT.find(entry))
        .filter_map(|m| Url::parse(m.as_str()).ok())
        .filter_map(|url| url.host_str().map(str::to_string))
        .collect();
    dedup(hosts)
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
