//! Component scorers for names, companies and locations.
//!
//! Each scorer is bounded by its weight in the confidence aggregate:
//! [`NAME_WEIGHT`], [`COMPANY_WEIGHT`], [`LOCATION_WEIGHT`].

use super::normalize::{normalize, significant_tokens};

pub const NAME_WEIGHT: u8 = 30;
pub const NAME_CONTAINMENT: u8 = 25;
pub const COMPANY_WEIGHT: u8 = 25;
pub const LOCATION_WEIGHT: u8 = 20;
pub const LOCATION_CONTAINMENT: u8 = 15;
pub const LOCATION_SHARED_TOKEN: u8 = 10;

/// Name similarity in `[0, 30]`.
///
/// Exact normalized match scores 30, containment either way 25, otherwise the
/// Levenshtein ratio scaled to 30. Symmetric in its arguments.
pub fn name_similarity(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    if a == b {
        return NAME_WEIGHT;
    }
    if a.contains(&b) || b.contains(&a) {
        return NAME_CONTAINMENT;
    }

    let distance = strsim::levenshtein(&a, &b) as f64;
    let max_len = a.chars().count().max(b.chars().count()) as f64;
    let similarity = 1.0 - distance / max_len;
    scale(similarity, NAME_WEIGHT)
}

/// Company similarity in `[0, 25]` by token overlap.
///
/// A candidate token counts when it contains, or is contained in, any input
/// token; the share of matching tokens is scaled to 25.
pub fn company_similarity(candidate: Option<&str>, input: Option<&str>) -> u8 {
    let (Some(candidate), Some(input)) = (present(candidate), present(input)) else {
        return 0;
    };
    let candidate = normalize(candidate);
    let input = normalize(input);
    if candidate.is_empty() || input.is_empty() {
        return 0;
    }
    if candidate == input {
        return COMPANY_WEIGHT;
    }

    let candidate_tokens = significant_tokens(&candidate);
    let input_tokens = significant_tokens(&input);

    let common = candidate_tokens
        .iter()
        .filter(|token| {
            input_tokens
                .iter()
                .any(|other| other.contains(*token) || token.contains(*other))
        })
        .count();
    if common == 0 {
        return 0;
    }

    let ratio = common as f64 / candidate_tokens.len().max(input_tokens.len()) as f64;
    scale(ratio, COMPANY_WEIGHT)
}

/// Location similarity in `[0, 20]`: exact 20, containment 15, a shared
/// significant token 10.
pub fn location_similarity(candidate: Option<&str>, input: Option<&str>) -> u8 {
    let (Some(candidate), Some(input)) = (present(candidate), present(input)) else {
        return 0;
    };
    let candidate = normalize(candidate);
    let input = normalize(input);
    if candidate.is_empty() || input.is_empty() {
        return 0;
    }
    if candidate == input {
        return LOCATION_WEIGHT;
    }
    if candidate.contains(&input) || input.contains(&candidate) {
        return LOCATION_CONTAINMENT;
    }

    let input_tokens = significant_tokens(&input);
    let shared = significant_tokens(&candidate)
        .into_iter()
        .any(|token| input_tokens.contains(&token));
    if shared {
        LOCATION_SHARED_TOKEN
    } else {
        0
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn scale(ratio: f64, weight: u8) -> u8 {
    (ratio.clamp(0.0, 1.0) * weight as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_exact_after_normalization() {
        assert_eq!(name_similarity("José Álvarez", "jose alvarez"), 30);
    }

    #[test]
    fn name_containment() {
        assert_eq!(name_similarity("Jane Doe", "Dr. Jane Doe PhD"), 25);
        assert_eq!(name_similarity("Dr. Jane Doe PhD", "Jane Doe"), 25);
    }

    #[test]
    fn name_one_edit_away() {
        // distance 1 over 10 chars
        assert_eq!(name_similarity("Jon Smith", "John Smith"), 27);
    }

    #[test]
    fn name_is_symmetric() {
        let pairs = [
            ("Jon Smith", "John Smith"),
            ("Katherine Lee", "Catherine Li"),
            ("Bob", "Roberto Gomez"),
            ("", "Anyone"),
            ("Élodie", "Elodie Martin"),
        ];
        for (a, b) in pairs {
            assert_eq!(name_similarity(a, b), name_similarity(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn name_empty_scores_zero() {
        assert_eq!(name_similarity("", "Jane"), 0);
        assert_eq!(name_similarity("---", "Jane"), 0);
    }

    #[test]
    fn name_totally_different_stays_in_range() {
        let score = name_similarity("Al", "Maximilian Throckmorton");
        assert!(score <= 30);
    }

    #[test]
    fn company_exact_and_missing() {
        assert_eq!(company_similarity(Some("Acme Corp"), Some("ACME corp.")), 25);
        assert_eq!(company_similarity(None, Some("Acme")), 0);
        assert_eq!(company_similarity(Some("Acme"), Some("   ")), 0);
    }

    #[test]
    fn company_token_overlap() {
        // "acme" matches, "robotics" does not; 1 of 2 tokens
        assert_eq!(company_similarity(Some("Acme Robotics"), Some("Acme Industries")), 13);
        // partial token containment counts
        assert_eq!(company_similarity(Some("Googleplex"), Some("Google")), 25);
        assert_eq!(company_similarity(Some("Stripe"), Some("Shopify")), 0);
    }

    #[test]
    fn location_tiers() {
        assert_eq!(location_similarity(Some("Berlin"), Some("berlin")), 20);
        assert_eq!(location_similarity(Some("Berlin, Germany"), Some("Berlin")), 15);
        assert_eq!(location_similarity(Some("Greater Boston Area"), Some("Boston, MA")), 10);
        assert_eq!(location_similarity(Some("Paris"), Some("London")), 0);
        assert_eq!(location_similarity(None, Some("London")), 0);
    }
}
