//! Cross-validation of a research result against the stored contact.
//!
//! The model's own `verified` flag and confidence are never trusted. The
//! returned identity is checked field by field and re-scored independently;
//! any failed check becomes a human-readable mismatch reason.

use crate::contacts::Contact;
use crate::enrichment::types::EnrichmentData;
use crate::matching::normalize::normalize;
use crate::matching::similarity::{company_similarity, location_similarity, name_similarity};
use crate::matching::{linkedin, score_candidate, ConfidenceScore};

/// Name score at which a returned name counts as the contact's name even when
/// it does not literally contain both parts.
pub const NAME_MATCH_SCORE: u8 = 25;

#[derive(Debug, Clone)]
pub struct IdentityCheck {
    pub name_match: bool,
    /// `None` when the contact has no company to check against.
    pub company_match: Option<bool>,
    pub location_match: Option<bool>,
    pub linkedin_conflict: bool,
    pub candidate_count: usize,
    pub independent: ConfidenceScore,
    pub reasons: Vec<String>,
}

impl IdentityCheck {
    pub fn is_consistent(&self) -> bool {
        self.reasons.is_empty()
    }
}

pub fn check_identity(contact: &Contact, data: &EnrichmentData, acceptance_threshold: u8) -> IdentityCheck {
    let candidates: Vec<_> = data
        .identity_candidates
        .iter()
        .filter(|c| !c.is_empty())
        .collect();

    let mut names: Vec<&str> = vec![];
    names.extend(data.identity.canonical_name.as_deref());
    names.extend(data.person_summary.full_name.as_deref());
    names.extend(candidates.iter().filter_map(|c| c.name.as_deref()));

    let mut companies: Vec<&str> = vec![];
    companies.extend(data.professional_background.current_company.as_deref());
    companies.extend(data.person_summary.current_position.as_deref());
    companies.extend(data.identity.company.as_deref());
    companies.extend(data.professional_background.previous_companies.iter().map(String::as_str));
    companies.extend(candidates.iter().filter_map(|c| c.company.as_deref()));

    let mut locations: Vec<&str> = vec![];
    locations.extend(data.person_summary.location.as_deref());
    locations.extend(data.identity.location.as_deref());
    locations.extend(candidates.iter().filter_map(|c| c.location.as_deref()));

    let name_match = matches_name(contact, &names);

    let company_match = contact.company.as_deref().map(|expected| {
        companies.iter().any(|c| matches_company(c, expected))
    });

    let location_match = contact.location.as_deref().map(|expected| {
        locations
            .iter()
            .any(|l| location_similarity(Some(l), Some(expected)) > 0)
    });

    let linkedin_conflict = linkedin::conflicting_profiles(
        contact.linkedin_url.as_deref(),
        data.identity.linkedin_profile.as_deref(),
    );

    let independent = score_candidate(&data.profile(), &contact.input_signals());

    let mut reasons = Vec::new();
    if !name_match {
        reasons.push("Name mismatch with returned profile".to_string());
    }
    if let (Some(false), Some(company)) = (company_match, &contact.company) {
        reasons.push(format!("Company mismatch (expected {company})"));
    }
    if let (Some(false), Some(location)) = (location_match, &contact.location) {
        reasons.push(format!("Location mismatch (expected {location})"));
    }
    if candidates.len() > 1 {
        reasons.push("Multiple identity candidates detected".to_string());
    }
    if linkedin_conflict {
        reasons.push("Returned LinkedIn profile does not match stored profile".to_string());
    }
    if independent.score < acceptance_threshold {
        reasons.push(format!(
            "Independent confidence {} is below the acceptance threshold of {acceptance_threshold}",
            independent.score
        ));
    }

    IdentityCheck {
        name_match,
        company_match,
        location_match,
        linkedin_conflict,
        candidate_count: candidates.len(),
        independent,
        reasons,
    }
}

/// A returned name matches when it contains both the first and last name, or
/// scores at least [`NAME_MATCH_SCORE`] against the full name.
fn matches_name(contact: &Contact, names: &[&str]) -> bool {
    let first = normalize(&contact.first_name);
    let last = normalize(&contact.last_name);
    let full = contact.full_name();

    names.iter().any(|name| {
        let normalized = normalize(name);
        let contains_both = !first.is_empty()
            && !last.is_empty()
            && normalized.contains(&first)
            && normalized.contains(&last);
        contains_both || name_similarity(name, &full) >= NAME_MATCH_SCORE
    })
}

/// Whole-word containment either way, then token overlap. Short names such
/// as "EY" or "3M" only ever match through containment.
fn matches_company(found: &str, expected: &str) -> bool {
    let found_norm = normalize(found);
    let expected_norm = normalize(expected);
    if found_norm.is_empty() || expected_norm.is_empty() {
        return false;
    }
    let padded = |s: &str| format!(" {s} ");
    padded(&found_norm).contains(&padded(&expected_norm))
        || padded(&expected_norm).contains(&padded(&found_norm))
        || company_similarity(Some(found), Some(expected)) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::types::IdentityCandidate;

    fn contact(company: Option<&str>, location: Option<&str>, linkedin: Option<&str>) -> Contact {
        Contact {
            id: "c".into(),
            user_id: "u".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            company: company.map(Into::into),
            location: location.map(Into::into),
            linkedin_url: linkedin.map(Into::into),
            other_links: None,
            notes: None,
            enrichment_data: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn rich_result() -> EnrichmentData {
        let mut data = EnrichmentData::default();
        data.identity.canonical_name = Some("Jane A. Doe".into());
        data.person_summary.current_position = Some("VP Engineering at Acme Corp".into());
        data.person_summary.location = Some("Berlin, Germany".into());
        data.professional_background.current_company = Some("Acme Corp".into());
        data.professional_background.education = Some("TU Berlin".into());
        data.identity.linkedin_profile = Some("https://linkedin.com/in/janedoe".into());
        data
    }

    #[test]
    fn consistent_result_passes() {
        let check = check_identity(&contact(Some("Acme"), Some("Berlin"), None), &rich_result(), 50);
        assert!(check.name_match);
        assert_eq!(check.company_match, Some(true));
        assert_eq!(check.location_match, Some(true));
        assert!(check.is_consistent(), "{:?}", check.reasons);
    }

    #[test]
    fn absent_company_and_location_are_never_mismatches() {
        let check = check_identity(&contact(None, None, None), &rich_result(), 50);
        assert_eq!(check.company_match, None);
        assert_eq!(check.location_match, None);
        assert!(!check.reasons.iter().any(|r| r.starts_with("Company") || r.starts_with("Location")));
    }

    #[test]
    fn contradictions_are_reported() {
        let check = check_identity(
            &contact(Some("Globex"), Some("Tokyo"), Some("https://linkedin.com/in/someone-else")),
            &rich_result(),
            50,
        );
        assert!(check.reasons.contains(&"Company mismatch (expected Globex)".to_string()));
        assert!(check.reasons.contains(&"Location mismatch (expected Tokyo)".to_string()));
        assert!(check.linkedin_conflict);
    }

    #[test]
    fn short_company_names_match_by_containment() {
        let mut data = rich_result();
        data.professional_background.current_company = Some("EY (Ernst & Young)".into());
        data.person_summary.current_position = Some("Senior Manager".into());
        let check = check_identity(&contact(Some("EY"), None, None), &data, 0);
        assert_eq!(check.company_match, Some(true));
        assert!(check.reasons.is_empty(), "{:?}", check.reasons);

        data.professional_background.current_company = Some("HP".into());
        let check = check_identity(&contact(Some("HP Inc."), None, None), &data, 0);
        assert_eq!(check.company_match, Some(true));
    }

    #[test]
    fn short_company_names_need_a_whole_word() {
        let mut data = rich_result();
        data.professional_background.current_company = Some("Geico".into());
        data.person_summary.current_position = Some("Analyst at Geico".into());
        let check = check_identity(&contact(Some("GE"), None, None), &data, 0);
        assert_eq!(check.company_match, Some(false));
        assert!(check.reasons.contains(&"Company mismatch (expected GE)".to_string()));
    }

    #[test]
    fn multiple_candidates_are_ambiguous() {
        let mut data = rich_result();
        data.identity_candidates = vec![
            IdentityCandidate { name: Some("Jane Doe".into()), ..Default::default() },
            IdentityCandidate::default(),
            IdentityCandidate { name: Some("Jane Doe".into()), company: Some("Initech".into()), ..Default::default() },
        ];
        let check = check_identity(&contact(None, None, None), &data, 50);
        assert_eq!(check.candidate_count, 2);
        assert!(check.reasons.contains(&"Multiple identity candidates detected".to_string()));
    }

    #[test]
    fn weak_independent_score_blocks_verification() {
        let mut data = EnrichmentData::default();
        data.person_summary.full_name = Some("Jane Doe".into());
        data.confidence_score.overall_confidence = Some(99);
        let check = check_identity(&contact(None, None, None), &data, 50);
        assert!(check.name_match);
        assert_eq!(check.independent.score, 30);
        assert_eq!(check.reasons.len(), 1);
        assert!(check.reasons[0].starts_with("Independent confidence 30"));
    }

    #[test]
    fn different_person_is_a_name_mismatch() {
        let mut data = rich_result();
        data.identity.canonical_name = Some("Robert Smith".into());
        let check = check_identity(&contact(None, None, None), &data, 50);
        assert!(!check.name_match);
    }
}
