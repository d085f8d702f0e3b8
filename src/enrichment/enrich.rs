//! `enrich-contact`: research a stored contact and persist the result.
//!
//! Two modes:
//!
//! - **definitive**: the contact has a LinkedIn URL and no candidate was
//!   picked. The profile is the identity, so the record is forced to
//!   verified at 95/high whatever the research returns.
//! - **exploratory**: everything else. The research result is cross-checked
//!   and re-scored (see [`super::validate`]) before anything is marked
//!   verified or written back to the contact.
//!
//! Provider and parse failures never fail the request; they produce a
//! placeholder record flagged for manual review.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::names;
use super::parse::{parse_as, parse_object};
use super::prompt::{self, ExploratoryContext};
use super::types::{Candidate, ConfidenceBlock, EnrichmentData, Identity, SocialProfile};
use super::validate::check_identity;
use crate::config::EnrichmentConfig;
use crate::contacts::{store, Contact};
use crate::db::{self, SharedDb};
use crate::error::AgaryError;
use crate::matching::{linkedin, ConfidenceLevel};
use crate::providers::{ResearchProvider, ResearchRequest, WebSearch};

pub const DEFINITIVE_SCORE: u8 = 95;
pub const DEFINITIVE_FACTOR: &str = "Exact LinkedIn URL provided";
pub const SOURCE_DEFINITIVE: &str = "perplexity_definitive";
pub const SOURCE_EXPLORATORY: &str = "perplexity";

const RESEARCH_MAX_TOKENS: u32 = 1800;
const PRESEARCH_MAX_TOKENS: u32 = 300;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrichRequest {
    #[serde(default, alias = "contactId")]
    pub contact_id: Option<String>,
    #[serde(default, alias = "selectedCandidate")]
    pub selected_candidate: Option<Candidate>,
    /// Accepted for client compatibility; candidate selection is driven by
    /// the client calling discovery first.
    #[serde(default, alias = "skipCandidateSelection")]
    pub skip_candidate_selection: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichResponse {
    pub success: bool,
    pub message: String,
    pub enrichment_data: EnrichmentData,
}

/// Contact field updates derived from a research result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Writeback {
    pub linkedin_url: Option<String>,
    pub other_links: Option<String>,
}

pub async fn enrich_contact(
    db: &SharedDb,
    research: &dyn ResearchProvider,
    config: &EnrichmentConfig,
    user_id: &str,
    request: EnrichRequest,
) -> Result<EnrichResponse, AgaryError> {
    let contact_id = request
        .contact_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AgaryError::validation("Contact ID is required"))?
        .to_string();

    let owner = user_id.to_string();
    let lookup_id = contact_id.clone();
    let mut contact = db::with_conn(db, move |conn| store::get_contact(conn, &owner, &lookup_id))
        .await
        .map_err(|e| AgaryError::internal("Failed to enrich contact", e))?
        .ok_or_else(|| AgaryError::not_found("Contact not found"))?;

    tracing::info!(
        contact_id = %contact.id,
        has_linkedin = contact.linkedin_url.is_some(),
        has_selected_candidate = request.selected_candidate.is_some(),
        skip_candidate_selection = request.skip_candidate_selection.unwrap_or(false),
        "enriching contact"
    );

    let selected = request.selected_candidate.as_ref();
    if let Some(candidate) = selected {
        if apply_selected_candidate(&mut contact, candidate) {
            contact = persist(db, contact).await?;
        }
    }

    let (data, writeback, message) = match (contact.linkedin_url.clone(), selected) {
        (Some(url), None) => {
            let data = definitive(research, &contact, &url).await;
            (
                data,
                Writeback::default(),
                "Contact enriched successfully with definitive LinkedIn data",
            )
        }
        _ => {
            let (data, writeback) = exploratory(research, config, &contact, selected).await;
            (data, writeback, "Contact enriched successfully")
        }
    };

    if let Some(url) = &writeback.linkedin_url {
        contact.linkedin_url = Some(url.clone());
    }
    if let Some(links) = &writeback.other_links {
        contact.other_links = Some(links.clone());
    }
    contact.enrichment_data = Some(data.clone());
    persist(db, contact).await?;

    if data.needs_manual_review {
        tracing::warn!(
            contact_id = %contact_id,
            notes = data.confidence_score.disambiguation_notes.as_deref().unwrap_or(""),
            "identity validation requires manual review"
        );
    }

    Ok(EnrichResponse {
        success: true,
        message: message.to_string(),
        enrichment_data: data,
    })
}

async fn persist(db: &SharedDb, mut contact: Contact) -> Result<Contact, AgaryError> {
    db::with_conn(db, move |conn| {
        store::save_contact(conn, &mut contact, true).context("failed to update contact")?;
        Ok(contact)
    })
    .await
    .map_err(|e| AgaryError::internal("Failed to enrich contact", e))
}

/// Fill the contact's empty LinkedIn URL, company and location from a
/// user-confirmed candidate. Returns whether anything changed.
pub fn apply_selected_candidate(contact: &mut Contact, candidate: &Candidate) -> bool {
    let fills = [
        (&mut contact.linkedin_url, &candidate.linkedin_profile),
        (&mut contact.company, &candidate.company),
        (&mut contact.location, &candidate.location),
    ];
    let mut changed = false;
    for (field, value) in fills {
        if field.is_none() {
            if let Some(value) = value {
                *field = Some(value.clone());
                changed = true;
            }
        }
    }
    changed
}

async fn definitive(research: &dyn ResearchProvider, contact: &Contact, linkedin_url: &str) -> EnrichmentData {
    let request = ResearchRequest {
        system: prompt::DEFINITIVE_SYSTEM.to_string(),
        prompt: prompt::definitive_enrichment(contact, linkedin_url),
        max_tokens: RESEARCH_MAX_TOKENS,
        temperature: 0.0,
        web_search: Some(WebSearch::linkedin_only()),
    };

    let raw = research.research(&request).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, contact_id = %contact.id, "definitive research failed");
        String::new()
    });

    let parsed = parse_as::<EnrichmentData>(&raw)
        .map_err(|e| tracing::warn!(error = %e, contact_id = %contact.id, "definitive research unparseable"))
        .ok();

    finalize_definitive(contact, linkedin_url, parsed, &raw, research.model_name())
}

/// Force the definitive identity onto whatever the research returned.
pub fn finalize_definitive(
    contact: &Contact,
    linkedin_url: &str,
    parsed: Option<EnrichmentData>,
    raw: &str,
    model: &str,
) -> EnrichmentData {
    let name = contact.full_name();
    let mut data = parsed.unwrap_or_else(|| {
        let mut minimal = EnrichmentData::default();
        minimal.person_summary.full_name = Some(name.clone());
        minimal.person_summary.summary =
            Some("Professional enrichment data will be populated from LinkedIn profile.".to_string());
        minimal.social_profiles = vec![SocialProfile {
            platform: Some("LinkedIn".to_string()),
            url: Some(linkedin_url.to_string()),
            verified: Some(true),
            ..Default::default()
        }];
        minimal
    });

    data.identity = Identity {
        linkedin_profile: Some(linkedin_url.to_string()),
        canonical_name: Some(name),
        verified: true,
        ..Default::default()
    };

    let previous = std::mem::take(&mut data.confidence_score);
    data.confidence_score = ConfidenceBlock {
        overall_confidence: Some(DEFINITIVE_SCORE),
        confidence_level: Some(ConfidenceLevel::High),
        matching_factors: vec![DEFINITIVE_FACTOR.to_string()],
        disambiguation_notes: previous
            .disambiguation_notes
            .or_else(|| Some("Identity confirmed by provided LinkedIn URL".to_string())),
        verification_suggestions: previous
            .verification_suggestions
            .or_else(|| Some("No additional verification needed".to_string())),
        reported_confidence: previous.overall_confidence,
    };

    data.identity_candidates.clear();
    data.summary = data.person_summary.summary.clone();
    data.raw_response = Some(raw.to_string()).filter(|r| !r.is_empty());
    data.enriched_at = Some(store::now_timestamp());
    data.source = Some(SOURCE_DEFINITIVE.to_string());
    data.model_used = Some(model.to_string());
    data.verification_note
        .get_or_insert_with(|| "Identity confirmed by provided LinkedIn URL".to_string());
    data.needs_manual_review = false;
    data
}

async fn exploratory(
    research: &dyn ResearchProvider,
    config: &EnrichmentConfig,
    contact: &Contact,
    selected: Option<&Candidate>,
) -> (EnrichmentData, Writeback) {
    let hint_domains = names::hint_domains(contact.other_links.as_deref());
    let has_linkedin = contact.linkedin_url.is_some();

    let linkedin_hint = if has_linkedin {
        None
    } else {
        presearch_linkedin(research, contact, &hint_domains).await
    };

    let ctx = ExploratoryContext {
        aliases: names::alias_variants(&contact.first_name, &contact.last_name),
        searches: prompt::targeted_searches(contact, &hint_domains, has_linkedin),
        hint_domains,
        linkedin_hint: linkedin_hint.as_deref(),
        selected,
    };
    let query = prompt::exploratory_enrichment(contact, &ctx);

    let request = ResearchRequest {
        system: prompt::EXPLORATORY_SYSTEM.to_string(),
        prompt: query.clone(),
        max_tokens: RESEARCH_MAX_TOKENS,
        temperature: 0.0,
        web_search: Some(WebSearch::anywhere()),
    };

    let raw = research.research(&request).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, contact_id = %contact.id, "research failed, storing placeholder");
        String::new()
    });
    tracing::debug!(len = raw.len(), preview = %preview(&raw), "research response");

    let parsed = parse_as::<EnrichmentData>(&raw)
        .map_err(|e| tracing::warn!(error = %e, contact_id = %contact.id, "research response unparseable"))
        .ok();

    let outcome = Exploration {
        parsed,
        raw: &raw,
        query: &query,
        model: research.model_name(),
    };
    finalize_exploratory(contact, outcome, config)
}

/// Ask only for the most likely LinkedIn URL. The answer is a prompt hint,
/// never stored as fact.
async fn presearch_linkedin(
    research: &dyn ResearchProvider,
    contact: &Contact,
    hint_domains: &[String],
) -> Option<String> {
    let request = ResearchRequest {
        system: prompt::PRESEARCH_SYSTEM.to_string(),
        prompt: prompt::linkedin_presearch(contact, hint_domains),
        max_tokens: PRESEARCH_MAX_TOKENS,
        temperature: 0.0,
        web_search: Some(WebSearch::linkedin_only()),
    };

    let raw = match research.research(&request).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "LinkedIn pre-search failed");
            return None;
        }
    };

    let object = parse_object(&raw).ok()?;
    let url = object.get("linkedin_url")?.as_str()?.trim();
    linkedin::is_linkedin_host(url).then(|| url.to_string())
}

/// A research round's raw output, ready for validation.
pub struct Exploration<'a> {
    pub parsed: Option<EnrichmentData>,
    pub raw: &'a str,
    pub query: &'a str,
    pub model: &'a str,
}

/// Validate, reconcile and annotate an exploratory research result.
pub fn finalize_exploratory(
    contact: &Contact,
    outcome: Exploration<'_>,
    config: &EnrichmentConfig,
) -> (EnrichmentData, Writeback) {
    let parsed_ok = outcome.parsed.is_some();
    let mut data = outcome.parsed.unwrap_or_else(|| placeholder(contact));

    let returned_linkedin = distinct_linkedin_urls(&data);
    let check = check_identity(contact, &data, config.acceptance_threshold);
    let mut reasons = check.reasons.clone();
    if !parsed_ok {
        reasons.insert(0, "Research response could not be parsed".to_string());
    }

    if let Some(stored) = contact.linkedin_url.as_deref() {
        keep_matching_linkedin_profiles(&mut data.social_profiles, stored);
    }

    let has_linkedin = contact.linkedin_url.is_some();
    let reported = data.confidence_score.overall_confidence;
    data.confidence_score.reported_confidence = reported;

    if reasons.is_empty() {
        let score = check.independent.score;
        data.identity.verified = true;
        data.identity
            .canonical_name
            .get_or_insert_with(|| contact.full_name());
        data.confidence_score.overall_confidence = Some(score);
        data.confidence_score.confidence_level = Some(ConfidenceLevel::from_score(score));
        for factor in &check.independent.factors {
            if !data.confidence_score.matching_factors.contains(factor) {
                data.confidence_score.matching_factors.push(factor.clone());
            }
        }
        data.verification_note
            .get_or_insert_with(|| "Identity signals aligned with provided contact information".to_string());
        data.needs_manual_review = false;
    } else {
        let notes = reasons.join("; ");
        let score = check.independent.score.min(config.review_confidence);
        data.identity = Identity {
            linkedin_profile: contact.linkedin_url.clone(),
            canonical_name: Some(contact.full_name()),
            verified: false,
            ..Default::default()
        };
        data.confidence_score.overall_confidence = Some(score);
        data.confidence_score.confidence_level = Some(ConfidenceLevel::Low);
        data.confidence_score.disambiguation_notes = Some(notes.clone());
        data.confidence_score
            .verification_suggestions
            .get_or_insert_with(|| "Manual review required to confirm identity".to_string());
        data.verification_note = Some(format!("Manual review required: {notes}"));
        data.needs_manual_review = true;
    }

    if !has_linkedin {
        data.confidence_score
            .matching_factors
            .retain(|f| !f.to_ascii_lowercase().contains("linkedin"));
    }

    let mut writeback = Writeback::default();
    match (&contact.linkedin_url, data.identity.verified, returned_linkedin.as_slice()) {
        (None, true, [only]) => {
            writeback.linkedin_url = Some(only.clone());
            data.identity.linkedin_profile = Some(only.clone());
        }
        (stored, _, _) => data.identity.linkedin_profile = stored.clone(),
    }
    writeback.other_links = other_links(&data);

    data.summary = data.person_summary.summary.clone();
    data.raw_response = Some(outcome.raw.to_string()).filter(|r| !r.is_empty());
    data.enriched_at = Some(store::now_timestamp());
    data.source = Some(SOURCE_EXPLORATORY.to_string());
    data.model_used = Some(outcome.model.to_string());
    data.query_used = Some(outcome.query.to_string());

    (data, writeback)
}

fn placeholder(contact: &Contact) -> EnrichmentData {
    let mut data = EnrichmentData::default();
    data.person_summary.full_name = Some(contact.full_name());
    data.person_summary.current_position = Some("Information not available".to_string());
    data.person_summary.summary = Some(
        "AI data processing encountered an issue. Please try enriching this contact again.".to_string(),
    );
    data
}

/// LinkedIn URLs the result claims, one per distinct profile.
fn distinct_linkedin_urls(data: &EnrichmentData) -> Vec<String> {
    let claimed = data.identity.linkedin_profile.iter().chain(
        data.social_profiles
            .iter()
            .filter(|p| p.is_linkedin())
            .filter_map(|p| p.url.as_ref()),
    );

    let mut seen = Vec::new();
    let mut urls = Vec::new();
    for url in claimed {
        let canonical = linkedin::canonicalize(url);
        if canonical.is_empty() || seen.contains(&canonical) {
            continue;
        }
        seen.push(canonical);
        urls.push(url.clone());
    }
    urls
}

/// Drop LinkedIn profiles that are not the stored one, provided the stored
/// profile itself was returned. Non-LinkedIn profiles are kept.
fn keep_matching_linkedin_profiles(profiles: &mut Vec<SocialProfile>, stored: &str) {
    let mut exact = Vec::new();
    let mut others = Vec::new();
    for profile in profiles.iter() {
        let Some(url) = profile.url.as_deref() else {
            continue;
        };
        if linkedin::is_linkedin_host(url) {
            if linkedin::same_profile(url, stored) {
                exact.push(profile.clone());
            }
        } else {
            others.push(profile.clone());
        }
    }
    if !exact.is_empty() {
        exact.extend(others);
        *profiles = exact;
    }
}

/// `"Label: url"` entries for non-LinkedIn profiles and websites.
fn other_links(data: &EnrichmentData) -> Option<String> {
    let social = data
        .social_profiles
        .iter()
        .filter(|p| !p.is_linkedin())
        .filter_map(|p| {
            let url = p.url.as_deref()?;
            Some(format!("{}: {url}", p.platform.as_deref().unwrap_or("Profile")))
        });
    let sites = data.websites_and_profiles.iter().filter_map(|site| {
        let url = site.url.as_deref()?;
        Some(format!("{}: {url}", site.kind.as_deref().unwrap_or("Website")))
    });

    let links: Vec<String> = social.chain(sites).collect();
    (!links.is_empty()).then(|| links.join(", "))
}

fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(300) {
        Some((end, _)) => &raw[..end],
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::types::WebsiteProfile;

    fn contact(company: Option<&str>, linkedin: Option<&str>) -> Contact {
        Contact {
            id: "c".into(),
            user_id: "u".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            company: company.map(Into::into),
            location: None,
            linkedin_url: linkedin.map(Into::into),
            other_links: None,
            notes: None,
            enrichment_data: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn config() -> EnrichmentConfig {
        EnrichmentConfig::default()
    }

    fn outcome(parsed: Option<EnrichmentData>) -> Exploration<'static> {
        Exploration {
            parsed,
            raw: "{}",
            query: "query",
            model: "sonar-pro",
        }
    }

    fn strong_result() -> EnrichmentData {
        let mut data = EnrichmentData::default();
        data.identity.canonical_name = Some("Jane Doe".into());
        data.identity.linkedin_profile = Some("https://www.linkedin.com/in/janedoe/".into());
        data.confidence_score.overall_confidence = Some(92);
        data.confidence_score.matching_factors = vec!["LinkedIn URL match".into(), "Timeline".into()];
        data.person_summary.current_position = Some("Staff Engineer at Acme".into());
        data.person_summary.summary = Some("Builds things.".into());
        data.professional_background.current_company = Some("Acme".into());
        data.social_profiles = vec![
            SocialProfile {
                platform: Some("LinkedIn".into()),
                url: Some("https://linkedin.com/in/JaneDoe".into()),
                ..Default::default()
            },
            SocialProfile {
                platform: Some("GitHub".into()),
                url: Some("https://github.com/jdoe".into()),
                ..Default::default()
            },
        ];
        data.websites_and_profiles = vec![WebsiteProfile {
            url: Some("https://jane.dev".into()),
            ..Default::default()
        }];
        data
    }

    #[test]
    fn verified_result_writes_back_single_linkedin() {
        let (data, writeback) =
            finalize_exploratory(&contact(Some("Acme"), None), outcome(Some(strong_result())), &config());

        assert!(data.identity.verified);
        assert!(!data.needs_manual_review);
        // 30 name + 25 company + 10 position + 10 linkedin
        assert_eq!(data.confidence_score.overall_confidence, Some(75));
        assert_eq!(data.confidence_score.reported_confidence, Some(92));
        assert_eq!(
            writeback.linkedin_url.as_deref(),
            Some("https://www.linkedin.com/in/janedoe/")
        );
        assert_eq!(
            writeback.other_links.as_deref(),
            Some("GitHub: https://github.com/jdoe, Website: https://jane.dev")
        );
        assert!(data
            .confidence_score
            .matching_factors
            .iter()
            .all(|f| !f.to_lowercase().contains("linkedin")));
        assert_eq!(data.source.as_deref(), Some("perplexity"));
        assert_eq!(data.summary.as_deref(), Some("Builds things."));
    }

    #[test]
    fn mismatch_caps_confidence_and_skips_linkedin_writeback() {
        let (data, writeback) =
            finalize_exploratory(&contact(Some("Globex"), None), outcome(Some(strong_result())), &config());

        assert!(!data.identity.verified);
        assert!(data.needs_manual_review);
        assert_eq!(data.confidence_score.overall_confidence, Some(45));
        assert_eq!(data.confidence_score.confidence_level, Some(ConfidenceLevel::Low));
        assert_eq!(
            data.confidence_score.disambiguation_notes.as_deref(),
            Some("Company mismatch (expected Globex)")
        );
        assert_eq!(writeback.linkedin_url, None);
        assert_eq!(data.identity.linkedin_profile, None);
    }

    #[test]
    fn unparseable_research_yields_placeholder_for_review() {
        let (data, writeback) = finalize_exploratory(&contact(None, None), outcome(None), &config());
        assert!(data.needs_manual_review);
        assert!(!data.identity.verified);
        assert_eq!(data.person_summary.full_name.as_deref(), Some("Jane Doe"));
        assert!(data
            .confidence_score
            .disambiguation_notes
            .as_deref()
            .unwrap()
            .starts_with("Research response could not be parsed"));
        assert_eq!(writeback, Writeback::default());
    }

    #[test]
    fn two_distinct_linkedin_profiles_are_not_written_back() {
        let mut result = strong_result();
        result.social_profiles[0].url = Some("https://linkedin.com/in/other-jane".into());
        let (data, writeback) =
            finalize_exploratory(&contact(Some("Acme"), None), outcome(Some(result)), &config());
        assert!(data.identity.verified);
        assert_eq!(writeback.linkedin_url, None);
        assert_eq!(data.identity.linkedin_profile, None);
    }

    #[test]
    fn stored_linkedin_filters_foreign_profiles() {
        let mut profiles = vec![
            SocialProfile { platform: Some("LinkedIn".into()), url: Some("https://linkedin.com/in/someone".into()), ..Default::default() },
            SocialProfile { platform: Some("LinkedIn".into()), url: Some("https://www.linkedin.com/in/janedoe/".into()), ..Default::default() },
            SocialProfile { platform: Some("X".into()), url: Some("https://x.com/jd".into()), ..Default::default() },
        ];
        keep_matching_linkedin_profiles(&mut profiles, "https://linkedin.com/in/janedoe");
        let urls: Vec<_> = profiles.iter().filter_map(|p| p.url.as_deref()).collect();
        assert_eq!(urls, vec!["https://www.linkedin.com/in/janedoe/", "https://x.com/jd"]);

        let mut untouched = vec![SocialProfile { url: Some("https://linkedin.com/in/someone".into()), ..Default::default() }];
        keep_matching_linkedin_profiles(&mut untouched, "https://linkedin.com/in/janedoe");
        assert_eq!(untouched.len(), 1);
    }

    #[test]
    fn definitive_forces_identity_even_without_research() {
        let c = contact(None, Some("https://linkedin.com/in/janedoe"));
        let data = finalize_definitive(&c, "https://linkedin.com/in/janedoe", None, "", "sonar-pro");
        assert!(data.identity.verified);
        assert_eq!(data.confidence_score.overall_confidence, Some(95));
        assert_eq!(data.confidence_score.confidence_level, Some(ConfidenceLevel::High));
        assert_eq!(data.confidence_score.matching_factors, vec![DEFINITIVE_FACTOR]);
        assert_eq!(data.source.as_deref(), Some("perplexity_definitive"));
        assert!(!data.needs_manual_review);
        assert_eq!(data.raw_response, None);
        assert_eq!(data.social_profiles.len(), 1);
    }

    #[test]
    fn definitive_keeps_reported_confidence() {
        let c = contact(None, Some("https://linkedin.com/in/janedoe"));
        let mut parsed = EnrichmentData::default();
        parsed.identity.canonical_name = Some("Somebody Else".into());
        parsed.confidence_score.overall_confidence = Some(60);
        let data = finalize_definitive(&c, "https://linkedin.com/in/janedoe", Some(parsed), "{..}", "m");
        assert_eq!(data.identity.canonical_name.as_deref(), Some("Jane Doe"));
        assert_eq!(data.confidence_score.reported_confidence, Some(60));
        assert_eq!(data.confidence_score.overall_confidence, Some(95));
    }

    #[test]
    fn selected_candidate_fills_only_empty_fields() {
        let mut c = contact(Some("Acme"), None);
        let candidate = Candidate {
            company: Some("Globex".into()),
            location: Some("Berlin".into()),
            linkedin_profile: Some("https://linkedin.com/in/janedoe".into()),
            ..Default::default()
        };
        assert!(apply_selected_candidate(&mut c, &candidate));
        assert_eq!(c.company.as_deref(), Some("Acme"));
        assert_eq!(c.location.as_deref(), Some("Berlin"));
        assert_eq!(c.linkedin_url.as_deref(), Some("https://linkedin.com/in/janedoe"));
        assert!(!apply_selected_candidate(&mut c, &candidate));
    }
}
