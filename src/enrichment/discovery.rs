//! `discover-candidates`: list the people a name could refer to, ranked by
//! independent confidence.

use serde::{Deserialize, Serialize};

use super::enrich::{DEFINITIVE_FACTOR, DEFINITIVE_SCORE};
use super::parse::parse_as;
use super::types::Candidate;
use super::{lenient, names, prompt};
use crate::contacts::types::clean;
use crate::error::AgaryError;
use crate::matching::{score_candidate, ConfidenceLevel, InputSignals};
use crate::providers::{ResearchProvider, ResearchRequest, WebSearch};

pub const STRATEGY_DEFINITIVE: &str = "linkedin_definitive";
pub const STRATEGY_COMPREHENSIVE: &str = "comprehensive_discovery";
pub const PARSE_FAILURE: &str = "Failed to parse candidate discovery results";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryRequest {
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "linkedinUrl")]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResponse {
    pub success: bool,
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_signals: Option<InputSignals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiscoveryResponse {
    fn failed(message: &str) -> Self {
        Self {
            success: false,
            candidates: Vec::new(),
            total_found: None,
            search_strategy: None,
            input_signals: None,
            error: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateList {
    #[serde(deserialize_with = "lenient::records")]
    candidates: Vec<Candidate>,
}

pub async fn discover_candidates(
    research: &dyn ResearchProvider,
    max_candidates: usize,
    request: DiscoveryRequest,
) -> Result<DiscoveryResponse, AgaryError> {
    let (Some(first), Some(last)) = (
        clean(request.first_name.as_deref()),
        clean(request.last_name.as_deref()),
    ) else {
        return Err(AgaryError::validation("First name and last name are required"));
    };
    let company = clean(request.company.as_deref());
    let location = clean(request.location.as_deref());
    let linkedin_url = clean(request.linkedin_url.as_deref());

    let signals = InputSignals {
        name: format!("{first} {last}"),
        company: company.clone(),
        location: location.clone(),
        linkedin_url: linkedin_url.clone(),
    };
    let fallback_initials = names::initials(&signals.name);

    if let Some(url) = linkedin_url.as_deref() {
        if let Some(candidates) = definitive_candidates(research, url, &fallback_initials).await {
            tracing::info!(count = candidates.len(), "definitive candidate lookup");
            return Ok(DiscoveryResponse {
                success: true,
                total_found: Some(candidates.len()),
                candidates,
                search_strategy: Some(STRATEGY_DEFINITIVE.to_string()),
                input_signals: Some(signals),
                error: None,
            });
        }
    }

    let variations = names::discovery_variations(&first, &last);
    let searches = prompt::discovery_searches(
        &first,
        &last,
        company.as_deref(),
        location.as_deref(),
        &variations,
    );
    let request = ResearchRequest {
        system: prompt::DISCOVERY_SYSTEM.to_string(),
        prompt: prompt::discovery(&first, &last, company.as_deref(), location.as_deref(), &searches),
        max_tokens: 1500,
        temperature: 0.2,
        web_search: Some(WebSearch::anywhere()),
    };

    let raw = research.research(&request).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "candidate discovery research failed");
        String::new()
    });

    let list = match parse_as::<CandidateList>(&raw) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(error = %e, "candidate discovery response unparseable");
            return Ok(DiscoveryResponse::failed(PARSE_FAILURE));
        }
    };

    let candidates = rank_candidates(list.candidates, &signals, &fallback_initials, max_candidates);
    let total_found = candidates.total_found;
    tracing::info!(total_found, returned = candidates.ranked.len(), "candidate discovery");

    Ok(DiscoveryResponse {
        success: true,
        candidates: candidates.ranked,
        total_found: Some(total_found),
        search_strategy: Some(STRATEGY_COMPREHENSIVE.to_string()),
        input_signals: Some(signals),
        error: None,
    })
}

/// Look up the owner of a LinkedIn URL. `None` when the provider fails or
/// returns nothing usable.
async fn definitive_candidates(
    research: &dyn ResearchProvider,
    linkedin_url: &str,
    fallback_initials: &str,
) -> Option<Vec<Candidate>> {
    let request = ResearchRequest {
        system: prompt::DEFINITIVE_CANDIDATE_SYSTEM.to_string(),
        prompt: prompt::definitive_candidate(linkedin_url),
        max_tokens: 800,
        temperature: 0.0,
        web_search: Some(WebSearch::linkedin_only()),
    };

    let raw = research
        .research(&request)
        .await
        .map_err(|e| tracing::warn!(error = %e, "definitive candidate lookup failed"))
        .ok()?;
    let list = parse_as::<CandidateList>(&raw).ok()?;

    let candidates: Vec<Candidate> = list
        .candidates
        .into_iter()
        .filter(|c| c.name.is_some())
        .map(|mut c| {
            c.linkedin_profile.get_or_insert_with(|| linkedin_url.to_string());
            c.confidence = Some(DEFINITIVE_SCORE);
            c.confidence_level = Some(ConfidenceLevel::High);
            c.match_factors = vec![DEFINITIVE_FACTOR.to_string()];
            c.initials = Some(candidate_initials(&c, fallback_initials));
            c
        })
        .collect();

    (!candidates.is_empty()).then_some(candidates)
}

pub struct Ranked {
    pub ranked: Vec<Candidate>,
    pub total_found: usize,
}

/// Score every named candidate, best first, keeping at most `limit`.
pub fn rank_candidates(
    candidates: Vec<Candidate>,
    signals: &InputSignals,
    fallback_initials: &str,
    limit: usize,
) -> Ranked {
    let mut scored: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.name.is_some())
        .map(|mut c| {
            let score = score_candidate(&c.profile(), signals);
            c.confidence = Some(score.score);
            c.confidence_level = Some(score.level);
            c.match_factors = score.factors;
            c.initials = Some(candidate_initials(&c, fallback_initials));
            c
        })
        .collect();

    let total_found = scored.len();
    // stable: equal scores keep the model's order
    scored.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    scored.truncate(limit);

    Ranked {
        ranked: scored,
        total_found,
    }
}

fn candidate_initials(candidate: &Candidate, fallback: &str) -> String {
    candidate
        .name
        .as_deref()
        .map(names::initials)
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
