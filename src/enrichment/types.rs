//! The enrichment record stored on a contact, and discovery candidates.
//!
//! Every field is optional and deserializes leniently (see
//! [`super::lenient`]) so the same types read raw research output, stored
//! payloads and client-supplied candidates.

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::matching::{CandidateProfile, ConfidenceLevel};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentData {
    #[serde(deserialize_with = "lenient::record")]
    pub identity: Identity,
    #[serde(deserialize_with = "lenient::record")]
    pub confidence_score: ConfidenceBlock,
    #[serde(deserialize_with = "lenient::record")]
    pub person_summary: PersonSummary,
    #[serde(deserialize_with = "lenient::record")]
    pub professional_background: ProfessionalBackground,
    #[serde(deserialize_with = "lenient::records")]
    pub social_profiles: Vec<SocialProfile>,
    #[serde(deserialize_with = "lenient::records")]
    pub websites_and_profiles: Vec<WebsiteProfile>,
    #[serde(deserialize_with = "lenient::records")]
    pub recent_activities: Vec<RecentActivity>,
    #[serde(deserialize_with = "lenient::record")]
    pub additional_info: AdditionalInfo,
    #[serde(deserialize_with = "lenient::records")]
    pub identity_candidates: Vec<IdentityCandidate>,

    /// Copy of `person_summary.summary` for older readers.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub raw_response: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub enriched_at: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub model_used: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub query_used: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub verification_note: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub needs_manual_review: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub linkedin_profile: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub canonical_name: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub verified: bool,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceBlock {
    #[serde(deserialize_with = "lenient::opt_percent")]
    pub overall_confidence: Option<u8>,
    #[serde(deserialize_with = "lenient::opt_level")]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub matching_factors: Vec<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub disambiguation_notes: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub verification_suggestions: Option<String>,
    /// What the research model claimed before independent re-scoring.
    #[serde(deserialize_with = "lenient::opt_percent", skip_serializing_if = "Option::is_none")]
    pub reported_confidence: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonSummary {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub current_position: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub industry: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub experience_years: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalBackground {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub current_company: Option<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub previous_companies: Vec<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub education: Option<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub skills_expertise: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub notable_achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialProfile {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub follower_count: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub profile_image_url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_flag")]
    pub verified: Option<bool>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub activity_summary: Option<String>,
}

impl SocialProfile {
    pub fn is_linkedin(&self) -> bool {
        self.platform
            .as_deref()
            .is_some_and(|p| p.to_ascii_lowercase().contains("linkedin"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteProfile {
    #[serde(rename = "type", deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentActivity {
    #[serde(rename = "type", deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalInfo {
    #[serde(deserialize_with = "lenient::string_list")]
    pub publications: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub awards: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub speaking_events: Vec<String>,
}

/// An alternative identity the research model considered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityCandidate {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub linkedin_profile: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub confidence: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub image_url: Option<String>,
}

impl IdentityCandidate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl EnrichmentData {
    /// The name the research claims, preferring the identity block.
    pub fn claimed_name(&self) -> Option<&str> {
        self.identity
            .canonical_name
            .as_deref()
            .or(self.person_summary.full_name.as_deref())
    }

    /// The returned identity as a scoring profile.
    pub fn profile(&self) -> CandidateProfile<'_> {
        CandidateProfile {
            name: self.claimed_name(),
            company: self
                .professional_background
                .current_company
                .as_deref()
                .or(self.identity.company.as_deref()),
            location: self
                .person_summary
                .location
                .as_deref()
                .or(self.identity.location.as_deref()),
            current_position: self.person_summary.current_position.as_deref(),
            education: self.professional_background.education.as_deref(),
            linkedin_profile: self.identity.linkedin_profile.as_deref(),
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.person_summary.location.as_deref()
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.person_summary
            .summary
            .as_deref()
            .or(self.summary.as_deref())
    }
}

/// A ranked identity guess returned by candidate discovery.
///
/// Also accepted as `selected_candidate` on enrichment, so unknown keys the
/// client echoes back are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub current_position: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub linkedin_profile: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub profile_image_url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub experience_summary: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub education: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub additional_info: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "lenient::opt_percent")]
    pub confidence: Option<u8>,
    #[serde(deserialize_with = "lenient::opt_level")]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub match_factors: Vec<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub initials: Option<String>,
}

impl Candidate {
    pub fn profile(&self) -> CandidateProfile<'_> {
        CandidateProfile {
            name: self.name.as_deref(),
            company: self.company.as_deref(),
            location: self.location.as_deref(),
            current_position: self.current_position.as_deref(),
            education: self.education.as_deref(),
            linkedin_profile: self.linkedin_profile.as_deref(),
        }
    }
}
