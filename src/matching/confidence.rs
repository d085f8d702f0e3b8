//! Confidence aggregation: component scores → 0–100 score, tier and factors.

use serde::{Deserialize, Serialize};

use super::linkedin;
use super::similarity::{company_similarity, location_similarity, name_similarity};

pub const LINKEDIN_MATCH_SCORE: u8 = 95;
pub const LINKEDIN_MATCH_FACTOR: &str = "Exact LinkedIn URL match";
pub const MAX_SCORE: u8 = 100;

/// Confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// 80 and above is high, 60 and above medium.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::High,
            60.. => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown confidence level: {other}")),
        }
    }
}

/// What the user already knows about the person being looked up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSignals {
    pub name: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
}

/// The identity claims of a candidate, borrowed from whatever record carries them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateProfile<'a> {
    pub name: Option<&'a str>,
    pub company: Option<&'a str>,
    pub location: Option<&'a str>,
    pub current_position: Option<&'a str>,
    pub education: Option<&'a str>,
    pub linkedin_profile: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfidenceScore {
    pub score: u8,
    pub level: ConfidenceLevel,
    pub factors: Vec<String>,
}

/// Score a candidate against the input signals.
///
/// A LinkedIn URL on both sides that resolves to the same profile short-circuits
/// to 95/high. Otherwise name (≤30), company (≤25), location (≤20) and a
/// profile-richness bonus (≤25) are summed and capped at 100. Never fails;
/// absent fields contribute nothing.
pub fn score_candidate(candidate: &CandidateProfile<'_>, input: &InputSignals) -> ConfidenceScore {
    if let (Some(theirs), Some(ours)) = (filled(candidate.linkedin_profile), filled(input.linkedin_url.as_deref())) {
        if linkedin::same_profile(theirs, ours) {
            return ConfidenceScore {
                score: LINKEDIN_MATCH_SCORE,
                level: ConfidenceLevel::High,
                factors: vec![LINKEDIN_MATCH_FACTOR.to_string()],
            };
        }
    }

    let mut factors = Vec::new();

    let name_score = candidate
        .name
        .map(|name| name_similarity(name, &input.name))
        .unwrap_or(0);
    if name_score > 20 {
        factors.push("Strong name match".to_string());
    } else if name_score > 10 {
        factors.push("Partial name match".to_string());
    }

    let company_score = company_similarity(candidate.company, input.company.as_deref());
    if company_score > 15 {
        factors.push("Company alignment".to_string());
    } else if company_score > 8 {
        factors.push("Partial company match".to_string());
    }

    let location_score = location_similarity(candidate.location, input.location.as_deref());
    if location_score > 10 {
        factors.push("Location consistency".to_string());
    }

    let uniqueness = uniqueness_bonus(candidate);
    if uniqueness > 15 {
        factors.push("Rich professional profile".to_string());
    }

    let total = name_score as u16 + company_score as u16 + location_score as u16 + uniqueness as u16;
    let score = total.min(MAX_SCORE as u16) as u8;

    ConfidenceScore {
        score,
        level: ConfidenceLevel::from_score(score),
        factors,
    }
}

/// +10 for a descriptive position, +5 for education, +10 for any LinkedIn profile.
fn uniqueness_bonus(candidate: &CandidateProfile<'_>) -> u8 {
    let mut bonus = 0;
    if candidate
        .current_position
        .is_some_and(|p| p.chars().count() > 10)
    {
        bonus += 10;
    }
    if filled(candidate.education).is_some() {
        bonus += 5;
    }
    if filled(candidate.linkedin_profile).is_some() {
        bonus += 10;
    }
    bonus
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(name: &str) -> InputSignals {
        InputSignals {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn linkedin_fast_path_overrides_weak_signals() {
        let candidate = CandidateProfile {
            name: Some("Completely Different"),
            company: Some("Nowhere Ltd"),
            location: Some("Antarctica"),
            linkedin_profile: Some("https://www.linkedin.com/in/jane-doe/"),
            ..Default::default()
        };
        let input = InputSignals {
            name: "Jane Doe".into(),
            company: Some("Acme".into()),
            location: Some("Berlin".into()),
            linkedin_url: Some("https://linkedin.com/in/Jane-Doe".into()),
        };
        let result = score_candidate(&candidate, &input);
        assert_eq!(result.score, 95);
        assert_eq!(result.level, ConfidenceLevel::High);
        assert_eq!(result.factors, vec!["Exact LinkedIn URL match".to_string()]);
    }

    #[test]
    fn blank_linkedin_on_both_sides_does_not_fast_path() {
        let candidate = CandidateProfile {
            name: Some("Jane Doe"),
            linkedin_profile: Some("not-a-url"),
            ..Default::default()
        };
        let input = InputSignals {
            linkedin_url: Some("also-not-a-url".into()),
            ..signals("Jane Doe")
        };
        let result = score_candidate(&candidate, &input);
        // 30 name + 10 for carrying a linkedin field
        assert_eq!(result.score, 40);
        assert_eq!(result.level, ConfidenceLevel::Low);
    }

    #[test]
    fn full_match_is_capped_at_one_hundred() {
        let candidate = CandidateProfile {
            name: Some("Jane Doe"),
            company: Some("Acme"),
            location: Some("Berlin"),
            current_position: Some("Head of Platform Engineering at Acme"),
            education: Some("TU Berlin"),
            linkedin_profile: Some("https://linkedin.com/in/other"),
        };
        let input = InputSignals {
            name: "Jane Doe".into(),
            company: Some("Acme".into()),
            location: Some("Berlin".into()),
            linkedin_url: None,
        };
        let result = score_candidate(&candidate, &input);
        assert_eq!(result.score, 100);
        assert_eq!(result.level, ConfidenceLevel::High);
        assert!(result.factors.contains(&"Strong name match".to_string()));
        assert!(result.factors.contains(&"Company alignment".to_string()));
        assert!(result.factors.contains(&"Location consistency".to_string()));
        assert!(result.factors.contains(&"Rich professional profile".to_string()));
    }

    #[test]
    fn absent_fields_degrade_to_zero() {
        let result = score_candidate(&CandidateProfile::default(), &signals("Jane Doe"));
        assert_eq!(result.score, 0);
        assert_eq!(result.level, ConfidenceLevel::Low);
        assert!(result.factors.is_empty());
    }

    #[test]
    fn medium_tier_boundary() {
        // 30 name + 25 company + 5 education = 60
        let candidate = CandidateProfile {
            name: Some("Jane Doe"),
            company: Some("Acme"),
            education: Some("MIT"),
            ..Default::default()
        };
        let input = InputSignals {
            company: Some("Acme".into()),
            ..signals("Jane Doe")
        };
        let result = score_candidate(&candidate, &input);
        assert_eq!(result.score, 60);
        assert_eq!(result.level, ConfidenceLevel::Medium);
    }

    #[test]
    fn level_parsing() {
        assert_eq!("HIGH".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::High);
        assert!("certain".parse::<ConfidenceLevel>().is_err());
        assert_eq!(ConfidenceLevel::from_score(79), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(59), ConfidenceLevel::Low);
    }
}
