//! Contact records and the request shapes that create and patch them.

use serde::{Deserialize, Serialize};

use crate::enrichment::types::EnrichmentData;
use crate::matching::InputSignals;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    /// Comma-separated `"Label: url"` entries.
    pub other_links: Option<String>,
    pub notes: Option<String>,
    pub enrichment_data: Option<EnrichmentData>,
    pub created_at: String,
    pub updated_at: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// What is known about this person, for scoring research results.
    pub fn input_signals(&self) -> InputSignals {
        InputSignals {
            name: self.full_name(),
            company: self.company.clone(),
            location: self.location.clone(),
            linkedin_url: self.linkedin_url.clone(),
        }
    }

    /// Text embedded for semantic search: names, company, notes, and the
    /// enrichment summary and current company when present.
    pub fn embedding_text(&self) -> String {
        let enrichment = self.enrichment_data.as_ref();
        [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            self.company.as_deref(),
            self.notes.as_deref(),
            enrichment.and_then(|e| e.person_summary.summary.as_deref()),
            enrichment.and_then(|e| e.professional_background.current_company.as_deref()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Stored location, falling back to the enriched one.
    pub fn best_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .or_else(|| self.enrichment_data.as_ref().and_then(|e| e.location()))
    }

    pub fn summary(&self) -> Option<&str> {
        self.enrichment_data.as_ref().and_then(|e| e.summary_text())
    }
}

/// Body of `POST /api/contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContact {
    #[serde(default, alias = "firstName")]
    pub first_name: String,
    #[serde(default, alias = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "linkedinUrl")]
    pub linkedin_url: Option<String>,
    #[serde(default, alias = "otherLinks")]
    pub other_links: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `PATCH /api/contacts/{id}`. Absent fields are left alone; an empty
/// string clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPatch {
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
    #[serde(default, alias = "otherLinks")]
    pub other_links: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ContactPatch {
    /// Whether the patch touches fields that feed the search embedding or
    /// identity matching.
    pub fn touches_identity(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.company.is_some()
            || self.notes.is_some()
            || self.location.is_some()
            || self.linkedin_url.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.touches_identity() && self.other_links.is_none()
    }
}

/// Trim, mapping blank to `None`.
pub fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
