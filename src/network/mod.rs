//! `ask-network`: conversational questions over the user's own contacts.
//!
//! Retrieval prefers semantic search and falls back to keyword matching when
//! no assistant provider is configured or vector search finds nothing. The answer
//! comes from the chat model when available, otherwise from
//! [`answer::heuristic_answer`].

pub mod answer;

use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::contacts::{self, search, Contact, ScoredContact};
use crate::db::{self, SharedDb};
use crate::enrichment::{lenient, EnrichmentData};
use crate::error::AgaryError;
use crate::providers::{AssistantProvider, ChatMessage};

const CHAT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub messages: Vec<HistoryMessage>,
}

/// A prior chat turn as the client replays it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryMessage {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::records")]
    pub contacts: Vec<SuggestedContact>,
}

impl HistoryMessage {
    pub fn is_assistant(&self) -> bool {
        self.role.as_deref() == Some("assistant")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SuggestedContact {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

/// A retrieved contact as returned to the client and shown to the model.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkContact {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub enrichment_data: Option<EnrichmentData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl NetworkContact {
    fn from_contact(contact: Contact, similarity: Option<f64>) -> Self {
        Self {
            name: contact.full_name(),
            id: contact.id,
            company: contact.company,
            location: contact.location,
            linkedin_url: contact.linkedin_url,
            enrichment_data: contact.enrichment_data,
            similarity,
        }
    }

    pub fn best_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .or_else(|| self.enrichment_data.as_ref().and_then(|e| e.location()))
    }

    pub fn summary(&self) -> Option<&str> {
        self.enrichment_data
            .as_ref()
            .and_then(|e| e.person_summary.summary.as_deref())
    }
}

impl From<ScoredContact> for NetworkContact {
    fn from(scored: ScoredContact) -> Self {
        Self::from_contact(scored.contact, scored.similarity)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub contacts: Vec<NetworkContact>,
}

pub async fn ask_network(
    db: &SharedDb,
    assistant: Option<&dyn AssistantProvider>,
    config: &NetworkConfig,
    user_id: &str,
    request: AskRequest,
) -> Result<AskResponse, AgaryError> {
    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AgaryError::validation("Question is required"))?
        .to_string();
    let k = request.k.unwrap_or(config.default_k).clamp(1, config.max_k.max(1));

    let mut contacts = match assistant {
        Some(assistant) => semantic_retrieval(db, assistant, config, user_id, &question, k).await,
        None => Vec::new(),
    };

    if contacts.is_empty() {
        let owner = user_id.to_string();
        let query = question.clone();
        contacts = db::with_conn(db, move |conn| search::keyword_search(conn, &owner, &query, k))
            .await
            .map_err(|e| AgaryError::internal("Failed to answer", e))?
            .into_iter()
            .map(|c| NetworkContact::from_contact(c, None))
            .collect();
    }

    tracing::info!(k, retrieved = contacts.len(), "network question");

    let recent = answer::recent_suggestions(&request.messages);
    if let Some(direct) = answer::location_answer(&question, recent, &contacts) {
        return Ok(AskResponse {
            answer: direct,
            contacts,
        });
    }

    let mut reply = None;
    if let Some(assistant) = assistant {
        let mut messages = vec![ChatMessage::system(answer::SYSTEM_PROMPT)];
        messages.extend(answer::history(&request.messages, config.history_limit));
        messages.push(ChatMessage::user(answer::user_prompt(&question, &contacts, recent)));

        match assistant.chat(&messages, CHAT_TEMPERATURE).await {
            Ok(text) if !text.trim().is_empty() => reply = Some(text),
            Ok(_) => tracing::warn!("chat model returned an empty answer"),
            Err(e) => tracing::warn!(error = %e, "chat completion failed, using heuristic answer"),
        }
    }

    Ok(AskResponse {
        answer: reply.unwrap_or_else(|| answer::heuristic_answer(&contacts)),
        contacts,
    })
}

/// Vector retrieval over the user's contacts. Contacts without a vector
/// (never embedded, or invalidated by an edit or enrichment) are embedded
/// first, up to `backfill_batch` per question. Any failure yields an empty
/// result so keyword search can take over.
async fn semantic_retrieval(
    db: &SharedDb,
    assistant: &dyn AssistantProvider,
    config: &NetworkConfig,
    user_id: &str,
    question: &str,
    k: usize,
) -> Vec<NetworkContact> {
    let embedding = match assistant.embed(&[question.to_string()]).await {
        Ok(mut vectors) if !vectors.is_empty() => vectors.swap_remove(0),
        Ok(_) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "question embedding failed, using keyword search");
            return Vec::new();
        }
    };

    match contacts::embed_missing(db, assistant, Some(user_id), config.backfill_batch).await {
        Ok(0) => {}
        Ok(stored) => tracing::info!(stored, "backfilled embeddings before answering"),
        Err(e) => tracing::warn!(error = %e, "opportunistic embedding backfill failed"),
    }

    vector_search(db, user_id, &embedding, k).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "vector search failed, using keyword search");
        Vec::new()
    })
}

async fn vector_search(
    db: &SharedDb,
    user_id: &str,
    embedding: &[f32],
    k: usize,
) -> anyhow::Result<Vec<NetworkContact>> {
    let owner = user_id.to_string();
    let query = embedding.to_vec();
    let hits = db::with_conn(db, move |conn| search::vector_search(conn, &owner, &query, k)).await?;
    Ok(hits.into_iter().map(NetworkContact::from).collect())
}
