//! External AI providers.
//!
//! Two seams, both object-safe so handlers can hold `Arc<dyn _>` and tests can
//! substitute scripted fakes:
//!
//! - [`ResearchProvider`]: web-grounded person research (Perplexity
//!   chat completions, see [`perplexity`]).
//! - [`AssistantProvider`]: embeddings and conversational answers (OpenAI,
//!   see [`openai`]).
//!
//! Every call returns a [`ProviderError`] on failure. Callers treat these as
//! soft failures and degrade to heuristic paths.

pub mod openai;
pub mod perplexity;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{AssistantConfig, ResearchConfig};

/// Dimensions of `text-embedding-3-small` vectors, as stored in `contacts_vec`.
pub const EMBEDDING_DIM: usize = 1536;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} API key is not configured")]
    MissingApiKey { provider: &'static str },

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned an unexpected response: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// Restrict web search to these domains (e.g. `linkedin.com`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebSearch {
    pub domain_filter: Vec<String>,
}

impl WebSearch {
    pub fn anywhere() -> Self {
        Self::default()
    }

    pub fn linkedin_only() -> Self {
        Self {
            domain_filter: vec!["linkedin.com".to_string()],
        }
    }
}

/// One research completion: a system instruction plus a user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub web_search: Option<WebSearch>,
}

#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Model identifier recorded alongside enrichment results.
    fn model_name(&self) -> &str;

    /// Run the request and return the first choice's text content.
    async fn research(&self, request: &ResearchRequest) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait AssistantProvider: Send + Sync {
    fn embedding_model(&self) -> &str;

    /// Embed a batch of texts, one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, ProviderError>;
}

/// Create the research provider. A missing API key is not an error here; calls
/// fail softly with [`ProviderError::MissingApiKey`].
pub fn create_research_provider(config: &ResearchConfig) -> Result<Arc<dyn ResearchProvider>> {
    let client = perplexity::PerplexityClient::new(config)?;
    if config.api_key.is_none() {
        tracing::warn!("no Perplexity API key configured; enrichment will use placeholder data");
    }
    Ok(Arc::new(client))
}

/// Create the assistant provider, or `None` when no OpenAI key is configured
/// (network Q&A then falls back to keyword search and heuristic answers).
pub fn create_assistant_provider(
    config: &AssistantConfig,
) -> Result<Option<Arc<dyn AssistantProvider>>> {
    match config.api_key.as_deref() {
        Some(key) => {
            let client = openai::OpenAiClient::new(config, key)?;
            Ok(Some(Arc::new(client)))
        }
        None => {
            tracing::info!("no OpenAI API key configured; embeddings and chat answers disabled");
            Ok(None)
        }
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response body.
pub(crate) fn first_choice_content(body: &serde_json::Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}
