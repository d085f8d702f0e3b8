//! OpenAI embeddings and chat completions.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{first_choice_content, AssistantProvider, ChatMessage, ProviderError, EMBEDDING_DIM};
use crate::config::AssistantConfig;

const PROVIDER: &str = "openai";

pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    embedding_model: String,
    chat_model: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &AssistantConfig, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embedding_model: config.embedding_model.clone(),
            chat_model: config.chat_model.clone(),
            api_key: api_key.to_string(),
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })
    }
}

/// Extract `data[].embedding` vectors, ordered by each item's `index`.
pub fn parse_embeddings(body: &Value, expected: usize) -> Result<Vec<Vec<f32>>, ProviderError> {
    let malformed = |message: &str| ProviderError::Malformed {
        provider: PROVIDER,
        message: message.to_string(),
    };

    let data = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing data array"))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let embedding = item
            .get("embedding")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing embedding"))?;
        let vector: Vec<f32> = embedding
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        if vector.len() != EMBEDDING_DIM {
            return Err(malformed(&format!(
                "embedding has {} dimensions, expected {EMBEDDING_DIM}",
                vector.len()
            )));
        }
        let index = item
            .get("index")
            .and_then(Value::as_u64)
            .map(|i| i as usize)
            .unwrap_or(position);
        indexed.push((index, vector));
    }

    if indexed.len() != expected {
        return Err(malformed(&format!(
            "got {} embeddings for {expected} inputs",
            indexed.len()
        )));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}

#[async_trait]
impl AssistantProvider for OpenAiClient {
    fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = json!({
            "model": self.embedding_model,
            "input": texts,
        });
        let response = self.post("embeddings", &body).await?;
        parse_embeddings(&response, texts.len())
    }

    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.chat_model,
            "messages": messages,
            "temperature": temperature,
        });
        let response = self.post("chat/completions", &body).await?;
        first_choice_content(&response).ok_or_else(|| ProviderError::Malformed {
            provider: PROVIDER,
            message: "missing choices[0].message.content".to_string(),
        })
    }
}
