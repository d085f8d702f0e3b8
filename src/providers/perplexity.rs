//! Perplexity chat-completions client with web search options.
//!
//! Some model tiers reject the web-search request fields. When a request fails
//! with HTTP 400 naming one of them, it is resubmitted exactly once without
//! `search_enabled`, `search_mode` and `search_domain_filter`.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};

use super::{first_choice_content, ProviderError, ResearchProvider, ResearchRequest};
use crate::config::ResearchConfig;

const PROVIDER: &str = "perplexity";

static SEARCH_OPTION_REJECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)search_domain_filter|search_mode|search_enabled").expect("valid regex")
});

pub struct PerplexityClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl PerplexityClient {
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn send(&self, api_key: &str, payload: &Value) -> Result<reqwest::Response, ProviderError> {
        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })
    }
}

/// Request body for a research call; search options only when requested.
pub fn build_payload(model: &str, request: &ResearchRequest, with_search: bool) -> Value {
    let mut payload = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": request.system},
            {"role": "user", "content": request.prompt},
        ],
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "return_citations": false,
        "return_images": false,
    });

    if let (true, Some(search)) = (with_search, &request.web_search) {
        payload["search_enabled"] = json!(true);
        payload["search_mode"] = json!("web");
        if !search.domain_filter.is_empty() {
            payload["search_domain_filter"] = json!(search.domain_filter);
        }
    }
    payload
}

/// Whether a failed call should be retried without web-search fields.
pub fn should_retry_without_search(status: u16, body: &str, request: &ResearchRequest) -> bool {
    status == 400 && request.web_search.is_some() && SEARCH_OPTION_REJECTED.is_match(body)
}

#[async_trait]
impl ResearchProvider for PerplexityClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn research(&self, request: &ResearchRequest) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey { provider: PROVIDER })?;

        let mut response = self
            .send(api_key, &build_payload(&self.model, request, true))
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            if !should_retry_without_search(status, &body, request) {
                return Err(ProviderError::Api { provider: PROVIDER, status, body });
            }

            tracing::warn!(status, body = %body, "research request rejected search options, retrying without them");
            response = self
                .send(api_key, &build_payload(&self.model, request, false))
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Api { provider: PROVIDER, status, body });
            }
        }

        let body: Value = response
            .json()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;

        // An empty content string is a valid (if useless) answer.
        Ok(first_choice_content(&body).unwrap_or_default())
    }
}
