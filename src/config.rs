use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AgaryConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub research: ResearchConfig,
    pub assistant: AssistantConfig,
    pub enrichment: EnrichmentConfig,
    pub network: NetworkConfig,
    /// Problems found while loading. Logged by `main` once tracing is up.
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

/// Web-grounded person research (Perplexity chat completions).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Embeddings and conversational answers (OpenAI).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Minimum independently re-scored confidence for `verified = true`.
    pub acceptance_threshold: u8,
    /// Confidence assigned when identity validation fails.
    pub review_confidence: u8,
    pub max_candidates: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub default_k: usize,
    pub max_k: usize,
    pub history_limit: usize,
    pub backfill_batch: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8787,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_agary_dir()
            .join("agary.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.perplexity.ai".into(),
            model: "sonar-pro".into(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            embedding_model: "text-embedding-3-small".into(),
            chat_model: "gpt-4o-mini".into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 50,
            review_confidence: 45,
            max_candidates: 5,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_k: 6,
            max_k: 20,
            history_limit: 12,
            backfill_batch: 50,
        }
    }
}

/// Returns `~/.agary/`, or `./.agary` when no home directory is known.
pub fn default_agary_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".agary")
}

/// Returns the default config file path: `~/.agary/config.toml`
pub fn default_config_path() -> PathBuf {
    default_agary_dir().join("config.toml")
}

impl AgaryConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            AgaryConfig::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment variable overrides read through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("AGARY_DB") {
            self.storage.db_path = val;
        }
        if let Some(val) = lookup("AGARY_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Some(val) = lookup("AGARY_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("AGARY_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => self
                    .load_warnings
                    .push(format!("ignoring invalid AGARY_PORT {val:?}")),
            }
        }
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
        if let Some(val) = non_empty("PERPLEXITY_API_KEY") {
            self.research.api_key = Some(val);
        }
        if let Some(val) = non_empty("OPENAI_API_KEY") {
            self.assistant.api_key = Some(val);
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
