//! AI-assisted personal CRM: contact storage, identity-checked enrichment and
//! conversational search over your own network.
//!
//! Agary is an HTTP service. Each user's contacts live in SQLite, can be
//! enriched through a web-grounded research model, and are embedded for
//! semantic retrieval when answering questions about the network.
//!
//! # Architecture
//!
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   holding one embedding per contact
//! - **Research**: Perplexity chat completions with web search, parsed
//!   leniently and cross-validated before anything is marked verified
//! - **Assistant**: OpenAI embeddings and chat, optional; without a key the
//!   service falls back to keyword search and heuristic answers
//! - **Transport**: JSON over HTTP (axum) with bearer-token users
//!
//! # Modules
//!
//! - [`config`]: configuration from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, migrations and health checks
//! - [`matching`]: normalization, similarity scoring and confidence aggregation
//! - [`enrichment`]: enrichment and candidate discovery flows
//! - [`network`]: question answering over a user's contacts
//! - [`contacts`]: contact storage and retrieval
//! - [`providers`]: research and assistant model clients
//! - [`server`]: the axum router and handlers

pub mod auth;
pub mod cli;
pub mod config;
pub mod contacts;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod matching;
pub mod network;
pub mod providers;
pub mod server;
