//! Operator commands: user management, embedding backfill and diagnostics.

pub mod doctor;
pub mod embed;
pub mod user;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::AgaryConfig;
use crate::db;

fn open_configured_database(config: &AgaryConfig) -> Result<Connection> {
    let db_path = config.resolved_db_path();
    db::open_database(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))
}
