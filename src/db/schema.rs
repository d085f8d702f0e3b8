//! SQL DDL for all Agary tables.
//!
//! Defines `users`, `contacts`, `contacts_vec` (vec0) and `schema_meta`. All DDL
//! uses `IF NOT EXISTS` so initialization is idempotent.

use rusqlite::Connection;

use crate::providers::EMBEDDING_DIM;

const SCHEMA_SQL: &str = r#"
-- API users; only a SHA-256 hash of each bearer token is kept
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    token_hash TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- Contacts, owned by a user
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    company TEXT,
    location TEXT,
    linkedin_url TEXT,
    other_links TEXT,
    notes TEXT,
    enrichment_data TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_contacts_user ON contacts(user_id);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// vec0 DDL; the dimension is baked into the table definition.
fn vec_table_sql() -> String {
    format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS contacts_vec USING vec0(\n    \
         id TEXT PRIMARY KEY,\n    embedding FLOAT[{EMBEDDING_DIM}]\n);"
    )
}

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(&vec_table_sql())?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
