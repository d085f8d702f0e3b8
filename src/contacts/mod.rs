//! Contacts: the per-user address book, its embeddings and retrieval.

pub mod search;
pub mod store;
pub mod types;

use anyhow::{Context, Result};

pub use search::ScoredContact;
pub use types::{Contact, ContactPatch, NewContact};

use crate::db::{self, migrations, SharedDb};
use crate::providers::AssistantProvider;

/// Embed up to `limit` contacts that have no embedding yet and store the
/// vectors. `user_id = None` covers every user. Returns how many were stored.
pub async fn embed_missing(
    db: &SharedDb,
    assistant: &dyn AssistantProvider,
    user_id: Option<&str>,
    limit: usize,
) -> Result<usize> {
    let owner = user_id.map(str::to_string);
    let pending = db::with_conn(db, move |conn| {
        search::contacts_missing_embeddings(conn, owner.as_deref(), limit)
    })
    .await?;

    if pending.is_empty() {
        return Ok(0);
    }

    let texts: Vec<String> = pending.iter().map(Contact::embedding_text).collect();
    let vectors = assistant
        .embed(&texts)
        .await
        .context("embedding request failed")?;

    let ids: Vec<String> = pending.into_iter().map(|c| c.id).collect();
    let model = assistant.embedding_model().to_string();
    let stored = db::with_conn(db, move |conn| {
        let tx = conn.transaction()?;
        for (id, vector) in ids.iter().zip(&vectors) {
            search::store_embedding(&tx, id, vector)?;
        }
        migrations::set_embedding_model(&tx, &model)?;
        tx.commit()?;
        Ok(ids.len().min(vectors.len()))
    })
    .await?;

    tracing::info!(count = stored, "stored contact embeddings");
    Ok(stored)
}
