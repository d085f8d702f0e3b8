//! Contact retrieval: embedding storage, per-user vector search and the
//! keyword fallback.

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection};
use serde::Serialize;

use super::store::{contact_columns, escape_like, get_contact, read_contact};
use super::types::Contact;
use crate::providers::EMBEDDING_DIM;

const STOPWORDS: &[&str] = &[
    "who", "whos", "whois", "s", "is", "the", "a", "an", "in", "on", "at", "for", "with", "about",
    "my", "our", "network", "help", "can", "me", "tell", "find",
];
const MAX_KEYWORD_TOKENS: usize = 5;

/// A retrieved contact with its cosine similarity to the query, when the
/// match came from vector search.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredContact {
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// View an `f32` slice as the little-endian byte blob sqlite-vec expects.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            std::mem::size_of_val(embedding),
        )
    }
}

/// Replace the stored embedding for a contact.
pub fn store_embedding(conn: &Connection, contact_id: &str, embedding: &[f32]) -> Result<()> {
    anyhow::ensure!(
        embedding.len() == EMBEDDING_DIM,
        "embedding has {} dimensions, expected {EMBEDDING_DIM}",
        embedding.len()
    );
    delete_embedding(conn, contact_id)?;
    conn.execute(
        "INSERT INTO contacts_vec (id, embedding) VALUES (?1, ?2)",
        params![contact_id, embedding_to_bytes(embedding)],
    )
    .context("failed to store contact embedding")?;
    Ok(())
}

pub fn delete_embedding(conn: &Connection, contact_id: &str) -> Result<()> {
    conn.execute("DELETE FROM contacts_vec WHERE id = ?1", params![contact_id])
        .context("failed to delete contact embedding")?;
    Ok(())
}

pub fn user_has_embeddings(conn: &Connection, user_id: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM contacts_vec WHERE id IN \
         (SELECT id FROM contacts WHERE user_id = ?1))",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Contacts without an embedding, most recently updated first. `None` spans
/// all users.
pub fn contacts_missing_embeddings(
    conn: &Connection,
    user_id: Option<&str>,
    limit: usize,
) -> Result<Vec<Contact>> {
    let sql = format!(
        "SELECT {} FROM contacts \
         WHERE (?1 IS NULL OR user_id = ?1) AND id NOT IN (SELECT id FROM contacts_vec) \
         ORDER BY updated_at DESC LIMIT ?2",
        contact_columns()
    );
    let mut stmt = conn.prepare(&sql)?;
    let contacts = stmt
        .query_map(params![user_id, limit as i64], read_contact)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(contacts)
}

pub fn count_missing_embeddings(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE id NOT IN (SELECT id FROM contacts_vec)",
        [],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// The user's `k` nearest contacts by cosine distance.
pub fn vector_search(
    conn: &Connection,
    user_id: &str,
    query_embedding: &[f32],
    k: usize,
) -> Result<Vec<ScoredContact>> {
    let mut stmt = conn.prepare(
        "SELECT v.id, vec_distance_cosine(v.embedding, ?1) AS distance \
         FROM contacts_vec v \
         WHERE v.id IN (SELECT id FROM contacts WHERE user_id = ?2) \
         ORDER BY distance LIMIT ?3",
    )?;
    let hits: Vec<(String, f64)> = stmt
        .query_map(
            params![embedding_to_bytes(query_embedding), user_id, k as i64],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?
        .collect::<Result<Vec<_>, _>>()
        .context("vector search failed")?;

    let mut results = Vec::with_capacity(hits.len());
    for (id, distance) in hits {
        if let Some(contact) = get_contact(conn, user_id, &id)? {
            results.push(ScoredContact {
                contact,
                similarity: Some(1.0 - distance),
            });
        }
    }
    Ok(results)
}

/// Lowercase alphanumeric tokens of two or more characters, stopwords
/// removed, at most five.
pub fn keyword_tokens(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() >= 2 && !STOPWORDS.contains(t))
        .take(MAX_KEYWORD_TOKENS)
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring search over names, company and notes. Any
/// token may match any field. A question with no usable tokens is searched
/// whole, commas removed.
pub fn keyword_search(conn: &Connection, user_id: &str, question: &str, k: usize) -> Result<Vec<Contact>> {
    let mut terms = keyword_tokens(question);
    if terms.is_empty() {
        let whole = question.replace(',', " ");
        let whole = whole.trim();
        if whole.is_empty() {
            return Ok(Vec::new());
        }
        terms.push(whole.to_string());
    }

    let clauses: Vec<String> = (0..terms.len())
        .map(|i| {
            let p = i + 2;
            format!(
                "first_name LIKE ?{p} ESCAPE '\\' OR last_name LIKE ?{p} ESCAPE '\\' \
                 OR company LIKE ?{p} ESCAPE '\\' OR notes LIKE ?{p} ESCAPE '\\'"
            )
        })
        .collect();
    let sql = format!(
        "SELECT {} FROM contacts WHERE user_id = ?1 AND ({}) ORDER BY updated_at DESC LIMIT {}",
        contact_columns(),
        clauses.join(" OR "),
        k
    );

    let mut values = vec![user_id.to_string()];
    values.extend(terms.iter().map(|t| format!("%{}%", escape_like(t))));

    let mut stmt = conn.prepare(&sql)?;
    let contacts = stmt
        .query_map(params_from_iter(values.iter()), read_contact)?
        .collect::<Result<Vec<_>, _>>()
        .context("keyword search failed")?;
    Ok(contacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_drop_stopwords_and_short_words() {
        assert_eq!(
            keyword_tokens("Who in my network knows Rust, Go & k8s at Acme?"),
            vec!["knows", "rust", "go", "k8s", "acme"]
        );
        assert!(keyword_tokens("who is the a?").is_empty());
    }

    #[test]
    fn tokens_are_capped() {
        assert_eq!(keyword_tokens("one two three four five six seven").len(), 5);
    }

    #[test]
    fn byte_view_matches_length() {
        let v = [1.0f32, 2.0, 3.0];
        assert_eq!(embedding_to_bytes(&v).len(), 12);
    }
}
