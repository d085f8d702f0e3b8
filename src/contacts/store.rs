//! Contact persistence. Every query is scoped by `user_id`.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::search::delete_embedding;
use super::types::{clean, Contact, ContactPatch, NewContact};
use crate::enrichment::types::EnrichmentData;

const CONTACT_COLUMNS: &str = "id, user_id, first_name, last_name, company, location, linkedin_url, \
     other_links, notes, enrichment_data, created_at, updated_at";

/// Fixed-width UTC timestamp so stored values sort lexically.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn insert_contact(conn: &Connection, user_id: &str, new: &NewContact) -> Result<Contact> {
    let now = now_timestamp();
    let contact = Contact {
        id: uuid::Uuid::now_v7().to_string(),
        user_id: user_id.to_string(),
        first_name: new.first_name.trim().to_string(),
        last_name: new.last_name.trim().to_string(),
        company: clean(new.company.as_deref()),
        location: clean(new.location.as_deref()),
        linkedin_url: clean(new.linkedin_url.as_deref()),
        other_links: clean(new.other_links.as_deref()),
        notes: clean(new.notes.as_deref()),
        enrichment_data: None,
        created_at: now.clone(),
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO contacts (id, user_id, first_name, last_name, company, location, linkedin_url, \
         other_links, notes, enrichment_data, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, ?10, ?11)",
        params![
            contact.id,
            contact.user_id,
            contact.first_name,
            contact.last_name,
            contact.company,
            contact.location,
            contact.linkedin_url,
            contact.other_links,
            contact.notes,
            contact.created_at,
            contact.updated_at,
        ],
    )
    .context("failed to insert contact")?;

    tracing::debug!(contact_id = %contact.id, user_id, "contact created");
    Ok(contact)
}

pub fn get_contact(conn: &Connection, user_id: &str, id: &str) -> Result<Option<Contact>> {
    let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1 AND user_id = ?2");
    let contact = conn
        .query_row(&sql, params![id, user_id], read_contact)
        .optional()
        .context("failed to load contact")?;
    Ok(contact)
}

/// Newest first. `filter` is a case-insensitive substring match over names,
/// company, location and notes.
pub fn list_contacts(conn: &Connection, user_id: &str, filter: Option<&str>) -> Result<Vec<Contact>> {
    let pattern = clean(filter).map(|f| format!("%{}%", escape_like(&f)));
    let sql = format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts \
         WHERE user_id = ?1 AND (?2 IS NULL \
           OR first_name LIKE ?2 ESCAPE '\\' OR last_name LIKE ?2 ESCAPE '\\' \
           OR company LIKE ?2 ESCAPE '\\' OR location LIKE ?2 ESCAPE '\\' \
           OR notes LIKE ?2 ESCAPE '\\') \
         ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let contacts = stmt
        .query_map(params![user_id, pattern], read_contact)?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to list contacts")?;
    Ok(contacts)
}

/// Apply a partial update. Returns `None` when the contact does not exist for
/// this user. Identity edits drop the stale search embedding.
pub fn update_contact(
    conn: &mut Connection,
    user_id: &str,
    id: &str,
    patch: &ContactPatch,
) -> Result<Option<Contact>> {
    let Some(mut contact) = get_contact(conn, user_id, id)? else {
        return Ok(None);
    };

    if let Some(first) = &patch.first_name {
        contact.first_name = first.trim().to_string();
    }
    if let Some(last) = &patch.last_name {
        contact.last_name = last.trim().to_string();
    }
    let optional_fields = [
        (&patch.company, &mut contact.company),
        (&patch.location, &mut contact.location),
        (&patch.linkedin_url, &mut contact.linkedin_url),
        (&patch.other_links, &mut contact.other_links),
        (&patch.notes, &mut contact.notes),
    ];
    for (incoming, field) in optional_fields {
        if let Some(value) = incoming {
            *field = clean(Some(value.as_str()));
        }
    }

    save_contact(conn, &mut contact, patch.touches_identity())?;
    Ok(Some(contact))
}

/// Write every mutable field of `contact` and bump `updated_at`.
pub fn save_contact(conn: &mut Connection, contact: &mut Contact, invalidate_embedding: bool) -> Result<()> {
    contact.updated_at = now_timestamp();
    let enrichment = contact
        .enrichment_data
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("failed to serialize enrichment data")?;

    let tx = conn.transaction()?;
    let rows = tx.execute(
        "UPDATE contacts SET first_name = ?1, last_name = ?2, company = ?3, location = ?4, \
         linkedin_url = ?5, other_links = ?6, notes = ?7, enrichment_data = ?8, updated_at = ?9 \
         WHERE id = ?10 AND user_id = ?11",
        params![
            contact.first_name,
            contact.last_name,
            contact.company,
            contact.location,
            contact.linkedin_url,
            contact.other_links,
            contact.notes,
            enrichment,
            contact.updated_at,
            contact.id,
            contact.user_id,
        ],
    )?;
    anyhow::ensure!(rows == 1, "contact {} no longer exists", contact.id);

    if invalidate_embedding {
        delete_embedding(&tx, &contact.id)?;
    }
    tx.commit()?;
    Ok(())
}

/// Delete a contact and its embedding. Returns whether anything was deleted.
pub fn delete_contact(conn: &mut Connection, user_id: &str, id: &str) -> Result<bool> {
    let tx = conn.transaction()?;
    let rows = tx.execute(
        "DELETE FROM contacts WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if rows > 0 {
        delete_embedding(&tx, id)?;
    }
    tx.commit()?;
    Ok(rows > 0)
}

pub(crate) fn read_contact(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let id: String = row.get(0)?;
    let enrichment_json: Option<String> = row.get(9)?;
    let enrichment_data = enrichment_json.and_then(|json| {
        serde_json::from_str::<EnrichmentData>(&json)
            .map_err(|e| tracing::warn!(contact_id = %id, error = %e, "ignoring unreadable enrichment data"))
            .ok()
    });

    Ok(Contact {
        id,
        user_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        company: row.get(4)?,
        location: row.get(5)?,
        linkedin_url: row.get(6)?,
        other_links: row.get(7)?,
        notes: row.get(8)?,
        enrichment_data,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

pub(crate) fn contact_columns() -> &'static str {
    CONTACT_COLUMNS
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::create_user;
    use crate::db::open_memory_database;

    fn new_contact(first: &str, last: &str) -> NewContact {
        NewContact {
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }
    }

    #[test]
    fn contacts_are_scoped_to_their_owner() {
        let conn = open_memory_database().unwrap();
        let alice = create_user(&conn, "alice").unwrap().user;
        let bob = create_user(&conn, "bob").unwrap().user;

        let c = insert_contact(&conn, &alice.id, &new_contact("Jane", "Doe")).unwrap();
        assert!(get_contact(&conn, &alice.id, &c.id).unwrap().is_some());
        assert!(get_contact(&conn, &bob.id, &c.id).unwrap().is_none());
        assert!(list_contacts(&conn, &bob.id, None).unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first_and_filterable() {
        let conn = open_memory_database().unwrap();
        let user = create_user(&conn, "u").unwrap().user;
        insert_contact(&conn, &user.id, &new_contact("Ada", "Lovelace")).unwrap();
        let mut grace = new_contact("Grace", "Hopper");
        grace.company = Some("US Navy".into());
        insert_contact(&conn, &user.id, &grace).unwrap();

        let all = list_contacts(&conn, &user.id, None).unwrap();
        assert_eq!(all[0].first_name, "Grace");
        assert_eq!(all[1].first_name, "Ada");

        let navy = list_contacts(&conn, &user.id, Some("navy")).unwrap();
        assert_eq!(navy.len(), 1);
        assert_eq!(navy[0].last_name, "Hopper");

        assert!(list_contacts(&conn, &user.id, Some("100%")).unwrap().is_empty());
        assert_eq!(list_contacts(&conn, &user.id, Some("  ")).unwrap().len(), 2);
    }

    #[test]
    fn patch_clears_with_empty_string() {
        let mut conn = open_memory_database().unwrap();
        let user = create_user(&conn, "u").unwrap().user;
        let mut body = new_contact("Jane", "Doe");
        body.company = Some("Acme".into());
        body.notes = Some("likes rust".into());
        let c = insert_contact(&conn, &user.id, &body).unwrap();

        let patch = ContactPatch {
            company: Some(String::new()),
            location: Some(" Berlin ".into()),
            ..Default::default()
        };
        let updated = update_contact(&mut conn, &user.id, &c.id, &patch).unwrap().unwrap();
        assert_eq!(updated.company, None);
        assert_eq!(updated.location.as_deref(), Some("Berlin"));
        assert_eq!(updated.notes.as_deref(), Some("likes rust"));
        assert!(updated.updated_at >= c.updated_at);

        assert!(update_contact(&mut conn, "someone-else", &c.id, &patch).unwrap().is_none());
    }

    #[test]
    fn unreadable_enrichment_is_ignored() {
        let conn = open_memory_database().unwrap();
        let user = create_user(&conn, "u").unwrap().user;
        let c = insert_contact(&conn, &user.id, &new_contact("Jane", "Doe")).unwrap();
        conn.execute("UPDATE contacts SET enrichment_data = 'not json' WHERE id = ?1", [&c.id])
            .unwrap();
        let loaded = get_contact(&conn, &user.id, &c.id).unwrap().unwrap();
        assert!(loaded.enrichment_data.is_none());
    }

    #[test]
    fn delete_reports_whether_it_deleted() {
        let mut conn = open_memory_database().unwrap();
        let user = create_user(&conn, "u").unwrap().user;
        let c = insert_contact(&conn, &user.id, &new_contact("Jane", "Doe")).unwrap();
        assert!(delete_contact(&mut conn, &user.id, &c.id).unwrap());
        assert!(!delete_contact(&mut conn, &user.id, &c.id).unwrap());
    }

    #[test]
    fn like_escaping() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }
}
