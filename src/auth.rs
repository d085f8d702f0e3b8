//! Bearer-token users.
//!
//! Tokens are issued once by `agary user create` and never stored; the
//! `users` table keeps only their SHA-256 hex digest.

use anyhow::{Context, Result};
use axum::extract::FromRef;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::db::{self, SharedDb};
use crate::error::AgaryError;

const TOKEN_PREFIX: &str = "agary_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// A freshly created user and the only copy of their plaintext token.
#[derive(Debug)]
pub struct IssuedUser {
    pub user: User,
    pub token: String,
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_token() -> String {
    format!("{TOKEN_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

pub fn create_user(conn: &Connection, name: &str) -> Result<IssuedUser> {
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "user name must not be empty");

    let token = generate_token();
    let user = User {
        id: uuid::Uuid::now_v7().to_string(),
        name: name.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    conn.execute(
        "INSERT INTO users (id, name, token_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user.id, user.name, hash_token(&token), user.created_at],
    )
    .context("failed to insert user")?;

    tracing::info!(user_id = %user.id, name = %user.name, "user created");
    Ok(IssuedUser { user, token })
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM users ORDER BY created_at")?;
    let users = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn find_user_by_token(conn: &Connection, token: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, name, created_at FROM users WHERE token_hash = ?1",
            params![hash_token(token)],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The authenticated caller. Rejects with 401 when the header is missing,
/// malformed, or names an unknown token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    SharedDb: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AgaryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string)
            .ok_or(AgaryError::Unauthorized)?;

        let db = SharedDb::from_ref(state);
        let user = db::with_conn(&db, move |conn| find_user_by_token(conn, &token))
            .await
            .map_err(|e| AgaryError::internal("Failed to authenticate", e))?;

        match user {
            Some(user) => Ok(AuthUser(user)),
            None => {
                tracing::debug!("rejected unknown bearer token");
                Err(AgaryError::Unauthorized)
            }
        }
    }
}
