//! Store-backed login sessions.
//!
//! ARCHITECTURE
//! ============
//! A session is a random token held by the client in a cookie and a row in
//! `sessions` mapping it to a user. Resolving a token joins through `users`,
//! so a session whose user no longer exists never resolves.
//!
//! Writers take any `PgExecutor` so signup and login can create the session
//! inside the same transaction as the rest of their writes.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgExecutor, PgPool, Row};
use uuid::Uuid;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// User resolved from a live session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
}

/// Create a session for the given user, returning the token.
pub async fn create_session(executor: impl PgExecutor<'_>, user_id: Uuid, ttl_days: i32) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query(
        "INSERT INTO sessions (token, user_id, expires_at)
         VALUES ($1, $2, now() + make_interval(days => $3))",
    )
    .bind(&token)
    .bind(user_id)
    .bind(ttl_days)
    .execute(executor)
    .await?;
    Ok(token)
}

/// Resolve a session token to its user. Expired sessions, unknown tokens and
/// sessions whose user was deleted all yield `None`.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.username
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser { id: r.get("id"), username: r.get("username") }))
}

/// Delete a session by token. Deleting an unknown token is a no-op.
pub async fn delete_session(executor: impl PgExecutor<'_>, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(executor)
        .await?;
    Ok(())
}

/// Delete every expired session, returning how many rows went.
pub async fn purge_expired_sessions(executor: impl PgExecutor<'_>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
