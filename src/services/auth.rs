//! Account service: signup, login and logout.
//!
//! DESIGN
//! ======
//! Signup and login each end by opening a session, and each does its writes
//! in one transaction: the user row (or the replaced session) and the new
//! session row commit together or not at all.
//!
//! Username and email uniqueness is enforced by the database. Signup does not
//! pre-check; it inserts and maps the violated constraint to a conflict, so
//! two concurrent signups for the same name cannot both succeed.

use sqlx::PgPool;
use uuid::Uuid;

use super::password::{self, PasswordError};
use super::session::{self, SessionUser};

/// Where the client goes after a successful signup or login.
pub const POST_AUTH_REDIRECT: &str = "/main/HNMgames.html";

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("password error: {0}")]
    Password(#[from] PasswordError),
    #[error("password worker failed: {0}")]
    Worker(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Raw signup form values.
#[derive(Debug, Clone, Default)]
pub struct SignupRequest {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Signup values after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

/// A freshly opened session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: SessionUser,
    pub token: String,
}

// =============================================================================
// VALIDATION
// =============================================================================

#[must_use]
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_owned())
}

/// Normalize an optional email. Blank means "not provided"; anything else must
/// have exactly one `@` with text on both sides.
///
/// # Errors
///
/// Returns `InvalidInput` for a non-blank value that is not an address.
pub fn normalize_email(raw: Option<&str>) -> Result<Option<String>, AuthError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Ok(None);
    }
    match normalized.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(Some(normalized)),
        _ => Err(AuthError::InvalidInput("Invalid email address")),
    }
}

/// Validate a signup request without touching the database.
///
/// # Errors
///
/// Returns `PasswordMismatch` when the confirmation differs, or
/// `InvalidInput` for a blank username, blank password or bad email.
pub fn validate_signup(req: &SignupRequest) -> Result<ValidSignup, AuthError> {
    let username = normalize_username(&req.username).ok_or(AuthError::InvalidInput("Username is required"))?;
    if req.password.is_empty() {
        return Err(AuthError::InvalidInput("Password is required"));
    }
    if req.password != req.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    let email = normalize_email(req.email.as_deref())?;
    Ok(ValidSignup { username, email, password: req.password.clone() })
}

/// Map the name of a violated unique constraint on `users` to its conflict.
#[must_use]
pub fn conflict_for_constraint(constraint: Option<&str>) -> Option<AuthError> {
    match constraint? {
        USERNAME_CONSTRAINT => Some(AuthError::UsernameTaken),
        EMAIL_CONSTRAINT => Some(AuthError::EmailTaken),
        _ => None,
    }
}

fn map_insert_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(conflict) = conflict_for_constraint(db_err.constraint()) {
                return conflict;
            }
        }
    }
    AuthError::Database(err)
}

// =============================================================================
// PASSWORD WORK
// =============================================================================

async fn hash_on_blocking_pool(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| AuthError::Worker(e.to_string()))?
        .map_err(AuthError::from)
}

async fn verify_on_blocking_pool(password: String, stored_hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AuthError::Worker(e.to_string()))?
        .map_err(AuthError::from)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Register a new account and open a session for it, replacing
/// `previous_token` if the client already held one.
///
/// # Errors
///
/// Validation failures, `UsernameTaken`/`EmailTaken` on conflicts, or a
/// database/hashing failure.
pub async fn signup(
    pool: &PgPool,
    req: &SignupRequest,
    previous_token: Option<&str>,
    ttl_days: i32,
) -> Result<AuthSession, AuthError> {
    let signup = validate_signup(req)?;
    let password_hash = hash_on_blocking_pool(signup.password).await?;

    let mut tx = pool.begin().await?;
    let user_id: Uuid =
        sqlx::query_scalar("INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id")
            .bind(&signup.username)
            .bind(&signup.email)
            .bind(&password_hash)
            .fetch_one(tx.as_mut())
            .await
            .map_err(map_insert_error)?;
    if let Some(previous) = previous_token {
        session::delete_session(tx.as_mut(), previous).await?;
    }
    let token = session::create_session(tx.as_mut(), user_id, ttl_days).await?;
    tx.commit().await?;

    tracing::info!(%user_id, username = %signup.username, "account created");
    Ok(AuthSession { user: SessionUser { id: user_id, username: signup.username }, token })
}

/// Check credentials and open a session, replacing `previous_token` if the
/// client already held one.
///
/// # Errors
///
/// `InvalidCredentials` when the user is unknown or the password does not
/// match; database/hashing failures otherwise.
pub async fn login(
    pool: &PgPool,
    username: &str,
    password: &str,
    previous_token: Option<&str>,
    ttl_days: i32,
) -> Result<AuthSession, AuthError> {
    let Some(username) = normalize_username(username) else {
        return Err(AuthError::InvalidCredentials);
    };

    let row: Option<(Uuid, String)> = sqlx::query_as("SELECT id, password_hash FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(pool)
        .await?;
    let Some((user_id, stored_hash)) = row else {
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_on_blocking_pool(password.to_owned(), stored_hash).await? {
        tracing::info!(%user_id, "login rejected: wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let mut tx = pool.begin().await?;
    if let Some(previous) = previous_token {
        session::delete_session(tx.as_mut(), previous).await?;
    }
    let purged = session::purge_expired_sessions(tx.as_mut()).await?;
    let token = session::create_session(tx.as_mut(), user_id, ttl_days).await?;
    tx.commit().await?;

    if purged > 0 {
        tracing::debug!(purged, "removed expired sessions");
    }
    Ok(AuthSession { user: SessionUser { id: user_id, username }, token })
}

/// Destroy the session behind `token`, if any. Always idempotent.
///
/// # Errors
///
/// Returns an error only if the delete itself fails.
pub async fn logout(pool: &PgPool, token: Option<&str>) -> Result<(), sqlx::Error> {
    match token {
        Some(token) if !token.is_empty() => session::delete_session(pool, token).await,
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
