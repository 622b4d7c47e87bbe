//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool and the session settings and nothing mutable:
//! scores, favorites and sessions are always read from Postgres so every
//! handler sees the latest committed state.

use sqlx::PgPool;

/// Session lifetime and cookie flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Days until a session row expires.
    pub ttl_days: i32,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { ttl_days: 30, cookie_secure: false }
    }
}

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the pool is internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sessions: SessionSettings,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, sessions: SessionSettings) -> Self {
        Self { pool, sessions }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
