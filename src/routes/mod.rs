//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON/form endpoints used by the game pages and
//! serves the pages themselves from the static directory. Every endpoint
//! resolves the caller's session explicitly through the `Session` extractor;
//! no handler reads ambient login state.

pub mod auth;
pub mod favorites;
pub mod pages;
pub mod scores;

use std::path::Path;

use axum::Router;
use axum::extract::{Form, FromRequest, Request};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use serde::de::DeserializeOwned;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::services::game::GameName;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let static_files = ServeDir::new(static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/", get(pages::home))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/check_auth", get(auth::check_auth))
        .route("/get_highscore", get(scores::get_highscore))
        .route("/submit_score", post(scores::submit_score))
        .route("/leaderboard", get(scores::leaderboard))
        .route("/favorite", post(favorites::favorite))
        .route("/unfavorite", post(favorites::unfavorite))
        .route("/my_favorites", get(favorites::my_favorites))
        .route("/healthz", get(healthz))
        .fallback_service(static_files)
        .layer(middleware::from_fn_with_state(state.clone(), pages::guard_pages))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// FORM EXTRACTOR
// =============================================================================

/// `application/x-www-form-urlencoded` body whose rejections render as
/// `ApiError::Validation` instead of Axum's plain-text rejection.
pub struct ApiForm<T>(pub T);

impl<T, S> FromRequest<S> for ApiForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// Parse a required game name from a form or query value.
pub(crate) fn require_game(raw: Option<&str>) -> Result<GameName, ApiError> {
    GameName::parse(raw).ok_or_else(|| ApiError::Validation("Missing or invalid game".to_owned()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
