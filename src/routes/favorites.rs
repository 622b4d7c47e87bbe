//! Favorite-game routes.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::auth::{Session, SignedIn};
use super::{ApiForm, require_game};
use crate::error::ApiError;
use crate::services::favorite;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FavoriteForm {
    pub game: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FavoriteStatus {
    pub status: &'static str,
}

/// `POST /favorite`: add a game to the caller's favorites.
pub async fn favorite(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    ApiForm(form): ApiForm<FavoriteForm>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let game = require_game(form.game.as_deref())?;

    favorite::add_favorite(&state.pool, user.id, &game).await?;
    Ok(Json(FavoriteStatus { status: "added" }))
}

/// `POST /unfavorite`: remove a game from the caller's favorites.
pub async fn unfavorite(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    ApiForm(form): ApiForm<FavoriteForm>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let game = require_game(form.game.as_deref())?;

    favorite::remove_favorite(&state.pool, user.id, &game).await?;
    Ok(Json(FavoriteStatus { status: "removed" }))
}

/// `GET /my_favorites`: the caller's favorite games; empty when signed out.
pub async fn my_favorites(State(state): State<AppState>, session: Session) -> Result<Json<Vec<String>>, ApiError> {
    let Some(user) = session.user else {
        return Ok(Json(Vec::new()));
    };

    Ok(Json(favorite::list_favorites(&state.pool, user.id).await?))
}

#[cfg(test)]
#[path = "favorites_test.rs"]
mod tests;
