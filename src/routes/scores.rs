//! High-score and leaderboard routes.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::auth::{Session, SignedIn};
use super::{ApiForm, require_game};
use crate::error::ApiError;
use crate::services::game::GameName;
use crate::services::leaderboard::{self, LeaderboardEntry};
use crate::services::score;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HighScoreQuery {
    pub game: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HighScoreResponse {
    pub highscore: i64,
}

/// `GET /get_highscore?game=`: the caller's high score; 0 when signed out
/// or nothing is recorded.
pub async fn get_highscore(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HighScoreQuery>,
) -> Result<Json<HighScoreResponse>, ApiError> {
    let (Some(user), Some(game)) = (session.user, GameName::parse(query.game.as_deref())) else {
        return Ok(Json(HighScoreResponse { highscore: 0 }));
    };

    let highscore = score::get_high_score(&state.pool, user.id, &game).await?;
    Ok(Json(HighScoreResponse { highscore }))
}

#[derive(Debug, Deserialize)]
pub struct SubmitScoreForm {
    pub game: Option<String>,
    pub score: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SubmitScoreResponse {
    pub status: &'static str,
    pub highscore: i64,
}

/// `POST /submit_score`: record a score, answer with the resulting high score.
pub async fn submit_score(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    ApiForm(form): ApiForm<SubmitScoreForm>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let game = require_game(form.game.as_deref())?;
    let submitted = score::parse_score(form.score.as_deref().unwrap_or_default())?;

    let highscore = score::submit_score(&state.pool, user.id, &game, submitted).await?;
    Ok(Json(SubmitScoreResponse { status: "ok", highscore }))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub game: Option<String>,
    pub top: Option<String>,
}

/// Parse the `top` query value; blank or absent means the default.
pub(crate) fn parse_top(raw: Option<&str>) -> Result<i64, ApiError> {
    let requested = match raw.map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            value
                .parse::<i64>()
                .map_err(|_| ApiError::Validation("top must be an integer".to_owned()))?,
        ),
    };
    Ok(leaderboard::clamp_top(requested))
}

/// `GET /leaderboard?game=&top=`: best scores for a game, highest first.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let game = require_game(query.game.as_deref())?;
    let top = parse_top(query.top.as_deref())?;

    let entries = leaderboard::leaderboard(&state.pool, &game, top).await?;
    Ok(Json(entries))
}

#[cfg(test)]
#[path = "scores_test.rs"]
mod tests;
