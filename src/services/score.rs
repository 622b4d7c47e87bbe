//! High-score service.
//!
//! DESIGN
//! ======
//! A high score is the running maximum of every score a user submitted for a
//! game. Submission is one `INSERT ... ON CONFLICT DO UPDATE` that keeps
//! `GREATEST(stored, submitted)`. Postgres takes the row lock on conflict, so
//! concurrent submissions for the same (user, game) serialize on that row and
//! none of them can overwrite a higher value.

use sqlx::PgPool;
use uuid::Uuid;

use super::game::GameName;

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("score must be an integer")]
    InvalidScore,
}

/// Parse a submitted score. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `InvalidScore` if the value is not a base-10 `i64`.
pub fn parse_score(raw: &str) -> Result<i64, ScoreError> {
    raw.trim().parse::<i64>().map_err(|_| ScoreError::InvalidScore)
}

/// Record a score and return the resulting high score for (user, game).
/// The stored value never decreases.
///
/// # Errors
///
/// Returns a database error if the upsert fails.
pub async fn submit_score(pool: &PgPool, user_id: Uuid, game: &GameName, score: i64) -> Result<i64, sqlx::Error> {
    let highscore: i64 = sqlx::query_scalar(
        r"INSERT INTO high_scores (user_id, game_name, highscore)
          VALUES ($1, $2, $3)
          ON CONFLICT (user_id, game_name) DO UPDATE
          SET highscore = GREATEST(high_scores.highscore, EXCLUDED.highscore),
              achieved_at = CASE
                  WHEN EXCLUDED.highscore > high_scores.highscore THEN now()
                  ELSE high_scores.achieved_at
              END
          RETURNING highscore",
    )
    .bind(user_id)
    .bind(game.as_str())
    .bind(score)
    .fetch_one(pool)
    .await?;

    tracing::debug!(%user_id, %game, score, highscore, "score submitted");
    Ok(highscore)
}

/// Stored high score for (user, game), or 0 when none was ever recorded.
///
/// # Errors
///
/// Returns a database error if the lookup fails.
pub async fn get_high_score(pool: &PgPool, user_id: Uuid, game: &GameName) -> Result<i64, sqlx::Error> {
    let highscore: Option<i64> =
        sqlx::query_scalar("SELECT highscore FROM high_scores WHERE user_id = $1 AND game_name = $2")
            .bind(user_id)
            .bind(game.as_str())
            .fetch_optional(pool)
            .await?;
    Ok(highscore.unwrap_or(0))
}

#[cfg(test)]
#[path = "score_test.rs"]
mod tests;
