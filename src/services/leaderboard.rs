//! Leaderboard query: top high scores for one game.
//!
//! Ranking is `highscore DESC`, then `achieved_at ASC` (whoever reached the
//! score first ranks higher), then `username ASC`. The order is total, so
//! repeated queries over unchanged data return the same sequence.

use serde::Serialize;
use sqlx::PgPool;

use super::game::GameName;

pub const DEFAULT_TOP: i64 = 10;
pub const MAX_TOP: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub username: String,
    pub highscore: i64,
}

/// Resolve the requested entry count: default when absent, clamped to
/// `0..=MAX_TOP` otherwise.
#[must_use]
pub fn clamp_top(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_TOP).clamp(0, MAX_TOP)
}

/// Top `top` entries for `game`. Only users with a recorded score appear.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn leaderboard(pool: &PgPool, game: &GameName, top: i64) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        r"SELECT u.username, h.highscore
          FROM high_scores h
          JOIN users u ON u.id = h.user_id
          WHERE h.game_name = $1
          ORDER BY h.highscore DESC, h.achieved_at ASC, u.username ASC
          LIMIT $2",
    )
    .bind(game.as_str())
    .bind(top)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
#[path = "leaderboard_test.rs"]
mod tests;
