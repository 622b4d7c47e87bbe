//! Favorites: a per-user set of game names.

use sqlx::PgPool;
use uuid::Uuid;

use super::game::GameName;

/// Mark `game` as a favorite. Already-favorited games are left as they are.
///
/// # Errors
///
/// Returns a database error if the insert fails for any reason other than
/// the pair already existing.
pub async fn add_favorite(pool: &PgPool, user_id: Uuid, game: &GameName) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO favorites (user_id, game_name) VALUES ($1, $2)
         ON CONFLICT (user_id, game_name) DO NOTHING",
    )
    .bind(user_id)
    .bind(game.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove `game` from the user's favorites. Removing a game that is not a
/// favorite is a no-op.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn remove_favorite(pool: &PgPool, user_id: Uuid, game: &GameName) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND game_name = $2")
        .bind(user_id)
        .bind(game.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// The user's favorite games, oldest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_favorites(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT game_name FROM favorites WHERE user_id = $1 ORDER BY created_at, game_name")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "favorite_test.rs"]
mod tests;
