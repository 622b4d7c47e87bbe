use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_serializes_id_and_username() {
    let user = SessionUser { id: Uuid::nil(), username: "alice".into() };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["username"], "alice");
    assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
}

// =============================================================================
// LIVE DATABASE
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::state::test_helpers::{live_pool, seed_user, unique_name};

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn session_round_trip_and_delete() {
        let pool = live_pool().await;
        let name = unique_name("sess");
        let user_id = seed_user(&pool, &name).await;

        let token = create_session(&pool, user_id, 1).await.unwrap();
        let user = validate_session(&pool, &token).await.unwrap().unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.username, name);

        delete_session(&pool, &token).await.unwrap();
        assert!(validate_session(&pool, &token).await.unwrap().is_none());

        // Deleting twice stays a no-op.
        delete_session(&pool, &token).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn session_of_deleted_user_does_not_resolve() {
        let pool = live_pool().await;
        let user_id = seed_user(&pool, &unique_name("gone")).await;
        let token = create_session(&pool, user_id, 1).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(validate_session(&pool, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn expired_session_does_not_resolve() {
        let pool = live_pool().await;
        let user_id = seed_user(&pool, &unique_name("stale")).await;
        let token = create_session(&pool, user_id, 1).await.unwrap();

        sqlx::query("UPDATE sessions SET expires_at = now() - interval '1 minute' WHERE token = $1")
            .bind(&token)
            .execute(&pool)
            .await
            .unwrap();

        assert!(validate_session(&pool, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn purge_removes_only_expired_sessions() {
        let pool = live_pool().await;
        let user_id = seed_user(&pool, &unique_name("purge")).await;
        let expired = create_session(&pool, user_id, 1).await.unwrap();
        let live = create_session(&pool, user_id, 1).await.unwrap();

        sqlx::query("UPDATE sessions SET expires_at = now() - interval '1 minute' WHERE token = $1")
            .bind(&expired)
            .execute(&pool)
            .await
            .unwrap();

        assert!(purge_expired_sessions(&pool).await.unwrap() >= 1);

        let remaining: Vec<String> = sqlx::query_scalar("SELECT token FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, vec![live]);
    }
}
