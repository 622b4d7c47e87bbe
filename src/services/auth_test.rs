use super::*;

fn request(username: &str, email: Option<&str>, password: &str, confirm: &str) -> SignupRequest {
    SignupRequest {
        username: username.into(),
        email: email.map(String::from),
        password: password.into(),
        confirm_password: confirm.into(),
    }
}

// =============================================================================
// normalize_username / normalize_email
// =============================================================================

#[test]
fn username_is_trimmed() {
    assert_eq!(normalize_username("  alice "), Some("alice".into()));
}

#[test]
fn blank_username_is_none() {
    assert_eq!(normalize_username("   "), None);
}

#[test]
fn email_missing_or_blank_is_absent() {
    assert_eq!(normalize_email(None).unwrap(), None);
    assert_eq!(normalize_email(Some("  ")).unwrap(), None);
}

#[test]
fn email_is_lowercased_and_trimmed() {
    assert_eq!(normalize_email(Some(" Alice@Example.COM ")).unwrap(), Some("alice@example.com".into()));
}

#[test]
fn email_without_at_is_invalid() {
    assert!(matches!(normalize_email(Some("alice.example.com")), Err(AuthError::InvalidInput(_))));
}

#[test]
fn email_with_two_ats_is_invalid() {
    assert!(normalize_email(Some("a@b@c")).is_err());
}

#[test]
fn email_with_empty_side_is_invalid() {
    assert!(normalize_email(Some("@example.com")).is_err());
    assert!(normalize_email(Some("alice@")).is_err());
}

// =============================================================================
// validate_signup
// =============================================================================

#[test]
fn valid_signup_passes_through() {
    let valid = validate_signup(&request("alice", Some("a@x.io"), "pw", "pw")).unwrap();
    assert_eq!(valid, ValidSignup { username: "alice".into(), email: Some("a@x.io".into()), password: "pw".into() });
}

#[test]
fn mismatched_passwords_rejected() {
    let err = validate_signup(&request("alice", None, "pw1", "pw2")).unwrap_err();
    assert!(matches!(err, AuthError::PasswordMismatch));
    assert_eq!(err.to_string(), "Passwords do not match");
}

#[test]
fn blank_username_rejected() {
    let err = validate_signup(&request(" ", None, "pw", "pw")).unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput("Username is required")));
}

#[test]
fn empty_password_rejected() {
    let err = validate_signup(&request("alice", None, "", "")).unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput("Password is required")));
}

#[test]
fn bad_email_rejected_even_with_matching_passwords() {
    let err = validate_signup(&request("alice", Some("nope"), "pw", "pw")).unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));
}

// =============================================================================
// conflict_for_constraint
// =============================================================================

#[test]
fn username_constraint_maps_to_username_taken() {
    assert!(matches!(conflict_for_constraint(Some("users_username_key")), Some(AuthError::UsernameTaken)));
}

#[test]
fn email_constraint_maps_to_email_taken() {
    assert!(matches!(conflict_for_constraint(Some("users_email_key")), Some(AuthError::EmailTaken)));
}

#[test]
fn unknown_constraint_maps_to_none() {
    assert!(conflict_for_constraint(Some("sessions_pkey")).is_none());
    assert!(conflict_for_constraint(None).is_none());
}

// =============================================================================
// logout without a token
// =============================================================================

#[tokio::test]
async fn logout_without_token_is_noop() {
    let state = crate::state::test_helpers::test_app_state();
    logout(&state.pool, None).await.unwrap();
    logout(&state.pool, Some("")).await.unwrap();
}

#[tokio::test]
async fn login_with_blank_username_fails_before_database() {
    let state = crate::state::test_helpers::test_app_state();
    let err = login(&state.pool, "  ", "pw", None, 1).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

// =============================================================================
// LIVE DATABASE
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::services::session;
    use crate::state::test_helpers::{live_pool, unique_name};

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn signup_then_login_succeeds() {
        let pool = live_pool().await;
        let name = unique_name("alice");

        let created = signup(&pool, &request(&name, None, "pw", "pw"), None, 1).await.unwrap();
        assert_eq!(created.user.username, name);
        let resolved = session::validate_session(&pool, &created.token).await.unwrap().unwrap();
        assert_eq!(resolved.id, created.user.id);

        let logged_in = login(&pool, &name, "pw", None, 1).await.unwrap();
        assert_eq!(logged_in.user.id, created.user.id);
        assert_ne!(logged_in.token, created.token);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn login_with_wrong_password_fails() {
        let pool = live_pool().await;
        let name = unique_name("bob");
        signup(&pool, &request(&name, None, "right", "right"), None, 1).await.unwrap();

        let err = login(&pool, &name, "wrong", None, 1).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn login_unknown_user_fails() {
        let pool = live_pool().await;
        let err = login(&pool, &unique_name("ghost"), "pw", None, 1).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn duplicate_username_conflicts_regardless_of_other_fields() {
        let pool = live_pool().await;
        let name = unique_name("carol");
        signup(&pool, &request(&name, Some(&format!("{name}@a.io")), "pw", "pw"), None, 1).await.unwrap();

        let err = signup(&pool, &request(&name, Some(&format!("{name}@b.io")), "other", "other"), None, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn duplicate_email_conflicts() {
        let pool = live_pool().await;
        let email = format!("{}@example.com", unique_name("dup"));
        signup(&pool, &request(&unique_name("d1"), Some(&email), "pw", "pw"), None, 1).await.unwrap();

        let err = signup(&pool, &request(&unique_name("d2"), Some(&email.to_uppercase()), "pw", "pw"), None, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn signups_without_email_do_not_conflict() {
        let pool = live_pool().await;
        signup(&pool, &request(&unique_name("ne1"), None, "pw", "pw"), None, 1).await.unwrap();
        signup(&pool, &request(&unique_name("ne2"), None, "pw", "pw"), None, 1).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn login_replaces_previous_session() {
        let pool = live_pool().await;
        let name = unique_name("erin");
        let first = signup(&pool, &request(&name, None, "pw", "pw"), None, 1).await.unwrap();

        let second = login(&pool, &name, "pw", Some(&first.token), 1).await.unwrap();
        assert!(session::validate_session(&pool, &first.token).await.unwrap().is_none());
        assert!(session::validate_session(&pool, &second.token).await.unwrap().is_some());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn login_clears_expired_sessions() {
        let pool = live_pool().await;
        let abandoned = signup(&pool, &request(&unique_name("gil"), None, "pw", "pw"), None, 1).await.unwrap();
        sqlx::query("UPDATE sessions SET expires_at = now() - interval '1 minute' WHERE token = $1")
            .bind(&abandoned.token)
            .execute(&pool)
            .await
            .unwrap();

        let name = unique_name("hal");
        signup(&pool, &request(&name, None, "pw", "pw"), None, 1).await.unwrap();
        login(&pool, &name, "pw", None, 1).await.unwrap();

        let left: i64 = sqlx::query_scalar("SELECT count(*) FROM sessions WHERE token = $1")
            .bind(&abandoned.token)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn logout_destroys_session_and_is_idempotent() {
        let pool = live_pool().await;
        let created = signup(&pool, &request(&unique_name("fay"), None, "pw", "pw"), None, 1).await.unwrap();

        logout(&pool, Some(&created.token)).await.unwrap();
        logout(&pool, Some(&created.token)).await.unwrap();
        assert!(session::validate_session(&pool, &created.token).await.unwrap().is_none());
    }
}
