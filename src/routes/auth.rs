//! Auth routes: signup, login, logout, session status.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::response::{Json, Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use super::ApiForm;
use super::pages::LOGIN_PAGE;
use crate::error::ApiError;
use crate::services::auth::{self as auth_svc, POST_AUTH_REDIRECT, SignupRequest};
use crate::services::session::{self, SessionUser};
use crate::state::{AppState, SessionSettings};

pub const COOKIE_NAME: &str = "session_token";

// =============================================================================
// COOKIES
// =============================================================================

pub(crate) fn session_cookie(token: String, settings: SessionSettings) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.cookie_secure)
        .max_age(Duration::days(i64::from(settings.ttl_days)))
        .build()
}

pub(crate) fn clear_session_cookie(settings: SessionSettings) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.cookie_secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Session token carried by the request, if any.
pub(crate) fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// The caller's session, resolved once at the boundary.
///
/// `token` is whatever the cookie carried; `user` is set only when that token
/// maps to a live session of an existing user. A token without a user is a
/// stale session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The signed-in user, or a 401.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when no user is signed in.
    pub fn require_user(&self) -> Result<&SessionUser, ApiError> {
        self.user.as_ref().ok_or_else(ApiError::not_logged_in)
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.token.is_some() && self.user.is_none()
    }
}

impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = token_from_jar(&jar) else {
            return Ok(Self::anonymous());
        };

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, &token).await?;
        Ok(Self { token: Some(token), user })
    }
}

/// A signed-in caller. Rejects with 401 before any body extractor runs.
#[derive(Debug, Clone)]
pub struct SignedIn(pub SessionUser);

impl<S> FromRequestParts<S> for SignedIn
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current = Session::from_request_parts(parts, state).await?;
        current.require_user().cloned().map(Self)
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AuthSuccess {
    pub success: bool,
    pub redirect: &'static str,
}

impl AuthSuccess {
    fn new() -> Self {
        Self { success: true, redirect: POST_AUTH_REDIRECT }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl AuthStatus {
    fn signed_in(user: SessionUser) -> Self {
        Self { authenticated: true, username: Some(user.username), user_id: Some(user.id) }
    }

    fn signed_out() -> Self {
        Self { authenticated: false, username: None, user_id: None }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

/// `POST /signup`: create an account and sign it in.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiForm(form): ApiForm<SignupForm>,
) -> Result<(CookieJar, Json<AuthSuccess>), ApiError> {
    let req = SignupRequest {
        username: form.username.unwrap_or_default(),
        email: form.email,
        password: form.password.unwrap_or_default(),
        confirm_password: form.confirm_password.unwrap_or_default(),
    };

    let previous = token_from_jar(&jar);
    let created = auth_svc::signup(&state.pool, &req, previous.as_deref(), state.sessions.ttl_days).await?;
    let jar = jar.add(session_cookie(created.token, state.sessions));
    Ok((jar, Json(AuthSuccess::new())))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `POST /login`: check credentials and open a fresh session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<(CookieJar, Json<AuthSuccess>), ApiError> {
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Err(ApiError::Validation("Username and password are required".to_owned()));
    };

    let previous = token_from_jar(&jar);
    let opened = auth_svc::login(&state.pool, &username, &password, previous.as_deref(), state.sessions.ttl_days)
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "login failed"))?;

    tracing::info!(user_id = %opened.user.id, "user logged in");
    let jar = jar.add(session_cookie(opened.token, state.sessions));
    Ok((jar, Json(AuthSuccess::new())))
}

/// `GET /logout`: drop the session and its cookie, then go to the login page.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let token = token_from_jar(&jar);
    if let Err(e) = auth_svc::logout(&state.pool, token.as_deref()).await {
        tracing::error!(error = %e, "session delete failed during logout");
    }

    (jar.add(clear_session_cookie(state.sessions)), Redirect::to(LOGIN_PAGE))
}

/// `GET /check_auth`: report who is signed in; clears a stale session.
pub async fn check_auth(
    State(state): State<AppState>,
    current: Session,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AuthStatus>), ApiError> {
    if current.is_stale() {
        if let Some(token) = current.token.as_deref() {
            session::delete_session(&state.pool, token).await?;
        }
        tracing::info!("cleared stale session");
        return Ok((jar.add(clear_session_cookie(state.sessions)), Json(AuthStatus::signed_out())));
    }

    let status = current.user.map_or_else(AuthStatus::signed_out, AuthStatus::signed_in);
    Ok((jar, Json(status)))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
