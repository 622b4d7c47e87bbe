//! Page-level redirects in front of the static game pages.
//!
//! Signed-in visitors skip the login and signup pages; signed-out visitors
//! cannot open the favorites page. Everything else passes straight through
//! to the static file service.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::auth::token_from_jar;
use crate::error::ApiError;
use crate::services::session;
use crate::state::AppState;

pub const LOGIN_PAGE: &str = "/login.html";
pub const SIGNUP_PAGE: &str = "/signup.html";
pub const FAVORITES_PAGE: &str = "/favorites.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageRule {
    RedirectIfSignedIn,
    RequireSignIn,
}

pub(crate) fn rule_for(path: &str) -> Option<PageRule> {
    match path {
        LOGIN_PAGE | SIGNUP_PAGE => Some(PageRule::RedirectIfSignedIn),
        FAVORITES_PAGE => Some(PageRule::RequireSignIn),
        _ => None,
    }
}

/// Where to send the visitor instead of the requested page, if anywhere.
pub(crate) fn redirect_target(rule: PageRule, signed_in: bool) -> Option<&'static str> {
    match (rule, signed_in) {
        (PageRule::RedirectIfSignedIn, true) => Some(FAVORITES_PAGE),
        (PageRule::RequireSignIn, false) => Some(LOGIN_PAGE),
        _ => None,
    }
}

/// `GET /`: the portal starts at the login page.
pub async fn home() -> Redirect {
    Redirect::to(LOGIN_PAGE)
}

/// Middleware enforcing the page rules. Only guarded paths touch the database.
pub async fn guard_pages(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let Some(rule) = rule_for(request.uri().path()) else {
        return next.run(request).await;
    };

    let signed_in = match token_from_jar(&jar) {
        Some(token) => match session::validate_session(&state.pool, &token).await {
            Ok(user) => user.is_some(),
            Err(e) => return ApiError::from(e).into_response(),
        },
        None => false,
    };

    match redirect_target(rule, signed_in) {
        Some(target) => Redirect::to(target).into_response(),
        None => next.run(request).await,
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
