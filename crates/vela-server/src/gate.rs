//! Session-gate middleware.
//!
//! Runs on every page request. The session token (cookie or bearer)
//! is resolved against the identity service on every request — no
//! cross-request caching — and the gate's decision table picks serve
//! or redirect.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use surrealdb::Connection;
use tracing::{debug, warn};

use vela_auth::gate::GateDecision;
use vela_core::repository::IdentityStore;

use crate::state::AppState;

/// Name of the session cookie set by the login handler.
pub const SESSION_COOKIE: &str = "vela_session";

pub async fn session_gate<C: Connection>(
    State(state): State<AppState<C>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    let session_present = match extract_session_token(req.headers()) {
        None => false,
        Some(token) => match state.identity.resolve_session(&token).await {
            Ok(identity) => identity.is_some(),
            Err(e) => {
                // Treated as anonymous: the login page stays reachable
                // even when the identity service is down.
                warn!(error = %e, "session resolution failed, gating as anonymous");
                false
            }
        },
    };

    match state.gate.decide(session_present, &path) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::RedirectToLogin => {
            debug!(%path, "gate redirect to /login");
            Redirect::to("/login").into_response()
        }
        GateDecision::RedirectToHome => {
            debug!(%path, "gate redirect to /");
            Redirect::to("/").into_response()
        }
    }
}

/// Session token from the `vela_session` cookie, falling back to an
/// `Authorization: Bearer` header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers))
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())?;

    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::*;

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; vela_session=tok-1"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok-2"),
        );

        assert_eq!(extract_session_token(&headers).as_deref(), Some("tok-1"));
    }

    #[test]
    fn bearer_is_used_without_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok-2"),
        );

        assert_eq!(extract_session_token(&headers).as_deref(), Some("tok-2"));
    }

    #[test]
    fn no_credentials_yields_none() {
        let headers = HeaderMap::new();
        assert!(extract_session_token(&headers).is_none());

        let mut basic = HeaderMap::new();
        basic.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwdw=="),
        );
        assert!(extract_session_token(&basic).is_none());
    }
}
