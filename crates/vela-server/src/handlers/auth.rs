//! Authentication handlers: login, logout, current-user lookup.
//!
//! Credentials never touch VELA's own storage — sign-in and sign-out
//! are forwarded to the identity service, and the resulting access
//! token is mirrored into the `vela_session` cookie for page
//! navigation.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::SET_COOKIE};
use axum::response::{AppendHeaders, IntoResponse};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::debug;
use uuid::Uuid;

use vela_auth::error::AuthError;
use vela_core::models::profile::Role;
use vela_core::repository::ProfileRepository;
use vela_identity::SessionTokens;

use crate::error::AppError;
use crate::gate::{SESSION_COOKIE, extract_session_token};
use crate::handlers::require_session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub organization_id: Uuid,
}

/// `POST /api/auth/login` — password sign-in via the identity
/// service; mirrors the access token into the session cookie.
pub async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens: SessionTokens = state.identity.sign_in(&req.email, &req.password).await?;

    debug!(email = %req.email, "login succeeded");

    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        tokens.access_token, tokens.expires_in,
    );

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(tokens)))
}

/// `POST /api/auth/logout` — revoke the hosted session and clear the
/// cookie.
pub async fn logout<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = extract_session_token(&headers).ok_or(AuthError::MissingCredentials)?;
    state.identity.sign_out(&token).await?;

    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, cookie)]),
    ))
}

/// `GET /api/me` — resolve the caller's session to its profile.
pub async fn me<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, AppError> {
    let identity = require_session(&state, &headers).await?;
    let profile = state.profiles.get_by_id(identity.id).await?;

    Ok(Json(MeResponse {
        id: profile.id,
        email: identity.email,
        name: profile.name,
        role: profile.role,
        organization_id: profile.organization_id,
    }))
}
