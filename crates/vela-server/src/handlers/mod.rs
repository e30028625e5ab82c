//! Request handlers for the JSON API and the page shells.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod pages;
pub mod reconciliation;
pub mod tickets;
pub mod users;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use vela_auth::error::AuthError;
use vela_auth::token::{ValidatedClaims, validate_access_token};
use vela_core::models::identity::Identity;
use vela_core::repository::{IdentityStore, PaginatedResult, Pagination};

use crate::error::AppError;
use crate::gate::{bearer_token, extract_session_token};
use crate::state::AppState;

/// Pagination query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl PageParams {
    pub fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            offset: self.offset.unwrap_or(default.offset),
            limit: self.limit.unwrap_or(default.limit),
        }
    }
}

/// JSON shape of a paginated listing.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> From<PaginatedResult<T>> for ListResponse<T> {
    fn from(page: PaginatedResult<T>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

/// Resolve the caller's session against the identity service, one
/// round trip per request.
pub(crate) async fn require_session<C: Connection>(
    state: &AppState<C>,
    headers: &HeaderMap,
) -> Result<Identity, AppError> {
    let token = extract_session_token(headers).ok_or(AuthError::MissingCredentials)?;
    match state.identity.resolve_session(&token).await? {
        Some(identity) => Ok(identity),
        None => Err(AuthError::TokenInvalid("session rejected by identity service".into()).into()),
    }
}

/// Verify the bearer token's signature, expiry, and issuer, then
/// require the `admin` role claim.
pub(crate) fn authorize_admin<C: Connection>(
    state: &AppState<C>,
    headers: &HeaderMap,
) -> Result<ValidatedClaims, AppError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingCredentials)?;
    let claims = validate_access_token(&token, &state.auth)?;
    claims.require_admin()?;
    Ok(claims)
}
