//! HTTP error handling and response formatting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use vela_auth::error::AuthError;
use vela_core::error::VelaError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] VelaError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            VelaError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            // Fixed caller-facing strings; the store detail is logged
            // where the failure happened.
            VelaError::DuplicateIdentity { .. } => {
                (StatusCode::CONFLICT, "User already exists".to_string())
            }
            VelaError::ProfileCreation(_) => (
                StatusCode::BAD_REQUEST,
                "Failed to create user profile".to_string(),
            ),
            VelaError::IdentityCreation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            VelaError::AuthenticationFailed { reason } => {
                (StatusCode::UNAUTHORIZED, reason.clone())
            }
            VelaError::AuthorizationDenied { reason } => (StatusCode::FORBIDDEN, reason.clone()),
            VelaError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                format!("{entity} {id} not found"),
            ),
            VelaError::IdentityService(_) => (
                StatusCode::BAD_GATEWAY,
                "Identity service unavailable".to_string(),
            ),
            VelaError::Database(_) | VelaError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: VelaError) -> StatusCode {
        AppError(err).into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        assert_eq!(
            status_of(VelaError::Validation {
                message: "missing required fields: email".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(VelaError::DuplicateIdentity {
                email: "a@b.com".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(VelaError::IdentityCreation("signups disabled".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(VelaError::ProfileCreation("policy violation".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(VelaError::AuthenticationFailed {
                reason: "authorization header missing".into()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(VelaError::AuthorizationDenied {
                reason: "agent".into()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(VelaError::NotFound {
                entity: "ticket".into(),
                id: "t1".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(VelaError::IdentityService("boom".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(VelaError::Database("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
