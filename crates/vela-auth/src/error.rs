//! Authentication error types.

use thiserror::Error;
use vela_core::error::VelaError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("role '{0}' is not permitted to perform this action")]
    RoleDenied(&'static str),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for VelaError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                VelaError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::RoleDenied(_) => VelaError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => VelaError::Internal(msg),
        }
    }
}
