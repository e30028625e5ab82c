//! Identity-service error types.

use thiserror::Error;

/// Errors surfaced by the hosted identity service.
///
/// Conversion into [`vela_core::VelaError`] happens at the call site,
/// not blanket-wise: a failed create is an identity-creation failure,
/// a failed delete is a service failure, and so on.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("already registered: {email}")]
    AlreadyRegistered { email: String },

    #[error("identity service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
