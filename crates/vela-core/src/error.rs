//! Error types for the VELA system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VelaError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Identity already registered: {email}")]
    DuplicateIdentity { email: String },

    #[error("Identity creation failed: {0}")]
    IdentityCreation(String),

    #[error("Profile creation failed: {0}")]
    ProfileCreation(String),

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Identity service error: {0}")]
    IdentityService(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VelaResult<T> = Result<T, VelaError>;
