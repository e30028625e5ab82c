//! VELA Identity — HTTP client for the hosted identity service.
//!
//! The identity service owns every credential in the system. This
//! crate consumes exactly the contracts VELA needs: admin user
//! creation with a pre-confirmed email, admin user deletion, session
//! resolution, password sign-in, and sign-out.

mod client;
mod error;

pub use client::{IdentityClient, IdentityConfig, SessionTokens};
pub use error::IdentityError;
