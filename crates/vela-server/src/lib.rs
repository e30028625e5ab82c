//! VELA Server — session-gated HTTP surface for the CRM and
//! ticketing API.
//!
//! Pages are gated by the session middleware; the JSON API under
//! `/api` authenticates per handler. All client handles live in
//! [`state::AppState`] and are injected at construction — nothing is
//! shared through module globals.

pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod routes;
pub mod state;
