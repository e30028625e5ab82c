//! VELA Core — domain models, error taxonomy, and the store traits
//! that seam the system to its two external collaborators: the hosted
//! identity service and the hosted relational store.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{VelaError, VelaResult};
