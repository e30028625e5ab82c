//! Identity record as mirrored from the hosted identity service.
//!
//! Identities are owned by the external auth store. VELA never sees a
//! credential; it only holds the opaque id, the email, and whatever
//! metadata the store returns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    /// Display name carried in the store's user metadata, if any.
    pub name: Option<String>,
}

/// Fields required to create an identity in the external auth store.
///
/// The store is instructed to mark the email as pre-confirmed and to
/// attach `{name}` as user metadata.
#[derive(Debug, Clone)]
pub struct CreateIdentity {
    pub email: String,
    /// Raw password, forwarded to the store. Never persisted by VELA.
    pub password: String,
    pub name: String,
}
