//! Profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
        }
    }
}

/// A profile row owned by VELA's relational schema.
///
/// Invariant: `id` equals an existing identity record's id in the
/// external auth store. The provisioning flow enforces this; no
/// database constraint does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a profile.
///
/// `id` is caller-supplied: it must be the id of the identity created
/// in the auth store immediately beforehand.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub organization_id: Uuid,
}
