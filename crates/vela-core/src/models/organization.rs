//! Organization domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization groups profiles and customers.
///
/// The signup flow mints one organization per provisioned user with
/// `id` equal to the user's identity id (the one-org-per-user scheme
/// inherited from the source system).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an organization. `id` is caller-supplied.
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub id: Uuid,
    pub name: String,
    pub contact_email: String,
}
