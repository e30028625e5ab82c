//! Reconciliation queue domain model.
//!
//! When the provisioning flow fails after an identity has been created
//! and the compensating delete of that identity also fails, the
//! identity is orphaned in the external auth store. Each orphan is
//! recorded here so an operator can reconcile the two stores by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationEntry {
    pub id: Uuid,
    /// Id of the orphaned identity in the external auth store.
    pub identity_id: Uuid,
    pub email: String,
    /// Why the compensation could not complete.
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateReconciliationEntry {
    pub identity_id: Uuid,
    pub email: String,
    pub reason: String,
}
