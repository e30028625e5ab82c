//! Support ticket domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Pending,
    Closed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// Profile id of the agent the ticket is assigned to, if any.
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub organization_id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    pub body: String,
    pub priority: Option<TicketPriority>,
    pub assignee_id: Option<Uuid>,
}

/// Fields that can be updated on an existing ticket.
///
/// `assignee_id` is `Some(Some(id))` to assign, `Some(None)` to
/// unassign, `None` for no change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTicket {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assignee_id: Option<Option<Uuid>>,
}
