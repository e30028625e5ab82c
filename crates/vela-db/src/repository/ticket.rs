//! SurrealDB implementation of [`TicketRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vela_core::error::VelaResult;
use vela_core::models::ticket::{
    CreateTicket, Ticket, TicketPriority, TicketStatus, UpdateTicket,
};
use vela_core::repository::{PaginatedResult, Pagination, TicketRepository};

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TicketRow {
    organization_id: String,
    customer_id: String,
    subject: String,
    body: String,
    status: String,
    priority: String,
    assignee_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TicketRowWithId {
    record_id: String,
    organization_id: String,
    customer_id: String,
    subject: String,
    body: String,
    status: String,
    priority: String,
    assignee_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<TicketStatus, DbError> {
    match s {
        "open" => Ok(TicketStatus::Open),
        "pending" => Ok(TicketStatus::Pending),
        "closed" => Ok(TicketStatus::Closed),
        other => Err(DbError::Decode(format!("unknown ticket status: {other}"))),
    }
}

fn status_to_string(s: TicketStatus) -> &'static str {
    match s {
        TicketStatus::Open => "open",
        TicketStatus::Pending => "pending",
        TicketStatus::Closed => "closed",
    }
}

fn parse_priority(s: &str) -> Result<TicketPriority, DbError> {
    match s {
        "low" => Ok(TicketPriority::Low),
        "normal" => Ok(TicketPriority::Normal),
        "high" => Ok(TicketPriority::High),
        other => Err(DbError::Decode(format!("unknown ticket priority: {other}"))),
    }
}

fn priority_to_string(p: TicketPriority) -> &'static str {
    match p {
        TicketPriority::Low => "low",
        TicketPriority::Normal => "normal",
        TicketPriority::High => "high",
    }
}

fn parse_optional_uuid(field: &str, value: Option<String>) -> Result<Option<Uuid>, DbError> {
    value
        .map(|v| {
            Uuid::parse_str(&v).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
        })
        .transpose()
}

impl TicketRow {
    fn into_ticket(self, id: Uuid) -> Result<Ticket, DbError> {
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Decode(format!("invalid organization UUID: {e}")))?;
        let customer_id = Uuid::parse_str(&self.customer_id)
            .map_err(|e| DbError::Decode(format!("invalid customer UUID: {e}")))?;
        Ok(Ticket {
            id,
            organization_id,
            customer_id,
            subject: self.subject,
            body: self.body,
            status: parse_status(&self.status)?,
            priority: parse_priority(&self.priority)?,
            assignee_id: parse_optional_uuid("assignee", self.assignee_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TicketRowWithId {
    fn try_into_ticket(self) -> Result<Ticket, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let row = TicketRow {
            organization_id: self.organization_id,
            customer_id: self.customer_id,
            subject: self.subject,
            body: self.body,
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.into_ticket(id)
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Ticket repository.
pub struct SurrealTicketRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealTicketRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealTicketRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TicketRepository for SurrealTicketRepository<C> {
    async fn create(&self, input: CreateTicket) -> VelaResult<Ticket> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let priority = input.priority.unwrap_or(TicketPriority::Normal);

        let result = self
            .db
            .query(
                "CREATE type::record('ticket', $id) SET \
                 organization_id = $organization_id, \
                 customer_id = $customer_id, \
                 subject = $subject, \
                 body = $body, \
                 status = 'open', \
                 priority = $priority, \
                 assignee_id = $assignee_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("customer_id", input.customer_id.to_string()))
            .bind(("subject", input.subject))
            .bind(("body", input.body))
            .bind(("priority", priority_to_string(priority).to_string()))
            .bind(("assignee_id", input.assignee_id.map(|a| a.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TicketRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ticket".into(),
            id: id_str,
        })?;

        Ok(row.into_ticket(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VelaResult<Ticket> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('ticket', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TicketRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ticket".into(),
            id: id_str,
        })?;

        Ok(row.into_ticket(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateTicket) -> VelaResult<Ticket> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.subject.is_some() {
            sets.push("subject = $subject");
        }
        if input.body.is_some() {
            sets.push("body = $body");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.priority.is_some() {
            sets.push("priority = $priority");
        }
        if input.assignee_id.is_some() {
            sets.push("assignee_id = $assignee_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('ticket', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(subject) = input.subject {
            builder = builder.bind(("subject", subject));
        }
        if let Some(body) = input.body {
            builder = builder.bind(("body", body));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(priority) = input.priority {
            builder = builder.bind(("priority", priority_to_string(priority).to_string()));
        }
        if let Some(assignee_id) = input.assignee_id {
            // Some(Some(id)) = assign, Some(None) = unassign.
            builder = builder.bind(("assignee_id", assignee_id.map(|a| a.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TicketRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ticket".into(),
            id: id_str,
        })?;

        Ok(row.into_ticket(id)?)
    }

    async fn list(
        &self,
        status: Option<TicketStatus>,
        pagination: Pagination,
    ) -> VelaResult<PaginatedResult<Ticket>> {
        let filter = if status.is_some() {
            " WHERE status = $status"
        } else {
            ""
        };

        let count_query = format!("SELECT count() AS total FROM ticket{filter} GROUP ALL");
        let mut count_builder = self.db.query(&count_query);
        if let Some(s) = status {
            count_builder = count_builder.bind(("status", status_to_string(s).to_string()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM ticket{filter} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(&list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(s) = status {
            builder = builder.bind(("status", status_to_string(s).to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<TicketRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_ticket())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn count_by_status(&self, status: TicketStatus) -> VelaResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM ticket \
                 WHERE status = $status GROUP ALL",
            )
            .bind(("status", status_to_string(status).to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
