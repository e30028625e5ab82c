//! SurrealDB implementation of [`ReconciliationRepository`].
//!
//! The reconciliation table is the landing place for identities
//! orphaned by a failed compensation. Rows are only ever appended by
//! the provisioning flow and resolved by an operator.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vela_core::error::VelaResult;
use vela_core::models::reconciliation::{CreateReconciliationEntry, ReconciliationEntry};
use vela_core::repository::{PaginatedResult, Pagination, ReconciliationRepository};

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReconciliationRow {
    identity_id: String,
    email: String,
    reason: String,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct ReconciliationRowWithId {
    record_id: String,
    identity_id: String,
    email: String,
    reason: String,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl ReconciliationRow {
    fn into_entry(self, id: Uuid) -> Result<ReconciliationEntry, DbError> {
        let identity_id = Uuid::parse_str(&self.identity_id)
            .map_err(|e| DbError::Decode(format!("invalid identity UUID: {e}")))?;
        Ok(ReconciliationEntry {
            id,
            identity_id,
            email: self.email,
            reason: self.reason,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        })
    }
}

impl ReconciliationRowWithId {
    fn try_into_entry(self) -> Result<ReconciliationEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let row = ReconciliationRow {
            identity_id: self.identity_id,
            email: self.email,
            reason: self.reason,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        };
        row.into_entry(id)
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Reconciliation repository.
pub struct SurrealReconciliationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealReconciliationRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealReconciliationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ReconciliationRepository for SurrealReconciliationRepository<C> {
    async fn enqueue(&self, input: CreateReconciliationEntry) -> VelaResult<ReconciliationEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('reconciliation', $id) SET \
                 identity_id = $identity_id, \
                 email = $email, \
                 reason = $reason, \
                 resolved_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("identity_id", input.identity_id.to_string()))
            .bind(("email", input.email))
            .bind(("reason", input.reason))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ReconciliationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "reconciliation".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn list_unresolved(
        &self,
        pagination: Pagination,
    ) -> VelaResult<PaginatedResult<ReconciliationEntry>> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM reconciliation \
                 WHERE resolved_at = NONE GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM reconciliation \
                 WHERE resolved_at = NONE \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReconciliationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn mark_resolved(&self, id: Uuid) -> VelaResult<()> {
        self.db
            .query(
                "UPDATE type::record('reconciliation', $id) SET \
                 resolved_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
