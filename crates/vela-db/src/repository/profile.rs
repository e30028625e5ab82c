//! SurrealDB implementation of [`ProfileRepository`].
//!
//! Profile rows are keyed by the identity id minted in the external
//! auth store — creation takes a caller-supplied id instead of minting
//! one.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vela_core::error::VelaResult;
use vela_core::models::profile::{CreateProfile, Profile, Role};
use vela_core::repository::{PaginatedResult, Pagination, ProfileRepository};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ProfileRow {
    name: String,
    phone: Option<String>,
    role: String,
    organization_id: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ProfileRowWithId {
    record_id: String,
    name: String,
    phone: Option<String>,
    role: String,
    organization_id: String,
    created_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "admin" => Ok(Role::Admin),
        "agent" => Ok(Role::Agent),
        other => Err(DbError::Decode(format!("unknown role: {other}"))),
    }
}

impl ProfileRow {
    fn into_profile(self, id: Uuid) -> Result<Profile, DbError> {
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Decode(format!("invalid organization UUID: {e}")))?;
        Ok(Profile {
            id,
            name: self.name,
            phone: self.phone,
            role: parse_role(&self.role)?,
            organization_id,
            created_at: self.created_at,
        })
    }
}

impl ProfileRowWithId {
    fn try_into_profile(self) -> Result<Profile, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Decode(format!("invalid organization UUID: {e}")))?;
        Ok(Profile {
            id,
            name: self.name,
            phone: self.phone,
            role: parse_role(&self.role)?,
            organization_id,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Profile repository.
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealProfileRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn create(&self, input: CreateProfile) -> VelaResult<Profile> {
        let id = input.id;
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('profile', $id) SET \
                 name = $name, \
                 phone = $phone, \
                 role = $role, \
                 organization_id = $organization_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("phone", input.phone))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("organization_id", input.organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VelaResult<Profile> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('profile', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn delete(&self, id: Uuid) -> VelaResult<()> {
        self.db
            .query("DELETE type::record('profile', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> VelaResult<PaginatedResult<Profile>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM profile GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_profile())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn count_agents(&self) -> VelaResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM profile \
                 WHERE role = 'agent' GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
