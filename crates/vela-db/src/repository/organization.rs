//! SurrealDB implementation of [`OrganizationRepository`].
//!
//! The signup flow mints the organization with the same id as the new
//! identity, so creation takes a caller-supplied id.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vela_core::error::VelaResult;
use vela_core::models::organization::{CreateOrganization, Organization};
use vela_core::repository::OrganizationRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    contact_email: String,
    created_at: DateTime<Utc>,
}

fn row_to_organization(row: OrganizationRow, id: Uuid) -> Organization {
    Organization {
        id,
        name: row.name,
        contact_email: row.contact_email,
        created_at: row.created_at,
    }
}

/// SurrealDB implementation of the Organization repository.
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealOrganizationRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> VelaResult<Organization> {
        let id = input.id;
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, \
                 contact_email = $contact_email",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("contact_email", input.contact_email))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row_to_organization(row, id))
    }

    async fn get_by_id(&self, id: Uuid) -> VelaResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row_to_organization(row, id))
    }

    async fn delete(&self, id: Uuid) -> VelaResult<()> {
        self.db
            .query("DELETE type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
