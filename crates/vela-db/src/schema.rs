//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD contact_email ON TABLE organization TYPE string;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Profiles (id mirrors the identity id in the external auth store)
-- =======================================================================
DEFINE TABLE profile SCHEMAFULL;
DEFINE FIELD name ON TABLE profile TYPE string;
DEFINE FIELD phone ON TABLE profile TYPE option<string>;
DEFINE FIELD role ON TABLE profile TYPE string \
    ASSERT $value IN ['admin', 'agent'];
DEFINE FIELD organization_id ON TABLE profile TYPE string;
DEFINE FIELD created_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_org ON TABLE profile COLUMNS organization_id;

-- =======================================================================
-- Customers
-- =======================================================================
DEFINE TABLE customer SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE customer TYPE string;
DEFINE FIELD name ON TABLE customer TYPE string;
DEFINE FIELD email ON TABLE customer TYPE string;
DEFINE FIELD phone ON TABLE customer TYPE option<string>;
DEFINE FIELD company ON TABLE customer TYPE option<string>;
DEFINE FIELD created_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_customer_org ON TABLE customer COLUMNS organization_id;

-- =======================================================================
-- Tickets
-- =======================================================================
DEFINE TABLE ticket SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE ticket TYPE string;
DEFINE FIELD customer_id ON TABLE ticket TYPE string;
DEFINE FIELD subject ON TABLE ticket TYPE string;
DEFINE FIELD body ON TABLE ticket TYPE string;
DEFINE FIELD status ON TABLE ticket TYPE string \
    ASSERT $value IN ['open', 'pending', 'closed'];
DEFINE FIELD priority ON TABLE ticket TYPE string \
    ASSERT $value IN ['low', 'normal', 'high'];
DEFINE FIELD assignee_id ON TABLE ticket TYPE option<string>;
DEFINE FIELD created_at ON TABLE ticket TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE ticket TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_ticket_status ON TABLE ticket COLUMNS status;
DEFINE INDEX idx_ticket_customer ON TABLE ticket COLUMNS customer_id;

-- =======================================================================
-- Reconciliation queue (orphaned identities)
-- =======================================================================
DEFINE TABLE reconciliation SCHEMAFULL;
DEFINE FIELD identity_id ON TABLE reconciliation TYPE string;
DEFINE FIELD email ON TABLE reconciliation TYPE string;
DEFINE FIELD reason ON TABLE reconciliation TYPE string;
DEFINE FIELD created_at ON TABLE reconciliation TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD resolved_at ON TABLE reconciliation \
    TYPE option<datetime>;
DEFINE INDEX idx_reconciliation_identity ON TABLE reconciliation \
    COLUMNS identity_id;
";

/// Apply any migrations newer than the recorded schema version.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
