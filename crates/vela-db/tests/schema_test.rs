//! Integration tests for schema initialization using in-memory
//! SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    vela_db::run_migrations(&db).await.unwrap();

    // Verify that the tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(
        info_str.contains("organization"),
        "missing organization table"
    );
    assert!(info_str.contains("profile"), "missing profile table");
    assert!(info_str.contains("customer"), "missing customer table");
    assert!(info_str.contains("ticket"), "missing ticket table");
    assert!(
        info_str.contains("reconciliation"),
        "missing reconciliation table"
    );
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    vela_db::run_migrations(&db).await.unwrap();
    // A second run must see the recorded version and apply nothing.
    vela_db::run_migrations(&db).await.unwrap();

    let mut result = db
        .query("SELECT count() AS total FROM _migration GROUP ALL")
        .await
        .unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    let row_str = format!("{:?}", rows);
    assert!(row_str.contains("1"), "expected one migration record");
}

#[tokio::test]
async fn schema_rejects_unknown_role() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vela_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE profile SET name = 'x', phone = NONE, \
             role = 'overlord', organization_id = 'o1'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "ASSERT on role should reject 'overlord'");
}
