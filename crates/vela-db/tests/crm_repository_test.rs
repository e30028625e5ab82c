//! Integration tests for the customer and ticket repositories using
//! in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

use vela_core::error::VelaError;
use vela_core::models::customer::{CreateCustomer, UpdateCustomer};
use vela_core::models::ticket::{CreateTicket, TicketPriority, TicketStatus, UpdateTicket};
use vela_core::repository::{CustomerRepository, Pagination, TicketRepository};
use vela_db::repository::{SurrealCustomerRepository, SurrealTicketRepository};

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vela_db::run_migrations(&db).await.unwrap();
    db
}

fn customer_input(org_id: Uuid) -> CreateCustomer {
    CreateCustomer {
        organization_id: org_id,
        name: "Jane Porter".into(),
        email: "jane@customer.test".into(),
        phone: None,
        company: Some("Porter & Co".into()),
    }
}

#[tokio::test]
async fn customer_crud_roundtrip() {
    let db = setup().await;
    let repo = SurrealCustomerRepository::new(db);
    let org_id = Uuid::new_v4();

    let customer = repo.create(customer_input(org_id)).await.unwrap();
    assert_eq!(customer.organization_id, org_id);
    assert_eq!(customer.company.as_deref(), Some("Porter & Co"));

    let updated = repo
        .update(
            customer.id,
            UpdateCustomer {
                email: Some("jane.porter@customer.test".into()),
                phone: Some("+44 20 7946 0000".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "jane.porter@customer.test");
    // Untouched fields survive a partial update.
    assert_eq!(updated.name, "Jane Porter");

    repo.delete(customer.id).await.unwrap();
    let err = repo.get_by_id(customer.id).await.unwrap_err();
    assert!(matches!(err, VelaError::NotFound { .. }));
}

#[tokio::test]
async fn customer_list_and_count() {
    let db = setup().await;
    let repo = SurrealCustomerRepository::new(db);
    let org_id = Uuid::new_v4();

    for _ in 0..4 {
        repo.create(customer_input(org_id)).await.unwrap();
    }

    assert_eq!(repo.count().await.unwrap(), 4);

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn ticket_defaults_to_open_and_normal_priority() {
    let db = setup().await;
    let repo = SurrealTicketRepository::new(db);

    let ticket = repo
        .create(CreateTicket {
            organization_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            subject: "Cannot log in".into(),
            body: "Password reset email never arrives.".into(),
            priority: None,
            assignee_id: None,
        })
        .await
        .unwrap();

    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.priority, TicketPriority::Normal);
    assert!(ticket.assignee_id.is_none());
}

#[tokio::test]
async fn ticket_update_status_and_assignment() {
    let db = setup().await;
    let repo = SurrealTicketRepository::new(db);
    let agent = Uuid::new_v4();

    let ticket = repo
        .create(CreateTicket {
            organization_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            subject: "Billing question".into(),
            body: "Invoice #42 looks wrong.".into(),
            priority: Some(TicketPriority::High),
            assignee_id: None,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            ticket.id,
            UpdateTicket {
                status: Some(TicketStatus::Pending),
                assignee_id: Some(Some(agent)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, TicketStatus::Pending);
    assert_eq!(updated.assignee_id, Some(agent));
    assert_eq!(updated.priority, TicketPriority::High);

    // Some(None) clears the assignment.
    let unassigned = repo
        .update(
            ticket.id,
            UpdateTicket {
                assignee_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(unassigned.assignee_id.is_none());
}

#[tokio::test]
async fn ticket_list_filters_by_status() {
    let db = setup().await;
    let repo = SurrealTicketRepository::new(db);
    let org_id = Uuid::new_v4();

    let mut ids = Vec::new();
    for subject in ["one", "two", "three"] {
        let t = repo
            .create(CreateTicket {
                organization_id: org_id,
                customer_id: Uuid::new_v4(),
                subject: subject.into(),
                body: "…".into(),
                priority: None,
                assignee_id: None,
            })
            .await
            .unwrap();
        ids.push(t.id);
    }

    repo.update(
        ids[0],
        UpdateTicket {
            status: Some(TicketStatus::Closed),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let open = repo
        .list(Some(TicketStatus::Open), Pagination::default())
        .await
        .unwrap();
    assert_eq!(open.total, 2);

    let all = repo.list(None, Pagination::default()).await.unwrap();
    assert_eq!(all.total, 3);

    assert_eq!(repo.count_by_status(TicketStatus::Closed).await.unwrap(), 1);
    assert_eq!(repo.count_by_status(TicketStatus::Open).await.unwrap(), 2);
}
