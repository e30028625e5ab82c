//! Integration tests for the provisioning saga.
//!
//! The relational side runs against in-memory SurrealDB; the external
//! auth store is a scripted mock so each failure mode can be forced.

use std::sync::{Arc, Mutex};

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

use vela_auth::provision::{ProvisionInput, ProvisioningService};
use vela_core::error::{VelaError, VelaResult};
use vela_core::models::identity::{CreateIdentity, Identity};
use vela_core::models::profile::{CreateProfile, Profile, Role};
use vela_core::repository::{
    IdentityStore, OrganizationRepository, PaginatedResult, Pagination, ProfileRepository,
    ReconciliationRepository,
};
use vela_db::repository::{
    SurrealOrganizationRepository, SurrealProfileRepository, SurrealReconciliationRepository,
};

// ---------------------------------------------------------------------------
// Scripted identity store
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Default)]
enum CreateOutcome {
    #[default]
    Succeed,
    Duplicate,
    Fail,
}

#[derive(Default)]
struct MockInner {
    next_id: Option<Uuid>,
    on_create: CreateOutcome,
    fail_delete: bool,
    create_calls: usize,
    delete_calls: usize,
    deleted: Vec<Uuid>,
}

#[derive(Clone, Default)]
struct MockIdentityStore {
    inner: Arc<Mutex<MockInner>>,
}

impl MockIdentityStore {
    fn with_next_id(id: Uuid) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().next_id = Some(id);
        store
    }

    fn on_create(self, outcome: CreateOutcome) -> Self {
        self.inner.lock().unwrap().on_create = outcome;
        self
    }

    fn failing_delete(self) -> Self {
        self.inner.lock().unwrap().fail_delete = true;
        self
    }

    fn create_calls(&self) -> usize {
        self.inner.lock().unwrap().create_calls
    }

    fn delete_calls(&self) -> usize {
        self.inner.lock().unwrap().delete_calls
    }

    fn deleted(&self) -> Vec<Uuid> {
        self.inner.lock().unwrap().deleted.clone()
    }
}

impl IdentityStore for MockIdentityStore {
    async fn create_identity(&self, input: CreateIdentity) -> VelaResult<Identity> {
        let mut inner = self.inner.lock().unwrap();
        inner.create_calls += 1;
        match inner.on_create {
            CreateOutcome::Duplicate => Err(VelaError::DuplicateIdentity { email: input.email }),
            CreateOutcome::Fail => {
                Err(VelaError::IdentityCreation("signups disabled".into()))
            }
            CreateOutcome::Succeed => {
                let id = inner.next_id.take().unwrap_or_else(Uuid::new_v4);
                Ok(Identity {
                    id,
                    email: input.email,
                    name: Some(input.name),
                })
            }
        }
    }

    async fn delete_identity(&self, id: Uuid) -> VelaResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.delete_calls += 1;
        if inner.fail_delete {
            Err(VelaError::IdentityService("delete timed out".into()))
        } else {
            inner.deleted.push(id);
            Ok(())
        }
    }

    async fn resolve_session(&self, _access_token: &str) -> VelaResult<Option<Identity>> {
        Ok(None)
    }
}

/// Profile repository that always rejects the insert — forces the
/// saga into phase-two failure.
#[derive(Clone)]
struct RejectingProfileRepository;

impl ProfileRepository for RejectingProfileRepository {
    async fn create(&self, _input: CreateProfile) -> VelaResult<Profile> {
        Err(VelaError::Database("row-level policy violation".into()))
    }

    async fn get_by_id(&self, id: Uuid) -> VelaResult<Profile> {
        Err(VelaError::NotFound {
            entity: "profile".into(),
            id: id.to_string(),
        })
    }

    async fn delete(&self, _id: Uuid) -> VelaResult<()> {
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> VelaResult<PaginatedResult<Profile>> {
        Ok(PaginatedResult {
            items: Vec::new(),
            total: 0,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn count_agents(&self) -> VelaResult<u64> {
        Ok(0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type MemDb = Surreal<surrealdb::engine::local::Db>;

async fn setup_db() -> MemDb {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vela_db::run_migrations(&db).await.unwrap();
    db
}

fn input() -> ProvisionInput {
    ProvisionInput {
        email: "a@b.com".into(),
        password: "x".into(),
        name: "A".into(),
        phone: None,
        role: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_returns_user_with_identity_id() {
    let db = setup_db().await;
    let u1 = Uuid::new_v4();
    let store = MockIdentityStore::with_next_id(u1);

    let svc = ProvisioningService::new(
        store.clone(),
        SurrealProfileRepository::new(db.clone()),
        SurrealOrganizationRepository::new(db.clone()),
        SurrealReconciliationRepository::new(db.clone()),
    );

    let user = svc.provision(input()).await.unwrap();
    assert_eq!(user.id, u1);
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.name, "A");
    assert_eq!(user.role, Role::Agent);

    // Both phase-two rows exist, keyed by the identity id.
    let profile = SurrealProfileRepository::new(db.clone())
        .get_by_id(u1)
        .await
        .unwrap();
    assert_eq!(profile.organization_id, u1);
    SurrealOrganizationRepository::new(db)
        .get_by_id(u1)
        .await
        .unwrap();

    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn explicit_role_is_honored() {
    let db = setup_db().await;
    let store = MockIdentityStore::default();

    let svc = ProvisioningService::new(
        store,
        SurrealProfileRepository::new(db.clone()),
        SurrealOrganizationRepository::new(db.clone()),
        SurrealReconciliationRepository::new(db),
    );

    let user = svc
        .provision(ProvisionInput {
            role: Some(Role::Admin),
            ..input()
        })
        .await
        .unwrap();
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn duplicate_identity_skips_phase_two() {
    let db = setup_db().await;
    let store = MockIdentityStore::default().on_create(CreateOutcome::Duplicate);

    let svc = ProvisioningService::new(
        store.clone(),
        SurrealProfileRepository::new(db.clone()),
        SurrealOrganizationRepository::new(db.clone()),
        SurrealReconciliationRepository::new(db.clone()),
    );

    let err = svc.provision(input()).await.unwrap_err();
    assert!(matches!(err, VelaError::DuplicateIdentity { .. }));

    // No profile row was written, no compensation ran.
    let profiles = SurrealProfileRepository::new(db)
        .list(Pagination::default())
        .await
        .unwrap();
    assert_eq!(profiles.total, 0);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn identity_store_failure_passes_through() {
    let db = setup_db().await;
    let store = MockIdentityStore::default().on_create(CreateOutcome::Fail);

    let svc = ProvisioningService::new(
        store,
        SurrealProfileRepository::new(db.clone()),
        SurrealOrganizationRepository::new(db.clone()),
        SurrealReconciliationRepository::new(db),
    );

    let err = svc.provision(input()).await.unwrap_err();
    match err {
        VelaError::IdentityCreation(msg) => assert_eq!(msg, "signups disabled"),
        other => panic!("expected IdentityCreation, got {other:?}"),
    }
}

#[tokio::test]
async fn profile_failure_compensates_exactly_once() {
    let db = setup_db().await;
    let u2 = Uuid::new_v4();
    let store = MockIdentityStore::with_next_id(u2);

    let svc = ProvisioningService::new(
        store.clone(),
        RejectingProfileRepository,
        SurrealOrganizationRepository::new(db.clone()),
        SurrealReconciliationRepository::new(db.clone()),
    );

    let err = svc.provision(input()).await.unwrap_err();
    assert!(matches!(err, VelaError::ProfileCreation(_)), "got: {err:?}");

    // Exactly one compensating delete, aimed at the new identity.
    assert_eq!(store.delete_calls(), 1);
    assert_eq!(store.deleted(), vec![u2]);

    // The organization row minted in phase two was rolled back.
    let org = SurrealOrganizationRepository::new(db.clone())
        .get_by_id(u2)
        .await;
    assert!(matches!(org, Err(VelaError::NotFound { .. })));

    // Compensation succeeded, so nothing reached the queue.
    let queue = SurrealReconciliationRepository::new(db)
        .list_unresolved(Pagination::default())
        .await
        .unwrap();
    assert_eq!(queue.total, 0);
}

#[tokio::test]
async fn failed_compensation_records_orphan() {
    let db = setup_db().await;
    let u3 = Uuid::new_v4();
    let store = MockIdentityStore::with_next_id(u3).failing_delete();

    let svc = ProvisioningService::new(
        store.clone(),
        RejectingProfileRepository,
        SurrealOrganizationRepository::new(db.clone()),
        SurrealReconciliationRepository::new(db.clone()),
    );

    // The caller still sees a plain profile-creation failure…
    let err = svc.provision(input()).await.unwrap_err();
    assert!(matches!(err, VelaError::ProfileCreation(_)));
    assert_eq!(store.delete_calls(), 1);

    // …while the orphan is queued for reconciliation.
    let queue = SurrealReconciliationRepository::new(db)
        .list_unresolved(Pagination::default())
        .await
        .unwrap();
    assert_eq!(queue.total, 1);
    assert_eq!(queue.items[0].identity_id, u3);
    assert_eq!(queue.items[0].email, "a@b.com");
}

#[tokio::test]
async fn validation_failure_makes_no_external_call() {
    let db = setup_db().await;
    let store = MockIdentityStore::default();

    let svc = ProvisioningService::new(
        store.clone(),
        SurrealProfileRepository::new(db.clone()),
        SurrealOrganizationRepository::new(db.clone()),
        SurrealReconciliationRepository::new(db),
    );

    for broken in [
        ProvisionInput {
            email: "".into(),
            ..input()
        },
        ProvisionInput {
            password: "  ".into(),
            ..input()
        },
        ProvisionInput {
            name: "".into(),
            ..input()
        },
    ] {
        let err = svc.provision(broken).await.unwrap_err();
        assert!(matches!(err, VelaError::Validation { .. }));
    }

    assert_eq!(store.create_calls(), 0);
    assert_eq!(store.delete_calls(), 0);
}
