//! User provisioning — the two-phase identity + profile saga.
//!
//! Phase one creates an identity record in the external auth store;
//! phase two writes the organization and profile rows in the
//! relational store, keyed by the new identity's id. No transaction
//! spans the two stores, so a phase-two failure triggers a
//! compensating delete of the identity. The compensation is
//! best-effort: if the delete itself fails, the identity is orphaned
//! and pushed to the reconciliation queue — callers only ever see the
//! profile-creation failure.

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use vela_core::error::{VelaError, VelaResult};
use vela_core::models::identity::{CreateIdentity, Identity};
use vela_core::models::organization::CreateOrganization;
use vela_core::models::profile::{CreateProfile, Role};
use vela_core::models::reconciliation::CreateReconciliationEntry;
use vela_core::repository::{
    IdentityStore, OrganizationRepository, ProfileRepository, ReconciliationRepository,
};

/// Input for the provisioning flow. `email`, `password`, and `name`
/// are required; `phone` and `role` are not.
#[derive(Debug, Clone)]
pub struct ProvisionInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

/// Successful provisioning result.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// States of the provisioning saga. Terminal states are
/// `ProfileCreated` (success), `Compensated` (failure, both stores
/// clean), and `Orphaned` (failure, identity left behind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaState {
    PendingIdentity,
    IdentityCreated,
    ProfileCreated,
    Compensating,
    Compensated,
    Orphaned,
}

/// Provisioning service.
///
/// Generic over the store traits so that the flow has no dependency on
/// any concrete backend.
pub struct ProvisioningService<I, P, O, R>
where
    I: IdentityStore,
    P: ProfileRepository,
    O: OrganizationRepository,
    R: ReconciliationRepository,
{
    identity_store: I,
    profiles: P,
    organizations: O,
    reconciliation: R,
}

impl<I, P, O, R> ProvisioningService<I, P, O, R>
where
    I: IdentityStore,
    P: ProfileRepository,
    O: OrganizationRepository,
    R: ReconciliationRepository,
{
    pub fn new(identity_store: I, profiles: P, organizations: O, reconciliation: R) -> Self {
        Self {
            identity_store,
            profiles,
            organizations,
            reconciliation,
        }
    }

    /// Create a new system user end-to-end: identity, organization,
    /// and profile, with compensation on partial failure.
    pub async fn provision(&self, input: ProvisionInput) -> VelaResult<ProvisionedUser> {
        // 1. Validate locally. Nothing leaves the process on failure.
        let missing = missing_fields(&input);
        if !missing.is_empty() {
            return Err(VelaError::Validation {
                message: format!("missing required fields: {}", missing.join(", ")),
            });
        }

        let role = input.role.unwrap_or(Role::Agent);
        let mut state = SagaState::PendingIdentity;
        debug!(email = %input.email, state = ?state, "provisioning started");

        // 2. Phase one — identity in the external auth store, email
        //    pre-confirmed. DuplicateIdentity and IdentityCreation
        //    errors pass straight through; phase two is never reached.
        let identity = self
            .identity_store
            .create_identity(CreateIdentity {
                email: input.email.clone(),
                password: input.password.clone(),
                name: input.name.clone(),
            })
            .await?;

        state = SagaState::IdentityCreated;
        info!(identity_id = %identity.id, state = ?state, "identity created");

        // 3. Phase two — organization + profile rows, keyed by the
        //    identity id. The one-org-per-user scheme mints the
        //    organization with the same id as the identity.
        let org_result = self
            .organizations
            .create(CreateOrganization {
                id: identity.id,
                name: format!("{} organization", input.name),
                contact_email: input.email.clone(),
            })
            .await;

        let phase_two = match org_result {
            Err(e) => Err((e, false)),
            Ok(_) => self
                .profiles
                .create(CreateProfile {
                    id: identity.id,
                    name: input.name.clone(),
                    phone: input.phone.clone(),
                    role,
                    organization_id: identity.id,
                })
                .await
                .map_err(|e| (e, true)),
        };

        match phase_two {
            Ok(profile) => {
                state = SagaState::ProfileCreated;
                debug!(identity_id = %identity.id, state = ?state, "provisioning complete");
                Ok(ProvisionedUser {
                    id: profile.id,
                    email: identity.email,
                    name: profile.name,
                    role: profile.role,
                })
            }
            Err((cause, org_created)) => {
                state = SagaState::Compensating;
                warn!(
                    identity_id = %identity.id,
                    state = ?state,
                    error = %cause,
                    "phase two failed, compensating"
                );
                self.compensate(&identity, org_created).await;
                Err(VelaError::ProfileCreation(cause.to_string()))
            }
        }
    }

    /// Undo phase-two leftovers and delete the phase-one identity.
    ///
    /// Exactly one delete of the identity is attempted. A failed
    /// delete leaves an orphan: logged and enqueued for
    /// reconciliation, never surfaced to the caller.
    async fn compensate(&self, identity: &Identity, org_created: bool) {
        if org_created {
            if let Err(e) = self.organizations.delete(identity.id).await {
                warn!(identity_id = %identity.id, error = %e, "organization rollback failed");
            }
        }

        match self.identity_store.delete_identity(identity.id).await {
            Ok(()) => {
                info!(
                    identity_id = %identity.id,
                    state = ?SagaState::Compensated,
                    "identity compensated"
                );
            }
            Err(delete_err) => {
                error!(
                    identity_id = %identity.id,
                    state = ?SagaState::Orphaned,
                    error = %delete_err,
                    "compensating delete failed, identity orphaned"
                );
                let enqueue = self
                    .reconciliation
                    .enqueue(CreateReconciliationEntry {
                        identity_id: identity.id,
                        email: identity.email.clone(),
                        reason: delete_err.to_string(),
                    })
                    .await;
                if let Err(e) = enqueue {
                    error!(identity_id = %identity.id, error = %e, "reconciliation enqueue failed");
                }
            }
        }
    }
}

fn missing_fields(input: &ProvisionInput) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if input.email.trim().is_empty() {
        missing.push("email");
    }
    if input.password.trim().is_empty() {
        missing.push("password");
    }
    if input.name.trim().is_empty() {
        missing.push("name");
    }
    missing
}
