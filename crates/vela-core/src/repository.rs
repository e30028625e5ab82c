//! Store trait definitions for data access abstraction.
//!
//! All operations are async network calls against external hosted
//! systems: the identity store (auth) and the relational store. No
//! transaction spans both, and none spans two tables of the relational
//! store either; callers that need multi-step writes must compensate
//! explicitly.

use uuid::Uuid;

use crate::error::VelaResult;
use crate::models::{
    customer::{CreateCustomer, Customer, UpdateCustomer},
    identity::{CreateIdentity, Identity},
    organization::{CreateOrganization, Organization},
    profile::{CreateProfile, Profile},
    reconciliation::{CreateReconciliationEntry, ReconciliationEntry},
    ticket::{CreateTicket, Ticket, TicketStatus, UpdateTicket},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// External identity store (hosted auth service)
// ---------------------------------------------------------------------------

/// Contract consumed from the hosted auth store.
///
/// Three operations only: create a user with a pre-confirmed email,
/// delete a user by id, and resolve a session token to its identity.
pub trait IdentityStore: Send + Sync {
    /// Create an identity with the email marked confirmed and `{name}`
    /// attached as user metadata.
    ///
    /// An "already registered" response from the store surfaces as
    /// [`VelaError::DuplicateIdentity`](crate::VelaError).
    fn create_identity(
        &self,
        input: CreateIdentity,
    ) -> impl Future<Output = VelaResult<Identity>> + Send;

    /// Delete an identity by id. Used as the compensating action of
    /// the provisioning flow.
    fn delete_identity(&self, id: Uuid) -> impl Future<Output = VelaResult<()>> + Send;

    /// Resolve a session access token to the identity it belongs to.
    /// `Ok(None)` means the token is absent from / rejected by the
    /// store — an anonymous caller, not an error.
    fn resolve_session(
        &self,
        access_token: &str,
    ) -> impl Future<Output = VelaResult<Option<Identity>>> + Send;
}

// ---------------------------------------------------------------------------
// Relational store repositories
// ---------------------------------------------------------------------------

pub trait ProfileRepository: Send + Sync {
    fn create(&self, input: CreateProfile) -> impl Future<Output = VelaResult<Profile>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VelaResult<Profile>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = VelaResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = VelaResult<PaginatedResult<Profile>>> + Send;
    fn count_agents(&self) -> impl Future<Output = VelaResult<u64>> + Send;
}

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = VelaResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VelaResult<Organization>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = VelaResult<()>> + Send;
}

pub trait CustomerRepository: Send + Sync {
    fn create(&self, input: CreateCustomer) -> impl Future<Output = VelaResult<Customer>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VelaResult<Customer>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCustomer,
    ) -> impl Future<Output = VelaResult<Customer>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = VelaResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = VelaResult<PaginatedResult<Customer>>> + Send;
    fn count(&self) -> impl Future<Output = VelaResult<u64>> + Send;
}

pub trait TicketRepository: Send + Sync {
    fn create(&self, input: CreateTicket) -> impl Future<Output = VelaResult<Ticket>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VelaResult<Ticket>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTicket,
    ) -> impl Future<Output = VelaResult<Ticket>> + Send;
    fn list(
        &self,
        status: Option<TicketStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = VelaResult<PaginatedResult<Ticket>>> + Send;
    fn count_by_status(
        &self,
        status: TicketStatus,
    ) -> impl Future<Output = VelaResult<u64>> + Send;
}

pub trait ReconciliationRepository: Send + Sync {
    fn enqueue(
        &self,
        input: CreateReconciliationEntry,
    ) -> impl Future<Output = VelaResult<ReconciliationEntry>> + Send;
    fn list_unresolved(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = VelaResult<PaginatedResult<ReconciliationEntry>>> + Send;
    fn mark_resolved(&self, id: Uuid) -> impl Future<Output = VelaResult<()>> + Send;
}
