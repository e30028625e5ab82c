//! Shared application state.

use surrealdb::{Connection, Surreal};

use vela_auth::config::AuthConfig;
use vela_auth::gate::SessionGate;
use vela_db::repository::{
    SurrealCustomerRepository, SurrealOrganizationRepository, SurrealProfileRepository,
    SurrealReconciliationRepository, SurrealTicketRepository,
};
use vela_identity::IdentityClient;

/// Handles for everything a request can touch, constructed once at
/// process start and cloned per request.
///
/// Generic over the SurrealDB connection type so tests can run the
/// same state against the in-memory engine.
pub struct AppState<C: Connection> {
    pub identity: IdentityClient,
    pub auth: AuthConfig,
    pub gate: SessionGate,
    pub profiles: SurrealProfileRepository<C>,
    pub organizations: SurrealOrganizationRepository<C>,
    pub customers: SurrealCustomerRepository<C>,
    pub tickets: SurrealTicketRepository<C>,
    pub reconciliation: SurrealReconciliationRepository<C>,
}

impl<C: Connection> AppState<C> {
    pub fn new(db: Surreal<C>, identity: IdentityClient, auth: AuthConfig) -> Self {
        Self {
            identity,
            auth,
            gate: SessionGate::default(),
            profiles: SurrealProfileRepository::new(db.clone()),
            organizations: SurrealOrganizationRepository::new(db.clone()),
            customers: SurrealCustomerRepository::new(db.clone()),
            tickets: SurrealTicketRepository::new(db.clone()),
            reconciliation: SurrealReconciliationRepository::new(db),
        }
    }
}

// Manual impl: a derived Clone would demand `C: Clone`, which the
// engine types don't provide. Every field clones through an inner Arc.
impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            auth: self.auth.clone(),
            gate: self.gate.clone(),
            profiles: self.profiles.clone(),
            organizations: self.organizations.clone(),
            customers: self.customers.clone(),
            tickets: self.tickets.clone(),
            reconciliation: self.reconciliation.clone(),
        }
    }
}
