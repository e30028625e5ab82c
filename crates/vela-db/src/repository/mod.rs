//! SurrealDB repository implementations.

mod customer;
mod organization;
mod profile;
mod reconciliation;
mod ticket;

pub use customer::SurrealCustomerRepository;
pub use organization::SurrealOrganizationRepository;
pub use profile::SurrealProfileRepository;
pub use reconciliation::SurrealReconciliationRepository;
pub use ticket::SurrealTicketRepository;
