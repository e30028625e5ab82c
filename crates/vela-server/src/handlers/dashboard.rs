//! Dashboard statistics handler.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;
use surrealdb::Connection;

use vela_core::models::ticket::TicketStatus;
use vela_core::repository::{CustomerRepository, ProfileRepository, TicketRepository};

use crate::error::AppError;
use crate::handlers::require_session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub customers: u64,
    pub open_tickets: u64,
    pub closed_tickets: u64,
    pub agents: u64,
}

/// `GET /api/dashboard`
pub async fn stats<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, AppError> {
    require_session(&state, &headers).await?;

    let customers = state.customers.count().await?;
    let open_tickets = state.tickets.count_by_status(TicketStatus::Open).await?;
    let closed_tickets = state.tickets.count_by_status(TicketStatus::Closed).await?;
    let agents = state.profiles.count_agents().await?;

    Ok(Json(DashboardStats {
        customers,
        open_tickets,
        closed_tickets,
        agents,
    }))
}
