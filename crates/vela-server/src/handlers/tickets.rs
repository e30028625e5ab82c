//! Ticket handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use vela_core::models::ticket::{CreateTicket, Ticket, TicketStatus, UpdateTicket};
use vela_core::repository::{Pagination, TicketRepository};

use crate::error::AppError;
use crate::handlers::{ListResponse, require_session};
use crate::state::AppState;

/// Query parameters for ticket listing: pagination plus an optional
/// status filter.
#[derive(Debug, Default, Deserialize)]
pub struct TicketListParams {
    pub status: Option<TicketStatus>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// `GET /api/tickets?status=open`
pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<TicketListParams>,
) -> Result<Json<ListResponse<Ticket>>, AppError> {
    require_session(&state, &headers).await?;

    let default = Pagination::default();
    let pagination = Pagination {
        offset: params.offset.unwrap_or(default.offset),
        limit: params.limit.unwrap_or(default.limit),
    };

    let page = state.tickets.list(params.status, pagination).await?;
    Ok(Json(page.into()))
}

/// `POST /api/tickets`
pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Json(input): Json<CreateTicket>,
) -> Result<impl IntoResponse, AppError> {
    require_session(&state, &headers).await?;

    let ticket = state.tickets.create(input).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// `GET /api/tickets/{id}`
pub async fn get_one<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError> {
    require_session(&state, &headers).await?;

    Ok(Json(state.tickets.get_by_id(id).await?))
}

/// `PUT /api/tickets/{id}`
pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTicket>,
) -> Result<Json<Ticket>, AppError> {
    require_session(&state, &headers).await?;

    Ok(Json(state.tickets.update(id, input).await?))
}
