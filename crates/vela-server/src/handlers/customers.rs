//! Customer CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use surrealdb::Connection;
use uuid::Uuid;

use vela_core::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use vela_core::repository::CustomerRepository;

use crate::error::AppError;
use crate::handlers::{ListResponse, PageParams, require_session};
use crate::state::AppState;

/// `GET /api/customers`
pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Customer>>, AppError> {
    require_session(&state, &headers).await?;

    let page = state.customers.list(params.pagination()).await?;
    Ok(Json(page.into()))
}

/// `POST /api/customers`
pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Json(input): Json<CreateCustomer>,
) -> Result<impl IntoResponse, AppError> {
    require_session(&state, &headers).await?;

    let customer = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// `GET /api/customers/{id}`
pub async fn get_one<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    require_session(&state, &headers).await?;

    Ok(Json(state.customers.get_by_id(id).await?))
}

/// `PUT /api/customers/{id}`
pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCustomer>,
) -> Result<Json<Customer>, AppError> {
    require_session(&state, &headers).await?;

    Ok(Json(state.customers.update(id, input).await?))
}

/// `DELETE /api/customers/{id}`
pub async fn remove<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_session(&state, &headers).await?;

    // 404 for unknown ids instead of a silent no-op delete.
    state.customers.get_by_id(id).await?;
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
