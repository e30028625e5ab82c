//! Reconciliation queue handlers (admin).

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use surrealdb::Connection;
use tracing::info;
use uuid::Uuid;

use vela_core::models::reconciliation::ReconciliationEntry;
use vela_core::repository::ReconciliationRepository;

use crate::error::AppError;
use crate::handlers::{ListResponse, PageParams, authorize_admin};
use crate::state::AppState;

/// `GET /api/reconciliation` — unresolved orphaned identities.
pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<ReconciliationEntry>>, AppError> {
    authorize_admin(&state, &headers)?;

    let page = state
        .reconciliation
        .list_unresolved(params.pagination())
        .await?;
    Ok(Json(page.into()))
}

/// `POST /api/reconciliation/{id}/resolve` — mark an orphan entry as
/// handled after manual cleanup.
pub async fn resolve<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    authorize_admin(&state, &headers)?;

    state.reconciliation.mark_resolved(id).await?;
    info!(entry_id = %id, "reconciliation entry resolved");
    Ok(StatusCode::NO_CONTENT)
}
