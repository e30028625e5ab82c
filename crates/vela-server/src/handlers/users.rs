//! User management handlers: provisioning, listing, deletion.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::info;
use uuid::Uuid;

use vela_auth::provision::{ProvisionInput, ProvisionedUser, ProvisioningService};
use vela_core::models::profile::{Profile, Role};
use vela_core::repository::{IdentityStore, ProfileRepository};

use crate::error::AppError;
use crate::handlers::{ListResponse, PageParams, authorize_admin};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: ProvisionedUser,
}

/// `POST /api/users` — the provisioning flow. Admin bearer required;
/// missing fields fail before anything leaves the process.
pub async fn create_user<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = authorize_admin(&state, &headers)?;

    let service = ProvisioningService::new(
        state.identity.clone(),
        state.profiles.clone(),
        state.organizations.clone(),
        state.reconciliation.clone(),
    );

    let user = service
        .provision(ProvisionInput {
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            name: req.name.unwrap_or_default(),
            phone: req.phone,
            role: req.role,
        })
        .await?;

    info!(user_id = %user.id, admin = %claims.0.email, "user provisioned");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            success: true,
            user,
        }),
    ))
}

/// `GET /api/users` — paginated profile listing (admin).
pub async fn list_users<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Profile>>, AppError> {
    authorize_admin(&state, &headers)?;

    let page = state.profiles.list(params.pagination()).await?;
    Ok(Json(page.into()))
}

/// `DELETE /api/users/{id}` — reverse provisioning (admin): the
/// identity goes first so a half-deleted user is a profile without an
/// identity, never the orphan the provisioning flow has to queue.
pub async fn delete_user<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    authorize_admin(&state, &headers)?;

    // 404 before touching the identity store.
    state.profiles.get_by_id(id).await?;

    state.identity.delete_identity(id).await?;
    state.profiles.delete(id).await?;

    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
