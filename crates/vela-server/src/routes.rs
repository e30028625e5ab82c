//! Route table.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router, middleware};
use serde::Serialize;
use surrealdb::Connection;

use crate::gate;
use crate::handlers::{auth, customers, dashboard, pages, reconciliation, tickets, users};
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness endpoint, outside the session gate.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// Build the full router: gated pages, per-handler-authenticated API,
/// and the ungated health endpoint.
pub fn router<C: Connection>(state: AppState<C>) -> Router {
    let page_routes = Router::new()
        .route("/", get(pages::dashboard))
        .route("/customers", get(pages::customers))
        .route("/tickets", get(pages::tickets))
        .route("/users", get(pages::users))
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/password-reset", get(pages::password_reset))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::session_gate::<C>,
        ));

    let api_routes = Router::new()
        .route(
            "/users",
            post(users::create_user::<C>).get(users::list_users::<C>),
        )
        .route("/users/{id}", delete(users::delete_user::<C>))
        .route("/auth/login", post(auth::login::<C>))
        .route("/auth/logout", post(auth::logout::<C>))
        .route("/me", get(auth::me::<C>))
        .route(
            "/customers",
            get(customers::list::<C>).post(customers::create::<C>),
        )
        .route(
            "/customers/{id}",
            get(customers::get_one::<C>)
                .put(customers::update::<C>)
                .delete(customers::remove::<C>),
        )
        .route(
            "/tickets",
            get(tickets::list::<C>).post(tickets::create::<C>),
        )
        .route(
            "/tickets/{id}",
            get(tickets::get_one::<C>).put(tickets::update::<C>),
        )
        .route("/dashboard", get(dashboard::stats::<C>))
        .route("/reconciliation", get(reconciliation::list::<C>))
        .route(
            "/reconciliation/{id}/resolve",
            post(reconciliation::resolve::<C>),
        );

    Router::new()
        .merge(page_routes)
        .nest("/api", api_routes)
        .route("/healthz", get(health))
        .with_state(state)
}
