//! VELA Server — application entry point.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vela_db::DbManager;
use vela_identity::IdentityClient;
use vela_server::config::Config;
use vela_server::routes;
use vela_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("vela_server=info,vela_auth=info,vela_db=info,vela_identity=info")
        }))
        .json()
        .init();

    info!("Starting VELA server...");

    let config = Config::load();

    let db = DbManager::connect(&config.db)
        .await
        .expect("Database connection failed");
    vela_db::run_migrations(db.client())
        .await
        .expect("Migrations failed");

    let identity =
        IdentityClient::new(config.identity.clone()).expect("Identity client construction failed");

    let state = AppState::new(db.client().clone(), identity, config.auth.clone());
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    info!(%addr, "VELA server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("VELA server stopped.");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    info!("Shutdown signal received");
}
