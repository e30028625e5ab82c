//! Environment-driven server configuration.

use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

use vela_auth::config::AuthConfig;
use vela_db::DbConfig;
use vela_identity::IdentityConfig;

pub struct Config {
    pub port: u16,
    pub db: DbConfig,
    pub identity: IdentityConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("VELA_PORT", "8080"),
            db: DbConfig {
                url: try_load("VELA_DB_URL", "127.0.0.1:8000"),
                namespace: try_load("VELA_DB_NS", "vela"),
                database: try_load("VELA_DB_NAME", "main"),
                username: try_load("VELA_DB_USER", "root"),
                password: read_secret("VELA_DB_PASS"),
            },
            identity: IdentityConfig {
                base_url: try_load("VELA_IDENTITY_URL", "http://127.0.0.1:9999"),
                service_key: read_secret("VELA_IDENTITY_SERVICE_KEY"),
                connect_timeout_secs: try_load("VELA_IDENTITY_CONNECT_TIMEOUT", "5"),
            },
            auth: AuthConfig {
                jwt_public_key_pem: read_secret("VELA_JWT_PUBLIC_KEY"),
                jwt_issuer: try_load("VELA_JWT_ISSUER", "vela-identity"),
            },
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Secrets come from the environment directly or, failing that, from
/// a `/run/secrets/<NAME>` file.
fn read_secret(secret_name: &str) -> String {
    if let Ok(value) = env::var(secret_name) {
        return value;
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}
