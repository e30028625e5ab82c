//! HTTP client for the hosted identity service.
//!
//! Admin operations (create/delete) authenticate with the service
//! key; session resolution and sign-out authenticate with the
//! caller's own access token. Every call is a single request — a
//! transient failure is terminal for that request, never retried.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use vela_core::error::{VelaError, VelaResult};
use vela_core::models::identity::{CreateIdentity, Identity};
use vela_core::repository::IdentityStore;

use crate::error::IdentityError;

/// Configuration for the identity service connection.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Base URL of the service (e.g., `http://127.0.0.1:9999`).
    pub base_url: String,
    /// Service-role key authorizing admin operations.
    pub service_key: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9999".into(),
            service_key: String::new(),
            connect_timeout_secs: 5,
        }
    }
}

/// Token pair returned by a password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
}

/// Wire shape of a user record as the service returns it.
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    email: String,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl UserResponse {
    fn into_identity(self) -> Identity {
        let name = self
            .user_metadata
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Identity {
            id: self.id,
            email: self.email,
            name,
        }
    }
}

/// Wire shape of the service's error bodies. Different endpoints use
/// different field names; take whichever is present.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Classify a failed admin create-user response.
fn classify_create_failure(status: StatusCode, body: &str, email: &str) -> IdentityError {
    let message = error_message(body);
    if status == StatusCode::CONFLICT || message.to_lowercase().contains("already registered") {
        IdentityError::AlreadyRegistered {
            email: email.to_string(),
        }
    } else {
        IdentityError::Service {
            status: status.as_u16(),
            message,
        }
    }
}

/// Client handle for the hosted identity service.
///
/// Cheap to clone; constructed once at startup and injected into the
/// server state.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
}

impl IdentityClient {
    pub fn new(config: IdentityConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Authenticate with email + password and obtain a token pair.
    pub async fn sign_in(&self, email: &str, password: &str) -> VelaResult<SessionTokens> {
        let resp = self
            .http
            .post(self.endpoint("/token?grant_type=password"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| VelaError::IdentityService(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            resp.json::<SessionTokens>()
                .await
                .map_err(|e| VelaError::IdentityService(format!("bad token response: {e}")))
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            Err(VelaError::AuthenticationFailed {
                reason: error_message(&resp.text().await.unwrap_or_default()),
            })
        } else {
            Err(VelaError::IdentityService(format!(
                "sign-in returned {status}"
            )))
        }
    }

    /// Revoke the session behind an access token. A token the service
    /// no longer recognizes counts as signed out.
    pub async fn sign_out(&self, access_token: &str) -> VelaResult<()> {
        let resp = self
            .http
            .post(self.endpoint("/logout"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| VelaError::IdentityService(e.to_string()))?;

        let status = resp.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(VelaError::IdentityService(format!(
                "sign-out returned {status}"
            )))
        }
    }
}

impl IdentityStore for IdentityClient {
    async fn create_identity(&self, input: CreateIdentity) -> VelaResult<Identity> {
        let body = json!({
            "email": input.email,
            "password": input.password,
            "email_confirm": true,
            "user_metadata": { "name": input.name },
        });

        let resp = self
            .http
            .post(self.endpoint("/admin/users"))
            .bearer_auth(&self.config.service_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VelaError::IdentityCreation(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            let user: UserResponse = resp
                .json()
                .await
                .map_err(|e| VelaError::IdentityCreation(format!("bad user response: {e}")))?;
            debug!(identity_id = %user.id, "identity created in auth store");
            return Ok(user.into_identity());
        }

        let text = resp.text().await.unwrap_or_default();
        match classify_create_failure(status, &text, &input.email) {
            IdentityError::AlreadyRegistered { email } => {
                Err(VelaError::DuplicateIdentity { email })
            }
            other => Err(VelaError::IdentityCreation(other.to_string())),
        }
    }

    async fn delete_identity(&self, id: Uuid) -> VelaResult<()> {
        let resp = self
            .http
            .delete(self.endpoint(&format!("/admin/users/{id}")))
            .bearer_auth(&self.config.service_key)
            .send()
            .await
            .map_err(|e| VelaError::IdentityService(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            debug!(identity_id = %id, "identity deleted from auth store");
            Ok(())
        } else {
            let message = error_message(&resp.text().await.unwrap_or_default());
            Err(VelaError::IdentityService(format!(
                "delete returned {status}: {message}"
            )))
        }
    }

    async fn resolve_session(&self, access_token: &str) -> VelaResult<Option<Identity>> {
        let resp = self
            .http
            .get(self.endpoint("/user"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| VelaError::IdentityService(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            let user: UserResponse = resp
                .json()
                .await
                .map_err(|e| VelaError::IdentityService(format!("bad user response: {e}")))?;
            Ok(Some(user.into_identity()))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Rejected token — an anonymous caller, not a failure.
            Ok(None)
        } else {
            Err(VelaError::IdentityService(format!(
                "session lookup returned {status}"
            )))
        }
    }
}
