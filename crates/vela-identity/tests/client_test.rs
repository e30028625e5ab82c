//! Integration tests for the identity client against a local stub of
//! the hosted identity service.

use std::io::Read;

use tiny_http::{Header, Method, Response, Server};

use vela_core::error::VelaError;
use vela_core::models::identity::CreateIdentity;
use vela_core::repository::IdentityStore;
use vela_identity::{IdentityClient, IdentityConfig};

const STUB_USER_ID: &str = "0b9e57a4-9d3a-4b7e-8a61-53e6040fd12b";
const SERVICE_KEY: &str = "service-role-key";

fn json_response(status: u16, body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header("Content-Type: application/json".parse::<Header>().unwrap())
}

fn bearer(req: &tiny_http::Request) -> Option<String> {
    req.headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .and_then(|h| h.value.as_str().strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Spin up a stub identity service on an ephemeral port and return
/// its base URL. The serving thread lives for the rest of the test
/// process.
fn spawn_stub() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    std::thread::spawn(move || {
        for mut req in server.incoming_requests() {
            let path = req.url().to_string();
            let method = req.method().clone();
            let token = bearer(&req);

            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            let parsed: serde_json::Value =
                serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);

            let response = match (method, path.as_str()) {
                (Method::Post, "/admin/users") => {
                    if token.as_deref() != Some(SERVICE_KEY) {
                        json_response(401, r#"{"msg":"invalid service key"}"#.into())
                    } else if parsed["email"].as_str() == Some("taken@example.com") {
                        json_response(
                            422,
                            r#"{"msg":"A user with this email address has already been registered"}"#
                                .into(),
                        )
                    } else {
                        json_response(
                            200,
                            format!(
                                r#"{{"id":"{STUB_USER_ID}","email":{email},"user_metadata":{{"name":{name}}}}}"#,
                                email = parsed["email"],
                                name = parsed["user_metadata"]["name"],
                            ),
                        )
                    }
                }
                (Method::Delete, p) if p.starts_with("/admin/users/") => {
                    json_response(204, String::new())
                }
                (Method::Get, "/user") => {
                    if token.as_deref() == Some("valid-token") {
                        json_response(
                            200,
                            format!(
                                r#"{{"id":"{STUB_USER_ID}","email":"a@b.com","user_metadata":{{"name":"A"}}}}"#
                            ),
                        )
                    } else {
                        json_response(401, r#"{"msg":"invalid JWT"}"#.into())
                    }
                }
                (Method::Post, "/token?grant_type=password") => {
                    if parsed["password"].as_str() == Some("hunter2") {
                        json_response(
                            200,
                            r#"{"access_token":"valid-token","token_type":"bearer","expires_in":3600,"refresh_token":"r1"}"#
                                .into(),
                        )
                    } else {
                        json_response(
                            400,
                            r#"{"error_description":"Invalid login credentials"}"#.into(),
                        )
                    }
                }
                (Method::Post, "/logout") => json_response(204, String::new()),
                _ => json_response(404, r#"{"msg":"not found"}"#.into()),
            };

            let _ = req.respond(response);
        }
    });

    format!("http://127.0.0.1:{port}")
}

fn client(base_url: String) -> IdentityClient {
    IdentityClient::new(IdentityConfig {
        base_url,
        service_key: SERVICE_KEY.into(),
        connect_timeout_secs: 5,
    })
    .unwrap()
}

fn create_input(email: &str) -> CreateIdentity {
    CreateIdentity {
        email: email.into(),
        password: "hunter2".into(),
        name: "A".into(),
    }
}

#[tokio::test]
async fn create_identity_returns_store_id_and_metadata() {
    let client = client(spawn_stub());

    let identity = client
        .create_identity(create_input("a@b.com"))
        .await
        .unwrap();

    assert_eq!(identity.id.to_string(), STUB_USER_ID);
    assert_eq!(identity.email, "a@b.com");
    assert_eq!(identity.name.as_deref(), Some("A"));
}

#[tokio::test]
async fn already_registered_surfaces_as_duplicate() {
    let client = client(spawn_stub());

    let err = client
        .create_identity(create_input("taken@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VelaError::DuplicateIdentity { email } if email == "taken@example.com"
    ));
}

#[tokio::test]
async fn bad_service_key_is_a_creation_failure() {
    let base = spawn_stub();
    let bad = IdentityClient::new(IdentityConfig {
        base_url: base,
        service_key: "wrong".into(),
        connect_timeout_secs: 5,
    })
    .unwrap();

    let err = bad.create_identity(create_input("a@b.com")).await.unwrap_err();
    assert!(matches!(err, VelaError::IdentityCreation(_)));
}

#[tokio::test]
async fn delete_identity_succeeds() {
    let client = client(spawn_stub());
    let id = STUB_USER_ID.parse().unwrap();

    client.delete_identity(id).await.unwrap();
}

#[tokio::test]
async fn resolve_session_distinguishes_valid_and_rejected_tokens() {
    let client = client(spawn_stub());

    let identity = client.resolve_session("valid-token").await.unwrap();
    assert_eq!(
        identity.map(|i| i.email),
        Some("a@b.com".to_string())
    );

    let anonymous = client.resolve_session("expired-token").await.unwrap();
    assert!(anonymous.is_none());
}

#[tokio::test]
async fn sign_in_roundtrip_and_rejection() {
    let client = client(spawn_stub());

    let tokens = client.sign_in("a@b.com", "hunter2").await.unwrap();
    assert_eq!(tokens.access_token, "valid-token");
    assert_eq!(tokens.expires_in, 3600);

    let err = client.sign_in("a@b.com", "wrong").await.unwrap_err();
    match err {
        VelaError::AuthenticationFailed { reason } => {
            assert_eq!(reason, "Invalid login credentials");
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }

    client.sign_out(&tokens.access_token).await.unwrap();
}
