//! Authentication configuration.

/// Configuration for access-token verification.
///
/// The hosted identity service is the token issuer; VELA only ever
/// verifies. There is no signing key anywhere in this system.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 public key of the identity service.
    pub jwt_public_key_pem: String,
    /// Expected JWT issuer (`iss` claim).
    pub jwt_issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_public_key_pem: String::new(),
            jwt_issuer: "vela-identity".into(),
        }
    }
}
