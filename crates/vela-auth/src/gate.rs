//! Session gate — the per-request allow/redirect decision.
//!
//! The gate itself is a pure decision table; resolving whether a
//! session is present is the caller's job (one identity-store round
//! trip per request, never cached).

/// Path prefixes reachable without a session.
pub const DEFAULT_PUBLIC_PREFIXES: &[&str] = &["/login", "/signup", "/password-reset"];

/// Outcome of gating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

/// Decides, per incoming page request, whether to serve the page or
/// redirect.
///
/// | session | public path | action            |
/// |---------|-------------|-------------------|
/// | no      | no          | redirect `/login` |
/// | no      | yes         | allow             |
/// | yes     | no          | allow             |
/// | yes     | yes         | redirect `/`      |
#[derive(Debug, Clone)]
pub struct SessionGate {
    public_prefixes: Vec<String>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PREFIXES.iter().map(|p| p.to_string()))
    }
}

impl SessionGate {
    pub fn new(public_prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            public_prefixes: public_prefixes.into_iter().collect(),
        }
    }

    /// Segment-aware prefix match: `/login` covers `/login` and
    /// `/login/reset`, not `/loginx`.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn decide(&self, session_present: bool, path: &str) -> GateDecision {
        match (session_present, self.is_public(path)) {
            (false, false) => GateDecision::RedirectToLogin,
            (false, true) => GateDecision::Allow,
            (true, false) => GateDecision::Allow,
            (true, true) => GateDecision::RedirectToHome,
        }
    }
}
