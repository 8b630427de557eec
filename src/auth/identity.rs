//! Caller identity carried through a single request.

use std::fmt;

/// Verified identity of the caller, derived from a bearer token.
///
/// Built once per request by the token verifier and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    login: String,
    numeric_id: i64,
    /// Only consumed by the legacy users-service proxy path, which re-checks
    /// login and password sent as plain headers.
    legacy_password: String,
}

impl Identity {
    pub fn new(login: impl Into<String>, numeric_id: i64, legacy_password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            numeric_id,
            legacy_password: legacy_password.into(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn numeric_id(&self) -> i64 {
        self.numeric_id
    }

    /// Password claim echoed back for the users-service compatibility shim.
    pub fn legacy_password(&self) -> &str {
        &self.legacy_password
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("login", &self.login)
            .field("numeric_id", &self.numeric_id)
            .finish_non_exhaustive()
    }
}
