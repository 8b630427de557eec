//! Bearer token verification.
//!
//! Tokens are JWTs issued by the users service and signed with a shared HMAC
//! secret. Only the HMAC family is accepted; a token announcing any other
//! algorithm is rejected outright rather than negotiated.

use std::collections::HashSet;
use std::fmt;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::identity::Identity;
use crate::config::AuthConfig;
use crate::observability::metrics;

/// Algorithms a token may be signed with.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub login: String,
    #[serde(default)]
    pub password: String,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

/// Why a bearer token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("token is empty")]
    EmptyToken,

    #[error("token is invalid")]
    InvalidToken,
}

impl AuthError {
    fn reason(self) -> &'static str {
        match self {
            AuthError::EmptyToken => "empty",
            AuthError::InvalidToken => "invalid",
        }
    }
}

/// Verifies bearer tokens against the configured secret.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.required_spec_claims = if config.require_expiry {
            HashSet::from(["exp".to_string()])
        } else {
            HashSet::new()
        };

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw `Authorization` value and extract the caller identity.
    ///
    /// The value may be the bare token or carry a `Bearer` scheme in any case.
    pub fn verify(&self, raw: &str) -> Result<Identity, AuthError> {
        let token = strip_bearer(raw);

        let result = if token.is_empty() {
            Err(AuthError::EmptyToken)
        } else {
            decode::<Claims>(token, &self.key, &self.validation)
                .map(|data| {
                    let claims = data.claims;
                    Identity::new(claims.login, claims.user_id, claims.password)
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "Token decode failed");
                    AuthError::InvalidToken
                })
        };

        match &result {
            Ok(identity) => {
                tracing::debug!(login = %identity.login(), user_id = identity.numeric_id(), "Token verified");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token rejected");
                metrics::record_auth_failure(e.reason());
            }
        }

        result
    }
}

fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("bearer") {
        return "";
    }
    match raw.split_once(char::is_whitespace) {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim_start(),
        _ => raw,
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}
