//! Caller authentication.
//!
//! # Data Flow
//! ```text
//! Authorization header
//!     → token.rs (signature, algorithm family, expiry)
//!     → identity.rs (Identity { login, numeric_id })
//!     → request identity slot (set by the auth guard)
//! ```

pub mod identity;
pub mod token;

pub use identity::Identity;
pub use token::{AuthError, Claims, TokenVerifier};
