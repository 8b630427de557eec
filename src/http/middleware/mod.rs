//! Interceptors applied around endpoint handlers.

pub mod auth_guard;
pub mod chain;
pub mod logger;
pub mod method_guard;
pub mod proxy;

pub use auth_guard::AuthGuard;
pub use chain::{Handler, Interceptor, Next};
pub use logger::Logger;
pub use method_guard::MethodGuard;
pub use proxy::ReverseProxy;
