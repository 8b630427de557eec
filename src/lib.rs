//! Social Gateway Library
//!
//! HTTP/JSON front door for the social-content platform: authenticates
//! callers and fans requests out to the posts and statistic gRPC services
//! and the users HTTP service.

pub mod auth;
pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
