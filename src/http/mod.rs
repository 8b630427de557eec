//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, request-id, body limit, concurrency limit)
//!     → routing table (path → endpoint)
//!     → middleware/ (logger → method guard → auth guard | reverse proxy)
//!     → handlers/ (parse, call backend, render JSON)
//!     → response.rs (error → status code + JSON message)
//! ```

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod request;
pub mod response;
pub mod server;

pub use request::{GatewayRequest, X_REQUEST_ID};
pub use response::GatewayError;
pub use server::GatewayServer;
