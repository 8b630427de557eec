//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     verifier + proxy + backends
//!     → gateway_endpoints() (one descriptor per path, chain fixed here)
//!     → EndpointTable::new() (duplicate paths rejected)
//!     → into_router() (axum route per path, 404 fallback)
//!
//! Per request:
//!     axum path match → Endpoint::dispatch → interceptor chain → handler
//! ```
//!
//! # Design Decisions
//! - Table built once at startup, immutable at runtime
//! - Exact path matching only
//! - Method is checked by the chain, not by axum

pub mod table;

pub use table::{gateway_endpoints, Endpoint, EndpointTable, TableError};
