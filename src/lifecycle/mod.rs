//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging/metrics → Connect backends → Build table → Bind listener
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     Flag set → Stop accepting → Drain in-flight requests (bounded) → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then backends, then listener
//! - Fail fast: any startup error is fatal
//! - Drain has a deadline; requests still running after it are abandoned

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::wait_for_signal;
pub use startup::StartupError;
