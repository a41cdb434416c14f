//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup, shutdown, config resolution
//!     → tracing macros (structured fields)
//!
//! Redirect layer
//!     → DiagnosticLogger (no-op unless configured)
//!     → TracingLogger → tracing debug events
//! ```

pub mod logging;

pub use logging::{init_tracing, DiagnosticLogger, NoopLogger, TracingLogger};
