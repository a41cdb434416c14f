//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the server binary
//! - Provide the diagnostic logger capability used by the redirect layer
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and `RUST_LOG`
//! - Diagnostic logging is infallible by signature; implementations
//!   swallow their own failures

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log target for redirect diagnostics.
pub const REDIRECT_TARGET: &str = "domain_redirect::redirect";

/// Optional debug sink for redirect decisions.
pub trait DiagnosticLogger: Send + Sync + std::fmt::Debug {
    fn debug(&self, message: &str);
}

/// Logger used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl DiagnosticLogger for NoopLogger {
    fn debug(&self, _message: &str) {}
}

/// Forwards diagnostics to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl DiagnosticLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: REDIRECT_TARGET, "{}", message);
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `default_directive`. Returns `false` when a subscriber was already
/// installed, in which case nothing changes.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
