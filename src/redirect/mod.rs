//! Domain redirect subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (URI, Host, X-Forwarded-Proto)
//!     → target.rs (RequestTarget: scheme, host, port, path, query)
//!     → decision.rs (exact host match against old domain)
//!     → Return: Redirect { location, status } or PassThrough
//!
//! layer.rs wraps the decision as a tower Layer:
//!     Redirect    → 301/302 with Location, inner service untouched
//!     PassThrough → inner service called once, response returned as-is
//! ```
//!
//! # Design Decisions
//! - RedirectConfig resolved once at startup, immutable at runtime
//! - No per-request errors; the layer only forwards the inner error type
//! - Diagnostics go through an injected logger (no-op by default)

pub mod decision;
pub mod layer;
pub mod target;

pub use decision::{decide, Destination, RedirectConfig, RedirectOutcome, RedirectStatus, TargetMode};
pub use layer::{RedirectLayer, RedirectService};
pub use target::RequestTarget;
