//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer)
//!     → redirect layer (301/302 for the old domain)
//!     → fallback handler (404 for everything else)
//!     → Send to client
//! ```

pub mod server;

pub use server::HttpServer;
