//! Domain redirect middleware library.

pub mod config;
pub mod http;
pub mod observability;
pub mod redirect;

pub use config::{AppConfig, ConfigError, MiddlewareConfigResolver};
pub use http::HttpServer;
pub use redirect::{RedirectConfig, RedirectLayer, RedirectOutcome};
