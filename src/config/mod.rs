//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (collected once into a map)
//!     → resolver.rs EnvProvider (OLD_DOMAIN, NEW_DOMAIN, REDIRECT_STATUS)
//!
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → resolver.rs SectionProvider (overrides environment, strict)
//!
//! providers merged left-to-right
//!     → validation.rs (semantic checks)
//!     → RedirectConfig (validated, immutable)
//!     → shared via Arc with every request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; changes require a restart
//! - Listener and observability fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use resolver::{ConfigProvider, EnvProvider, MiddlewareConfigResolver, PartialRedirectConfig, SectionProvider};
pub use schema::{AppConfig, ListenerConfig, ObservabilityConfig, RedirectSection, REDIRECT_SECTION};
