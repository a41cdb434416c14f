//! Configuration schema definitions.
//!
//! This module defines the configuration file structure for the redirect
//! server. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Deserializer, Serialize};

use crate::redirect::{RedirectStatus, TargetMode};

/// Name of the redirect section in the configuration file.
pub const REDIRECT_SECTION: &str = "redirect-to-new-domain-middleware";

/// Root configuration for the redirect server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Redirect settings. `None` when the section is absent from the file.
    #[serde(rename = "redirect-to-new-domain-middleware")]
    pub redirect: Option<RedirectSection>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Forward redirect decisions to the log at debug level.
    pub diagnostics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            diagnostics: true,
        }
    }
}

/// The redirect section. Every field is optional at parse time; completeness
/// is checked by the resolver.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct RedirectSection {
    /// Bare host to match, e.g. "example.com".
    pub old: Option<String>,

    /// Host or full URL to redirect to.
    pub new: Option<String>,

    /// Redirect status, 301 or 302. Other values fall back to 301.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<i64>,

    /// How `new` is applied to the request URI.
    pub mode: Option<TargetMode>,
}

/// Accept any TOML value for `status`. Integers and numeric strings are kept
/// for normalization; anything else is read as the default 301.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        toml::Value::Integer(code) => code,
        toml::Value::String(s) => s
            .trim()
            .parse()
            .unwrap_or_else(|_| i64::from(RedirectStatus::default().as_u16())),
        _ => i64::from(RedirectStatus::default().as_u16()),
    }))
}
