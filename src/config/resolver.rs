//! Redirect configuration resolution.
//!
//! # Responsibilities
//! - Collect partial settings from an ordered list of providers
//! - Merge left-to-right, later providers overriding earlier ones
//! - Validate once, after the merge
//! - Normalize the redirect status
//!
//! # Design Decisions
//! - The environment is an explicit map, never read ad hoc
//! - A strict provider (the configuration file) makes `old` and `new`
//!   mandatory; without one, missing values resolve to empty strings and
//!   the resulting config is inactive
//! - Merging is per field: a file section that sets only `old` still takes
//!   `new` from `NEW_DOMAIN`. The section does not replace the environment
//!   wholesale; strictness applies to the merged result
//! - Runs once at startup; every error is fatal

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::loader::ConfigError;
use crate::config::schema::{RedirectSection, REDIRECT_SECTION};
use crate::config::validation::validate_domains;
use crate::observability::logging::DiagnosticLogger;
use crate::redirect::{RedirectConfig, RedirectLayer, RedirectStatus, TargetMode};

pub const ENV_OLD_DOMAIN: &str = "OLD_DOMAIN";
pub const ENV_NEW_DOMAIN: &str = "NEW_DOMAIN";
pub const ENV_REDIRECT_STATUS: &str = "REDIRECT_STATUS";
pub const ENV_REDIRECT_MODE: &str = "REDIRECT_MODE";

/// Settings contributed by one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRedirectConfig {
    pub old: Option<String>,
    pub new: Option<String>,
    pub status: Option<i64>,
    pub mode: Option<TargetMode>,
}

impl PartialRedirectConfig {
    /// Overlay `other` on top of `self`, field by field.
    pub fn merge(self, other: PartialRedirectConfig) -> Self {
        Self {
            old: other.old.or(self.old),
            new: other.new.or(self.new),
            status: other.status.or(self.status),
            mode: other.mode.or(self.mode),
        }
    }
}

/// A source of redirect settings.
pub trait ConfigProvider: Send + Sync + std::fmt::Debug {
    /// Name used in log output.
    fn name(&self) -> &str;

    fn provide(&self) -> PartialRedirectConfig;

    /// Whether this source being present makes `old` and `new` mandatory.
    fn strict(&self) -> bool {
        false
    }
}

/// Settings read from `OLD_DOMAIN`, `NEW_DOMAIN`, `REDIRECT_STATUS` and
/// `REDIRECT_MODE`.
#[derive(Debug, Clone, Default)]
pub struct EnvProvider {
    vars: HashMap<String, String>,
}

impl EnvProvider {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Snapshot the process environment. Non-UTF-8 entries are skipped.
    pub fn from_process_env() -> Self {
        Self::new(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        )
    }
}

impl ConfigProvider for EnvProvider {
    fn name(&self) -> &str {
        "environment"
    }

    fn provide(&self) -> PartialRedirectConfig {
        PartialRedirectConfig {
            old: self.vars.get(ENV_OLD_DOMAIN).cloned(),
            new: self.vars.get(ENV_NEW_DOMAIN).cloned(),
            status: self
                .vars
                .get(ENV_REDIRECT_STATUS)
                .and_then(|s| s.trim().parse().ok()),
            mode: self
                .vars
                .get(ENV_REDIRECT_MODE)
                .and_then(|s| s.parse().ok()),
        }
    }
}

/// Settings from the configuration file section. Always strict, even
/// when the file has no redirect section at all.
#[derive(Debug, Clone, Default)]
pub struct SectionProvider {
    section: Option<RedirectSection>,
}

impl SectionProvider {
    pub fn new(section: Option<RedirectSection>) -> Self {
        Self { section }
    }
}

impl ConfigProvider for SectionProvider {
    fn name(&self) -> &str {
        REDIRECT_SECTION
    }

    fn provide(&self) -> PartialRedirectConfig {
        match &self.section {
            Some(section) => PartialRedirectConfig {
                old: section.old.clone(),
                new: section.new.clone(),
                status: section.status,
                mode: section.mode,
            },
            None => PartialRedirectConfig::default(),
        }
    }

    fn strict(&self) -> bool {
        true
    }
}

/// Resolves a [`RedirectConfig`] from ordered providers.
#[derive(Debug, Default)]
pub struct MiddlewareConfigResolver {
    providers: Vec<Box<dyn ConfigProvider>>,
    logger: Option<Arc<dyn DiagnosticLogger>>,
}

impl MiddlewareConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. Later providers override earlier ones.
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Logger handed to the redirect layer built by [`Self::into_layer`].
    pub fn with_logger(mut self, logger: Arc<dyn DiagnosticLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Merge, validate and normalize.
    pub fn resolve(&self) -> Result<RedirectConfig, ConfigError> {
        let merged = self
            .providers
            .iter()
            .fold(PartialRedirectConfig::default(), |acc, provider| {
                let partial = provider.provide();
                tracing::debug!(
                    provider = provider.name(),
                    old = ?partial.old,
                    new = ?partial.new,
                    status = ?partial.status,
                    "Collected redirect settings"
                );
                acc.merge(partial)
            });

        let strict = self.providers.iter().any(|p| p.strict());
        let old = merged.old.unwrap_or_default();
        let new = merged.new.unwrap_or_default();

        if strict && (old.is_empty() || new.is_empty()) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "configuration section {:?} is missing or incomplete",
                REDIRECT_SECTION
            )));
        }

        validate_domains(&old, &new).map_err(|errors| {
            ConfigError::InvalidConfiguration(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;

        let status = merged
            .status
            .map(RedirectStatus::from_code)
            .unwrap_or_default();
        let mode = merged.mode.unwrap_or_default();

        RedirectConfig::new(old, new, status, mode).map_err(ConfigError::InvalidConfiguration)
    }

    /// Resolve and wrap the result in a [`RedirectLayer`].
    pub fn into_layer(self) -> Result<RedirectLayer, ConfigError> {
        let config = self.resolve()?;
        let layer = RedirectLayer::new(config);
        Ok(match self.logger {
            Some(logger) => layer.with_logger(logger),
            None => layer,
        })
    }
}
