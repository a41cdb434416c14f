//! Redirect decision.
//!
//! # Responsibilities
//! - Compare the request host against the configured old domain
//! - Compute the redirect target (host substitution or absolute target)
//! - Normalize the redirect status to 301 or 302
//!
//! # Design Decisions
//! - Host comparison is exact and case-sensitive (no trailing dot handling)
//! - `decide` is total: every request either redirects or passes through
//! - Config is immutable and shared across requests without locking

use std::fmt;
use std::str::FromStr;

use axum::http::{uri::Authority, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::redirect::target::RequestTarget;

/// Status code used for redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectStatus {
    /// 301 Moved Permanently.
    #[default]
    MovedPermanently,
    /// 302 Found.
    Found,
}

impl RedirectStatus {
    /// Map a raw status code onto an allowed redirect status.
    /// Anything other than 301 or 302 falls back to 301.
    pub fn from_code(code: i64) -> Self {
        match code {
            302 => Self::Found,
            _ => Self::MovedPermanently,
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Self::MovedPermanently => StatusCode::MOVED_PERMANENTLY,
            Self::Found => StatusCode::FOUND,
        }
    }

    pub fn as_u16(self) -> u16 {
        self.status_code().as_u16()
    }
}

/// How the configured new domain is turned into a redirect target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// Replace the host of the request URI, keeping path and query.
    #[default]
    Substitute,
    /// Redirect to the configured destination as-is, dropping path and query.
    Absolute,
}

impl FromStr for TargetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substitute" => Ok(Self::Substitute),
            "absolute" => Ok(Self::Absolute),
            other => Err(format!("unknown redirect mode: {other}")),
        }
    }
}

/// Parsed form of the `new` domain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Bare `host[:port]`.
    Host(Authority),
    /// Full URL with scheme and host.
    Url(Url),
}

impl Destination {
    /// Parse a destination. Values containing `://` are full URLs,
    /// everything else must be a bare authority.
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.contains("://") {
            let url = Url::parse(value).map_err(|e| format!("invalid URL {value:?}: {e}"))?;
            if url.host_str().map_or(true, str::is_empty) {
                return Err(format!("URL {value:?} has no host"));
            }
            Ok(Self::Url(url))
        } else {
            Authority::from_str(value)
                .map(Self::Host)
                .map_err(|e| format!("invalid host {value:?}: {e}"))
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(authority) => write!(f, "{}", authority),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Resolved, immutable redirect configuration.
///
/// Built only through [`RedirectConfig::new`], so `destination` always
/// matches `new_domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectConfig {
    old_domain: String,
    new_domain: String,
    /// `None` only when `new_domain` is empty.
    destination: Option<Destination>,
    status: RedirectStatus,
    mode: TargetMode,
}

impl RedirectConfig {
    /// Build a config from already validated values.
    pub fn new(
        old_domain: impl Into<String>,
        new_domain: impl Into<String>,
        status: RedirectStatus,
        mode: TargetMode,
    ) -> Result<Self, String> {
        let old_domain = old_domain.into();
        let new_domain = new_domain.into();
        let destination = if new_domain.is_empty() {
            None
        } else {
            Some(Destination::parse(&new_domain)?)
        };

        Ok(Self {
            old_domain,
            new_domain,
            destination,
            status,
            mode,
        })
    }

    pub fn old_domain(&self) -> &str {
        &self.old_domain
    }

    pub fn new_domain(&self) -> &str {
        &self.new_domain
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn status(&self) -> RedirectStatus {
        self.status
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    /// False when either domain resolved to an empty value.
    pub fn is_active(&self) -> bool {
        self.active_destination().is_some()
    }

    fn active_destination(&self) -> Option<&Destination> {
        if self.old_domain.is_empty() {
            None
        } else {
            self.destination.as_ref()
        }
    }
}

/// Result of inspecting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Hand the request to the next handler.
    PassThrough,
    /// Answer with a redirect.
    Redirect {
        location: String,
        status: RedirectStatus,
    },
}

/// Decide whether `request` must be redirected.
pub fn decide(request: &RequestTarget, config: &RedirectConfig) -> RedirectOutcome {
    let Some(destination) = config.active_destination() else {
        return RedirectOutcome::PassThrough;
    };
    if request.host != config.old_domain {
        return RedirectOutcome::PassThrough;
    }

    RedirectOutcome::Redirect {
        location: build_location(request, destination, config.mode),
        status: config.status,
    }
}

fn build_location(request: &RequestTarget, destination: &Destination, mode: TargetMode) -> String {
    match (mode, destination) {
        (TargetMode::Substitute, Destination::Host(authority)) => {
            // An explicit port on the destination wins over the request's.
            let target = if authority.port().is_some() {
                request.with_authority(&request.scheme, authority.host(), authority.port_u16())
            } else {
                request.with_authority(&request.scheme, authority.host(), request.port)
            };
            target.to_string()
        }
        (TargetMode::Substitute, Destination::Url(url)) => {
            let host = url.host_str().unwrap_or_default();
            request.with_authority(url.scheme(), host, url.port()).to_string()
        }
        (TargetMode::Absolute, Destination::Host(authority)) => {
            format!("{}://{}/", request.scheme, authority)
        }
        (TargetMode::Absolute, Destination::Url(url)) => url.to_string(),
    }
}
