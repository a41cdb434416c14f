//! Read-only view of the parts of a request the redirect needs.

use std::fmt;
use std::str::FromStr;

use axum::http::{
    header,
    uri::{Authority, Scheme},
    HeaderMap, Request, Uri,
};

/// Header set by TLS-terminating proxies in front of the server.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Scheme, host, port, path and query of an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub scheme: String,
    /// Host exactly as received, without port.
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
}

impl RequestTarget {
    /// Extract the target of `req`. Returns `None` when no host is known.
    pub fn from_request<B>(req: &Request<B>) -> Option<Self> {
        Self::from_parts(req.uri(), req.headers())
    }

    /// Extract the target from a URI, falling back to headers for the
    /// authority and scheme of origin-form requests.
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Option<Self> {
        let authority = match uri.authority() {
            Some(authority) => authority.clone(),
            None => headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| Authority::from_str(h).ok())?,
        };

        let scheme = uri
            .scheme_str()
            .map(str::to_string)
            .or_else(|| {
                headers
                    .get(X_FORWARDED_PROTO)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|h| h.split(',').next())
                    .and_then(forwarded_scheme)
            })
            .unwrap_or_else(|| "http".to_string());

        let path = match uri.path() {
            "" => "/".to_string(),
            p => p.to_string(),
        };

        Some(Self {
            scheme,
            host: authority.host().to_string(),
            port: authority.port_u16(),
            path,
            query: uri.query().map(str::to_string),
        })
    }

    /// Parse an absolute URI such as `https://example.com/a?b=c`.
    pub fn parse(uri: &str) -> Option<Self> {
        let uri: Uri = uri.parse().ok()?;
        Self::from_parts(&uri, &HeaderMap::new())
    }

    /// Same path and query under a different scheme and authority.
    pub fn with_authority(&self, scheme: &str, host: &str, port: Option<u16>) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
            path: self.path.clone(),
            query: self.query.clone(),
        }
    }
}

/// Only `http` and `https` are accepted from `X-Forwarded-Proto`.
fn forwarded_scheme(value: &str) -> Option<String> {
    let scheme = Scheme::from_str(&value.trim().to_ascii_lowercase()).ok()?;
    if scheme == Scheme::HTTP || scheme == Scheme::HTTPS {
        Some(scheme.as_str().to_string())
    } else {
        None
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}
