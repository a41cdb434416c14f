//! Configuration validation.
//!
//! # Responsibilities
//! - Check that a non-empty old domain is a bare host
//! - Check that a non-empty new domain is a host or a full URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Empty values are not checked here; completeness is the resolver's call
//! - Runs before the config is handed to the redirect layer

use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::redirect::Destination;

/// A single semantic problem with the redirect settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("old domain {0:?} must be a bare host without scheme, path, user info or port")]
    OldDomainNotBareHost(String),

    #[error("{0}")]
    InvalidNewDomain(String),
}

/// Validate the old and new domain values.
pub fn validate_domains(old: &str, new: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !old.is_empty() && !is_bare_host(old) {
        errors.push(ValidationError::OldDomainNotBareHost(old.to_string()));
    }

    if !new.is_empty() {
        if let Err(reason) = Destination::parse(new) {
            errors.push(ValidationError::InvalidNewDomain(reason));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_bare_host(value: &str) -> bool {
    if value.contains('@') {
        return false;
    }
    Authority::from_str(value)
        .map(|authority| authority.port().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_domains() {
        assert!(validate_domains("old.com", "new.org").is_ok());
        assert!(validate_domains("old.com", "https://new.org").is_ok());
        assert!(validate_domains("old.com", "new.org:8443").is_ok());
        assert!(validate_domains("", "").is_ok());
    }

    #[test]
    fn test_old_domain_must_be_bare() {
        for old in ["https://old.com", "old.com/path", "old.com:8080", "user@old.com"] {
            let errors = validate_domains(old, "new.org").unwrap_err();
            assert_eq!(errors, vec![ValidationError::OldDomainNotBareHost(old.to_string())]);
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = validate_domains("old.com/x", "https://").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
