//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject route paths the router cannot bind literally
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DialerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::DialerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("path must not be empty")]
    EmptyPath,

    #[error("key must not be empty")]
    EmptyKey,

    #[error("uri {0:?} must start with '/'")]
    UriNotAbsolute(String),

    #[error("uri {0:?} must be a literal path (no '{{', '}}', ':' or '*' segments)")]
    UriNotLiteral(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    BadMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DialerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.path.trim().is_empty() {
        errors.push(ValidationError::EmptyPath);
    }
    if config.key.is_empty() {
        errors.push(ValidationError::EmptyKey);
    }

    if !config.uri.starts_with('/') {
        errors.push(ValidationError::UriNotAbsolute(config.uri.clone()));
    } else if !is_literal_path(&config.uri) {
        errors.push(ValidationError::UriNotLiteral(config.uri.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadMetricsAddress(obs.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// axum treats braces and leading ':'/'*' as capture syntax
fn is_literal_path(uri: &str) -> bool {
    !uri.contains(['{', '}'])
        && uri
            .split('/')
            .all(|segment| !segment.starts_with(':') && !segment.starts_with('*'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DialerConfig {
        DialerConfig::new("./dials.json", "smp", "/dials", 8080)
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&config()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut cfg = config();
        cfg.path = " ".into();
        cfg.key = String::new();
        cfg.uri = "dials".into();
        cfg.timeouts.request_secs = 0;

        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyPath,
                ValidationError::EmptyKey,
                ValidationError::UriNotAbsolute("dials".into()),
                ValidationError::ZeroRequestTimeout,
            ]
        );
    }

    #[test]
    fn test_rejects_capture_syntax() {
        for uri in ["/dials/{id}", "/dials/:id", "/*rest"] {
            let mut cfg = config();
            cfg.uri = uri.into();
            assert_eq!(
                validate_config(&cfg).unwrap_err(),
                vec![ValidationError::UriNotLiteral(uri.into())]
            );
        }
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut cfg = config();
        cfg.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&cfg).is_ok());

        cfg.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&cfg).unwrap_err(),
            vec![ValidationError::BadMetricsAddress("nowhere".into())]
        );
    }
}
