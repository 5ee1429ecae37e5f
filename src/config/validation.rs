//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, redirect cap)
//! - Check allow-list entries are bare domain suffixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// Upper bound on configurable redirect hops.
pub const MAX_REDIRECTS_LIMIT: usize = 20;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("upstream.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("upstream.max_redirects must be at most {max}, got {got}")]
    TooManyRedirects { got: usize, max: usize },

    #[error("access.allowed_domains must not be empty")]
    EmptyAllowList,

    #[error("access.allowed_domains entry '{0}' is not a bare domain suffix")]
    InvalidDomain(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("timeout_ms"));
    }
    if config.upstream.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_ms"));
    }
    if config.upstream.max_redirects > MAX_REDIRECTS_LIMIT {
        errors.push(ValidationError::TooManyRedirects {
            got: config.upstream.max_redirects,
            max: MAX_REDIRECTS_LIMIT,
        });
    }

    if config.access.allowed_domains.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }
    for domain in &config.access.allowed_domains {
        if !is_bare_suffix(domain) {
            errors.push(ValidationError::InvalidDomain(domain.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_bare_suffix(domain: &str) -> bool {
    !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("://")
        && !domain.contains('/')
        && !domain.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.upstream.timeout_ms = 0;
        config.upstream.max_redirects = 50;
        config.access.allowed_domains = vec![
            ".qq.com".into(),
            "https://kugou.com".into(),
            "kuwo .cn".into(),
            "migu.cn".into(),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::BindAddress("nowhere".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout("timeout_ms")));
        assert!(errors.contains(&ValidationError::TooManyRedirects {
            got: 50,
            max: MAX_REDIRECTS_LIMIT
        }));
        assert!(errors.contains(&ValidationError::InvalidDomain(".qq.com".into())));
    }

    #[test]
    fn test_redirect_cap_message_names_limit() {
        let mut config = ProxyConfig::default();
        config.upstream.max_redirects = MAX_REDIRECTS_LIMIT + 1;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            format!(
                "upstream.max_redirects must be at most {MAX_REDIRECTS_LIMIT}, got {}",
                MAX_REDIRECTS_LIMIT + 1
            )
        );

        config.upstream.max_redirects = MAX_REDIRECTS_LIMIT;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        let mut config = ProxyConfig::default();
        config.access.allowed_domains.clear();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::EmptyAllowList]
        );
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::MetricsAddress("bogus".into())]
        );
    }
}
