//! Target domain allow-list.
//!
//! A hostname is allowed when, lower-cased, it equals an entry or ends with
//! `"." + entry`. There is no wildcard, regex or IP-range logic: an IP
//! literal only passes if an entry spells it out exactly.

use std::sync::Arc;

use crate::error::ProxyError;

/// Immutable set of permitted domain suffixes, shared across requests.
#[derive(Debug, Clone)]
pub struct DomainAllowList {
    entries: Arc<[String]>,
}

impl DomainAllowList {
    /// Build the list. Entries are normalized to lowercase.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|e| e.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns true if `hostname` is an entry or a subdomain of one.
    pub fn is_allowed(&self, hostname: &str) -> bool {
        let host = hostname.to_lowercase();
        self.entries.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Like [`is_allowed`](Self::is_allowed), but yields the rejection error.
    pub fn authorize(&self, hostname: &str) -> Result<(), ProxyError> {
        if self.is_allowed(hostname) {
            Ok(())
        } else {
            Err(ProxyError::DomainNotAllowed(hostname.to_string()))
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
