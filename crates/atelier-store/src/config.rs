//! HTTP store configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Where and how to reach the asset store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// API root, e.g. `https://cms.example.com/api`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Prefix of the entity's slot fields (`image` gives `image1..imageN`)
    pub slot_prefix: String,
}

impl StoreConfig {
    /// Configuration for `base_url` with default timeout and slot prefix
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With slot field prefix
    #[inline]
    #[must_use]
    pub fn with_slot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.slot_prefix = prefix.into();
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the configuration and parse the base URL
    ///
    /// # Errors
    /// - `ConfigError::InvalidBaseUrl` if the URL does not parse or cannot carry a path
    /// - `ConfigError::EmptySlotPrefix` if `slot_prefix` is empty
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.slot_prefix.is_empty() {
            return Err(ConfigError::EmptySlotPrefix);
        }
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "not a hierarchical url".to_string(),
            });
        }
        Ok(url)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            request_timeout_secs: 30,
            slot_prefix: "image".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates() {
        let url = StoreConfig::default().validate().unwrap();
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn rejects_garbage_url() {
        let result = StoreConfig::new("not a url").validate();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn rejects_opaque_url() {
        let result = StoreConfig::new("mailto:cms@example.com").validate();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn rejects_empty_prefix() {
        let result = StoreConfig::default().with_slot_prefix("").validate();
        assert!(matches!(result, Err(ConfigError::EmptySlotPrefix)));
    }
}
