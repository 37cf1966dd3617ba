//! Engine configuration
//!
//! [`AtelierConfig`] carries the slot capacity, upload behaviour and the
//! asset store endpoint. Defaults match the backend's four-image schema.

use atelier_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for media editing sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    /// Slots per entity
    pub capacity: usize,
    /// Category uploads are filed under
    pub upload_category: String,
    /// Maximum uploads in flight during one commit
    pub upload_concurrency: usize,
    /// Maximum cached upload results
    pub upload_cache_capacity: u64,
    /// Lifetime of a cached upload result, 0 for no expiry
    pub upload_cache_ttl_secs: u64,
    /// Asset store endpoint
    pub store: StoreConfig,
}

impl AtelierConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if the document does not parse or fails validation
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// With slot capacity
    #[inline]
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// With upload category
    #[inline]
    #[must_use]
    pub fn with_upload_category(mut self, category: impl Into<String>) -> Self {
        self.upload_category = category.into();
        self
    }

    /// With upload concurrency
    #[inline]
    #[must_use]
    pub fn with_upload_concurrency(mut self, concurrency: usize) -> Self {
        self.upload_concurrency = concurrency;
        self
    }

    /// With store endpoint
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Cached upload lifetime, `None` when entries never expire
    #[inline]
    #[must_use]
    pub fn upload_cache_ttl(&self) -> Option<Duration> {
        (self.upload_cache_ttl_secs > 0).then(|| Duration::from_secs(self.upload_cache_ttl_secs))
    }

    /// Check every field
    ///
    /// # Errors
    /// Returns the first invalid field as a `ConfigError`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if self.upload_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if self.upload_category.trim().is_empty() {
            return Err(ConfigError::EmptyCategory);
        }
        self.store.validate()?;
        Ok(())
    }
}

impl Default for AtelierConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            upload_category: "projects".to_string(),
            upload_concurrency: 4,
            upload_cache_capacity: 256,
            upload_cache_ttl_secs: 3600,
            store: StoreConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Capacity must be at least one slot
    #[error("capacity must be at least 1")]
    InvalidCapacity,

    /// At least one upload must be allowed in flight
    #[error("upload concurrency must be at least 1")]
    InvalidConcurrency,

    /// Uploads need a category
    #[error("upload category must not be empty")]
    EmptyCategory,

    /// TOML syntax or type error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Store section invalid
    #[error("store config: {0}")]
    Store(#[from] atelier_store::ConfigError),
}
