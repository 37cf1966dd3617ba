//! Asset store errors

use crate::api::EntityRef;
use atelier_media::Reference;

/// Failed asset store operation
///
/// Transport and status errors are flattened into `reason` so outcomes can be
/// cloned into commit reports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Upload rejected or lost
    #[error("upload of '{file}' failed: {reason}")]
    Upload { file: String, reason: String },

    /// Delete rejected or lost
    #[error("delete of '{reference}' failed: {reason}")]
    Delete { reference: Reference, reason: String },

    /// Entity patch rejected or lost
    #[error("patch of {entity} failed: {reason}")]
    Patch { entity: EntityRef, reason: String },
}

impl StoreError {
    /// Human-readable cause without the operation prefix
    #[inline]
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Upload { reason, .. }
            | Self::Delete { reason, .. }
            | Self::Patch { reason, .. } => reason,
        }
    }
}

/// Invalid store configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Base URL missing, unparsable or not hierarchical
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Slot fields need a name prefix
    #[error("slot prefix must not be empty")]
    EmptySlotPrefix,

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}
