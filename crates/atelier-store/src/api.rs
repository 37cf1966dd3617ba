//! Asset store contract
//!
//! [`AssetStore`] is the seam between the commit executor and the remote
//! backend. Every call takes explicit [`Credentials`]; there is no ambient
//! session token.

use crate::error::StoreError;
use async_trait::async_trait;
use atelier_media::{LocalFile, Reference};
use std::fmt::{self, Debug, Display, Formatter};

/// Remote surface that stores files and links them to entities
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload a file under `category`, returning its new reference
    ///
    /// # Errors
    /// Returns `StoreError::Upload` if the store rejects or loses the file
    async fn upload(
        &self,
        file: &LocalFile,
        category: &str,
        credentials: &Credentials,
    ) -> Result<Reference, StoreError>;

    /// Delete a stored asset
    ///
    /// # Errors
    /// Returns `StoreError::Delete` on failure
    async fn delete(
        &self,
        reference: &Reference,
        credentials: &Credentials,
    ) -> Result<(), StoreError>;

    /// Replace an entity's full slot list
    ///
    /// `references` has exactly one entry per slot; unfilled slots are empty.
    ///
    /// # Errors
    /// Returns `StoreError::Patch` on failure
    async fn patch_entity_references(
        &self,
        entity: &EntityRef,
        references: &[Reference],
        credentials: &Credentials,
    ) -> Result<(), StoreError>;
}

/// Addresses the entity that owns a media set, e.g. `projects/42`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    /// Backend collection, used as the patch path segment
    pub collection: String,
    /// Entity id within the collection
    pub id: String,
}

impl EntityRef {
    /// Create new entity reference
    #[inline]
    #[must_use]
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Bearer credentials for one editing session
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Credentials carrying a bearer token
    #[inline]
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Raw token, for the `Authorization` header
    #[inline]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("token", &"<redacted>").finish()
    }
}
