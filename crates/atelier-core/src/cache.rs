//! Upload result cache using moka
//!
//! Remembers which staged files already reached the store, keyed by entity,
//! content digest and category, so a retried commit only uploads what is
//! missing. An entry is dropped once a commit links it to its entity. Entries
//! of one entity are never served to another, so one cache can back many
//! sessions.

use atelier_media::{FileDigest, LocalFile, Reference};
use atelier_store::EntityRef;
use moka::future::Cache;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct UploadKey {
    entity: EntityRef,
    digest: FileDigest,
    category: String,
}

impl UploadKey {
    fn new(entity: &EntityRef, file: &LocalFile, category: &str) -> Self {
        Self {
            entity: entity.clone(),
            digest: file.digest(),
            category: category.to_string(),
        }
    }
}

/// Uploaded-but-not-yet-linked references
#[derive(Debug, Clone)]
pub struct UploadCache {
    inner: Cache<UploadKey, Reference>,
}

impl UploadCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Reference an earlier upload of the same content for `entity` produced
    #[inline]
    pub async fn get(
        &self,
        entity: &EntityRef,
        file: &LocalFile,
        category: &str,
    ) -> Option<Reference> {
        self.inner.get(&UploadKey::new(entity, file, category)).await
    }

    /// Remember an upload result
    #[inline]
    pub async fn insert(
        &self,
        entity: &EntityRef,
        file: &LocalFile,
        category: &str,
        reference: Reference,
    ) {
        self.inner
            .insert(UploadKey::new(entity, file, category), reference)
            .await;
    }

    /// Forget one upload, once it is linked to `entity`
    #[inline]
    pub async fn invalidate(&self, entity: &EntityRef, file: &LocalFile, category: &str) {
        self.inner
            .invalidate(&UploadKey::new(entity, file, category))
            .await;
    }

    /// Approximate number of entries, after pending maintenance runs
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content: &[u8]) -> LocalFile {
        LocalFile::new("x.jpg", "image/jpeg", content.to_vec())
    }

    fn project(id: &str) -> EntityRef {
        EntityRef::new("projects", id)
    }

    #[tokio::test]
    async fn keyed_by_entity_content_and_category() {
        let cache = UploadCache::new(16);
        cache
            .insert(&project("1"), &file(b"x"), "projects", Reference::new("/uploads/x.jpg"))
            .await;

        let renamed = LocalFile::new("renamed.jpg", "image/jpeg", b"x".to_vec());
        assert_eq!(
            cache.get(&project("1"), &renamed, "projects").await,
            Some(Reference::new("/uploads/x.jpg"))
        );
        assert_eq!(cache.get(&project("2"), &file(b"x"), "projects").await, None);
        assert_eq!(cache.get(&project("1"), &file(b"x"), "locations").await, None);
        assert_eq!(cache.get(&project("1"), &file(b"y"), "projects").await, None);
    }

    #[tokio::test]
    async fn invalidate_drops_only_that_upload() {
        let cache = UploadCache::with_ttl(16, Duration::from_secs(60));
        cache.insert(&project("1"), &file(b"x"), "projects", Reference::new("x")).await;
        cache.insert(&project("1"), &file(b"y"), "projects", Reference::new("y")).await;
        cache.insert(&project("2"), &file(b"x"), "projects", Reference::new("x2")).await;
        assert_eq!(cache.entry_count().await, 3);

        cache.invalidate(&project("1"), &file(b"x"), "projects").await;

        assert_eq!(cache.get(&project("1"), &file(b"x"), "projects").await, None);
        assert_eq!(
            cache.get(&project("1"), &file(b"y"), "projects").await,
            Some(Reference::new("y"))
        );
        assert_eq!(
            cache.get(&project("2"), &file(b"x"), "projects").await,
            Some(Reference::new("x2"))
        );
    }
}
