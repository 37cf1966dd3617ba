//! Commit execution
//!
//! Runs a [`ReconciliationPlan`] against an [`AssetStore`] in three phases:
//! 1. Deletes, all at once, gathered before anything else. Never fatal.
//! 2. Uploads, bounded fan-out, results keyed by position. Any failure stops
//!    new uploads and aborts the commit without patching.
//! 3. One patch of the full padded slot list, only after every upload landed.
//!
//! The executor never touches the media set; the caller advances its baseline
//! when `commit` returns `Ok` with `patched == true`.

use crate::cache::UploadCache;
use crate::config::AtelierConfig;
use crate::error::CommitError;
use atelier_media::Reference;
use atelier_reconcile::{PendingUpload, ReconciliationPlan};
use atelier_store::{AssetStore, Credentials, EntityRef, StoreError};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of one delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Asset removed from the store
    Deleted,
    /// Asset left orphaned
    Failed(StoreError),
}

impl DeleteOutcome {
    /// True if the asset was removed
    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Per-operation outcomes of a commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitResult {
    /// New references by slot position
    pub succeeded_uploads: BTreeMap<usize, Reference>,
    /// Upload errors by slot position
    pub failed_uploads: BTreeMap<usize, StoreError>,
    /// Delete outcomes; informational only
    pub delete_outcomes: BTreeMap<Reference, DeleteOutcome>,
    /// Persisted order after the commit, without padding
    pub references: Vec<Reference>,
    /// False when the plan was empty and nothing was sent
    pub patched: bool,
}

impl CommitResult {
    /// Deletes that left orphaned assets behind
    #[must_use]
    pub fn failed_deletes(&self) -> Vec<&Reference> {
        self.delete_outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_deleted())
            .map(|(reference, _)| reference)
            .collect()
    }
}

/// Executes reconciliation plans against an asset store
#[derive(Clone)]
pub struct CommitExecutor {
    store: Arc<dyn AssetStore>,
    cache: UploadCache,
    category: String,
    upload_concurrency: usize,
}

impl std::fmt::Debug for CommitExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitExecutor")
            .field("category", &self.category)
            .field("upload_concurrency", &self.upload_concurrency)
            .finish_non_exhaustive()
    }
}

impl CommitExecutor {
    /// Create an executor with a cache sized from `config`
    #[must_use]
    pub fn new(store: Arc<dyn AssetStore>, config: &AtelierConfig) -> Self {
        let cache = match config.upload_cache_ttl() {
            Some(ttl) => UploadCache::with_ttl(config.upload_cache_capacity, ttl),
            None => UploadCache::new(config.upload_cache_capacity),
        };
        Self {
            store,
            cache,
            category: config.upload_category.clone(),
            upload_concurrency: config.upload_concurrency.max(1),
        }
    }

    /// Replace the upload cache
    ///
    /// One cache may back several executors: entries are scoped to the
    /// entity they were uploaded for.
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: UploadCache) -> Self {
        self.cache = cache;
        self
    }

    /// Upload cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &UploadCache {
        &self.cache
    }

    /// Execute `plan` for `entity`
    ///
    /// # Errors
    /// - `CommitError::UploadsFailed` if any upload failed; no patch was sent
    /// - `CommitError::PatchFailed` if the final patch failed
    /// - `CommitError::Plan` if the plan is internally inconsistent
    pub async fn commit(
        &self,
        entity: &EntityRef,
        plan: &ReconciliationPlan,
        credentials: &Credentials,
    ) -> Result<CommitResult, CommitError> {
        if plan.is_empty() {
            tracing::debug!(entity = %entity, "media set unchanged, nothing to commit");
            return Ok(CommitResult {
                references: plan.assemble(&BTreeMap::new())?,
                ..CommitResult::default()
            });
        }

        tracing::info!(
            entity = %entity,
            deletes = plan.to_delete().len(),
            uploads = plan.to_upload().len(),
            "committing media set"
        );

        let mut result = CommitResult {
            delete_outcomes: self.run_deletes(plan, credentials).await,
            ..CommitResult::default()
        };

        self.run_uploads(entity, plan, credentials, &mut result).await;
        if !result.failed_uploads.is_empty() {
            tracing::error!(
                entity = %entity,
                failed = result.failed_uploads.len(),
                succeeded = result.succeeded_uploads.len(),
                "uploads failed, entity left unpatched"
            );
            return Err(CommitError::UploadsFailed { result });
        }

        let references = plan.assemble(&result.succeeded_uploads)?;
        let payload = plan.pad(&references)?;

        if let Err(source) = self
            .store
            .patch_entity_references(entity, &payload, credentials)
            .await
        {
            tracing::error!(
                entity = %entity,
                error = %source,
                "patching entity references failed"
            );
            return Err(CommitError::PatchFailed { source, result });
        }

        for upload in plan.to_upload() {
            self.cache
                .invalidate(entity, &upload.file, &self.category)
                .await;
        }
        result.references = references;
        result.patched = true;

        tracing::info!(
            entity = %entity,
            slots = result.references.len(),
            orphaned = result.failed_deletes().len(),
            "media set committed"
        );
        Ok(result)
    }

    async fn run_deletes(
        &self,
        plan: &ReconciliationPlan,
        credentials: &Credentials,
    ) -> BTreeMap<Reference, DeleteOutcome> {
        let deletes = plan.to_delete().iter().map(|reference| async move {
            let outcome = match self.store.delete(reference, credentials).await {
                Ok(()) => DeleteOutcome::Deleted,
                Err(error) => {
                    tracing::warn!(%reference, %error, "delete failed, asset left orphaned");
                    DeleteOutcome::Failed(error)
                }
            };
            (reference.clone(), outcome)
        });

        join_all(deletes).await.into_iter().collect()
    }

    async fn run_uploads(
        &self,
        entity: &EntityRef,
        plan: &ReconciliationPlan,
        credentials: &Credentials,
        result: &mut CommitResult,
    ) {
        let mut queue = plan.to_upload().iter();
        let mut in_flight = FuturesUnordered::new();
        let mut aborted = false;

        loop {
            while !aborted && in_flight.len() < self.upload_concurrency {
                match queue.next() {
                    Some(upload) => {
                        in_flight.push(self.upload_one(entity, upload, credentials));
                    }
                    None => break,
                }
            }

            // Uploads already started are drained so their results reach the cache
            let Some((position, outcome)) = in_flight.next().await else {
                break;
            };
            match outcome {
                Ok(reference) => {
                    result.succeeded_uploads.insert(position, reference);
                }
                Err(error) => {
                    tracing::warn!(position, %error, "upload failed, no further uploads started");
                    result.failed_uploads.insert(position, error);
                    aborted = true;
                }
            }
        }
    }

    async fn upload_one(
        &self,
        entity: &EntityRef,
        upload: &PendingUpload,
        credentials: &Credentials,
    ) -> (usize, Result<Reference, StoreError>) {
        if let Some(reference) = self.cache.get(entity, &upload.file, &self.category).await {
            tracing::debug!(
                position = upload.position,
                digest = %upload.file.digest().short(),
                %reference,
                "reusing earlier upload"
            );
            return (upload.position, Ok(reference));
        }

        let outcome = self
            .store
            .upload(&upload.file, &self.category, credentials)
            .await;
        if let Ok(reference) = &outcome {
            self.cache
                .insert(entity, &upload.file, &self.category, reference.clone())
                .await;
        }
        (upload.position, outcome)
    }
}
