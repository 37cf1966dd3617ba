//! Edit sessions
//!
//! An [`EditSession`] ties one entity's media set to the store that persists
//! it. Edits are local until [`EditSession::commit`] succeeds; a failed commit
//! leaves the session exactly as it was so the user can retry.

use crate::config::AtelierConfig;
use crate::error::CommitError;
use crate::executor::{CommitExecutor, CommitResult};
use atelier_media::{AssetHandle, LocalFile, MediaError, MediaSet, PreviewHandle, Reference};
use atelier_reconcile::{ReconciliationPlan, ReconciliationPlanner};
use atelier_store::{AssetStore, Credentials, EntityRef};
use std::sync::Arc;

/// Editing state for one entity's media
#[derive(Debug)]
pub struct EditSession {
    entity: EntityRef,
    credentials: Credentials,
    media: MediaSet,
    planner: ReconciliationPlanner,
    executor: CommitExecutor,
}

impl EditSession {
    /// Open a session on `entity`'s persisted references
    ///
    /// Empty references are unused slots and are dropped.
    ///
    /// # Errors
    /// Returns `MediaError` if the references exceed the configured capacity
    pub fn load<I, R>(
        config: &AtelierConfig,
        store: Arc<dyn AssetStore>,
        entity: EntityRef,
        credentials: Credentials,
        references: I,
    ) -> Result<Self, MediaError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Reference>,
    {
        let media = MediaSet::load(config.capacity, references)?;
        tracing::debug!(entity = %entity, slots = media.len(), "edit session opened");

        Ok(Self {
            entity,
            credentials,
            media,
            planner: ReconciliationPlanner::new(),
            executor: CommitExecutor::new(store, config),
        })
    }

    /// Replace the executor, e.g. to share its upload cache
    #[inline]
    #[must_use]
    pub fn with_executor(mut self, executor: CommitExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Stage a local file in the next free slot
    ///
    /// # Errors
    /// Returns `MediaError::CapacityExceeded` when every slot is taken
    #[inline]
    pub fn add_local(&mut self, file: LocalFile) -> Result<PreviewHandle, MediaError> {
        self.media.add_local(file)
    }

    /// Remove the item at `index`
    ///
    /// # Errors
    /// Returns `MediaError::IndexOutOfRange` for an invalid index
    #[inline]
    pub fn remove_at(&mut self, index: usize) -> Result<AssetHandle, MediaError> {
        self.media.remove_at(index)
    }

    /// Move the item at `from` to `to`
    ///
    /// # Errors
    /// Returns `MediaError::IndexOutOfRange` for an invalid index
    #[inline]
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), MediaError> {
        self.media.move_item(from, to)
    }

    /// Current items in display order
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &[AssetHandle] {
        self.media.snapshot()
    }

    #[inline]
    #[must_use]
    pub fn media(&self) -> &MediaSet {
        &self.media
    }

    #[inline]
    #[must_use]
    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    #[inline]
    #[must_use]
    pub fn executor(&self) -> &CommitExecutor {
        &self.executor
    }

    /// True when there are unsaved edits
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.media.is_dirty()
    }

    /// Plan the next commit without running it
    #[inline]
    #[must_use]
    pub fn plan(&self) -> ReconciliationPlan {
        self.planner.plan_for(&self.media)
    }

    /// Persist the current edit
    ///
    /// On success the committed order becomes the new baseline. On error the
    /// media set is untouched and the same edit can be committed again.
    ///
    /// # Errors
    /// See [`CommitExecutor::commit`]
    pub async fn commit(&mut self) -> Result<CommitResult, CommitError> {
        let plan = self.plan();
        let result = self
            .executor
            .commit(&self.entity, &plan, &self.credentials)
            .await?;

        if result.patched {
            self.media.advance_baseline(result.references.clone())?;
        }
        Ok(result)
    }
}
