//! Commit errors
//!
//! A failed commit is one of two recoverable cases, each with its own retry
//! strategy:
//! - Some uploads failed: re-upload the failed files only
//! - Every upload succeeded but linking them to the entity failed: re-patch only
//!
//! In both cases the edit session keeps its current state verbatim.

use crate::executor::CommitResult;
use atelier_media::MediaError;
use atelier_reconcile::PlanError;
use atelier_store::StoreError;

/// Coarse failure category, for choosing a retry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitFailure {
    /// At least one upload failed
    Uploads,
    /// The entity patch failed
    Patch,
    /// Inconsistent plan or local state
    Internal,
}

/// Aborted commit
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// At least one upload failed; the entity was not patched
    #[error("commit aborted: {} upload(s) failed", .result.failed_uploads.len())]
    UploadsFailed {
        /// Partial outcomes, including uploads that did succeed
        result: CommitResult,
    },

    /// Every upload succeeded but the entity patch failed
    #[error("commit aborted: linking uploaded assets failed: {source}")]
    PatchFailed {
        /// Store error from the patch
        source: StoreError,
        /// Outcomes of the delete and upload phases
        result: CommitResult,
    },

    /// Plan could not be assembled into a patch payload
    #[error("commit aborted: {0}")]
    Plan(#[from] PlanError),

    /// Media set rejected the committed references
    #[error("commit aborted: {0}")]
    Media(#[from] MediaError),
}

impl CommitError {
    /// Failure category
    #[inline]
    #[must_use]
    pub fn kind(&self) -> CommitFailure {
        match self {
            Self::UploadsFailed { .. } => CommitFailure::Uploads,
            Self::PatchFailed { .. } => CommitFailure::Patch,
            Self::Plan(_) | Self::Media(_) => CommitFailure::Internal,
        }
    }

    /// Partial outcomes, when the commit got far enough to have any
    #[inline]
    #[must_use]
    pub fn result(&self) -> Option<&CommitResult> {
        match self {
            Self::UploadsFailed { result } | Self::PatchFailed { result, .. } => Some(result),
            Self::Plan(_) | Self::Media(_) => None,
        }
    }

    /// Check if retrying the same edit can succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UploadsFailed { .. } | Self::PatchFailed { .. })
    }
}
