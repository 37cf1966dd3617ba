//! Reconciliation plans
//!
//! A [`ReconciliationPlan`] lists what must happen remotely to turn a media
//! set's baseline into its current state. It also knows how to assemble the
//! final reference list once upload results are in.

use atelier_media::{LocalFile, Reference};
use std::collections::{BTreeMap, BTreeSet};

/// Where the final content of one slot comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSource {
    /// Already persisted, kept as is
    Remote(Reference),

    /// Filled from the upload result for this position
    Pending {
        /// Slot index, matching [`PendingUpload::position`]
        position: usize,
    },
}

/// A staged file and the slot it must land in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    /// Slot index in the current order
    pub position: usize,
    /// File to upload
    pub file: LocalFile,
}

/// Remote operations needed to persist an edit
///
/// # Invariants
/// - `to_delete` holds baseline references absent from every current slot
/// - `to_upload` is sorted by position
/// - `final_order.len() <= capacity`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub(crate) capacity: usize,
    pub(crate) to_delete: BTreeSet<Reference>,
    pub(crate) to_upload: Vec<PendingUpload>,
    pub(crate) final_order: Vec<SlotSource>,
    pub(crate) order_changed: bool,
}

impl ReconciliationPlan {
    /// Slot count the backend expects in a patch
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// References to delete from the store
    #[inline]
    #[must_use]
    pub fn to_delete(&self) -> &BTreeSet<Reference> {
        &self.to_delete
    }

    /// Files to upload, by position
    #[inline]
    #[must_use]
    pub fn to_upload(&self) -> &[PendingUpload] {
        &self.to_upload
    }

    /// Source of every slot in the final order
    #[inline]
    #[must_use]
    pub fn final_order(&self) -> &[SlotSource] {
        &self.final_order
    }

    /// True when nothing would change remotely
    ///
    /// A pure reorder is not empty: the new order still has to be patched.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_upload.is_empty() && !self.order_changed
    }

    /// Substitute upload results into the final order
    ///
    /// # Errors
    /// Returns `PlanError::MissingUpload` if a pending position has no result
    pub fn assemble(
        &self,
        uploads: &BTreeMap<usize, Reference>,
    ) -> Result<Vec<Reference>, PlanError> {
        self.final_order
            .iter()
            .map(|slot| match slot {
                SlotSource::Remote(reference) => Ok(reference.clone()),
                SlotSource::Pending { position } => uploads
                    .get(position)
                    .cloned()
                    .ok_or(PlanError::MissingUpload {
                        position: *position,
                    }),
            })
            .collect()
    }

    /// Pad an assembled list with empty references up to `capacity`
    ///
    /// The backend stores a fixed number of slot fields and expects every one
    /// of them in a patch.
    ///
    /// # Errors
    /// Returns `PlanError::TooManySlots` if `references` exceeds capacity
    pub fn pad(&self, references: &[Reference]) -> Result<Vec<Reference>, PlanError> {
        if references.len() > self.capacity {
            return Err(PlanError::TooManySlots {
                len: references.len(),
                capacity: self.capacity,
            });
        }
        let mut padded = references.to_vec();
        padded.resize(self.capacity, Reference::new(""));
        Ok(padded)
    }
}

/// Errors raised while turning a plan into a patch payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A pending slot has no upload result
    #[error("no upload result for pending position {position}")]
    MissingUpload {
        /// Pending slot left unfilled
        position: usize,
    },

    /// More references than slots
    #[error("{len} references do not fit {capacity} slots")]
    TooManySlots {
        /// References supplied
        len: usize,
        /// Slots available
        capacity: usize,
    },
}
