//! Baseline vs. current diffing
//!
//! Diffs by reference value, never by position: a reordered asset stays, an
//! asset gone from every slot is deleted.

use crate::plan::{PendingUpload, ReconciliationPlan, SlotSource};
use atelier_media::{AssetHandle, MediaSet, Reference};
use std::collections::{BTreeSet, HashSet};

/// Computes reconciliation plans. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationPlanner;

impl ReconciliationPlanner {
    /// Create new planner
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Plan the remote operations that turn `baseline` into `current`
    #[must_use]
    pub fn plan(
        &self,
        baseline: &[Reference],
        current: &[AssetHandle],
        capacity: usize,
    ) -> ReconciliationPlan {
        let kept: HashSet<&str> = current
            .iter()
            .filter_map(AssetHandle::reference)
            .map(Reference::as_str)
            .collect();

        let to_delete: BTreeSet<Reference> = baseline
            .iter()
            .filter(|reference| !kept.contains(reference.as_str()))
            .cloned()
            .collect();

        let mut to_upload = Vec::new();
        let mut final_order = Vec::with_capacity(current.len());

        for (position, handle) in current.iter().enumerate() {
            match handle {
                AssetHandle::Remote { reference } => {
                    final_order.push(SlotSource::Remote(reference.clone()));
                }
                AssetHandle::PendingLocal { file, .. } => {
                    to_upload.push(PendingUpload {
                        position,
                        file: file.clone(),
                    });
                    final_order.push(SlotSource::Pending { position });
                }
            }
        }

        let order_changed = final_order.len() != baseline.len()
            || final_order
                .iter()
                .zip(baseline)
                .any(|(slot, base)| !matches!(slot, SlotSource::Remote(r) if r == base));

        tracing::debug!(
            deletes = to_delete.len(),
            uploads = to_upload.len(),
            slots = final_order.len(),
            order_changed,
            "planned media reconciliation"
        );

        ReconciliationPlan {
            capacity,
            to_delete,
            to_upload,
            final_order,
            order_changed,
        }
    }

    /// Plan for a media set's own baseline and current state
    #[inline]
    #[must_use]
    pub fn plan_for(&self, set: &MediaSet) -> ReconciliationPlan {
        self.plan(set.baseline(), set.snapshot(), set.capacity())
    }
}
