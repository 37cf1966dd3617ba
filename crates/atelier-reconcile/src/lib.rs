//! Atelier reconciliation planning
//!
//! Pure diffing between what an entity has persisted and what the editor wants.
//!
//! # Core Concepts
//!
//! - [`ReconciliationPlanner`]: Diffs baseline vs. current by reference value
//! - [`ReconciliationPlan`]: Deletes, uploads and the final slot order
//! - [`SlotSource`]: Whether a final slot keeps a reference or awaits an upload
//!
//! # Example
//!
//! ```rust
//! use atelier_media::{LocalFile, MediaSet};
//! use atelier_reconcile::ReconciliationPlanner;
//!
//! let mut set = MediaSet::load(4, ["A", "B"])?;
//! set.remove_at(0)?;
//! set.add_local(LocalFile::new("x.jpg", "image/jpeg", b"x".to_vec()))?;
//!
//! let plan = ReconciliationPlanner::new().plan_for(&set);
//! assert_eq!(plan.to_delete().len(), 1);
//! assert_eq!(plan.to_upload()[0].position, 1);
//! # Ok::<(), atelier_media::MediaError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod plan;
mod planner;

pub use plan::{PendingUpload, PlanError, ReconciliationPlan, SlotSource};
pub use planner::ReconciliationPlanner;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
