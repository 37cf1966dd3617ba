//! Atelier media model
//!
//! The in-memory side of an entity's image list.
//!
//! # Core Concepts
//!
//! - [`Reference`]: Opaque path of an asset the store already holds
//! - [`LocalFile`]: A staged file, identified by its [`FileDigest`]
//! - [`AssetHandle`]: Content of one slot, remote or pending
//! - [`MediaSet`]: Ordered, capacity-bounded slots plus the persisted baseline
//!
//! # Example
//!
//! ```rust
//! use atelier_media::{LocalFile, MediaSet};
//!
//! let mut set = MediaSet::load(4, ["/uploads/a.jpg", "/uploads/b.jpg"])?;
//! set.remove_at(0)?;
//! set.add_local(LocalFile::new("c.jpg", "image/jpeg", b"...".to_vec()))?;
//!
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.pending_count(), 1);
//! # Ok::<(), atelier_media::MediaError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod asset;
mod hash;
mod media_set;

pub use asset::{AssetHandle, LocalFile, PreviewHandle, Reference};
pub use hash::FileDigest;
pub use media_set::{MediaError, MediaSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
