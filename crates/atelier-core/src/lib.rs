//! Atelier Core - committing bounded media sets
//!
//! Turns local edits of an entity's image slots into the minimal set of
//! remote operations and runs them with partial-failure semantics.
//!
//! # Core Concepts
//!
//! - **EditSession**: one entity's media set plus the store that persists it
//! - **CommitExecutor**: deletes, then bounded uploads, then a single patch
//! - **CommitResult**: per-operation outcomes, keyed by slot position
//! - **UploadCache**: lets a retried commit skip files that already uploaded
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AtelierConfig::from_toml_str(
//!     r#"store = { base_url = "https://cms.example/api" }"#,
//! )?;
//! let store = Arc::new(HttpAssetStore::new(&config.store)?);
//!
//! let mut session = EditSession::load(
//!     &config,
//!     store,
//!     EntityRef::new("projects", "42"),
//!     Credentials::bearer("token"),
//!     ["/uploads/projects/a.jpg", "/uploads/projects/b.jpg"],
//! )?;
//! session.remove_at(0)?;
//! session.add_local(LocalFile::new("x.jpg", "image/jpeg", std::fs::read("x.jpg")?))?;
//!
//! let result = session.commit().await?;
//! println!("persisted {} slots", result.references.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod session;
pub mod telemetry;

pub use cache::UploadCache;
pub use config::{AtelierConfig, ConfigError};
pub use error::{CommitError, CommitFailure};
pub use executor::{CommitExecutor, CommitResult, DeleteOutcome};
pub use session::EditSession;
pub use telemetry::{init_tracing, LogFormat, TelemetryError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for editing and committing media sets
    pub use crate::{
        AtelierConfig, CommitError, CommitExecutor, CommitResult, EditSession, UploadCache,
    };
    pub use atelier_media::{AssetHandle, LocalFile, MediaSet, Reference};
    pub use atelier_reconcile::{ReconciliationPlan, ReconciliationPlanner};
    pub use atelier_store::{AssetStore, Credentials, EntityRef, HttpAssetStore, StoreConfig};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
