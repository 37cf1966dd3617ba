//! Atelier asset store
//!
//! The remote half of media reconciliation.
//!
//! # Core Concepts
//!
//! - [`AssetStore`]: Upload, delete and entity-patch contract
//! - [`Credentials`]: Bearer token passed explicitly to every call
//! - [`EntityRef`]: The entity whose slot list gets patched
//! - [`HttpAssetStore`]: reqwest implementation of the contract
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_store::{AssetStore, Credentials, EntityRef, HttpAssetStore, StoreConfig};
//!
//! let store = HttpAssetStore::new(&StoreConfig::new("https://cms.example.com/api"))?;
//! let credentials = Credentials::bearer(token);
//!
//! let reference = store.upload(&file, "projects", &credentials).await?;
//! store
//!     .patch_entity_references(&EntityRef::new("projects", "42"), &[reference], &credentials)
//!     .await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod api;
mod config;
mod error;
mod http;

pub use api::{AssetStore, Credentials, EntityRef};
pub use config::StoreConfig;
pub use error::{ConfigError, StoreError};
pub use http::HttpAssetStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
