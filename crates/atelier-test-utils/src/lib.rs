//! Testing utilities for the atelier workspace
//!
//! Shared fixtures and an in-memory [`AssetStore`] whose failures and
//! latencies are scripted per file or reference.

#![allow(missing_docs)]

use async_trait::async_trait;
use atelier_media::{LocalFile, Reference};
use atelier_store::{AssetStore, Credentials, EntityRef, StoreError};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// One call received by [`ScriptedAssetStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Upload { file: String, category: String },
    Delete(Reference),
    Patch { entity: EntityRef, references: Vec<Reference> },
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<StoreCall>,
    tokens: Vec<String>,
    failing_uploads: HashSet<String>,
    failing_deletes: HashSet<Reference>,
    failing_patches: usize,
    upload_delays: HashMap<String, Duration>,
}

/// In-memory store
///
/// Uploading `name` yields reference `name'`. Calls are recorded in arrival
/// order, before any scripted delay or failure applies.
#[derive(Debug, Default)]
pub struct ScriptedAssetStore {
    script: Mutex<Script>,
}

impl ScriptedAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every upload of `name` by `delay`
    #[must_use]
    pub fn with_upload_delay(self, name: &str, delay: Duration) -> Self {
        self.script.lock().upload_delays.insert(name.to_string(), delay);
        self
    }

    /// Fail uploads of `name` until cleared
    pub fn fail_upload(&self, name: &str) {
        self.script.lock().failing_uploads.insert(name.to_string());
    }

    /// Fail deletes of `reference` until cleared
    pub fn fail_delete(&self, reference: &str) {
        self.script.lock().failing_deletes.insert(Reference::new(reference));
    }

    /// Fail the next `count` patches
    pub fn fail_next_patches(&self, count: usize) {
        self.script.lock().failing_patches = count;
    }

    pub fn clear_failures(&self) {
        let mut script = self.script.lock();
        script.failing_uploads.clear();
        script.failing_deletes.clear();
        script.failing_patches = 0;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.script.lock().calls.clone()
    }

    /// Forget recorded calls, keeping the failure script
    pub fn reset_calls(&self) {
        let mut script = self.script.lock();
        script.calls.clear();
        script.tokens.clear();
    }

    /// Names of uploaded files, in call order
    pub fn uploads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Upload { file, .. } => Some(file),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<Reference> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete(reference) => Some(reference),
                _ => None,
            })
            .collect()
    }

    /// Payload of every patch, in call order
    pub fn patches(&self) -> Vec<Vec<Reference>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Patch { references, .. } => Some(references),
                _ => None,
            })
            .collect()
    }

    /// Bearer tokens seen, one per call
    pub fn tokens(&self) -> Vec<String> {
        self.script.lock().tokens.clone()
    }

    fn record(&self, call: StoreCall, credentials: &Credentials) {
        let mut script = self.script.lock();
        script.calls.push(call);
        script.tokens.push(credentials.token().to_string());
    }
}

#[async_trait]
impl AssetStore for ScriptedAssetStore {
    async fn upload(
        &self,
        file: &LocalFile,
        category: &str,
        credentials: &Credentials,
    ) -> Result<Reference, StoreError> {
        self.record(
            StoreCall::Upload {
                file: file.name().to_string(),
                category: category.to_string(),
            },
            credentials,
        );

        let delay = self.script.lock().upload_delays.get(file.name()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.script.lock().failing_uploads.contains(file.name()) {
            return Err(StoreError::Upload {
                file: file.name().to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(Reference::new(format!("{}'", file.name())))
    }

    async fn delete(
        &self,
        reference: &Reference,
        credentials: &Credentials,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::Delete(reference.clone()), credentials);

        if self.script.lock().failing_deletes.contains(reference) {
            return Err(StoreError::Delete {
                reference: reference.clone(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    async fn patch_entity_references(
        &self,
        entity: &EntityRef,
        references: &[Reference],
        credentials: &Credentials,
    ) -> Result<(), StoreError> {
        self.record(
            StoreCall::Patch {
                entity: entity.clone(),
                references: references.to_vec(),
            },
            credentials,
        );

        let mut script = self.script.lock();
        if script.failing_patches > 0 {
            script.failing_patches -= 1;
            return Err(StoreError::Patch {
                entity: entity.clone(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Staged JPEG whose bytes are its name
pub fn local_file(name: &str) -> LocalFile {
    LocalFile::new(name, "image/jpeg", name.as_bytes().to_vec())
}

pub fn references(values: &[&str]) -> Vec<Reference> {
    values.iter().copied().map(Reference::new).collect()
}

pub fn entity() -> EntityRef {
    EntityRef::new("projects", "42")
}

pub fn credentials() -> Credentials {
    Credentials::bearer("test-token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_failures_apply_until_cleared() {
        let store = ScriptedAssetStore::new();
        store.fail_upload("x");

        assert!(store.upload(&local_file("x"), "projects", &credentials()).await.is_err());
        store.clear_failures();
        assert_eq!(
            store.upload(&local_file("x"), "projects", &credentials()).await,
            Ok(Reference::new("x'"))
        );
        assert_eq!(store.uploads(), vec!["x", "x"]);
        assert_eq!(store.tokens(), vec!["test-token", "test-token"]);
    }

    #[tokio::test]
    async fn patch_failures_are_counted() {
        let store = ScriptedAssetStore::new();
        store.fail_next_patches(1);

        assert!(store.patch_entity_references(&entity(), &[], &credentials()).await.is_err());
        assert!(store.patch_entity_references(&entity(), &[], &credentials()).await.is_ok());
        assert_eq!(store.patches().len(), 2);
    }
}
