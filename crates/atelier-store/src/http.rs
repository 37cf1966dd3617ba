//! reqwest-backed asset store
//!
//! Endpoints, relative to the configured base URL:
//! - `POST upload/{category}`: multipart, one `file` part; replies `{"reference": ...}`
//! - `DELETE assets`: JSON `{"reference": ...}`
//! - `PATCH {collection}/{id}`: JSON `{"image1": ..., "imageN": ...}`

use crate::api::{AssetStore, Credentials, EntityRef};
use crate::config::StoreConfig;
use crate::error::{ConfigError, StoreError};
use async_trait::async_trait;
use atelier_media::{LocalFile, Reference};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use url::Url;

const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(alias = "path", alias = "url")]
    reference: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    reference: &'a str,
}

/// Asset store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpAssetStore {
    client: Client,
    base_url: Url,
    slot_prefix: String,
}

impl HttpAssetStore {
    /// Build a store with its own HTTP client
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid or the client
    /// cannot be built
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Self::with_client(config, client)
    }

    /// Build a store sharing an existing HTTP client
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid
    pub fn with_client(config: &StoreConfig, client: Client) -> Result<Self, ConfigError> {
        let base_url = config.validate()?;
        Ok(Self {
            client,
            base_url,
            slot_prefix: config.slot_prefix.clone(),
        })
    }

    /// Base URL requests are resolved against
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // validate() rejected cannot-be-a-base urls
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn slot_fields(&self, references: &[Reference]) -> serde_json::Map<String, serde_json::Value> {
        references
            .iter()
            .enumerate()
            .map(|(i, reference)| {
                (
                    format!("{}{}", self.slot_prefix, i + 1),
                    serde_json::Value::String(reference.as_str().to_owned()),
                )
            })
            .collect()
    }
}

/// Turn a non-2xx response into a short reason string
async fn check_status(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if snippet.is_empty() {
        Err(format!("HTTP {status}"))
    } else {
        Err(format!("HTTP {status}: {snippet}"))
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(
        &self,
        file: &LocalFile,
        category: &str,
        credentials: &Credentials,
    ) -> Result<Reference, StoreError> {
        let fail = |reason: String| StoreError::Upload {
            file: file.name().to_string(),
            reason,
        };
        let span = tracing::debug_span!(
            "asset_store.upload",
            file = file.name(),
            category,
            bytes = file.len()
        );

        async {
            let part = Part::stream(file.bytes().clone())
                .file_name(file.name().to_string())
                .mime_str(file.content_type())
                .map_err(|e| fail(format!("invalid content type: {e}")))?;
            let form = Form::new().part("file", part);

            let response = self
                .client
                .post(self.endpoint(&["upload", category]))
                .bearer_auth(credentials.token())
                .multipart(form)
                .send()
                .await
                .map_err(|e| fail(e.to_string()))?;
            let response = check_status(response).await.map_err(fail)?;

            let body: UploadResponse = response
                .json()
                .await
                .map_err(|e| fail(format!("invalid upload response: {e}")))?;
            match body.reference {
                Some(reference) if !reference.is_empty() => {
                    tracing::debug!(%reference, "uploaded");
                    Ok(Reference::new(reference))
                }
                _ => Err(fail("upload response carried no reference".to_string())),
            }
        }
        .instrument(span)
        .await
    }

    async fn delete(
        &self,
        reference: &Reference,
        credentials: &Credentials,
    ) -> Result<(), StoreError> {
        let fail = |reason: String| StoreError::Delete {
            reference: reference.clone(),
            reason,
        };
        let span = tracing::debug_span!("asset_store.delete", %reference);

        async {
            let response = self
                .client
                .delete(self.endpoint(&["assets"]))
                .bearer_auth(credentials.token())
                .json(&DeleteRequest {
                    reference: reference.as_str(),
                })
                .send()
                .await
                .map_err(|e| fail(e.to_string()))?;
            check_status(response).await.map_err(fail)?;
            Ok::<(), StoreError>(())
        }
        .instrument(span)
        .await
    }

    async fn patch_entity_references(
        &self,
        entity: &EntityRef,
        references: &[Reference],
        credentials: &Credentials,
    ) -> Result<(), StoreError> {
        let fail = |reason: String| StoreError::Patch {
            entity: entity.clone(),
            reason,
        };
        let span = tracing::debug_span!(
            "asset_store.patch",
            entity = %entity,
            slots = references.len()
        );

        async {
            let response = self
                .client
                .patch(self.endpoint(&[entity.collection.as_str(), entity.id.as_str()]))
                .bearer_auth(credentials.token())
                .json(&self.slot_fields(references))
                .send()
                .await
                .map_err(|e| fail(e.to_string()))?;
            check_status(response).await.map_err(fail)?;
            Ok::<(), StoreError>(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base: &str) -> HttpAssetStore {
        HttpAssetStore::new(&StoreConfig::new(base)).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let store = store("http://cms.local/api/");
        assert_eq!(
            store.endpoint(&["upload", "projects"]).as_str(),
            "http://cms.local/api/upload/projects"
        );
    }

    #[test]
    fn endpoint_escapes_segments() {
        let store = store("http://cms.local");
        assert_eq!(
            store.endpoint(&["projects", "a b"]).as_str(),
            "http://cms.local/projects/a%20b"
        );
    }

    #[test]
    fn slot_fields_are_one_based() {
        let store = store("http://cms.local");
        let fields = store.slot_fields(&[Reference::new("B"), Reference::new("")]);
        assert_eq!(fields["image1"], "B");
        assert_eq!(fields["image2"], "");
        assert_eq!(fields.len(), 2);
    }
}
