//! HttpAssetStore against a local warp server
//!
//! Run with: cargo test --package atelier-store --test http_store

use atelier_media::{LocalFile, Reference};
use atelier_store::{
    AssetStore, Credentials, EntityRef, HttpAssetStore, StoreConfig, StoreError,
};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::mpsc;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug)]
struct Captured {
    path: String,
    authorization: String,
    content_type: String,
    body: Bytes,
}

/// Capture every request under `/api` and answer with `status` and `reply`
fn spawn_server(
    status: StatusCode,
    reply: Value,
) -> (SocketAddr, mpsc::UnboundedReceiver<Captured>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let route = warp::path("api")
        .and(warp::path::full())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::bytes())
        .map(
            move |path: warp::path::FullPath,
                  authorization: Option<String>,
                  content_type: Option<String>,
                  body: Bytes| {
                let _ = tx.send(Captured {
                    path: path.as_str().to_string(),
                    authorization: authorization.unwrap_or_default(),
                    content_type: content_type.unwrap_or_default(),
                    body,
                });
                warp::reply::with_status(warp::reply::json(&reply), status)
            },
        );

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, rx)
}

fn store_for(addr: SocketAddr) -> HttpAssetStore {
    HttpAssetStore::new(&StoreConfig::new(format!("http://{addr}/api"))).unwrap()
}

fn credentials() -> Credentials {
    Credentials::bearer("editor-token")
}

#[tokio::test]
async fn upload_sends_multipart_with_bearer_token() {
    let (addr, mut rx) = spawn_server(
        StatusCode::OK,
        json!({ "path": "/uploads/projects/x.jpg" }),
    );
    let store = store_for(addr);
    let file = LocalFile::new("x.jpg", "image/jpeg", b"jpeg-bytes".to_vec());

    let reference = store.upload(&file, "projects", &credentials()).await.unwrap();

    assert_eq!(reference, Reference::new("/uploads/projects/x.jpg"));
    let captured = rx.recv().await.unwrap();
    assert_eq!(captured.path, "/api/upload/projects");
    assert_eq!(captured.authorization, "Bearer editor-token");
    assert!(captured.content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&captured.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"x.jpg\""));
    assert!(body.contains("jpeg-bytes"));
}

#[tokio::test]
async fn upload_without_reference_fails() {
    let (addr, _rx) = spawn_server(StatusCode::OK, json!({ "reference": "" }));
    let store = store_for(addr);
    let file = LocalFile::new("x.jpg", "image/jpeg", b"x".to_vec());

    let err = store.upload(&file, "projects", &credentials()).await.unwrap_err();

    assert!(matches!(err, StoreError::Upload { ref file, .. } if file == "x.jpg"));
}

#[tokio::test]
async fn upload_server_error_carries_status() {
    let (addr, _rx) = spawn_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "disk full" }),
    );
    let store = store_for(addr);
    let file = LocalFile::new("x.jpg", "image/jpeg", b"x".to_vec());

    let err = store.upload(&file, "projects", &credentials()).await.unwrap_err();

    assert!(err.reason().contains("500"));
    assert!(err.reason().contains("disk full"));
}

#[tokio::test]
async fn delete_sends_reference_body() {
    let (addr, mut rx) = spawn_server(StatusCode::OK, json!({}));
    let store = store_for(addr);

    store
        .delete(&Reference::new("/uploads/projects/a.jpg"), &credentials())
        .await
        .unwrap();

    let captured = rx.recv().await.unwrap();
    assert_eq!(captured.path, "/api/assets");
    let body: Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(body, json!({ "reference": "/uploads/projects/a.jpg" }));
}

#[tokio::test]
async fn delete_not_found_is_delete_error() {
    let (addr, _rx) = spawn_server(StatusCode::NOT_FOUND, json!({}));
    let store = store_for(addr);

    let err = store
        .delete(&Reference::new("/gone.jpg"), &credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Delete { .. }));
}

#[tokio::test]
async fn patch_sends_every_slot_field() {
    let (addr, mut rx) = spawn_server(StatusCode::OK, json!({}));
    let store = store_for(addr);
    let references = ["B", "X'", "Y'", ""].map(Reference::new);

    store
        .patch_entity_references(
            &EntityRef::new("projects", "42"),
            &references,
            &credentials(),
        )
        .await
        .unwrap();

    let captured = rx.recv().await.unwrap();
    assert_eq!(captured.path, "/api/projects/42");
    assert_eq!(captured.authorization, "Bearer editor-token");
    let body: Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(
        body,
        json!({ "image1": "B", "image2": "X'", "image3": "Y'", "image4": "" })
    );
}

#[tokio::test]
async fn patch_rejection_is_patch_error() {
    let (addr, _rx) = spawn_server(StatusCode::FORBIDDEN, json!({ "error": "role" }));
    let store = store_for(addr);

    let err = store
        .patch_entity_references(&EntityRef::new("projects", "42"), &[], &credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Patch { ref entity, .. } if entity.id == "42"));
}
