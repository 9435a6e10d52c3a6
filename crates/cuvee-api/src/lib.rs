//! JSON REST API for Cuvée.
//!
//! Exposes an axum [`Router`] backed by any [`cuvee_core::store::RecordStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cuvee_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod records;
pub mod transfer;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use cuvee_core::store::RecordStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Records
    .route(
      "/records",
      get(records::list::<S>)
        .post(records::create::<S>)
        .delete(records::delete_all::<S>),
    )
    .route("/records/delete", post(records::delete_selected::<S>))
    .route("/records/{id}", get(records::get_one::<S>))
    // Transfer
    .route("/export", get(transfer::export::<S>))
    .route("/import", post(transfer::import::<S>))
    .with_state(store)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use cuvee_core::{
    codec::encode_collection,
    memory::MemoryStore,
    record::{GrapeVariety, WineRecord},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt;
  use uuid::Uuid;

  use super::*;

  fn record(winery: &str, wine: &str, year: &str) -> WineRecord {
    WineRecord {
      id: Uuid::new_v4(),
      winery_name: winery.into(),
      wine_name: wine.into(),
      harvest_year: year.into(),
      ..WineRecord::default()
    }
  }

  async fn send(
    store:  &MemoryStore,
    method: &str,
    uri:    &str,
    body:   &str,
  ) -> (StatusCode, axum::http::HeaderMap, String) {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let resp = api_router(Arc::new(store.clone())).oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
  }

  fn wine_names(body: &str) -> Vec<String> {
    let records: Vec<WineRecord> = serde_json::from_str(body).unwrap();
    records.into_iter().map(|r| r.wine_name).collect()
  }

  // ── Search ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_filters_and_sorts() {
    let store = MemoryStore::with_records(vec![
      record("Domaine B", "Morgon", "2019"),
      record("Domaine A", "Fleurie", "2021"),
      record("Château C", "Margaux", "2015"),
    ]);

    let (status, _, body) = send(&store, "GET", "/records", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wine_names(&body), ["Margaux", "Fleurie", "Morgon"]);

    let (_, _, body) =
      send(&store, "GET", "/records?sort=harvestYear&wineryName=domaine", "").await;
    assert_eq!(wine_names(&body), ["Fleurie", "Morgon"]);
  }

  #[tokio::test]
  async fn list_rejects_unknown_paths_and_sort_keys() {
    let store = MemoryStore::new();
    let (status, _, body) = send(&store, "GET", "/records?vintage=2019", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("vintage"));

    let (status, _, _) = send(&store, "GET", "/records?sort=price", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn get_one_and_missing() {
    let a = record("A", "one", "2020");
    let store = MemoryStore::with_records(vec![a.clone()]);

    let (status, _, body) = send(&store, "GET", &format!("/records/{}", a.id), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<WineRecord>(&body).unwrap(), a);

    let (status, _, _) =
      send(&store, "GET", &format!("/records/{}", Uuid::new_v4()), "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_assigns_id_and_persists() {
    let store = MemoryStore::new();
    let draft = json!({
      "wineryName": "Domaine X",
      "wineColor": "white",
      "grapeVarieties": [{ "name": "Chardonnay", "percentage": 100 }]
    });

    let (status, _, body) = send(&store, "POST", "/records", &draft.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: WineRecord = serde_json::from_str(&body).unwrap();
    assert!(!created.id.is_nil());
    assert!(created.recorded_at.is_some());
    assert_eq!(store.snapshot(), vec![created]);
  }

  #[tokio::test]
  async fn create_over_100_percent_is_unprocessable() {
    let store = MemoryStore::new();
    let draft = json!({
      "grapeVarieties": [
        { "name": "Pinot", "percentage": 60 },
        { "name": "Gamay", "percentage": 50 }
      ]
    });
    let (status, _, body) = send(&store, "POST", "/records", &draft.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("110"));
    assert_eq!(store.write_count(), 0);
  }

  #[tokio::test]
  async fn create_rejects_unnamed_and_non_positive_grapes() {
    let store = MemoryStore::new();
    let draft = json!({
      "grapeVarieties": [
        { "name": "", "percentage": -40 },
        { "name": "Syrah", "percentage": 140 }
      ]
    });
    let (status, _, body) = send(&store, "POST", "/records", &draft.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("grape variety 0"), "{body}");
    assert_eq!(store.write_count(), 0);
  }

  #[tokio::test]
  async fn create_rejects_unknown_keys() {
    let store = MemoryStore::new();
    let (status, _, body) =
      send(&store, "POST", "/records", r#"{"winryName":"X"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("winryName"), "{body}");

    let nested = json!({ "tastingNotes": { "finish": "long" } }).to_string();
    let (status, _, _) = send(&store, "POST", "/records", &nested).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) =
      send(&store, "POST", "/records", r#"{"wineColor":"blue"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.write_count(), 0);
  }

  #[tokio::test]
  async fn create_surfaces_write_failures() {
    let store = MemoryStore::new();
    store.fail_writes(true);
    let (status, _, body) = send(&store, "POST", "/records", "{}").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert!(v["error"].is_string());
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_all_requires_confirmation() {
    let store = MemoryStore::with_records(vec![record("A", "one", "2020")]);

    let (status, _, _) = send(&store, "DELETE", "/records", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.snapshot().len(), 1);

    let (status, _, _) = send(&store, "DELETE", "/records?confirm=true", "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.snapshot().is_empty());
  }

  #[tokio::test]
  async fn delete_selected_reports_outcome() {
    let a = record("A", "one", "2020");
    let b = record("B", "two", "2020");
    let store = MemoryStore::with_records(vec![a.clone(), b.clone()]);

    let (_, _, body) = send(&store, "POST", "/records/delete", r#"{"ids":[]}"#).await;
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["outcome"], "nothing_selected");

    let payload = json!({ "ids": [a.id] }).to_string();
    let (status, _, body) = send(&store, "POST", "/records/delete", &payload).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v, json!({ "outcome": "deleted", "removed": 1, "remaining": 1 }));
    assert_eq!(store.snapshot(), vec![b]);
  }

  // ── Transfer ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn export_is_an_attachment() {
    let store = MemoryStore::with_records(vec![record("A", "one", "2020")]);
    let (status, headers, body) = send(&store, "GET", "/export", "").await;
    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("wine_records_export.json"));
    assert_eq!(wine_names(&body), ["one"]);
  }

  #[tokio::test]
  async fn import_merge_and_invalid_documents() {
    let existing = record("A", "one", "2020");
    let store = MemoryStore::with_records(vec![existing.clone()]);
    let document =
      encode_collection(&[existing, record("B", "two", "2021")]).unwrap();

    let (status, _, body) = send(&store, "POST", "/import?mode=merge", &document).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["imported"], 1);
    assert_eq!(v["skipped"], 1);
    assert_eq!(store.snapshot().len(), 2);

    let mut heavy = record("C", "three", "2022");
    heavy.grape_varieties = vec![GrapeVariety::new("Syrah", 120.0)];
    let bad = encode_collection(&[heavy]).unwrap();
    let (status, _, _) = send(&store, "POST", "/import", &bad).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.snapshot().len(), 2);
  }
}
