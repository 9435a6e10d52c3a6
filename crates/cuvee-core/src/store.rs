//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `cuvee-store-json`).
//! Higher layers (`cuvee-api`, `cuvee-cli`) and the workflows in this crate
//! depend on this abstraction, not on any concrete backend.
//!
//! The collection is the unit of persistence: there is no single-record update
//! or delete at this level. Every mutation loads the whole collection,
//! transforms it in memory and saves it back.
//!
//! # Concurrency
//!
//! Stores assume a single writer. Nothing here locks: two callers that each
//! load, modify and save will race, and whichever save lands last wins. Callers
//! that issue writes from more than one task must serialise them themselves.

use std::future::Future;

use uuid::Uuid;

use crate::record::WineRecord;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Cuvée collection backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the durable collection.
  ///
  /// No stored state yet is the first-run case and yields an empty
  /// collection. An unreadable medium or malformed content is an error.
  fn read_all(
    &self,
  ) -> impl Future<Output = Result<Vec<WineRecord>, Self::Error>> + Send + '_;

  /// Replace the durable collection with `records` in one atomic step.
  ///
  /// Records are expected to carry non-nil ids. A nil id is stored as given;
  /// backends that decode through [`crate::codec::decode_collection`] read it
  /// back with a derived id, while in-memory stores return it unchanged.
  fn save_all<'a>(
    &'a self,
    records: &'a [WineRecord],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Provided ──────────────────────────────────────────────────────────────

  /// Like [`read_all`](Self::read_all), but a read failure is logged and
  /// replaced with an empty collection instead of being returned.
  fn load_all(&self) -> impl Future<Output = Vec<WineRecord>> + Send + '_ {
    async move {
      match self.read_all().await {
        Ok(records) => records,
        Err(error) => {
          tracing::warn!(%error, "could not read records; using an empty collection");
          Vec::new()
        }
      }
    }
  }

  /// Add `record` to the end of the collection and return it.
  fn append(
    &self,
    record: WineRecord,
  ) -> impl Future<Output = Result<WineRecord, Self::Error>> + Send + '_ {
    async move {
      let mut records = self.load_all().await;
      records.push(record.clone());
      self.save_all(&records).await?;
      tracing::debug!(id = %record.id, total = records.len(), "appended record");
      Ok(record)
    }
  }

  /// Look a record up by id. Returns `None` if it is not in the collection.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Option<WineRecord>> + Send + '_ {
    async move { self.load_all().await.into_iter().find(|r| r.id == id) }
  }
}
