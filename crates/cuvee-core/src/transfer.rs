//! Export and import of whole collections as JSON documents.
//!
//! The exported document has the same shape as the durable file: a JSON array
//! of records. Import checks a document before anything is written; a
//! document that fails any check leaves the store untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  codec::{decode_collection, encode_collection},
  form::check_composition,
  record::WineRecord,
  store::RecordStore,
};

/// How imported records combine with the existing collection.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImportMode {
  /// The document becomes the whole collection.
  #[default]
  Replace,
  /// Records whose id is not yet present are appended.
  Merge,
}

/// Counts reported by [`import`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
  pub mode:     ImportMode,
  /// Records written from the document.
  pub imported: usize,
  /// Records skipped because their id was already present (merge only).
  pub skipped:  usize,
  /// Size of the collection after the import.
  pub total:    usize,
}

/// The current collection as a pretty-printed JSON array.
pub async fn export<S: RecordStore>(store: &S) -> Result<String> {
  let records = store.load_all().await;
  let document = encode_collection(&records)?;
  tracing::info!(count = records.len(), "exported records");
  Ok(document)
}

/// Parse and check an import document without touching any store.
///
/// The document must be a JSON array of records and ids must be unique. Each
/// blend is held to the same rule as a commit: named grapes with shares above
/// zero, totalling at most 100%.
pub fn validate(document: &str) -> Result<Vec<WineRecord>> {
  let records =
    decode_collection(document).map_err(|e| Error::InvalidImport(e.to_string()))?;

  let mut seen = HashSet::with_capacity(records.len());
  for (index, record) in records.iter().enumerate() {
    if !seen.insert(record.id) {
      return Err(Error::InvalidImport(format!(
        "record {index} repeats id {}",
        record.id
      )));
    }
    if let Err(e) = check_composition(&record.grape_varieties) {
      return Err(Error::InvalidImport(format!("record {index}: {e}")));
    }
  }
  Ok(records)
}

/// Validate `document` and write it into `store` according to `mode`.
pub async fn import<S: RecordStore>(
  store: &S,
  document: &str,
  mode: ImportMode,
) -> Result<ImportReport> {
  let incoming = validate(document)?;

  let (collection, imported, skipped) = match mode {
    ImportMode::Replace => {
      let count = incoming.len();
      (incoming, count, 0)
    }
    ImportMode::Merge => {
      let mut collection = store.load_all().await;
      let known: HashSet<_> = collection.iter().map(|r| r.id).collect();
      let before = collection.len();
      let offered = incoming.len();
      collection.extend(incoming.into_iter().filter(|r| !known.contains(&r.id)));
      let imported = collection.len() - before;
      (collection, imported, offered - imported)
    }
  };

  store.save_all(&collection).await.map_err(Error::store)?;

  let report = ImportReport { mode, imported, skipped, total: collection.len() };
  tracing::info!(?report, "imported records");
  Ok(report)
}
