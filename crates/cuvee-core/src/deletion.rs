//! Bulk and selective deletion.
//!
//! Both operations read the current collection, compute the reduced one and
//! write it back. They are not atomic with respect to other writers (see
//! [`RecordStore`]). Asking the user for confirmation is the caller's job;
//! nothing here deletes unless one of these functions is called explicitly.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::store::RecordStore;

/// What [`delete_selected`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
  /// The selection was empty; the store was not written.
  NothingSelected,
  Deleted {
    /// Records that were in the collection and matched the selection.
    removed:   usize,
    remaining: usize,
  },
}

/// Replace the collection with an empty one. Irreversible.
pub async fn delete_all<S: RecordStore>(store: &S) -> Result<(), S::Error> {
  store.save_all(&[]).await?;
  tracing::info!("deleted all records");
  Ok(())
}

/// Remove every record whose id is in `ids`.
///
/// An empty selection is reported as [`DeleteOutcome::NothingSelected`]
/// without rewriting the store. Ids that are not in the collection are
/// ignored.
pub async fn delete_selected<S: RecordStore>(
  store: &S,
  ids: &HashSet<Uuid>,
) -> Result<DeleteOutcome, S::Error> {
  if ids.is_empty() {
    tracing::debug!("delete requested with an empty selection");
    return Ok(DeleteOutcome::NothingSelected);
  }

  let mut records = store.load_all().await;
  let before = records.len();
  records.retain(|r| !ids.contains(&r.id));
  store.save_all(&records).await?;

  let outcome = DeleteOutcome::Deleted {
    removed:   before - records.len(),
    remaining: records.len(),
  };
  tracing::info!(?outcome, requested = ids.len(), "deleted selected records");
  Ok(outcome)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{memory::MemoryStore, record::WineRecord};

  fn record(wine: &str) -> WineRecord {
    WineRecord {
      id: Uuid::new_v4(),
      wine_name: wine.into(),
      ..WineRecord::default()
    }
  }

  #[tokio::test]
  async fn empty_selection_is_reported_and_not_written() {
    let records = vec![record("a"), record("b")];
    let store = MemoryStore::with_records(records.clone());

    let outcome = delete_selected(&store, &HashSet::new()).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::NothingSelected);
    assert_eq!(store.write_count(), 0);
    assert_eq!(store.load_all().await, records);
  }

  #[tokio::test]
  async fn selected_ids_are_removed_by_id_not_name() {
    // Same wine name twice: only the selected one goes.
    let a = record("Morgon");
    let b = record("Morgon");
    let c = record("Fleurie");
    let store = MemoryStore::with_records(vec![a.clone(), b.clone(), c.clone()]);

    let outcome = delete_selected(&store, &HashSet::from([a.id])).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted { removed: 1, remaining: 2 });
    assert_eq!(store.load_all().await, vec![b, c]);
  }

  #[tokio::test]
  async fn unknown_ids_are_ignored() {
    let a = record("a");
    let store = MemoryStore::with_records(vec![a.clone()]);
    let outcome = delete_selected(&store, &HashSet::from([Uuid::new_v4()]))
      .await
      .unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted { removed: 0, remaining: 1 });
    assert_eq!(store.load_all().await, vec![a]);
  }

  #[tokio::test]
  async fn delete_all_empties_the_collection() {
    let store = MemoryStore::with_records(vec![record("a"), record("b")]);
    delete_all(&store).await.unwrap();
    assert!(store.load_all().await.is_empty());
  }

  #[tokio::test]
  async fn write_failure_is_surfaced() {
    let a = record("a");
    let store = MemoryStore::with_records(vec![a.clone()]);
    store.fail_writes(true);
    assert!(delete_selected(&store, &HashSet::from([a.id])).await.is_err());
    assert!(delete_all(&store).await.is_err());
    assert_eq!(store.snapshot(), vec![a]);
  }
}
