//! [`MemoryStore`] — a [`RecordStore`] that keeps the collection in memory.
//!
//! Used by tests across the workspace and handy for embedding. Reads and
//! writes can be made to fail on demand to exercise error paths.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Error, Result, record::WineRecord, store::RecordStore};

#[derive(Debug, Default)]
struct Inner {
  records:     Vec<WineRecord>,
  fail_reads:  bool,
  fail_writes: bool,
  writes:      usize,
}

/// An in-memory collection.
///
/// Cloning is cheap — clones share the same collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store that already holds `records`. Seeding does not count as a write.
  pub fn with_records(records: Vec<WineRecord>) -> Self {
    let store = Self::default();
    store.lock().records = records;
    store
  }

  /// Make every subsequent read fail (or succeed again).
  pub fn fail_reads(&self, fail: bool) { self.lock().fail_reads = fail; }

  /// Make every subsequent write fail (or succeed again).
  pub fn fail_writes(&self, fail: bool) { self.lock().fail_writes = fail; }

  /// Number of successful `save_all` calls so far.
  pub fn write_count(&self) -> usize { self.lock().writes }

  /// The current collection, bypassing any injected read failure.
  pub fn snapshot(&self) -> Vec<WineRecord> { self.lock().records.clone() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl RecordStore for MemoryStore {
  type Error = Error;

  async fn read_all(&self) -> Result<Vec<WineRecord>> {
    let inner = self.lock();
    if inner.fail_reads {
      return Err(Error::StorageRead("memory store is unreadable".into()));
    }
    Ok(inner.records.clone())
  }

  async fn save_all(&self, records: &[WineRecord]) -> Result<()> {
    let mut inner = self.lock();
    if inner.fail_writes {
      return Err(Error::StorageWrite("memory store is read-only".into()));
    }
    inner.records = records.to_vec();
    inner.writes += 1;
    Ok(())
  }
}
