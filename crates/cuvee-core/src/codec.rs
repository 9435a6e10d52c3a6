//! Encoding and decoding of whole collections.
//!
//! A collection is persisted as a JSON array of records. Records written by
//! older versions of the app carry no `id`; those get a UUID v5 derived from
//! their position and canonical JSON, so the same document yields the same
//! ids on every decode until the next write persists them.

use uuid::Uuid;

use crate::record::WineRecord;

/// Namespace for ids derived from legacy records.
const LEGACY_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_0c7e_4b0a_4d55_9a1e_2f6d_3b8c_71e4);

/// Parse a JSON array of records, filling in ids for legacy entries.
///
/// Any record whose id is missing or nil counts as legacy, including one saved
/// with a nil id.
pub fn decode_collection(text: &str) -> serde_json::Result<Vec<WineRecord>> {
  let mut records: Vec<WineRecord> = serde_json::from_str(text)?;
  for (position, record) in records.iter_mut().enumerate() {
    if record.id.is_nil() {
      record.id = legacy_id(position, record)?;
    }
  }
  Ok(records)
}

/// Serialise a collection as a pretty-printed JSON array.
pub fn encode_collection(records: &[WineRecord]) -> serde_json::Result<String> {
  serde_json::to_string_pretty(records)
}

fn legacy_id(position: usize, record: &WineRecord) -> serde_json::Result<Uuid> {
  let canonical = serde_json::to_string(record)?;
  Ok(Uuid::new_v5(
    &LEGACY_NAMESPACE,
    format!("{position}:{canonical}").as_bytes(),
  ))
}
