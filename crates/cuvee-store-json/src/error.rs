//! Error type for `cuvee-store-json`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The file exists but does not hold a JSON array of records.
  #[error("{} does not hold a valid record collection: {source}", path.display())]
  Malformed {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to encode records: {0}")]
  Encode(#[from] serde_json::Error),
}

impl Error {
  /// True for the read-side failures that `load_all` absorbs.
  pub fn is_read(&self) -> bool {
    matches!(self, Self::Read { .. } | Self::Malformed { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
