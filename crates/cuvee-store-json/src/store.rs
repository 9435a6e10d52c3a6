//! [`JsonFileStore`] — the JSON file implementation of [`RecordStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use cuvee_core::{
  codec::{decode_collection, encode_collection},
  record::WineRecord,
  store::RecordStore,
};
use tokio::{fs, io::AsyncWriteExt as _};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cuvée collection backed by a single JSON file.
///
/// The store does no locking. Two writers that interleave load and save will
/// race, and the later rename wins.
///
/// Cloning is cheap — the path is reference-counted.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: Arc<PathBuf>,
}

impl JsonFileStore {
  /// File name used by [`in_dir`](Self::in_dir).
  pub const FILE_NAME: &'static str = "wineData.json";

  /// A store at `path`. Nothing is touched until the first read or write.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: Arc::new(path.into()) }
  }

  /// A store at `<dir>/wineData.json`.
  pub fn in_dir(dir: impl AsRef<Path>) -> Self {
    Self::new(dir.as_ref().join(Self::FILE_NAME))
  }

  pub fn path(&self) -> &Path { &self.path }

  /// A sibling temp file, so the final rename stays on one filesystem.
  fn temp_path(&self) -> PathBuf {
    let name = self
      .path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| Self::FILE_NAME.to_owned());
    self.path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
  }

  fn write_error(&self, source: std::io::Error) -> Error {
    Error::Write { path: self.path.to_path_buf(), source }
  }

  async fn write_temp(&self, temp: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp).await?;
    file.write_all(body).await?;
    file.sync_all().await
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for JsonFileStore {
  type Error = Error;

  async fn read_all(&self) -> Result<Vec<WineRecord>> {
    let text = match fs::read_to_string(self.path.as_path()).await {
      Ok(text) => text,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::debug!(path = %self.path.display(), "no collection file yet");
        return Ok(Vec::new());
      }
      Err(source) => {
        return Err(Error::Read { path: self.path.to_path_buf(), source });
      }
    };

    let records = decode_collection(&text).map_err(|source| Error::Malformed {
      path: self.path.to_path_buf(),
      source,
    })?;

    tracing::debug!(path = %self.path.display(), count = records.len(), "loaded records");
    Ok(records)
  }

  async fn save_all(&self, records: &[WineRecord]) -> Result<()> {
    let body = encode_collection(records)?;

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)
        .await
        .map_err(|e| self.write_error(e))?;
    }

    let temp = self.temp_path();
    if let Err(e) = self.write_temp(&temp, body.as_bytes()).await {
      fs::remove_file(&temp).await.ok();
      return Err(self.write_error(e));
    }
    if let Err(e) = fs::rename(&temp, self.path.as_path()).await {
      fs::remove_file(&temp).await.ok();
      return Err(self.write_error(e));
    }

    tracing::debug!(path = %self.path.display(), count = records.len(), "saved records");
    Ok(())
  }
}
