//! Error types for `cuvee-core`.

use thiserror::Error;

use crate::field::Field;

#[derive(Debug, Error)]
pub enum Error {
  /// The grape percentages of a draft add up to more than 100.
  #[error("grape varieties total {total}%, which exceeds 100%")]
  GrapeCompositionExceeds100 { total: f64 },

  /// A grape in the blend has no name or a share of zero or less.
  #[error("grape variety {index} needs a name and a percentage above zero")]
  InvalidGrapeVariety { index: usize },

  #[error("unknown field path: {0:?}")]
  UnknownField(String),

  #[error("expected PATH=VALUE, got {0:?}")]
  MalformedTerm(String),

  #[error("field {0} cannot be set from text")]
  NotSettable(Field),

  #[error("invalid value {value:?} for field {field}")]
  InvalidValue { field: Field, value: String },

  #[error("unknown photo slot: {0:?}")]
  InvalidSlot(String),

  /// A draft document whose keys are known but whose values do not decode.
  #[error("invalid draft: {0}")]
  InvalidDraft(String),

  #[error("invalid import document: {0}")]
  InvalidImport(String),

  #[error("failed to read records: {0}")]
  StorageRead(String),

  #[error("failed to write records: {0}")]
  StorageWrite(String),

  /// A backend error surfaced through one of the workflows in this crate.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a backend error; used by workflows that are generic over the store.
  pub fn store<E>(error: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(error))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
