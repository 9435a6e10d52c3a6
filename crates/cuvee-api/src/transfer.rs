//! Handlers for `/export` and `/import`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::header,
  response::IntoResponse,
};
use cuvee_core::{
  store::RecordStore,
  transfer::{self, ImportMode, ImportReport},
};
use serde::Deserialize;

use crate::error::ApiError;

/// File name offered to clients that save the export.
pub const EXPORT_FILE_NAME: &str = "wine_records_export.json";

/// `GET /export` — the whole collection as a JSON attachment.
pub async fn export<S>(State(store): State<Arc<S>>) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let document = transfer::export(store.as_ref()).await?;
  Ok((
    [
      (header::CONTENT_TYPE, "application/json".to_owned()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
      ),
    ],
    document,
  ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
  #[serde(default)]
  pub mode: ImportMode,
}

/// `POST /import[?mode=replace|merge]` — body: an exported document.
pub async fn import<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ImportParams>,
  document: String,
) -> Result<Json<ImportReport>, ApiError>
where
  S: RecordStore,
{
  let report = transfer::import(store.as_ref(), &document, params.mode).await?;
  Ok(Json(report))
}
