//! Handlers for `/records` endpoints.
//!
//! | Method   | Path              | Notes |
//! |----------|-------------------|-------|
//! | `GET`    | `/records`        | `?sort=wineryName\|wineName\|harvestYear`, any other key is a field path criterion |
//! | `GET`    | `/records/:id`    | 404 if not found |
//! | `POST`   | `/records`        | Body: a draft record; 400 on unknown keys, 422 on a bad blend |
//! | `DELETE` | `/records`        | Requires `?confirm=true` |
//! | `POST`   | `/records/delete` | Body: `{"ids":[...]}` |

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cuvee_core::{
  deletion::{self, DeleteOutcome},
  field::Field,
  form::{FormState, record_tasting},
  query::{Criteria, SortKey, search_store},
  record::WineRecord,
  store::RecordStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List / search ────────────────────────────────────────────────────────────

/// `GET /records[?sort=<key>][&<field.path>=<value>...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<WineRecord>>, ApiError>
where
  S: RecordStore,
{
  let sort = match params.remove("sort") {
    Some(key) => key
      .parse::<SortKey>()
      .map_err(|_| ApiError::BadRequest(format!("unknown sort key {key:?}")))?,
    None => SortKey::default(),
  };

  let mut criteria = Criteria::new();
  for (path, value) in params {
    criteria.set(Field::parse(&path)?, value);
  }

  Ok(Json(search_store(store.as_ref(), &criteria, sort).await))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /records/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<WineRecord>, ApiError>
where
  S: RecordStore,
{
  let record = store
    .get(id)
    .await
    .ok_or_else(|| ApiError::NotFound(format!("record {id} not found")))?;
  Ok(Json(record))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /records` — body: a (possibly partial) record.
///
/// Any `id` or `recordedAt` in the body is replaced. A key that names no field
/// is a 400; a bad blend or an undecodable value is a 422.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(draft): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let mut form = FormState::from_json(draft)?;
  let record = record_tasting(store.as_ref(), &mut form).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DeleteAllParams {
  #[serde(default)]
  pub confirm: bool,
}

/// `DELETE /records?confirm=true`
pub async fn delete_all<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<DeleteAllParams>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  if !params.confirm {
    return Err(ApiError::BadRequest(
      "deleting every record requires ?confirm=true".into(),
    ));
  }
  deletion::delete_all(store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct DeleteSelectedBody {
  pub ids: HashSet<Uuid>,
}

/// `POST /records/delete` — body: `{"ids":["<uuid>", ...]}`
pub async fn delete_selected<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<DeleteSelectedBody>,
) -> Result<Json<DeleteOutcome>, ApiError>
where
  S: RecordStore,
{
  let outcome = deletion::delete_selected(store.as_ref(), &body.ids)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(outcome))
}
