//! Form state — composing a record before it is committed to a store.
//!
//! A [`FormState`] is an owned value held by whoever drives the form (a CLI
//! command, an API handler, a UI screen). It accumulates edits to one draft
//! record plus a staging grape variety, and checks the grape composition
//! before handing the draft over.
//!
//! After a successful commit only the identifying fields, the grape list and
//! the photos are cleared. Everything else — country, region, tasting notes,
//! classifications — carries over into the next draft, so a series of wines
//! from one tasting can be entered without retyping the shared details.

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Error, Result,
  field::{Field, PhotoSlot, check_draft_keys},
  record::{GrapeVariety, Photos, WineRecord},
  store::RecordStore,
};

/// The upper bound on a blend's total grape percentage.
pub const MAX_GRAPE_TOTAL: f64 = 100.0;

/// Check a blend before it is persisted: every grape must be valid (see
/// [`GrapeVariety::is_valid`]) and the shares must not exceed
/// [`MAX_GRAPE_TOTAL`].
pub fn check_composition(grapes: &[GrapeVariety]) -> Result<()> {
  if let Some(index) = grapes.iter().position(|g| !g.is_valid()) {
    return Err(Error::InvalidGrapeVariety { index });
  }
  let total: f64 = grapes.iter().map(|g| g.percentage).sum();
  if total > MAX_GRAPE_TOTAL {
    return Err(Error::GrapeCompositionExceeds100 { total });
  }
  Ok(())
}

/// An in-progress record and its staging grape variety.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
  draft:   WineRecord,
  staging: GrapeVariety,
}

impl FormState {
  /// A blank form.
  pub fn new() -> Self { Self::default() }

  /// A form pre-filled with `draft`. Its `id` and `recorded_at` are ignored;
  /// both are assigned on commit.
  pub fn from_draft(draft: WineRecord) -> Self {
    Self { draft, staging: GrapeVariety::default() }
  }

  /// A form pre-filled from a JSON draft.
  ///
  /// Unlike the durable file, a draft must not carry keys that name no
  /// field: the first one fails with [`Error::UnknownField`]. Values that do
  /// not decode fail with [`Error::InvalidDraft`].
  pub fn from_json(draft: serde_json::Value) -> Result<Self> {
    check_draft_keys(&draft)?;
    let draft =
      serde_json::from_value(draft).map_err(|e| Error::InvalidDraft(e.to_string()))?;
    Ok(Self::from_draft(draft))
  }

  pub fn draft(&self) -> &WineRecord { &self.draft }

  pub fn staging(&self) -> &GrapeVariety { &self.staging }

  // ── Field edits ───────────────────────────────────────────────────────────

  /// Replace the value at `field`. The draft is unchanged on error.
  pub fn set_field(&mut self, field: Field, value: &str) -> Result<&WineRecord> {
    self.draft.set_field(field, value)?;
    Ok(&self.draft)
  }

  /// Like [`set_field`](Self::set_field), parsing a dotted path first.
  pub fn set_field_path(&mut self, path: &str, value: &str) -> Result<&WineRecord> {
    let field = Field::parse(path)?;
    self.set_field(field, value)
  }

  // ── Grapes ────────────────────────────────────────────────────────────────

  pub fn set_staging_name(&mut self, name: impl Into<String>) -> &GrapeVariety {
    self.staging.name = name.into();
    &self.staging
  }

  pub fn set_staging_percentage(&mut self, percentage: f64) -> &GrapeVariety {
    self.staging.percentage = percentage;
    &self.staging
  }

  /// Move the staging variety onto the grape list.
  ///
  /// Does nothing and returns `false` unless the staging value has a name and
  /// a positive percentage. On success the staging value is cleared.
  pub fn add_grape_variety(&mut self) -> bool {
    if !self.staging.is_valid() {
      return false;
    }
    let grape = std::mem::take(&mut self.staging);
    self.draft.grape_varieties.push(grape);
    true
  }

  pub fn remove_grape_variety(&mut self, index: usize) -> Option<GrapeVariety> {
    (index < self.draft.grape_varieties.len())
      .then(|| self.draft.grape_varieties.remove(index))
  }

  pub fn grape_total(&self) -> f64 { self.draft.grape_total() }

  // ── Photos ────────────────────────────────────────────────────────────────

  /// Put `reference` in `slot`, or clear the slot with `None`.
  pub fn set_photo(&mut self, slot: PhotoSlot, reference: Option<String>) -> &Photos {
    *slot.slot_mut(&mut self.draft.photos) = reference;
    &self.draft.photos
  }

  /// Like [`set_photo`](Self::set_photo), parsing the slot name first.
  pub fn set_photo_slot(
    &mut self,
    slot: &str,
    reference: Option<String>,
  ) -> Result<&Photos> {
    let slot = PhotoSlot::parse(slot)?;
    Ok(self.set_photo(slot, reference))
  }

  // ── Commit ────────────────────────────────────────────────────────────────

  /// Check the draft and produce the record to persist, with a fresh `id`
  /// and timestamp. The form itself is not touched.
  ///
  /// Grapes that reached the draft without going through
  /// [`add_grape_variety`](Self::add_grape_variety) are held to the same rule.
  pub fn finalize(&self) -> Result<WineRecord> {
    check_composition(&self.draft.grape_varieties)?;
    Ok(WineRecord {
      id: Uuid::new_v4(),
      recorded_at: Some(Utc::now()),
      ..self.draft.clone()
    })
  }

  /// Clear the names, the grape list and the photos; keep everything else.
  pub fn clear_for_next(&mut self) -> &WineRecord {
    self.draft.winery_name.clear();
    self.draft.wine_name.clear();
    self.draft.grape_varieties.clear();
    self.draft.photos = Photos::default();
    &self.draft
  }

  /// [`finalize`](Self::finalize), then [`clear_for_next`](Self::clear_for_next).
  ///
  /// On a composition error the form is left exactly as it was.
  pub fn commit(&mut self) -> Result<WineRecord> {
    let record = self.finalize()?;
    self.clear_for_next();
    Ok(record)
  }
}

/// Commit `form` into `store`.
///
/// The form is only cleared once the record has been written, so a failed
/// write leaves every field in place for a retry.
pub async fn record_tasting<S: RecordStore>(
  store: &S,
  form: &mut FormState,
) -> Result<WineRecord> {
  let record = form.finalize()?;
  let saved = store.append(record).await.map_err(Error::store)?;
  form.clear_for_next();
  tracing::info!(id = %saved.id, title = %saved.title(), "recorded tasting");
  Ok(saved)
}
