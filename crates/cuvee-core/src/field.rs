//! Field paths — the closed set of addressable locations in a [`WineRecord`].
//!
//! Search criteria and form edits name fields by their dotted camelCase path
//! (`wineryName`, `tastingNotes.colorNotes`, `photos.bottlePhoto`, …). Paths
//! are parsed once into a [`Field`]; every read and write then goes through
//! the typed accessors below instead of walking the JSON shape at runtime.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

use crate::{
  Error, Result,
  record::{Photos, WineRecord},
};

// ─── Field ───────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum Field {
  #[strum(serialize = "wineryName")]
  WineryName,
  #[strum(serialize = "wineName")]
  WineName,
  #[strum(serialize = "harvestYear")]
  HarvestYear,
  #[strum(serialize = "bottlingYear")]
  BottlingYear,
  /// Read-only; matches against the variety names.
  #[strum(serialize = "grapeVarieties")]
  GrapeVarieties,
  #[strum(serialize = "winemaker")]
  Winemaker,
  #[strum(serialize = "owner")]
  Owner,
  #[strum(serialize = "country")]
  Country,
  #[strum(serialize = "region")]
  Region,
  #[strum(serialize = "sugarContent")]
  SugarContent,
  #[strum(serialize = "alcoholContent")]
  AlcoholContent,
  #[strum(serialize = "wineType")]
  WineType,
  #[strum(serialize = "wineCategory")]
  WineCategory,
  #[strum(serialize = "wineColor")]
  WineColor,
  #[strum(serialize = "price")]
  Price,

  // ── tastingNotes ──────────────────────────────────────────────────────────
  #[strum(serialize = "tastingNotes.colorNotes")]
  ColorNotes,
  #[strum(serialize = "tastingNotes.density")]
  Density,
  #[strum(serialize = "tastingNotes.firstNose")]
  FirstNose,
  #[strum(serialize = "tastingNotes.aromaAfterAeration")]
  AromaAfterAeration,
  #[strum(serialize = "tastingNotes.taste")]
  Taste,
  #[strum(serialize = "tastingNotes.tannins")]
  Tannins,
  #[strum(serialize = "tastingNotes.acidity")]
  Acidity,
  #[strum(serialize = "tastingNotes.sweetness")]
  Sweetness,
  #[strum(serialize = "tastingNotes.balance")]
  Balance,
  #[strum(serialize = "tastingNotes.associations")]
  Associations,
  #[strum(serialize = "tastingNotes.consumptionDate")]
  ConsumptionDate,

  // ── personalVerdict ───────────────────────────────────────────────────────
  #[strum(serialize = "personalVerdict.verdict")]
  Verdict,
  #[strum(serialize = "personalVerdict.take")]
  Take,
  #[strum(serialize = "personalVerdict.other")]
  VerdictOther,

  // ── photos (read-only here; see `PhotoSlot`) ──────────────────────────────
  #[strum(serialize = "photos.bottlePhoto")]
  BottlePhoto,
  #[strum(serialize = "photos.labelPhoto")]
  LabelPhoto,
  #[strum(serialize = "photos.backLabelPhoto")]
  BackLabelPhoto,
  #[strum(serialize = "photos.plaquePhoto")]
  PlaquePhoto,
}

impl Field {
  /// The dotted path string, e.g. `"tastingNotes.colorNotes"`.
  pub fn path(self) -> &'static str { self.into() }

  /// Parse a dotted path, mapping failure to [`Error::UnknownField`].
  pub fn parse(path: &str) -> Result<Self> {
    path
      .trim()
      .parse()
      .map_err(|_| Error::UnknownField(path.to_owned()))
  }

  /// Whether [`WineRecord::set_field`] accepts this field.
  pub fn is_settable(self) -> bool {
    !matches!(self, Self::GrapeVarieties) && PhotoSlot::try_from(self).is_err()
  }
}

// ─── PhotoSlot ───────────────────────────────────────────────────────────────

/// One of the four fixed photo positions on a record.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PhotoSlot {
  #[serde(rename = "bottlePhoto", alias = "bottle")]
  #[strum(to_string = "bottlePhoto", serialize = "bottle")]
  Bottle,
  #[serde(rename = "labelPhoto", alias = "label")]
  #[strum(to_string = "labelPhoto", serialize = "label")]
  Label,
  #[serde(rename = "backLabelPhoto", alias = "back-label", alias = "backLabel")]
  #[strum(to_string = "backLabelPhoto", serialize = "back-label", serialize = "backLabel")]
  BackLabel,
  #[serde(rename = "plaquePhoto", alias = "plaque")]
  #[strum(to_string = "plaquePhoto", serialize = "plaque")]
  Plaque,
}

impl PhotoSlot {
  /// Parse a slot name, mapping failure to [`Error::InvalidSlot`].
  pub fn parse(name: &str) -> Result<Self> {
    name
      .trim()
      .parse()
      .map_err(|_| Error::InvalidSlot(name.to_owned()))
  }

  pub fn get(self, photos: &Photos) -> Option<&str> {
    match self {
      Self::Bottle => photos.bottle_photo.as_deref(),
      Self::Label => photos.label_photo.as_deref(),
      Self::BackLabel => photos.back_label_photo.as_deref(),
      Self::Plaque => photos.plaque_photo.as_deref(),
    }
  }

  pub fn slot_mut(self, photos: &mut Photos) -> &mut Option<String> {
    match self {
      Self::Bottle => &mut photos.bottle_photo,
      Self::Label => &mut photos.label_photo,
      Self::BackLabel => &mut photos.back_label_photo,
      Self::Plaque => &mut photos.plaque_photo,
    }
  }
}

impl From<PhotoSlot> for Field {
  fn from(slot: PhotoSlot) -> Self {
    match slot {
      PhotoSlot::Bottle => Self::BottlePhoto,
      PhotoSlot::Label => Self::LabelPhoto,
      PhotoSlot::BackLabel => Self::BackLabelPhoto,
      PhotoSlot::Plaque => Self::PlaquePhoto,
    }
  }
}

impl TryFrom<Field> for PhotoSlot {
  type Error = Field;

  fn try_from(field: Field) -> std::result::Result<Self, Field> {
    match field {
      Field::BottlePhoto => Ok(Self::Bottle),
      Field::LabelPhoto => Ok(Self::Label),
      Field::BackLabelPhoto => Ok(Self::BackLabel),
      Field::PlaquePhoto => Ok(Self::Plaque),
      other => Err(other),
    }
  }
}

// ─── Accessors ───────────────────────────────────────────────────────────────

impl WineRecord {
  /// The text of `field` as the query engine sees it.
  ///
  /// Returns `None` only for an empty photo slot. Classifications render as
  /// their serialised names, `take` as `true`/`false`, and the grape list as
  /// its variety names joined with `", "`.
  pub fn field_text(&self, field: Field) -> Option<Cow<'_, str>> {
    let text: &str = match field {
      Field::WineryName => &self.winery_name,
      Field::WineName => &self.wine_name,
      Field::HarvestYear => &self.harvest_year,
      Field::BottlingYear => &self.bottling_year,
      Field::GrapeVarieties => {
        let names: Vec<&str> =
          self.grape_varieties.iter().map(|g| g.name.as_str()).collect();
        return Some(Cow::Owned(names.join(", ")));
      }
      Field::Winemaker => &self.winemaker,
      Field::Owner => &self.owner,
      Field::Country => &self.country,
      Field::Region => &self.region,
      Field::SugarContent => &self.sugar_content,
      Field::AlcoholContent => &self.alcohol_content,
      Field::WineType => self.wine_type.into(),
      Field::WineCategory => self.wine_category.into(),
      Field::WineColor => self.wine_color.into(),
      Field::Price => &self.price,
      Field::ColorNotes => &self.tasting_notes.color_notes,
      Field::Density => &self.tasting_notes.density,
      Field::FirstNose => &self.tasting_notes.first_nose,
      Field::AromaAfterAeration => &self.tasting_notes.aroma_after_aeration,
      Field::Taste => &self.tasting_notes.taste,
      Field::Tannins => &self.tasting_notes.tannins,
      Field::Acidity => &self.tasting_notes.acidity,
      Field::Sweetness => &self.tasting_notes.sweetness,
      Field::Balance => &self.tasting_notes.balance,
      Field::Associations => &self.tasting_notes.associations,
      Field::ConsumptionDate => &self.tasting_notes.consumption_date,
      Field::Verdict => self.personal_verdict.verdict.into(),
      Field::Take => {
        return Some(Cow::Owned(self.personal_verdict.take.to_string()));
      }
      Field::VerdictOther => &self.personal_verdict.other,
      Field::BottlePhoto
      | Field::LabelPhoto
      | Field::BackLabelPhoto
      | Field::PlaquePhoto => {
        return PhotoSlot::try_from(field)
          .ok()
          .and_then(|slot| slot.get(&self.photos))
          .map(Cow::Borrowed);
      }
    };
    Some(Cow::Borrowed(text))
  }

  /// Replace the value at `field` with `value`, parsed for typed leaves.
  ///
  /// On error the record is left exactly as it was.
  pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
    let slot: &mut String = match field {
      Field::WineryName => &mut self.winery_name,
      Field::WineName => &mut self.wine_name,
      Field::HarvestYear => &mut self.harvest_year,
      Field::BottlingYear => &mut self.bottling_year,
      Field::Winemaker => &mut self.winemaker,
      Field::Owner => &mut self.owner,
      Field::Country => &mut self.country,
      Field::Region => &mut self.region,
      Field::SugarContent => &mut self.sugar_content,
      Field::AlcoholContent => &mut self.alcohol_content,
      Field::Price => &mut self.price,
      Field::ColorNotes => &mut self.tasting_notes.color_notes,
      Field::Density => &mut self.tasting_notes.density,
      Field::FirstNose => &mut self.tasting_notes.first_nose,
      Field::AromaAfterAeration => &mut self.tasting_notes.aroma_after_aeration,
      Field::Taste => &mut self.tasting_notes.taste,
      Field::Tannins => &mut self.tasting_notes.tannins,
      Field::Acidity => &mut self.tasting_notes.acidity,
      Field::Sweetness => &mut self.tasting_notes.sweetness,
      Field::Balance => &mut self.tasting_notes.balance,
      Field::Associations => &mut self.tasting_notes.associations,
      Field::ConsumptionDate => &mut self.tasting_notes.consumption_date,
      Field::VerdictOther => &mut self.personal_verdict.other,
      Field::WineType => {
        self.wine_type = parse_value(field, value)?;
        return Ok(());
      }
      Field::WineCategory => {
        self.wine_category = parse_value(field, value)?;
        return Ok(());
      }
      Field::WineColor => {
        self.wine_color = parse_value(field, value)?;
        return Ok(());
      }
      Field::Verdict => {
        self.personal_verdict.verdict = parse_value(field, value)?;
        return Ok(());
      }
      Field::Take => {
        self.personal_verdict.take = parse_flag(field, value)?;
        return Ok(());
      }
      Field::GrapeVarieties
      | Field::BottlePhoto
      | Field::LabelPhoto
      | Field::BackLabelPhoto
      | Field::PlaquePhoto => return Err(Error::NotSettable(field)),
    };
    *slot = value.to_owned();
    Ok(())
  }
}

// ─── Draft documents ─────────────────────────────────────────────────────────

/// Keys a draft may carry that are not field paths.
const RECORD_KEYS: [&str; 2] = ["id", "recordedAt"];

const GRAPE_KEYS: [&str; 2] = ["name", "percentage"];

/// Check that every key of a JSON draft names a known location.
///
/// Nested objects (`tastingNotes`, `personalVerdict`, `photos`) are checked
/// key by key against their dotted paths, and each grape against
/// `name`/`percentage`. The first unknown key is returned as
/// [`Error::UnknownField`] with its full path. Values are not inspected.
pub fn check_draft_keys(draft: &serde_json::Value) -> Result<()> {
  let Some(object) = draft.as_object() else { return Ok(()) };

  for (key, value) in object {
    if RECORD_KEYS.contains(&key.as_str()) {
      continue;
    }
    if let Ok(field) = key.parse::<Field>() {
      if field == Field::GrapeVarieties
        && let Some(grapes) = value.as_array()
      {
        for grape in grapes.iter().filter_map(|g| g.as_object()) {
          if let Some(unknown) = grape.keys().find(|k| !GRAPE_KEYS.contains(&k.as_str())) {
            return Err(Error::UnknownField(format!("{key}.{unknown}")));
          }
        }
      }
      continue;
    }

    let prefix = format!("{key}.");
    if !Field::iter().any(|f| f.path().starts_with(&prefix)) {
      return Err(Error::UnknownField(key.clone()));
    }
    if let Some(nested) = value.as_object() {
      for sub in nested.keys() {
        let path = format!("{prefix}{sub}");
        if path.parse::<Field>().is_err() {
          return Err(Error::UnknownField(path));
        }
      }
    }
  }
  Ok(())
}

fn parse_value<T: std::str::FromStr>(field: Field, value: &str) -> Result<T> {
  value.trim().parse().map_err(|_| Error::InvalidValue {
    field,
    value: value.to_owned(),
  })
}

fn parse_flag(field: Field, value: &str) -> Result<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "true" | "yes" | "y" | "1" => Ok(true),
    "false" | "no" | "n" | "0" | "" => Ok(false),
    _ => Err(Error::InvalidValue { field, value: value.to_owned() }),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use strum::IntoEnumIterator as _;

  use super::*;
  use crate::record::{GrapeVariety, WineColor};

  #[test]
  fn every_path_round_trips_through_parse() {
    for field in Field::iter() {
      assert_eq!(Field::parse(field.path()).unwrap(), field);
    }
  }

  #[test]
  fn unknown_path_is_rejected() {
    assert!(matches!(
      Field::parse("tastingNotes.bouquet"),
      Err(Error::UnknownField(p)) if p == "tastingNotes.bouquet"
    ));
  }

  #[test]
  fn set_then_read_nested_text() {
    let mut record = WineRecord::default();
    record.set_field(Field::ColorNotes, "deep ruby").unwrap();
    assert_eq!(record.tasting_notes.color_notes, "deep ruby");
    assert_eq!(record.field_text(Field::ColorNotes).as_deref(), Some("deep ruby"));
  }

  #[test]
  fn typed_leaves_are_parsed() {
    let mut record = WineRecord::default();
    record.set_field(Field::WineColor, "glou-glou").unwrap();
    record.set_field(Field::Take, "yes").unwrap();
    record.set_field(Field::Verdict, "not-mine").unwrap();

    assert_eq!(record.wine_color, WineColor::GlouGlou);
    assert!(record.personal_verdict.take);
    assert_eq!(record.field_text(Field::Verdict).as_deref(), Some("not-mine"));
    assert_eq!(record.field_text(Field::Take).as_deref(), Some("true"));
  }

  #[test]
  fn invalid_typed_value_leaves_record_untouched() {
    let mut record = WineRecord::default();
    let before = record.clone();
    let err = record.set_field(Field::WineType, "fortified").unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: Field::WineType, .. }));
    assert_eq!(record, before);
  }

  #[test]
  fn grapes_and_photos_are_not_settable_from_text() {
    let mut record = WineRecord::default();
    assert!(matches!(
      record.set_field(Field::GrapeVarieties, "Gamay"),
      Err(Error::NotSettable(Field::GrapeVarieties))
    ));
    assert!(record.set_field(Field::LabelPhoto, "/tmp/x.jpg").is_err());
    assert!(!Field::PlaquePhoto.is_settable());
    assert!(Field::Region.is_settable());
  }

  #[test]
  fn empty_photo_slot_has_no_text() {
    let mut record = WineRecord::default();
    assert!(record.field_text(Field::BottlePhoto).is_none());
    record.photos.bottle_photo = Some("file:///b.jpg".into());
    assert_eq!(
      record.field_text(Field::BottlePhoto).as_deref(),
      Some("file:///b.jpg")
    );
  }

  #[test]
  fn grape_list_reads_as_names() {
    let mut record = WineRecord::default();
    record.grape_varieties = vec![
      GrapeVariety::new("Pinot Noir", 60.0),
      GrapeVariety::new("Gamay", 40.0),
    ];
    assert_eq!(
      record.field_text(Field::GrapeVarieties).as_deref(),
      Some("Pinot Noir, Gamay")
    );
  }

  #[test]
  fn photo_slots_accept_short_and_long_names() {
    assert_eq!(PhotoSlot::parse("bottle").unwrap(), PhotoSlot::Bottle);
    assert_eq!(PhotoSlot::parse("backLabelPhoto").unwrap(), PhotoSlot::BackLabel);
    assert_eq!(PhotoSlot::parse("back-label").unwrap(), PhotoSlot::BackLabel);
    assert_eq!(PhotoSlot::Plaque.to_string(), "plaquePhoto");
    assert!(matches!(PhotoSlot::parse("cork"), Err(Error::InvalidSlot(_))));
  }

  #[test]
  fn draft_keys_must_name_known_paths() {
    let good = json!({
      "id": "00000000-0000-0000-0000-000000000000",
      "wineryName": "Domaine A",
      "grapeVarieties": [{ "name": "Gamay", "percentage": 100 }],
      "tastingNotes": { "taste": "cherry" },
      "personalVerdict": { "take": true },
      "photos": { "labelPhoto": "p/label.jpg" }
    });
    check_draft_keys(&good).unwrap();

    let cases = [
      (json!({ "winryName": "X" }), "winryName"),
      (json!({ "tastingNotes": { "finish": "long" } }), "tastingNotes.finish"),
      (json!({ "photos": { "corkPhoto": "c.jpg" } }), "photos.corkPhoto"),
      (json!({ "grapeVarieties": [{ "nom": "Gamay" }] }), "grapeVarieties.nom"),
    ];
    for (draft, path) in cases {
      assert!(
        matches!(check_draft_keys(&draft), Err(Error::UnknownField(p)) if p == path),
        "{draft}"
      );
    }
  }
}
