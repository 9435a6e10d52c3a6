//! The tasting record — the aggregate stored by every Cuvée backend.
//!
//! A [`WineRecord`] owns all of its nested values (grape composition, tasting
//! notes, verdict, photos); none of them has an identity or lifecycle of its
//! own. Descriptive fields are free text even when they hold numbers: the
//! model never enforces numeric typing at rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── Classification ──────────────────────────────────────────────────────────

/// Sweetness class of the wine.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WineType {
  #[default]
  Dry,
  SemiDry,
  SemiSweet,
  Sweet,
  Dessert,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WineCategory {
  #[default]
  Still,
  Sparkling,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WineColor {
  #[default]
  Red,
  White,
  Rose,
  Orange,
  GlouGlou,
  Other,
}

/// Whether the taster considers the wine to their liking.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Verdict {
  #[default]
  Mine,
  NotMine,
}

// ─── Value objects ───────────────────────────────────────────────────────────

/// One grape in the blend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrapeVariety {
  #[serde(deserialize_with = "loose_text")]
  pub name:       String,
  /// Share of the blend, in percent.
  #[serde(deserialize_with = "loose_number")]
  pub percentage: f64,
}

impl GrapeVariety {
  pub fn new(name: impl Into<String>, percentage: f64) -> Self {
    Self { name: name.into(), percentage }
  }

  /// A named grape with a share above zero. Only these may enter a blend.
  pub fn is_valid(&self) -> bool {
    !self.name.trim().is_empty() && self.percentage > 0.0
  }
}

/// Free-text tasting descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TastingNotes {
  #[serde(deserialize_with = "loose_text")]
  pub color_notes:          String,
  #[serde(deserialize_with = "loose_text")]
  pub density:              String,
  #[serde(deserialize_with = "loose_text")]
  pub first_nose:           String,
  #[serde(deserialize_with = "loose_text")]
  pub aroma_after_aeration: String,
  #[serde(deserialize_with = "loose_text")]
  pub taste:                String,
  #[serde(deserialize_with = "loose_text")]
  pub tannins:              String,
  #[serde(deserialize_with = "loose_text")]
  pub acidity:              String,
  #[serde(deserialize_with = "loose_text")]
  pub sweetness:            String,
  #[serde(deserialize_with = "loose_text")]
  pub balance:              String,
  #[serde(deserialize_with = "loose_text")]
  pub associations:         String,
  #[serde(deserialize_with = "loose_text")]
  pub consumption_date:     String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalVerdict {
  pub verdict: Verdict,
  /// Whether the taster would buy the wine again.
  pub take:    bool,
  #[serde(deserialize_with = "loose_text")]
  pub other:   String,
}

/// The four photo slots of a record. References are opaque (a local path or
/// URI); the core neither checks nor manages the files behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Photos {
  pub bottle_photo:     Option<String>,
  pub label_photo:      Option<String>,
  pub back_label_photo: Option<String>,
  pub plaque_photo:     Option<String>,
}

impl Photos {
  pub fn is_empty(&self) -> bool {
    self.bottle_photo.is_none()
      && self.label_photo.is_none()
      && self.back_label_photo.is_none()
      && self.plaque_photo.is_none()
  }
}

// ─── WineRecord ──────────────────────────────────────────────────────────────

/// One tasting entry.
///
/// `Default` yields a blank draft: empty text, the first value of every
/// classification, no grapes, no photos and a nil `id`. A real identifier is
/// assigned when the draft is finalised (see [`crate::form::FormState`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WineRecord {
  pub id:               Uuid,
  /// When the record was committed; absent for records written by older
  /// versions of the app.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub recorded_at:      Option<DateTime<Utc>>,

  #[serde(deserialize_with = "loose_text")]
  pub winery_name:      String,
  #[serde(deserialize_with = "loose_text")]
  pub wine_name:        String,
  #[serde(deserialize_with = "loose_text")]
  pub harvest_year:     String,
  #[serde(deserialize_with = "loose_text")]
  pub bottling_year:    String,
  pub grape_varieties:  Vec<GrapeVariety>,
  #[serde(deserialize_with = "loose_text")]
  pub winemaker:        String,
  #[serde(deserialize_with = "loose_text")]
  pub owner:            String,
  #[serde(deserialize_with = "loose_text")]
  pub country:          String,
  #[serde(deserialize_with = "loose_text")]
  pub region:           String,
  #[serde(deserialize_with = "loose_text")]
  pub sugar_content:    String,
  #[serde(deserialize_with = "loose_text")]
  pub alcohol_content:  String,
  pub wine_type:        WineType,
  pub wine_category:    WineCategory,
  pub wine_color:       WineColor,
  #[serde(deserialize_with = "loose_text")]
  pub price:            String,
  pub tasting_notes:    TastingNotes,
  pub personal_verdict: PersonalVerdict,
  pub photos:           Photos,
}

impl WineRecord {
  /// Sum of the grape percentages.
  pub fn grape_total(&self) -> f64 {
    self.grape_varieties.iter().map(|g| g.percentage).sum()
  }

  /// A short human label, e.g. `"Château A — Cuvée 1 (2019)"`.
  pub fn title(&self) -> String {
    let mut title = match (self.winery_name.is_empty(), self.wine_name.is_empty()) {
      (false, false) => format!("{} — {}", self.winery_name, self.wine_name),
      (false, true) => self.winery_name.clone(),
      (true, false) => self.wine_name.clone(),
      (true, true) => "(untitled)".to_owned(),
    };
    if !self.harvest_year.is_empty() {
      title.push_str(&format!(" ({})", self.harvest_year));
    }
    title
  }
}

// ─── Lenient decoding ────────────────────────────────────────────────────────

// Older files hold some of the text fields as JSON numbers (years, sugar and
// alcohol content), and `null` where a field was never filled in.

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
  Text(String),
  Integer(i64),
  Float(f64),
  Bool(bool),
}

fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Loose>::deserialize(deserializer)? {
    None => String::new(),
    Some(Loose::Text(s)) => s,
    Some(Loose::Integer(n)) => n.to_string(),
    Some(Loose::Float(f)) => f.to_string(),
    Some(Loose::Bool(b)) => b.to_string(),
  })
}

fn loose_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Loose>::deserialize(deserializer)? {
    None => Ok(0.0),
    Some(Loose::Integer(n)) => Ok(n as f64),
    Some(Loose::Float(f)) => Ok(f),
    Some(Loose::Text(s)) if s.trim().is_empty() => Ok(0.0),
    Some(Loose::Text(s)) => s
      .trim()
      .parse()
      .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    Some(Loose::Bool(b)) => Err(serde::de::Error::custom(format!(
      "expected a number, got {b}"
    ))),
  }
}
