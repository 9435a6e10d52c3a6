//! Query engine — filtering and ordering a collection.
//!
//! [`search`] is a pure function over a slice of records: it never mutates its
//! input and never touches a store.
//!
//! - Each criterion is a case-insensitive substring test of the record's field
//!   text. A record is kept only if it passes every non-empty criterion.
//!   Criteria with an empty value are ignored. A field with no value (an empty
//!   photo slot) never passes a non-empty criterion.
//! - Names sort ascending with a locale-style collation; the harvest year sorts
//!   descending, most recent vintage first. Ties keep collection order.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result, field::Field, record::WineRecord, store::RecordStore};

// ─── Criteria ────────────────────────────────────────────────────────────────

/// A sparse set of field criteria, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
  terms: BTreeMap<Field, String>,
}

impl Criteria {
  pub fn new() -> Self { Self::default() }

  /// Builder form of [`set`](Self::set).
  pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
    self.set(field, value);
    self
  }

  /// Set (or replace) the criterion for `field`.
  pub fn set(&mut self, field: Field, value: impl Into<String>) {
    self.terms.insert(field, value.into());
  }

  /// Parse one `path=value` term, e.g. `tastingNotes.colorNotes=ruby`.
  pub fn parse_term(term: &str) -> Result<(Field, String)> {
    let (path, value) = term
      .split_once('=')
      .ok_or_else(|| Error::MalformedTerm(term.to_owned()))?;
    Ok((Field::parse(path)?, value.to_owned()))
  }

  /// Build criteria from `path=value` terms; later terms for the same field win.
  pub fn from_terms<I, S>(terms: I) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut criteria = Self::new();
    for term in terms {
      let (field, value) = Self::parse_term(term.as_ref())?;
      criteria.set(field, value);
    }
    Ok(criteria)
  }

  /// The criteria that actually filter, i.e. those with a non-empty value.
  pub fn active(&self) -> impl Iterator<Item = (Field, &str)> {
    self
      .terms
      .iter()
      .filter(|(_, value)| !value.is_empty())
      .map(|(field, value)| (*field, value.as_str()))
  }

  /// True when no criterion filters anything.
  pub fn is_empty(&self) -> bool { self.active().next().is_none() }
}

// ─── Sort key ────────────────────────────────────────────────────────────────

/// The closed set of orderings offered by [`search`].
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
#[serde(rename_all = "camelCase")]
#[strum(ascii_case_insensitive)]
pub enum SortKey {
  /// Ascending.
  #[default]
  #[strum(to_string = "wineryName", serialize = "winery")]
  WineryName,
  /// Ascending.
  #[strum(to_string = "wineName", serialize = "wine")]
  WineName,
  /// Descending — most recent vintage first.
  #[strum(to_string = "harvestYear", serialize = "year")]
  HarvestYear,
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Filter `records` by `criteria` and order the survivors by `sort`.
pub fn search(
  records: &[WineRecord],
  criteria: &Criteria,
  sort: SortKey,
) -> Vec<WineRecord> {
  let needles: Vec<(Field, String)> = criteria
    .active()
    .map(|(field, value)| (field, value.to_lowercase()))
    .collect();

  let mut hits: Vec<WineRecord> = records
    .iter()
    .filter(|record| matches_lowered(record, &needles))
    .cloned()
    .collect();

  // `sort_by` is stable, which keeps ties in collection order.
  hits.sort_by(|a, b| compare(a, b, sort));
  hits
}

/// Whether `record` passes every active criterion.
pub fn matches(record: &WineRecord, criteria: &Criteria) -> bool {
  let needles: Vec<(Field, String)> = criteria
    .active()
    .map(|(field, value)| (field, value.to_lowercase()))
    .collect();
  matches_lowered(record, &needles)
}

/// Run [`search`] over the store's current collection.
pub async fn search_store<S: RecordStore>(
  store: &S,
  criteria: &Criteria,
  sort: SortKey,
) -> Vec<WineRecord> {
  let records = store.load_all().await;
  let hits = search(&records, criteria, sort);
  tracing::debug!(total = records.len(), hits = hits.len(), %sort, "searched records");
  hits
}

fn matches_lowered(record: &WineRecord, needles: &[(Field, String)]) -> bool {
  needles.iter().all(|(field, needle)| {
    record
      .field_text(*field)
      .is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
  })
}

/// Total order on two records for `sort`.
pub fn compare(a: &WineRecord, b: &WineRecord, sort: SortKey) -> Ordering {
  match sort {
    SortKey::WineryName => collate(&a.winery_name, &b.winery_name),
    SortKey::WineName => collate(&a.wine_name, &b.wine_name),
    SortKey::HarvestYear => match (vintage(a), vintage(b)) {
      (Some(x), Some(y)) => y.cmp(&x),
      // Records without a usable year go last.
      (Some(_), None) => Ordering::Less,
      (None, Some(_)) => Ordering::Greater,
      (None, None) => Ordering::Equal,
    },
  }
}

fn vintage(record: &WineRecord) -> Option<i64> {
  record.harvest_year.trim().parse().ok()
}

// ─── Collation ───────────────────────────────────────────────────────────────

/// Compare two strings the way a dictionary would.
///
/// Letters are compared first without case or accents, then with accents,
/// then with case (lower before upper), so `"château" < "Château" < "Chateaux"`.
pub fn collate(a: &str, b: &str) -> Ordering {
  base_chars(a)
    .cmp(base_chars(b))
    .then_with(|| lower_chars(a).cmp(lower_chars(b)))
    .then_with(|| b.cmp(a))
}

fn lower_chars(s: &str) -> impl Iterator<Item = char> + '_ {
  s.chars().flat_map(char::to_lowercase)
}

fn base_chars(s: &str) -> impl Iterator<Item = char> + '_ {
  lower_chars(s).flat_map(|c| match strip_accent(c) {
    Some(base) => base.chars().collect::<Vec<_>>(),
    None => vec![c],
  })
}

fn strip_accent(c: char) -> Option<&'static str> {
  let base = match c {
    'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
    'æ' => "ae",
    'ç' | 'ć' | 'č' => "c",
    'ď' => "d",
    'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
    'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
    'ł' => "l",
    'ñ' | 'ń' | 'ň' => "n",
    'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
    'œ' => "oe",
    'ř' => "r",
    'ś' | 'š' | 'ș' | 'ş' => "s",
    'ß' => "ss",
    'ť' | 'ț' => "t",
    'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
    'ý' | 'ÿ' => "y",
    'ź' | 'ż' | 'ž' => "z",
    'ё' => "е",
    'й' => "и",
    _ => return None,
  };
  Some(base)
}
