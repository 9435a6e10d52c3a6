//! Plain-text rendering of records for the terminal.

use std::fmt::Write as _;

use chrono::Local;
use cuvee_core::{field::Field, record::WineRecord};
use strum::IntoEnumIterator;

/// One line per record: short id, vintage, title.
pub fn summary_line(record: &WineRecord) -> String {
  let id = record.id.simple().to_string();
  let year = match record.harvest_year.as_str() {
    "" => "----",
    year => year,
  };
  format!("{}  {:>4}  {}", &id[..8], year, record.title())
}

/// Every non-empty field, one `path: value` line each.
pub fn detail(record: &WineRecord) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", record.title());
  let _ = writeln!(out, "{:<28} {}", "id", record.id);
  if let Some(at) = record.recorded_at {
    let local = at.with_timezone(&Local);
    let _ = writeln!(out, "{:<28} {}", "recordedAt", local.format("%Y-%m-%d %H:%M"));
  }

  for field in Field::iter() {
    if field == Field::GrapeVarieties {
      for grape in &record.grape_varieties {
        let _ = writeln!(out, "{:<28} {} {}%", field.path(), grape.name, grape.percentage);
      }
      continue;
    }
    match record.field_text(field) {
      Some(text) if !text.is_empty() => {
        let _ = writeln!(out, "{:<28} {}", field.path(), text);
      }
      _ => {}
    }
  }
  out
}
