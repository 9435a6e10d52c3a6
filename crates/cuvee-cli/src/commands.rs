//! Subcommands and their implementations.

use std::{collections::HashSet, path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use clap::{Args, Subcommand};
use cuvee_core::{
  deletion::{self, DeleteOutcome},
  field::{Field, PhotoSlot},
  form::{FormState, record_tasting},
  query::{Criteria, SortKey, search_store},
  record::GrapeVariety,
  store::RecordStore,
  transfer::{self, ImportMode},
};
use cuvee_store_json::JsonFileStore;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::{render, settings::Settings};

// ─── Definitions ──────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Record a tasting.
  Add(AddArgs),
  /// Filter and list records.
  Search(SearchArgs),
  /// Print every field of one record.
  Show {
    id: Uuid,
  },
  /// Delete selected records, or all of them.
  Delete(DeleteArgs),
  /// Write the collection as JSON to a file or stdout.
  Export {
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },
  /// Load a previously exported collection.
  Import {
    file:  PathBuf,
    /// Keep existing records and add only unknown ids.
    #[arg(long)]
    merge: bool,
  },
  /// Serve the JSON API under `/api`.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

#[derive(Args, Debug)]
pub struct AddArgs {
  #[arg(long)]
  winery: Option<String>,
  #[arg(long)]
  wine:   Option<String>,
  /// Harvest year.
  #[arg(long)]
  year:   Option<String>,

  /// Any field by path, e.g. `--set tastingNotes.taste=cherry`. Repeatable.
  #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
  set:    Vec<(Field, String)>,

  /// A grape variety, e.g. `--grape Gamay:100`. Repeatable.
  #[arg(long = "grape", value_name = "NAME:PCT", value_parser = parse_grape)]
  grapes: Vec<GrapeVariety>,

  /// A photo reference, e.g. `--photo label=photos/label.jpg`. Repeatable.
  #[arg(long = "photo", value_name = "SLOT=REF", value_parser = parse_photo)]
  photos: Vec<(PhotoSlot, String)>,

  /// Print the saved record as JSON.
  #[arg(long)]
  json:   bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
  /// Case-insensitive substring criterion, e.g. `--where country=fra`.
  #[arg(short = 'w', long = "where", value_name = "PATH=VALUE", value_parser = parse_assignment)]
  criteria: Vec<(Field, String)>,

  /// wineryName, wineName or harvestYear.
  #[arg(short, long, default_value_t)]
  sort:     SortKey,

  /// Print matching records as a JSON array.
  #[arg(long)]
  json:     bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
  /// Ids of the records to delete.
  ids: Vec<Uuid>,

  /// Delete every record.
  #[arg(long, conflicts_with = "ids")]
  all: bool,

  /// Confirm `--all`.
  #[arg(long, requires = "all")]
  yes: bool,
}

// ─── Value parsers ────────────────────────────────────────────────────────────

fn parse_assignment(s: &str) -> Result<(Field, String), String> {
  Criteria::parse_term(s).map_err(|e| e.to_string())
}

fn parse_grape(s: &str) -> Result<GrapeVariety, String> {
  let (name, pct) = s
    .rsplit_once(':')
    .ok_or_else(|| format!("expected NAME:PCT, got {s:?}"))?;
  let pct: f64 = pct
    .trim()
    .trim_end_matches('%')
    .parse()
    .map_err(|_| format!("invalid percentage in {s:?}"))?;
  Ok(GrapeVariety::new(name.trim(), pct))
}

fn parse_photo(s: &str) -> Result<(PhotoSlot, String), String> {
  let (slot, reference) = s
    .split_once('=')
    .ok_or_else(|| format!("expected SLOT=REF, got {s:?}"))?;
  let slot = PhotoSlot::parse(slot).map_err(|e| e.to_string())?;
  Ok((slot, reference.to_owned()))
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

pub async fn run(command: Command, settings: Settings) -> anyhow::Result<()> {
  let store = JsonFileStore::new(settings.data_file.clone());
  match command {
    Command::Add(args) => add(&store, args).await,
    Command::Search(args) => search(&store, args).await,
    Command::Show { id } => show(&store, id).await,
    Command::Delete(args) => delete(&store, args).await,
    Command::Export { output } => export(&store, output).await,
    Command::Import { file, merge } => import(&store, file, merge).await,
    Command::Serve { host, port } => {
      let host = host.unwrap_or(settings.host);
      let port = port.unwrap_or(settings.port);
      serve(store, &host, port).await
    }
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

/// Build a draft from the arguments. Nothing is written here.
fn draft_from(args: &AddArgs) -> anyhow::Result<FormState> {
  let mut form = FormState::new();

  let shortcuts = [
    (Field::WineryName, &args.winery),
    (Field::WineName, &args.wine),
    (Field::HarvestYear, &args.year),
  ];
  for (field, value) in shortcuts {
    if let Some(value) = value {
      form.set_field(field, value)?;
    }
  }
  for (field, value) in &args.set {
    form
      .set_field(*field, value)
      .with_context(|| format!("cannot set {field}"))?;
  }

  for grape in &args.grapes {
    form.set_staging_name(grape.name.as_str());
    form.set_staging_percentage(grape.percentage);
    if !form.add_grape_variety() {
      bail!(
        "grape {:?} needs a name and a percentage above zero",
        grape.name
      );
    }
  }

  for (slot, reference) in &args.photos {
    form.set_photo(*slot, Some(reference.clone()));
  }
  Ok(form)
}

async fn add(store: &JsonFileStore, args: AddArgs) -> anyhow::Result<()> {
  let mut form = draft_from(&args)?;
  let record = record_tasting(store, &mut form)
    .await
    .context("failed to record tasting")?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&record)?);
  } else {
    println!("{}", render::summary_line(&record));
  }
  Ok(())
}

async fn search(store: &JsonFileStore, args: SearchArgs) -> anyhow::Result<()> {
  let mut criteria = Criteria::new();
  for (field, value) in args.criteria {
    criteria.set(field, value);
  }

  let hits = search_store(store, &criteria, args.sort).await;
  if args.json {
    println!("{}", serde_json::to_string_pretty(&hits)?);
  } else {
    for record in &hits {
      println!("{}", render::summary_line(record));
    }
  }
  Ok(())
}

async fn show(store: &JsonFileStore, id: Uuid) -> anyhow::Result<()> {
  let record = store
    .get(id)
    .await
    .with_context(|| format!("no record with id {id}"))?;
  print!("{}", render::detail(&record));
  Ok(())
}

async fn delete(store: &JsonFileStore, args: DeleteArgs) -> anyhow::Result<()> {
  if args.all {
    if !args.yes {
      bail!("refusing to delete every record without --yes");
    }
    deletion::delete_all(store)
      .await
      .context("failed to delete records")?;
    println!("deleted all records");
    return Ok(());
  }

  let ids: HashSet<Uuid> = args.ids.into_iter().collect();
  let outcome = deletion::delete_selected(store, &ids)
    .await
    .context("failed to delete records")?;
  match outcome {
    DeleteOutcome::NothingSelected => println!("nothing selected"),
    DeleteOutcome::Deleted { removed, remaining } => {
      println!("deleted {removed} record(s), {remaining} remaining");
    }
  }
  Ok(())
}

async fn export(store: &JsonFileStore, output: Option<PathBuf>) -> anyhow::Result<()> {
  let document = transfer::export(store).await?;
  match output {
    Some(path) => {
      tokio::fs::write(&path, document)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
      tracing::info!(path = %path.display(), "wrote export");
    }
    None => println!("{document}"),
  }
  Ok(())
}

async fn import(store: &JsonFileStore, file: PathBuf, merge: bool) -> anyhow::Result<()> {
  let document = tokio::fs::read_to_string(&file)
    .await
    .with_context(|| format!("failed to read {}", file.display()))?;
  let mode = if merge { ImportMode::Merge } else { ImportMode::Replace };
  let report = transfer::import(store, &document, mode)
    .await
    .with_context(|| format!("failed to import {}", file.display()))?;
  println!(
    "{}: imported {}, skipped {}, {} total",
    report.mode, report.imported, report.skipped, report.total
  );
  Ok(())
}

async fn serve(store: JsonFileStore, host: &str, port: u16) -> anyhow::Result<()> {
  let app = axum::Router::new().nest("/api", cuvee_api::api_router(Arc::new(store)));
  let address = format!("{host}:{port}");

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser)]
  struct Harness {
    #[command(subcommand)]
    command: Command,
  }

  fn add_args(argv: &[&str]) -> AddArgs {
    let argv = ["cuvee", "add"].iter().chain(argv).copied();
    match Harness::try_parse_from(argv).unwrap().command {
      Command::Add(args) => args,
      other => panic!("expected add, got {other:?}"),
    }
  }

  #[test]
  fn grape_and_photo_values_parse() {
    assert_eq!(parse_grape("Cabernet Franc:30").unwrap(), GrapeVariety::new("Cabernet Franc", 30.0));
    assert_eq!(parse_grape("Gamay: 100%").unwrap(), GrapeVariety::new("Gamay", 100.0));
    assert!(parse_grape("Gamay").is_err());
    assert!(parse_grape("Gamay:lots").is_err());

    assert_eq!(
      parse_photo("backLabelPhoto=p/back.jpg").unwrap(),
      (PhotoSlot::BackLabel, "p/back.jpg".to_owned())
    );
    assert!(parse_photo("cork=p/cork.jpg").is_err());
  }

  #[test]
  fn draft_collects_every_kind_of_argument() {
    let args = add_args(&[
      "--winery", "Domaine A",
      "--year", "2019",
      "--set", "tastingNotes.taste=cherry",
      "--set", "wineColor=rose",
      "--grape", "Gamay:60",
      "--grape", "Pinot Noir:40",
      "--photo", "label=p/label.jpg",
    ]);
    let form = draft_from(&args).unwrap();
    let draft = form.draft();
    assert_eq!(draft.winery_name, "Domaine A");
    assert_eq!(draft.harvest_year, "2019");
    assert_eq!(draft.tasting_notes.taste, "cherry");
    assert_eq!(draft.wine_color.to_string(), "rose");
    assert_eq!(draft.grape_total(), 100.0);
    assert_eq!(draft.photos.label_photo.as_deref(), Some("p/label.jpg"));
  }

  #[test]
  fn unknown_paths_are_rejected_at_parse_time() {
    let argv = ["cuvee", "add", "--set", "tastingNotes.finish=long"];
    assert!(Harness::try_parse_from(argv).is_err());
  }

  #[test]
  fn non_positive_grape_is_an_error() {
    let args = add_args(&["--grape", "Gamay:0"]);
    assert!(draft_from(&args).is_err());
  }

  #[test]
  fn delete_yes_requires_all() {
    assert!(Harness::try_parse_from(["cuvee", "delete", "--yes"]).is_err());
    let id = Uuid::new_v4().to_string();
    assert!(Harness::try_parse_from(["cuvee", "delete", "--all", id.as_str()]).is_err());
  }

  #[tokio::test]
  async fn add_search_delete_against_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::in_dir(dir.path());

    add(&store, add_args(&["--winery", "Domaine A", "--wine", "Morgon"])).await.unwrap();
    add(&store, add_args(&["--winery", "Domaine B", "--wine", "Fleurie"])).await.unwrap();

    let criteria = Criteria::new().with(Field::WineName, "morg");
    let hits = search_store(&store, &criteria, SortKey::WineryName).await;
    assert_eq!(hits.len(), 1);

    let args = DeleteArgs { ids: vec![hits[0].id], all: false, yes: false };
    delete(&store, args).await.unwrap();
    assert_eq!(store.load_all().await.len(), 1);
  }
}
