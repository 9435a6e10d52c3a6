//! `cuvee` — record and search wine tasting notes.
//!
//! # Usage
//!
//! ```text
//! cuvee add --winery "Domaine A" --wine Morgon --year 2019 --grape Gamay:100
//! cuvee search --where tastingNotes.colorNotes=ruby --sort harvestYear
//! cuvee delete --all --yes
//! cuvee serve --port 5280
//! ```

mod commands;
mod render;
mod settings;

use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::Command;
use settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cuvee", author, version, about = "Wine tasting notes")]
struct Cli {
  /// Path to a TOML config file (data_file, host, port).
  #[arg(short, long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Collection file to use instead of the configured one.
  #[arg(long, global = true, value_name = "FILE")]
  data_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so command output stays pipeable.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(cli.config.as_deref())?;
  if let Some(path) = cli.data_file {
    settings.data_file = settings::expand_tilde(&path);
  }
  tracing::debug!(data_file = %settings.data_file.display(), "using collection");

  commands::run(cli.command, settings).await
}
