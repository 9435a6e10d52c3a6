//! Runtime settings, layered from defaults, an optional TOML file and
//! `CUVEE_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cuvee_store_json::JsonFileStore;
use directories::ProjectDirs;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5280;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// The collection file.
  pub data_file: PathBuf,
  /// Bind address for `cuvee serve`.
  pub host:      String,
  pub port:      u16,
}

impl Settings {
  /// Load settings. An explicit `config` file must exist; without one, the
  /// platform config directory is checked for an optional `config.toml`.
  pub fn load(config: Option<&Path>) -> anyhow::Result<Self> {
    let dirs = project_dirs()?;
    let default_data = dirs.data_dir().join(JsonFileStore::FILE_NAME);

    let mut builder = config::Config::builder()
      .set_default("data_file", default_data.to_string_lossy().into_owned())?
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?;

    builder = match config {
      Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
      None => builder.add_source(
        config::File::from(dirs.config_dir().join("config.toml")).required(false),
      ),
    };

    let settings: Settings = builder
      .add_source(config::Environment::with_prefix("CUVEE").try_parsing(true))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    Ok(Self { data_file: expand_tilde(&settings.data_file), ..settings })
  }
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
  ProjectDirs::from("org", "cuvee", "cuvee")
    .context("could not determine a home directory for the default data path")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
