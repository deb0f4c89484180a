use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

const CONFIG_ENV: &str =
  "TASKDECK_CONFIG";
const DATA_ENV: &str = "TASKDECK_DATA";
const DEFAULT_DATA_DIR: &str =
  ".taskdeck_data";

#[derive(
  Debug, Clone, Default, Deserialize,
)]
#[serde(default)]
pub struct Config {
  pub data_dir: Option<PathBuf>,
  pub session:  SessionConfig,
  pub log:      LogConfig,
  #[serde(skip)]
  pub loaded_from: Option<PathBuf>
}

#[derive(
  Debug, Clone, Deserialize,
)]
#[serde(default)]
pub struct SessionConfig {
  pub id:       String,
  pub name:     String,
  pub is_admin: bool
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      id:       "local".to_string(),
      name:     "Local User".to_string(),
      is_admin: true
    }
  }
}

#[derive(
  Debug, Clone, Default, Deserialize,
)]
#[serde(default)]
pub struct LogConfig {
  pub directory: Option<PathBuf>
}

impl Config {
  /// Loads the config from `path`, or
  /// from `$TASKDECK_CONFIG` / the
  /// platform config dir when `path` is
  /// `None`. A missing file yields
  /// defaults.
  #[tracing::instrument]
  pub fn load(
    path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) = path
      .map(Path::to_path_buf)
      .or_else(resolve_config_path)
    else {
      warn!(
        "no config location; using \
         defaults"
      );
      return Ok(Self::default());
    };

    if !path.exists() {
      warn!(config = %path.display(), "config file missing; using defaults");
      return Ok(Self::default());
    }

    info!(config = %path.display(), "loading config");
    let raw = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed reading {}",
          path.display()
        )
      })?;
    let mut cfg = Self::parse(&raw)
      .with_context(|| {
        format!(
          "failed parsing {}",
          path.display()
        )
      })?;
    cfg.loaded_from = Some(path);
    Ok(cfg)
  }

  pub fn parse(
    raw: &str
  ) -> anyhow::Result<Self> {
    let cfg: Self = toml::from_str(raw)?;
    debug!(
      session = %cfg.session.id,
      is_admin = cfg.session.is_admin,
      "parsed config"
    );
    Ok(cfg)
  }

  /// Config value first, then
  /// `$TASKDECK_DATA`, then
  /// `./.taskdeck_data`.
  pub fn resolve_data_dir(
    &self
  ) -> PathBuf {
    if let Some(dir) = &self.data_dir {
      return dir.clone();
    }

    if let Ok(path) =
      std::env::var(DATA_ENV)
    {
      return PathBuf::from(path);
    }

    if let Ok(cwd) =
      std::env::current_dir()
    {
      return cwd.join(DEFAULT_DATA_DIR);
    }

    PathBuf::from(DEFAULT_DATA_DIR)
  }
}

fn resolve_config_path()
-> Option<PathBuf> {
  if let Ok(path) =
    std::env::var(CONFIG_ENV)
  {
    return Some(PathBuf::from(path));
  }

  dirs::config_dir().map(|dir| {
    dir
      .join("taskdeck")
      .join("config.toml")
  })
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::Config;

  #[test]
  fn parses_session_and_paths() {
    let cfg = Config::parse(
      r#"
data_dir = "/tmp/taskdeck"

[session]
id = "u-7"
name = "Dana"
is_admin = false

[log]
directory = "/tmp/taskdeck/logs"
"#
    )
    .unwrap();

    assert_eq!(cfg.session.id, "u-7");
    assert_eq!(cfg.session.name, "Dana");
    assert!(!cfg.session.is_admin);
    assert_eq!(
      cfg.resolve_data_dir(),
      PathBuf::from("/tmp/taskdeck")
    );
    assert_eq!(
      cfg.log.directory,
      Some(PathBuf::from(
        "/tmp/taskdeck/logs"
      ))
    );
  }

  #[test]
  fn empty_config_defaults_to_admin_session()
   {
    let cfg = Config::parse("").unwrap();
    assert_eq!(cfg.session.id, "local");
    assert!(cfg.session.is_admin);
    assert!(cfg.data_dir.is_none());
  }

  #[test]
  fn missing_file_yields_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let missing =
      temp.path().join("absent.toml");
    let cfg = Config::load(Some(
      missing.as_path()
    ))
    .unwrap();
    assert!(cfg.loaded_from.is_none());
    assert_eq!(cfg.session.name, "Local User");
  }

  #[test]
  fn load_records_source_path() {
    let temp = tempfile::tempdir().unwrap();
    let path =
      temp.path().join("config.toml");
    std::fs::write(
      &path,
      "[session]\nname = \"Ops\"\n"
    )
    .unwrap();

    let cfg =
      Config::load(Some(path.as_path()))
        .unwrap();
    assert_eq!(cfg.session.name, "Ops");
    assert_eq!(
      cfg.loaded_from.as_deref(),
      Some(path.as_path())
    );
  }
}
