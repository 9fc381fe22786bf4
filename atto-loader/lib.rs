//! Locations of atto's config and log files, and config file loading.

use std::{
  io,
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

const APP_DIR: &str = "atto";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

/// `$ATTO_CONFIG_DIR`, or `atto/` under the platform config directory.
pub fn config_dir() -> PathBuf {
  if let Some(dir) = std::env::var_os("ATTO_CONFIG_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("no home directory ({err}), using the working directory for config");
      PathBuf::from(".").join(APP_DIR)
    },
  }
}

/// `$ATTO_CACHE_DIR`, or `atto/` under the platform cache directory.
pub fn cache_dir() -> PathBuf {
  if let Some(dir) = std::env::var_os("ATTO_CACHE_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(_) => std::env::temp_dir().join(APP_DIR),
  }
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE.get_or_init(default_config_file).clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("atto.log")
}

/// Reads a TOML config from `path`. A missing file is not an error and
/// yields `T::default()`.
pub fn read_config<T>(path: &Path) -> Result<T, ConfigError>
where
  T: DeserializeOwned + Default,
{
  let text = match std::fs::read_to_string(path) {
    Ok(text) => text,
    Err(err) if err.kind() == io::ErrorKind::NotFound => {
      log::debug!("no config at {}, using defaults", path.display());
      return Ok(T::default());
    },
    Err(source) => {
      return Err(ConfigError::Read {
        path: path.to_path_buf(),
        source,
      });
    },
  };

  toml::from_str(&text).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent() {
    if !parent.exists() {
      std::fs::create_dir_all(parent).ok();
    }
  }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let Ok(rest) = path.strip_prefix("~") else {
    return path.to_path_buf();
  };
  match etcetera::home_dir() {
    Ok(home) => home.join(rest),
    Err(_) => path.to_path_buf(),
  }
}
