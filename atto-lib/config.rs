use std::time::Duration;

use serde::Deserialize;

use crate::document::DEFAULT_TAB_STOP;

/// Editor settings, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Column interval a tab advances to. Zero is treated as one.
  pub tab_stop:        usize,
  /// Extra `Ctrl-Q` presses needed to quit with unsaved changes.
  pub quit_times:      u8,
  /// Seconds a status message stays visible.
  pub message_timeout: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      tab_stop:        DEFAULT_TAB_STOP,
      quit_times:      2,
      message_timeout: 5,
    }
  }
}

impl Config {
  pub fn tab_stop(&self) -> usize {
    self.tab_stop.max(1)
  }

  pub fn message_timeout(&self) -> Duration {
    Duration::from_secs(self.message_timeout)
  }
}
