//! Transient status message shown in the message bar.

use std::time::{
  Duration,
  Instant,
};

#[derive(Debug, Clone)]
pub struct StatusMessage {
  text:   String,
  set_at: Instant,
}

impl Default for StatusMessage {
  fn default() -> Self {
    Self {
      text:   String::new(),
      set_at: Instant::now(),
    }
  }
}

impl StatusMessage {
  pub fn set(&mut self, text: impl Into<String>) {
    self.set_at_instant(text, Instant::now());
  }

  pub fn set_at_instant(&mut self, text: impl Into<String>, at: Instant) {
    self.text = text.into();
    self.set_at = at;
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  /// The message, if one is set and it is younger than `timeout` at `now`.
  pub fn visible(&self, now: Instant, timeout: Duration) -> Option<&str> {
    if self.text.is_empty() || now.saturating_duration_since(self.set_at) >= timeout {
      return None;
    }
    Some(&self.text)
  }
}
