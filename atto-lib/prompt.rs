//! Single line text prompt shown in the message bar.

use crate::input::{
  Key,
  KeyEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
  SaveAs,
}

impl PromptKind {
  fn label(self) -> &'static str {
    match self {
      Self::SaveAs => "Save as",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
  Pending,
  Submitted(String),
  Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
  kind:  PromptKind,
  value: String,
}

impl Prompt {
  pub fn new(kind: PromptKind) -> Self {
    Self {
      kind,
      value: String::new(),
    }
  }

  pub fn kind(&self) -> PromptKind {
    self.kind
  }

  pub fn value(&self) -> &str {
    &self.value
  }

  /// Text for the message bar while the prompt is open.
  pub fn message(&self) -> String {
    format!("{}: {} (ESC to cancel)", self.kind.label(), self.value)
  }

  /// Feeds one key to the prompt.
  ///
  /// Only printable ASCII is accepted. `Enter` submits a non-empty value,
  /// `Escape` cancels.
  pub fn handle_key(&mut self, event: KeyEvent) -> PromptOutcome {
    if event.is_ctrl('h') {
      self.value.pop();
      return PromptOutcome::Pending;
    }

    match event.key {
      Key::Escape => PromptOutcome::Cancelled,
      Key::Enter if !self.value.is_empty() => {
        PromptOutcome::Submitted(std::mem::take(&mut self.value))
      },
      Key::Backspace | Key::Delete => {
        self.value.pop();
        PromptOutcome::Pending
      },
      Key::Char(c) if !event.modifiers.ctrl() && (c.is_ascii_graphic() || c == ' ') => {
        if self.value.try_reserve(c.len_utf8()).is_err() {
          log::warn!("prompt: out of memory, dropping {c:?}");
          return PromptOutcome::Pending;
        }
        self.value.push(c);
        PromptOutcome::Pending
      },
      _ => PromptOutcome::Pending,
    }
  }
}
