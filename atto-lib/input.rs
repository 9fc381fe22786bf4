//! Decoded key events, as handed over by the terminal adapter.

/// Modifier keys the router binds on. Shift is already folded into the
/// character by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
  ctrl: bool,
  alt:  bool,
}

impl Modifiers {
  pub const NONE: Self = Self {
    ctrl: false,
    alt:  false,
  };
  pub const CTRL: Self = Self {
    ctrl: true,
    alt:  false,
  };
  pub const ALT: Self = Self {
    ctrl: false,
    alt:  true,
  };

  pub const fn ctrl(self) -> bool {
    self.ctrl
  }

  pub const fn alt(self) -> bool {
    self.alt
  }

  #[must_use]
  pub const fn with(self, other: Self) -> Self {
    Self {
      ctrl: self.ctrl || other.ctrl,
      alt:  self.alt || other.alt,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Char(char),
  Enter,
  Escape,
  Backspace,
  Tab,
  Delete,
  Home,
  End,
  PageUp,
  PageDown,
  Left,
  Right,
  Up,
  Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
  pub key:       Key,
  pub modifiers: Modifiers,
}

impl KeyEvent {
  pub const fn new(key: Key) -> Self {
    Self {
      key,
      modifiers: Modifiers::NONE,
    }
  }

  /// `Ctrl` + `c`, the way raw terminals report control bytes.
  pub const fn ctrl(c: char) -> Self {
    Self {
      key:       Key::Char(c),
      modifiers: Modifiers::CTRL,
    }
  }

  /// Whether this is `Ctrl` + `c` (case insensitive).
  pub fn is_ctrl(&self, c: char) -> bool {
    self.modifiers.ctrl() && matches!(self.key, Key::Char(k) if k.eq_ignore_ascii_case(&c))
  }
}

impl From<Key> for KeyEvent {
  fn from(key: Key) -> Self {
    Self::new(key)
  }
}
