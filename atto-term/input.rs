//! Maps crossterm key events onto the editor's key types.

use atto_lib::input::{
  Key,
  KeyEvent,
  Modifiers,
};
use crossterm::event::{
  KeyCode,
  KeyEvent as CrosstermKeyEvent,
  KeyModifiers,
};

pub fn to_key_event(event: CrosstermKeyEvent) -> Option<KeyEvent> {
  let key = to_key(event.code)?;
  Some(KeyEvent {
    key,
    modifiers: to_modifiers(event.modifiers),
  })
}

fn to_key(code: KeyCode) -> Option<Key> {
  match code {
    KeyCode::Char(c) => Some(Key::Char(c)),
    KeyCode::Enter => Some(Key::Enter),
    KeyCode::Tab => Some(Key::Tab),
    KeyCode::Esc => Some(Key::Escape),
    KeyCode::Backspace => Some(Key::Backspace),
    KeyCode::Delete => Some(Key::Delete),
    KeyCode::Home => Some(Key::Home),
    KeyCode::End => Some(Key::End),
    KeyCode::PageUp => Some(Key::PageUp),
    KeyCode::PageDown => Some(Key::PageDown),
    KeyCode::Left => Some(Key::Left),
    KeyCode::Right => Some(Key::Right),
    KeyCode::Up => Some(Key::Up),
    KeyCode::Down => Some(Key::Down),
    _ => None,
  }
}

fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
  let mut out = Modifiers::NONE;
  if modifiers.contains(KeyModifiers::CONTROL) {
    out = out.with(Modifiers::CTRL);
  }
  if modifiers.contains(KeyModifiers::ALT) {
    out = out.with(Modifiers::ALT);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ctrl_letters_keep_their_modifier() {
    let event = CrosstermKeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
    let key = to_key_event(event).unwrap();
    assert!(key.is_ctrl('q'));
  }

  #[test]
  fn shifted_letters_arrive_as_plain_text() {
    let event = CrosstermKeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
    assert_eq!(to_key_event(event), Some(KeyEvent::new(Key::Char('A'))));
  }

  #[test]
  fn navigation_keys_are_mapped() {
    let event = CrosstermKeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE);
    assert_eq!(to_key_event(event), Some(KeyEvent::new(Key::PageDown)));
  }

  #[test]
  fn unsupported_keys_are_dropped() {
    let event = CrosstermKeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
    assert_eq!(to_key_event(event), None);
    let event = CrosstermKeyEvent::new(KeyCode::Insert, KeyModifiers::NONE);
    assert_eq!(to_key_event(event), None);
  }
}
