//! A single line of text and its tab-expanded render form.
//!
//! Text is handled as raw bytes. A [`Row`] keeps `render` in sync with `text`
//! after every mutation, and [`Row::cursor_to_render`] walks the exact same
//! expansion rule, so a cursor placed with it always lands on the cell the
//! byte was drawn in.

use std::collections::TryReserveError;

pub const TAB: u8 = b'\t';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
  text:     Vec<u8>,
  render:   Vec<u8>,
  tab_stop: usize,
}

impl Row {
  /// Builds a row from `text`. A `tab_stop` of zero is treated as one.
  pub fn new(text: &[u8], tab_stop: usize) -> Result<Self, TryReserveError> {
    let tab_stop = tab_stop.max(1);
    let mut owned = Vec::new();
    owned.try_reserve_exact(text.len())?;
    owned.extend_from_slice(text);

    Ok(Self {
      render: render_of(&owned, tab_stop)?,
      text: owned,
      tab_stop,
    })
  }

  pub fn text(&self) -> &[u8] {
    &self.text
  }

  pub fn render(&self) -> &[u8] {
    &self.render
  }

  pub fn len(&self) -> usize {
    self.text.len()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  pub fn render_len(&self) -> usize {
    self.render.len()
  }

  pub fn tab_stop(&self) -> usize {
    self.tab_stop
  }

  /// Translates a byte offset in `text` into a column in `render`.
  ///
  /// Offsets past the end are treated as the end of the row.
  pub fn cursor_to_render(&self, cursor_col: usize) -> usize {
    let end = cursor_col.min(self.text.len());
    render_width(&self.text[..end], self.tab_stop)
  }

  /// Slice of the render form that is visible starting at render column
  /// `col_offset`, at most `width` bytes long.
  pub fn visible(&self, col_offset: usize, width: usize) -> &[u8] {
    let start = col_offset.min(self.render.len());
    let end = start + width.min(self.render.len() - start);
    &self.render[start..end]
  }

  /// Inserts `byte` at `at`, or at the end when `at` is past it.
  ///
  /// On error the row is unchanged.
  pub(crate) fn insert(&mut self, at: usize, byte: u8) -> Result<(), TryReserveError> {
    let at = at.min(self.text.len());
    self.text.try_reserve(1)?;
    self.text.insert(at, byte);
    if let Err(err) = self.update_render() {
      self.text.remove(at);
      return Err(err);
    }
    Ok(())
  }

  /// Removes the byte at `at`. `Ok(false)` when there is no such byte.
  ///
  /// On error the row is unchanged.
  pub(crate) fn remove(&mut self, at: usize) -> Result<bool, TryReserveError> {
    if at >= self.text.len() {
      return Ok(false);
    }
    let byte = self.text.remove(at);
    if let Err(err) = self.update_render() {
      self.text.insert(at, byte);
      return Err(err);
    }
    Ok(true)
  }

  /// On error the row is unchanged.
  pub(crate) fn append(&mut self, bytes: &[u8]) -> Result<(), TryReserveError> {
    let len = self.text.len();
    self.text.try_reserve(bytes.len())?;
    self.text.extend_from_slice(bytes);
    if let Err(err) = self.update_render() {
      self.text.truncate(len);
      return Err(err);
    }
    Ok(())
  }

  /// Keeps `[0, at)`. The render of a prefix is a prefix of the render, so
  /// nothing is allocated.
  pub(crate) fn truncate(&mut self, at: usize) {
    let render_at = self.cursor_to_render(at);
    self.text.truncate(at);
    self.render.truncate(render_at);
  }

  /// Leaves `render` untouched on error.
  fn update_render(&mut self) -> Result<(), TryReserveError> {
    self.render = render_of(&self.text, self.tab_stop)?;
    Ok(())
  }
}

fn render_of(text: &[u8], tab_stop: usize) -> Result<Vec<u8>, TryReserveError> {
  let mut render = Vec::new();
  render.try_reserve_exact(render_width(text, tab_stop))?;

  for &byte in text {
    if byte == TAB {
      let target = next_tab_stop(render.len(), tab_stop);
      render.resize(target, b' ');
    } else {
      render.push(byte);
    }
  }
  Ok(render)
}

fn render_width(text: &[u8], tab_stop: usize) -> usize {
  text.iter().fold(0, |col, &byte| {
    if byte == TAB {
      next_tab_stop(col, tab_stop)
    } else {
      col + 1
    }
  })
}

/// First tab stop strictly after `col`.
const fn next_tab_stop(col: usize, tab_stop: usize) -> usize {
  col + tab_stop - col % tab_stop
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tab_expands_to_next_stop() {
    let row = Row::new(b"a\tb", 8).unwrap();
    assert_eq!(row.render(), b"a       b");
    assert_eq!(row.render_len(), 9);
    assert_eq!(row.cursor_to_render(1), 1);
    assert_eq!(row.cursor_to_render(2), 8);
    assert_eq!(row.cursor_to_render(3), 9);
  }

  #[test]
  fn tab_on_stop_advances_full_width() {
    let row = Row::new(b"\t\t", 4).unwrap();
    assert_eq!(row.render(), b"        ");
    assert_eq!(row.cursor_to_render(1), 4);

    let row = Row::new(b"abcd\tx", 4).unwrap();
    assert_eq!(row.render(), b"abcd    x");
  }

  #[test]
  fn zero_tab_stop_acts_as_one() {
    let row = Row::new(b"\ta", 0).unwrap();
    assert_eq!(row.tab_stop(), 1);
    assert_eq!(row.render(), b" a");
  }

  #[test]
  fn render_follows_mutations() {
    let mut row = Row::new(b"ab", 8).unwrap();
    row.insert(1, TAB).unwrap();
    assert_eq!(row.render(), b"a       b");

    assert_eq!(row.remove(1), Ok(true));
    assert_eq!(row.render(), b"ab");

    row.append(b"\tc").unwrap();
    assert_eq!(row.render(), b"ab      c");

    row.truncate(2);
    assert_eq!(row.text(), b"ab");
    assert_eq!(row.render(), b"ab");
  }

  #[test]
  fn insert_past_end_appends() {
    let mut row = Row::new(b"ab", 8).unwrap();
    row.insert(99, b'c').unwrap();
    assert_eq!(row.text(), b"abc");
  }

  #[test]
  fn remove_out_of_range_is_rejected() {
    let mut row = Row::new(b"ab", 8).unwrap();
    assert_eq!(row.remove(2), Ok(false));
    assert_eq!(row.text(), b"ab");
  }

  #[test]
  fn visible_clamps_to_render() {
    let row = Row::new(b"hello", 8).unwrap();
    assert_eq!(row.visible(0, 3), b"hel");
    assert_eq!(row.visible(3, 10), b"lo");
    assert_eq!(row.visible(5, 10), b"");
    assert_eq!(row.visible(42, 10), b"");
  }

  quickcheck::quickcheck! {
    fn end_of_row_maps_to_render_len(text: Vec<u8>, tab_stop: u8) -> bool {
      let row = Row::new(&text, usize::from(tab_stop % 16)).unwrap();
      row.cursor_to_render(row.len()) == row.render_len()
    }

    fn render_never_shorter_than_text(text: Vec<u8>) -> bool {
      let row = Row::new(&text, 8).unwrap();
      row.render_len() >= row.len()
    }

    fn tab_free_text_renders_verbatim(text: Vec<u8>) -> bool {
      let text: Vec<u8> = text.into_iter().filter(|&byte| byte != TAB).collect();
      let row = Row::new(&text, 8).unwrap();
      row.render() == text.as_slice() && row.cursor_to_render(text.len()) == text.len()
    }

    fn truncate_matches_fresh_row(text: Vec<u8>, at: usize) -> bool {
      let at = if text.is_empty() { 0 } else { at % (text.len() + 1) };
      let mut row = Row::new(&text, 4).unwrap();
      row.truncate(at);
      row == Row::new(&text[..at], 4).unwrap()
    }

    fn render_len_matches_width(text: Vec<u8>) -> bool {
      let row = Row::new(&text, 8).unwrap();
      row.render_len() == render_width(&text, 8)
    }

    fn cursor_to_render_is_monotonic(text: Vec<u8>) -> bool {
      let row = Row::new(&text, 8).unwrap();
      (0..row.len()).all(|col| row.cursor_to_render(col) < row.cursor_to_render(col + 1))
    }
  }
}
