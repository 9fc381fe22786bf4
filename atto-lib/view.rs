//! Render pipeline: viewport scrolling and drawing of the text area, status
//! bar and message bar into an [`OutputBuffer`].
//!
//! Nothing here clears the whole screen. Every line is overdrawn and then
//! cleared up to its end, which is what keeps redraws flicker free.

use crossterm::{
  queue,
  style::{
    Attribute,
    SetAttribute,
  },
  terminal::{
    Clear,
    ClearType,
  },
};

use crate::{
  VERSION,
  document::Document,
  output::{
    OutputBuffer,
    Result,
  },
  position::{
    Position,
    Size,
  },
};

pub const ROW_DECORATOR: &[u8] = b"~";
const LINE_BREAK: &[u8] = b"\r\n";

/// Moves the document viewport so `cursor` is inside a `screen` sized window.
///
/// Returns the cursor column in render space, which is what the horizontal
/// offset is measured in.
pub fn scroll(document: &mut Document, cursor: Position, screen: Size) -> usize {
  let rows = screen.rows.max(1);
  let cols = screen.cols.max(1);

  let render_col = document
    .row(cursor.row)
    .map_or(0, |row| row.cursor_to_render(cursor.col));

  let mut offset = document.offset();

  if cursor.row < offset.row {
    offset.row = cursor.row;
  }
  if cursor.row >= offset.row + rows {
    offset.row = cursor.row + 1 - rows;
  }
  if render_col < offset.col {
    offset.col = render_col;
  }
  if render_col >= offset.col + cols {
    offset.col = render_col + 1 - cols;
  }

  document.set_offset(offset);
  render_col
}

/// Draws `screen.rows` lines of text area.
pub fn draw_rows(out: &mut OutputBuffer, document: &Document, screen: Size) -> Result<()> {
  let offset = document.offset();

  for line in 0..screen.rows {
    match document.row(offset.row + line) {
      Some(row) => out.append(row.visible(offset.col, screen.cols))?,
      None if document.is_empty() && line == screen.rows / 3 => {
        draw_welcome(out, screen.cols)?;
      },
      None => out.append(ROW_DECORATOR)?,
    }

    queue!(out, Clear(ClearType::UntilNewLine))?;
    out.append(LINE_BREAK)?;
  }

  Ok(())
}

fn draw_welcome(out: &mut OutputBuffer, cols: usize) -> Result<()> {
  let banner = format!("Atto editor -- version {VERSION}");
  let banner = truncate(&banner, cols);

  let padding = (cols - banner.len()) / 2;
  if padding > 0 {
    out.append(ROW_DECORATOR)?;
    out.append(&b" ".repeat(padding - 1))?;
  }
  out.append(banner.as_bytes())
}

/// Reverse video bar with the file name, line count and modified flag on the
/// left and the cursor line on the right.
pub fn draw_status_bar(
  out: &mut OutputBuffer,
  document: &Document,
  cursor_row: usize,
  cols: usize,
) -> Result<()> {
  let name = match document.filename() {
    Some(path) => path
      .file_name()
      .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned()),
    None => "[No Name]".to_string(),
  };
  let left = format!(
    "{name:.20} - {} lines {}",
    document.len(),
    if document.is_dirty() { "(modified)" } else { "" }
  );
  let right = format!("{}/{}", cursor_row + 1, document.len());

  queue!(out, SetAttribute(Attribute::Reverse))?;

  let left = truncate(&left, cols);
  out.append(left.as_bytes())?;

  let mut len = left.chars().count();
  while len < cols {
    if cols - len == right.len() {
      out.append(right.as_bytes())?;
      break;
    }
    out.append(b" ")?;
    len += 1;
  }

  queue!(out, SetAttribute(Attribute::Reset))?;
  out.append(LINE_BREAK)
}

pub fn draw_message_bar(out: &mut OutputBuffer, message: Option<&str>, cols: usize) -> Result<()> {
  queue!(out, Clear(ClearType::UntilNewLine))?;
  if let Some(message) = message {
    out.append(truncate(message, cols).as_bytes())?;
  }
  Ok(())
}

/// Longest prefix of `text` that is at most `width` characters wide.
fn truncate(text: &str, width: usize) -> &str {
  match text.char_indices().nth(width) {
    Some((end, _)) => &text[..end],
    None => text,
  }
}
