//! Editor state and the key-driven editing state machine.
//!
//! The [`Editor`] owns the document, the cursor and the screen size. The
//! binary feeds it one [`KeyEvent`] at a time and asks it to render a frame
//! in between; nothing in here blocks or touches the terminal directly.
//!
//! States:
//!
//! - normal editing,
//! - quit confirmation: while the document is dirty, `Ctrl-Q` has to be
//!   pressed `quit_times` more times in a row; any other key re-arms it,
//! - save-as prompt: opened by `Ctrl-S` on an untitled document.

use std::time::Instant;

use crossterm::{
  cursor::{
    Hide,
    MoveTo,
    Show,
  },
  queue,
};

use crate::{
  config::Config,
  document::Document,
  input::{
    Key,
    KeyEvent,
  },
  output::{
    OutputBuffer,
    Result,
  },
  position::{
    Position,
    Size,
  },
  prompt::{
    Prompt,
    PromptKind,
    PromptOutcome,
  },
  status::StatusMessage,
  view,
};

pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit";

/// Rows taken by the status bar and the message bar.
const BAR_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Prompt(Prompt),
}

#[derive(Debug)]
pub struct Editor {
  document:    Document,
  /// Logical cursor: `row` in `0..=rows`, `col` a byte offset in its row.
  cursor:      Position,
  /// Cursor column in render space, refreshed on every frame.
  render_col:  usize,
  /// Size of the text area, without the bars.
  screen:      Size,
  config:      Config,
  status:      StatusMessage,
  quit_times:  u8,
  mode:        Mode,
  should_quit: bool,
}

impl Editor {
  /// `terminal` is the full terminal size; two rows are kept for the bars.
  pub fn new(document: Document, terminal: Size, config: Config) -> Self {
    let mut status = StatusMessage::default();
    status.set(HELP_MESSAGE);

    Self {
      document,
      cursor: Position::zero(),
      render_col: 0,
      screen: text_area(terminal),
      quit_times: config.quit_times,
      config,
      status,
      mode: Mode::Normal,
      should_quit: false,
    }
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  pub fn cursor(&self) -> Position {
    self.cursor
  }

  /// Places the cursor, clamped to the document.
  pub fn set_cursor(&mut self, cursor: Position) {
    let row = cursor.row.min(self.document.len());
    let col = cursor.col.min(self.document.row_len(row));
    self.cursor = Position::new(row, col);
  }

  /// Cursor column in render space as of the last frame.
  pub fn render_col(&self) -> usize {
    self.render_col
  }

  pub fn screen(&self) -> Size {
    self.screen
  }

  pub fn resize(&mut self, terminal: Size) {
    self.screen = text_area(terminal);
    log::debug!("text area resized to {}x{}", self.screen.cols, self.screen.rows);
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn status(&self) -> &StatusMessage {
    &self.status
  }

  pub fn set_status(&mut self, text: impl Into<String>) {
    self.status.set(text);
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  //
  // Input
  //

  pub fn handle_key(&mut self, event: KeyEvent) {
    if let Mode::Prompt(prompt) = &mut self.mode {
      let outcome = prompt.handle_key(event);
      let kind = prompt.kind();
      let message = prompt.message();
      self.finish_prompt(kind, outcome, message);
      self.quit_times = self.config.quit_times;
      return;
    }

    if event.is_ctrl('q') {
      self.quit();
      return;
    }

    if event.is_ctrl('s') {
      self.save();
    } else if event.is_ctrl('h') {
      self.delete_char();
    } else if !event.modifiers.ctrl() && !event.modifiers.alt() {
      match event.key {
        Key::Enter => self.insert_newline(),
        Key::Backspace => self.delete_char(),
        Key::Delete => {
          self.move_cursor(Key::Right);
          self.delete_char();
        },
        Key::Tab => self.insert_char('\t'),
        Key::Char(c) => self.insert_char(c),
        Key::Up
        | Key::Down
        | Key::Left
        | Key::Right
        | Key::PageUp
        | Key::PageDown
        | Key::Home
        | Key::End => self.move_cursor(event.key),
        Key::Escape => {},
      }
    }

    self.quit_times = self.config.quit_times;
  }

  fn finish_prompt(&mut self, kind: PromptKind, outcome: PromptOutcome, message: String) {
    match (kind, outcome) {
      (_, PromptOutcome::Pending) => self.status.set(message),
      (PromptKind::SaveAs, PromptOutcome::Cancelled) => {
        self.mode = Mode::Normal;
        self.status.set("Save aborted");
      },
      (PromptKind::SaveAs, PromptOutcome::Submitted(path)) => {
        self.mode = Mode::Normal;
        let result = self.document.save_as(path);
        self.report_save(result);
      },
    }
  }

  fn quit(&mut self) {
    if self.document.is_dirty() && self.quit_times > 0 {
      self.status.set(format!(
        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
        self.quit_times
      ));
      self.quit_times -= 1;
      return;
    }

    self.should_quit = true;
  }

  fn save(&mut self) {
    if self.document.filename().is_none() {
      let prompt = Prompt::new(PromptKind::SaveAs);
      self.status.set(prompt.message());
      self.mode = Mode::Prompt(prompt);
      return;
    }

    let result = self.document.save();
    self.report_save(result);
  }

  fn report_save(&mut self, result: crate::document::Result<usize>) {
    match result {
      Ok(written) => self.status.set(format!("{written} bytes written to disk")),
      Err(err) => {
        log::error!("save failed: {err}");
        self.status.set(format!("Can't save! I/O error: {err}"));
      },
    }
  }

  //
  // Movement
  //

  pub fn move_cursor(&mut self, key: Key) {
    let Position { mut row, mut col } = self.cursor;

    match key {
      Key::Left => {
        if col > 0 {
          col -= 1;
        } else if row > 0 {
          row -= 1;
          col = self.document.row_len(row);
        }
      },
      Key::Right => {
        if let Some(len) = self.document.row(row).map(|r| r.len()) {
          if col < len {
            col += 1;
          } else {
            row += 1;
            col = 0;
          }
        }
      },
      Key::Up => row = row.saturating_sub(1),
      Key::Down => {
        if row < self.document.len() {
          row += 1;
        }
      },
      Key::Home => col = 0,
      Key::End => col = self.document.row_len(row),
      Key::PageUp | Key::PageDown => {
        self.page(key);
        return;
      },
      _ => return,
    }

    // No remembered column: moving onto a shorter row snaps left.
    self.cursor = Position::new(row, col.min(self.document.row_len(row)));
  }

  /// Anchors at the viewport edge, then repeats a one-row move a screen's
  /// worth of times.
  fn page(&mut self, key: Key) {
    let offset = self.document.offset();
    let (anchor, step) = if key == Key::PageUp {
      (offset.row, Key::Up)
    } else {
      let bottom = offset.row + self.screen.rows - 1;
      (bottom.min(self.document.len()), Key::Down)
    };

    self.cursor.row = anchor;
    for _ in 0..self.screen.rows {
      self.move_cursor(step);
    }
    self.cursor.col = self.cursor.col.min(self.document.row_len(self.cursor.row));
  }

  //
  // Editing
  //

  /// Inserts `c` at the cursor. Characters outside ASCII go in as their UTF-8
  /// bytes.
  fn insert_char(&mut self, c: char) {
    let mut buf = [0; 4];
    for &byte in c.encode_utf8(&mut buf).as_bytes() {
      self.insert_byte(byte);
    }
  }

  fn insert_byte(&mut self, byte: u8) {
    if self.cursor.row == self.document.len() {
      self.document.insert_row(self.document.len(), b"");
    }
    if self.document.insert_char(self.cursor.row, self.cursor.col, byte) {
      self.cursor.col += 1;
    }
  }

  fn insert_newline(&mut self) {
    if self.document.split_line(self.cursor.row, self.cursor.col) {
      self.cursor = Position::new(self.cursor.row + 1, 0);
    }
  }

  /// Backspace: removes the byte left of the cursor, or joins the row with
  /// the one above when at column zero.
  fn delete_char(&mut self) {
    let Position { row, col } = self.cursor;
    if row == self.document.len() || (row == 0 && col == 0) {
      return;
    }

    if col > 0 {
      if self.document.delete_char(row, col - 1) {
        self.cursor.col -= 1;
      }
    } else if let Some(join_at) = self.document.join_with_previous(row) {
      self.cursor = Position::new(row - 1, join_at);
    }
  }

  //
  // Rendering
  //

  pub fn render(&mut self, out: &mut OutputBuffer) -> Result<()> {
    self.render_at(out, Instant::now())
  }

  /// Renders one frame as of `now`, which decides whether the status message
  /// has expired.
  pub fn render_at(&mut self, out: &mut OutputBuffer, now: Instant) -> Result<()> {
    self.render_col = view::scroll(&mut self.document, self.cursor, self.screen);

    queue!(out, Hide, MoveTo(0, 0))?;
    view::draw_rows(out, &self.document, self.screen)?;
    view::draw_status_bar(out, &self.document, self.cursor.row, self.screen.cols)?;

    let message = match &self.mode {
      Mode::Prompt(prompt) => Some(prompt.message()),
      Mode::Normal => self
        .status
        .visible(now, self.config.message_timeout())
        .map(str::to_owned),
    };
    view::draw_message_bar(out, message.as_deref(), self.screen.cols)?;

    let offset = self.document.offset();
    let col = to_cell(self.render_col - offset.col);
    let row = to_cell(self.cursor.row - offset.row);
    queue!(out, MoveTo(col, row), Show)?;

    Ok(())
  }
}

fn text_area(terminal: Size) -> Size {
  Size::new(
    terminal.rows.saturating_sub(BAR_ROWS).max(1),
    terminal.cols.max(1),
  )
}

fn to_cell(value: usize) -> u16 {
  u16::try_from(value).unwrap_or(u16::MAX)
}
