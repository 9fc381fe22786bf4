//! Document model: the rows of one file, its viewport offset, its file
//! identity and its modification counter.
//!
//! # Index policy
//!
//! Rows are identified by their index only. Indices shift whenever a row is
//! inserted or deleted, so callers must never hold on to a row index across
//! an edit.
//!
//! # Rejected edits
//!
//! Mutations never panic on bad input. A request with an out-of-range index
//! (or one that cannot allocate) returns `false`/`None` and leaves the
//! document exactly as it was. A successful mutation bumps the dirty counter.

use std::{
  collections::TryReserveError,
  fs::{
    File,
    OpenOptions,
  },
  io::{
    self,
    BufRead,
    BufReader,
    Write,
  },
  path::{
    Path,
    PathBuf,
  },
};

use thiserror::Error;

use crate::{
  position::Position,
  row::Row,
};

pub const DEFAULT_TAB_STOP: usize = 8;

#[derive(Debug, Error)]
pub enum DocumentError {
  #[error("document has no file name")]
  NoFilename,
  #[error("out of memory")]
  OutOfMemory(#[from] TryReserveError),
  #[error(transparent)]
  Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Clone)]
pub struct Document {
  rows:     Vec<Row>,
  /// Top-left corner of the viewport. `row` is in row space, `col` in render
  /// space.
  offset:   Position,
  filename: Option<PathBuf>,
  dirty:    usize,
  tab_stop: usize,
}

impl Default for Document {
  fn default() -> Self {
    Self::new(DEFAULT_TAB_STOP)
  }
}

impl Document {
  /// An untitled document with no rows.
  pub fn new(tab_stop: usize) -> Self {
    Self {
      rows: Vec::new(),
      offset: Position::zero(),
      filename: None,
      dirty: 0,
      tab_stop: tab_stop.max(1),
    }
  }

  /// Loads `path`, one row per line.
  pub fn open(path: impl AsRef<Path>, tab_stop: usize) -> Result<Self> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut doc = Self::from_reader(BufReader::new(file), tab_stop)?;
    doc.filename = Some(path.to_path_buf());

    log::info!(
      "opened {} ({} rows, {} bytes)",
      path.display(),
      doc.rows.len(),
      doc.byte_len()
    );
    Ok(doc)
  }

  /// Reads rows from `reader`, stripping every trailing `\r`/`\n` from each
  /// line. The result is clean (dirty counter at zero).
  pub fn from_reader<R: BufRead>(reader: R, tab_stop: usize) -> Result<Self> {
    let mut doc = Self::new(tab_stop);

    for line in reader.split(b'\n') {
      let mut line = line?;
      while matches!(line.last(), Some(b'\r' | b'\n')) {
        line.pop();
      }
      doc.rows.try_reserve(1)?;
      doc.rows.push(Row::new(&line, doc.tab_stop)?);
    }

    Ok(doc)
  }

  pub fn rows(&self) -> &[Row] {
    &self.rows
  }

  pub fn row(&self, index: usize) -> Option<&Row> {
    self.rows.get(index)
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Byte length of row `index`, zero for the virtual row past the end.
  pub fn row_len(&self, index: usize) -> usize {
    self.rows.get(index).map_or(0, Row::len)
  }

  pub fn offset(&self) -> Position {
    self.offset
  }

  pub fn set_offset(&mut self, offset: Position) {
    self.offset = offset;
  }

  pub fn filename(&self) -> Option<&Path> {
    self.filename.as_deref()
  }

  pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
    self.filename = Some(path.into());
  }

  pub fn dirty(&self) -> usize {
    self.dirty
  }

  pub fn is_dirty(&self) -> bool {
    self.dirty != 0
  }

  pub fn tab_stop(&self) -> usize {
    self.tab_stop
  }

  /// Size of the serialized form: every row plus its `\n`.
  pub fn byte_len(&self) -> usize {
    self.rows.iter().map(|row| row.len() + 1).sum()
  }

  //
  // Mutations
  //

  /// Inserts a row holding `text` at `at` (`0..=len`).
  pub fn insert_row(&mut self, at: usize, text: &[u8]) -> bool {
    if at > self.rows.len() {
      log::trace!("insert_row: {at} out of range");
      return false;
    }
    let row = match self.rows.try_reserve(1).and_then(|()| Row::new(text, self.tab_stop)) {
      Ok(row) => row,
      Err(_) => {
        log::warn!("insert_row: out of memory");
        return false;
      },
    };

    self.rows.insert(at, row);
    self.dirty += 1;
    true
  }

  pub fn delete_row(&mut self, at: usize) -> bool {
    if at >= self.rows.len() {
      log::trace!("delete_row: {at} out of range");
      return false;
    }

    self.rows.remove(at);
    self.dirty += 1;
    true
  }

  /// Inserts `byte` into row `row` at `at`, clamping `at` to the row length.
  pub fn insert_char(&mut self, row: usize, at: usize, byte: u8) -> bool {
    let Some(target) = self.rows.get_mut(row) else {
      log::trace!("insert_char: row {row} out of range");
      return false;
    };
    if target.insert(at, byte).is_err() {
      log::warn!("insert_char: out of memory");
      return false;
    }

    self.dirty += 1;
    true
  }

  pub fn delete_char(&mut self, row: usize, at: usize) -> bool {
    let Some(target) = self.rows.get_mut(row) else {
      log::trace!("delete_char: row {row} out of range");
      return false;
    };
    match target.remove(at) {
      Ok(true) => {},
      Ok(false) => {
        log::trace!("delete_char: column {at} out of range in row {row}");
        return false;
      },
      Err(_) => {
        log::warn!("delete_char: out of memory");
        return false;
      },
    }

    self.dirty += 1;
    true
  }

  pub fn append_string(&mut self, row: usize, bytes: &[u8]) -> bool {
    let Some(target) = self.rows.get_mut(row) else {
      log::trace!("append_string: row {row} out of range");
      return false;
    };
    if target.append(bytes).is_err() {
      log::warn!("append_string: out of memory");
      return false;
    }

    self.dirty += 1;
    true
  }

  /// Breaks row `row` at byte `at`; everything from `at` on moves to a new
  /// row right after it. At column zero this is an empty row inserted above.
  pub fn split_line(&mut self, row: usize, at: usize) -> bool {
    if at == 0 {
      return self.insert_row(row, b"");
    }

    let Some(target) = self.rows.get(row) else {
      log::trace!("split_line: row {row} out of range");
      return false;
    };
    if at > target.len() {
      log::trace!("split_line: column {at} out of range in row {row}");
      return false;
    }
    let tail = Row::new(&target.text()[at..], self.tab_stop);
    let Ok(tail) = tail.and_then(|tail| self.rows.try_reserve(1).map(|()| tail)) else {
      log::warn!("split_line: out of memory");
      return false;
    };

    self.rows[row].truncate(at);
    self.rows.insert(row + 1, tail);
    self.dirty += 1;
    true
  }

  /// Appends row `row` onto the row above it and removes it.
  ///
  /// Returns the join point: the length the previous row had before the
  /// merge, which is where the cursor belongs afterwards.
  pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
    if row == 0 || row >= self.rows.len() {
      log::trace!("join_with_previous: row {row} out of range");
      return None;
    }

    let join_at = self.rows[row - 1].len();
    let removed = self.rows.remove(row);
    if self.rows[row - 1].append(removed.text()).is_err() {
      log::warn!("join_with_previous: out of memory");
      self.rows.insert(row, removed);
      return None;
    }
    self.dirty += 1;
    Some(join_at)
  }

  /// On-disk form of the document: every row followed by `\n`.
  pub fn serialize(&self) -> std::result::Result<Vec<u8>, TryReserveError> {
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(self.byte_len())?;

    for row in &self.rows {
      bytes.extend_from_slice(row.text());
      bytes.push(b'\n');
    }
    Ok(bytes)
  }

  //
  // Persistence
  //

  /// Writes the document to its file name and marks it clean.
  ///
  /// On failure nothing about the document changes, including the dirty
  /// counter.
  pub fn save(&mut self) -> Result<usize> {
    let path = self.filename.clone().ok_or(DocumentError::NoFilename)?;
    let written = self.write_to(&path)?;
    self.dirty = 0;
    Ok(written)
  }

  /// Writes the document to `path` and adopts it as the file name.
  pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
    let path = path.into();
    let written = self.write_to(&path)?;
    self.filename = Some(path);
    self.dirty = 0;
    Ok(written)
  }

  // TODO: stage into a temporary file next to `path` and rename it over the
  // original once the write succeeded; a crash mid-write currently loses the
  // old content.
  fn write_to(&self, path: &Path) -> Result<usize> {
    let bytes = self.serialize()?;

    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
      use std::os::unix::fs::OpenOptionsExt;
      options.mode(0o644);
    }

    let mut file = options.open(path)?;
    file.set_len(bytes.len() as u64)?;
    file.write_all(&bytes)?;
    file.flush()?;

    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn doc(lines: &[&str]) -> Document {
    let mut doc = Document::default();
    for (at, line) in lines.iter().enumerate() {
      assert!(doc.insert_row(at, line.as_bytes()));
    }
    doc
  }

  fn texts(doc: &Document) -> Vec<String> {
    doc
      .rows()
      .iter()
      .map(|row| String::from_utf8_lossy(row.text()).into_owned())
      .collect()
  }

  #[test]
  fn insert_row_shifts_following_rows() {
    let mut doc = doc(&["a", "c"]);
    assert!(doc.insert_row(1, b"b"));
    assert_eq!(texts(&doc), ["a", "b", "c"]);
    assert!(doc.insert_row(3, b"d"));
    assert_eq!(texts(&doc), ["a", "b", "c", "d"]);
  }

  #[test]
  fn out_of_range_requests_change_nothing() {
    let mut doc = doc(&["a"]);
    let dirty = doc.dirty();

    assert!(!doc.insert_row(5, b"x"));
    assert!(!doc.delete_row(1));
    assert!(!doc.insert_char(1, 0, b'x'));
    assert!(!doc.delete_char(0, 1));
    assert!(!doc.append_string(3, b"x"));
    assert!(!doc.split_line(0, 2));
    assert!(!doc.split_line(4, 1));
    assert_eq!(doc.join_with_previous(0), None);
    assert_eq!(doc.join_with_previous(1), None);

    assert_eq!(texts(&doc), ["a"]);
    assert_eq!(doc.dirty(), dirty);
  }

  #[test]
  fn mutations_bump_dirty() {
    let mut doc = Document::default();
    assert!(!doc.is_dirty());
    assert!(doc.insert_row(0, b"x"));
    assert_eq!(doc.dirty(), 1);
    assert!(doc.insert_char(0, 1, b'y'));
    assert!(doc.delete_char(0, 0));
    assert_eq!(doc.dirty(), 3);
  }

  #[test]
  fn insert_char_clamps_column() {
    let mut doc = doc(&["ab"]);
    assert!(doc.insert_char(0, 10, b'c'));
    assert_eq!(texts(&doc), ["abc"]);
  }

  #[test]
  fn split_line_in_the_middle() {
    let mut doc = doc(&["hello world"]);
    assert!(doc.split_line(0, 5));
    assert_eq!(texts(&doc), ["hello", " world"]);
  }

  #[test]
  fn split_line_keeps_renders_in_sync() {
    let mut doc = doc(&["a\tb\tc"]);
    assert!(doc.split_line(0, 3));
    assert_eq!(doc.row(0).unwrap().render(), b"a       b");
    assert_eq!(doc.row(1).unwrap().render(), b"        c");
  }

  #[test]
  fn split_line_at_start_inserts_above() {
    let mut doc = doc(&["hello"]);
    assert!(doc.split_line(0, 0));
    assert_eq!(texts(&doc), ["", "hello"]);
  }

  #[test]
  fn split_line_at_end_inserts_empty_below() {
    let mut doc = doc(&["a", "bb", "ccc"]);
    assert!(doc.split_line(1, 2));
    assert_eq!(texts(&doc), ["a", "bb", "", "ccc"]);
  }

  #[test]
  fn join_with_previous_returns_join_point() {
    let mut doc = doc(&["foo", "bar", "baz"]);
    assert_eq!(doc.join_with_previous(1), Some(3));
    assert_eq!(texts(&doc), ["foobar", "baz"]);
    assert_eq!(doc.row(0).unwrap().render(), b"foobar");
  }

  #[test]
  fn serialize_terminates_every_row() {
    assert_eq!(Document::default().serialize().unwrap(), b"");
    assert_eq!(doc(&["a", "", "b"]).serialize().unwrap(), b"a\n\nb\n");
  }

  #[test]
  fn from_reader_strips_line_endings() {
    let doc = Document::from_reader(&b"one\r\ntwo\n\nthree\r\r\n"[..], 8).unwrap();
    assert_eq!(texts(&doc), ["one", "two", "", "three"]);
    assert!(!doc.is_dirty());
    assert_eq!(doc.serialize().unwrap(), b"one\ntwo\n\nthree\n");
  }

  #[test]
  fn byte_len_counts_line_feeds() {
    assert_eq!(Document::default().byte_len(), 0);
    let doc = doc(&["a", "", "bcd"]);
    assert_eq!(doc.byte_len(), 7);
    assert_eq!(doc.byte_len(), doc.serialize().unwrap().len());
  }

  #[test]
  fn from_reader_without_trailing_newline() {
    let doc = Document::from_reader(&b"a\nb"[..], 8).unwrap();
    assert_eq!(texts(&doc), ["a", "b"]);
  }

  #[test]
  fn open_and_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.txt");
    fs::write(&path, "a\nbb\nccc\n").unwrap();

    let mut doc = Document::open(&path, 8).unwrap();
    assert_eq!(doc.filename(), Some(path.as_path()));
    assert_eq!(texts(&doc), ["a", "bb", "ccc"]);

    assert!(doc.delete_row(2));
    assert!(doc.is_dirty());
    assert_eq!(doc.save().unwrap(), 5);
    assert!(!doc.is_dirty());
    assert_eq!(fs::read(&path).unwrap(), b"a\nbb\n");
  }

  #[test]
  fn save_truncates_longer_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.txt");
    fs::write(&path, "a much longer previous content\n").unwrap();

    let mut doc = doc(&["short"]);
    doc.save_as(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"short\n");
    assert_eq!(doc.filename(), Some(path.as_path()));
  }

  #[test]
  fn save_without_filename_fails() {
    let mut doc = doc(&["x"]);
    assert!(matches!(doc.save(), Err(DocumentError::NoFilename)));
    assert!(doc.is_dirty());
  }

  #[test]
  fn failed_save_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = doc(&["x"]);
    let dirty = doc.dirty();

    let err = doc.save_as(dir.path().join("missing").join("file.txt"));
    assert!(matches!(err, Err(DocumentError::Io(_))));
    assert_eq!(doc.dirty(), dirty);
    assert_eq!(doc.filename(), None);
  }

  #[test]
  fn open_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::open(dir.path().join("nope"), 8).unwrap_err();
    assert!(matches!(err, DocumentError::Io(ref err) if err.kind() == io::ErrorKind::NotFound));
  }

  quickcheck::quickcheck! {
    fn insert_then_delete_restores_row(text: Vec<u8>, at: usize, byte: u8) -> bool {
      let mut doc = Document::default();
      doc.insert_row(0, &text);
      let at = if text.is_empty() { 0 } else { at % (text.len() + 1) };

      doc.insert_char(0, at, byte);
      doc.delete_char(0, at);

      let row = doc.row(0).unwrap();
      row.text() == text.as_slice() && *row == Row::new(&text, DEFAULT_TAB_STOP).unwrap()
    }

    fn load_then_serialize_round_trips(lines: Vec<Vec<u8>>) -> bool {
      let lines: Vec<Vec<u8>> = lines
        .into_iter()
        .map(|line| line.into_iter().filter(|&b| b != b'\n' && b != b'\r').collect())
        .collect();
      let source: Vec<u8> = lines
        .iter()
        .flat_map(|line| line.iter().copied().chain(Some(b'\n')))
        .collect();

      let doc = Document::from_reader(source.as_slice(), 8).unwrap();
      doc.serialize().unwrap() == source
    }

    fn crlf_files_serialize_with_lf(lines: Vec<Vec<u8>>) -> bool {
      let lines: Vec<Vec<u8>> = lines
        .into_iter()
        .map(|line| line.into_iter().filter(|&b| b != b'\n' && b != b'\r').collect())
        .collect();
      let crlf: Vec<u8> = lines
        .iter()
        .flat_map(|line| line.iter().copied().chain([b'\r', b'\n']))
        .collect();
      let lf: Vec<u8> = lines
        .iter()
        .flat_map(|line| line.iter().copied().chain(Some(b'\n')))
        .collect();

      let doc = Document::from_reader(crlf.as_slice(), 8).unwrap();
      doc.serialize().unwrap() == lf
    }
  }
}
