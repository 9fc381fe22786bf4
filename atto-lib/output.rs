//! Frame output batching.
//!
//! A whole frame (rows, bars, cursor placement) is appended here and written
//! to the terminal with a single `write_all`, so the user never sees a half
//! drawn screen.

use std::{
  collections::TryReserveError,
  io::{
    self,
    Write,
  },
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
  #[error("out of memory while growing the output buffer")]
  OutOfMemory(#[from] TryReserveError),
  #[error(transparent)]
  Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Append-only byte buffer holding one frame worth of terminal output.
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
  bytes: Vec<u8>,
}

impl OutputBuffer {
  pub const fn new() -> Self {
    Self { bytes: Vec::new() }
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      bytes: Vec::with_capacity(capacity),
    }
  }

  /// Appends `bytes` to the frame.
  ///
  /// Storage is reserved before anything is copied, so on failure the buffer
  /// keeps exactly the content it had before the call.
  pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
    self.bytes.try_reserve(bytes.len())?;
    self.bytes.extend_from_slice(bytes);
    Ok(())
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  /// Drops the frame content but keeps the allocation for the next frame.
  pub fn clear(&mut self) {
    self.bytes.clear();
  }

  /// Writes the whole frame to `out` in one call, flushes it and clears the
  /// buffer.
  ///
  /// The buffer is cleared even if the write fails, a broken frame is never
  /// worth retrying.
  pub fn flush_to<W: Write>(&mut self, out: &mut W) -> Result<()> {
    let written = out.write_all(&self.bytes).and_then(|()| out.flush());
    self.clear();
    written?;
    Ok(())
  }
}

/// Lets crossterm commands be queued straight into the frame.
impl Write for OutputBuffer {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self
      .append(buf)
      .map_err(|err| io::Error::new(io::ErrorKind::OutOfMemory, err))?;
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}
