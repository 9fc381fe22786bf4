/// A single point in the document or on the screen.
/// 0-indexed as all things should be.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
  pub row: usize,
  pub col: usize,
}

impl Position {
  pub const fn new(row: usize, col: usize) -> Self {
    Self { row, col }
  }

  pub const fn zero() -> Self {
    Self { row: 0, col: 0 }
  }
}

/// Dimensions of a screen area in terminal cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Size {
  pub rows: usize,
  pub cols: usize,
}

impl Size {
  pub const fn new(rows: usize, cols: usize) -> Self {
    Self { rows, cols }
  }
}
