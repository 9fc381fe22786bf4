//! Editing and rendering engine for atto.
//!
//! Everything in here is terminal agnostic: frames are rendered into an
//! [`output::OutputBuffer`] and key events arrive as [`input::KeyEvent`]s, so
//! the binary only has to shuttle bytes between the engine and the TTY.

pub mod config;
pub mod document;
pub mod editor;
pub mod input;
pub mod output;
pub mod position;
pub mod prompt;
pub mod row;
pub mod status;
pub mod view;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
