//! Raw mode terminal adapter on top of crossterm.
//!
//! Entering builds a [`Terminal`] guard; dropping it (or panicking while it
//! is alive) puts the TTY back into cooked mode.

use std::{
  io::{
    self,
    Stdout,
    Write,
    stdout,
  },
  panic::{
    set_hook,
    take_hook,
  },
};

use atto_lib::{
  input::KeyEvent,
  output::{
    self,
    OutputBuffer,
  },
  position::Size,
};
use crossterm::{
  Command,
  cursor::Show,
  event::{
    self,
    Event,
    KeyEventKind,
  },
  queue,
  terminal::{
    Clear,
    ClearType,
    DisableLineWrap,
    EnableLineWrap,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};

use crate::input::to_key_event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
  Key(KeyEvent),
  Resize(Size),
}

pub struct Terminal {
  stdout: Stdout,
}

impl Terminal {
  /// Switches the TTY to raw mode on the alternate screen.
  pub fn init() -> io::Result<Self> {
    let current_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
      let _ = Self::terminate();
      current_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut terminal = Self { stdout: stdout() };
    terminal.queue_command(EnterAlternateScreen)?;
    terminal.queue_command(DisableLineWrap)?;
    terminal.queue_command(Clear(ClearType::All))?;
    terminal.stdout.flush()?;

    Ok(terminal)
  }

  pub fn terminate() -> io::Result<()> {
    let mut out = stdout();
    queue!(out, LeaveAlternateScreen, EnableLineWrap, Show)?;
    out.flush()?;
    disable_raw_mode()
  }

  pub fn size() -> io::Result<Size> {
    let (cols, rows) = crossterm::terminal::size()?;
    Ok(Size::new(usize::from(rows), usize::from(cols)))
  }

  /// Sends a whole frame in one write.
  pub fn write_frame(&mut self, frame: &mut OutputBuffer) -> output::Result<()> {
    frame.flush_to(&mut self.stdout)
  }

  /// Blocks until a key press or a resize arrives.
  pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
    loop {
      let event = match event::read() {
        Ok(event) => event,
        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
        Err(err) => return Err(err),
      };

      match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
          if let Some(key) = to_key_event(key) {
            return Ok(TerminalEvent::Key(key));
          }
        },
        Event::Resize(cols, rows) => {
          return Ok(TerminalEvent::Resize(Size::new(
            usize::from(rows),
            usize::from(cols),
          )));
        },
        _ => {},
      }
    }
  }

  fn queue_command<T: Command>(&mut self, command: T) -> io::Result<()> {
    queue!(self.stdout, command)?;
    Ok(())
  }
}

impl Drop for Terminal {
  fn drop(&mut self) {
    let _ = Self::terminate();
  }
}
