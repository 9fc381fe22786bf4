//! atto: a minimal full-screen terminal text editor.

mod input;
mod logging;
mod terminal;

use std::{
  path::PathBuf,
  process::ExitCode,
};

use anyhow::{
  Context,
  Result,
};
use atto_lib::{
  config::Config,
  document::Document,
  editor::Editor,
  output::OutputBuffer,
};
use clap::Parser;

use crate::terminal::{
  Terminal,
  TerminalEvent,
};

#[derive(Debug, Parser)]
#[command(name = "atto", version, about = "A minimal terminal text editor")]
struct Cli {
  /// Path to file to open
  file: Option<PathBuf>,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  atto_loader::initialize_log_file(None);
  if let Err(err) = logging::setup_logging(logging::level_from_env()) {
    eprintln!("atto: logging disabled: {err:#}");
  }

  atto_loader::initialize_config_file(None);
  let config = load_config();

  match run(cli.file, config) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      log::error!("{err:#}");
      eprintln!("{}", fatal_message(&err));
      ExitCode::FAILURE
    },
  }
}

/// One line for stderr: `atto: <context>: <cause>`.
fn fatal_message(err: &anyhow::Error) -> String {
  format!("atto: {err:#}")
}

fn load_config() -> Config {
  let path = atto_loader::config_file();
  atto_loader::read_config(&path).unwrap_or_else(|err| {
    log::warn!("{err}, falling back to the default config");
    Config::default()
  })
}

fn run(file: Option<PathBuf>, config: Config) -> Result<()> {
  let document = match &file {
    Some(path) => Document::open(path, config.tab_stop())
      .with_context(|| format!("failed to open {}", path.display()))?,
    None => Document::new(config.tab_stop()),
  };

  let mut terminal = Terminal::init().context("failed to enable raw mode")?;
  let size = Terminal::size().context("failed to query the window size")?;
  log::info!("starting with a {}x{} terminal", size.cols, size.rows);

  let mut editor = Editor::new(document, size, config);
  let mut frame = OutputBuffer::with_capacity(size.rows * (size.cols + 8));

  loop {
    editor.render(&mut frame).context("failed to render")?;
    terminal
      .write_frame(&mut frame)
      .context("failed to write to the terminal")?;

    match terminal.read_event().context("failed to read input")? {
      TerminalEvent::Key(key) => editor.handle_key(key),
      TerminalEvent::Resize(size) => editor.resize(size),
    }

    if editor.should_quit() {
      break;
    }
  }

  log::info!("quitting");
  Ok(())
}
