use std::str::FromStr;

use anyhow::{
  Context,
  Result,
};
use log::LevelFilter;

/// Level from `ATTO_LOG` (`off`, `error` .. `trace`), `warn` when unset or
/// unparsable.
pub fn level_from_env() -> LevelFilter {
  std::env::var("ATTO_LOG")
    .ok()
    .and_then(|level| LevelFilter::from_str(level.trim()).ok())
    .unwrap_or(LevelFilter::Warn)
}

/// Sends log records to the log file. The terminal belongs to the editor, so
/// nothing is ever logged to stdout or stderr.
pub fn setup_logging(level: LevelFilter) -> Result<()> {
  if level == LevelFilter::Off {
    return Ok(());
  }

  let log_file = atto_loader::log_file();
  let file_config = fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ));
    })
    .chain(
      fern::log_file(&log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?,
    );

  fern::Dispatch::new()
    .level(level)
    .chain(file_config)
    .apply()
    .context("logger already initialized")?;

  Ok(())
}
