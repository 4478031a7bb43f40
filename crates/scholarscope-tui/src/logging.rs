//! File-backed tracing. The terminal belongs to the UI, so nothing is ever
//! written to stdout or stderr once the alternate screen is up.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_FILE: &str = "scholarscope.log";

/// `<cache_dir>/scholarscope/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("scholarscope").join("logs"))
}

/// Install the global subscriber writing to `dir/scholarscope.log`.
///
/// `RUST_LOG` overrides the default `info` filter. The returned guard must be
/// held until exit or buffered lines are lost.
pub fn init(dir: &Path) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(dir)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholarscope_core::config_file;

    #[test]
    fn config_warnings_reach_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init(dir.path()).unwrap();

        let bad = dir.path().join("config.toml");
        fs::write(&bad, "this is = = not toml").unwrap();
        assert!(config_file::load_from_path(&bad).is_none());

        // Dropping the guard flushes the non-blocking writer.
        drop(guard);
        let log = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert!(log.contains("ignoring unparseable config file"));
    }
}
