//! Logging setup
//!
//! The terminal UI owns the screen, so in that mode logs are appended to a
//! file instead of stderr.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// File name of the log written in terminal UI mode
pub const LOG_FILE_NAME: &str = "rosterboard.log";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Log file inside a directory
    pub fn file_in(dir: &Path) -> Self {
        LogTarget::File(dir.join(LOG_FILE_NAME))
    }
}

/// Initialize structured logging with tracing-subscriber.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to the provided level.
pub fn init(log_level: &str, target: &LogTarget) -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_target_uses_log_file_name() {
        let target = LogTarget::file_in(Path::new("/tmp/rosterboard"));
        assert_eq!(
            target,
            LogTarget::File(PathBuf::from("/tmp/rosterboard/rosterboard.log"))
        );
    }
}
