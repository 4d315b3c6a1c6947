//! Tracing subscriber setup.
//!
//! The dashboard owns the terminal, so it logs to a daily rolling file.
//! Headless commands log to stderr, leaving stdout for command output.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "PAINEL_LOG";

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "painel.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Daily rolling file under the given directory.
    File(&'a Path),
    /// Standard error.
    Stderr,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Returns the appender guard when logging to a file; keep it alive until
/// exit so buffered lines are flushed. Installing twice is a no-op.
pub fn init(target: LogTarget<'_>) -> Option<WorkerGuard> {
    match target {
        LogTarget::File(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Warning: cannot create log directory {}: {}", dir.display(), e);
                return None;
            }
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .is_ok();
            installed.then_some(guard)
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
            None
        }
    }
}
