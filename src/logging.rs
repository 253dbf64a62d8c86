//! Console and file logging for debug builds.
//!
//! Release builds keep Bevy's `LogPlugin`. Debug builds install their own
//! subscriber that also appends to `logs/waymark.log`, so `main` disables the
//! plugin whenever [`init`] returns a guard.

use std::path::Path;

use chrono::{DateTime, Local};

pub const LOG_FILE: &str = "waymark.log";
const DEFAULT_FILTER: &str = "info,waymark=debug";

/// Header written between runs in the shared log file
pub fn session_banner(started: DateTime<Local>) -> String {
    let rule = "=".repeat(80);
    format!(
        "\n\n{rule}\n=== waymark {} started {} ===\n{rule}\n",
        env!("CARGO_PKG_VERSION"),
        started.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(debug_assertions)]
pub type LogGuard = tracing_appender::non_blocking::WorkerGuard;

#[cfg(not(debug_assertions))]
pub type LogGuard = ();

/// Install the stdout + file subscriber. The guard flushes the file on drop.
#[cfg(debug_assertions)]
pub fn init(logs_dir: &Path) -> Option<LogGuard> {
    use std::io::Write;
    use tracing_subscriber::prelude::*;

    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        eprintln!("Failed to create logs directory {:?}: {}", logs_dir, e);
        return None;
    }

    if let Ok(mut file) = std::fs::OpenOptions::new()
        .append(true)
        .open(logs_dir.join(LOG_FILE))
    {
        let _ = file.write_all(session_banner(Local::now()).as_bytes());
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(logs_dir, LOG_FILE));

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .try_init();

    match installed {
        Ok(()) => Some(guard),
        Err(e) => {
            eprintln!("Failed to install log subscriber: {}", e);
            None
        }
    }
}

#[cfg(not(debug_assertions))]
pub fn init(_logs_dir: &Path) -> Option<LogGuard> {
    None
}
