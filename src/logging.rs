use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use time::UtcOffset;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, fmt, prelude::*};

const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Get the log directory path in the user-specific OS cache directory
/// - Linux: ~/.cache/fusion-language-server/
/// - macOS: ~/Library/Caches/fusion-language-server/
/// - Windows: %LOCALAPPDATA%\fusion-language-server\
fn get_log_dir() -> io::Result<PathBuf> {
    let cache_dir = dirs::cache_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Unable to determine user cache directory",
        )
    })?;

    let log_dir = cache_dir.join("fusion-language-server");
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// Removes session logs in `log_dir` last modified more than `retention` ago.
/// Returns the number of files removed.
fn cleanup_old_logs(log_dir: &Path, retention: Duration) -> usize {
    let now = SystemTime::now();
    let Ok(entries) = fs::read_dir(log_dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !(name.starts_with("session-") && name.ends_with(".log")) {
            continue;
        }

        let expired = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > retention);
        if !expired {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("Failed to remove old log file {:?}: {}", entry.path(), e),
        }
    }
    removed
}

fn session_log_name() -> String {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))
        .unwrap_or_else(|_| "unknown".to_string());
    format!("session-{}-{}.log", timestamp, std::process::id())
}

fn already_set(e: &impl std::fmt::Display) -> bool {
    let message = e.to_string();
    message.contains("already been set") || message.contains("SetLoggerError")
}

/// Initialize logger with stderr and optional file output
/// Returns a WorkerGuard that must be kept alive for the duration of the program
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Override log level (otherwise uses RUST_LOG or defaults to "info")
/// * `enable_file_logging` - Write a DEBUG-level session log to the cache directory
///
/// Stdout carries the LSP protocol, so nothing is ever logged there.
pub fn init_logger(
    no_color: bool,
    log_level: Option<&str>,
    enable_file_logging: bool,
) -> io::Result<WorkerGuard> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let stderr_filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    if !enable_file_logging {
        let (_, guard) = tracing_appender::non_blocking(std::io::sink());
        return match tracing_subscriber::registry().with(stderr_layer).try_init() {
            Ok(()) => Ok(guard),
            Err(e) if already_set(&e) => Ok(guard),
            Err(e) => Err(io::Error::other(e)),
        };
    }

    let log_dir = get_log_dir()?;
    let removed = cleanup_old_logs(&log_dir, LOG_RETENTION);
    if removed > 0 {
        eprintln!("Removed {} old log files", removed);
    }

    let log_path = log_dir.join(session_log_name());
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_timer(timer)
        .with_ansi(false)
        .with_filter(tracing_subscriber::EnvFilter::new("debug"));

    let result = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    match result {
        Ok(()) => {
            eprintln!("Logging to file: {:?}", log_path);
            Ok(guard)
        }
        Err(e) if already_set(&e) => Ok(guard),
        Err(e) => Err(io::Error::other(e)),
    }
}
