//! Logging setup.
//!
//! - JSON log file with daily rotation under the data directory
//! - Optional pretty stdout layer (omitted while the TUI owns the terminal)
//! - `log` macros bridged into `tracing`
//! - Older rotated logs gzip-compressed in the background

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Base name of the rolling log file.
pub const LOG_FILE_NAME: &str = "smartdoc.log";

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Where log output should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File plus pretty stdout (command-line subcommands).
    Console,
    /// File only; the TUI owns the terminal.
    Tui,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown.
pub fn init(log_dir: &Path, mode: LogMode) -> WorkerGuard {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory {}: {e}", log_dir.display());
        }
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    let stdout_layer = match mode {
        LogMode::Console => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .compact()
                .with_filter(env_filter()),
        ),
        LogMode::Tui => None,
    };

    // `try_init` also installs the `log` -> `tracing` bridge.
    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }

    let log_dir_clone = log_dir.to_path_buf();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    log::info!(
        "Logging initialized. Writing to: {} (daily rolling)",
        log_dir.join(LOG_FILE_NAME).display()
    );

    guard
}

/// Whether a file in the log directory is a finished rotation to compress.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    match name.strip_prefix(LOG_FILE_NAME) {
        Some(rest) => rest.starts_with('.') && !name.ends_with(today_suffix) && !name.ends_with(".gz"),
        None => false,
    }
}

/// Compress rotated log files other than today's.
fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(Some(gz)) => log::info!("Compressed old log: {}", gz.display()),
            Ok(None) => {}
            Err(e) => log::warn!("Failed to compress old log {}: {e}", path.display()),
        }
    }
}

/// Gzip `path` next to itself and remove the original.
///
/// Returns the archive path, or `None` if an archive already existed.
fn compress_file(path: &Path) -> io::Result<Option<PathBuf>> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);

    if gz_path.exists() {
        return Ok(None);
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(Some(gz_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_should_compress() {
        let today = "2026-10-19";
        assert!(should_compress("smartdoc.log.2026-10-18", today));
        assert!(!should_compress("smartdoc.log.2026-10-19", today));
        assert!(!should_compress("smartdoc.log.2026-10-18.gz", today));
        assert!(!should_compress("smartdoc.log", today));
        assert!(!should_compress("other.log.2026-10-18", today));
    }

    #[test]
    fn test_compress_file_replaces_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartdoc.log.2026-10-18");
        fs::write(&path, b"{\"level\":\"INFO\"}\n").unwrap();

        let gz = compress_file(&path).unwrap().unwrap();
        assert!(!path.exists());
        assert_eq!(gz.file_name().unwrap(), "smartdoc.log.2026-10-18.gz");

        let mut text = String::new();
        GzDecoder::new(fs::File::open(&gz).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert!(text.contains("INFO"));
    }

    #[test]
    fn test_compress_file_skips_existing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartdoc.log.2026-10-17");
        fs::write(&path, b"x").unwrap();
        fs::write(dir.path().join("smartdoc.log.2026-10-17.gz"), b"old").unwrap();

        assert!(compress_file(&path).unwrap().is_none());
        assert!(path.exists());
    }
}
