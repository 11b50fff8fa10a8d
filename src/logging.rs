//! Rotating file-log bootstrap.
//!
//! The store emits sparse `event=... module=... status=...` lines at its
//! operation boundaries (db open, export, import). This module routes them
//! through the `log` facade into size-rotated files, initialized at most
//! once per process.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "notestore";
const ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;

static LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    log_dir: PathBuf,
    // Dropping the handle would stop the background flusher.
    _handle: LoggerHandle,
}

/// Starts rotating file logging under `log_dir`.
///
/// The first call in a process wins. Later calls against the same
/// directory are no-ops; pointing an already-initialized process at a
/// different directory is an error. `level` is any `flexi_logger` level
/// spec, e.g. `"info"` or `"notestore=debug"`.
///
/// # Errors
/// - `log_dir` cannot be created.
/// - `level` is not a valid level spec.
/// - Logging is already active under a different directory.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), String> {
    let log_dir = log_dir.as_ref();

    let active = LOGGER.get_or_try_init(|| start_logger(level, log_dir))?;

    if active.log_dir != log_dir {
        return Err(format!(
            "logging already writes to `{}`, cannot move it to `{}`",
            active.log_dir.display(),
            log_dir.display()
        ));
    }

    Ok(())
}

/// Returns the log level spec used when the embedding front end has no
/// opinion: verbose for debug builds, quiet for release.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &str, log_dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "cannot create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("bad log level `{level}`: {err}"))?
        .log_to_file(FileSpec::default().directory(log_dir).basename(LOG_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))?;

    info!(
        "event=logging_init module=logging status=ok level={level} log_dir={} version={}",
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}
