// src/log.rs
//
// One subscriber, two sinks: stderr for the operator and `<data_dir>/debug.log`
// (appended, no ANSI) for after-the-fact digging. Timestamps are time since start.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::{self, time::Uptime};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::consts::LOG_FILE;

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Returns the log file path, or `None` when the file could not be opened
/// (logging then goes to stderr only). Calling it again is a no-op.
pub fn init(data_dir: &Path, verbose: bool) -> Option<PathBuf> {
    let default = if verbose { "ufc_scrape=debug" } else { "ufc_scrape=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let path = data_dir.join(LOG_FILE);
    let file = open_append(&path).ok();
    let logged_to = file.as_ref().map(|_| path.clone());

    let file_layer = file.map(|f| {
        fmt::layer()
            .with_ansi(false)
            .with_timer(Uptime::default())
            .with_writer(Mutex::new(f))
    });
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_timer(Uptime::default())
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    logged_to
}

fn open_append(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_file_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let path = init(&data, false).expect("log file opened");
        assert_eq!(path, data.join("debug.log"));
        assert!(path.is_file());

        // Second install is ignored, not a panic.
        init(&data, true);
    }
}
