//! File-backed tracing setup. Stdout belongs to the TUI, so logs never go there.

use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FOLIO_LOG";

pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("folio").join("folio.log"))
}

/// Installs the global subscriber. Returns `false` when the log file can't be opened.
pub fn init_global(log_file_path: &Path) -> bool {
    if let Some(parent) = log_file_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    let Ok(log_file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
    else {
        return false;
    };
    build_subscriber(log_file, env_filter()).try_init().is_ok()
}

/// `FOLIO_LOG` wins over `RUST_LOG`; both fall back to `info`.
pub fn env_filter() -> EnvFilter {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .unwrap_or_default();
    filter_from(&directives)
}

fn filter_from(directives: &str) -> EnvFilter {
    if directives.trim().is_empty() {
        return EnvFilter::new("info");
    }
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn build_subscriber(
    log_file: File,
    filter: EnvFilter,
) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}
