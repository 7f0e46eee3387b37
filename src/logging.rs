// Log destination setup
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "cloudopt.log";

/// One-shot commands log to stderr so JSON on stdout stays parseable. The
/// dashboard owns the terminal, so its logs go to [`LOG_FILE_NAME`] next to
/// the config file, or nowhere if that file cannot be opened.
pub fn init_logging(verbose: bool, interactive: bool, config_path: &Path) {
    let default_filter = if verbose { "cloudopt=debug" } else { "cloudopt=warn" };
    let builder = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
    );

    if !interactive {
        builder.with_writer(std::io::stderr).init();
        return;
    }

    match open_log_file(&log_file_path(config_path)) {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

pub fn log_file_path(config_path: &Path) -> PathBuf {
    config_path.with_file_name(LOG_FILE_NAME)
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
