use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "TASKBOARD_LOG";

/// Default log file for the TUI
pub fn log_path() -> PathBuf {
    super::config_dir().join("taskboard.log")
}

/// Build the filter: `TASKBOARD_LOG` wins, then `[log] level`, then `fallback`.
pub fn build_filter(env: Option<&str>, configured: Option<&str>, fallback: &str) -> EnvFilter {
    [env, configured]
        .into_iter()
        .flatten()
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// CLI logging: stderr, quiet unless asked.
pub fn init_cli(configured: Option<&str>) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env.as_deref(), configured, "warn");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// TUI logging: append to a file so the alternate screen stays clean.
/// Logging is skipped if the file cannot be opened.
pub fn init_tui(path: &Path, configured: Option<&str>) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env.as_deref(), configured, "info");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
