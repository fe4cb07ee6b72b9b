//! Tracing initialisation shared by the CLI and integration tests.
//!
//! [`init_logging`] installs a single global subscriber. Every later call is a
//! no-op that hands back whatever the first call resolved, so tests may call
//! it freely.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR_ENV: &str = "LOOKOUT_LOG_DIR";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where log events go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSink {
    /// Daily rolling file only.
    #[default]
    File,
    /// Rolling file plus a copy on `stderr`.
    FileAndStderr,
    /// `stderr` only; no directory is created.
    Stderr,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Component name, used for the default directory and the file name.
    pub app_name: &'static str,
    /// Explicit log directory. Falls back to `LOOKOUT_LOG_DIR`, then
    /// `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    pub sink: LogSink,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "lookout",
            log_dir: None,
            sink: LogSink::File,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns today's log file path, or `None` when logging to `stderr` only.
pub fn init_logging(config: LogConfig) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let (file_writer, full_path) = match config.sink {
        LogSink::Stderr => (None, None),
        LogSink::File | LogSink::FileAndStderr => {
            let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

            let file_name = format!("{}.log", config.app_name);
            let today = Local::now().format("%Y-%m-%d").to_string();
            let full_path = dir.join(format!("{file_name}.{today}"));

            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, file_name));
            let _ = LOG_GUARD.set(guard);
            (Some(writer), Some(full_path))
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let to_stderr = matches!(config.sink, LogSink::FileAndStderr);

    install(config.format, file_writer, to_stderr, env_filter)?;

    let _ = LOG_PATH.set(full_path.clone());
    tracing::debug!(app = config.app_name, path = ?full_path, "logging.initialised");
    Ok(full_path)
}

fn install(
    format: LogFormat,
    file: Option<NonBlocking>,
    also_stderr: bool,
    filter: EnvFilter,
) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(filter);
    let outcome = match (format, file, also_stderr) {
        (LogFormat::Text, Some(writer), false) => registry
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init(),
        (LogFormat::Text, Some(writer), true) => registry
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Text, None, _) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Json, Some(writer), false) => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        (LogFormat::Json, Some(writer), true) => registry
            .with(fmt::layer().json().with_writer(writer))
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Json, None, _) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    outcome.map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        if !env_dir.trim().is_empty() {
            return expand_home(Path::new(&env_dir));
        }
    }

    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(app_name),
        Err(_) => PathBuf::from(".").join(app_name),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_over_env() {
        temp_env::with_vars(
            [(LOG_DIR_ENV, Some("/tmp/from-env")), ("HOME", Some("/home/u"))],
            || {
                let dir = resolve_log_dir("lookout", Some(Path::new("~/logs")));
                assert_eq!(dir, PathBuf::from("/home/u/logs"));
            },
        );
    }

    #[test]
    fn env_dir_used_when_no_explicit_dir() {
        temp_env::with_var(LOG_DIR_ENV, Some("/tmp/from-env"), || {
            assert_eq!(
                resolve_log_dir("lookout", None),
                PathBuf::from("/tmp/from-env")
            );
        });
    }

    #[test]
    fn falls_back_to_home_data_dir() {
        temp_env::with_vars(
            [(LOG_DIR_ENV, None::<&str>), ("HOME", Some("/home/u"))],
            || {
                assert_eq!(
                    resolve_log_dir("lookout", None),
                    PathBuf::from("/home/u/.local/share/lookout")
                );
            },
        );
    }
}
