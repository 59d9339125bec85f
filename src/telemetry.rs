//! Log subscriber setup.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "TOPOWATCH_LOG";

/// Where log output should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// The terminal is free (one-shot modes): log to stderr.
    Stderr,
    /// The terminal belongs to the UI: log to the configured file, or not at all.
    FileOnly,
}

/// Pick the filter directive: env override first, then the configured level.
pub fn filter_directive(env: Option<String>, configured: &str) -> String {
    env.filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| configured.to_string())
}

/// Install the global subscriber.
pub fn init(settings: &Settings, target: LogTarget) -> Result<()> {
    let directive = filter_directive(std::env::var(LOG_ENV).ok(), &settings.log_level);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    match (&settings.log_file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!("failed to install logger: {}", e))
        }
        (None, LogTarget::Stderr) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!("failed to install logger: {}", e)),
        (None, LogTarget::FileOnly) => Ok(()),
    }
}
