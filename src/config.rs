//! Layered settings.
//!
//! Built-in defaults, then an optional `topowatch.{toml,yaml,json}` in the
//! working directory (or an explicit file), then `TOPOWATCH_*` environment
//! variables. Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Color scheme selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Detect from the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

/// Viewer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Poll interval for file sources, in milliseconds.
    pub refresh_ms: u64,
    pub theme: ThemeMode,
    /// Default log filter when `TOPOWATCH_LOG` is unset.
    pub log_level: String,
    /// Where TUI-mode logs go. Unset means logging is off while the UI runs.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_ms: 1000,
            theme: ThemeMode::Auto,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings, reading `path` if given instead of the default file name.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("refresh_ms", 1000)?
            .set_default("theme", "auto")?
            .set_default("log_level", "info")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("topowatch").required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix("TOPOWATCH"))
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(settings)
    }

    /// Refresh interval as a duration, never below 50ms.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(50))
    }
}
