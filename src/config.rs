//! Layered settings.
//!
//! Built-in defaults, then an optional TOML file, then environment
//! variables prefixed `MARIADB_MONITOR_` with `__` between nesting levels:
//!
//! ```toml
//! [database]
//! host = "db.internal"
//! user = "monitor"
//! password = "secret"
//!
//! [workers]
//! filter = "php-fpm"
//! capacity = 200
//!
//! [display]
//! locale = "th"
//! ```
//!
//! ```bash
//! MARIADB_MONITOR_DATABASE__HOST=10.0.0.5 mariadb-monitor
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::app::REFRESH_INTERVAL;
use crate::data::Locale;
use crate::source::{ConnectionSettings, NetstatCounter};
use crate::ui::ThemeMode;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "mariadb-monitor";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MARIADB_MONITOR";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub workers: WorkerSettings,
    pub display: DisplaySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "mreport".to_string(),
            password: "M@1234".to_string(),
            database: "mreport".to_string(),
            timeout_secs: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Command listing network connections.
    pub program: String,
    pub args: Vec<String>,
    /// Process-name substring a line must contain to be counted.
    pub filter: String,
    /// Worker pool size the gauge is drawn against (`pm.max_children`).
    pub capacity: u64,
    pub timeout_secs: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            program: "netstat".to_string(),
            args: vec!["-tapn".to_string()],
            filter: "php-fpm".to_string(),
            capacity: 150,
            timeout_secs: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub locale: Locale,
    pub theme: ThemeMode,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log destination; logging is off when unset.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    ///
    /// An explicit `path` must exist; otherwise `mariadb-monitor.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would break the polling contract.
    pub fn validate(&self) -> Result<()> {
        check_timeout("database.timeout_secs", self.database.timeout_secs)?;
        check_timeout("workers.timeout_secs", self.workers.timeout_secs)?;
        if self.workers.capacity == 0 {
            bail!("workers.capacity must be greater than zero");
        }
        if self.workers.filter.trim().is_empty() {
            bail!("workers.filter must not be empty");
        }
        if self.workers.program.trim().is_empty() {
            bail!("workers.program must not be empty");
        }
        Ok(())
    }

    pub fn connection(&self) -> ConnectionSettings {
        let db = &self.database;
        ConnectionSettings {
            host: db.host.clone(),
            port: db.port,
            user: db.user.clone(),
            password: db.password.clone(),
            database: db.database.clone(),
            timeout: Duration::from_secs(db.timeout_secs),
        }
    }

    pub fn worker_counter(&self) -> Result<NetstatCounter> {
        let w = &self.workers;
        NetstatCounter::new(
            w.program.clone(),
            w.args.clone(),
            w.filter.clone(),
            Duration::from_secs(w.timeout_secs),
        )
        .context("failed to start worker counter runtime")
    }
}

fn check_timeout(name: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        bail!("{} must be at least 1 second", name);
    }
    if Duration::from_secs(secs) >= REFRESH_INTERVAL {
        bail!(
            "{} ({}s) must be shorter than the {}s refresh interval",
            name,
            secs,
            REFRESH_INTERVAL.as_secs()
        );
    }
    Ok(())
}
