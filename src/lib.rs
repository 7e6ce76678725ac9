//! # mariadb-monitor
//!
//! A live terminal dashboard for a MariaDB server and the PHP-FPM workers
//! talking to it.
//!
//! Every five seconds the monitor reads the server's connection counters,
//! its busiest sessions and per-user connection counts, counts the web
//! workers' open connections, and redraws a fixed-layout screen of
//! severity-colored gauges, tables and a short connection history.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (loop)  │    │ (sample) │    │(render) │    │         │ │
//! │  └────┬────┘    └────┬─────┘    └─────────┘    └─────────┘ │
//! │       │              │                                      │
//! │       ▼              ▼                                      │
//! │  ┌─────────┐    ┌─────────┐                                 │
//! │  │ events  │    │ source  │◀── MySqlStatsSource | NetstatCounter
//! │  │ (input) │    │ (fetch) │                                 │
//! │  └─────────┘    └─────────┘                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: The event loop: sample, draw, then an interruptible wait
//! - **[`source`]**: [`StatsSource`] and [`ProcessCountSource`] traits with the
//!   MariaDB and `netstat` implementations
//! - **[`data`]**: Snapshots, severity tiers, the rolling history and the
//!   [`Sampler`] that ties them together
//! - **[`ui`]**: ratatui rendering of the dashboard
//! - **[`config`]**: Layered settings (defaults, TOML file, environment)
//! - **[`error`]**: Source failure taxonomy
//!
//! Either source can fail on any cycle without affecting the other; the
//! dashboard shows an explicit marker for whatever is missing.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Dashboard with built-in connection settings
//! mariadb-monitor
//!
//! # Settings file, and a single JSON sample instead of the dashboard
//! mariadb-monitor --config /etc/mariadb-monitor.toml --once
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::time::Duration;
//! use mariadb_monitor::{MySqlStatsSource, NetstatCounter, Sampler, Settings};
//!
//! let settings = Settings::default();
//! let stats = MySqlStatsSource::new(settings.connection());
//! let workers = NetstatCounter::netstat("php-fpm", Duration::from_secs(2)).unwrap();
//!
//! let mut sampler = Sampler::new(Box::new(stats), Box::new(workers));
//! let snapshot = sampler.sample();
//! if let Some(db) = snapshot.db_stats() {
//!     println!("{:.1}% of connections in use ({:?})", db.usage_percentage, db.tier());
//! }
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, LoopTiming, Phase, REFRESH_INTERVAL};
pub use config::Settings;
pub use data::{
    DbStats, HistoryBuffer, HistoryEntry, ProcessRow, Sampler, ServerStatus, SeverityTier,
    Snapshot, UserConnections,
};
pub use error::SourceError;
pub use events::{InputSource, TerminalInput};
pub use source::{MySqlStatsSource, NetstatCounter, ProcessCountSource, StatsSource};
pub use ui::{DashboardRenderer, Theme};
