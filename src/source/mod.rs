//! Data source abstraction for the two polled collaborators.
//!
//! The dashboard reads from two independent, failure-prone sources: the
//! database server's status counters and a local count of web-worker
//! connections. Both are traits so the sampling loop can be driven by
//! real backends in production and by in-memory fakes in tests.

mod mariadb;
mod netstat;

pub use self::mariadb::{ConnectionSettings, MySqlStatsSource};
pub use self::netstat::{count_matching_lines, NetstatCounter};

use std::fmt::Debug;

use crate::data::ServerStatus;
use crate::error::SourceError;

/// Reads server status counters.
///
/// A fetch is all-or-nothing: any connection, authentication or query
/// failure yields an error and no partial status. Implementations must
/// bound how long a call can take so the polling cycle cannot hang.
pub trait StatsSource: Send + Debug {
    fn fetch(&mut self) -> Result<ServerStatus, SourceError>;

    /// Human-readable description for logs.
    fn description(&self) -> &str;
}

/// Counts live web-worker connections.
///
/// A failure must be reported as an error, never as a zero count, so the
/// dashboard can tell "none observed" from "could not look".
pub trait ProcessCountSource: Send + Debug {
    fn fetch(&mut self) -> Result<u64, SourceError>;

    /// Human-readable description for logs.
    fn description(&self) -> &str;
}
