//! Point-in-time data models.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::tier::{ratio_percent, SeverityTier};
use crate::error::SourceError;

/// Most active sessions kept per snapshot.
pub const MAX_ACTIVE_PROCESSES: usize = 8;

/// Most per-user connection counts kept per snapshot.
pub const MAX_USER_CONNECTIONS: usize = 5;

/// One non-idle server session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProcessRow {
    pub user: Option<String>,
    pub host: Option<String>,
    pub database: Option<String>,
    pub command: Option<String>,
    pub elapsed_seconds: u64,
    pub state: Option<String>,
}

/// Number of sessions held by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserConnections {
    pub user: Option<String>,
    pub count: u64,
}

/// Raw server counters as read by a stats source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ServerStatus {
    pub max_connections: u64,
    pub current_connections: u64,
    pub threads_running: u64,
    pub max_used_connections: u64,
    pub aborted_connects: u64,
    /// Non-idle sessions, longest running first.
    pub active_processes: Vec<ProcessRow>,
    /// Sessions per user, busiest first.
    pub user_connections: Vec<UserConnections>,
}

/// Server counters plus the derived connection usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbStats {
    #[serde(flatten)]
    pub status: ServerStatus,
    pub usage_percentage: f64,
}

impl DbStats {
    /// Derive stats from raw counters.
    ///
    /// Enforces the row caps and orderings regardless of what the source
    /// returned.
    pub fn from_status(mut status: ServerStatus) -> Self {
        status
            .active_processes
            .sort_by(|a, b| b.elapsed_seconds.cmp(&a.elapsed_seconds));
        status.active_processes.truncate(MAX_ACTIVE_PROCESSES);
        status.user_connections.sort_by(|a, b| b.count.cmp(&a.count));
        status.user_connections.truncate(MAX_USER_CONNECTIONS);

        let usage_percentage = ratio_percent(status.current_connections, status.max_connections);
        Self {
            status,
            usage_percentage,
        }
    }

    /// Severity of the current connection usage.
    pub fn tier(&self) -> SeverityTier {
        SeverityTier::classify(self.usage_percentage)
    }

    /// Running threads as a percentage of connected ones, zero when
    /// nothing is connected.
    pub fn thread_ratio(&self) -> f64 {
        ratio_percent(self.status.threads_running, self.status.current_connections)
    }

    /// Historical peak as a percentage of the connection ceiling.
    pub fn peak_usage(&self) -> f64 {
        ratio_percent(self.status.max_used_connections, self.status.max_connections)
    }
}

/// One poll cycle's merged result.
///
/// Each sub-result is independent: either source may have failed while
/// the other succeeded.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub db: Result<DbStats, SourceError>,
    pub process_count: Result<u64, SourceError>,
}

impl Snapshot {
    pub fn db_stats(&self) -> Option<&DbStats> {
        self.db.as_ref().ok()
    }

    pub fn worker_count(&self) -> Option<u64> {
        self.process_count.as_ref().ok().copied()
    }

    /// True when neither source produced data.
    pub fn is_empty(&self) -> bool {
        self.db.is_err() && self.process_count.is_err()
    }

    /// JSON view of the snapshot, failures included.
    pub fn to_json(&self) -> serde_json::Value {
        let db = match &self.db {
            Ok(stats) => serde_json::json!({
                "status": "ok",
                "tier": stats.tier(),
                "stats": stats,
            }),
            Err(e) => serde_json::json!({
                "status": "unavailable",
                "kind": e.kind(),
                "error": e.to_string(),
            }),
        };
        let workers = match &self.process_count {
            Ok(count) => serde_json::json!({ "status": "ok", "count": count }),
            Err(e) => serde_json::json!({
                "status": "unavailable",
                "kind": e.kind(),
                "error": e.to_string(),
            }),
        };

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "database": db,
            "workers": workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(elapsed: u64) -> ProcessRow {
        ProcessRow {
            user: Some("app".to_string()),
            elapsed_seconds: elapsed,
            ..Default::default()
        }
    }

    #[test]
    fn test_usage_percentage() {
        let stats = DbStats::from_status(ServerStatus {
            max_connections: 150,
            current_connections: 75,
            ..Default::default()
        });
        assert_eq!(stats.usage_percentage, 50.0);
        assert_eq!(stats.tier(), SeverityTier::Moderate);
    }

    #[test]
    fn test_usage_percentage_zero_ceiling() {
        let stats = DbStats::from_status(ServerStatus {
            max_connections: 0,
            current_connections: 12,
            ..Default::default()
        });
        assert_eq!(stats.usage_percentage, 0.0);
        assert_eq!(stats.peak_usage(), 0.0);
    }

    #[test]
    fn test_rows_are_capped_and_ordered() {
        let status = ServerStatus {
            active_processes: (0..12).map(process).collect(),
            user_connections: (0..7)
                .map(|i| UserConnections {
                    user: Some(format!("u{}", i)),
                    count: i,
                })
                .collect(),
            ..Default::default()
        };
        let stats = DbStats::from_status(status);

        let elapsed: Vec<u64> =
            stats.status.active_processes.iter().map(|p| p.elapsed_seconds).collect();
        assert_eq!(elapsed, vec![11, 10, 9, 8, 7, 6, 5, 4]);

        let counts: Vec<u64> = stats.status.user_connections.iter().map(|u| u.count).collect();
        assert_eq!(counts, vec![6, 5, 4, 3, 2]);
    }

    #[test]
    fn test_thread_ratio_guards_zero_connections() {
        let stats = DbStats::from_status(ServerStatus {
            threads_running: 3,
            current_connections: 0,
            ..Default::default()
        });
        assert_eq!(stats.thread_ratio(), 0.0);

        let stats = DbStats::from_status(ServerStatus {
            threads_running: 2,
            current_connections: 8,
            ..Default::default()
        });
        assert_eq!(stats.thread_ratio(), 25.0);
    }

    #[test]
    fn test_snapshot_emptiness() {
        let snapshot = Snapshot {
            timestamp: Local::now(),
            db: Err(SourceError::Connection("refused".into())),
            process_count: Ok(0),
        };
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.worker_count(), Some(0));
        assert!(snapshot.db_stats().is_none());

        let snapshot = Snapshot {
            process_count: Err(SourceError::Command("netstat missing".into())),
            ..snapshot
        };
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_to_json_reports_failures() {
        let snapshot = Snapshot {
            timestamp: Local::now(),
            db: Ok(DbStats::from_status(ServerStatus {
                max_connections: 100,
                current_connections: 96,
                ..Default::default()
            })),
            process_count: Err(SourceError::Command("exit status 1".into())),
        };
        let json = snapshot.to_json();
        assert_eq!(json["database"]["status"], "ok");
        assert_eq!(json["database"]["tier"], "DANGER");
        assert_eq!(json["database"]["stats"]["current_connections"], 96);
        assert_eq!(json["workers"]["status"], "unavailable");
        assert_eq!(json["workers"]["kind"], "command");
    }
}
