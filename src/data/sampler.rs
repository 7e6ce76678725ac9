//! One polling cycle: query both sources, merge, record history.

use chrono::Local;
use tracing::{debug, warn};

use super::history::{HistoryBuffer, HistoryEntry};
use super::snapshot::{DbStats, Snapshot};
use crate::source::{ProcessCountSource, StatsSource};

/// Owns both sources and the rolling history.
///
/// Sampling never fails: a source error becomes an absent sub-result in
/// the returned [`Snapshot`].
#[derive(Debug)]
pub struct Sampler {
    stats: Box<dyn StatsSource>,
    workers: Box<dyn ProcessCountSource>,
    history: HistoryBuffer,
}

impl Sampler {
    pub fn new(stats: Box<dyn StatsSource>, workers: Box<dyn ProcessCountSource>) -> Self {
        Self {
            stats,
            workers,
            history: HistoryBuffer::new(),
        }
    }

    /// Take one sample from both sources.
    ///
    /// A history entry is appended only when database stats were read.
    pub fn sample(&mut self) -> Snapshot {
        let timestamp = Local::now();

        let db = self.stats.fetch().map(DbStats::from_status);
        match &db {
            Ok(stats) => {
                debug!(
                    current = stats.status.current_connections,
                    max = stats.status.max_connections,
                    usage = stats.usage_percentage,
                    "database stats sampled"
                );
                self.history.push(HistoryEntry::from_stats(timestamp, stats));
            }
            Err(e) => warn!(
                source = self.stats.description(),
                kind = e.kind(),
                error = %e,
                "database stats unavailable"
            ),
        }

        let process_count = self.workers.fetch();
        match &process_count {
            Ok(count) => debug!(count, "worker connections sampled"),
            Err(e) => warn!(
                source = self.workers.description(),
                kind = e.kind(),
                error = %e,
                "worker count unavailable"
            ),
        }

        Snapshot {
            timestamp,
            db,
            process_count,
        }
    }

    /// History as of the most recent sample.
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}
