//! Rolling connection history for the trend chart.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use super::snapshot::DbStats;

/// Maximum number of history entries to keep.
pub const HISTORY_CAPACITY: usize = 30;

/// One retained connection sample.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub current_connections: u64,
    pub usage_percentage: f64,
}

impl HistoryEntry {
    pub fn from_stats(timestamp: DateTime<Local>, stats: &DbStats) -> Self {
        Self {
            timestamp,
            current_connections: stats.status.current_connections,
            usage_percentage: stats.usage_percentage,
        }
    }
}

/// Bounded, chronologically ordered buffer of [`HistoryEntry`].
///
/// Once full, each push evicts the oldest entry. Entries are never
/// reordered or modified after insertion.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    /// Create an empty buffer holding up to [`HISTORY_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest first when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The last `min(n, len)` entries, oldest first.
    ///
    /// The returned iterator is lazy and can be cloned to walk it again.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> + Clone + '_ {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(i: u64) -> HistoryEntry {
        HistoryEntry {
            timestamp: Local::now() + Duration::seconds(i as i64),
            current_connections: i,
            usage_percentage: i as f64,
        }
    }

    fn connections<'a>(iter: impl Iterator<Item = &'a HistoryEntry>) -> Vec<u64> {
        iter.map(|e| e.current_connections).collect()
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = HistoryBuffer::new();
        for i in 0..31 {
            history.push(entry(i));
        }

        assert_eq!(history.len(), 30);
        let all = connections(history.recent(usize::MAX));
        assert_eq!(all, (1..31).collect::<Vec<_>>());
    }

    #[test]
    fn test_recent_on_short_buffer() {
        let mut history = HistoryBuffer::new();
        for i in 0..5 {
            history.push(entry(i));
        }

        assert_eq!(connections(history.recent(10)), vec![0, 1, 2, 3, 4]);
        assert_eq!(connections(history.recent(2)), vec![3, 4]);
        assert_eq!(history.recent(0).count(), 0);
    }

    #[test]
    fn test_recent_is_restartable() {
        let mut history = HistoryBuffer::new();
        for i in 0..12 {
            history.push(entry(i));
        }

        let recent = history.recent(10);
        let max = recent.clone().map(|e| e.current_connections).max();
        assert_eq!(max, Some(11));
        assert_eq!(connections(recent), (2..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_buffer() {
        let history = HistoryBuffer::default();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert_eq!(history.capacity(), HISTORY_CAPACITY);
        assert_eq!(history.recent(10).count(), 0);
    }

    #[test]
    fn test_from_stats() {
        let stats = DbStats::from_status(crate::data::ServerStatus {
            max_connections: 200,
            current_connections: 50,
            ..Default::default()
        });
        let now = Local::now();
        let entry = HistoryEntry::from_stats(now, &stats);
        assert_eq!(entry.current_connections, 50);
        assert_eq!(entry.usage_percentage, 25.0);
        assert_eq!(entry.timestamp, now);
    }
}
