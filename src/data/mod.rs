//! Data models, classification and sampling.
//!
//! ## Submodules
//!
//! - [`tier`]: threshold classification ([`SeverityTier`] and the smaller tier families)
//! - [`snapshot`]: per-cycle models ([`Snapshot`], [`DbStats`], [`ProcessRow`])
//! - [`history`]: the bounded [`HistoryBuffer`] behind the trend chart
//! - [`sampler`]: the [`Sampler`] that runs one polling cycle
//!
//! ## Data Flow
//!
//! ```text
//! StatsSource::fetch()        ProcessCountSource::fetch()
//!        │                              │
//!        ▼                              │
//! DbStats::from_status()                │
//!        │                              │
//!        ├──▶ HistoryBuffer::push()     │
//!        ▼                              ▼
//!              Snapshot { db, process_count }
//! ```

pub mod history;
pub mod sampler;
pub mod snapshot;
pub mod tier;

pub use history::{HistoryBuffer, HistoryEntry, HISTORY_CAPACITY};
pub use sampler::Sampler;
pub use snapshot::{
    DbStats, ProcessRow, ServerStatus, Snapshot, UserConnections, MAX_ACTIVE_PROCESSES,
    MAX_USER_CONNECTIONS,
};
pub use tier::{
    elapsed_signal, ratio_percent, session_signal, trend_signal, AbortHealth, Locale, PeakUsage,
    SeverityTier, Signal, ThreadLoad, Tier,
};
