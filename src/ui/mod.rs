//! Terminal UI rendering using ratatui.
//!
//! The dashboard is a single fixed-layout screen drawn by
//! [`DashboardRenderer::render`]. Sections are placed at fixed row offsets
//! from the top and clipped to the frame; nothing is reflowed for small
//! terminals.
//!
//! ## Submodules
//!
//! - [`gauge`]: Uniform labeled usage gauge and fill math
//! - [`stats`]: Server statistics and connections-by-user tables
//! - [`activity`]: Active process table and connection history chart
//! - [`common`]: Title, footer, full-screen messages and layout helpers
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Title, clock and rule (common::render_title)         │
//! ├──────────────────────────────────────────────────────┤
//! │ Gauges (gauge::render_gauge), 4 rows each            │
//! ├───────────────────────────┬──────────────────────────┤
//! │ stats::render_stats       │ activity::render_processes│
//! │ stats::render_users       │ activity::render_history │
//! ├───────────────────────────┴──────────────────────────┤
//! │ Footer (common::render_footer)                       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! An empty snapshot replaces all of this with a centered no-data message.

pub mod activity;
pub mod common;
pub mod gauge;
pub mod stats;
pub mod theme;

pub use gauge::GaugeReading;
pub use theme::{Theme, ThemeMode};

use ratatui::{layout::Rect, widgets::Clear, Frame};

use crate::data::{HistoryBuffer, Locale, Snapshot};

/// Rows taken by the title block and the blank row under it.
const HEADER_ROWS: u16 = 4;

/// Label of the worker gauge.
pub const WORKER_LABEL: &str = "PHP-FPM Connections";

/// Left margin of each column.
const COLUMN_MARGIN: u16 = 2;

/// Draws snapshots onto a frame.
///
/// Holds only presentation settings; snapshot and history are borrowed
/// read-only for each frame.
#[derive(Debug, Clone)]
pub struct DashboardRenderer {
    pub theme: Theme,
    pub locale: Locale,
    /// Worker pool size the worker gauge is drawn against.
    pub worker_capacity: u64,
}

impl DashboardRenderer {
    pub fn new(theme: Theme, locale: Locale, worker_capacity: u64) -> Self {
        Self {
            theme,
            locale,
            worker_capacity,
        }
    }

    /// Gauges for whichever sources produced data, in display order.
    ///
    /// A failed worker count has no reading; [`Self::render`] draws an
    /// unavailable marker in its place.
    pub fn gauges(&self, snapshot: &Snapshot) -> Vec<GaugeReading> {
        let mut gauges = Vec::with_capacity(3);
        if let Some(db) = snapshot.db_stats() {
            let status = &db.status;
            gauges.push(GaugeReading::new(
                "MariaDB Connections",
                status.current_connections,
                status.max_connections,
            ));
            gauges.push(GaugeReading::new(
                "Running Threads",
                status.threads_running,
                status.current_connections.max(1),
            ));
        }
        if let Some(count) = snapshot.worker_count() {
            gauges.push(GaugeReading::new(
                WORKER_LABEL,
                count,
                self.worker_capacity,
            ));
        }
        gauges
    }

    /// Draw one full dashboard frame.
    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, history: &HistoryBuffer) {
        let area = frame.area();
        let theme = &self.theme;
        // A failed draw leaves its cells in the frame buffer.
        frame.render_widget(Clear, area);

        if snapshot.is_empty() {
            common::render_no_data(frame, theme, area);
            return;
        }

        common::render_title(frame, theme, area, snapshot.timestamp);

        let mut y = area.y.saturating_add(HEADER_ROWS);
        for gauge in self.gauges(snapshot) {
            gauge::render_gauge(
                frame,
                theme,
                self.locale,
                common::band(area, y, gauge::GAUGE_HEIGHT),
                &gauge,
            );
            y = y.saturating_add(gauge::GAUGE_HEIGHT);
        }
        if snapshot.worker_count().is_none() {
            gauge::render_unavailable(frame, theme, common::band(area, y, 1), WORKER_LABEL);
            y = y.saturating_add(2);
        }

        let top = y.saturating_add(1);
        // Columns stop above the footer.
        let bottom = area.bottom().saturating_sub(2).max(top);
        let (left, right) = columns(area, top, bottom - top);

        let db = snapshot.db_stats();
        let used = stats::render_stats(frame, theme, self.locale, left, db);
        stats::render_users(
            frame,
            theme,
            common::below(left, used + 1),
            db.map(|db| db.status.user_connections.as_slice()),
        );

        let used = activity::render_processes(
            frame,
            theme,
            right,
            db.map(|db| db.status.active_processes.as_slice()),
        );
        activity::render_history(frame, theme, common::below(right, used + 1), history);

        common::render_footer(frame, theme, area);
    }

    /// Draw a transient cycle error in place of the dashboard.
    pub fn render_transient_error(&self, frame: &mut Frame, message: &str) {
        let area = frame.area();
        frame.render_widget(Clear, area);
        common::render_error(frame, &self.theme, area, message);
    }
}

/// Split rows `top..top + height` of `area` into the two side-by-side columns.
fn columns(area: Rect, top: u16, height: u16) -> (Rect, Rect) {
    let half = area.width / 2;
    let left = Rect::new(
        area.x.saturating_add(COLUMN_MARGIN),
        top,
        half.saturating_sub(COLUMN_MARGIN),
        height,
    );
    let right = Rect::new(
        area.x.saturating_add(half).saturating_add(COLUMN_MARGIN),
        top,
        area.width.saturating_sub(half).saturating_sub(COLUMN_MARGIN),
        height,
    );
    (left.intersection(area), right.intersection(area))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DbStats, HistoryEntry, ProcessRow, ServerStatus, UserConnections};
    use crate::error::SourceError;
    use chrono::Local;
    use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};

    fn text(buffer: &Buffer) -> Vec<String> {
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    fn renderer() -> DashboardRenderer {
        DashboardRenderer::new(Theme::dark(), Locale::English, 150)
    }

    fn stats(current: u64, max: u64) -> DbStats {
        DbStats::from_status(ServerStatus {
            max_connections: max,
            current_connections: current,
            threads_running: 2,
            max_used_connections: 40,
            aborted_connects: 3,
            active_processes: vec![ProcessRow {
                user: Some("app".into()),
                host: Some("localhost".into()),
                database: Some("shop".into()),
                command: Some("Query".into()),
                elapsed_seconds: 4,
                state: None,
            }],
            user_connections: vec![UserConnections {
                user: Some("app".into()),
                count: current,
            }],
        })
    }

    fn snapshot(
        db: Result<DbStats, SourceError>,
        workers: Result<u64, SourceError>,
    ) -> Snapshot {
        Snapshot {
            timestamp: Local::now(),
            db,
            process_count: workers,
        }
    }

    fn draw(snapshot: &Snapshot, history: &HistoryBuffer, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| renderer().render(frame, snapshot, history))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn find(lines: &[String], needle: &str) -> Option<usize> {
        lines.iter().position(|line| line.contains(needle))
    }

    #[test]
    fn test_empty_snapshot_renders_only_no_data_message() {
        let empty = snapshot(
            Err(SourceError::Connection("refused".into())),
            Err(SourceError::Command("netstat: not found".into())),
        );
        let buffer = draw(&empty, &HistoryBuffer::new(), 100, 30);
        let lines = text(&buffer);

        let row = find(&lines, "Cannot fetch any data").unwrap();
        assert_eq!(row, 15);
        assert!(lines[16].contains("Check services and permissions"));
        assert!(find(&lines, "[").is_none());
        assert!(find(&lines, "Active Processes").is_none());
        assert!(find(&lines, common::TITLE).is_none());
    }

    #[test]
    fn test_full_dashboard() {
        let mut history = HistoryBuffer::new();
        for current in [10, 20] {
            history.push(HistoryEntry::from_stats(Local::now(), &stats(current, 150)));
        }
        let snap = snapshot(Ok(stats(20, 150)), Ok(12));
        let buffer = draw(&snap, &history, 140, 40);
        let lines = text(&buffer);

        assert!(lines[0].contains(common::TITLE));
        assert!(lines[2].starts_with("────"));
        assert!(lines[4].contains("MariaDB Connections:"));
        assert!(lines[8].contains("Running Threads:"));
        assert!(lines[12].contains("PHP-FPM Connections:"));
        assert!(lines[13].contains("(12/150)"));

        let code = lines[4].find("[SAFE]").unwrap();
        assert_eq!(buffer[(code as u16, 4)].fg, Color::Green);

        // columns start one blank row below the last gauge
        assert!(lines[17].starts_with("  MariaDB Statistics"));
        assert_eq!(lines[17].find("Active Processes"), Some(72));
        assert!(find(&lines, "Connections by User").is_some());
        assert!(find(&lines, "Connection History").is_some());
        assert!(lines[38].contains(common::FOOTER));
    }

    #[test]
    fn test_stats_failure_degrades_sections() {
        let snap = snapshot(Err(SourceError::Query("gone".into())), Ok(30));
        let buffer = draw(&snap, &HistoryBuffer::new(), 140, 40);
        let lines = text(&buffer);

        assert!(find(&lines, "MariaDB Connections:").is_none());
        assert!(lines[4].contains("PHP-FPM Connections:"));
        assert!(find(&lines, "MariaDB data not available").is_some());
        assert!(find(&lines, "No active processes or data unavailable").is_some());
        assert!(find(&lines, "Data unavailable").is_some());
        assert!(find(&lines, "Collecting history...").is_some());
    }

    #[test]
    fn test_worker_failure_shows_marker() {
        let snap = snapshot(
            Ok(stats(20, 150)),
            Err(SourceError::Command("netstat: not found".into())),
        );
        let buffer = draw(&snap, &HistoryBuffer::new(), 140, 40);
        let lines = text(&buffer);

        assert!(lines[4].contains("MariaDB Connections:"));
        assert!(lines[8].contains("Running Threads:"));
        assert!(lines[12].starts_with("     PHP-FPM Connections: data unavailable"));
        let marker = lines[12].find("data unavailable").unwrap();
        assert_eq!(buffer[(marker as u16, 12)].fg, Color::Yellow);
        assert!(find(&lines, "(12/150)").is_none());

        // columns move up into the space the full gauge would have used
        assert!(lines[15].starts_with("  MariaDB Statistics"));
        assert!(lines[38].contains(common::FOOTER));
    }

    #[test]
    fn test_worker_failure_leaves_two_gauges() {
        let snap = snapshot(Ok(stats(75, 150)), Err(SourceError::Timeout(Default::default())));
        let gauges = renderer().gauges(&snap);
        assert_eq!(gauges.len(), 2);
        assert_eq!(gauges[0].percentage(), 50.0);
        assert_eq!(gauges[1], GaugeReading::new("Running Threads", 2, 75));
    }

    #[test]
    fn test_running_threads_gauge_never_divides_by_zero() {
        let snap = snapshot(Ok(stats(0, 150)), Ok(0));
        let gauges = renderer().gauges(&snap);
        assert_eq!(gauges[1].maximum, 1);
    }

    #[test]
    fn test_tiny_terminal_is_clipped() {
        let snap = snapshot(Ok(stats(140, 150)), Ok(149));
        let buffer = draw(&snap, &HistoryBuffer::new(), 20, 5);
        assert_eq!(buffer.area, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_transient_error_message() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|frame| renderer().render_transient_error(frame, "draw failed"))
            .unwrap();
        let lines = text(terminal.backend().buffer());
        assert!(lines[5].contains("Error: draw failed"));
    }

    #[test]
    fn test_error_screen_replaces_stale_cells() {
        let snap = snapshot(Ok(stats(20, 150)), Ok(12));
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|frame| {
                renderer().render(frame, &snap, &HistoryBuffer::new());
                renderer().render_transient_error(frame, "draw failed");
            })
            .unwrap();
        let lines = text(terminal.backend().buffer());
        assert!(find(&lines, common::TITLE).is_none());
        assert!(lines[20].contains("Error: draw failed"));
    }
}
