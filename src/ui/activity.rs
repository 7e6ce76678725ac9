//! Right column: active processes and the connection history chart.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::common::{band, below, cell_text, render_heading};
use super::gauge::{bar_spans, filled_width};
use super::theme::Theme;
use crate::data::{elapsed_signal, trend_signal, HistoryBuffer, ProcessRow, Signal};

const PROCESS_RULE: u16 = 60;
const HISTORY_RULE: u16 = 40;

/// Entries drawn in the history chart.
pub const HISTORY_ROWS: usize = 10;

/// Cells in one history bar.
pub const HISTORY_BAR_WIDTH: usize = 20;

/// Process table columns: header and width.
const COLUMNS: [(&str, u16); 5] = [
    ("User", 12),
    ("Host", 18),
    ("DB", 10),
    ("Cmd", 10),
    ("Time", 8),
];

/// Draw the active process table at the top of `area`; returns the rows used.
pub fn render_processes(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    processes: Option<&[ProcessRow]>,
) -> u16 {
    render_heading(frame, theme, area, "Active Processes", PROCESS_RULE);
    let body = below(area, 2);

    let processes = processes.unwrap_or_default();
    if processes.is_empty() {
        let marker = Span::styled(
            "No active processes or data unavailable",
            theme.signal_style(Signal::Yellow),
        );
        frame.render_widget(Paragraph::new(marker), band(body, body.y, 1));
        return 3;
    }

    let header = Row::new(COLUMNS.iter().map(|(name, _)| Cell::from(*name))).style(theme.header);
    let rows = processes.iter().map(|process| {
        let text_cell = |value: &Option<String>, column: usize| {
            Cell::from(cell_text(value.as_deref(), COLUMNS[column].1 as usize))
        };
        Row::new(vec![
            text_cell(&process.user, 0),
            text_cell(&process.host, 1),
            text_cell(&process.database, 2),
            text_cell(&process.command, 3),
            Cell::from(Span::styled(
                format!("{}s", process.elapsed_seconds),
                theme.signal_style(elapsed_signal(process.elapsed_seconds)),
            )),
        ])
        .style(theme.text_style())
    });

    let widths = COLUMNS.map(|(_, width)| Constraint::Length(width));
    let table = Table::new(rows, widths).header(header).column_spacing(0);

    let used = 1 + processes.len() as u16;
    frame.render_widget(table, band(body, body.y, used));
    2 + used
}

/// Draw the connection history chart at the top of `area`.
///
/// Bars are scaled to the busiest of the entries shown.
pub fn render_history(frame: &mut Frame, theme: &Theme, area: Rect, history: &HistoryBuffer) {
    render_heading(frame, theme, area, "Connection History", HISTORY_RULE);
    let body = below(area, 2);

    if history.len() < 2 {
        let placeholder = Span::styled("Collecting history...", theme.text_style());
        frame.render_widget(Paragraph::new(placeholder), band(body, body.y, 1));
        return;
    }

    let entries = history.recent(HISTORY_ROWS);
    let scale = entries
        .clone()
        .map(|entry| entry.current_connections)
        .max()
        .unwrap_or(0)
        .max(1);

    let lines: Vec<Line> = entries
        .map(|entry| {
            let filled = filled_width(HISTORY_BAR_WIDTH, entry.current_connections, scale);
            let color = theme.signal_style(trend_signal(entry.usage_percentage));
            let [bar, rest] = bar_spans(theme, HISTORY_BAR_WIDTH, filled, color);
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    theme.text_style(),
                ),
                bar,
                rest,
                Span::styled(
                    format!(
                        " {:3} ({:4.1}%)",
                        entry.current_connections, entry.usage_percentage
                    ),
                    theme.text_style(),
                ),
            ])
        })
        .collect();
    let used = lines.len() as u16;
    frame.render_widget(Paragraph::new(lines), band(body, body.y, used));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HistoryEntry;
    use chrono::{Local, TimeZone};
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

    fn entry(second: u32, connections: u64, usage: f64) -> HistoryEntry {
        HistoryEntry {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap(),
            current_connections: connections,
            usage_percentage: usage,
        }
    }

    fn process(user: Option<&str>, seconds: u64) -> ProcessRow {
        ProcessRow {
            user: user.map(String::from),
            host: Some("10.0.0.12:51234".into()),
            database: None,
            command: Some("Query".into()),
            elapsed_seconds: seconds,
            state: Some("Sending data".into()),
        }
    }

    #[test]
    fn test_process_table() {
        let mut terminal = Terminal::new(TestBackend::new(70, 8)).unwrap();
        let theme = Theme::dark();
        let processes = vec![
            process(Some("reporting_service"), 75),
            process(None, 12),
            process(Some("app"), 3),
        ];
        terminal
            .draw(|frame| {
                let used = render_processes(frame, &theme, frame.area(), Some(processes.as_slice()));
                assert_eq!(used, 6);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let lines = text(buffer);
        assert!(lines[2].starts_with("User        Host"));
        assert!(lines[3].starts_with("reporting_s 10.0.0.12:51234   N/A       Query     75s"));
        assert!(lines[4].starts_with("N/A         10.0.0.12:51234   N/A       Query     12s"));
        assert_eq!(buffer[(50, 3)].fg, Color::Red);
        assert_eq!(buffer[(50, 4)].fg, Color::Yellow);
        assert_eq!(buffer[(50, 5)].fg, Color::Green);
    }

    #[test]
    fn test_empty_process_list_marker() {
        let mut terminal = Terminal::new(TestBackend::new(60, 4)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                render_processes(frame, &theme, frame.area(), Some(&[][..]));
            })
            .unwrap();
        let lines = text(terminal.backend().buffer());
        assert!(lines[2].starts_with("No active processes or data unavailable"));
    }

    #[test]
    fn test_history_placeholder_below_two_entries() {
        let mut history = HistoryBuffer::new();
        history.push(entry(0, 10, 6.7));

        let mut terminal = Terminal::new(TestBackend::new(60, 4)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_history(frame, &theme, frame.area(), &history))
            .unwrap();
        let lines = text(terminal.backend().buffer());
        assert!(lines[2].starts_with("Collecting history..."));
    }

    #[test]
    fn test_history_bars_scale_to_busiest_entry() {
        let mut history = HistoryBuffer::new();
        history.push(entry(0, 10, 6.7));
        history.push(entry(5, 40, 26.7));
        history.push(entry(10, 140, 93.3));

        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_history(frame, &theme, frame.area(), &history))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let lines = text(buffer);
        assert!(lines[2].starts_with("12:00:00 █░"));
        assert!(lines[2].contains("  10 ( 6.7%)"));
        // 40 of 140 fills 5 of 20 cells
        assert!(lines[3].starts_with("12:00:05 █████░"));
        assert!(lines[4].starts_with("12:00:10 ████████████████████ 140 (93.3%)"));
        assert_eq!(buffer[(9, 2)].fg, Color::Green);
        assert_eq!(buffer[(9, 4)].fg, Color::Red);
    }
}
