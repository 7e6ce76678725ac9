//! Left column: server statistics and connections by user.

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::common::{band, below, format_count, render_heading};
use super::theme::Theme;
use crate::data::{
    session_signal, AbortHealth, DbStats, Locale, PeakUsage, SeverityTier, Signal, ThreadLoad,
    Tier, UserConnections,
};

const STATS_RULE: u16 = 60;
const USERS_RULE: u16 = 30;
const LABEL_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 10;
const USER_WIDTH: usize = 15;

/// One statistics row: label, value and a colored status.
struct StatRow {
    label: &'static str,
    value: u64,
    signal: Signal,
    status: &'static str,
}

impl StatRow {
    fn tiered(label: &'static str, value: u64, tier: impl Tier, locale: Locale) -> Self {
        Self {
            label,
            value,
            signal: tier.signal(),
            status: tier.label(locale),
        }
    }
}

fn stat_rows(stats: &DbStats, locale: Locale) -> [StatRow; 5] {
    let status = &stats.status;
    [
        StatRow::tiered(
            "Current Connections",
            status.current_connections,
            SeverityTier::classify(stats.usage_percentage),
            locale,
        ),
        StatRow {
            label: "Max Connections",
            value: status.max_connections,
            signal: Signal::Info,
            status: "Config",
        },
        StatRow::tiered(
            "Running Threads",
            status.threads_running,
            ThreadLoad::classify(stats.thread_ratio()),
            locale,
        ),
        StatRow::tiered(
            "Max Used Ever",
            status.max_used_connections,
            PeakUsage::classify(stats.peak_usage()),
            locale,
        ),
        StatRow::tiered(
            "Aborted Connects",
            status.aborted_connects,
            AbortHealth::classify(status.aborted_connects),
            locale,
        ),
    ]
}

/// Draw the statistics table at the top of `area`; returns the rows used.
pub fn render_stats(
    frame: &mut Frame,
    theme: &Theme,
    locale: Locale,
    area: Rect,
    stats: Option<&DbStats>,
) -> u16 {
    render_heading(frame, theme, area, "MariaDB Statistics", STATS_RULE);
    let body = below(area, 2);

    let Some(stats) = stats else {
        let marker = Span::styled(
            "MariaDB data not available",
            theme.signal_style(Signal::Yellow),
        );
        frame.render_widget(Paragraph::new(marker), band(body, body.y, 1));
        return 3;
    };

    let lines: Vec<Line> = stat_rows(stats, locale)
        .into_iter()
        .map(|row| {
            let color = theme.signal_style(row.signal);
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", format!("{}:", row.label), width = LABEL_WIDTH),
                    theme.text_style(),
                ),
                Span::styled(
                    format!("{:<width$}", format_count(row.value), width = VALUE_WIDTH),
                    color.add_modifier(Modifier::BOLD),
                ),
                Span::styled(row.status, color),
            ])
        })
        .collect();
    let used = lines.len() as u16;
    frame.render_widget(Paragraph::new(lines), band(body, body.y, used));
    2 + used
}

/// Draw the connections-by-user table at the top of `area`.
pub fn render_users(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    users: Option<&[UserConnections]>,
) -> u16 {
    render_heading(frame, theme, area, "Connections by User", USERS_RULE);
    let body = below(area, 2);

    let users = users.unwrap_or_default();
    if users.is_empty() {
        let marker = Span::styled("Data unavailable", theme.signal_style(Signal::Yellow));
        frame.render_widget(Paragraph::new(marker), band(body, body.y, 1));
        return 3;
    }

    let lines: Vec<Line> = users
        .iter()
        .map(|entry| {
            let name = format!("{}:", entry.user.as_deref().unwrap_or("N/A"));
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", name, width = USER_WIDTH),
                    theme.text_style(),
                ),
                Span::styled(
                    format_count(entry.count),
                    theme
                        .signal_style(session_signal(entry.count))
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();
    let used = lines.len() as u16;
    frame.render_widget(Paragraph::new(lines), band(body, body.y, used));
    2 + used
}
