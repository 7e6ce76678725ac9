//! Common UI components shared across sections.
//!
//! This module contains the title block, footer, full-screen messages and
//! the small layout and formatting helpers the sections build on.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::theme::Theme;
use crate::data::Signal;

/// Dashboard title shown on the first row.
pub const TITLE: &str = "MariaDB & PHP-FPM Real-time Monitor";

/// Footer hint shown on the second to last row.
pub const FOOTER: &str = "Press 'q' to quit | Updates every 5 seconds";

/// Horizontal rule glyph.
const RULE: char = '─';

/// A `height`-row band of `area` starting at absolute row `y`, clipped to `area`.
///
/// Bands that fall outside `area` come back empty, so drawing into them is
/// a no-op.
pub fn band(area: Rect, y: u16, height: u16) -> Rect {
    Rect::new(area.x, y, area.width, height).intersection(area)
}

/// `area` with its first `rows` rows removed.
pub fn below(area: Rect, rows: u16) -> Rect {
    let rows = rows.min(area.height);
    Rect::new(area.x, area.y + rows, area.width, area.height - rows)
}

/// A rule of `width` glyphs.
pub fn rule(width: u16) -> String {
    std::iter::repeat(RULE).take(width as usize).collect()
}

/// Format a count with thousands separators (e.g. 12345 -> "12,345").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Clip `text` to `width - 1` characters and pad it to `width`.
///
/// Keeps one column of air between table cells.
pub fn cell_text(text: Option<&str>, width: usize) -> String {
    let text = text.unwrap_or("N/A");
    let clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{:<width$}", clipped, width = width)
}

/// Render the centered title, the sample time and a full-width rule.
///
/// `timestamp` is when the snapshot was taken, so redraws between samples
/// keep showing it.
pub fn render_title(frame: &mut Frame, theme: &Theme, area: Rect, timestamp: DateTime<Local>) {
    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, band(area, area.y, 1));

    let clock = Paragraph::new(timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .style(theme.text_style())
        .alignment(Alignment::Center);
    frame.render_widget(clock, band(area, area.y + 1, 1));

    let separator = Paragraph::new(rule(area.width)).style(theme.text_style());
    frame.render_widget(separator, band(area, area.y + 2, 1));
}

/// Render a section heading with a rule of `rule_width` below it.
pub fn render_heading(frame: &mut Frame, theme: &Theme, area: Rect, title: &str, rule_width: u16) {
    let lines = vec![
        Line::from(Span::styled(title.to_string(), theme.title_style())),
        Line::from(Span::styled(rule(rule_width), theme.text_style())),
    ];
    frame.render_widget(Paragraph::new(lines), band(area, area.y, 2));
}

/// Render the footer hint on the second to last row.
pub fn render_footer(frame: &mut Frame, theme: &Theme, area: Rect) {
    let Some(row) = area.bottom().checked_sub(2) else {
        return;
    };
    let footer = Paragraph::new(FOOTER)
        .style(theme.muted)
        .alignment(Alignment::Center);
    frame.render_widget(footer, band(area, row.max(area.y), 1));
}

/// Render the full-screen message shown when no source produced data.
pub fn render_no_data(frame: &mut Frame, theme: &Theme, area: Rect) {
    let middle = area.y + area.height / 2;
    let headline = Paragraph::new(Span::styled(
        "Cannot fetch any data",
        theme
            .signal_style(Signal::Red)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(headline, band(area, middle, 1));

    let hint = Paragraph::new("Check services and permissions")
        .style(theme.text_style())
        .alignment(Alignment::Center);
    frame.render_widget(hint, band(area, middle + 1, 1));
}

/// Render a transient error message in the middle of the screen.
pub fn render_error(frame: &mut Frame, theme: &Theme, area: Rect, message: &str) {
    let middle = area.y + area.height / 2;
    let text = Paragraph::new(Span::styled(
        format!("Error: {}", message),
        theme
            .signal_style(Signal::Red)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(text, band(area, middle, 1));
}
