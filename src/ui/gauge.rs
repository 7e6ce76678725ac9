//! Labeled usage gauges.
//!
//! Every gauge on the dashboard is drawn by [`render_gauge`]:
//!
//! ```text
//!      MariaDB Connections:     [SAFE]
//!      [████████░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░]  20.0% (30/150)
//!        Safe
//! ```

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::common::{band, format_count};
use super::theme::Theme;
use crate::data::{ratio_percent, Locale, SeverityTier, Signal, Tier};

/// Cells inside the brackets.
pub const BAR_WIDTH: usize = 40;

/// Rows taken by one gauge, trailing blank row included.
pub const GAUGE_HEIGHT: u16 = 4;

/// Left indent of every gauge.
pub const GAUGE_INDENT: u16 = 5;

/// Column where the bracketed tier code starts.
const CODE_COLUMN: usize = 25;

/// One gauge to draw: a label and a `current` out of `maximum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeReading {
    pub label: &'static str,
    pub current: u64,
    pub maximum: u64,
}

impl GaugeReading {
    pub fn new(label: &'static str, current: u64, maximum: u64) -> Self {
        Self {
            label,
            current,
            maximum,
        }
    }

    pub fn percentage(&self) -> f64 {
        ratio_percent(self.current, self.maximum)
    }

    pub fn tier(&self) -> SeverityTier {
        SeverityTier::classify(self.percentage())
    }
}

/// Filled cells for `current` out of `maximum` on a bar of `bar_width`.
///
/// Integer truncation of `bar_width * current / maximum`, capped at the bar
/// width. An empty maximum draws an empty bar.
pub fn filled_width(bar_width: usize, current: u64, maximum: u64) -> usize {
    if maximum == 0 {
        return 0;
    }
    let filled = bar_width as u128 * current as u128 / maximum as u128;
    filled.min(bar_width as u128) as usize
}

/// Bar spans for a `width`-cell bar with `filled` cells in the tier style.
pub(crate) fn bar_spans(
    theme: &Theme,
    width: usize,
    filled: usize,
    style: Style,
) -> [Span<'static>; 2] {
    let filled = filled.min(width);
    [
        Span::styled("█".repeat(filled), style),
        Span::styled("░".repeat(width - filled), theme.text_style()),
    ]
}

/// Draw `gauge` in the top rows of `area`.
pub fn render_gauge(
    frame: &mut Frame,
    theme: &Theme,
    locale: Locale,
    area: Rect,
    gauge: &GaugeReading,
) {
    let tier = gauge.tier();
    let color = theme.signal_style(tier.signal());
    let bold = color.add_modifier(Modifier::BOLD);

    let heading = format!("{}:", gauge.label);
    let heading = format!("{:<width$}", heading, width = CODE_COLUMN);
    let label_line = Line::from(vec![
        Span::styled(heading, theme.title_style()),
        Span::styled(format!("[{}]", tier.code()), bold),
    ]);

    let [filled, empty] = bar_spans(
        theme,
        BAR_WIDTH,
        filled_width(BAR_WIDTH, gauge.current, gauge.maximum),
        bold,
    );
    let bar_line = Line::from(vec![
        Span::styled("[", theme.text_style()),
        filled,
        empty,
        Span::styled("]", theme.text_style()),
        Span::styled(
            format!(
                "  {:5.1}% ({}/{})",
                gauge.percentage(),
                format_count(gauge.current),
                format_count(gauge.maximum)
            ),
            color,
        ),
    ]);

    let status_line = Line::from(Span::styled(format!("  {}", tier.label(locale)), bold));

    let indented = Rect {
        x: area.x.saturating_add(GAUGE_INDENT),
        width: area.width.saturating_sub(GAUGE_INDENT),
        ..area
    };
    frame.render_widget(
        Paragraph::new(vec![label_line, bar_line, status_line]),
        band(indented, indented.y, GAUGE_HEIGHT - 1),
    );
}

/// Draw the one-line stand-in for a gauge whose source failed.
pub fn render_unavailable(frame: &mut Frame, theme: &Theme, area: Rect, label: &str) {
    let line = Line::from(vec![
        Span::styled(format!("{}: ", label), theme.title_style()),
        Span::styled("data unavailable", theme.signal_style(Signal::Yellow)),
    ]);
    let indented = Rect {
        x: area.x.saturating_add(GAUGE_INDENT),
        width: area.width.saturating_sub(GAUGE_INDENT),
        ..area
    };
    frame.render_widget(Paragraph::new(line), band(indented, indented.y, 1));
}
