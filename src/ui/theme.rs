//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection. Only
//! the neutral colors change between themes; tier colors are fixed.

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::data::Signal;

/// Which theme to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Section titles and metric labels.
    pub accent: Color,
    /// Plain text, separators and empty bar cells.
    pub text: Color,
    /// Informational values (configured limits).
    pub info: Color,
    /// Table headers.
    pub header: Style,
    /// Footer and other secondary text.
    pub muted: Style,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            text: Color::White,
            info: Color::Blue,
            header: Style::default().fg(Color::Cyan),
            muted: Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            accent: Color::Blue,
            text: Color::Black,
            info: Color::Blue,
            header: Style::default().fg(Color::Blue),
            muted: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::auto_detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Foreground color for a signal.
    pub fn signal_color(&self, signal: Signal) -> Color {
        match signal {
            Signal::Info => self.info,
            Signal::Green => Color::Green,
            Signal::Yellow => Color::Yellow,
            Signal::Red => Color::Red,
        }
    }

    pub fn signal_style(&self, signal: Signal) -> Style {
        Style::default().fg(self.signal_color(signal))
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Bold accent, used for section titles.
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_colors_do_not_depend_on_theme() {
        for theme in [Theme::dark(), Theme::light()] {
            assert_eq!(theme.signal_color(Signal::Green), Color::Green);
            assert_eq!(theme.signal_color(Signal::Yellow), Color::Yellow);
            assert_eq!(theme.signal_color(Signal::Red), Color::Red);
        }
    }

    #[test]
    fn test_from_mode() {
        assert_eq!(Theme::from_mode(ThemeMode::Dark).text, Color::White);
        assert_eq!(Theme::from_mode(ThemeMode::Light).text, Color::Black);
    }
}
