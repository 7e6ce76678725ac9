//! Threshold classification.
//!
//! Maps utilization ratios and counts to fixed severity tiers. Every tier
//! family partitions its domain into half-open, left-inclusive intervals
//! with no gaps, and every tier carries a fixed [`Signal`] color and a
//! pair of display labels.
//!
//! The boundaries are constants on purpose: they are part of how the
//! dashboard is read, not a tuning knob.

use serde::{Deserialize, Serialize};

/// Display language for status labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en", alias = "english")]
    English,
    #[serde(rename = "th", alias = "thai")]
    Thai,
}

/// Color family a classification is shown in.
///
/// Kept separate from terminal colors so classification stays free of any
/// rendering dependency; the theme maps signals to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    /// Informational value, not a health judgement.
    Info,
    Green,
    Yellow,
    Red,
}

/// A classification that can be drawn: a color, a short code and a label.
pub trait Tier: Copy {
    /// The fixed color of this tier.
    fn signal(self) -> Signal;

    /// Upper-case code, always English (e.g. `SAFE`).
    fn code(self) -> &'static str;

    /// Human label in the given locale.
    fn label(self, locale: Locale) -> &'static str;
}

/// Six-level severity of a utilization percentage, ordered by ascending risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityTier {
    Safe,
    Good,
    Moderate,
    High,
    Critical,
    Danger,
}

impl SeverityTier {
    /// All tiers, lowest risk first.
    pub const ALL: [SeverityTier; 6] = [
        SeverityTier::Safe,
        SeverityTier::Good,
        SeverityTier::Moderate,
        SeverityTier::High,
        SeverityTier::Critical,
        SeverityTier::Danger,
    ];

    /// Classify a percentage.
    ///
    /// Total over `[0, +inf)`: values above 100 land in `Danger`. Negative
    /// input and NaN are treated as zero.
    pub fn classify(percentage: f64) -> Self {
        if percentage.is_nan() || percentage < 30.0 {
            SeverityTier::Safe
        } else if percentage < 50.0 {
            SeverityTier::Good
        } else if percentage < 70.0 {
            SeverityTier::Moderate
        } else if percentage < 85.0 {
            SeverityTier::High
        } else if percentage < 95.0 {
            SeverityTier::Critical
        } else {
            SeverityTier::Danger
        }
    }

    /// The half-open `[lower, upper)` percentage interval of this tier.
    pub fn range(self) -> (f64, f64) {
        match self {
            SeverityTier::Safe => (0.0, 30.0),
            SeverityTier::Good => (30.0, 50.0),
            SeverityTier::Moderate => (50.0, 70.0),
            SeverityTier::High => (70.0, 85.0),
            SeverityTier::Critical => (85.0, 95.0),
            SeverityTier::Danger => (95.0, f64::INFINITY),
        }
    }
}

impl Tier for SeverityTier {
    fn signal(self) -> Signal {
        match self {
            SeverityTier::Safe | SeverityTier::Good => Signal::Green,
            SeverityTier::Moderate | SeverityTier::High => Signal::Yellow,
            SeverityTier::Critical | SeverityTier::Danger => Signal::Red,
        }
    }

    fn code(self) -> &'static str {
        match self {
            SeverityTier::Safe => "SAFE",
            SeverityTier::Good => "GOOD",
            SeverityTier::Moderate => "MODERATE",
            SeverityTier::High => "HIGH",
            SeverityTier::Critical => "CRITICAL",
            SeverityTier::Danger => "DANGER",
        }
    }

    fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::English, SeverityTier::Safe) => "Safe",
            (Locale::English, SeverityTier::Good) => "Good",
            (Locale::English, SeverityTier::Moderate) => "Moderate",
            (Locale::English, SeverityTier::High) => "High",
            (Locale::English, SeverityTier::Critical) => "Critical",
            (Locale::English, SeverityTier::Danger) => "Danger!",
            (Locale::Thai, SeverityTier::Safe) => "ปลอดภัย",
            (Locale::Thai, SeverityTier::Good) => "ดี",
            (Locale::Thai, SeverityTier::Moderate) => "ปานกลาง",
            (Locale::Thai, SeverityTier::High) => "สูง",
            (Locale::Thai, SeverityTier::Critical) => "วิกฤต",
            (Locale::Thai, SeverityTier::Danger) => "อันตราย!",
        }
    }
}

/// Pressure from running threads relative to connected ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThreadLoad {
    Light,
    Normal,
    Heavy,
}

impl ThreadLoad {
    /// Classify a running/connected percentage.
    pub fn classify(ratio: f64) -> Self {
        if ratio.is_nan() || ratio < 30.0 {
            ThreadLoad::Light
        } else if ratio < 60.0 {
            ThreadLoad::Normal
        } else {
            ThreadLoad::Heavy
        }
    }
}

impl Tier for ThreadLoad {
    fn signal(self) -> Signal {
        match self {
            ThreadLoad::Light => Signal::Green,
            ThreadLoad::Normal => Signal::Yellow,
            ThreadLoad::Heavy => Signal::Red,
        }
    }

    fn code(self) -> &'static str {
        match self {
            ThreadLoad::Light => "LIGHT",
            ThreadLoad::Normal => "NORMAL",
            ThreadLoad::Heavy => "HEAVY",
        }
    }

    fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::English, ThreadLoad::Light) => "Light",
            (Locale::English, ThreadLoad::Normal) => "Normal",
            (Locale::English, ThreadLoad::Heavy) => "Heavy",
            (Locale::Thai, ThreadLoad::Light) => "เบา",
            (Locale::Thai, ThreadLoad::Normal) => "ปกติ",
            (Locale::Thai, ThreadLoad::Heavy) => "หนัก",
        }
    }
}

/// Health of the cumulative aborted-connect counter (absolute count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbortHealth {
    Excellent,
    Normal,
    Abnormal,
}

impl AbortHealth {
    pub fn classify(count: u64) -> Self {
        match count {
            0 => AbortHealth::Excellent,
            1..=9 => AbortHealth::Normal,
            _ => AbortHealth::Abnormal,
        }
    }
}

impl Tier for AbortHealth {
    fn signal(self) -> Signal {
        match self {
            AbortHealth::Excellent => Signal::Green,
            AbortHealth::Normal => Signal::Yellow,
            AbortHealth::Abnormal => Signal::Red,
        }
    }

    fn code(self) -> &'static str {
        match self {
            AbortHealth::Excellent => "EXCELLENT",
            AbortHealth::Normal => "NORMAL",
            AbortHealth::Abnormal => "ABNORMAL",
        }
    }

    fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::English, AbortHealth::Excellent) => "Excellent",
            (Locale::English, AbortHealth::Normal) => "Normal",
            (Locale::English, AbortHealth::Abnormal) => "Abnormal",
            (Locale::Thai, AbortHealth::Excellent) => "เยี่ยม",
            (Locale::Thai, AbortHealth::Normal) => "ปกติ",
            (Locale::Thai, AbortHealth::Abnormal) => "ผิดปกติ",
        }
    }
}

/// Historical peak connections relative to the configured ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeakUsage {
    Low,
    Normal,
    High,
}

impl PeakUsage {
    pub fn classify(percentage: f64) -> Self {
        if percentage.is_nan() || percentage < 50.0 {
            PeakUsage::Low
        } else if percentage < 80.0 {
            PeakUsage::Normal
        } else {
            PeakUsage::High
        }
    }
}

impl Tier for PeakUsage {
    fn signal(self) -> Signal {
        match self {
            PeakUsage::Low => Signal::Green,
            PeakUsage::Normal => Signal::Yellow,
            PeakUsage::High => Signal::Red,
        }
    }

    fn code(self) -> &'static str {
        match self {
            PeakUsage::Low => "LOW",
            PeakUsage::Normal => "NORMAL",
            PeakUsage::High => "HIGH",
        }
    }

    fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::English, PeakUsage::Low) => "Low",
            (Locale::English, PeakUsage::Normal) => "Normal",
            (Locale::English, PeakUsage::High) => "High",
            (Locale::Thai, PeakUsage::Low) => "ต่ำ",
            (Locale::Thai, PeakUsage::Normal) => "ปกติ",
            (Locale::Thai, PeakUsage::High) => "สูง",
        }
    }
}

/// Color for a session's elapsed time in seconds.
pub fn elapsed_signal(seconds: u64) -> Signal {
    if seconds < 10 {
        Signal::Green
    } else if seconds < 60 {
        Signal::Yellow
    } else {
        Signal::Red
    }
}

/// Color for the number of sessions a single user holds.
pub fn session_signal(count: u64) -> Signal {
    if count < 10 {
        Signal::Green
    } else if count < 50 {
        Signal::Yellow
    } else {
        Signal::Red
    }
}

/// Color for a history bar, by the usage recorded with it.
pub fn trend_signal(usage: f64) -> Signal {
    if usage.is_nan() || usage < 50.0 {
        Signal::Green
    } else if usage < 80.0 {
        Signal::Yellow
    } else {
        Signal::Red
    }
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub fn ratio_percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
