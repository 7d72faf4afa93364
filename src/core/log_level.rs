//! Log level definitions
//!
//! A level is a display name plus a numeric value. Only the value takes part
//! in comparisons, so two levels with the same value are the same level.

use super::error::LoggerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub struct LogLevel {
    name: &'static str,
    value: u32,
}

impl LogLevel {
    /// Passes every level filter.
    pub const ANY: LogLevel = LogLevel::new("Any", 0);
    pub const DEBUG: LogLevel = LogLevel::new("Debug", 100_000);
    pub const INFO: LogLevel = LogLevel::new("Info", 200_000);
    pub const WARNING: LogLevel = LogLevel::new("Warning", 300_000);
    pub const ERROR: LogLevel = LogLevel::new("Error", 400_000);
    pub const FATAL: LogLevel = LogLevel::new("Fatal", 500_000);
    /// Used as a minimum level it silences a logger for everything except
    /// messages logged at `ALWAYS` itself.
    pub const ALWAYS: LogLevel = LogLevel::new("Always", u32::MAX);

    /// Well-known levels in ascending order.
    pub const WELL_KNOWN: [LogLevel; 7] = [
        LogLevel::ANY,
        LogLevel::DEBUG,
        LogLevel::INFO,
        LogLevel::WARNING,
        LogLevel::ERROR,
        LogLevel::FATAL,
        LogLevel::ALWAYS,
    ];

    /// Define a custom level
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logger_tree::LogLevel;
    ///
    /// const NOTICE: LogLevel = LogLevel::new("Notice", 250_000);
    /// assert!(NOTICE > LogLevel::INFO);
    /// assert!(NOTICE < LogLevel::WARNING);
    /// ```
    pub const fn new(name: &'static str, value: u32) -> Self {
        Self { name, value }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self.value {
            v if v < LogLevel::DEBUG.value => BrightBlack,
            v if v < LogLevel::INFO.value => Blue,
            v if v < LogLevel::WARNING.value => Green,
            v if v < LogLevel::ERROR.value => Yellow,
            v if v < LogLevel::FATAL.value => Red,
            _ => BrightRed,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

impl PartialEq for LogLevel {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for LogLevel {}

impl Hash for LogLevel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name)
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::WELL_KNOWN
            .iter()
            .find(|level| level.name.eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| LoggerError::unknown_level(s))
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
