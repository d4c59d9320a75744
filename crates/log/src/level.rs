//! Severity levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::LogError;

/// Log level, totally ordered from [`Level::All`] to [`Level::Off`]
///
/// A logger whose threshold is `t` delivers a message at level `m` when
/// `t <= m` and `t` is not [`Level::Off`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    /// Admits everything
    All = 0,
    /// Trace level
    Trace = 1,
    /// Debug level
    Debug = 2,
    /// Info level
    Info = 3,
    /// Warn level
    Warn = 4,
    /// Error level
    Error = 5,
    /// Fatal level
    Fatal = 6,
    /// Suppresses everything
    Off = 7,
}

impl Level {
    /// Every level in ascending order
    pub const ALL_LEVELS: [Self; 8] = [
        Self::All,
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::Off,
    ];

    /// Level the root logger starts with and returns to on reset
    pub const ROOT_DEFAULT: Self = Self::Debug;

    /// Whether a logger with threshold `self` delivers a message at `message`
    #[must_use]
    pub fn admits(self, message: Self) -> bool {
        self != Self::Off && self <= message
    }

    /// Upper-case name, as used in configuration values
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Off => "OFF",
        }
    }

    pub(crate) fn to_repr(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_repr(repr: u8) -> Option<Self> {
        Self::ALL_LEVELS.get(usize::from(repr)).copied()
    }

    /// Closest `tracing` level, `None` for the two sentinels
    #[must_use]
    pub fn as_tracing(self) -> Option<tracing::Level> {
        match self {
            Self::Trace => Some(tracing::Level::TRACE),
            Self::Debug => Some(tracing::Level::DEBUG),
            Self::Info => Some(tracing::Level::INFO),
            Self::Warn => Some(tracing::Level::WARN),
            Self::Error | Self::Fatal => Some(tracing::Level::ERROR),
            Self::All | Self::Off => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL_LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| LogError::InvalidLevel {
                token: s.to_string(),
            })
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

#[cfg(feature = "log-compat")]
impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Self::Trace,
            log::Level::Debug => Self::Debug,
            log::Level::Info => Self::Info,
            log::Level::Warn => Self::Warn,
            log::Level::Error => Self::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("DEBUG", Level::Debug)]
    #[case("debug", Level::Debug)]
    #[case(" Warn ", Level::Warn)]
    #[case("FATAL", Level::Fatal)]
    #[case("all", Level::All)]
    #[case("OFF", Level::Off)]
    fn parses_level_tokens(#[case] token: &str, #[case] expected: Level) {
        assert_eq!(token.parse::<Level>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("VERBOSE")]
    #[case("DEBUG,console")]
    fn rejects_unknown_tokens(#[case] token: &str) {
        let err = token.parse::<Level>().unwrap_err();
        assert!(matches!(err, LogError::InvalidLevel { .. }));
    }

    #[test]
    fn total_order() {
        let mut sorted = Level::ALL_LEVELS;
        sorted.sort();
        assert_eq!(sorted, Level::ALL_LEVELS);
        assert!(Level::All < Level::Trace);
        assert!(Level::Fatal < Level::Off);
    }

    #[rstest]
    #[case(Level::Error, Level::Warn, false)]
    #[case(Level::Error, Level::Error, true)]
    #[case(Level::Error, Level::Fatal, true)]
    #[case(Level::All, Level::Trace, true)]
    #[case(Level::Off, Level::Fatal, false)]
    #[case(Level::Off, Level::Off, false)]
    fn admission(#[case] threshold: Level, #[case] message: Level, #[case] admitted: bool) {
        assert_eq!(threshold.admits(message), admitted);
    }

    #[test]
    fn repr_round_trips_every_level() {
        for level in Level::ALL_LEVELS {
            assert_eq!(Level::from_repr(level.to_repr()), Some(level));
        }
        assert_eq!(Level::from_repr(8), None);
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Level::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
        let level: Level = serde_json::from_str("\"FATAL\"").unwrap();
        assert_eq!(level, Level::Fatal);
    }

    #[test]
    fn display_pads() {
        assert_eq!(format!("{:<5}|", Level::Info), "INFO |");
    }
}
