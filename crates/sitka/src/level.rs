//! Log levels and severity methods.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Gating level for a logger.
///
/// Levels are ordered from least to most verbose. A message is emitted
/// when the logger's level is at or above the message's severity level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    /// Nothing is emitted.
    Off = 1,
    /// Fatal messages only.
    Fatal,
    /// Errors and above.
    Error,
    /// Warnings and above.
    Warn,
    /// Informational messages and above.
    #[serde(alias = "LOG")]
    Info,
    /// Debug messages and above.
    Debug,
    /// Trace messages and above.
    #[serde(alias = "VERBOSE")]
    Trace,
    /// Everything is emitted (default).
    #[default]
    All,
}

impl Level {
    /// Alias of [`Level::Info`].
    pub const LOG: Self = Self::Info;
    /// Alias of [`Level::Trace`].
    pub const VERBOSE: Self = Self::Trace;

    /// Every level, in rank order.
    pub const ALL_LEVELS: [Self; 8] = [
        Self::Off,
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
        Self::All,
    ];

    /// Returns the numeric severity rank.
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
            Self::All => "ALL",
        }
    }

    /// Returns true if a logger at this level emits `severity`.
    #[must_use]
    pub fn enables(self, severity: Severity) -> bool {
        severity.level() <= self
    }

    /// Parses a level as written in an environment variable.
    ///
    /// Accepts the names understood by [`str::parse`], optionally
    /// prefixed with the legacy `Logger.Level.` or `LogLevel.` qualifier.
    #[must_use]
    pub fn from_env_value(value: &str) -> Option<Self> {
        let name = value
            .strip_prefix("Logger.Level.")
            .or_else(|| value.strip_prefix("LogLevel."))
            .unwrap_or(value);
        name.parse().ok()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = ParseLevelError;

    /// Case-sensitive: `"INFO"` parses, `"info"` does not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OFF" => Ok(Self::Off),
            "FATAL" => Ok(Self::Fatal),
            "ERROR" => Ok(Self::Error),
            "WARN" => Ok(Self::Warn),
            "INFO" | "LOG" => Ok(Self::Info),
            "DEBUG" => Ok(Self::Debug),
            "TRACE" | "VERBOSE" => Ok(Self::Trace),
            "ALL" => Ok(Self::All),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid log level string.
///
/// Valid strings are the upper-case level names plus the `LOG` and
/// `VERBOSE` aliases.
///
/// ```rust
/// use sitka::Level;
///
/// assert!("WARN".parse::<Level>().is_ok());
/// assert!("warn".parse::<Level>().is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid level: {0:?}")]
pub struct ParseLevelError(String);

impl ParseLevelError {
    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

/// The severity of a single log call, one per logger method.
///
/// `Log` and `Verbose` gate like `Info` and `Trace` but keep their own
/// label in the rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// [`Logger::fatal`](crate::Logger::fatal).
    Fatal,
    /// [`Logger::error`](crate::Logger::error).
    Error,
    /// [`Logger::warn`](crate::Logger::warn).
    Warn,
    /// [`Logger::info`](crate::Logger::info).
    Info,
    /// [`Logger::log`](crate::Logger::log).
    Log,
    /// [`Logger::debug`](crate::Logger::debug).
    Debug,
    /// [`Logger::trace`](crate::Logger::trace).
    Trace,
    /// [`Logger::verbose`](crate::Logger::verbose).
    Verbose,
}

impl Severity {
    /// Every severity method.
    pub const ALL: [Self; 8] = [
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Log,
        Self::Debug,
        Self::Trace,
        Self::Verbose,
    ];

    /// Returns the level this severity is gated at.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Fatal => Level::Fatal,
            Self::Error => Level::Error,
            Self::Warn => Level::Warn,
            Self::Info | Self::Log => Level::Info,
            Self::Debug => Level::Debug,
            Self::Trace | Self::Verbose => Level::Trace,
        }
    }

    /// Returns the label substituted for `${LEVEL}`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Log => "LOG",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
            Self::Verbose => "VERBOSE",
        }
    }

    /// Returns true for severities dispatched to the error writer.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Fatal | Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
