//! Predefined format templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A named format preset.
///
/// Any string is a valid format template; presets are shorthands for the
/// common layouts. Templates may use `$` or `%` as the placeholder sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Format {
    /// One JSON object per line, with a timestamp.
    Json,
    /// One JSON object per line, without a timestamp.
    JsonNoTime,
    /// `[timestamp] [LEVEL] [name] message`.
    Text,
    /// `[LEVEL] [name] message`.
    TextNoTime,
}

impl Format {
    /// Every preset.
    pub const ALL: [Self; 4] = [Self::Json, Self::JsonNoTime, Self::Text, Self::TextNoTime];

    /// Returns the template text of this preset.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Json => {
                r#"{ "timestamp": "${TIMESTAMP}", "level": "${LEVEL}", "name": "${NAME}", "message": "${MESSAGE}" }"#
            }
            Self::JsonNoTime => {
                r#"{ "level": "${LEVEL}", "name": "${NAME}", "message": "${MESSAGE}" }"#
            }
            Self::Text => "[${TIMESTAMP}] [${LEVEL}] [${NAME}] ${MESSAGE}",
            Self::TextNoTime => "[${LEVEL}] [${NAME}] ${MESSAGE}",
        }
    }

    /// Returns the preset name, e.g. `JSON_NO_TIME`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::JsonNoTime => "JSON_NO_TIME",
            Self::Text => "TEXT",
            Self::TextNoTime => "TEXT_NO_TIME",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| ParseFormatError(s.to_string()))
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.template().to_string()
    }
}

/// Error returned when a string names no format preset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format preset: {0:?}")]
pub struct ParseFormatError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), format);
        }
        assert!("json".parse::<Format>().is_err());
    }

    #[test]
    fn test_no_time_presets_omit_timestamp() {
        assert!(!Format::JsonNoTime.template().contains("TIMESTAMP"));
        assert!(!Format::TextNoTime.template().contains("TIMESTAMP"));
        assert!(Format::Json.template().contains("${TIMESTAMP}"));
    }

    #[test]
    fn test_into_string_is_template() {
        let s: String = Format::TextNoTime.into();
        assert_eq!(s, "[${LEVEL}] [${NAME}] ${MESSAGE}");
    }

    #[test]
    fn test_serde_uses_preset_names() {
        let format: Format = serde_json::from_str("\"TEXT_NO_TIME\"").unwrap();
        assert_eq!(format, Format::TextNoTime);
    }
}
