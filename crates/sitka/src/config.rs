//! Logger configuration and its resolution against the environment.
//!
//! Every configurable is resolved once, when the logger is built, by
//! walking an ordered list of sources and taking the first usable one:
//!
//! | Setting   | Sources, highest precedence first                                     |
//! |-----------|-----------------------------------------------------------------------|
//! | level     | config, `SITKA_LEVEL_<name>`, `LOG_LEVEL_<name>`, `SITKA_LEVEL`, `LOG_LEVEL`, `ALL` |
//! | format    | config, `SITKA_FORMAT_<name>`, `LOG_FORMAT_<name>`, `SITKA_FORMAT`, `LOG_FORMAT`, platform default |
//! | timestamp | config, `SITKA_ISO8601_<name>`, `USE_ISO8601_<name>`, `SITKA_ISO8601`, `USE_ISO8601`, ISO-8601 |
//!
//! Empty variables count as unset. A level variable that does not parse
//! is skipped. The platform default format is `TEXT_NO_TIME` when a
//! serverless marker (`LAMBDA_TASK_ROOT`, `GCP_PROJECT`) is present, since
//! those platforms timestamp lines themselves, and `TEXT` otherwise.

use crate::context::Context;
use crate::env::{Environment, vars};
use crate::format::Format;
use crate::level::Level;
use crate::template::TimestampMode;
use crate::value::Value;
use crate::writer::{self, Writer};
use std::fmt;
use std::io;
use tracing::trace;

/// Name used when a logger is requested without one.
pub const DEFAULT_NAME: &str = "Sitka";

/// Configuration for a logger, used only the first time its name is
/// requested from a registry.
///
/// ```rust
/// use sitka::{Format, Level, LoggerConfig};
///
/// let config = LoggerConfig::new("api")
///     .level(Level::Warn)
///     .format(Format::JsonNoTime)
///     .context_value("region", "eu-west-1");
/// assert_eq!(config.resolved_name(), "api");
/// ```
#[derive(Clone, Default)]
pub struct LoggerConfig {
    /// Registry key and `${NAME}` value.
    pub name: Option<String>,
    /// Explicit level; beats every environment override.
    pub level: Option<Level>,
    /// Explicit format template.
    pub format: Option<String>,
    /// Initial instance context.
    pub context: Option<Context>,
    /// Writer for non-error severities.
    pub log_writer: Option<Writer>,
    /// Writer for `FATAL` and `ERROR`.
    pub error_writer: Option<Writer>,
    /// Explicit timestamp mode; `false` selects locale timestamps.
    pub use_iso8601: Option<bool>,
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("format", &self.format)
            .field("context", &self.context)
            .field("log_writer", &self.log_writer.is_some())
            .field("error_writer", &self.error_writer.is_some())
            .field("use_iso8601", &self.use_iso8601)
            .finish()
    }
}

impl LoggerConfig {
    /// Creates a configuration for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the format, either a [`Format`] preset or a raw template.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Replaces the initial instance context.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds one key to the initial instance context.
    #[must_use]
    pub fn context_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.get_or_insert_with(Context::new).insert(key, value);
        self
    }

    /// Sets the instance log writer.
    #[must_use]
    pub fn log_writer<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
    {
        self.log_writer = Some(writer::from_fn(f));
        self
    }

    /// Sets the instance error writer.
    #[must_use]
    pub fn error_writer<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
    {
        self.error_writer = Some(writer::from_fn(f));
        self
    }

    /// Selects ISO-8601 (`true`) or locale (`false`) timestamps.
    #[must_use]
    pub fn use_iso8601(mut self, enabled: bool) -> Self {
        self.use_iso8601 = Some(enabled);
        self
    }

    /// Returns the name this configuration registers under.
    ///
    /// A missing or empty name becomes [`DEFAULT_NAME`].
    #[must_use]
    pub fn resolved_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_NAME,
        }
    }
}

impl From<&str> for LoggerConfig {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LoggerConfig {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Candidate variable names for one setting, highest precedence first.
fn candidates(current: &str, legacy: &str, name: &str) -> [String; 4] {
    [
        format!("{current}_{name}"),
        format!("{legacy}_{name}"),
        current.to_string(),
        legacy.to_string(),
    ]
}

/// Settings after every source has been consulted.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub(crate) name: String,
    pub(crate) level: Level,
    pub(crate) format: String,
    pub(crate) timestamp: TimestampMode,
}

impl Resolved {
    pub(crate) fn from_config(config: &LoggerConfig, env: &dyn Environment) -> Self {
        let name = config.resolved_name().to_string();
        let level = resolve_level(config, env, &name);
        let format = resolve_format(config, env, &name);
        let timestamp = resolve_timestamp(config, env, &name);
        Self {
            name,
            level,
            format,
            timestamp,
        }
    }
}

fn resolve_level(config: &LoggerConfig, env: &dyn Environment, name: &str) -> Level {
    if let Some(level) = config.level {
        return level;
    }
    for var in candidates(vars::SITKA_LEVEL, vars::LOG_LEVEL, name) {
        let Some(value) = env.non_empty(&var) else {
            continue;
        };
        match Level::from_env_value(&value) {
            Some(level) => return level,
            None => trace!(logger.name = %name, env.var = %var, env.value = %value, "Ignoring unrecognized level"),
        }
    }
    Level::default()
}

fn resolve_format(config: &LoggerConfig, env: &dyn Environment, name: &str) -> String {
    if let Some(format) = config.format.as_deref().filter(|f| !f.is_empty()) {
        return format.to_string();
    }
    let from_env = candidates(vars::SITKA_FORMAT, vars::LOG_FORMAT, name)
        .iter()
        .find_map(|var| env.non_empty(var));
    if let Some(value) = from_env {
        return match value.parse::<Format>() {
            Ok(preset) => preset.template().to_string(),
            Err(_) => value,
        };
    }
    let serverless = vars::SERVERLESS_MARKERS
        .iter()
        .any(|marker| env.non_empty(marker).is_some());
    if serverless {
        Format::TextNoTime.into()
    } else {
        Format::Text.into()
    }
}

fn resolve_timestamp(config: &LoggerConfig, env: &dyn Environment, name: &str) -> TimestampMode {
    let enabled = config.use_iso8601.unwrap_or_else(|| {
        candidates(vars::SITKA_ISO8601, vars::USE_ISO8601, name)
            .iter()
            .find_map(|var| env.non_empty(var))
            .is_none_or(|value| value != "false")
    });
    if enabled {
        TimestampMode::Iso8601
    } else {
        TimestampMode::Locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvironment;

    fn env(pairs: &[(&str, &str)]) -> MapEnvironment {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_default_name() {
        assert_eq!(LoggerConfig::default().resolved_name(), "Sitka");
        assert_eq!(LoggerConfig::new("").resolved_name(), "Sitka");
        assert_eq!(LoggerConfig::from("api").resolved_name(), "api");
    }

    #[test]
    fn test_level_precedence() {
        let env = env(&[
            ("SITKA_LEVEL_svc", "ERROR"),
            ("LOG_LEVEL_svc", "WARN"),
            ("SITKA_LEVEL", "INFO"),
            ("LOG_LEVEL", "DEBUG"),
        ]);
        let explicit = LoggerConfig::new("svc").level(Level::Trace);
        assert_eq!(Resolved::from_config(&explicit, &env).level, Level::Trace);
        assert_eq!(Resolved::from_config(&"svc".into(), &env).level, Level::Error);
        env.remove("SITKA_LEVEL_svc");
        assert_eq!(Resolved::from_config(&"svc".into(), &env).level, Level::Warn);
        env.remove("LOG_LEVEL_svc");
        assert_eq!(Resolved::from_config(&"svc".into(), &env).level, Level::Info);
        env.remove("SITKA_LEVEL");
        assert_eq!(Resolved::from_config(&"svc".into(), &env).level, Level::Debug);
        env.remove("LOG_LEVEL");
        assert_eq!(Resolved::from_config(&"svc".into(), &env).level, Level::All);
    }

    #[test]
    fn test_unrecognized_level_falls_through() {
        let env = env(&[("SITKA_LEVEL", "LOUD"), ("LOG_LEVEL", "LogLevel.WARN")]);
        assert_eq!(Resolved::from_config(&"x".into(), &env).level, Level::Warn);
        let only_bad = self::env(&[("LOG_LEVEL", "info")]);
        assert_eq!(Resolved::from_config(&"x".into(), &only_bad).level, Level::All);
    }

    #[test]
    fn test_format_precedence() {
        let env = env(&[
            ("LOG_FORMAT_svc", "instance ${MESSAGE}"),
            ("SITKA_FORMAT", "global ${MESSAGE}"),
        ]);
        let explicit = LoggerConfig::new("svc").format("config ${MESSAGE}");
        assert_eq!(
            Resolved::from_config(&explicit, &env).format,
            "config ${MESSAGE}"
        );
        assert_eq!(
            Resolved::from_config(&"svc".into(), &env).format,
            "instance ${MESSAGE}"
        );
        assert_eq!(
            Resolved::from_config(&"other".into(), &env).format,
            "global ${MESSAGE}"
        );
    }

    #[test]
    fn test_format_env_accepts_preset_name() {
        let env = env(&[("LOG_FORMAT", "JSON_NO_TIME")]);
        assert_eq!(
            Resolved::from_config(&"x".into(), &env).format,
            Format::JsonNoTime.template()
        );
    }

    #[test]
    fn test_platform_default_format() {
        let plain = MapEnvironment::new();
        assert_eq!(
            Resolved::from_config(&"x".into(), &plain).format,
            Format::Text.template()
        );
        let lambda = env(&[("LAMBDA_TASK_ROOT", "/var/task")]);
        assert_eq!(
            Resolved::from_config(&"x".into(), &lambda).format,
            Format::TextNoTime.template()
        );
        let gcp = env(&[("GCP_PROJECT", "demo")]);
        assert_eq!(
            Resolved::from_config(&"x".into(), &gcp).format,
            Format::TextNoTime.template()
        );
    }

    #[test]
    fn test_timestamp_mode() {
        let plain = MapEnvironment::new();
        assert_eq!(
            Resolved::from_config(&"x".into(), &plain).timestamp,
            TimestampMode::Iso8601
        );
        let off = env(&[("USE_ISO8601", "false")]);
        assert_eq!(
            Resolved::from_config(&"x".into(), &off).timestamp,
            TimestampMode::Locale
        );
        let not_literal_false = env(&[("SITKA_ISO8601", "FALSE")]);
        assert_eq!(
            Resolved::from_config(&"x".into(), &not_literal_false).timestamp,
            TimestampMode::Iso8601
        );
        let instance_wins = env(&[("SITKA_ISO8601_x", "true"), ("SITKA_ISO8601", "false")]);
        assert_eq!(
            Resolved::from_config(&"x".into(), &instance_wins).timestamp,
            TimestampMode::Iso8601
        );
        let explicit = LoggerConfig::new("x").use_iso8601(false);
        assert_eq!(
            Resolved::from_config(&explicit, &plain).timestamp,
            TimestampMode::Locale
        );
    }

    #[test]
    fn test_config_debug_hides_writers() {
        let config = LoggerConfig::new("dbg").log_writer(|_, _| Ok(Value::Undefined));
        let debug = format!("{config:?}");
        assert!(debug.contains("log_writer: true"));
        assert!(debug.contains("error_writer: false"));
    }
}
