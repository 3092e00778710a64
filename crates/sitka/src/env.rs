//! Environment variable access.
//!
//! Loggers read their configuration overrides and `${ENV:NAME}`
//! substitutions through the [`Environment`] trait instead of touching the
//! process environment directly, so a [`Registry`](crate::Registry) can be
//! built over an in-memory map in tests or embedded hosts.

use std::collections::HashMap;
use std::sync::RwLock;

/// Names of the environment variables consulted during configuration.
///
/// Each configurable has a current (`SITKA_*`) and a legacy name. Both may
/// be suffixed with `_<logger name>` to target a single logger.
pub mod vars {
    /// Level override.
    pub const SITKA_LEVEL: &str = "SITKA_LEVEL";
    /// Legacy level override.
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Format override (preset name or raw template).
    pub const SITKA_FORMAT: &str = "SITKA_FORMAT";
    /// Legacy format override.
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Timestamp mode override; only `false` disables ISO-8601.
    pub const SITKA_ISO8601: &str = "SITKA_ISO8601";
    /// Legacy timestamp mode override.
    pub const USE_ISO8601: &str = "USE_ISO8601";
    /// Set by AWS Lambda.
    pub const LAMBDA_TASK_ROOT: &str = "LAMBDA_TASK_ROOT";
    /// Set by Google Cloud Functions.
    pub const GCP_PROJECT: &str = "GCP_PROJECT";

    /// Markers whose presence selects the timestamp-free default format.
    pub const SERVERLESS_MARKERS: [&str; 2] = [LAMBDA_TASK_ROOT, GCP_PROJECT];
}

/// A read-only view of environment variables.
pub trait Environment: Send + Sync {
    /// Returns the value of `name`, or `None` if it is unset.
    fn var(&self, name: &str) -> Option<String>;

    /// Returns the value of `name` if it is set to a non-empty string.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// An in-memory environment that can be changed after loggers exist.
#[derive(Debug, Default)]
pub struct MapEnvironment {
    vars: RwLock<HashMap<String, String>>,
}

impl MapEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut vars = self.vars.write().unwrap_or_else(|e| e.into_inner());
        vars.insert(name.into(), value.into());
    }

    /// Removes a variable.
    pub fn remove(&self, name: &str) {
        let mut vars = self.vars.write().unwrap_or_else(|e| e.into_inner());
        vars.remove(name);
    }

    /// Removes every variable.
    pub fn clear(&self) {
        let mut vars = self.vars.write().unwrap_or_else(|e| e.into_inner());
        vars.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            vars: RwLock::new(vars),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        let vars = self.vars.read().unwrap_or_else(|e| e.into_inner());
        vars.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for std::sync::Arc<E> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_map_environment_set_and_remove() {
        let env = MapEnvironment::new();
        assert_eq!(env.var("A"), None);
        env.set("A", "1");
        assert_eq!(env.var("A").as_deref(), Some("1"));
        env.remove("A");
        assert_eq!(env.var("A"), None);
    }

    #[test]
    fn test_non_empty_skips_blank_values() {
        let env: MapEnvironment = [("EMPTY", ""), ("FULL", "x")].into_iter().collect();
        assert_eq!(env.non_empty("EMPTY"), None);
        assert_eq!(env.non_empty("FULL").as_deref(), Some("x"));
    }

    #[test]
    fn test_shared_environment_sees_updates() {
        let env = Arc::new(MapEnvironment::new());
        let view: Arc<dyn Environment> = env.clone();
        env.set("LATE", "value");
        assert_eq!(view.var("LATE").as_deref(), Some("value"));
    }

    #[test]
    fn test_process_environment_missing_var() {
        assert_eq!(
            ProcessEnvironment.var("SITKA_TEST_VARIABLE_THAT_IS_NEVER_SET"),
            None
        );
    }
}
