//! The logger registry.
//!
//! A [`Registry`] owns one [`Logger`] per name together with the state
//! every one of its loggers shares: the environment, the global context
//! and the default writers.
//!
//! Most programs use the process-wide registry through the free functions
//! ([`get_logger`], [`set_global_context`], ...). Tests and embedded hosts
//! can build isolated registries over their own [`Environment`].
//!
//! ```rust
//! use sitka::{LoggerConfig, MapEnvironment, Registry};
//! use std::sync::Arc;
//!
//! let env = Arc::new(MapEnvironment::new());
//! env.set("LOG_LEVEL", "WARN");
//! let registry = Registry::with_environment(env);
//!
//! let logger = registry.get_logger("api");
//! assert_eq!(logger.level(), sitka::Level::Warn);
//!
//! // The first request for a name wins.
//! let again = registry.get_logger(LoggerConfig::new("api").level(sitka::Level::All));
//! assert!(Arc::ptr_eq(&logger, &again));
//! assert_eq!(again.level(), sitka::Level::Warn);
//! ```

use crate::config::LoggerConfig;
use crate::context::Context;
use crate::env::{Environment, ProcessEnvironment};
use crate::logger::Logger;
use crate::value::Value;
use crate::writer::{self, Writer};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, LazyLock, Mutex, RwLock};
use tracing::{debug, trace};

/// State shared by a registry and all of its loggers.
pub(crate) struct Shared {
    pub(crate) env: Arc<dyn Environment>,
    pub(crate) global_context: RwLock<Context>,
    pub(crate) log_writer: RwLock<Writer>,
    pub(crate) error_writer: RwLock<Writer>,
}

impl Shared {
    pub(crate) fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            global_context: RwLock::new(Context::new()),
            log_writer: RwLock::new(writer::stdout()),
            error_writer: RwLock::new(writer::stderr()),
        }
    }
}

/// Maps names to loggers, creating each logger on first request.
pub struct Registry {
    shared: Arc<Shared>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("loggers", &self.names())
            .field("global_context", &self.global_context())
            .finish_non_exhaustive()
    }
}

static GLOBAL_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

impl Registry {
    /// Creates a registry over the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_environment(ProcessEnvironment)
    }

    /// Creates a registry over a custom environment.
    ///
    /// Pass an `Arc` to keep a handle for changing variables later.
    #[must_use]
    pub fn with_environment(env: impl Environment + 'static) -> Self {
        Self {
            shared: Arc::new(Shared::new(Arc::new(env))),
            loggers: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the process-wide registry, creating it on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Returns the logger for the configuration's name, building it from
    /// the configuration if the name has not been seen.
    ///
    /// For a known name the configuration is ignored.
    pub fn get_logger(&self, config: impl Into<LoggerConfig>) -> Arc<Logger> {
        let config = config.into();
        let mut loggers = self.loggers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = loggers.get(config.resolved_name()) {
            return Arc::clone(existing);
        }
        let name = config.resolved_name().to_string();
        let logger = Arc::new(Logger::build(config, Arc::clone(&self.shared)));
        loggers.insert(name, Arc::clone(&logger));
        drop(loggers);
        debug!(
            logger.name = %logger.name(),
            logger.level = %logger.level(),
            logger.format = %logger.template().source(),
            "Logger created"
        );
        logger
    }

    /// Returns an existing logger without creating one.
    #[must_use]
    pub fn logger(&self, name: &str) -> Option<Arc<Logger>> {
        let loggers = self.loggers.lock().unwrap_or_else(|e| e.into_inner());
        loggers.get(name).cloned()
    }

    /// Returns the names of all loggers, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let loggers = self.loggers.lock().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = loggers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Replaces the default log writer used by loggers without their own.
    pub fn set_log_writer<F>(&self, f: F)
    where
        F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
    {
        *self.shared.log_writer.write().unwrap_or_else(|e| e.into_inner()) = writer::from_fn(f);
        debug!("Default log writer replaced");
    }

    /// Replaces the default error writer used by loggers without their own.
    pub fn set_error_writer<F>(&self, f: F)
    where
        F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
    {
        *self.shared.error_writer.write().unwrap_or_else(|e| e.into_inner()) = writer::from_fn(f);
        debug!("Default error writer replaced");
    }

    /// Sets one global context key.
    pub fn set_global_context(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut context = self
            .shared
            .global_context
            .write()
            .unwrap_or_else(|e| e.into_inner());
        context.insert(key, value);
    }

    /// Replaces the whole global context.
    pub fn replace_global_context(&self, context: Context) {
        trace!(keys = context.len(), "Global context replaced");
        *self
            .shared
            .global_context
            .write()
            .unwrap_or_else(|e| e.into_inner()) = context;
    }

    /// Returns a snapshot of the global context.
    #[must_use]
    pub fn global_context(&self) -> Context {
        self.shared
            .global_context
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Forgets every logger, clears the global context and restores the
    /// standard output and standard error writers.
    ///
    /// Loggers handed out before the reset keep working but are no longer
    /// returned by [`get_logger`](Self::get_logger).
    pub fn reset(&self) {
        self.loggers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.replace_global_context(Context::new());
        *self.shared.log_writer.write().unwrap_or_else(|e| e.into_inner()) = writer::stdout();
        *self.shared.error_writer.write().unwrap_or_else(|e| e.into_inner()) = writer::stderr();
        debug!("Registry reset");
    }
}

/// Returns a logger from the process-wide registry.
///
/// Accepts a name or a [`LoggerConfig`].
pub fn get_logger(config: impl Into<LoggerConfig>) -> Arc<Logger> {
    Registry::global().get_logger(config)
}

/// Replaces the process-wide default log writer.
pub fn set_log_writer<F>(f: F)
where
    F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
{
    Registry::global().set_log_writer(f);
}

/// Replaces the process-wide default error writer.
pub fn set_error_writer<F>(f: F)
where
    F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
{
    Registry::global().set_error_writer(f);
}

/// Sets one process-wide global context key.
pub fn set_global_context(key: impl Into<String>, value: impl Into<Value>) {
    Registry::global().set_global_context(key, value);
}

/// Replaces the process-wide global context.
pub fn replace_global_context(context: Context) {
    Registry::global().replace_global_context(context);
}
