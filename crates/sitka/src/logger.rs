//! Named logger instances.

use crate::config::{LoggerConfig, Resolved};
use crate::context::Context;
use crate::error::Result;
use crate::level::{Level, Severity};
use crate::registry::Shared;
use crate::resolve::Resolver;
use crate::template::{Template, TimestampMode};
use crate::value::Value;
use crate::writer::{self, Writer};
use std::fmt;
use std::io;
use std::sync::{Arc, RwLock};
use tracing::trace;

/// A named logger obtained from a [`Registry`](crate::Registry).
///
/// The format template and timestamp mode are fixed when the logger is
/// built. Level, context and writers can be changed through setters.
///
/// Every severity method returns `Ok(None)` when the call was filtered
/// out by the level, and otherwise `Ok(Some(..))` holding whatever the
/// writer returned. A filtered call does no formatting work at all.
pub struct Logger {
    name: String,
    template: Template,
    timestamp: TimestampMode,
    level: RwLock<Level>,
    context: RwLock<Context>,
    log_writer: RwLock<Option<Writer>>,
    error_writer: RwLock<Option<Writer>>,
    shared: Arc<Shared>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("format", &self.template.source())
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub(crate) fn build(config: LoggerConfig, shared: Arc<Shared>) -> Self {
        let resolved = Resolved::from_config(&config, shared.env.as_ref());
        let template = Template::compile(&resolved.format, &resolved.name);
        Self {
            template,
            timestamp: resolved.timestamp,
            level: RwLock::new(resolved.level),
            context: RwLock::new(config.context.unwrap_or_default()),
            log_writer: RwLock::new(config.log_writer),
            error_writer: RwLock::new(config.error_writer),
            name: resolved.name,
            shared,
        }
    }

    /// Returns the logger's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current level.
    #[must_use]
    pub fn level(&self) -> Level {
        *self.level.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Sets the level.
    pub fn set_level(&self, level: Level) {
        let mut current = self.level.write().unwrap_or_else(|e| e.into_inner());
        *current = level;
    }

    /// Returns the compiled format template.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Returns how timestamps are rendered.
    #[must_use]
    pub fn timestamp_mode(&self) -> TimestampMode {
        self.timestamp
    }

    /// Returns a snapshot of the instance context.
    #[must_use]
    pub fn context(&self) -> Context {
        self.context.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Sets one instance context key.
    pub fn set_context(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut context = self.context.write().unwrap_or_else(|e| e.into_inner());
        context.insert(key, value);
    }

    /// Replaces the whole instance context.
    pub fn replace_context(&self, context: Context) {
        trace!(logger.name = %self.name, keys = context.len(), "Instance context replaced");
        *self.context.write().unwrap_or_else(|e| e.into_inner()) = context;
    }

    /// Overrides the registry's log writer for this logger.
    pub fn set_log_writer<F>(&self, f: F)
    where
        F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
    {
        *self.log_writer.write().unwrap_or_else(|e| e.into_inner()) = Some(writer::from_fn(f));
    }

    /// Overrides the registry's error writer for this logger.
    pub fn set_error_writer<F>(&self, f: F)
    where
        F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
    {
        *self.error_writer.write().unwrap_or_else(|e| e.into_inner()) = Some(writer::from_fn(f));
    }

    /// Returns true if `severity` passes the current level.
    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool {
        self.level().enables(severity)
    }

    /// Renders the line a call at `severity` would write, without gating
    /// or dispatching it.
    #[must_use]
    pub fn render(&self, severity: Severity, message: &Value) -> String {
        let global = self
            .shared
            .global_context
            .read()
            .unwrap_or_else(|e| e.into_inner());
        let instance = self.context.read().unwrap_or_else(|e| e.into_inner());
        let resolver = Resolver::new(self.shared.env.as_ref(), &global, &instance);
        self.template
            .render(severity.label(), message, self.timestamp, &resolver)
    }

    /// Picks the instance writer for `severity`, falling back to the
    /// registry default.
    fn writer_for(&self, severity: Severity) -> Writer {
        let (own, fallback) = if severity.is_error() {
            (&self.error_writer, &self.shared.error_writer)
        } else {
            (&self.log_writer, &self.shared.log_writer)
        };
        let own = own.read().unwrap_or_else(|e| e.into_inner()).clone();
        own.unwrap_or_else(|| fallback.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    /// Gates, renders and dispatches one call.
    ///
    /// `args` are handed to the writer untouched after the rendered line.
    /// The writer's return value is passed back to the caller.
    pub fn emit(
        &self,
        severity: Severity,
        message: impl Into<Value>,
        args: &[Value],
    ) -> Result<Option<Value>> {
        if !self.enabled(severity) {
            return Ok(None);
        }
        let line = self.render(severity, &message.into());
        let writer = self.writer_for(severity);
        Ok(Some(writer(&line, args)?))
    }

    /// Logs at `FATAL`.
    pub fn fatal(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Fatal, message, args)
    }

    /// Logs at `ERROR`.
    pub fn error(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Error, message, args)
    }

    /// Logs at `WARN`.
    pub fn warn(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Warn, message, args)
    }

    /// Logs at `INFO`.
    pub fn info(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Info, message, args)
    }

    /// Logs at `INFO` rank with the `LOG` label.
    pub fn log(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Log, message, args)
    }

    /// Logs at `DEBUG`.
    pub fn debug(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Debug, message, args)
    }

    /// Logs at `TRACE`.
    pub fn trace(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Trace, message, args)
    }

    /// Logs at `TRACE` rank with the `VERBOSE` label.
    pub fn verbose(&self, message: impl Into<Value>, args: &[Value]) -> Result<Option<Value>> {
        self.emit(Severity::Verbose, message, args)
    }
}
