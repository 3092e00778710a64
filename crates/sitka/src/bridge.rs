//! Forwarding `tracing` events into a Sitka logger.
//!
//! ```rust,no_run
//! use sitka::bridge::SitkaLayer;
//! use tracing_subscriber::prelude::*;
//!
//! let logger = sitka::get_logger("app");
//! tracing_subscriber::registry()
//!     .with(SitkaLayer::new(logger))
//!     .init();
//!
//! tracing::info!(user = "alice", "Signed in");
//! // [2026-10-15T08:30:00.000Z] [INFO] [app] Signed in user=alice
//! ```

use crate::level::Severity;
use crate::logger::Logger;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// A layer that renders every `tracing` event through a [`Logger`].
///
/// The event's `message` field becomes the log message; every other field
/// is passed to the writer as an extra `key=value` argument. Events from
/// this crate's own diagnostics are skipped.
#[derive(Debug, Clone)]
pub struct SitkaLayer {
    logger: Arc<Logger>,
}

impl SitkaLayer {
    /// Creates a layer writing through `logger`.
    #[must_use]
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Returns the target logger.
    #[must_use]
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

/// Maps a `tracing` level onto the matching severity method.
#[must_use]
pub fn severity_for(level: &tracing::Level) -> Severity {
    match *level {
        tracing::Level::ERROR => Severity::Error,
        tracing::Level::WARN => Severity::Warn,
        tracing::Level::INFO => Severity::Info,
        tracing::Level::DEBUG => Severity::Debug,
        tracing::Level::TRACE => Severity::Trace,
    }
}

impl<S: Subscriber> Layer<S> for SitkaLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }
        let severity = severity_for(metadata.level());
        if !self.logger.enabled(severity) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let _ = self
            .logger
            .emit(severity, visitor.message.unwrap_or_default(), &visitor.fields);
    }
}

/// Returns true for targets inside this crate: the crate root or one of
/// its modules, but not other crates sharing the name as a prefix.
fn is_own_target(target: &str) -> bool {
    const CRATE: &str = env!("CARGO_CRATE_NAME");
    target
        .strip_prefix(CRATE)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Collects the message and the remaining fields of an event.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<Value>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: impl fmt::Display) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .push(Value::String(format!("{}={}", field.name(), value)));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Level, LoggerConfig, MapEnvironment, Registry, writer};
    use std::sync::Mutex;
    use tracing_subscriber::prelude::*;

    fn captured_logger(level: Level) -> (Registry, Arc<Mutex<Vec<String>>>) {
        let registry = Registry::with_environment(MapEnvironment::new());
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        registry.get_logger(
            LoggerConfig::new("bridge")
                .format("${LEVEL} ${MESSAGE}")
                .level(level)
                .log_writer(move |line, args| {
                    sink.lock().unwrap().push(writer::format_line(line, args));
                    Ok(Value::Undefined)
                }),
        );
        (registry, lines)
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(severity_for(&tracing::Level::ERROR), Severity::Error);
        assert_eq!(severity_for(&tracing::Level::TRACE), Severity::Trace);
    }

    #[test]
    fn test_events_are_forwarded_with_fields() {
        let (registry, lines) = captured_logger(Level::All);
        let logger = registry.logger("bridge").unwrap();
        let subscriber = tracing_subscriber::registry().with(SitkaLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app", user = "alice", attempts = 3, "Signed in");
        });
        assert_eq!(
            *lines.lock().unwrap(),
            vec!["INFO Signed in user=alice attempts=3\n"]
        );
    }

    #[test]
    fn test_filtered_events_are_dropped() {
        let (registry, lines) = captured_logger(Level::Warn);
        let logger = registry.logger("bridge").unwrap();
        let subscriber = tracing_subscriber::registry().with(SitkaLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "app", "noise");
            tracing::warn!(target: "app", "careful");
        });
        assert_eq!(*lines.lock().unwrap(), vec!["WARN careful\n"]);
    }

    #[test]
    fn test_own_target_matching() {
        assert!(is_own_target("sitka"));
        assert!(is_own_target("sitka::registry"));
        assert!(!is_own_target("sitka_worker"));
        assert!(!is_own_target("sitka_worker::jobs"));
        assert!(!is_own_target("app"));
    }

    #[test]
    fn test_similarly_named_crates_are_forwarded() {
        let (registry, lines) = captured_logger(Level::All);
        let logger = registry.logger("bridge").unwrap();
        let subscriber = tracing_subscriber::registry().with(SitkaLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "sitka_worker::jobs", "job done");
            tracing::info!(target: "app", "app event");
        });
        assert_eq!(
            *lines.lock().unwrap(),
            vec!["INFO job done\n", "INFO app event\n"]
        );
    }

    #[test]
    fn test_own_diagnostics_are_skipped() {
        let (registry, lines) = captured_logger(Level::All);
        let logger = registry.logger("bridge").unwrap();
        let subscriber = tracing_subscriber::registry().with(SitkaLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            registry.get_logger("another");
        });
        assert!(lines.lock().unwrap().is_empty());
    }
}
