#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Sitka
//!
//! Named loggers that render each entry through a format template.
//!
//! Sitka provides:
//! - One logger per name, created on first request from a [`Registry`]
//! - Eight severity methods gated by an ordered [`Level`]
//! - Text and JSON [`Format`] presets, or any custom template
//! - `${ENV:NAME}` and `${CTX:path.to.value}` substitution in templates
//!   and messages, with global and per-logger [`Context`]
//! - Pluggable writers for standard and error output
//!
//! ## Example
//!
//! ```rust
//! use sitka::{Format, LoggerConfig, MapEnvironment, Registry, Value};
//! use std::sync::{Arc, Mutex};
//!
//! let registry = Registry::with_environment(MapEnvironment::new());
//! let lines = Arc::new(Mutex::new(Vec::new()));
//! let sink = lines.clone();
//! registry.set_log_writer(move |line, _args| {
//!     sink.lock().unwrap().push(line.to_string());
//!     Ok(Value::Undefined)
//! });
//!
//! let logger = registry.get_logger(
//!     LoggerConfig::new("checkout")
//!         .format(Format::TextNoTime)
//!         .context_value("region", "eu-west-1"),
//! );
//! logger.info("Order placed in ${CTX:region}", &[]).unwrap();
//!
//! assert_eq!(lines.lock().unwrap()[0], "[INFO] [checkout] Order placed in eu-west-1");
//! ```
//!
//! ## Placeholders
//!
//! `$` and `%` are interchangeable sigils. A backslash before the sigil
//! (`\${...}`) prints the placeholder literally.
//!
//! - `${LEVEL}`, `${TIMESTAMP}`, `${NAME}`, `${MESSAGE}`: template only
//! - `${ENV:NAME}`: environment variable, empty if unset
//! - `${CTX:path}`: context value, empty if missing

pub mod bridge;
mod config;
mod context;
pub mod env;
mod error;
mod format;
mod level;
mod logger;
mod registry;
mod resolve;
mod template;
mod value;
pub mod writer;

pub use config::{DEFAULT_NAME, LoggerConfig};
pub use context::Context;
pub use env::{Environment, MapEnvironment, ProcessEnvironment};
pub use error::{Error, Result};
pub use format::{Format, ParseFormatError};
pub use level::{Level, ParseLevelError, Severity};
pub use logger::Logger;
pub use registry::{
    Registry, get_logger, replace_global_context, set_error_writer, set_global_context,
    set_log_writer,
};
pub use template::{Template, TimestampMode};
pub use value::{Callable, Value, stringify};
pub use writer::Writer;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Callable, Context, DEFAULT_NAME, Environment, Error, Format, Level, Logger, LoggerConfig,
        MapEnvironment, ParseFormatError, ParseLevelError, ProcessEnvironment, Registry, Result,
        Severity, Template, TimestampMode, Value, Writer, get_logger, stringify,
    };
}
