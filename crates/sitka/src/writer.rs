//! Output sinks.
//!
//! A [`Writer`] receives the fully rendered line plus any extra values
//! passed to the severity method. Extra values are never interpolated into
//! the template; the writer decides what to do with them.

use crate::value::Value;
use std::io::{self, Write};
use std::sync::Arc;

/// A shared output sink.
///
/// Whatever the sink returns is handed back to the caller of the severity
/// method.
pub type Writer = Arc<dyn Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync>;

/// Wraps a closure as a [`Writer`].
pub fn from_fn<F>(f: F) -> Writer
where
    F: Fn(&str, &[Value]) -> io::Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Joins a line and its extra values with single spaces and appends a
/// newline, the way the default writers print.
#[must_use]
pub fn format_line(line: &str, args: &[Value]) -> String {
    let mut out = String::from(line);
    for arg in args {
        out.push(' ');
        out.push_str(&arg.to_string());
    }
    out.push('\n');
    out
}

/// Writes one formatted line to `out`.
fn write_to(mut out: impl Write, line: &str, args: &[Value]) -> io::Result<()> {
    out.write_all(format_line(line, args).as_bytes())?;
    out.flush()
}

/// The default log writer: one line per call on standard output.
/// Returns [`Value::Undefined`].
#[must_use]
pub fn stdout() -> Writer {
    from_fn(|line, args| {
        write_to(io::stdout().lock(), line, args)?;
        Ok(Value::Undefined)
    })
}

/// The default error writer: one line per call on standard error.
/// Returns [`Value::Undefined`].
#[must_use]
pub fn stderr() -> Writer {
    from_fn(|line, args| {
        write_to(io::stderr().lock(), line, args)?;
        Ok(Value::Undefined)
    })
}
