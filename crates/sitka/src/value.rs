//! Dynamic values carried by log calls and context mappings.
//!
//! A [`Value`] is anything that can appear as a log message, an extra
//! writer argument, or an entry in a [`Context`]. Every value has exactly
//! one canonical string form, produced by [`stringify`]:
//!
//! | Variant     | Rendering                                  |
//! |-------------|--------------------------------------------|
//! | `Undefined` | `undefined`                                |
//! | `Null`      | `null`                                     |
//! | `String`    | the string itself, unquoted                |
//! | `Array`     | `[ a, b, c ]` (empty: `[  ]`)              |
//! | `Object`    | `{ key: value, other: "text" }`            |
//! | `Function`  | the callable's source text                 |
//! | `Bool`      | `true` / `false`                           |
//! | `Number`    | JSON number text (`1`, `1.5`)              |

use crate::context::Context;
use std::fmt;
use std::sync::Arc;

/// A dynamically shaped value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// An explicitly undefined value. Distinct from a missing key.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A JSON-compatible number.
    Number(serde_json::Number),
    /// A string, rendered verbatim at the top level.
    String(String),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A nested mapping.
    Object(Context),
    /// A callable, rendered as its source text.
    Function(Callable),
}

impl Value {
    /// Returns true for [`Value::Undefined`].
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping if this is a [`Value::Object`].
    #[must_use]
    pub fn as_object(&self) -> Option<&Context> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the element slice if this is a [`Value::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                f.write_str("[ ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" ]")
            }
            Self::Object(map) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match value {
                        // Nested strings are quoted, top-level strings are not.
                        Self::String(s) => write!(f, "{key}: \"{s}\"")?,
                        other => write!(f, "{key}: {other}")?,
                    }
                }
                f.write_str(" }")
            }
            Self::Function(callable) => f.write_str(callable.source()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&number_text(n)),
        }
    }
}

/// Converts any value into its canonical string form.
///
/// Never fails. See the module documentation for the per-variant rules.
#[must_use]
pub fn stringify(value: &Value) -> String {
    value.to_string()
}

/// Renders a number the way a JSON encoder would: no trailing `.0` on
/// integral floats, and exponent notation (`1e+21`, `1e-7`) outside
/// `1e-6 <= |x| < 1e21`.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64().filter(|_| n.is_f64()) {
        Some(f) => float_text(f),
        None => n.to_string(),
    }
}

fn float_text(f: f64) -> String {
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{f:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    if f == 0.0 {
        // Negative zero prints as `0`.
        return "0".to_string();
    }
    f.to_string()
}

/// A callable value with a textual definition.
///
/// Rust closures carry no source text, so the text is supplied when the
/// callable is built. The [`callable!`](crate::callable) macro captures it
/// automatically.
#[derive(Clone)]
pub struct Callable {
    source: Arc<str>,
    func: Arc<dyn Fn(&[Value]) -> Value + Send + Sync>,
}

impl Callable {
    /// Creates a callable from its source text and implementation.
    pub fn new<F>(source: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            source: Arc::from(source.into()),
            func: Arc::new(func),
        }
    }

    /// Returns the textual definition.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Invokes the callable.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Builds a [`Callable`] whose source text is the closure expression itself.
///
/// ```rust
/// use sitka::{callable, Value};
///
/// let double = callable!(|args: &[Value]| args.first().cloned().unwrap_or_default());
/// assert!(double.source().starts_with('|'));
/// ```
#[macro_export]
macro_rules! callable {
    ($($body:tt)+) => {
        $crate::Callable::new(stringify!($($body)+), $($body)+)
    };
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Number(serde_json::Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become [`Value::Null`].
    fn from(f: f64) -> Self {
        serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::from(f64::from(f))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<Context> for Value {
    fn from(map: Context) -> Self {
        Self::Object(map)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Self::Function(callable)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
