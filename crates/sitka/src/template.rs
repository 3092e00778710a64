//! Format template compilation and rendering.
//!
//! A format string is tokenized once, when its logger is built. The
//! message of every call is tokenized the same way, with a narrower
//! grammar, and spliced into the template before references resolve.
//!
//! Placeholder grammar (`$` and `%` are interchangeable sigils):
//!
//! | Placeholder         | Template | Message | Replaced with                   |
//! |---------------------|----------|---------|---------------------------------|
//! | `${LEVEL}`          | yes      | no      | severity label, e.g. `INFO`     |
//! | `${TIMESTAMP}`      | yes      | no      | current time                    |
//! | `${NAME}`           | yes      | no      | logger name (at compile time)   |
//! | `${MESSAGE}`        | yes      | no      | the stringified message         |
//! | `${ENV:NAME}`       | yes      | yes     | environment variable or empty   |
//! | `${CTX:a.b.c}`      | yes      | yes     | context value or empty          |
//! | `\${` / `\%{`       | yes      | yes     | literal `${` / `%{`             |
//!
//! Anything else, including placeholders outside their scope, is kept as
//! literal text.

use crate::resolve::{Piece, Resolver};
use crate::value::Value;
use chrono::{Local, SecondsFormat, Utc};
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\([$%])\{|([$%])\{(LEVEL|TIMESTAMP|NAME|MESSAGE|ENV:[^}]+|CTX:[^}]+)\}")
        .expect("placeholder pattern is valid")
});

/// How `${TIMESTAMP}` is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampMode {
    /// UTC ISO-8601 with milliseconds, e.g. `2026-10-15T08:30:00.123Z`.
    #[default]
    Iso8601,
    /// Local time, e.g. `Thu Oct 15 2026 10:30:00 GMT+0200`.
    ///
    /// The trailing ` (Zone Name)` of a browser `Date` string is omitted:
    /// the offset is the only zone information printed.
    Locale,
}

impl TimestampMode {
    /// Renders the current time.
    #[must_use]
    pub fn now(self) -> String {
        match self {
            Self::Iso8601 => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            Self::Locale => Local::now().format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Piece(Piece),
    Level,
    Timestamp,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Template,
    Message,
}

/// Splits `input` into literal text and placeholders.
///
/// `name` replaces `${NAME}` in template scope.
fn tokenize(input: &str, scope: Scope, name: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        text.push_str(&input[last..whole.start()]);
        last = whole.end();

        if let Some(sigil) = caps.get(1) {
            text.push_str(sigil.as_str());
            text.push('{');
            continue;
        }

        let body = caps.get(3).map_or("", |m| m.as_str());
        let token = match (scope, body) {
            (Scope::Template, "NAME") => {
                text.push_str(name);
                continue;
            }
            (Scope::Template, "LEVEL") => Token::Level,
            (Scope::Template, "TIMESTAMP") => Token::Timestamp,
            (Scope::Template, "MESSAGE") => Token::Message,
            _ => {
                if let Some(var) = body.strip_prefix("ENV:") {
                    Token::Piece(Piece::Env(var.to_string()))
                } else if let Some(path) = body.strip_prefix("CTX:") {
                    Token::Piece(Piece::Ctx(path.to_string()))
                } else {
                    text.push_str(whole.as_str());
                    continue;
                }
            }
        };

        if !text.is_empty() {
            tokens.push(Token::Piece(Piece::Text(std::mem::take(&mut text))));
        }
        tokens.push(token);
    }

    text.push_str(&input[last..]);
    if !text.is_empty() {
        tokens.push(Token::Piece(Piece::Text(text)));
    }
    tokens
}

/// Escapes a message placed between double quotes in the template.
fn escape_quoted(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// A compiled format template bound to one logger name.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
    quotes_message: bool,
    has_timestamp: bool,
}

impl Template {
    /// Compiles `source`, substituting `${NAME}` with `name` and turning
    /// escaped sigils into literal text.
    #[must_use]
    pub fn compile(source: &str, name: &str) -> Self {
        let tokens = tokenize(source, Scope::Template, name);
        let quotes_message = tokens.iter().enumerate().any(|(i, token)| {
            *token == Token::Message
                && i > 0
                && matches!(&tokens[i - 1], Token::Piece(Piece::Text(before)) if before.ends_with('"'))
                && matches!(tokens.get(i + 1), Some(Token::Piece(Piece::Text(after))) if after.starts_with('"'))
        });
        let has_timestamp = tokens.contains(&Token::Timestamp);
        Self {
            source: source.to_string(),
            tokens,
            quotes_message,
            has_timestamp,
        }
    }

    /// Returns the format string this template was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the message sits directly inside double quotes,
    /// as in the JSON presets.
    #[must_use]
    pub fn quotes_message(&self) -> bool {
        self.quotes_message
    }

    /// Returns true if the template renders a timestamp.
    #[must_use]
    pub fn has_timestamp(&self) -> bool {
        self.has_timestamp
    }

    /// Substitutes level, timestamp and message, leaving `ENV`/`CTX`
    /// references for the resolver.
    fn expand(&self, label: &str, timestamp: Option<&str>, message: &str) -> Vec<Piece> {
        let message_pieces: Vec<Piece> = tokenize(message, Scope::Message, "")
            .into_iter()
            .filter_map(|token| match token {
                Token::Piece(piece) => Some(piece),
                _ => None,
            })
            .collect();

        let mut pieces = Vec::with_capacity(self.tokens.len() + message_pieces.len());
        for token in &self.tokens {
            match token {
                Token::Piece(piece) => pieces.push(piece.clone()),
                Token::Level => pieces.push(Piece::Text(label.to_string())),
                Token::Timestamp => {
                    pieces.push(Piece::Text(timestamp.unwrap_or_default().to_string()));
                }
                Token::Message => pieces.extend(message_pieces.iter().cloned()),
            }
        }
        pieces
    }

    /// Renders one line.
    pub(crate) fn render(
        &self,
        label: &str,
        message: &Value,
        timestamp: TimestampMode,
        resolver: &Resolver<'_>,
    ) -> String {
        let mut text = message.to_string();
        if self.quotes_message {
            text = escape_quoted(&text);
        }
        let now = self.has_timestamp.then(|| timestamp.now());
        resolver.resolve(self.expand(label, now.as_deref(), &text))
    }
}
