//! `ENV:` and `CTX:` reference resolution.

use crate::context::{Context, walk};
use crate::env::Environment;
use crate::value::Value;
use tracing::trace;

/// A fragment of a line after template substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    /// Final text. Never scanned again.
    Text(String),
    /// `${ENV:NAME}`.
    Env(String),
    /// `${CTX:PATH}`.
    Ctx(String),
}

/// Resolves references against an environment and two context scopes.
pub(crate) struct Resolver<'a> {
    env: &'a dyn Environment,
    global: &'a Context,
    instance: &'a Context,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(env: &'a dyn Environment, global: &'a Context, instance: &'a Context) -> Self {
        Self {
            env,
            global,
            instance,
        }
    }

    /// Looks up a top-level key, instance scope first.
    fn top(&self, key: &str) -> Option<&'a Value> {
        self.instance.get(key).or_else(|| self.global.get(key))
    }

    /// Resolves a possibly dotted context path over the merged scopes.
    ///
    /// The merge is shallow: an instance key hides the whole global value
    /// of the same name, including everything nested below it.
    pub(crate) fn lookup(&self, path: &str) -> Option<&'a Value> {
        if let Some(value) = self.top(path) {
            return Some(value);
        }
        let (head, rest) = path.split_once('.')?;
        walk(self.top(head)?, rest)
    }

    /// Resolves every `ENV` piece, then every `CTX` piece, and joins the
    /// result. Misses render as empty strings.
    pub(crate) fn resolve(&self, pieces: Vec<Piece>) -> String {
        let pieces: Vec<Piece> = pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Env(name) => Piece::Text(self.env.var(&name).unwrap_or_default()),
                other => other,
            })
            .collect();

        let mut line = String::new();
        for piece in pieces {
            match piece {
                Piece::Text(text) => line.push_str(&text),
                Piece::Ctx(path) => match self.lookup(&path) {
                    Some(value) => line.push_str(&value.to_string()),
                    None => trace!(ctx.path = %path, "Context reference unresolved"),
                },
                Piece::Env(_) => {}
            }
        }
        line
    }
}
