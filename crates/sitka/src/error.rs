//! Error types.

use std::io;
use thiserror::Error;

/// Errors surfaced by a log call.
///
/// Rendering never fails; the only failure is a writer rejecting the line.
#[derive(Error, Debug)]
pub enum Error {
    /// The log or error writer failed.
    #[error("log writer failed: {0}")]
    Write(#[from] io::Error),
}

/// A specialized [`Result`] type for log calls.
pub type Result<T> = std::result::Result<T, Error>;
