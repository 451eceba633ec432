//! Error types for MINION encoding and decoding operations.

use thiserror::Error;

/// Errors that can occur during MINION encoding or decoding.
///
/// Every error aborts the whole operation; there are no partial results.
#[derive(Error, Debug)]
pub enum MinionError {
    /// The input was empty where content is required, or the root value is absent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A `$Name f1,f2` header line lacks a name or has an empty field entry.
    /// Includes the 1-based line number where the error was detected.
    #[error("malformed type definition at line {line}: {message}")]
    MalformedTypeDef { line: usize, message: String },

    /// An instance references a type name that no header line declared.
    #[error("unknown type \"{name}\" - available types: {}", .known.join(","))]
    UnknownType { name: String, known: Vec<String> },

    /// An instance supplies a different number of arguments than its type declares.
    #[error("wrong number of arguments for \"{name}\": expected {expected}, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A value token matched none of the recognized shapes, or a string literal
    /// or bracket was left open.
    #[error("malformed value: {0}")]
    MalformedValue(String),

    /// An array literal is not closed by its final `]`.
    #[error("malformed array: {0}")]
    MalformedArray(String),

    /// An instance literal has no name or is not closed by its final `)`.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// The encoder met a value with no textual representation.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// A record is reachable from itself. `path` locates the closing reference.
    #[error("circular reference at {path}")]
    CircularReference { path: String },

    /// Nesting exceeded [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// JSON text could not be parsed or produced (JSON bridge only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout minion-core.
pub type Result<T> = std::result::Result<T, MinionError>;
