//! # minion-core
//!
//! Pure-Rust encoder and decoder for **MINION**, a compact text notation for
//! tree-shaped data that declares each distinct record shape once and writes
//! records as positional instances.
//!
//! ```text
//! $A name,age
//! [A("John Doe",42),A("Jane Doe",43)]
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use minion_core::{decode_json, encode_json};
//!
//! // JSON → MINION
//! let json = r#"[{"name":"John Doe","age":42},{"name":"Jane Doe","age":43}]"#;
//! let text = encode_json(json).unwrap();
//! assert_eq!(text, "$A name,age\n[A(\"John Doe\",42),A(\"Jane Doe\",43)]");
//!
//! // MINION → JSON (roundtrip)
//! let back = decode_json(&text).unwrap();
//! assert_eq!(back, json);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — value tree → MINION text (shape dedup, cycle detection)
//! - [`decoder`] — MINION text → value tree (header block + recursive descent)
//! - [`scanner`] — quote-aware top-level splitting and bracket matching
//! - [`registry`] — per-call type and shape registries
//! - [`value`] — `Value` tree with identity-carrying `Record` handles
//! - [`json`] — `serde_json` bridge
//! - [`error`] — error types for parse/encode failures

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod registry;
pub mod scanner;
pub mod value;

pub use decoder::{decode, decode_document, Document};
pub use encoder::{encode, encode_with_shapes};
pub use error::{MinionError, Result};
pub use json::{decode_json, encode_json};
pub use registry::{ShapeEntry, TypeDef};
pub use value::{Record, Value};

/// Deepest nesting of arrays and instances either direction will follow.
pub const MAX_DEPTH: usize = 128;
