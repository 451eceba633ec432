//! MINION Encoder — serializes a value tree into MINION text.
//!
//! Records are written as positional instances `Name(v1,v2)` whose field names
//! are declared once in a header block. Every distinct ordered field sequence
//! gets the next name from the bijective base-26 series (`A`, `B`, … `Z`, `AA`),
//! allocated in pre-order, first-occurrence order:
//!
//! ```
//! use minion_core::{encode, Record, Value};
//! let user = Record::from_fields([
//!     ("name", Value::from("John Doe")),
//!     ("age", Value::from(42)),
//! ]);
//! let text = encode(&Value::Record(user)).unwrap();
//! assert_eq!(text, "$A name,age\nA(\"John Doe\",42)");
//! ```
//!
//! Traversal is identity-aware. A record reached again while it is still being
//! encoded is a cycle and fails with `CircularReference`; a record reached again
//! after it was finished reuses its cached text. Two distinct records with equal
//! content are still encoded independently.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{MinionError, Result};
use crate::registry::{ShapeEntry, ShapeRegistry};
use crate::value::{Record, RecordId, Value};
use crate::MAX_DEPTH;

/// Encode a value into MINION text.
///
/// Fails with `UnsupportedValue` for values that have no textual form
/// (non-finite numbers, strings containing `"` or line breaks, field names the
/// header grammar cannot carry), `CircularReference` for cyclic graphs, and
/// `InvalidInput` for an `Undefined` root.
pub fn encode(value: &Value) -> Result<String> {
    encode_with_shapes(value).map(|(text, _)| text)
}

/// Encode a value and also return the shapes declared in the header block.
pub fn encode_with_shapes(value: &Value) -> Result<(String, Vec<ShapeEntry>)> {
    if value.is_undefined() {
        return Err(MinionError::InvalidInput(
            "cannot encode an undefined root value".to_string(),
        ));
    }

    let mut encoder = Encoder::default();
    let body = encoder.encode_value(value)?;

    let mut lines: Vec<String> = encoder.shapes.header_lines().collect();
    lines.push(body);
    let text = lines.join("\n");

    debug!(
        shapes = encoder.shapes.len(),
        records = encoder.finished.len(),
        bytes = text.len(),
        "encoded MINION document"
    );
    Ok((text, encoder.shapes.entries().to_vec()))
}

/// Encoding context for one call: shape names, the records currently on the
/// recursion stack, and the text of records already finished.
#[derive(Default)]
struct Encoder {
    shapes: ShapeRegistry,
    on_stack: HashSet<RecordId>,
    finished: HashMap<RecordId, String>,
    /// Field/index path from the root, for cycle diagnostics.
    path: Vec<String>,
}

impl Encoder {
    fn encode_value(&mut self, value: &Value) -> Result<String> {
        if self.path.len() > MAX_DEPTH {
            return Err(MinionError::NestingTooDeep { limit: MAX_DEPTH });
        }
        match value {
            Value::Null | Value::Undefined => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => format_number(*n),
            Value::String(s) => encode_string(s),
            Value::Array(items) => self.encode_array(items),
            Value::Record(record) => self.encode_record(record),
        }
    }

    fn encode_array(&mut self, items: &[Value]) -> Result<String> {
        let mut parts = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            self.path.push(format!("[{i}]"));
            parts.push(self.encode_value(item)?);
            self.path.pop();
        }
        Ok(format!("[{}]", parts.join(",")))
    }

    fn encode_record(&mut self, record: &Record) -> Result<String> {
        let id = record.id();
        if let Some(text) = self.finished.get(&id) {
            return Ok(text.clone());
        }
        if self.on_stack.contains(&id) {
            return Err(MinionError::CircularReference {
                path: self.path_string(),
            });
        }

        self.on_stack.insert(id);
        let fields = record.fields();
        let retained: Vec<&(String, Value)> =
            fields.iter().filter(|(_, v)| !v.is_undefined()).collect();

        let keys = retained
            .iter()
            .map(|(k, _)| check_field_name(k).map(|()| k.clone()))
            .collect::<Result<Vec<String>>>()?;
        let name = self.shapes.assign(&keys).to_string();

        let mut args = Vec::with_capacity(retained.len());
        for (key, value) in retained {
            self.path.push(format!(".{key}"));
            args.push(self.encode_value(value)?);
            self.path.pop();
        }

        let text = format!("{}({})", name, args.join(","));
        self.on_stack.remove(&id);
        self.finished.insert(id, text.clone());
        Ok(text)
    }

    fn path_string(&self) -> String {
        format!("${}", self.path.concat())
    }
}

/// Shortest decimal form that reads back to the same `f64`. No exponents;
/// negative zero is written as `0`.
fn format_number(n: f64) -> Result<String> {
    if !n.is_finite() {
        return Err(MinionError::UnsupportedValue(format!(
            "non-finite number {n}"
        )));
    }
    let n = if n == 0.0 { 0.0 } else { n };
    Ok(format!("{n}"))
}

/// Strings are written between double quotes verbatim; the grammar has no
/// escapes, so quotes and line breaks cannot be represented.
fn encode_string(s: &str) -> Result<String> {
    if s.contains('"') {
        return Err(MinionError::UnsupportedValue(format!(
            "string contains a double quote: {s}"
        )));
    }
    if s.contains(['\n', '\r']) {
        return Err(MinionError::UnsupportedValue(format!(
            "string contains a line break: {s:?}"
        )));
    }
    Ok(format!("\"{s}\""))
}

/// A field name must survive a header line: non-empty, no comma or line
/// break, no surrounding whitespace.
fn check_field_name(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "is empty"
    } else if key.contains(',') {
        "contains a comma"
    } else if key.contains(['\n', '\r']) {
        "contains a line break"
    } else if key.trim() != key {
        "has leading or trailing whitespace"
    } else {
        return Ok(());
    };
    Err(MinionError::UnsupportedValue(format!(
        "field name {key:?} {reason}"
    )))
}
