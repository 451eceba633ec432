//! JSON bridge — drive the codec from JSON text.
//!
//! `serde_json` is built with `preserve_order`, so object keys keep their
//! document order in both directions and record shapes come out as written.

use std::collections::HashSet;

use serde_json::{Map, Number};

use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::{MinionError, Result};
use crate::value::{Record, RecordId, Value};
use crate::MAX_DEPTH;

/// Encode a JSON string into MINION text.
///
/// ```
/// let text = minion_core::encode_json(r#"{"name":"John Doe","age":42}"#).unwrap();
/// assert_eq!(text, "$A name,age\nA(\"John Doe\",42)");
/// ```
pub fn encode_json(json: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    encode(&Value::from(value))
}

/// Decode MINION text into compact JSON.
///
/// Use `serde_json::to_string_pretty` on [`Value::to_json`] when
/// human-readable output is needed.
pub fn decode_json(text: &str) -> Result<String> {
    let value = decode(text)?;
    Ok(serde_json::to_string(&value.to_json()?)?)
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(Record::from_unique_fields(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
        }
    }
}

impl Value {
    /// Convert to a `serde_json::Value`.
    ///
    /// `Undefined` record fields are dropped and `Undefined` array slots become
    /// `null`. Whole numbers within the exact-integer range of `f64` become JSON
    /// integers. Shared records are expanded at every occurrence; cycles fail
    /// with `CircularReference`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        to_json_inner(self, &mut HashSet::new(), 0)
    }
}

fn to_json_inner(
    value: &Value,
    on_stack: &mut HashSet<RecordId>,
    depth: usize,
) -> Result<serde_json::Value> {
    if depth > MAX_DEPTH {
        return Err(MinionError::NestingTooDeep { limit: MAX_DEPTH });
    }
    Ok(match value {
        Value::Null | Value::Undefined => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(json_number(*n)?),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json_inner(item, on_stack, depth + 1))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Record(record) => {
            let id = record.id();
            if !on_stack.insert(id) {
                return Err(MinionError::CircularReference {
                    path: format!("record with keys [{}]", record.keys().join(",")),
                });
            }
            let mut map = Map::new();
            for (key, field) in record.fields().iter() {
                if field.is_undefined() {
                    continue;
                }
                map.insert(key.clone(), to_json_inner(field, on_stack, depth + 1)?);
            }
            on_stack.remove(&id);
            serde_json::Value::Object(map)
        }
    })
}

/// Largest integer magnitude an `f64` represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn json_number(n: f64) -> Result<Number> {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        return Ok(Number::from(n as i64));
    }
    Number::from_f64(n)
        .ok_or_else(|| MinionError::UnsupportedValue(format!("non-finite number {n}")))
}
