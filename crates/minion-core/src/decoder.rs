//! MINION Decoder — rebuilds a value tree from MINION text.
//!
//! A document is a block of `$Name f1,f2` header lines followed by a body:
//!
//! ```text
//! $Order id,items,total
//! $Product name,price
//! Order("ord-123",[Product("Widget",19.99),Product("Gadget",29.99)],49.98)
//! ```
//!
//! Header lines fill a [`TypeRegistry`]; the body is then parsed by a
//! recursive-descent value parser that resolves every `Name(...)` instance
//! against it. Header scanning stops at the first non-blank line that does not
//! start with `$`; every remaining non-blank line belongs to the body and is
//! joined with single spaces.
//!
//! # Key design decisions
//!
//! - **Registry per call**: each `decode` owns its own `TypeRegistry`, so
//!   concurrent decodes never observe each other's declarations.
//! - **Quote-aware boundaries**: array and instance extents are found with the
//!   scanner in [`crate::scanner`], so `,()[]` inside string literals are data.
//! - **Booleans**: `true`/`false` are recognized as literals, matching what the
//!   encoder emits.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{MinionError, Result};
use crate::registry::{TypeDef, TypeRegistry};
use crate::scanner::{find_matching_close, split_top_level};
use crate::value::{Record, Value};
use crate::MAX_DEPTH;

/// A decoded document: the declared types plus the body value.
#[derive(Debug)]
pub struct Document {
    /// Declarations in effect at the end of the header block, sorted by name.
    pub types: Vec<TypeDef>,
    pub value: Value,
}

/// Decode MINION text into a value.
///
/// Fails on any grammar violation: unknown types, wrong argument counts,
/// unbalanced brackets, or tokens that match no value form.
pub fn decode(text: &str) -> Result<Value> {
    decode_document(text).map(|doc| doc.value)
}

/// Decode MINION text, keeping the declared types alongside the value.
pub fn decode_document(text: &str) -> Result<Document> {
    if text.trim().is_empty() {
        return Err(MinionError::InvalidInput("empty document".to_string()));
    }

    let mut decoder = Decoder::default();
    let body = decoder.read_header_block(text)?;
    if body.is_empty() {
        return Err(MinionError::InvalidInput(
            "document has no body after its type headers".to_string(),
        ));
    }

    let value = decoder.parse_value(&body, 0)?;
    debug!(
        types = decoder.types.len(),
        bytes = text.len(),
        "decoded MINION document"
    );
    Ok(Document {
        types: decoder.types.definitions(),
        value,
    })
}

/// Decoding context for one call.
#[derive(Default)]
struct Decoder {
    types: TypeRegistry,
}

impl Decoder {
    /// Register every leading header line and return the body text.
    fn read_header_block(&mut self, text: &str) -> Result<String> {
        let mut body: Vec<&str> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if body.is_empty() && line.starts_with('$') {
                let def = parse_type_def(line, idx + 1)?;
                self.types.define(def.name, def.fields);
            } else {
                body.push(line);
            }
        }

        Ok(body.join(" "))
    }

    /// Classify and decode one value. Order matters: keywords, then arrays,
    /// strings, numbers, and finally instances.
    fn parse_value(&self, text: &str, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(MinionError::NestingTooDeep { limit: MAX_DEPTH });
        }
        let text = text.trim();

        match text {
            "null" => return Ok(Value::Null),
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }

        if text.starts_with('[') {
            return self.parse_array(text, depth);
        }

        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return Ok(Value::String(text[1..text.len() - 1].to_string()));
        }

        if let Some(n) = parse_number(text) {
            if !n.is_finite() {
                return Err(MinionError::MalformedValue(format!(
                    "number out of range: {text}"
                )));
            }
            return Ok(Value::Number(n));
        }

        if text.contains('(') {
            return self.parse_instance(text, depth);
        }

        Err(MinionError::MalformedValue(format!(
            "unrecognized value: {text}"
        )))
    }

    /// `[v1,v2,...]` — the bracket closing the leading `[` must end the text.
    fn parse_array(&self, text: &str, depth: usize) -> Result<Value> {
        let close = find_matching_close(text, 0).map_err(|_| {
            MinionError::MalformedArray(format!("expected ending ']' in: {text}"))
        })?;
        if close != text.len() - 1 {
            return Err(MinionError::MalformedArray(format!(
                "unexpected text after ']' in: {text}"
            )));
        }

        split_top_level(&text[1..close])?
            .into_iter()
            .map(|item| self.parse_value(item, depth + 1))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    /// `Name(a1,...,an)` — resolves `Name`, parses the arguments, then checks
    /// arity before zipping arguments onto the declared fields.
    fn parse_instance(&self, text: &str, depth: usize) -> Result<Value> {
        let open = text.find('(').ok_or_else(|| {
            MinionError::MalformedObject(format!("expected '(' in: {text}"))
        })?;
        let name = text[..open].trim();
        if name.is_empty() {
            return Err(MinionError::MalformedObject(format!(
                "missing type name in: {text}"
            )));
        }

        let close = find_matching_close(text, open).map_err(|_| {
            MinionError::MalformedObject(format!("expected ending ')' in: {text}"))
        })?;
        if close != text.len() - 1 {
            return Err(MinionError::MalformedObject(format!(
                "unexpected text after ')' in: {text}"
            )));
        }

        let fields = self.types.resolve(name)?;
        let args = split_top_level(&text[open + 1..close])?
            .into_iter()
            .map(|arg| self.parse_value(arg, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        if args.len() != fields.len() {
            return Err(MinionError::ArityMismatch {
                name: name.to_string(),
                expected: fields.len(),
                found: args.len(),
            });
        }

        let pairs = fields.iter().cloned().zip(args);
        let record = if has_unique_names(fields) {
            Record::from_unique_fields(pairs.collect())
        } else {
            // `$A x,x`: the last argument for a repeated field wins.
            Record::from_fields(pairs)
        };
        Ok(Value::Record(record))
    }
}

/// Parse a header line `$Name f1,f2,...`. The name ends at the first
/// whitespace; an absent field list declares a zero-field type.
fn parse_type_def(line: &str, line_no: usize) -> Result<TypeDef> {
    let rest = &line[1..];
    let (name, field_list) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], rest[pos..].trim()),
        None => (rest, ""),
    };

    if name.is_empty() {
        return Err(MinionError::MalformedTypeDef {
            line: line_no,
            message: "expected a type name after '$'".to_string(),
        });
    }

    let mut fields = Vec::new();
    if !field_list.is_empty() {
        for field in field_list.split(',').map(str::trim) {
            if field.is_empty() {
                return Err(MinionError::MalformedTypeDef {
                    line: line_no,
                    message: format!("empty field name in declaration of \"{name}\""),
                });
            }
            fields.push(field.to_string());
        }
    }

    Ok(TypeDef {
        name: name.to_string(),
        fields,
    })
}

fn has_unique_names(fields: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(fields.len());
    fields.iter().all(|field| seen.insert(field.as_str()))
}

/// Decimal literal: optional sign, digits with optional fraction, optional
/// exponent. Rejects `inf`, `NaN`, and anything else `f64::from_str` would
/// otherwise accept beyond plain decimal notation.
fn parse_number(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let decimal_only = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal_only {
        return None;
    }
    text.parse::<f64>().ok()
}
