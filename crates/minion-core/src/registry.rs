//! Per-call type bookkeeping for both directions.
//!
//! [`TypeRegistry`] maps declared header names to field lists while decoding.
//! [`ShapeRegistry`] hands out short names to distinct field sequences while
//! encoding. Neither is ever shared between calls.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use crate::error::{MinionError, Result};

/// A declared type: `$name f1,f2,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDef {
    pub name: String,
    pub fields: Vec<String>,
}

impl TypeDef {
    /// Render as a header line, e.g. `$A name,age` (or `$A` with no fields).
    pub fn header_line(&self) -> String {
        if self.fields.is_empty() {
            format!("${}", self.name)
        } else {
            format!("${} {}", self.name, self.fields.join(","))
        }
    }
}

/// Decode-side registry of declared types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Vec<String>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. Redeclaring a name replaces the earlier field list.
    pub fn define(&mut self, name: impl Into<String>, fields: Vec<String>) {
        let name = name.into();
        trace!(name = %name, fields = fields.len(), "declared type");
        self.types.insert(name, fields);
    }

    /// Field list for `name`, or `UnknownType` listing the known names.
    pub fn resolve(&self, name: &str) -> Result<&[String]> {
        self.types
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MinionError::UnknownType {
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Declared names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All declarations, sorted by name.
    pub fn definitions(&self) -> Vec<TypeDef> {
        self.names()
            .into_iter()
            .map(|name| {
                let fields = self.types[&name].clone();
                TypeDef { name, fields }
            })
            .collect()
    }
}

/// A shape discovered while encoding, with its allocated name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeEntry {
    pub name: String,
    pub fields: Vec<String>,
}

/// Encode-side registry: one name per distinct ordered field sequence.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    by_fields: HashMap<Vec<String>, usize>,
    entries: Vec<ShapeEntry>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name for this field sequence, allocating the next one on first sight.
    pub fn assign(&mut self, fields: &[String]) -> &str {
        let idx = match self.by_fields.get(fields) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                let name = alpha_id(idx + 1);
                trace!(name = %name, fields = fields.len(), "allocated shape");
                self.entries.push(ShapeEntry {
                    name,
                    fields: fields.to_vec(),
                });
                self.by_fields.insert(fields.to_vec(), idx);
                idx
            }
        };
        &self.entries[idx].name
    }

    /// Shapes in allocation order.
    pub fn entries(&self) -> &[ShapeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header block, one `$Name f1,f2` line per shape in allocation order.
    pub fn header_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|entry| {
            TypeDef {
                name: entry.name.clone(),
                fields: entry.fields.clone(),
            }
            .header_line()
        })
    }
}

/// Bijective base-26 name: 1 → `A`, 26 → `Z`, 27 → `AA`, 702 → `ZZ`, 703 → `AAA`.
pub fn alpha_id(mut n: usize) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    out.iter().rev().collect()
}
