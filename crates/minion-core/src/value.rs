//! MINION value tree.
//!
//! Arrays own their elements, records are shared handles. Cloning a [`Record`]
//! yields another handle to the same node, which is how a value graph expresses
//! shared substructures and (deliberately or not) cycles. The encoder relies on
//! that identity for memoization and cycle detection.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A MINION document value. Mirrors JSON types, plus `Undefined` for a slot
/// that holds no value at all: an `Undefined` record field is left out of the
/// record's shape, an `Undefined` array slot encodes as `null`.
#[derive(Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Record(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// Identity of a record node, stable for as long as any handle to it lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RecordId(usize);

/// Shared, ordered key/value node. Keys keep insertion order; inserting an
/// existing key replaces its value in place.
#[derive(Clone, Default)]
pub struct Record(Rc<RefCell<Vec<(String, Value)>>>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from key/value pairs. Later duplicates overwrite earlier ones.
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let record = Record::new();
        for (key, value) in fields {
            record.insert(key, value);
        }
        record
    }

    /// Build a record from pairs whose keys are already distinct, skipping the
    /// per-key lookup `from_fields` does. Duplicate keys are kept as given.
    pub fn from_unique_fields(fields: Vec<(String, Value)>) -> Self {
        Record(Rc::new(RefCell::new(fields)))
    }

    /// Insert or replace a field, returning the previous value if any.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        let mut fields = self.0.borrow_mut();
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut fields = self.0.borrow_mut();
        let pos = fields.iter().position(|(k, _)| k == key)?;
        Some(fields.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Borrow the fields in insertion order.
    ///
    /// # Panics
    /// If the record is mutably borrowed elsewhere (an `insert` in progress).
    pub fn fields(&self) -> Ref<'_, [(String, Value)]> {
        Ref::map(self.0.borrow(), |fields| fields.as_slice())
    }

    /// True when both handles point at the same node.
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> RecordId {
        RecordId(Rc::as_ptr(&self.0) as *const () as usize)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

// Structural equality. Record pairs already under comparison are assumed
// equal, so two cyclic graphs of the same shape compare equal instead of
// recursing forever.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_eq(self, other, &mut Vec::new())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        records_eq(self, other, &mut Vec::new())
    }
}

fn values_eq(a: &Value, b: &Value, seen: &mut Vec<(RecordId, RecordId)>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_eq(x, y, seen))
        }
        (Value::Record(x), Value::Record(y)) => records_eq(x, y, seen),
        _ => false,
    }
}

fn records_eq(a: &Record, b: &Record, seen: &mut Vec<(RecordId, RecordId)>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    let pair = (a.id(), b.id());
    if seen.contains(&pair) {
        return true;
    }
    seen.push(pair);
    let xs = a.fields();
    let ys = b.fields();
    let equal = xs.len() == ys.len()
        && xs
            .iter()
            .zip(ys.iter())
            .all(|((kx, vx), (ky, vy))| kx == ky && values_eq(vx, vy, seen));
    seen.pop();
    equal
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DebugValue {
            value: self,
            stack: &RefCell::new(Vec::new()),
        }
        .fmt(f)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DebugRecord {
            record: self,
            stack: &RefCell::new(Vec::new()),
        }
        .fmt(f)
    }
}

/// Debug adapter that prints a back-reference marker instead of re-entering
/// a record that is already being printed.
struct DebugValue<'a> {
    value: &'a Value,
    stack: &'a RefCell<Vec<RecordId>>,
}

struct DebugRecord<'a> {
    record: &'a Record,
    stack: &'a RefCell<Vec<RecordId>>,
}

impl fmt::Debug for DebugValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Null => f.write_str("Null"),
            Value::Undefined => f.write_str("Undefined"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(items) => f
                .debug_list()
                .entries(items.iter().map(|value| DebugValue {
                    value,
                    stack: self.stack,
                }))
                .finish(),
            Value::Record(record) => DebugRecord {
                record,
                stack: self.stack,
            }
            .fmt(f),
        }
    }
}

impl fmt::Debug for DebugRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.record.id();
        if self.stack.borrow().contains(&id) {
            return f.write_str("<cycle>");
        }
        self.stack.borrow_mut().push(id);
        let fields = self.record.fields();
        let result = f
            .debug_map()
            .entries(fields.iter().map(|(k, value)| {
                (
                    k,
                    DebugValue {
                        value,
                        stack: self.stack,
                    },
                )
            }))
            .finish();
        self.stack.borrow_mut().pop();
        result
    }
}
