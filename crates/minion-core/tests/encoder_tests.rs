use minion_core::{encode, encode_json, encode_with_shapes, MinionError, Record, Value};
use serde_json::json;

/// Helper: build a value from a JSON literal.
fn val(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn enc(json: serde_json::Value) -> String {
    encode(&val(json)).unwrap()
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn encode_null() {
    assert_eq!(enc(json!(null)), "null");
}

#[test]
fn encode_bools() {
    assert_eq!(enc(json!(true)), "true");
    assert_eq!(enc(json!(false)), "false");
}

#[test]
fn encode_integer() {
    assert_eq!(enc(json!(42)), "42");
}

#[test]
fn encode_negative_float() {
    assert_eq!(enc(json!(-3.25)), "-3.25");
}

#[test]
fn encode_string_is_quoted_verbatim() {
    assert_eq!(enc(json!("hello world")), "\"hello world\"");
    assert_eq!(enc(json!("")), "\"\"");
}

#[test]
fn encode_string_with_structural_characters() {
    assert_eq!(enc(json!("a,(b)[c]")), "\"a,(b)[c]\"");
}

// ============================================================================
// Records and shapes
// ============================================================================

#[test]
fn encode_single_record() {
    assert_eq!(
        enc(json!({"name": "John Doe", "age": 42})),
        "$A name,age\nA(\"John Doe\",42)"
    );
}

#[test]
fn encode_array_of_records_shares_shape() {
    assert_eq!(
        enc(json!([
            {"name": "John Doe", "age": 42},
            {"name": "Jane Doe", "age": 43}
        ])),
        "$A name,age\n[A(\"John Doe\",42),A(\"Jane Doe\",43)]"
    );
}

#[test]
fn encode_nested_records_in_pre_order() {
    let expected = "$A user,meta\n$B name,age\n$C created,updated\n\
                    A(B(\"John\",42),C(\"2020-01-01\",\"2020-02-01\"))";
    assert_eq!(
        enc(json!({
            "user": {"name": "John", "age": 42},
            "meta": {"created": "2020-01-01", "updated": "2020-02-01"}
        })),
        expected
    );
}

#[test]
fn encode_keys_with_hyphens() {
    assert_eq!(
        enc(json!({"Content-Type": "application/json", "Content-Length": 123})),
        "$A Content-Type,Content-Length\nA(\"application/json\",123)"
    );
}

#[test]
fn field_order_distinguishes_shapes() {
    assert_eq!(
        enc(json!([{"x": 1, "y": 2}, {"y": 3, "x": 4}])),
        "$A x,y\n$B y,x\n[A(1,2),B(3,4)]"
    );
}

#[test]
fn shapes_allocated_on_first_occurrence() {
    let text = enc(json!([
        {"a": {"p": 1}},
        {"b": 2},
        {"a": {"p": 3}}
    ]));
    assert_eq!(text, "$A a\n$B p\n$C b\n[A(B(1)),C(2),A(B(3))]");
}

#[test]
fn encode_order_example() {
    let text = enc(json!({
        "index": "ord-123",
        "items": [
            {"index": 1, "name": "Widget", "price": 19.99, "quantity": 2},
            {"index": 2, "name": "Gadget", "price": 29.99, "quantity": 1}
        ],
        "total": 109.96
    }));
    assert_eq!(
        text,
        "$A index,items,total\n$B index,name,price,quantity\n\
         A(\"ord-123\",[B(1,\"Widget\",19.99,2),B(2,\"Gadget\",29.99,1)],109.96)"
    );
}

#[test]
fn empty_record_is_zero_field_instance() {
    assert_eq!(enc(json!({})), "$A\nA()");
}

#[test]
fn arrays_without_records_have_no_headers() {
    assert_eq!(enc(json!([1, "two", null, [true]])), "[1,\"two\",null,[true]]");
    assert_eq!(enc(json!([])), "[]");
}

// ============================================================================
// Undefined values
// ============================================================================

#[test]
fn undefined_field_is_omitted_from_shape_and_body() {
    let record = Record::from_fields([
        ("name", Value::from("John Doe")),
        ("age", Value::Undefined),
    ]);
    assert_eq!(
        encode(&Value::Record(record)).unwrap(),
        "$A name\nA(\"John Doe\")"
    );
}

#[test]
fn all_undefined_record_is_zero_field_instance() {
    let record = Record::from_fields([("a", Value::Undefined), ("b", Value::Undefined)]);
    assert_eq!(encode(&Value::Record(record)).unwrap(), "$A\nA()");
}

#[test]
fn undefined_array_slot_encodes_as_null() {
    let value = Value::Array(vec![Value::from(1), Value::Undefined, Value::from(3)]);
    assert_eq!(encode(&value).unwrap(), "[1,null,3]");
}

#[test]
fn undefined_root_is_invalid_input() {
    assert!(matches!(
        encode(&Value::Undefined),
        Err(MinionError::InvalidInput(_))
    ));
}

#[test]
fn optional_values_convert_to_undefined() {
    let nickname: Option<&str> = None;
    let record = Record::from_fields([
        ("name", Value::from("Ann")),
        ("nickname", Value::from(nickname)),
    ]);
    assert_eq!(encode(&Value::Record(record)).unwrap(), "$A name\nA(\"Ann\")");
}

// ============================================================================
// Identity: shared records and cycles
// ============================================================================

#[test]
fn shared_record_is_encoded_once_and_reused() {
    let shared = Record::from_fields([("id", Value::from(7))]);
    let value = Value::Array(vec![
        Value::Record(shared.clone()),
        Value::Record(shared),
    ]);
    let (text, shapes) = encode_with_shapes(&value).unwrap();
    assert_eq!(text, "$A id\n[A(7),A(7)]");
    assert_eq!(shapes.len(), 1);
}

#[test]
fn equal_but_distinct_records_share_shape_only() {
    let a = Record::from_fields([("id", Value::from(1))]);
    let b = Record::from_fields([("id", Value::from(1))]);
    let value = Value::Array(vec![Value::Record(a), Value::Record(b)]);
    assert_eq!(encode(&value).unwrap(), "$A id\n[A(1),A(1)]");
}

#[test]
fn direct_self_reference_is_circular() {
    let record = Record::from_fields([("name", Value::from("loop"))]);
    record.insert("me", Value::Record(record.clone()));
    match encode(&Value::Record(record)) {
        Err(MinionError::CircularReference { path }) => assert_eq!(path, "$.me"),
        other => panic!("expected CircularReference, got {other:?}"),
    }
}

#[test]
fn transitive_cycle_is_circular() {
    let a = Record::new();
    let b = Record::new();
    let c = Record::new();
    a.insert("next", Value::Record(b.clone()));
    b.insert("next", Value::Record(c.clone()));
    c.insert("next", Value::Record(a.clone()));
    assert!(matches!(
        encode(&Value::Record(a)),
        Err(MinionError::CircularReference { .. })
    ));
}

#[test]
fn diamond_sharing_is_not_a_cycle() {
    let leaf = Record::from_fields([("v", Value::from(1))]);
    let left = Record::from_fields([("leaf", Value::Record(leaf.clone()))]);
    let right = Record::from_fields([("leaf", Value::Record(leaf))]);
    let root = Record::from_fields([
        ("left", Value::Record(left)),
        ("right", Value::Record(right)),
    ]);
    assert_eq!(
        encode(&Value::Record(root)).unwrap(),
        "$A left,right\n$B leaf\n$C v\nA(B(C(1)),B(C(1)))"
    );
}

// ============================================================================
// Unsupported values
// ============================================================================

#[test]
fn non_finite_number_is_unsupported() {
    assert!(matches!(
        encode(&Value::Number(f64::NAN)),
        Err(MinionError::UnsupportedValue(_))
    ));
}

#[test]
fn string_with_quote_is_unsupported() {
    assert!(matches!(
        encode(&val(json!({"say": "\"hi\""}))),
        Err(MinionError::UnsupportedValue(_))
    ));
}

#[test]
fn string_with_newline_is_unsupported() {
    assert!(matches!(
        encode(&val(json!(["line1\nline2"]))),
        Err(MinionError::UnsupportedValue(_))
    ));
}

#[test]
fn comma_in_field_name_is_unsupported() {
    assert!(matches!(
        encode(&val(json!({"a,b": 1}))),
        Err(MinionError::UnsupportedValue(_))
    ));
}

#[test]
fn empty_field_name_is_unsupported() {
    assert!(matches!(
        encode(&val(json!({"": 1}))),
        Err(MinionError::UnsupportedValue(_))
    ));
}

// ============================================================================
// Per-call state
// ============================================================================

#[test]
fn shape_names_restart_every_call() {
    let first = enc(json!({"x": 1}));
    let second = enc(json!({"y": 2}));
    assert_eq!(first, "$A x\nA(1)");
    assert_eq!(second, "$A y\nA(2)");
}

#[test]
fn concurrent_encodes_do_not_interfere() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let key = format!("field{i}");
                let value = Value::from(json!([{ (key.clone()): i }, {"shared": i}]));
                (key, encode(&value).unwrap())
            })
        })
        .collect();
    for handle in handles {
        let (key, text) = handle.join().unwrap();
        assert!(text.starts_with(&format!("$A {key}\n$B shared\n")), "{text}");
    }
}

#[test]
fn encode_json_rejects_invalid_json() {
    assert!(matches!(
        encode_json("not json {"),
        Err(MinionError::Json(_))
    ));
}
