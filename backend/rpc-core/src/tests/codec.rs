use crate::codec::{
    FUNCTION_RESULTS_KEY, decode_object, decode_value, decode_wrapped, encode_object,
    encode_value, encode_wrapped, parse_map,
};
use crate::error::CodecError;
use crate::registry::ReferenceRegistry;
use crate::tests::fixtures::InertProxies;
use crate::value::{Function, ObjectMap, RegExpLiteral, Symbol, Value};

use models::ValueDescriptor;

use chrono::{TimeZone, Utc};
use num_bigint::BigInt;

fn plain_object() -> ObjectMap {
    let mut inner = ObjectMap::new();
    inner.insert("obj".into(), "innerObj".into());

    let mut nested = ObjectMap::new();
    nested.insert("foo".into(), "bar".into());
    nested.insert("baz".into(), "qux".into());

    let mut object = ObjectMap::new();
    object.insert("number".into(), Value::Number(1.5));
    object.insert("integer".into(), 42.into());
    object.insert("text".into(), "hello".into());
    object.insert("flag".into(), false.into());
    object.insert("nothing".into(), Value::Null);
    object.insert("missing".into(), Value::Undefined);
    object.insert("big".into(), BigInt::from(1u64 << 53).into());
    object.insert(
        "list".into(),
        Value::Array(vec![1.into(), 2.into(), "foo".into(), inner.into()]),
    );
    object.insert("nested".into(), nested.into());
    object
}

/// **VALUE**: Verifies every JSON-representable kind survives encode then decode.
///
/// **WHY THIS MATTERS**: Clients rebuild objects exclusively from descriptors; any
/// lossy kind silently corrupts remote state.
///
/// **BUG THIS CATCHES**: Would catch a kind mapped to the wrong tag, a nested object
/// decoded as a string, or bigint precision loss.
#[test]
fn given_plain_object_when_encoded_and_decoded_then_values_match() {
    // GIVEN: An object with only plain kinds
    let object = plain_object();
    let mut registry = ReferenceRegistry::new();

    // WHEN: Encoding and decoding it
    let payload = encode_object(&object, "root", &mut registry).unwrap();
    let decoded = decode_object(&payload, &InertProxies).unwrap();

    // THEN: Identical values, no handles minted
    assert_eq!(Value::Object(decoded), Value::Object(object));
    assert_eq!(registry.function_count(), 0);
    assert_eq!(registry.symbol_count(), 0);
}

/// **VALUE**: Verifies nested objects are double-encoded.
///
/// **WHY THIS MATTERS**: Existing peers parse the nested `result` as a string; a
/// structured nested map would break them.
///
/// **BUG THIS CATCHES**: Would catch "fixing" the nested encoding into plain JSON.
#[test]
fn given_nested_object_when_encoded_then_result_is_serialized_string() {
    // GIVEN: An object with a nested object
    let object = plain_object();
    let mut registry = ReferenceRegistry::new();

    // WHEN: Encoding
    let map = parse_map(&encode_object(&object, "root", &mut registry).unwrap()).unwrap();

    // THEN: The nested descriptor carries a string that is itself a descriptor map
    let Some(ValueDescriptor::Object { result }) = map.get("nested") else {
        panic!("Expected object descriptor for nested");
    };
    let inner = parse_map(result).unwrap();
    assert_eq!(
        inner.get("foo"),
        Some(&ValueDescriptor::String {
            result: String::from("bar")
        })
    );
}

/// **VALUE**: Verifies dates travel as `Date.prototype.toString` text and come back
/// as the same instant.
///
/// **WHY THIS MATTERS**: Peers display and re-parse the date string.
///
/// **BUG THIS CATCHES**: Would catch a switch to RFC 3339 on the wire or a parse
/// that ignores the zone offset.
#[test]
fn given_date_when_encoded_then_uses_human_form_and_round_trips() {
    // GIVEN: A date at second precision
    let instant = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let mut registry = ReferenceRegistry::new();

    // WHEN: Encoding and decoding
    let descriptor = encode_value(&Value::Date(instant), "when", "root", &mut registry).unwrap();
    let decoded = decode_value(&descriptor, &InertProxies).unwrap();

    // THEN: Human-readable UTC form, same instant back
    assert_eq!(
        descriptor,
        ValueDescriptor::Date {
            result: String::from("Tue Jan 02 2024 03:04:05 GMT+0000 (Coordinated Universal Time)")
        }
    );
    assert_eq!(decoded, Value::Date(instant));
}

/// **VALUE**: Verifies regexps keep pattern and flags across the wire.
///
/// **WHY THIS MATTERS**: Dropping flags changes matching semantics on the peer.
///
/// **BUG THIS CATCHES**: Would catch the decoder trimming the literal by fixed
/// offsets and losing the flags.
#[test]
fn given_regexp_with_flags_when_round_tripped_then_pattern_and_flags_survive() {
    // GIVEN: A case-insensitive pattern
    let literal = RegExpLiteral::new(r"\d+/x", "gi");
    let mut registry = ReferenceRegistry::new();

    // WHEN: Encoding and decoding
    let descriptor =
        encode_value(&Value::RegExp(literal.clone()), "re", "root", &mut registry).unwrap();
    let decoded = decode_value(&descriptor, &InertProxies).unwrap();

    // THEN: Literal text and value both intact
    assert_eq!(
        descriptor,
        ValueDescriptor::RegExp {
            result: String::from(r"/\d+/x/gi")
        }
    );
    assert_eq!(decoded, Value::RegExp(literal));
}

/// **VALUE**: Verifies one function under two keys gets two independent handles.
///
/// **WHY THIS MATTERS**: Handles are disposed individually; sharing one would make
/// disposing either key break the other.
///
/// **BUG THIS CATCHES**: Would catch handle caching by function identity.
#[test]
fn given_same_function_under_two_keys_when_encoded_then_handles_differ() {
    // GIVEN: One function stored twice
    let function = Function::native(|_| Ok(Value::Null));
    let mut object = ObjectMap::new();
    object.insert("first".into(), function.clone().into());
    object.insert("second".into(), function.into());
    let mut registry = ReferenceRegistry::new();

    // WHEN: Encoding
    let map = parse_map(&encode_object(&object, "root", &mut registry).unwrap()).unwrap();

    // THEN: Two distinct handles, both named after their keys
    let handles: Vec<(String, String)> = ["first", "second"]
        .iter()
        .map(|key| match map.get(*key) {
            Some(ValueDescriptor::Function {
                function_name,
                calling_id,
            }) => (function_name.clone(), calling_id.to_string()),
            other => panic!("Expected function descriptor, got {other:?}"),
        })
        .collect();
    assert_eq!(handles[0].0, "first");
    assert_eq!(handles[1].0, "second");
    assert_ne!(handles[0].1, handles[1].1);
    assert_eq!(registry.function_count(), 2);

    // THEN: Disposing one leaves the other
    registry.dispose_function(&handles[0].1).unwrap();
    assert!(registry.function(&handles[1].1).is_some());
}

/// **VALUE**: Verifies array elements inherit the array's key as function name.
///
/// **WHY THIS MATTERS**: Function names in arrays are how peers label proxies.
///
/// **BUG THIS CATCHES**: Would catch elements named by index instead.
#[test]
fn given_function_in_array_when_encoded_then_named_after_array_key() {
    // GIVEN: An array containing a function
    let value = Value::Array(vec![1.into(), Function::native(|_| Ok(Value::Null)).into()]);
    let mut registry = ReferenceRegistry::new();

    // WHEN: Encoding it under "arrayObj"
    let descriptor = encode_value(&value, "arrayObj", "root", &mut registry).unwrap();

    // THEN: The function descriptor is named "arrayObj"
    let ValueDescriptor::Array { result } = descriptor else {
        panic!("Expected array descriptor");
    };
    assert!(matches!(
        &result[1],
        ValueDescriptor::Function { function_name, .. } if function_name == "arrayObj"
    ));
    assert_eq!(registry.object("root").unwrap().functions().len(), 1);
}

/// **VALUE**: Verifies symbols are registered and decode to fresh local tokens.
///
/// **WHY THIS MATTERS**: The symbol handle is the only way back to the original.
///
/// **BUG THIS CATCHES**: Would catch symbols encoded without a registry entry.
#[test]
fn given_symbol_when_encoded_then_registered_and_decoded_as_labeled_token() {
    // GIVEN: A symbol
    let symbol = Symbol::labeled("globalSymbol");
    let mut registry = ReferenceRegistry::new();

    // WHEN: Encoding and decoding
    let descriptor =
        encode_value(&Value::Symbol(symbol.clone()), "s", "root", &mut registry).unwrap();
    let ValueDescriptor::Symbol { symbol_id } = &descriptor else {
        panic!("Expected symbol descriptor");
    };
    let decoded = decode_value(&descriptor, &InertProxies).unwrap();

    // THEN: Registry resolves the handle to the original; decoded token embeds the handle
    assert!(registry.symbol(symbol_id.as_str()).unwrap().ptr_eq(&symbol));
    let decoded = decoded.as_symbol().unwrap().clone();
    assert_eq!(decoded.to_string(), format!("Symbol({symbol_id})"));
    assert!(!decoded.ptr_eq(&symbol));
}

/// **VALUE**: Verifies wrapped payloads round-trip and a missing key is malformed.
///
/// **WHY THIS MATTERS**: Call results and callback params use the wrapper shape.
///
/// **BUG THIS CATCHES**: Would catch a missing key decoding as `undefined`.
#[test]
fn given_wrapped_payload_when_key_missing_then_malformed() {
    // GIVEN: A wrapped result
    let mut registry = ReferenceRegistry::new();
    let payload =
        encode_wrapped(FUNCTION_RESULTS_KEY, 133.into(), "owner", &mut registry).unwrap();

    // WHEN: Decoding with the right and the wrong key
    let found = decode_wrapped(&payload, FUNCTION_RESULTS_KEY, &InertProxies).unwrap();
    let missing = decode_wrapped(&payload, "callbackParams", &InertProxies);

    // THEN: Value for the right key, malformed for the wrong one
    assert_eq!(payload, r#"{"functionResults":{"type":"number","result":133}}"#);
    assert_eq!(found, Value::Number(133.0));
    assert!(matches!(missing, Err(CodecError::Malformed { .. })));
}

/// **VALUE**: Verifies garbage descriptor text is rejected, not panicked on.
///
/// **WHY THIS MATTERS**: Clients decode whatever the socket delivers.
///
/// **BUG THIS CATCHES**: Would catch unchecked bigint or date parsing.
#[test]
fn given_invalid_payloads_when_decoded_then_malformed() {
    // GIVEN: Bad payloads
    let cases = [
        "not json",
        r#"{"x":{"type":"bigint","result":"12abc"}}"#,
        r#"{"x":{"type":"date","result":"yesterday"}}"#,
        r#"{"x":{"type":"regexp","result":"no-slashes"}}"#,
        r#"{"x":{"type":"mystery"}}"#,
    ];

    for payload in cases {
        // WHEN: Decoding
        let result = decode_object(payload, &InertProxies);

        // THEN: Malformed
        assert!(
            matches!(result, Err(CodecError::Malformed { .. })),
            "payload: {payload}"
        );
    }
}
