use crate::value::date::{format_date, parse_date};
use crate::value::{Function, ObjectMap, RegExpLiteral, Symbol, Value};

use chrono::{TimeZone, Utc};
use num_bigint::BigInt;
use serde_json::json;

/// **VALUE**: Verifies plain-JSON projection rules for argument marshaling.
///
/// **WHY THIS MATTERS**: Non-JSON kinds inside arguments must degrade the same way
/// a JSON serializer would, or the server sees different shapes per client.
///
/// **BUG THIS CATCHES**: Would catch functions leaking into objects, integers
/// written as floats, or bigint written as a lossy number.
#[test]
fn given_mixed_value_when_converted_to_json_then_follows_json_rules() {
    // GIVEN: A value mixing every kind
    let mut object = ObjectMap::new();
    object.insert("n".into(), 3.into());
    object.insert("f".into(), Function::native(|_| Ok(Value::Null)).into());
    object.insert("u".into(), Value::Undefined);
    object.insert("big".into(), BigInt::from(10).pow(20).into());
    object.insert(
        "when".into(),
        Value::Date(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
    );
    object.insert("re".into(), Value::RegExp(RegExpLiteral::new("a+", "g")));
    object.insert(
        "list".into(),
        Value::Array(vec![
            Symbol::labeled("x").into(),
            1.5.into(),
            Function::native(|_| Ok(Value::Null)).into(),
            Value::Undefined,
        ]),
    );

    // WHEN: Converting
    let json = Value::Object(object).to_json().unwrap();

    // THEN: JSON rules applied
    assert_eq!(
        json,
        json!({
            "n": 3,
            "big": "100000000000000000000",
            "when": "2024-01-02T03:04:05.000Z",
            "re": "/a+/g",
            "list": [null, 1.5, null, null]
        })
    );
    assert!(Value::Function(Function::native(|_| Ok(Value::Null))).to_json().is_none());
}

/// **VALUE**: Verifies JSON arguments map onto the value model.
///
/// **WHY THIS MATTERS**: Received call arguments are plain JSON.
///
/// **BUG THIS CATCHES**: Would catch key order loss or null mapped to undefined.
#[test]
fn given_json_when_converted_to_value_then_kinds_match() {
    // GIVEN: A JSON document
    let json = json!({"b": [1, "two", null], "a": {"flag": true}});

    // WHEN: Converting
    let value = Value::from_json(json);

    // THEN: Same structure, same key order
    let object = value.as_object().unwrap();
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(
        value.get("b"),
        Some(&Value::Array(vec![1.into(), "two".into(), Value::Null]))
    );
    assert_eq!(
        value.get("a").and_then(|a| a.get("flag")),
        Some(&Value::Boolean(true))
    );
}

/// **VALUE**: Verifies functions and symbols compare by identity only.
///
/// **WHY THIS MATTERS**: Two distinct closures or tokens are never "equal"
/// just because they look alike.
///
/// **BUG THIS CATCHES**: Would catch structural equality on symbol descriptions.
#[test]
fn given_functions_and_symbols_when_compared_then_identity_decides() {
    // GIVEN: Two look-alike symbols and functions
    let symbol = Symbol::labeled("same");
    let function = Function::native(|_| Ok(Value::Null));

    // WHEN/THEN: Only clones of the same token are equal
    assert_eq!(Value::Symbol(symbol.clone()), Value::Symbol(symbol.clone()));
    assert_ne!(Value::Symbol(symbol), Value::Symbol(Symbol::labeled("same")));
    assert_eq!(
        Value::Function(function.clone()),
        Value::Function(function)
    );
    assert_ne!(
        Value::Function(Function::native(|_| Ok(Value::Null))),
        Value::Function(Function::native(|_| Ok(Value::Null)))
    );
}

/// **VALUE**: Verifies regexp literal parsing and flag handling.
///
/// **WHY THIS MATTERS**: Literals are the wire form; flags change semantics.
///
/// **BUG THIS CATCHES**: Would catch unknown flags accepted, the empty pattern
/// rendered as `//` (a comment), or `i` ignored when compiling.
#[test]
fn given_regexp_literals_when_parsed_then_source_and_flags_are_split() {
    // GIVEN/WHEN: Parsing literals
    let literal: RegExpLiteral = "/AbC/i".parse().unwrap();
    let empty = RegExpLiteral::new("", "");

    // THEN: Source and flags separated; empty renders as a group
    assert_eq!(literal.source(), "AbC");
    assert_eq!(literal.flags(), "i");
    assert!(literal.to_regex().unwrap().is_match("xabcx"));
    assert_eq!(empty.to_string(), "/(?:)/");
    assert_eq!("/(?:)/".parse::<RegExpLiteral>().unwrap(), empty);
    assert!("/a/q".parse::<RegExpLiteral>().is_err());
    assert!("a/".parse::<RegExpLiteral>().is_err());
}

/// **VALUE**: Verifies the date text form and its RFC 3339 fallback.
///
/// **WHY THIS MATTERS**: Peers may send either form back.
///
/// **BUG THIS CATCHES**: Would catch a non-UTC render or a parse that drops the offset.
#[test]
fn given_date_text_when_parsed_then_both_forms_accepted() {
    // GIVEN: An instant
    let instant = Utc.with_ymd_and_hms(2026, 10, 20, 9, 15, 0).unwrap();

    // WHEN: Formatting and parsing
    let text = format_date(&instant);

    // THEN: Stable text and both forms parse
    assert_eq!(text, "Tue Oct 20 2026 09:15:00 GMT+0000 (Coordinated Universal Time)");
    assert_eq!(parse_date(&text).unwrap(), instant);
    assert_eq!(parse_date("2026-10-20T11:15:00+02:00").unwrap(), instant);
    assert_eq!(
        parse_date("Tue Oct 20 2026 11:15:00 GMT+0200 (Central European Summer Time)").unwrap(),
        instant
    );
}

/// **VALUE**: Verifies native functions run inline through `invoke`.
///
/// **WHY THIS MATTERS**: The dispatcher invokes exposed functions synchronously.
///
/// **BUG THIS CATCHES**: Would catch `invoke` dropping or reordering arguments.
#[test]
fn given_native_function_when_invoked_then_runs_inline() {
    // GIVEN: A native adder
    let add = Function::native(|args| {
        Ok(Value::Number(args.iter().filter_map(Value::as_f64).sum()))
    });

    // WHEN: Invoking it
    let result = add.invoke(vec![1.into(), 2.into()]).unwrap();

    // THEN: Runs synchronously
    assert_eq!(result, Value::Number(3.0));
    assert!(add.as_remote().is_none());
}
