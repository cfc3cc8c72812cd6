//! The demonstration object served by the binary.
//!
//! Covers every value kind the codec describes: plain fields, a regular
//! expression, a date, a big integer, a symbol, nested objects and arrays,
//! functions that call back into the peer and functions that return functions.

use rpc_core::catalog::ObjectCatalog;
use rpc_core::error::InvocationError;
use rpc_core::value::{Function, ObjectMap, RegExpLiteral, Symbol, Value};

use chrono::Utc;
use log::info;
use num_bigint::BigInt;

pub const DEMO_OBJECT_NAME: &str = "remoteObject";

const LOCAL_VARIABLE: f64 = 123.0;

fn number_arg(args: &[Value]) -> f64 {
    args.first().and_then(Value::as_f64).unwrap_or(f64::NAN)
}

/// Build `remoteObject`.
///
/// `symbol` is the value exposed as `symbolField`; `symbolCheck` answers
/// whether its argument is that same symbol.
pub fn demo_object(symbol: Symbol) -> ObjectMap {
    let check_symbol = symbol.clone();

    let mut inner = ObjectMap::new();
    inner.insert("obj".into(), "innerObj".into());

    let mut nested = ObjectMap::new();
    nested.insert("foo".into(), "bar".into());
    nested.insert("baz".into(), "qux".into());
    nested.insert(
        "someNestedMethod".into(),
        Function::native(|args| {
            let value = number_arg(&args);
            Ok(Value::Number(value * value))
        })
        .into(),
    );

    let mut object = ObjectMap::new();
    object.insert("fieldA".into(), "a".into());
    object.insert("fieldB".into(), 1.into());
    object.insert("fieldC".into(), Value::RegExp(RegExpLiteral::new(r"\d+", "")));
    object.insert("booleanTrue".into(), true.into());
    object.insert("booleanFalse".into(), false.into());
    object.insert("undefinedObj".into(), Value::Undefined);
    object.insert("dateField".into(), Value::Date(Utc::now()));
    object.insert("bigIntField".into(), BigInt::from(1u64 << 53).into());
    object.insert("symbolField".into(), symbol.into());
    object.insert(
        "callbackCaller".into(),
        Function::native(|args| match args.first() {
            Some(Value::Function(callback)) => {
                callback.invoke(vec!["foo".into(), "bar".into(), 123.into()])?;
                Ok(Value::Undefined)
            }
            _ => Err(InvocationError::new("cb is not a function")),
        })
        .into(),
    );
    object.insert(
        "arrayObj".into(),
        Value::Array(vec![
            1.into(),
            2.into(),
            3.into(),
            4.into(),
            "foo".into(),
            inner.into(),
            Function::native(|_| {
                info!("someone from the outside is calling me");
                Ok(Value::Undefined)
            })
            .into(),
        ]),
    );
    object.insert("nullField".into(), Value::Null);
    object.insert("someNestedObject".into(), nested.into());
    object.insert(
        "symbolCheck".into(),
        Function::native(move |args| {
            Ok(Value::Boolean(matches!(
                args.first(),
                Some(Value::Symbol(candidate)) if candidate.ptr_eq(&check_symbol)
            )))
        })
        .into(),
    );
    object.insert(
        "someMethod".into(),
        Function::native(|args| Ok(Value::Number(LOCAL_VARIABLE + number_arg(&args)))).into(),
    );
    object.insert(
        "someMethodReturningAFunction".into(),
        Function::native(|_| Ok(tripler().into())).into(),
    );

    object
}

// Returns `{value: 3 * v, timestamp: now}`.
fn tripler() -> Function {
    Function::native(|args| {
        let mut result = ObjectMap::new();
        result.insert("value".into(), Value::Number(3.0 * number_arg(&args)));
        result.insert("timestamp".into(), Value::Date(Utc::now()));
        Ok(result.into())
    })
}

/// Catalog holding `remoteObject` under [`DEMO_OBJECT_NAME`].
pub fn demo_catalog() -> ObjectCatalog {
    let catalog = ObjectCatalog::new();
    catalog.register(DEMO_OBJECT_NAME, demo_object(Symbol::new(None)));
    catalog
}
