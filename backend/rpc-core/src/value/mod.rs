//! Host value model.
//!
//! [`Value`] is the closed set of kinds the codec knows how to describe. Every
//! kind except functions and symbols can be rebuilt exactly by the peer;
//! functions and symbols travel as handles and come back as proxies.

pub mod date;
mod function;
mod regexp;
mod symbol;

pub use function::{Function, NativeFn};
pub use regexp::RegExpLiteral;
pub use symbol::Symbol;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

/// Own keys of an object, in insertion order.
pub type ObjectMap = IndexMap<String, Value>;

// Largest integer an f64 represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Undefined,
    Null,
    BigInt(BigInt),
    Date(DateTime<Utc>),
    RegExp(RegExpLiteral),
    Array(Vec<Value>),
    Object(ObjectMap),
    Function(Function),
    Symbol(Symbol),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::BigInt(_) => "bigint",
            Value::Date(_) => "date",
            Value::RegExp(_) => "regexp",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Symbol(_) => "symbol",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Own property lookup on an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Build a value from plain JSON, as received in call arguments.
    pub fn from_json(json: JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Boolean(flag),
            JsonValue::Number(number) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(text) => Value::String(text),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// JSON-native form of this value.
    ///
    /// Functions, symbols and `undefined` have no JSON form: they are dropped
    /// from objects and become `null` inside arrays. Returns `None` for them at
    /// the top level.
    pub fn to_json(&self) -> Option<JsonValue> {
        match self {
            Value::Number(number) => Some(number_to_json(*number)),
            Value::String(text) => Some(JsonValue::String(text.clone())),
            Value::Boolean(flag) => Some(JsonValue::Bool(*flag)),
            Value::Null => Some(JsonValue::Null),
            Value::BigInt(number) => Some(JsonValue::String(number.to_string())),
            Value::Date(date) => Some(JsonValue::String(
                date.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            Value::RegExp(literal) => Some(JsonValue::String(literal.to_string())),
            Value::Array(items) => Some(JsonValue::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(JsonValue::Null))
                    .collect(),
            )),
            Value::Object(map) => Some(JsonValue::Object(
                map.iter()
                    .filter_map(|(key, value)| value.to_json().map(|json| (key.clone(), json)))
                    .collect::<JsonMap<String, JsonValue>>(),
            )),
            Value::Undefined | Value::Function(_) | Value::Symbol(_) => None,
        }
    }
}

fn number_to_json(number: f64) -> JsonValue {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        return JsonValue::Number(JsonNumber::from(number as i64));
    }
    JsonNumber::from_f64(number)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::BigInt(left), Value::BigInt(right)) => left == right,
            (Value::Date(left), Value::Date(right)) => left == right,
            (Value::RegExp(left), Value::RegExp(right)) => left == right,
            (Value::Array(left), Value::Array(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => {
                left.len() == right.len()
                    && left
                        .iter()
                        .zip(right.iter())
                        .all(|((lk, lv), (rk, rv))| lk == rk && lv == rv)
            }
            (Value::Function(left), Value::Function(right)) => left.ptr_eq(right),
            (Value::Symbol(left), Value::Symbol(right)) => left.ptr_eq(right),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectMap> for Value {
    fn from(value: ObjectMap) -> Self {
        Value::Object(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}
