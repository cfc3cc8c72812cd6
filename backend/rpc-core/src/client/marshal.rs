//! Client-side argument marshaling.
//!
//! Top-level symbols become `Symbol(<description>)` strings and top-level
//! functions are stored in the callback table and sent as
//! `CallbackFunction(<id>)`. Everything else is sent as its JSON form.

use crate::client::callbacks::CallbackTable;
use crate::value::Value;

use serde_json::Value as JsonValue;

pub fn marshal_args(args: Vec<Value>, callbacks: &mut CallbackTable) -> Vec<JsonValue> {
    args.into_iter()
        .map(|arg| marshal_arg(arg, callbacks))
        .collect()
}

fn marshal_arg(arg: Value, callbacks: &mut CallbackTable) -> JsonValue {
    match arg {
        Value::Symbol(symbol) => JsonValue::String(symbol.to_string()),
        Value::Function(function) => {
            let id = callbacks.register(function);
            JsonValue::String(format!("CallbackFunction({id})"))
        }
        other => other.to_json().unwrap_or(JsonValue::Null),
    }
}
