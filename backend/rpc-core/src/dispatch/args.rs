//! Reverse marshaling of call arguments.
//!
//! Arguments arrive as plain JSON. A top-level string of the form
//! `Symbol(<handle>)` stands for a symbol this server handed out earlier, and
//! `CallbackFunction(<id>)` for a function living on the client. Strings
//! nested inside arrays or objects are never rewritten.
//!
//! A symbol marker naming a handle that is no longer registered is rejected.
//! Marker-shaped text that is not a handle at all stays a plain string.

use crate::callback::CallbackChannel;
use crate::error::RpcError;
use crate::registry::{ReferenceRegistry, SharedRegistry};
use crate::value::Value;

use models::Handle;

use std::sync::OnceLock;

use log::trace;
use regex::Regex;
use serde_json::Value as JsonValue;

const SYMBOL_MARKER_PATTERN: &str = r"^Symbol\((.*)\)$";
const CALLBACK_MARKER_PATTERN: &str = r"^CallbackFunction\((.*)\)$";

static SYMBOL_MARKER: OnceLock<Regex> = OnceLock::new();
static CALLBACK_MARKER: OnceLock<Regex> = OnceLock::new();

pub fn get_symbol_regex() -> &'static Regex {
    SYMBOL_MARKER.get_or_init(|| Regex::new(SYMBOL_MARKER_PATTERN).expect("valid regex pattern"))
}

pub fn get_callback_regex() -> &'static Regex {
    CALLBACK_MARKER
        .get_or_init(|| Regex::new(CALLBACK_MARKER_PATTERN).expect("valid regex pattern"))
}

/// Turn received JSON arguments into host values.
///
/// # Errors
///
/// Returns [`RpcError::InvalidParams`] for a `Symbol(<handle>)` marker whose
/// handle is unknown or was disposed.
pub fn unmarshal_args(
    args: Vec<JsonValue>,
    registry: &SharedRegistry,
    callbacks: &CallbackChannel,
) -> Result<Vec<Value>, RpcError> {
    let registry = registry.lock();
    args.into_iter()
        .map(|arg| match arg {
            JsonValue::String(text) => unmarshal_marker(text, &registry, callbacks),
            other => Ok(Value::from_json(other)),
        })
        .collect()
}

fn unmarshal_marker(
    text: String,
    registry: &ReferenceRegistry,
    callbacks: &CallbackChannel,
) -> Result<Value, RpcError> {
    if let Some(captured) = capture(get_symbol_regex(), &text) {
        let Some(handle) = Handle::parse(captured) else {
            trace!("Marker '{text}' does not name a handle");
            return Ok(Value::String(text));
        };
        return registry
            .symbol(handle.as_str())
            .map(|symbol| Value::Symbol(symbol.clone()))
            .ok_or_else(|| RpcError::invalid_params(format!("unknown symbol '{handle}'")));
    }

    if let Some(callback_id) = capture(get_callback_regex(), &text) {
        return Ok(Value::Function(callbacks.invoker(callback_id.to_string())));
    }

    Ok(Value::String(text))
}

fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())
        .filter(|group| !group.is_empty())
}
