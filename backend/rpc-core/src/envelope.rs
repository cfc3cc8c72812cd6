//! Request validation and response framing.

use crate::error::RpcError;
use crate::error::rpc::INVALID_REQUEST_MESSAGE;

use common::ErrorLocation;
use models::{JSONRPC_VERSION, RpcRequest, RpcResponse, RpcResult};

use std::panic::Location;

use log::trace;
use serde_json::{Value as JsonValue, json};

/// Validate a text frame as a request envelope.
///
/// Any frame that is not JSON, not an object, or lacks a `"2.0"` version, a
/// non-zero integer `id`, a string `method` or an object `params` is a parse
/// error and is never routed to a handler.
pub fn parse_request(text: &str) -> Result<RpcRequest, RpcError> {
    let json: JsonValue = serde_json::from_str(text).map_err(|e| RpcError::parse(e.to_string()))?;

    let JsonValue::Object(mut frame) = json else {
        return Err(RpcError::parse(INVALID_REQUEST_MESSAGE));
    };

    let version_ok = frame.get("jsonrpc").and_then(JsonValue::as_str) == Some(JSONRPC_VERSION);
    let id = frame
        .get("id")
        .and_then(JsonValue::as_u64)
        .filter(|id| *id != 0);
    let method = frame
        .get("method")
        .and_then(JsonValue::as_str)
        .map(str::to_string);
    let params = match frame.remove("params") {
        Some(JsonValue::Object(params)) => Some(params),
        _ => None,
    };

    match (version_ok, id, method, params) {
        (true, Some(id), Some(method), Some(params)) => {
            trace!("Parsed request {id} '{method}'");
            Ok(RpcRequest {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id,
                method,
                params,
            })
        }
        _ => Err(RpcError::parse(INVALID_REQUEST_MESSAGE)),
    }
}

#[track_caller]
pub fn success_frame(id: u64, result: RpcResult) -> Result<String, RpcError> {
    serialize(&RpcResponse::success(id, result))
}

/// Notification pushed to a client to invoke one of its callbacks.
#[track_caller]
pub fn notification_frame(
    callback_id: &str,
    params: String,
    generated_object_id: &str,
) -> Result<String, RpcError> {
    serialize(&RpcResponse::notification(RpcResult::CallRemoteCallback {
        callback_id: callback_id.to_string(),
        params,
        generated_object_id: generated_object_id.to_string(),
    }))
}

/// Error frame for `error`; `id` is only known once the envelope was valid.
pub fn error_frame(id: Option<u64>, error: &RpcError) -> String {
    let mut frame = json!({
        "jsonrpc": JSONRPC_VERSION,
        "error": {
            "code": error.code().code(),
            "message": error.wire_message(),
        },
    });
    if let Some(id) = id {
        frame["id"] = JsonValue::from(id);
    }
    frame.to_string()
}

#[track_caller]
fn serialize(response: &RpcResponse) -> Result<String, RpcError> {
    let location = ErrorLocation::from(Location::caller());
    serde_json::to_string(response).map_err(|e| RpcError::Codec {
        message: format!("Failed to serialize frame: {e}"),
        location,
    })
}
