use crate::{RpcErrorCode, RpcResponse, RpcResult};

use serde_json::json;

/// **VALUE**: Verifies notifications are serialized without an `id` key.
///
/// **WHY THIS MATTERS**: Clients tell notifications from responses solely by the
/// absence of `id`. Even `"id": null` would be misrouted by some peers.
///
/// **BUG THIS CATCHES**: Would catch removal of `skip_serializing_if` on `id`.
#[test]
fn given_callback_notification_when_serialized_then_has_no_id_key() {
    // GIVEN: A callback notification
    let frame = RpcResponse::notification(RpcResult::CallRemoteCallback {
        callback_id: String::from("1"),
        params: String::from("{}"),
        generated_object_id: String::from("g"),
    });

    // WHEN: Serializing
    let json = serde_json::to_value(&frame).unwrap();

    // THEN: Exact shape, no id
    assert_eq!(
        json,
        json!({
            "jsonrpc": "2.0",
            "result": {
                "rpcName": "callRemoteCallback",
                "callbackId": "1",
                "params": "{}",
                "generatedObjectId": "g"
            }
        })
    );
    assert!(frame.is_notification());
}

/// **VALUE**: Verifies success frames carry `rpcName` inside `result`.
///
/// **WHY THIS MATTERS**: Clients decode results by `rpcName`.
///
/// **BUG THIS CATCHES**: Would catch the tag moving or being renamed.
#[test]
fn given_get_remote_object_response_when_serialized_then_rpc_name_is_tagged() {
    // GIVEN: A success frame
    let frame = RpcResponse::success(
        3,
        RpcResult::GetRemoteObject {
            result: String::from("{}"),
            object_name: String::from("remoteObject"),
        },
    );

    // WHEN: Serializing
    let json = serde_json::to_value(&frame).unwrap();

    // THEN: Tag, payload, and id present
    assert_eq!(json["result"]["rpcName"], "getRemoteObject");
    assert_eq!(json["result"]["objectName"], "remoteObject");
    assert_eq!(json["id"], 3);
    assert!(!frame.is_notification());
}

/// **VALUE**: Verifies error frames round-trip through deserialization.
///
/// **WHY THIS MATTERS**: The client parses every server frame as `RpcResponse`.
///
/// **BUG THIS CATCHES**: Would catch `result` being required on deserialization.
#[test]
fn given_error_frame_without_id_when_parsed_then_error_body_is_read() {
    // GIVEN: A raw parse error frame
    let raw = r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Invalid JSONRPC request"}}"#;

    // WHEN: Parsing
    let frame: RpcResponse = serde_json::from_str(raw).unwrap();

    // THEN: Error body and no id
    let error = frame.error.unwrap();
    assert_eq!(RpcErrorCode::from_code(error.code), Some(RpcErrorCode::ParseError));
    assert_eq!(frame.id, None);
    assert!(frame.result.is_none());
}
