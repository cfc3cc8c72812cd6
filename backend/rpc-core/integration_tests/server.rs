use crate::helpers::{
    OBJECT_NAME, connect_raw, receive_json, request, send_json, start_test_server,
};

use rpc_core::codec::parse_map;
use rpc_core::config::RegistryScope;

use models::ValueDescriptor;

use futures_util::SinkExt;
use serde_json::{Value as JsonValue, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

fn calling_id(frame: &JsonValue, key: &str) -> String {
    let map = parse_map(frame["result"]["result"].as_str().unwrap()).unwrap();
    match map.get(key) {
        Some(ValueDescriptor::Function { calling_id, .. }) => calling_id.to_string(),
        other => panic!("Expected function descriptor under {key}, got {other:?}"),
    }
}

/// **VALUE**: Verifies a binary frame is rejected without closing the connection.
///
/// **WHY THIS MATTERS**: One bad frame must not cost the client its handles.
///
/// **BUG THIS CATCHES**: Would catch the read loop exiting on binary input.
#[tokio::test]
async fn given_binary_frame_when_sent_then_error_and_next_text_frame_processed() {
    // GIVEN: A running server and a raw connection
    let handle = start_test_server(RegistryScope::Connection).await;
    let mut ws = connect_raw(&handle).await;

    // WHEN: Sending a binary frame, then a valid request
    ws.send(Message::Binary(vec![1u8, 2, 3].into()))
        .await
        .expect("Failed to send binary frame");
    let rejection = receive_json(&mut ws).await;
    send_json(&mut ws, &request(1, "getRemoteObject", json!({"objectName": OBJECT_NAME}))).await;
    let response = receive_json(&mut ws).await;

    // THEN: Rejection, then a normal response
    assert_eq!(rejection["error"]["code"], -32600);
    assert_eq!(rejection["error"]["message"], "Cannot accept binary data.");
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["objectName"], OBJECT_NAME);

    handle.shutdown().await;
}

/// **VALUE**: Verifies the callback notification precedes the call's response on
/// the wire and carries no id.
///
/// **WHY THIS MATTERS**: Clients distinguish notifications by the missing id, and
/// expect callbacks fired during a call to land before the call resolves.
///
/// **BUG THIS CATCHES**: Would catch notifications sent on a separate path that
/// can overtake or trail the response.
#[tokio::test]
async fn given_callback_argument_when_function_calls_it_then_notification_precedes_response() {
    // GIVEN: A fetched object
    let handle = start_test_server(RegistryScope::Connection).await;
    let mut ws = connect_raw(&handle).await;
    send_json(&mut ws, &request(1, "getRemoteObject", json!({"objectName": OBJECT_NAME}))).await;
    let object = receive_json(&mut ws).await;
    let caller = calling_id(&object, "callbackCaller");

    // WHEN: Calling callbackCaller with a callback marker
    send_json(
        &mut ws,
        &request(
            2,
            "callRemoteFunction",
            json!({"callingId": caller, "args": ["CallbackFunction(1)"]}),
        ),
    )
    .await;
    let first = receive_json(&mut ws).await;
    let second = receive_json(&mut ws).await;

    // THEN: Notification first, then the response
    assert!(first.get("id").is_none());
    assert_eq!(first["result"]["rpcName"], "callRemoteCallback");
    assert_eq!(first["result"]["callbackId"], "1");
    assert_eq!(second["id"], 2);
    assert_eq!(second["result"]["rpcName"], "callRemoteFunction");

    handle.shutdown().await;
}

/// **VALUE**: Verifies registry scoping across connections.
///
/// **WHY THIS MATTERS**: By default handles are private to the connection that
/// received them; the process scope deliberately shares them.
///
/// **BUG THIS CATCHES**: Would catch every connection sharing one registry by
/// accident, or the process scope handing out per-connection tables.
#[tokio::test]
async fn given_handle_from_other_connection_when_called_then_depends_on_scope() {
    for (scope, shared) in [(RegistryScope::Connection, false), (RegistryScope::Process, true)] {
        // GIVEN: A handle fetched on one connection
        let handle = start_test_server(scope).await;
        let mut owner = connect_raw(&handle).await;
        let fetch = request(1, "getRemoteObject", json!({"objectName": OBJECT_NAME}));
        send_json(&mut owner, &fetch).await;
        let some_method = calling_id(&receive_json(&mut owner).await, "someMethod");

        // WHEN: Calling it from a second connection
        let mut other = connect_raw(&handle).await;
        send_json(
            &mut other,
            &request(1, "callRemoteFunction", json!({"callingId": some_method, "args": [10]})),
        )
        .await;
        let response = receive_json(&mut other).await;

        // THEN: Only the process scope resolves it
        assert_eq!(response.get("error").is_none(), shared, "scope {scope}");

        handle.shutdown().await;
    }
}

/// **VALUE**: Verifies shutdown stops the listener.
///
/// **WHY THIS MATTERS**: Tests and embedding applications need a clean stop.
///
/// **BUG THIS CATCHES**: Would catch the accept loop ignoring the shutdown signal.
#[tokio::test]
async fn given_running_server_when_shutdown_then_new_connections_fail() {
    // GIVEN: A running server
    let handle = start_test_server(RegistryScope::Connection).await;
    let url = handle.url();
    assert_ne!(handle.local_addr().port(), 0);

    // WHEN: Shutting down
    handle.shutdown().await;

    // THEN: Connecting fails
    assert!(connect_async(url).await.is_err());
}
