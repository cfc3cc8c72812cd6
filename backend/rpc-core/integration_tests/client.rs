use crate::helpers::{
    OBJECT_NAME, connect_client, remote, start_silent_server, start_test_server,
};

use rpc_core::client::{ClientConfig, RemoteClient};
use rpc_core::config::RegistryScope;
use rpc_core::error::ClientError;
use rpc_core::value::{Function, Value};

use std::sync::mpsc;
use std::time::Duration;

/// **VALUE**: Verifies a fetched object rebuilds plain fields and exposes callable
/// function proxies.
///
/// **WHY THIS MATTERS**: This is the core promise of the protocol: the peer sees
/// the object as if it were local.
///
/// **BUG THIS CATCHES**: Would catch descriptors decoding to the wrong kinds or
/// proxies sending the wrong handle.
#[tokio::test]
async fn given_remote_object_when_fetched_then_fields_and_methods_work() {
    // GIVEN: A server and a connected client
    let handle = start_test_server(RegistryScope::Connection).await;
    let client = connect_client(&handle).await;

    // WHEN: Fetching the object and calling someMethod(10)
    let object = client.get_remote_object(OBJECT_NAME).await.unwrap();
    let result = remote(&object, "someMethod")
        .call(vec![10.into()])
        .await
        .unwrap();

    // THEN: Fields and result round-trip
    assert_eq!(object.get("fieldA"), Some(&Value::from("a")));
    assert_eq!(object.get("fieldB"), Some(&Value::from(1)));
    assert_eq!(result, Value::from(133));

    let nested = object.get("someNestedObject").unwrap();
    assert_eq!(nested.get("foo"), Some(&Value::from("bar")));
    let squared = remote(nested, "someNestedMethod")
        .call(vec![7.into()])
        .await
        .unwrap();
    assert_eq!(squared, Value::from(49));

    client.close().await;
    handle.shutdown().await;
}

/// **VALUE**: Verifies a local callback passed as an argument is invoked by the
/// server with its arguments, before the call resolves.
///
/// **WHY THIS MATTERS**: Callbacks are the only way the server reaches back into
/// the client.
///
/// **BUG THIS CATCHES**: Would catch callback ids not being registered, or
/// notification params decoding incorrectly.
#[tokio::test]
async fn given_native_callback_when_remote_calls_it_then_receives_arguments() {
    // GIVEN: A fetched object and a callback that forwards its arguments
    let handle = start_test_server(RegistryScope::Connection).await;
    let client = connect_client(&handle).await;
    let object = client.get_remote_object(OBJECT_NAME).await.unwrap();

    let (tx, rx) = mpsc::channel();
    let callback = Function::native(move |args| {
        let _ = tx.send(args);
        Ok(Value::Undefined)
    });

    // WHEN: Calling callbackCaller with the callback
    let result = remote(&object, "callbackCaller")
        .call(vec![callback.clone().into()])
        .await
        .unwrap();

    // THEN: The callback already ran with ["foo", "bar", 123]
    assert_eq!(result, Value::Undefined);
    let args = rx.try_recv().expect("callback was not invoked");
    assert_eq!(args, vec![Value::from("foo"), Value::from("bar"), Value::from(123)]);
    assert_eq!(client.callback_count(), 1);

    // AND: Disposing the callback forgets it
    assert_eq!(client.dispose_callback(&callback), 1);
    assert_eq!(client.callback_count(), 0);

    client.close().await;
    handle.shutdown().await;
}

/// **VALUE**: Verifies a symbol proxy passed back resolves to the original symbol.
///
/// **WHY THIS MATTERS**: Symbols are identity tokens; only the handle can carry
/// that identity across the wire.
///
/// **BUG THIS CATCHES**: Would catch symbols being sent as their description.
#[tokio::test]
async fn given_symbol_proxy_when_passed_back_then_server_sees_same_symbol() {
    // GIVEN: A fetched object holding a symbol
    let handle = start_test_server(RegistryScope::Connection).await;
    let client = connect_client(&handle).await;
    let object = client.get_remote_object(OBJECT_NAME).await.unwrap();
    let symbol = object.get("symbolField").cloned().unwrap();

    // WHEN: Passing the proxy to symbolCheck
    let result = remote(&object, "symbolCheck")
        .call(vec![symbol])
        .await
        .unwrap();

    // THEN: The server resolved its own symbol
    assert_eq!(result, Value::Boolean(true));

    client.close().await;
    handle.shutdown().await;
}

/// **VALUE**: Verifies functions returned from calls are callable proxies.
///
/// **WHY THIS MATTERS**: Returned functions are owned by the calling function's
/// handle rather than the root object.
///
/// **BUG THIS CATCHES**: Would catch return values decoded without a proxy
/// factory.
#[tokio::test]
async fn given_function_returning_function_when_called_then_result_is_callable() {
    // GIVEN: A fetched object
    let handle = start_test_server(RegistryScope::Connection).await;
    let client = connect_client(&handle).await;
    let object = client.get_remote_object(OBJECT_NAME).await.unwrap();

    // WHEN: Calling the returned function
    let returned = remote(&object, "someMethodReturningAFunction")
        .call(vec![])
        .await
        .unwrap();
    let tripled = returned
        .as_function()
        .and_then(Function::as_remote)
        .expect("returned value is a remote function")
        .call(vec![4.into()])
        .await
        .unwrap();

    // THEN: 3 * 4
    assert_eq!(tripled, Value::from(12));

    client.close().await;
    handle.shutdown().await;
}

/// **VALUE**: Verifies disposing an object invalidates every handle under it.
///
/// **WHY THIS MATTERS**: Disposal is how peers release server-side references.
///
/// **BUG THIS CATCHES**: Would catch handles surviving their namespace.
#[tokio::test]
async fn given_disposed_object_when_method_called_then_invalid_params() {
    // GIVEN: A fetched object
    let handle = start_test_server(RegistryScope::Connection).await;
    let client = connect_client(&handle).await;
    let object = client.get_remote_object(OBJECT_NAME).await.unwrap();
    let some_method = remote(&object, "someMethod");
    assert!(client.remote_function_count() > 0);

    // WHEN: Disposing the object and calling a method
    let rpc_name = client.dispose_object(OBJECT_NAME).await.unwrap();
    let result = some_method.call(vec![1.into()]).await;

    // THEN: The server rejects the stale handle
    assert_eq!(rpc_name, "disposeObject");
    assert_eq!(client.remote_function_count(), 0);
    assert!(client.bound_objects().is_empty());
    match result {
        Err(ClientError::Remote { code, .. }) => assert_eq!(code, -32602),
        other => panic!("Expected remote invalid params, got {other:?}"),
    }

    client.close().await;
    handle.shutdown().await;
}

/// **VALUE**: Verifies disposing a single function leaves siblings callable.
///
/// **WHY THIS MATTERS**: Per-function disposal must not cascade.
///
/// **BUG THIS CATCHES**: Would catch disposeFunction dropping the namespace.
#[tokio::test]
async fn given_disposed_function_when_sibling_called_then_still_works() {
    // GIVEN: A fetched object
    let handle = start_test_server(RegistryScope::Connection).await;
    let client = connect_client(&handle).await;
    let object = client.get_remote_object(OBJECT_NAME).await.unwrap();
    let callback_caller = object.get("callbackCaller").and_then(Value::as_function).unwrap();

    // WHEN: Disposing one function
    let rpc_name = client.dispose_function(callback_caller).await.unwrap();

    // THEN: The sibling still answers
    assert_eq!(rpc_name, "disposeFunction");
    let result = remote(&object, "someMethod")
        .call(vec![0.into()])
        .await
        .unwrap();
    assert_eq!(result, Value::from(123));

    client.close().await;
    handle.shutdown().await;
}

/// **VALUE**: Verifies a request without a reply times out and is forgotten.
///
/// **WHY THIS MATTERS**: A wedged server must not leak pending requests.
///
/// **BUG THIS CATCHES**: Would catch timed-out requests staying in the pending
/// table forever.
#[tokio::test]
async fn given_silent_server_when_request_times_out_then_pending_cleared() {
    // GIVEN: A server that never replies
    let addr = start_silent_server().await;
    let config = ClientConfig::new(&format!("ws://{addr}"))
        .unwrap()
        .with_request_timeout(Duration::from_millis(100));
    let client = RemoteClient::connect(config).await.unwrap();

    // WHEN: Fetching an object
    let result = client.get_remote_object(OBJECT_NAME).await;

    // THEN: Timeout, nothing pending
    assert!(matches!(result, Err(ClientError::Timeout { .. })));
    assert_eq!(client.pending_count(), 0);
}

/// **VALUE**: Verifies connecting to a closed port gives up after the retry budget.
///
/// **WHY THIS MATTERS**: Callers need a definite failure instead of an endless
/// retry loop.
///
/// **BUG THIS CATCHES**: Would catch the backoff loop ignoring max elapsed time.
#[tokio::test]
async fn given_closed_port_when_connecting_then_connect_error() {
    // GIVEN: A port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(&format!("ws://{addr}"))
        .unwrap()
        .with_connect_max_elapsed(Duration::from_millis(300));

    // WHEN: Connecting
    let result = RemoteClient::connect(config).await;

    // THEN: Connect error
    assert!(matches!(result, Err(ClientError::Connect { .. })));
}
