//! Test helpers for RPC integration tests.
//!
//! - Starting a server with a demo object on an ephemeral port
//! - Raw WebSocket connections for frame-level assertions
//! - A silent server that never answers, for client timeout tests

use rpc_core::catalog::ObjectCatalog;
use rpc_core::client::{ClientConfig, RemoteFunction, RemoteClient};
use rpc_core::config::{RegistryScope, ServerConfig};
use rpc_core::error::InvocationError;
use rpc_core::ipc::{RpcServerHandle, start_rpc_server};
use rpc_core::value::{Function, ObjectMap, Symbol, Value};

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value as JsonValue, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, accept_async, connect_async};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const OBJECT_NAME: &str = "remoteObject";

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

fn first_number(args: &[Value]) -> f64 {
    args.first().and_then(Value::as_f64).unwrap_or(f64::NAN)
}

/// Catalog with a trimmed-down `remoteObject`.
pub fn demo_catalog() -> ObjectCatalog {
    let global_symbol = Symbol::labeled("globalSymbol");
    let check_symbol = global_symbol.clone();

    let mut nested = ObjectMap::new();
    nested.insert("foo".into(), "bar".into());
    nested.insert(
        "someNestedMethod".into(),
        Function::native(|args| {
            let value = first_number(&args);
            Ok(Value::Number(value * value))
        })
        .into(),
    );

    let mut object = ObjectMap::new();
    object.insert("fieldA".into(), "a".into());
    object.insert("fieldB".into(), 1.into());
    object.insert("symbolField".into(), global_symbol.into());
    object.insert("someNestedObject".into(), nested.into());
    object.insert(
        "someMethod".into(),
        Function::native(|args| Ok(Value::Number(123.0 + first_number(&args)))).into(),
    );
    object.insert(
        "callbackCaller".into(),
        Function::native(|args| match args.first() {
            Some(Value::Function(callback)) => {
                callback.invoke(vec!["foo".into(), "bar".into(), 123.into()])?;
                Ok(Value::Undefined)
            }
            _ => Err(InvocationError::new("callback is not a function")),
        })
        .into(),
    );
    object.insert(
        "symbolCheck".into(),
        Function::native(move |args| {
            Ok(Value::Boolean(matches!(
                args.first(),
                Some(Value::Symbol(symbol)) if symbol.ptr_eq(&check_symbol)
            )))
        })
        .into(),
    );
    object.insert(
        "someMethodReturningAFunction".into(),
        Function::native(|_| {
            Ok(Function::native(|args| Ok(Value::Number(3.0 * first_number(&args)))).into())
        })
        .into(),
    );

    let catalog = ObjectCatalog::new();
    catalog.register(OBJECT_NAME, object);
    catalog
}

/// Test helper: Start a server on an ephemeral loopback port.
pub async fn start_test_server(scope: RegistryScope) -> RpcServerHandle {
    let config = ServerConfig {
        port: 0,
        registry_scope: scope,
        ..ServerConfig::default()
    };
    start_rpc_server(&config, demo_catalog())
        .await
        .expect("Failed to start RPC server")
}

/// Test helper: Connect a raw WebSocket to the server.
pub async fn connect_raw(handle: &RpcServerHandle) -> WsStream {
    let (ws_stream, _) = connect_async(handle.url())
        .await
        .expect("Failed to connect to WebSocket server");
    ws_stream
}

/// Test helper: Connect a protocol client to the server.
pub async fn connect_client(handle: &RpcServerHandle) -> RemoteClient {
    let config = ClientConfig::new(&handle.url())
        .expect("valid test url")
        .with_request_timeout(RECEIVE_TIMEOUT);
    RemoteClient::connect(config)
        .await
        .expect("Failed to connect client")
}

pub fn request(id: u64, method: &str, params: JsonValue) -> JsonValue {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

/// Test helper: Send a JSON text frame.
pub async fn send_json(ws: &mut WsStream, frame: &JsonValue) {
    ws.send(Message::text(frame.to_string()))
        .await
        .expect("Failed to send message");
}

/// Test helper: Receive the next text frame as JSON.
pub async fn receive_json(ws: &mut WsStream) -> JsonValue {
    let message = tokio::time::timeout(RECEIVE_TIMEOUT, ws.next())
        .await
        .expect("Timed out waiting for a frame")
        .expect("No message received")
        .expect("Error receiving message");

    match message {
        Message::Text(text) => serde_json::from_str(text.as_str()).expect("Frame is not JSON"),
        other => panic!("Expected a text frame, got {other:?}"),
    }
}

/// Test helper: Pull a function proxy out of a decoded object.
pub fn remote(value: &Value, key: &str) -> RemoteFunction {
    value
        .get(key)
        .and_then(Value::as_function)
        .and_then(Function::as_remote)
        .cloned()
        .unwrap_or_else(|| panic!("Expected remote function under {key}"))
}

/// Test helper: A WebSocket server that accepts connections and never replies.
pub async fn start_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind silent server");
    let addr = listener.local_addr().expect("Silent server has no address");

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                if let Ok(mut ws) = accept_async(stream).await {
                    while let Some(Ok(_)) = ws.next().await {}
                }
            });
        }
    });

    addr
}
