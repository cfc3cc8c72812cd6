use remote_objects::demo::{DEMO_OBJECT_NAME, demo_catalog};

use rpc_core::client::{ClientConfig, RemoteClient, RemoteFunction};
use rpc_core::config::ServerConfig;
use rpc_core::ipc::start_rpc_server;
use rpc_core::value::{Function, Value};

use std::time::Duration;

use tempfile::TempDir;

fn remote(value: &Value, key: &str) -> RemoteFunction {
    value
        .get(key)
        .and_then(Value::as_function)
        .and_then(Function::as_remote)
        .cloned()
        .unwrap_or_else(|| panic!("Expected remote function under {key}"))
}

// ============================================================================
// End-to-end tests: demo catalog served from a saved config, driven by the
// client peer
// ============================================================================

/// **VALUE**: Tests the full path the binary takes: config on disk, demo catalog,
/// server, then a client reading every kind of field back.
///
/// **WHY THIS MATTERS**: This is the closest we get to running `main` without a
/// signal handler.
///
/// **BUG THIS CATCHES**: Would catch mismatches between the demo object, the
/// config loader and the codec that unit tests see only in isolation.
#[tokio::test]
async fn given_saved_config_when_serving_demo_then_client_sees_remote_object() {
    // GIVEN: A config with an ephemeral port saved to disk
    let temp_dir = TempDir::new().unwrap();
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    config.save(temp_dir.path()).unwrap();
    let loaded = ServerConfig::load(temp_dir.path()).unwrap();

    // WHEN: Serving the demo catalog and fetching the object
    let handle = start_rpc_server(&loaded, demo_catalog()).await.unwrap();
    let client = RemoteClient::connect(
        ClientConfig::new(&handle.url())
            .unwrap()
            .with_request_timeout(Duration::from_secs(5)),
    )
    .await
    .unwrap();
    let object = client.get_remote_object(DEMO_OBJECT_NAME).await.unwrap();

    // THEN: Plain fields arrive as their own kinds
    assert_eq!(object.get("fieldA"), Some(&Value::from("a")));
    assert_eq!(object.get("fieldB"), Some(&Value::from(1)));
    assert_eq!(object.get("fieldC").map(Value::kind), Some("regexp"));
    assert_eq!(object.get("dateField").map(Value::kind), Some("date"));
    assert_eq!(object.get("bigIntField").map(Value::kind), Some("bigint"));
    assert_eq!(object.get("undefinedObj"), Some(&Value::Undefined));
    assert_eq!(object.get("nullField"), Some(&Value::Null));

    // AND: Methods are callable
    let result = remote(&object, "someMethod")
        .call(vec![10.into()])
        .await
        .unwrap();
    assert_eq!(result, Value::from(133));

    let tripler = remote(&object, "someMethodReturningAFunction")
        .call(vec![])
        .await
        .unwrap();
    let tripled = tripler
        .as_function()
        .and_then(Function::as_remote)
        .unwrap()
        .call(vec![5.into()])
        .await
        .unwrap();
    assert_eq!(tripled.get("value"), Some(&Value::from(15)));

    client.close().await;
    handle.shutdown().await;
}
