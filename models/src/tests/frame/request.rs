use crate::{JSONRPC_VERSION, ModelError, RequestBuilder, RpcMethod};

use serde_json::json;

/// **VALUE**: Verifies a fully specified builder produces a well-formed frame.
///
/// **WHY THIS MATTERS**: Every client request goes through this builder.
///
/// **BUG THIS CATCHES**: Would catch a wrong version string or dropped params.
#[test]
fn given_complete_builder_when_built_then_request_has_all_fields() {
    // GIVEN: A builder with id, method, and params
    let builder = RequestBuilder::default()
        .with_id(7)
        .with_method(RpcMethod::GetRemoteObject)
        .with_param("objectName", "remoteObject");

    // WHEN: Building
    let request = builder.build().unwrap();

    // THEN: Serialized frame matches the protocol shape
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": 7,
            "method": "getRemoteObject",
            "params": {"objectName": "remoteObject"}
        })
    );
}

/// **VALUE**: Verifies that a missing id is rejected.
///
/// **WHY THIS MATTERS**: Responses are correlated by id; a request without one could
/// never be resolved.
///
/// **BUG THIS CATCHES**: Would catch defaulting the id silently.
#[test]
fn given_builder_without_id_when_built_then_validation_error() {
    // GIVEN: A builder without id
    let builder = RequestBuilder::default().with_method(RpcMethod::DisposeObject);

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error
    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

/// **VALUE**: Verifies that id 0 is rejected.
///
/// **WHY THIS MATTERS**: Servers treat a falsy id as a missing id.
///
/// **BUG THIS CATCHES**: Would catch the client counter starting at 0.
#[test]
fn given_zero_id_when_built_then_validation_error() {
    // GIVEN: A builder with id 0
    let builder = RequestBuilder::default()
        .with_id(0)
        .with_method(RpcMethod::DisposeObject);

    // WHEN/THEN: Building fails
    assert!(matches!(builder.build(), Err(ModelError::Validation { .. })));
}

/// **VALUE**: Verifies that a missing method is rejected.
///
/// **WHY THIS MATTERS**: A frame without method is a parse error on the server.
///
/// **BUG THIS CATCHES**: Would catch sending method-less frames.
#[test]
fn given_builder_without_method_when_built_then_validation_error() {
    // GIVEN/WHEN: Building without a method
    let result = RequestBuilder::default().with_id(1).build();

    // THEN: Validation error
    assert!(matches!(result, Err(ModelError::Validation { .. })));
}
