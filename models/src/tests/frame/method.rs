use crate::{ModelError, RpcMethod};

/// **VALUE**: Verifies every method name parses back to its variant.
///
/// **WHY THIS MATTERS**: The dispatcher routes on these strings.
///
/// **BUG THIS CATCHES**: Would catch a typo in `as_str` that breaks routing.
#[test]
fn given_known_method_names_when_parsed_then_round_trip() {
    for method in RpcMethod::ALL {
        // WHEN: Parsing the wire name
        let parsed: RpcMethod = method.as_str().parse().unwrap();

        // THEN: Same variant
        assert_eq!(parsed, method);
    }
}

/// **VALUE**: Verifies unknown names produce `UnknownMethod`, not a validation error.
///
/// **WHY THIS MATTERS**: Unknown methods map to "method not found", which is a
/// different protocol error than invalid params.
///
/// **BUG THIS CATCHES**: Would catch unknown names being parsed leniently.
#[test]
fn given_unknown_method_when_parsed_then_unknown_method_error() {
    // WHEN: Parsing an unknown method
    let result = "frobnicate".parse::<RpcMethod>();

    // THEN: UnknownMethod with the offending name
    match result {
        Err(ModelError::UnknownMethod { method, .. }) => assert_eq!(method, "frobnicate"),
        other => panic!("Expected UnknownMethod, got {other:?}"),
    }
}
