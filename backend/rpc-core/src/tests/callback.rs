use crate::callback::CallbackChannel;
use crate::codec::{self, CALLBACK_PARAMS_KEY};
use crate::registry::SharedRegistry;
use crate::tests::fixtures::InertProxies;
use crate::value::{Function, Value};

use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

/// **VALUE**: Verifies callback arguments are encoded under a fresh namespace.
///
/// **WHY THIS MATTERS**: Functions passed to a callback must be disposable by the
/// client through the generated object id it receives.
///
/// **BUG THIS CATCHES**: Would catch callback argument handles being filed under
/// the caller's namespace, where the client cannot find them.
#[test]
fn given_function_argument_when_notified_then_registered_under_generated_id() {
    // GIVEN: A channel over a fresh registry
    let registry = SharedRegistry::new();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    let channel = CallbackChannel::new(outbound_tx, registry.clone());

    // WHEN: Notifying with a function argument
    channel
        .notify("3", vec![Function::native(|_| Ok(Value::Null)).into()])
        .unwrap();

    // THEN: The function handle lives under the generated id
    let frame: JsonValue = serde_json::from_str(&outbound_rx.try_recv().unwrap()).unwrap();
    let generated = frame["result"]["generatedObjectId"].as_str().unwrap();
    let registry = registry.lock();
    let entry = registry.object(generated).unwrap();
    assert_eq!(entry.functions().len(), 1);

    let params = frame["result"]["params"].as_str().unwrap();
    let args = codec::decode_wrapped(params, CALLBACK_PARAMS_KEY, &InertProxies).unwrap();
    assert_eq!(args.as_array().map(<[Value]>::len), Some(1));
}

/// **VALUE**: Verifies the invoker returns `undefined` and fails once the
/// connection is gone.
///
/// **WHY THIS MATTERS**: Server code calling a callback after the client left
/// must get an error, not silently lose the call.
///
/// **BUG THIS CATCHES**: Would catch a closed queue being ignored.
#[test]
fn given_closed_connection_when_invoker_called_then_invocation_error() {
    // GIVEN: An invoker whose receiving side is dropped
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let channel = CallbackChannel::new(outbound_tx, SharedRegistry::new());
    let invoker = channel.invoker(String::from("1"));

    // WHEN: Invoking while connected, then after close
    let connected = invoker.invoke(vec!["x".into()]);
    drop(outbound_rx);
    let closed = invoker.invoke(vec!["x".into()]);

    // THEN: Undefined, then an error
    assert_eq!(connected.unwrap(), Value::Undefined);
    assert!(closed.is_err());
}
