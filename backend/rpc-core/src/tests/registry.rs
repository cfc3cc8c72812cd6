use crate::registry::{ReferenceRegistry, SharedRegistry};
use crate::value::{Function, Symbol, Value};

fn noop() -> Function {
    Function::native(|_| Ok(Value::Undefined))
}

/// **VALUE**: Verifies disposing an object releases every handle under it.
///
/// **WHY THIS MATTERS**: Object disposal is the client's bulk release mechanism.
///
/// **BUG THIS CATCHES**: Would catch owner indexes outliving their namespace,
/// which keeps handles resolvable after disposal.
#[test]
fn given_object_with_handles_when_disposed_then_all_handles_released() {
    // GIVEN: Two functions and a symbol under "obj", one function under "other"
    let mut registry = ReferenceRegistry::new();
    let first = registry.register_function("obj", noop());
    let second = registry.register_function("obj", noop());
    let symbol = registry.register_symbol("obj", Symbol::labeled("s"));
    let survivor = registry.register_function("other", noop());

    // WHEN: Disposing "obj"
    let entry = registry.dispose_object("obj").unwrap();

    // THEN: Its handles are gone, the other namespace is intact
    assert_eq!(entry.handle_count(), 3);
    assert!(registry.function(first.as_str()).is_none());
    assert!(registry.function(second.as_str()).is_none());
    assert!(registry.symbol(symbol.as_str()).is_none());
    assert!(registry.function(survivor.as_str()).is_some());
    assert_eq!(registry.function_count(), 1);
    assert_eq!(registry.symbol_count(), 0);

    // THEN: A second disposal finds nothing
    assert!(registry.dispose_object("obj").is_none());
}

/// **VALUE**: Verifies single-function disposal.
///
/// **WHY THIS MATTERS**: A disposed handle must stop resolving immediately.
///
/// **BUG THIS CATCHES**: Would catch the owner index and the namespace drifting apart.
#[test]
fn given_function_handle_when_disposed_twice_then_second_returns_none() {
    // GIVEN: A registered function
    let mut registry = ReferenceRegistry::new();
    let handle = registry.register_function("obj", noop());
    assert_eq!(registry.function_owner(handle.as_str()), Some("obj"));

    // WHEN: Disposing it twice
    let first = registry.dispose_function(handle.as_str());
    let second = registry.dispose_function(handle.as_str());

    // THEN: Only the first succeeds; the namespace itself survives
    assert!(first.is_some());
    assert!(second.is_none());
    assert!(registry.function_owner(handle.as_str()).is_none());
    assert!(registry.object("obj").is_some());
}

/// **VALUE**: Verifies re-opening an object keeps earlier handles valid.
///
/// **WHY THIS MATTERS**: Fetching the same object twice must not invalidate proxies
/// the client already holds.
///
/// **BUG THIS CATCHES**: Would catch `open_object` replacing the namespace entry.
#[test]
fn given_open_object_when_reopened_then_existing_handles_survive() {
    // GIVEN: An opened object with a handle
    let mut registry = ReferenceRegistry::new();
    registry.open_object("obj", Value::Null);
    let handle = registry.register_function("obj", noop());

    // WHEN: Re-opening it
    let entry = registry.open_object("obj", Value::Boolean(true));

    // THEN: The handle is still there and the source updated
    assert_eq!(entry.functions().len(), 1);
    assert_eq!(entry.source(), Some(&Value::Boolean(true)));
    assert!(registry.function(handle.as_str()).is_some());
    assert_eq!(registry.object_count(), 1);
}

/// **VALUE**: Verifies shared registries are the same table across clones.
///
/// **WHY THIS MATTERS**: The process scope relies on every connection seeing the
/// same handles.
///
/// **BUG THIS CATCHES**: Would catch `Clone` deep-copying the registry.
#[test]
fn given_shared_registry_when_cloned_then_mutations_are_visible() {
    // GIVEN: A shared registry and a clone
    let registry = SharedRegistry::new();
    let clone = registry.clone();

    // WHEN: Registering through the clone
    let handle = clone.lock().register_function("obj", noop());

    // THEN: Visible through the original
    assert!(registry.ptr_eq(&clone));
    assert!(!registry.ptr_eq(&SharedRegistry::new()));
    assert!(registry.lock().function(handle.as_str()).is_some());
}
