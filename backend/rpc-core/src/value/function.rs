use crate::client::RemoteFunction;
use crate::error::InvocationError;
use crate::value::Value;

use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::sync::Arc;

/// Signature of a host function that can be exposed to the peer.
pub type NativeFn = dyn Fn(Vec<Value>) -> Result<Value, InvocationError> + Send + Sync;

/// A callable value.
///
/// `Native` functions run in this process. `Remote` functions are proxies
/// produced by the client decoder; they are awaited through
/// [`RemoteFunction::call`] and cannot be invoked synchronously.
#[derive(Clone)]
pub enum Function {
    Native(Arc<NativeFn>),
    Remote(RemoteFunction),
}

impl Function {
    pub fn native<F>(function: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        Function::Native(Arc::new(function))
    }

    /// Invoke a native function synchronously.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, InvocationError> {
        match self {
            Function::Native(function) => function(args),
            Function::Remote(remote) => Err(InvocationError::new(format!(
                "remote function {} can only be awaited",
                remote.calling_id()
            ))),
        }
    }

    pub fn as_remote(&self) -> Option<&RemoteFunction> {
        match self {
            Function::Remote(remote) => Some(remote),
            Function::Native(_) => None,
        }
    }

    /// Identity comparison: the same closure, or a proxy for the same handle.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        match (self, other) {
            (Function::Native(left), Function::Native(right)) => Arc::ptr_eq(left, right),
            (Function::Remote(left), Function::Remote(right)) => {
                left.calling_id() == right.calling_id()
            }
            _ => false,
        }
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            Function::Native(_) => f.write_str("Function(native)"),
            Function::Remote(remote) => write!(f, "Function(remote {})", remote.calling_id()),
        }
    }
}
