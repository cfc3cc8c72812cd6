use crate::{JSONRPC_VERSION, ModelError, RpcMethod};

use common::ErrorLocation;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter names used by the request methods.
pub mod param {
    pub const OBJECT_NAME: &str = "objectName";
    pub const CALLING_ID: &str = "callingId";
    pub const ARGS: &str = "args";
    pub const FUNCTION_ID: &str = "functionId";
}

/// A request frame: `{jsonrpc, id, method, params}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Map<String, Value>,
}

impl RpcRequest {
    /// Parsed method, if it is one the dispatcher knows.
    pub fn rpc_method(&self) -> Result<RpcMethod, ModelError> {
        self.method.parse()
    }

    /// String-typed parameter, `None` when absent or not a string.
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// Builder for outgoing request frames.
///
/// Request ids start at 1: an id of 0 is rejected by peers that treat the id
/// as a truthiness check.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    id: Option<u64>,
    method: Option<RpcMethod>,
    params: Map<String, Value>,
}

impl RequestBuilder {
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_method(mut self, method: RpcMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Build the request with validation.
    #[track_caller]
    pub fn build(self) -> Result<RpcRequest, ModelError> {
        let id = self.id.ok_or_else(|| ModelError::Validation {
            message: String::from("Request id is required"),
            location: ErrorLocation::caller(),
        })?;

        if id == 0 {
            return Err(ModelError::Validation {
                message: String::from("Request id must be non-zero"),
                location: ErrorLocation::caller(),
            });
        }

        let method = self.method.ok_or_else(|| ModelError::Validation {
            message: String::from("Method is required"),
            location: ErrorLocation::caller(),
        })?;

        Ok(RpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.as_str().to_string(),
            params: self.params,
        })
    }
}
