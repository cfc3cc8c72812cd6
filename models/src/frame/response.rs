use crate::{JSONRPC_VERSION, RpcErrorCode};

use serde::{Deserialize, Serialize};

/// Method-specific payload of a success frame, discriminated by `rpcName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rpcName", rename_all = "camelCase")]
pub enum RpcResult {
    GetRemoteObject {
        /// Serialized descriptor map of the object's own keys.
        result: String,
        #[serde(rename = "objectName")]
        object_name: String,
    },
    CallRemoteFunction {
        /// Serialized descriptor map `{functionResults: <descriptor>}`.
        #[serde(rename = "functionResult")]
        function_result: String,
    },
    DisposeFunction {
        disposed: String,
    },
    DisposeObject {
        disposed: String,
    },
    CallRemoteCallback {
        #[serde(rename = "callbackId")]
        callback_id: String,
        /// Serialized descriptor map `{callbackParams: <array descriptor>}`.
        params: String,
        #[serde(rename = "generatedObjectId")]
        generated_object_id: String,
    },
}

impl RpcResult {
    pub fn rpc_name(&self) -> &'static str {
        match self {
            Self::GetRemoteObject { .. } => "getRemoteObject",
            Self::CallRemoteFunction { .. } => "callRemoteFunction",
            Self::DisposeFunction { .. } => "disposeFunction",
            Self::DisposeObject { .. } => "disposeObject",
            Self::CallRemoteCallback { .. } => crate::CALL_REMOTE_CALLBACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    pub code: i32,
    pub message: String,
}

/// Any server to client frame: response, error, or notification.
///
/// Notifications are the frames without an `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RpcResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl RpcResponse {
    pub fn success(id: u64, result: RpcResult) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    pub fn failure(id: Option<u64>, code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(RpcErrorBody {
                code: code.code(),
                message: message.into(),
            }),
            id,
        }
    }

    pub fn notification(result: RpcResult) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: None,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none() && self.error.is_none()
    }
}
