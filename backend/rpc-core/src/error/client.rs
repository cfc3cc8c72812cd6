use crate::error::CodecError;

use common::ErrorLocation;
use models::{ModelError, RpcMethod, RpcResult};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
    },

    #[error("Send Error: {message} {location}")]
    Send {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connection Closed Error: {message} {location}")]
    Closed {
        message: String,
        location: ErrorLocation,
    },

    /// Error frame returned by the server.
    #[error("Remote Error: {code} {message} {location}")]
    Remote {
        code: i32,
        message: String,
        location: ErrorLocation,
    },

    #[error("Protocol Error: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("Codec Error: {message} {location}")]
    Codec {
        message: String,
        location: ErrorLocation,
    },

    #[error("Model Error: {message} {location}")]
    Model {
        message: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    /// A success frame whose `rpcName` does not match the request method.
    #[track_caller]
    pub fn unexpected(method: RpcMethod, result: &RpcResult) -> Self {
        ClientError::Protocol {
            message: format!(
                "expected a {method} result, received {}",
                result.rpc_name()
            ),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn closed(message: impl Into<String>) -> Self {
        ClientError::Closed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CodecError> for ClientError {
    #[track_caller]
    fn from(error: CodecError) -> Self {
        ClientError::Codec {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ModelError> for ClientError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        ClientError::Model {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
