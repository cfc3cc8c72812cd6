use crate::error::{CodecError, InvocationError};

use common::ErrorLocation;
use models::RpcErrorCode;

use std::panic::Location;

use thiserror::Error as ThisError;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid JSONRPC request";
pub const METHOD_NOT_FOUND_MESSAGE: &str = "Method not found";
pub const INVALID_PARAMS_MESSAGE: &str = "Invalid params";
pub const BINARY_NOT_ACCEPTED_MESSAGE: &str = "Cannot accept binary data.";

/// Failures reported back to the requesting connection.
///
/// Each variant maps onto one wire error code; see [`RpcError::code`].
#[derive(Debug, ThisError)]
pub enum RpcError {
    #[error("Parse Error: {message} {location}")]
    Parse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Method Not Found Error: {method} {location}")]
    MethodNotFound {
        method: String,
        location: ErrorLocation,
    },

    #[error("Invalid Params Error: {message} {location}")]
    InvalidParams {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unsupported Frame Error: {message} {location}")]
    UnsupportedFrame {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invocation Error: {message} {location}")]
    Invocation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Codec Error: {message} {location}")]
    Codec {
        message: String,
        location: ErrorLocation,
    },
}

impl RpcError {
    #[track_caller]
    pub fn parse(message: impl Into<String>) -> Self {
        RpcError::Parse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        RpcError::InvalidParams {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn binary_frame() -> Self {
        RpcError::UnsupportedFrame {
            message: String::from("binary frame received"),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn code(&self) -> RpcErrorCode {
        match self {
            RpcError::Parse { .. } | RpcError::Codec { .. } => RpcErrorCode::ParseError,
            RpcError::MethodNotFound { .. } => RpcErrorCode::MethodNotFound,
            RpcError::InvalidParams { .. } => RpcErrorCode::InvalidParams,
            RpcError::UnsupportedFrame { .. } => RpcErrorCode::InvalidRequest,
            RpcError::Invocation { .. } => RpcErrorCode::InvocationError,
        }
    }

    /// Message placed in `error.message`. Never includes the source location.
    pub fn wire_message(&self) -> String {
        match self {
            RpcError::Parse { message, .. }
            | RpcError::Invocation { message, .. }
            | RpcError::Codec { message, .. } => message.clone(),
            RpcError::MethodNotFound { .. } => METHOD_NOT_FOUND_MESSAGE.to_string(),
            RpcError::InvalidParams { .. } => INVALID_PARAMS_MESSAGE.to_string(),
            RpcError::UnsupportedFrame { .. } => BINARY_NOT_ACCEPTED_MESSAGE.to_string(),
        }
    }
}

impl From<CodecError> for RpcError {
    #[track_caller]
    fn from(error: CodecError) -> Self {
        let message = match error {
            CodecError::Serialize { message, .. } | CodecError::Malformed { message, .. } => {
                message
            }
        };
        RpcError::Codec {
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<InvocationError> for RpcError {
    #[track_caller]
    fn from(error: InvocationError) -> Self {
        RpcError::Invocation {
            message: error.message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
