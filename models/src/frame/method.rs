use crate::ModelError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

/// `rpcName` of the server-initiated callback notification.
pub const CALL_REMOTE_CALLBACK: &str = "callRemoteCallback";

/// Request methods understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    GetRemoteObject,
    CallRemoteFunction,
    DisposeFunction,
    DisposeObject,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 4] = [
        Self::GetRemoteObject,
        Self::CallRemoteFunction,
        Self::DisposeFunction,
        Self::DisposeObject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetRemoteObject => "getRemoteObject",
            Self::CallRemoteFunction => "callRemoteFunction",
            Self::DisposeFunction => "disposeFunction",
            Self::DisposeObject => "disposeObject",
        }
    }
}

impl Display for RpcMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcMethod {
    type Err = ModelError;

    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| ModelError::UnknownMethod {
                method: value.to_string(),
                location: ErrorLocation::caller(),
            })
    }
}
