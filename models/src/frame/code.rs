/// Error codes carried in `error.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RpcErrorCode {
    /// Malformed envelope, and the generic fallback.
    ParseError = -32700,
    /// Binary frames are not accepted.
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    /// The invoked function itself failed.
    InvocationError = -32000,
}

impl RpcErrorCode {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -32700 => Some(Self::ParseError),
            -32600 => Some(Self::InvalidRequest),
            -32601 => Some(Self::MethodNotFound),
            -32602 => Some(Self::InvalidParams),
            -32000 => Some(Self::InvocationError),
            _ => None,
        }
    }
}
