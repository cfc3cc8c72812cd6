//! JSON-RPC 2.0 shaped frames exchanged over the text socket.

pub mod code;
pub mod method;
pub mod request;
pub mod response;
