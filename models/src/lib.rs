//! Wire models for the remote-objects protocol.
//!
//! This crate contains pure data structures: the tagged value descriptors that
//! cross the socket, the handles minted for functions and symbols, and the
//! JSON-RPC-shaped frames that carry them. Nothing in here performs I/O or
//! touches a reference table - that lives in `rpc-core`.

pub mod descriptor;
pub mod error;
pub mod frame;

pub use descriptor::{DescriptorMap, Handle, ValueDescriptor};
pub use error::model_error::ModelError;
pub use frame::code::RpcErrorCode;
pub use frame::method::{CALL_REMOTE_CALLBACK, RpcMethod};
pub use frame::request::{RequestBuilder, RpcRequest, param};
pub use frame::response::{RpcErrorBody, RpcResponse, RpcResult};

/// Protocol version string carried by every frame.
pub const JSONRPC_VERSION: &str = "2.0";

#[cfg(test)]
mod tests;
