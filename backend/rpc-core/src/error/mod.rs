pub mod client;
pub mod codec;
pub mod config;
pub mod invocation;
pub mod ipc;
pub mod rpc;

pub use client::ClientError;
pub use codec::CodecError;
pub use config::ConfigError;
pub use invocation::InvocationError;
pub use ipc::IpcError;
pub use rpc::RpcError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Ipc(#[from] IpcError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
