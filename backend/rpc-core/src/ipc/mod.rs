//! WebSocket transport for the request dispatcher.
//!
//! Each accepted connection gets its own [`Dispatcher`](crate::dispatch::Dispatcher)
//! and an outbound queue shared by responses and callback notifications, so
//! frames leave in the order they were produced.
//!
//! # Security
//!
//! - Binds to `127.0.0.1` by default
//! - With `loopback_only` set, non-loopback peers are dropped before the handshake

mod connection_state;
mod handle;
mod server;

pub use handle::RpcServerHandle;
pub use server::start_rpc_server;
