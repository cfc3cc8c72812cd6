//! Handle to a running RPC server.

use std::net::SocketAddr;

use log::{error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running RPC WebSocket server.
///
/// Returned by [`start_rpc_server`](crate::ipc::start_rpc_server).
///
/// # Lifecycle
///
/// The server runs until [`shutdown`](Self::shutdown) is called or the handle
/// is dropped. Either way the accept loop stops and every open connection is
/// closed.
pub struct RpcServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
}

impl RpcServerHandle {
    pub(crate) fn new(
        local_addr: SocketAddr,
        shutdown_tx: watch::Sender<bool>,
        accept_task: JoinHandle<()>,
    ) -> Self {
        Self {
            local_addr,
            shutdown_tx,
            accept_task,
        }
    }

    /// Address the listener is bound to, with the real port when `0` was requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `ws://` URL a client can connect to.
    pub fn url(&self) -> String {
        format!("ws://{}", self.local_addr)
    }

    /// Stop accepting connections, close the open ones, and wait for the
    /// accept loop to exit.
    pub async fn shutdown(self) {
        info!("Shutting down RPC server on {}", self.local_addr);
        self.shutdown_tx.send_replace(true);
        if let Err(e) = self.accept_task.await {
            error!("RPC server accept loop ended abnormally: {e}");
        }
    }
}
