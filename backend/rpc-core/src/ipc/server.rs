//! RPC WebSocket server implementation.
//!
//! The server:
//!
//! - Listens on the configured `host:port` (port `0` picks a free port)
//! - Speaks JSON-RPC 2.0 over text frames
//! - Rejects binary frames with an error frame and keeps the connection open
//! - Handles concurrent connections, one message at a time per connection
//!
//! # Protocol
//!
//! Every text frame is answered with exactly one response or error frame.
//! Callback notifications are interleaved on the same socket without an `id`.

use crate::callback::CallbackChannel;
use crate::catalog::ObjectCatalog;
use crate::config::{RegistryScope, ServerConfig};
use crate::dispatch::Dispatcher;
use crate::error::IpcError;
use crate::ipc::connection_state::ConnectionState;
use crate::ipc::handle::RpcServerHandle;
use crate::registry::SharedRegistry;

use common::ErrorLocation;

use std::net::SocketAddr;
use std::panic::Location;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use log::{error, info, trace, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn as TokioSpawn;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

type WsWriter = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Starts the RPC WebSocket server.
///
/// Binds `config.host:config.port` and spawns a background task accepting
/// WebSocket connections. Objects are served from `catalog`.
///
/// # Returns
///
/// Returns [`RpcServerHandle`] on success, representing the running server.
///
/// # Errors
///
/// Returns [`IpcError::Io`] if the address cannot be bound (port in use,
/// insufficient permissions, unknown interface).
pub async fn start_rpc_server(
    config: &ServerConfig,
    catalog: ObjectCatalog,
) -> Result<RpcServerHandle, IpcError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    let local_addr = listener.local_addr()?;

    info!(
        "RPC server listening on {local_addr} (registry scope: {})",
        config.registry_scope
    );

    let scope = config.registry_scope;
    let loopback_only = config.loopback_only;
    let process_registry = SharedRegistry::new();
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let accept_task = TokioSpawn(async move {
        loop {
            let accepted = tokio::select! {
                _ = shutdown_rx.changed() => break,
                accepted = listener.accept() => accepted,
            };

            let (stream, addr) = match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {e}");
                    continue;
                }
            };

            if loopback_only && !addr.ip().is_loopback() {
                warn!("Rejected non-loopback connection from {addr}");
                continue;
            }

            let registry = match scope {
                RegistryScope::Connection => SharedRegistry::new(),
                RegistryScope::Process => process_registry.clone(),
            };
            let catalog = catalog.clone();
            let shutdown = shutdown_rx.clone();

            info!("Client connecting from {addr}");
            TokioSpawn(async move {
                if let Err(e) =
                    handle_connection(stream, addr, scope, catalog, registry, shutdown).await
                {
                    error!("Connection {addr} ended with error: {e}");
                }
            });
        }

        info!("RPC server on {local_addr} stopped accepting connections");
    });

    Ok(RpcServerHandle::new(local_addr, shutdown_tx, accept_task))
}

/// Handles a single WebSocket connection.
///
/// 1. Performs the WebSocket handshake
/// 2. Spawns the writer task draining the outbound queue
/// 3. Feeds each received frame to the dispatcher until close or shutdown
///
/// # Errors
///
/// - [`IpcError::Handshake`] - WebSocket upgrade failed
/// - [`IpcError::Read`] - Failed to read a frame from the client
/// - [`IpcError::Send`] - The writer task is gone
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    scope: RegistryScope,
    catalog: ObjectCatalog,
    registry: SharedRegistry,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), IpcError> {
    let ws_stream = accept_async(stream).await.map_err(|e| {
        error!("WebSocket handshake failed: {e}");
        IpcError::Handshake {
            message: format!("WebSocket handshake failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    let (write, mut read) = ws_stream.split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<String>();
    let mut writer = TokioSpawn(write_frames(write, outbound_rx, addr));

    let callbacks = CallbackChannel::new(outbound_tx.clone(), registry.clone());
    let dispatcher = Dispatcher::new(catalog, registry.clone(), callbacks);
    let mut state = ConnectionState::new(addr, scope, registry);

    info!("Client {addr} connected");

    let result = loop {
        let message = tokio::select! {
            _ = shutdown.changed() => {
                info!("Closing connection to {addr} for shutdown");
                break Ok(());
            }
            message = read.next() => message,
        };

        let Some(message) = message else {
            break Ok(());
        };

        let reply = match message {
            Ok(Message::Text(text)) => {
                state.record_text();
                trace!("<- {addr}: {}", text.as_str());
                dispatcher.handle_text(text.as_str())
            }
            Ok(Message::Binary(_)) => {
                state.record_binary();
                dispatcher.handle_binary()
            }
            Ok(Message::Close(_)) => break Ok(()),
            Ok(_) => {
                trace!("Ignoring control frame from {addr}");
                continue;
            }
            Err(e) => {
                error!("Error reading message from {addr}: {e}");
                break Err(IpcError::Read {
                    message: format!("Error reading message: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if let Err(e) = queue_frame(&outbound_tx, reply) {
            break Err(e);
        }
    };

    drop(dispatcher);
    drop(outbound_tx);

    // Callback invokers kept by user code hold senders past the connection.
    if timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await.is_err() {
        warn!("Writer for {addr} did not drain in time");
        writer.abort();
    }
    state.finish();

    result
}

fn queue_frame(outbound: &UnboundedSender<String>, frame: String) -> Result<(), IpcError> {
    outbound.send(frame).map_err(|_| IpcError::Send {
        message: String::from("connection writer is closed"),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Drain the outbound queue onto the socket.
async fn write_frames(
    mut write: WsWriter,
    mut outbound: UnboundedReceiver<String>,
    addr: SocketAddr,
) {
    while let Some(frame) = outbound.recv().await {
        trace!("-> {addr}: {frame}");
        if let Err(e) = write.send(Message::text(frame)).await {
            error!("Failed to send frame to {addr}: {e}");
            break;
        }
    }
}
