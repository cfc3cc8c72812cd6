//! Client peer for the remote object protocol.
//!
//! [`RemoteClient`] connects to a server, fetches named objects and decodes
//! them into [`Value`]s whose functions are [`RemoteFunction`] proxies.
//! Passing a local function as a call argument registers it as a callback the
//! server can invoke through notifications.
//!
//! # Tasks
//!
//! - A writer task drains the outbound queue onto the socket
//! - A reader task routes responses to waiting requests and runs callbacks

mod callbacks;
mod config;
mod function;
mod inner;
mod marshal;

pub use callbacks::CallbackTable;
pub use config::ClientConfig;
pub use function::RemoteFunction;
pub use marshal::marshal_args;

use crate::client::inner::{ClientInner, ProxyContext};
use crate::codec;
use crate::error::ClientError;
use crate::value::{Function, Value};

use common::ErrorLocation;
use models::{RequestBuilder, RpcMethod, RpcResult, param};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, trace, warn};
use tokio::net::TcpStream;
use tokio::spawn as TokioSpawn;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio::time::{sleep as TokioSleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CLOSE_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Connection to a remote object server.
///
/// Dropping the client stops its tasks; outstanding proxies then fail with
/// [`ClientError::Closed`].
pub struct RemoteClient {
    inner: Arc<ClientInner>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RemoteClient {
    /// Connect to `config.url()`, retrying with exponential backoff for up to
    /// `config.connect_max_elapsed()`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] once the retry budget is spent.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let ws_stream = connect_with_retry(&config).await?;
        let (write, read) = ws_stream.split();

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let inner = Arc::new(ClientInner::new(outbound_tx, config.request_timeout()));

        let writer = TokioSpawn(write_frames(write, outbound_rx));
        let reader = TokioSpawn(read_frames(read, Arc::clone(&inner)));

        Ok(Self {
            inner,
            reader,
            writer,
        })
    }

    /// Fetch the object exposed under `name`.
    ///
    /// Function proxies in the result belong to the `name` namespace.
    pub async fn get_remote_object(&self, name: &str) -> Result<Value, ClientError> {
        let request = RequestBuilder::default()
            .with_method(RpcMethod::GetRemoteObject)
            .with_param(param::OBJECT_NAME, name);

        match self.inner.request(request).await? {
            RpcResult::GetRemoteObject {
                result,
                object_name,
            } => {
                self.inner.bind_object(&object_name);
                let proxies = ProxyContext::new(&self.inner, &object_name);
                let object = codec::decode_object(&result, &proxies)?;
                info!("Bound remote object '{object_name}' ({} keys)", object.len());
                Ok(Value::Object(object))
            }
            other => Err(ClientError::unexpected(RpcMethod::GetRemoteObject, &other)),
        }
    }

    /// Release the server-side handle behind a function proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Protocol`] when `function` is not a remote proxy.
    pub async fn dispose_function(&self, function: &Function) -> Result<String, ClientError> {
        let remote = function.as_remote().ok_or_else(|| ClientError::Protocol {
            message: String::from("Cannot dispose: not bound to remote function"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let request = RequestBuilder::default()
            .with_method(RpcMethod::DisposeFunction)
            .with_param(param::FUNCTION_ID, remote.calling_id().as_str());

        match self.inner.request(request).await? {
            RpcResult::DisposeFunction { disposed } => {
                self.inner.forget_function(&disposed);
                debug!("Disposed remote function {disposed}");
                Ok(disposed)
            }
            other => Err(ClientError::unexpected(RpcMethod::DisposeFunction, &other)),
        }
    }

    /// Release a namespace and every handle the server minted under it.
    pub async fn dispose_object(&self, name: &str) -> Result<String, ClientError> {
        let request = RequestBuilder::default()
            .with_method(RpcMethod::DisposeObject)
            .with_param(param::OBJECT_NAME, name);

        match self.inner.request(request).await? {
            RpcResult::DisposeObject { disposed } => {
                self.inner.forget_object(&disposed);
                debug!("Disposed remote object '{disposed}'");
                Ok(disposed)
            }
            other => Err(ClientError::unexpected(RpcMethod::DisposeObject, &other)),
        }
    }

    /// Stop routing notifications to `function`. Returns the number of
    /// callback ids released.
    pub fn dispose_callback(&self, function: &Function) -> usize {
        self.inner.dispose_callback(function)
    }

    /// Requests sent and not yet answered.
    pub fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }

    pub fn callback_count(&self) -> usize {
        self.inner.callback_count()
    }

    /// Function proxies decoded and not yet disposed.
    pub fn remote_function_count(&self) -> usize {
        self.inner.remote_function_count()
    }

    pub fn bound_objects(&self) -> Vec<String> {
        self.inner.bound_objects()
    }

    /// Send a close frame and wait briefly for the writer to flush it.
    pub async fn close(mut self) {
        self.inner.send_close();
        if timeout(CLOSE_DRAIN_TIMEOUT, &mut self.writer).await.is_err() {
            warn!("Client writer did not finish closing in time");
        }
    }
}

impl Drop for RemoteClient {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
        self.inner.close_pending();
    }
}

async fn connect_with_retry(config: &ClientConfig) -> Result<WsStream, ClientError> {
    let url = config.url().as_str();
    let mut backoff = ExponentialBackoff {
        max_elapsed_time: Some(config.connect_max_elapsed()),
        ..Default::default()
    };

    debug!("Connecting to {url}");

    loop {
        match connect_async(url).await {
            Ok((ws_stream, _)) => {
                info!("Connected to {url}");
                return Ok(ws_stream);
            }
            Err(e) => match backoff.next_backoff() {
                Some(duration) => {
                    trace!("Connect to {url} failed ({e}), retrying after {duration:?}");
                    TokioSleep(duration).await;
                }
                None => {
                    return Err(ClientError::Connect {
                        message: format!(
                            "Failed to connect to {url} within {:?}: {e}",
                            config.connect_max_elapsed()
                        ),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            },
        }
    }
}

async fn write_frames(
    mut write: SplitSink<WsStream, Message>,
    mut outbound: UnboundedReceiver<Message>,
) {
    while let Some(message) = outbound.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = write.send(message).await {
            error!("Failed to send frame to server: {e}");
            break;
        }
        if closing {
            break;
        }
    }
}

async fn read_frames(mut read: SplitStream<WsStream>, inner: Arc<ClientInner>) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                trace!("<- {}", text.as_str());
                inner.route_frame(text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => trace!("Ignoring non-text frame from server"),
            Err(e) => {
                error!("Error reading from server: {e}");
                break;
            }
        }
    }

    info!("Server connection closed");
    inner.close_pending();
}
