//! State shared by a client, its reader task and its function proxies.

use crate::client::callbacks::CallbackTable;
use crate::client::function::RemoteFunction;
use crate::client::marshal;
use crate::codec::{self, CALLBACK_PARAMS_KEY, ProxyFactory};
use crate::error::ClientError;
use crate::value::{Function, Value};

use common::ErrorLocation;
use models::{Handle, RequestBuilder, RpcResponse, RpcResult};

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, trace, warn};
use serde_json::Value as JsonValue;
use tokio::spawn as TokioSpawn;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

type PendingReply = oneshot::Sender<Result<RpcResult, ClientError>>;

pub(crate) struct ClientInner {
    outbound: UnboundedSender<Message>,
    next_request_id: AtomicU64,
    request_timeout: Option<Duration>,
    pending: Mutex<HashMap<u64, PendingReply>>,
    callbacks: Mutex<CallbackTable>,
    /// Function handle to the namespace it was decoded under.
    remote_functions: Mutex<HashMap<Handle, String>>,
    remote_objects: Mutex<HashSet<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ClientInner {
    pub(crate) fn new(
        outbound: UnboundedSender<Message>,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            outbound,
            next_request_id: AtomicU64::new(1),
            request_timeout,
            pending: Mutex::new(HashMap::new()),
            callbacks: Mutex::new(CallbackTable::new()),
            remote_functions: Mutex::new(HashMap::new()),
            remote_objects: Mutex::new(HashSet::new()),
        }
    }

    /// Send a request and wait for its correlated response.
    ///
    /// Responses may arrive in any order. On timeout the pending entry is
    /// removed, so a late response is dropped by the reader.
    pub(crate) async fn request(&self, builder: RequestBuilder) -> Result<RpcResult, ClientError> {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let request = builder.with_id(id).build()?;
        let frame = serde_json::to_string(&request).map_err(|e| ClientError::Protocol {
            message: format!("Failed to serialize request {id}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let (reply_tx, reply_rx) = oneshot::channel();
        lock(&self.pending).insert(id, reply_tx);

        trace!("-> request {id} {}", request.method);
        if self.outbound.send(Message::text(frame)).is_err() {
            lock(&self.pending).remove(&id);
            return Err(ClientError::closed("connection writer is closed"));
        }

        let reply = match self.request_timeout {
            Some(limit) => match timeout(limit, reply_rx).await {
                Ok(reply) => reply,
                Err(_) => {
                    lock(&self.pending).remove(&id);
                    return Err(ClientError::Timeout {
                        message: format!(
                            "request {id} ({}) got no response within {limit:?}",
                            request.method
                        ),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            },
            None => reply_rx.await,
        };

        reply.map_err(|_| {
            ClientError::closed(format!(
                "connection closed before request {id} was answered"
            ))
        })?
    }

    pub(crate) fn send_close(&self) {
        if self.outbound.send(Message::Close(None)).is_err() {
            trace!("Close requested on a finished writer");
        }
    }

    pub(crate) fn marshal_args(&self, args: Vec<Value>) -> Vec<JsonValue> {
        marshal::marshal_args(args, &mut lock(&self.callbacks))
    }

    pub(crate) fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    pub(crate) fn callback_count(&self) -> usize {
        lock(&self.callbacks).len()
    }

    pub(crate) fn dispose_callback(&self, function: &Function) -> usize {
        lock(&self.callbacks).dispose(function)
    }

    pub(crate) fn remote_function_count(&self) -> usize {
        lock(&self.remote_functions).len()
    }

    pub(crate) fn bound_objects(&self) -> Vec<String> {
        lock(&self.remote_objects).iter().cloned().collect()
    }

    pub(crate) fn bind_object(&self, name: &str) {
        lock(&self.remote_objects).insert(name.to_string());
    }

    pub(crate) fn forget_function(&self, calling_id: &str) {
        lock(&self.remote_functions).remove(calling_id);
    }

    /// Forget the namespace and every function proxy decoded under it.
    pub(crate) fn forget_object(&self, name: &str) {
        lock(&self.remote_objects).remove(name);
        lock(&self.remote_functions).retain(|_, owner| owner != name);
    }

    /// Fail every outstanding request; called once the socket is gone.
    pub(crate) fn close_pending(&self) {
        let pending: Vec<_> = lock(&self.pending).drain().collect();
        for (id, reply) in pending {
            debug!("Failing request {id}: connection closed");
            if reply
                .send(Err(ClientError::closed("connection closed")))
                .is_err()
            {
                trace!("Request {id} was abandoned before close");
            }
        }
    }

    /// Route one text frame received from the server.
    pub(crate) fn route_frame(self: &Arc<Self>, text: &str) {
        let response: RpcResponse = match serde_json::from_str(text) {
            Ok(response) => response,
            Err(e) => {
                warn!("Ignoring unreadable frame from server: {e}");
                return;
            }
        };

        match (response.id, response.error, response.result) {
            (Some(id), Some(error), _) => self.resolve(
                id,
                Err(ClientError::Remote {
                    code: error.code,
                    message: error.message,
                    location: ErrorLocation::from(Location::caller()),
                }),
            ),
            (None, Some(error), _) => {
                warn!("Server reported error {}: {}", error.code, error.message);
            }
            (Some(id), None, Some(result)) => self.resolve(id, Ok(result)),
            (
                None,
                None,
                Some(RpcResult::CallRemoteCallback {
                    callback_id,
                    params,
                    generated_object_id,
                }),
            ) => self.run_callback(&callback_id, &params, &generated_object_id),
            _ => warn!("Ignoring unexpected frame from server: {text}"),
        }
    }

    fn resolve(&self, id: u64, outcome: Result<RpcResult, ClientError>) {
        let Some(reply) = lock(&self.pending).remove(&id) else {
            debug!("No pending request {id}; dropping response");
            return;
        };
        if reply.send(outcome).is_err() {
            trace!("Request {id} was abandoned before its response arrived");
        }
    }

    fn run_callback(self: &Arc<Self>, callback_id: &str, params: &str, generated_object_id: &str) {
        self.bind_object(generated_object_id);
        let proxies = ProxyContext::new(self, generated_object_id);

        let args = match codec::decode_wrapped(params, CALLBACK_PARAMS_KEY, &proxies) {
            Ok(Value::Array(args)) => args,
            Ok(other) => {
                warn!("Callback {callback_id} params are a {}, not an array", other.kind());
                return;
            }
            Err(e) => {
                warn!("Failed to decode params for callback {callback_id}: {e}");
                return;
            }
        };

        let callback = callback_id
            .parse::<u64>()
            .ok()
            .and_then(|id| lock(&self.callbacks).get(id).cloned());

        let Some(callback) = callback else {
            warn!("Unknown callback {callback_id}");
            return;
        };

        debug!("Running callback {callback_id} with {} args", args.len());
        match &callback {
            Function::Native(_) => {
                if let Err(e) = callback.invoke(args) {
                    warn!("Callback {callback_id} failed: {e}");
                }
            }
            Function::Remote(remote) => {
                let remote = remote.clone();
                let callback_id = callback_id.to_string();
                TokioSpawn(async move {
                    if let Err(e) = remote.call(args).await {
                        warn!("Forwarded callback {callback_id} failed: {e}");
                    }
                });
            }
        }
    }
}

/// Decoding context: proxies minted here belong to the `owner` namespace.
pub(crate) struct ProxyContext<'a> {
    client: &'a Arc<ClientInner>,
    owner: &'a str,
}

impl<'a> ProxyContext<'a> {
    pub(crate) fn new(client: &'a Arc<ClientInner>, owner: &'a str) -> Self {
        Self { client, owner }
    }
}

impl ProxyFactory for ProxyContext<'_> {
    fn function_proxy(&self, calling_id: &Handle, function_name: &str) -> Function {
        lock(&self.client.remote_functions).insert(calling_id.clone(), self.owner.to_string());
        Function::Remote(RemoteFunction::new(
            calling_id.clone(),
            function_name,
            Arc::downgrade(self.client),
        ))
    }
}
