//! Request dispatcher.
//!
//! Validates an incoming text frame, routes it to one of the four request
//! methods, and turns the outcome into exactly one response frame.
//!
//! # Methods
//!
//! - `getRemoteObject` - describe a catalog object and open its namespace
//! - `callRemoteFunction` - invoke a function handle with marshaled arguments
//! - `disposeFunction` - release one function handle
//! - `disposeObject` - release a namespace and every handle minted under it
//!
//! # Errors
//!
//! Failures never close the connection. They are answered with an error frame
//! whose `id` echoes the request when the envelope itself was valid.

mod args;
mod handlers;

pub use args::{get_callback_regex, get_symbol_regex, unmarshal_args};

use crate::callback::CallbackChannel;
use crate::catalog::ObjectCatalog;
use crate::envelope;
use crate::error::RpcError;
use crate::registry::SharedRegistry;

use common::ErrorLocation;
use models::{RpcMethod, RpcRequest, RpcResult};

use std::panic::Location;

use log::{debug, warn};

/// Per-connection request router.
///
/// Cheap to clone: every field is a shared handle.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: ObjectCatalog,
    registry: SharedRegistry,
    callbacks: CallbackChannel,
}

impl Dispatcher {
    pub fn new(
        catalog: ObjectCatalog,
        registry: SharedRegistry,
        callbacks: CallbackChannel,
    ) -> Self {
        Self {
            catalog,
            registry,
            callbacks,
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Handle one text frame and produce the frame to send back.
    pub fn handle_text(&self, text: &str) -> String {
        let request = match envelope::parse_request(text) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected frame: {e}");
                return envelope::error_frame(None, &e);
            }
        };

        let id = request.id;
        match self
            .dispatch(&request)
            .and_then(|result| envelope::success_frame(id, result))
        {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Request {id} '{}' failed: {e}", request.method);
                envelope::error_frame(Some(id), &e)
            }
        }
    }

    /// Binary frames are never processed.
    pub fn handle_binary(&self) -> String {
        let error = RpcError::binary_frame();
        warn!("Rejected frame: {error}");
        envelope::error_frame(None, &error)
    }

    /// Route a validated request to its handler.
    pub fn dispatch(&self, request: &RpcRequest) -> Result<RpcResult, RpcError> {
        let method = request
            .rpc_method()
            .map_err(|_| RpcError::MethodNotFound {
                method: request.method.clone(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!("Dispatching request {} to {method}", request.id);

        match method {
            RpcMethod::GetRemoteObject => self.get_remote_object(request),
            RpcMethod::CallRemoteFunction => self.call_remote_function(request),
            RpcMethod::DisposeFunction => self.dispose_function(request),
            RpcMethod::DisposeObject => self.dispose_object(request),
        }
    }
}
