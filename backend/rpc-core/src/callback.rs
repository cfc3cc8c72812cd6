//! Server to client callback notifications.
//!
//! When a client passes one of its own functions as a call argument, the
//! dispatcher hands the invoked function a native stand-in built here.
//! Calling the stand-in encodes its arguments and pushes a
//! `callRemoteCallback` notification into the connection's outbound queue.

use crate::codec::{self, CALLBACK_PARAMS_KEY};
use crate::envelope;
use crate::error::{InvocationError, RpcError};
use crate::registry::SharedRegistry;
use crate::value::{Function, Value};

use common::ErrorLocation;
use models::Handle;

use std::panic::Location;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Clone)]
pub struct CallbackChannel {
    outbound: UnboundedSender<String>,
    registry: SharedRegistry,
}

impl CallbackChannel {
    /// `outbound` is the connection's text-frame queue; `registry` receives any
    /// handles minted while encoding callback arguments.
    pub fn new(outbound: UnboundedSender<String>, registry: SharedRegistry) -> Self {
        Self { outbound, registry }
    }

    /// Push a notification invoking the client's callback `callback_id`.
    ///
    /// Arguments are encoded as `{callbackParams: [...]}` under a freshly
    /// minted object id, which is sent along so the client can dispose it.
    pub fn notify(&self, callback_id: &str, args: Vec<Value>) -> Result<(), RpcError> {
        let generated_object_id = Handle::mint();

        let params = {
            let mut registry = self.registry.lock();
            codec::encode_wrapped(
                CALLBACK_PARAMS_KEY,
                Value::Array(args),
                generated_object_id.as_str(),
                &mut registry,
            )?
        };

        let frame =
            envelope::notification_frame(callback_id, params, generated_object_id.as_str())?;

        self.outbound.send(frame).map_err(|_| RpcError::Invocation {
            message: format!("connection closed before callback {callback_id} could be sent"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!("Pushed callback {callback_id} (object {generated_object_id})");
        Ok(())
    }

    /// Native function that notifies `callback_id` each time it is called.
    pub fn invoker(&self, callback_id: String) -> Function {
        let channel = self.clone();
        Function::native(move |args| {
            channel
                .notify(&callback_id, args)
                .map_err(|e| InvocationError::new(e.wire_message()))?;
            Ok(Value::Undefined)
        })
    }
}
