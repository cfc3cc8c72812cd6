use crate::codec::{self, FUNCTION_RESULTS_KEY};
use crate::dispatch::Dispatcher;
use crate::dispatch::args::unmarshal_args;
use crate::error::RpcError;
use crate::value::Value;

use models::{RpcRequest, RpcResult, param};

use log::{debug, info};
use serde_json::Value as JsonValue;

impl Dispatcher {
    /// Handle get remote object request.
    ///
    /// Re-requesting a name mints fresh handles into the same namespace; the
    /// handles minted earlier stay valid until the object is disposed.
    pub(crate) fn get_remote_object(&self, request: &RpcRequest) -> Result<RpcResult, RpcError> {
        let object_name = required_str(request, param::OBJECT_NAME)?;
        info!("Handling getRemoteObject request for '{object_name}'");

        let object = self
            .catalog
            .get(object_name)
            .ok_or_else(|| RpcError::invalid_params(format!("unknown object '{object_name}'")))?;

        let result = {
            let mut registry = self.registry.lock();
            registry.open_object(object_name, Value::Object(object.clone()));
            codec::encode_object(&object, object_name, &mut registry)?
        };

        Ok(RpcResult::GetRemoteObject {
            result,
            object_name: object_name.to_string(),
        })
    }

    /// Handle call remote function request.
    ///
    /// The registry lock is released while the function runs. The return
    /// value is encoded under the namespace named by the calling handle, so
    /// handles it yields are disposed through `disposeObject(callingId)`.
    pub(crate) fn call_remote_function(
        &self,
        request: &RpcRequest,
    ) -> Result<RpcResult, RpcError> {
        let calling_id = required_str(request, param::CALLING_ID)?;
        debug!("Handling callRemoteFunction request for {calling_id}");

        let function = self
            .registry
            .lock()
            .function(calling_id)
            .cloned()
            .ok_or_else(|| RpcError::invalid_params(format!("unknown function '{calling_id}'")))?;

        let raw_args = match request.params.get(param::ARGS) {
            None => Vec::new(),
            Some(JsonValue::Array(items)) => items.clone(),
            Some(_) => return Err(RpcError::invalid_params("'args' must be an array")),
        };
        let args = unmarshal_args(raw_args, &self.registry, &self.callbacks)?;

        let returned = function.invoke(args)?;

        let function_result = {
            let mut registry = self.registry.lock();
            codec::encode_wrapped(FUNCTION_RESULTS_KEY, returned, calling_id, &mut registry)?
        };

        Ok(RpcResult::CallRemoteFunction { function_result })
    }

    /// Handle dispose function request.
    pub(crate) fn dispose_function(&self, request: &RpcRequest) -> Result<RpcResult, RpcError> {
        let function_id = required_str(request, param::FUNCTION_ID)?;

        self.registry
            .lock()
            .dispose_function(function_id)
            .ok_or_else(|| RpcError::invalid_params(format!("unknown function '{function_id}'")))?;

        Ok(RpcResult::DisposeFunction {
            disposed: function_id.to_string(),
        })
    }

    /// Handle dispose object request. Unknown names succeed.
    pub(crate) fn dispose_object(&self, request: &RpcRequest) -> Result<RpcResult, RpcError> {
        let object_name = required_str(request, param::OBJECT_NAME)?;

        if self.registry.lock().dispose_object(object_name).is_none() {
            debug!("Object '{object_name}' was already disposed");
        }

        Ok(RpcResult::DisposeObject {
            disposed: object_name.to_string(),
        })
    }
}

#[track_caller]
fn required_str<'a>(request: &'a RpcRequest, key: &str) -> Result<&'a str, RpcError> {
    request
        .str_param(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RpcError::invalid_params(format!("'{key}' must be a non-empty string")))
}
