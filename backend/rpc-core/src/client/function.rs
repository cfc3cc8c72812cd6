use crate::client::inner::{ClientInner, ProxyContext};
use crate::codec::{self, FUNCTION_RESULTS_KEY};
use crate::error::ClientError;
use crate::value::Value;

use models::{Handle, RequestBuilder, RpcMethod, RpcResult, param};

use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::sync::Weak;

use serde_json::Value as JsonValue;

/// Proxy for a function living on the server.
///
/// Holds only a weak reference to its client: once the
/// [`RemoteClient`](crate::client::RemoteClient) is gone, calls fail with
/// [`ClientError::Closed`].
#[derive(Clone)]
pub struct RemoteFunction {
    calling_id: Handle,
    function_name: String,
    client: Weak<ClientInner>,
}

impl RemoteFunction {
    pub(crate) fn new(calling_id: Handle, function_name: &str, client: Weak<ClientInner>) -> Self {
        Self {
            calling_id,
            function_name: function_name.to_string(),
            client,
        }
    }

    pub fn calling_id(&self) -> &Handle {
        &self.calling_id
    }

    /// The key the function was found under on the server.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Invoke the remote function and decode its return value.
    ///
    /// Handles in the returned value belong to the namespace named by this
    /// function's calling id.
    pub async fn call(&self, args: Vec<Value>) -> Result<Value, ClientError> {
        let client = self
            .client
            .upgrade()
            .ok_or_else(|| {
                ClientError::closed(format!("client for {} was dropped", self.function_name))
            })?;

        let args = client.marshal_args(args);
        let request = RequestBuilder::default()
            .with_method(RpcMethod::CallRemoteFunction)
            .with_param(param::CALLING_ID, self.calling_id.as_str())
            .with_param(param::ARGS, JsonValue::Array(args));

        match client.request(request).await? {
            RpcResult::CallRemoteFunction { function_result } => {
                let proxies = ProxyContext::new(&client, self.calling_id.as_str());
                Ok(codec::decode_wrapped(
                    &function_result,
                    FUNCTION_RESULTS_KEY,
                    &proxies,
                )?)
            }
            other => Err(ClientError::unexpected(RpcMethod::CallRemoteFunction, &other)),
        }
    }
}

impl Debug for RemoteFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.debug_struct("RemoteFunction")
            .field("calling_id", &self.calling_id)
            .field("function_name", &self.function_name)
            .finish()
    }
}
