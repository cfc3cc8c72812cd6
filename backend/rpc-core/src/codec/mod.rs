//! Value codec: host values to wire descriptors and back.
//!
//! Encoding mints handles for functions and symbols into the registry it is
//! handed; it keeps no state of its own between calls. Decoding is a pure
//! function of the descriptor, with function and symbol proxies supplied by a
//! [`ProxyFactory`].

mod decode;
mod encode;

pub use decode::{ProxyFactory, decode_object, decode_value, decode_wrapped, parse_map};
pub use encode::{encode_descriptor_map, encode_object, encode_value, encode_wrapped, serialize_map};

/// Key wrapping the return value of a remote call.
pub const FUNCTION_RESULTS_KEY: &str = "functionResults";

/// Key wrapping the argument list of a callback notification.
pub const CALLBACK_PARAMS_KEY: &str = "callbackParams";
