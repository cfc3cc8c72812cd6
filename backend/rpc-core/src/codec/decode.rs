use crate::error::CodecError;
use crate::value::{Function, ObjectMap, RegExpLiteral, Symbol, Value, date};

use models::{DescriptorMap, Handle, ValueDescriptor};

use num_bigint::BigInt;

/// Builds local stand-ins for handles received from the peer.
pub trait ProxyFactory {
    /// A callable proxy for the remote function behind `calling_id`.
    fn function_proxy(&self, calling_id: &Handle, function_name: &str) -> Function;

    /// A local token standing for the remote symbol. Its display form embeds
    /// the handle so it can be sent back as `Symbol(<handle>)`.
    fn symbol_proxy(&self, symbol_id: &Handle) -> Symbol {
        Symbol::labeled(symbol_id.as_str())
    }
}

pub fn decode_value<P>(descriptor: &ValueDescriptor, proxies: &P) -> Result<Value, CodecError>
where
    P: ProxyFactory + ?Sized,
{
    let value = match descriptor {
        ValueDescriptor::Number { result } => Value::Number(*result),
        ValueDescriptor::String { result } => Value::String(result.clone()),
        ValueDescriptor::Boolean { result } => Value::Boolean(*result),
        ValueDescriptor::Undefined => Value::Undefined,
        ValueDescriptor::Null => Value::Null,
        ValueDescriptor::BigInt { result } => Value::BigInt(
            result
                .parse::<BigInt>()
                .map_err(|e| CodecError::malformed(format!("invalid bigint '{result}': {e}")))?,
        ),
        ValueDescriptor::Date { result } => Value::Date(date::parse_date(result)?),
        ValueDescriptor::RegExp { result } => Value::RegExp(result.parse::<RegExpLiteral>()?),
        ValueDescriptor::Array { result } => Value::Array(
            result
                .iter()
                .map(|item| decode_value(item, proxies))
                .collect::<Result<_, _>>()?,
        ),
        ValueDescriptor::Object { result } => Value::Object(decode_object(result, proxies)?),
        ValueDescriptor::Function {
            function_name,
            calling_id,
        } => Value::Function(proxies.function_proxy(calling_id, function_name)),
        ValueDescriptor::Symbol { symbol_id } => Value::Symbol(proxies.symbol_proxy(symbol_id)),
    };

    Ok(value)
}

pub fn parse_map(payload: &str) -> Result<DescriptorMap, CodecError> {
    serde_json::from_str(payload)
        .map_err(|e| CodecError::malformed(format!("invalid descriptor map: {e}")))
}

/// Decode a serialized descriptor map into an object.
pub fn decode_object<P>(payload: &str, proxies: &P) -> Result<ObjectMap, CodecError>
where
    P: ProxyFactory + ?Sized,
{
    parse_map(payload)?
        .iter()
        .map(|(key, descriptor)| {
            decode_value(descriptor, proxies).map(|value| (key.clone(), value))
        })
        .collect()
}

/// Decode the single `key` entry of a wrapped payload such as
/// `{functionResults: …}`.
pub fn decode_wrapped<P>(payload: &str, key: &str, proxies: &P) -> Result<Value, CodecError>
where
    P: ProxyFactory + ?Sized,
{
    let map = parse_map(payload)?;
    let descriptor = map
        .get(key)
        .ok_or_else(|| CodecError::malformed(format!("payload has no '{key}' entry")))?;
    decode_value(descriptor, proxies)
}
