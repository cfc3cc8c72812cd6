use crate::error::CodecError;
use crate::registry::ReferenceRegistry;
use crate::value::{ObjectMap, Value, date};

use common::ErrorLocation;
use models::{DescriptorMap, ValueDescriptor};

use std::panic::Location;

/// Describe `value`, found under `key`, on behalf of the `owner` namespace.
///
/// Array elements inherit the array's key, so a function inside an array is
/// named after the array.
pub fn encode_value(
    value: &Value,
    key: &str,
    owner: &str,
    registry: &mut ReferenceRegistry,
) -> Result<ValueDescriptor, CodecError> {
    let descriptor = match value {
        Value::Number(number) => ValueDescriptor::Number { result: *number },
        Value::String(text) => ValueDescriptor::String {
            result: text.clone(),
        },
        Value::Boolean(flag) => ValueDescriptor::Boolean { result: *flag },
        Value::Undefined => ValueDescriptor::Undefined,
        Value::Null => ValueDescriptor::Null,
        Value::BigInt(number) => ValueDescriptor::BigInt {
            result: number.to_string(),
        },
        Value::Date(instant) => ValueDescriptor::Date {
            result: date::format_date(instant),
        },
        Value::RegExp(literal) => ValueDescriptor::RegExp {
            result: literal.to_string(),
        },
        Value::Array(items) => ValueDescriptor::Array {
            result: items
                .iter()
                .map(|item| encode_value(item, key, owner, registry))
                .collect::<Result<_, _>>()?,
        },
        Value::Object(map) => ValueDescriptor::Object {
            result: encode_object(map, owner, registry)?,
        },
        Value::Function(function) => ValueDescriptor::Function {
            function_name: key.to_string(),
            calling_id: registry.register_function(owner, function.clone()),
        },
        Value::Symbol(symbol) => ValueDescriptor::Symbol {
            symbol_id: registry.register_symbol(owner, symbol.clone()),
        },
    };

    Ok(descriptor)
}

/// Describe every own key of `map`.
pub fn encode_descriptor_map(
    map: &ObjectMap,
    owner: &str,
    registry: &mut ReferenceRegistry,
) -> Result<DescriptorMap, CodecError> {
    map.iter()
        .map(|(key, value)| {
            encode_value(value, key, owner, registry).map(|descriptor| (key.clone(), descriptor))
        })
        .collect()
}

/// Describe `map` and serialize the result into the transport string carried
/// by `object` descriptors and response payloads.
#[track_caller]
pub fn encode_object(
    map: &ObjectMap,
    owner: &str,
    registry: &mut ReferenceRegistry,
) -> Result<String, CodecError> {
    serialize_map(&encode_descriptor_map(map, owner, registry)?)
}

/// Encode `{key: value}` as a serialized descriptor map.
#[track_caller]
pub fn encode_wrapped(
    key: &str,
    value: Value,
    owner: &str,
    registry: &mut ReferenceRegistry,
) -> Result<String, CodecError> {
    let mut wrapper = ObjectMap::new();
    wrapper.insert(key.to_string(), value);
    encode_object(&wrapper, owner, registry)
}

#[track_caller]
pub fn serialize_map(map: &DescriptorMap) -> Result<String, CodecError> {
    let location = ErrorLocation::from(Location::caller());
    serde_json::to_string(map).map_err(|e| CodecError::Serialize {
        message: format!("Failed to serialize descriptor map: {e}"),
        location,
    })
}
