//! Tagged value descriptors and reference handles.

use std::borrow::Borrow;
use std::fmt::{Display, Formatter, Result as FormatResult};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Opaque identifier minted for a function or symbol that cannot cross the wire.
///
/// Handles are random 128-bit tokens rendered in their hyphenated text form.
/// The peer only ever echoes them back; it never interprets their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Mint a fresh random handle.
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Read `text` as a handle this side could have minted.
    ///
    /// Returns `None` unless `text` is a UUID.
    pub fn parse(text: &str) -> Option<Self> {
        Uuid::try_parse(text).ok().map(|_| Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Handle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for Handle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.write_str(&self.0)
    }
}

/// Wire representation of a single value.
///
/// Serialized with an internal `"type"` tag. `object` descriptors carry their
/// nested key/descriptor map as a *serialized string* rather than a nested
/// structure; peers depend on that double encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueDescriptor {
    Number {
        #[serde(serialize_with = "integral_or_float", deserialize_with = "number_or_nan")]
        result: f64,
    },
    String {
        result: String,
    },
    Boolean {
        result: bool,
    },
    Undefined,
    Null,
    #[serde(rename = "bigint")]
    BigInt {
        result: String,
    },
    Date {
        result: String,
    },
    #[serde(rename = "regexp")]
    RegExp {
        result: String,
    },
    Array {
        result: Vec<ValueDescriptor>,
    },
    Object {
        result: String,
    },
    Function {
        #[serde(rename = "functionName")]
        function_name: String,
        #[serde(rename = "callingId")]
        calling_id: Handle,
    },
    Symbol {
        #[serde(rename = "symbolId")]
        symbol_id: Handle,
    },
}

impl ValueDescriptor {
    /// The wire tag of this descriptor.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::String { .. } => "string",
            Self::Boolean { .. } => "boolean",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::BigInt { .. } => "bigint",
            Self::Date { .. } => "date",
            Self::RegExp { .. } => "regexp",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
            Self::Function { .. } => "function",
            Self::Symbol { .. } => "symbol",
        }
    }
}

/// Key to descriptor map, in the key order of the source object.
pub type DescriptorMap = IndexMap<String, ValueDescriptor>;

// Largest integer an f64 represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

// Whole numbers go out without a fraction, as `1` rather than `1.0`.
fn integral_or_float<S>(number: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*number as i64)
    } else {
        serializer.serialize_f64(*number)
    }
}

// Non-finite numbers serialize as `null`; read them back as NaN.
fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
