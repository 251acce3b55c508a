//! Value Codec Module
//!
//! Serialization strategies for values crossing the remote transport.
//!
//! The strategy is fixed at cache construction through a type parameter:
//! [`Json`] round-trips any serde value through JSON (objects, arrays,
//! strings, numbers, booleans, null), while [`Text`] uses the two-way
//! string codec a value type opts into via [`StringCodec`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CacheError, Result};

// == Custom String Codec ==
/// Two-way string codec a value type can declare for remote storage.
///
/// Types implementing this trait are stored through [`Text`] as their own
/// canonical string form instead of JSON.
pub trait StringCodec: Sized {
    /// Renders the value as its wire string.
    fn encode(&self) -> String;

    /// Parses a value back from its wire string.
    fn decode(raw: &str) -> Result<Self>;
}

// == Codec Strategy ==
/// A serialization strategy for values of type `V`.
pub trait ValueCodec<V> {
    /// Encodes a value for storage.
    fn encode(value: &V) -> Result<String>;

    /// Decodes a stored value.
    fn decode(raw: &str) -> Result<V>;
}

// == JSON Strategy ==
/// General structured serialization through serde_json.
#[derive(Debug, Clone, Copy)]
pub struct Json;

impl<V> ValueCodec<V> for Json
where
    V: Serialize + DeserializeOwned,
{
    fn encode(value: &V) -> Result<String> {
        serde_json::to_string(value).map_err(|e| CacheError::Encode(e.to_string()))
    }

    fn decode(raw: &str) -> Result<V> {
        serde_json::from_str(raw).map_err(|e| CacheError::Decode(e.to_string()))
    }
}

// == Custom String Strategy ==
/// Delegates to the value type's own [`StringCodec`].
#[derive(Debug, Clone, Copy)]
pub struct Text;

impl<V> ValueCodec<V> for Text
where
    V: StringCodec,
{
    fn encode(value: &V) -> Result<String> {
        Ok(value.encode())
    }

    fn decode(raw: &str) -> Result<V> {
        V::decode(raw)
    }
}
