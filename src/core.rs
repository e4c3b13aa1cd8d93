//! # Core
//!
//! Small serde-friendly sum types shared across the crate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Err;
use crate::{tracerr, Result};

/// `OneMany` allows serde to serialize/deserialize a single object or a set of
/// objects.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneMany<T> {
    /// Single object
    One(T),

    /// Set of objects
    Many(Vec<T>),
}

impl<T> From<Vec<T>> for OneMany<T> {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value)
    }
}

impl From<String> for OneMany<String> {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<&str> for OneMany<String> {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

/// A value handed to one of the document's `add_*` operations: either an
/// entity that is already typed or a raw JSON value still to be converted.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry<T> {
    /// Already a typed entity.
    Typed(T),

    /// Raw JSON. Must be an object to be accepted.
    Raw(Value),
}

impl<T: From<Map<String, Value>>> Entry<T> {
    /// Resolve the entry into a typed entity.
    ///
    /// # Errors
    ///
    /// [`Err::InvalidArgument`] when a raw value is not a JSON object.
    pub fn into_entity(self, what: &str) -> Result<T> {
        match self {
            Self::Typed(entity) => Ok(entity),
            Self::Raw(Value::Object(map)) => Ok(T::from(map)),
            Self::Raw(other) => {
                tracerr!(Err::InvalidArgument, "{what}: expecting object, got {}", kind(&other))
            }
        }
    }
}

impl<T> From<Value> for Entry<T> {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

impl<T> From<Map<String, Value>> for Entry<T> {
    fn from(map: Map<String, Value>) -> Self {
        Self::Raw(Value::Object(map))
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PublicKey;

    #[test]
    fn one_many_serde() {
        let one: OneMany<String> = serde_json::from_value(json!("a")).expect("should parse");
        assert_eq!(one, OneMany::from("a"));

        let many: OneMany<String> =
            serde_json::from_value(json!(["a", "b"])).expect("should parse");
        assert_eq!(many, OneMany::Many(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(serde_json::to_value(&many).expect("should serialize"), json!(["a", "b"]));
    }

    #[test]
    fn raw_object_entry() {
        let entry: Entry<PublicKey> = json!({"id": "did:example:1#k", "type": "Ed25519"}).into();
        let pk = entry.into_entity("addPublicKey").expect("should convert");
        assert_eq!(pk.id(), Some("did:example:1#k"));
    }

    #[test]
    fn raw_non_object_entry() {
        let entry: Entry<PublicKey> = json!("did:example:1#k").into();
        let err = entry.into_entity("addPublicKey").expect_err("should fail");
        assert!(err.is(Err::InvalidArgument));
        assert_eq!(err.to_string(), "addPublicKey: expecting object, got string");
    }
}
