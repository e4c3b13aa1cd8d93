//! Public keys are used for digital signatures, encryption and other
//! cryptographic operations, which in turn are the basis for purposes such as
//! authentication or establishing secure communication with service endpoints.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::present;
use crate::core::Entry;

/// A public key entry: `{ id, type, ..extension }`.
///
/// Key material (`publicKeyBase58`, `publicKeyJwk`, ...) and any other
/// property travel as extension fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicKey {
    id: Option<Value>,
    type_: Option<Value>,
    extra: Map<String, Value>,
}

impl PublicKey {
    /// Create a public key entry. Extension fields named `id` or `type` are
    /// ignored.
    #[must_use]
    pub fn new(
        id: impl Into<String>, type_: impl Into<String>, mut extra: Map<String, Value>,
    ) -> Self {
        extra.retain(|k, _| k != "id" && k != "type");
        Self {
            id: Some(Value::String(id.into())),
            type_: Some(Value::String(type_.into())),
            extra,
        }
    }

    /// Read `id` and `type` from `json`, keeping their values as given; every
    /// other key becomes an extension field.
    #[must_use]
    pub fn from_json(json: Map<String, Value>) -> Self {
        let mut pk = Self::default();
        for (key, value) in json {
            match key.as_str() {
                "id" => pk.id = present(value),
                "type" => pk.type_ = present(value),
                _ => {
                    pk.extra.insert(key, value);
                }
            }
        }
        pk
    }

    /// Flat JSON form: `id` and `type` (null when absent), then extensions.
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("id".to_string(), self.id.clone().unwrap_or(Value::Null));
        json.insert("type".to_string(), self.type_.clone().unwrap_or(Value::Null));
        for (key, value) in &self.extra {
            json.insert(key.clone(), value.clone());
        }
        json
    }

    /// DID URL identifying the key, usually `<did>#<fragment>`. `None` unless
    /// the `id` is a string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    /// Key type, e.g. `Ed25519VerificationKey2018`.
    #[must_use]
    pub fn type_(&self) -> Option<&str> {
        self.type_.as_ref().and_then(Value::as_str)
    }

    /// Extension fields.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// A single extension field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl From<Map<String, Value>> for PublicKey {
    fn from(json: Map<String, Value>) -> Self {
        Self::from_json(json)
    }
}

impl From<PublicKey> for Entry<PublicKey> {
    fn from(pk: PublicKey) -> Self {
        Self::Typed(pk)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_json)
    }
}
