//! Authentication is the mechanism by which an entity can cryptographically
//! prove that it is associated with a DID and DID document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::present;
use crate::core::Entry;

/// An authentication entry: `{ type, publicKey, ..extension }`, where
/// `publicKey` references a public key by DID URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Authentication {
    type_: Option<Value>,
    public_key: Option<Value>,
    extra: Map<String, Value>,
}

impl Authentication {
    /// Create an authentication entry.
    #[must_use]
    pub fn new(
        type_: impl Into<String>, public_key: impl Into<String>, mut extra: Map<String, Value>,
    ) -> Self {
        extra.retain(|k, _| k != "type" && k != "publicKey");
        Self {
            type_: Some(Value::String(type_.into())),
            public_key: Some(Value::String(public_key.into())),
            extra,
        }
    }

    /// Read `type` and `publicKey` from `json`, keeping their values as given;
    /// other keys are extensions.
    #[must_use]
    pub fn from_json(json: Map<String, Value>) -> Self {
        let mut auth = Self::default();
        for (key, value) in json {
            match key.as_str() {
                "type" => auth.type_ = present(value),
                "publicKey" => auth.public_key = present(value),
                _ => {
                    auth.extra.insert(key, value);
                }
            }
        }
        auth
    }

    /// Flat JSON form with `type` and `publicKey` always present.
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("type".to_string(), self.type_.clone().unwrap_or(Value::Null));
        json.insert("publicKey".to_string(), self.public_key.clone().unwrap_or(Value::Null));
        json.extend(self.extra.clone());
        json
    }

    /// Authentication type, e.g. `Ed25519SignatureAuthentication2018`.
    #[must_use]
    pub fn type_(&self) -> Option<&str> {
        self.type_.as_ref().and_then(Value::as_str)
    }

    /// The referenced public key, when given as a DID URL.
    #[must_use]
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_ref().and_then(Value::as_str)
    }

    /// The public key in whatever shape it was given: a DID URL reference or
    /// an embedded key.
    #[must_use]
    pub const fn public_key_value(&self) -> Option<&Value> {
        self.public_key.as_ref()
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

impl From<Map<String, Value>> for Authentication {
    fn from(json: Map<String, Value>) -> Self {
        Self::from_json(json)
    }
}

impl From<Authentication> for Entry<Authentication> {
    fn from(auth: Authentication) -> Self {
        Self::Typed(auth)
    }
}

impl Serialize for Authentication {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Authentication {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_authentication() {
        let auth =
            Authentication::new("RsaSignatureAuthentication2018", "did:ara:1234#key-1", Map::new());
        assert_eq!(auth.public_key(), Some("did:ara:1234#key-1"));
        assert_eq!(auth.type_(), Some("RsaSignatureAuthentication2018"));
    }

    #[test]
    fn from_json() {
        let auth: Authentication = serde_json::from_value(json!({
            "type": "RsaSignatureAuthentication2018",
            "publicKey": "did:ara:1234#key-1",
            "purpose": "login"
        }))
        .expect("should deserialize");

        assert_eq!(auth.public_key(), Some("did:ara:1234#key-1"));
        assert_eq!(auth.type_(), Some("RsaSignatureAuthentication2018"));
        assert_eq!(auth.get("purpose"), Some(&json!("login")));
    }

    #[test]
    fn to_json_order() {
        let auth = Authentication::from_json(
            json!({"purpose": "login", "publicKey": "did:ara:1#k"})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );
        let keys: Vec<String> = auth.to_json().keys().cloned().collect();
        assert_eq!(keys, vec!["type", "publicKey", "purpose"]);
        assert_eq!(auth.to_json()["type"], Value::Null);
    }

    #[test]
    fn embedded_key() {
        let embedded = json!({
            "id": "did:example:123#key-1",
            "type": "Ed25519VerificationKey2018",
            "controller": "did:example:123"
        });
        let auth: Authentication = serde_json::from_value(json!({
            "type": "Ed25519SignatureAuthentication2018",
            "publicKey": embedded
        }))
        .expect("should deserialize");

        assert_eq!(auth.public_key(), None);
        assert_eq!(auth.public_key_value(), Some(&embedded));
        assert_eq!(auth.to_json()["publicKey"], embedded);
    }
}
