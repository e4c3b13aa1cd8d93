//! Options accepted when constructing a DID document.
//!
//! Options deserialize from the serialized document shape (so a document can
//! be rebuilt from its own JSON) and from the looser form that names the
//! subject `did` instead of `id`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::{timestamp, Authentication, Context, PublicKey, Service};

/// Input for [`DidDocument::new`](crate::DidDocument::new).
///
/// Chain the builder methods or fill the public fields directly.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOptions {
    /// JSON-LD context. Used when no explicit context is passed to the
    /// document constructor.
    #[serde(rename = "@context", deserialize_with = "lenient")]
    pub context: Option<Context>,

    /// The document subject. Takes precedence over `id`.
    #[serde(deserialize_with = "lenient")]
    pub did: Option<String>,

    /// The document subject, when `did` is not given.
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,

    /// Public keys, taken as given.
    #[serde(deserialize_with = "null_default")]
    pub public_key: Vec<PublicKey>,

    /// Authentication entries, taken as given.
    #[serde(deserialize_with = "null_default")]
    pub authentication: Vec<Authentication>,

    /// Service entries, taken as given.
    #[serde(deserialize_with = "null_default")]
    pub service: Vec<Service>,

    /// Creation time. Missing or unusable values default to now.
    pub created: Option<Value>,

    /// Last update time. Missing or unusable values default to now.
    pub updated: Option<Value>,

    /// Proof metadata.
    #[serde(deserialize_with = "null_default")]
    pub proof: Map<String, Value>,

    /// Revocation: `true` for now, a timestamp, or falsy for not revoked.
    pub revoked: Option<Value>,
}

impl CreateOptions {
    /// Options for a document about `did`.
    #[must_use]
    pub fn new(did: impl Into<String>) -> Self {
        Self {
            did: Some(did.into()),
            ..Self::default()
        }
    }

    /// Set the JSON-LD context.
    #[must_use]
    pub fn context(mut self, context: impl Into<Context>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the creation time.
    #[must_use]
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created = Some(Value::String(timestamp::to_iso(&at)));
        self
    }

    /// Set the last update time.
    #[must_use]
    pub fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated = Some(Value::String(timestamp::to_iso(&at)));
        self
    }

    /// Mark the document revoked at `at`.
    #[must_use]
    pub fn revoked(mut self, at: DateTime<Utc>) -> Self {
        self.revoked = Some(Value::String(timestamp::to_iso(&at)));
        self
    }

    /// Add a public key.
    ///
    /// Chain to add multiple keys.
    #[must_use]
    pub fn public_key(mut self, pk: PublicKey) -> Self {
        self.public_key.push(pk);
        self
    }

    /// Add an authentication entry.
    ///
    /// Chain to add multiple entries.
    #[must_use]
    pub fn authentication(mut self, auth: Authentication) -> Self {
        self.authentication.push(auth);
        self
    }

    /// Add a service.
    ///
    /// Chain to add multiple services.
    #[must_use]
    pub fn service(mut self, service: Service) -> Self {
        self.service.push(service);
        self
    }

    /// Set the proof block.
    #[must_use]
    pub fn proof(mut self, proof: Map<String, Value>) -> Self {
        self.proof = proof;
        self
    }

    /// The subject to parse: `did` unless it is empty, else `id`.
    pub(super) fn subject(&self) -> Option<&str> {
        self.did.as_deref().filter(|did| !did.is_empty()).or(self.id.as_deref())
    }
}

// Values of the wrong shape are treated as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

// `null` is treated as empty.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::OneMany;

    #[test]
    fn did_alias() {
        let opts: CreateOptions =
            serde_json::from_value(json!({"did": "did:example:a", "id": "did:example:b"}))
                .expect("should deserialize");
        assert_eq!(opts.subject(), Some("did:example:a"));

        let opts: CreateOptions =
            serde_json::from_value(json!({"did": "", "id": "did:example:b"}))
                .expect("should deserialize");
        assert_eq!(opts.subject(), Some("did:example:b"));
    }

    #[test]
    fn loose_input() {
        let opts: CreateOptions = serde_json::from_value(json!({
            "@context": 42,
            "id": 123,
            "publicKey": null,
            "proof": null,
            "unknown": "ignored"
        }))
        .expect("should deserialize");

        assert_eq!(opts, CreateOptions::default());
    }

    #[test]
    fn context_forms() {
        let opts: CreateOptions = serde_json::from_value(json!({
            "@context": ["https://w3id.org/did/v1", "https://example.com/v1"]
        }))
        .expect("should deserialize");
        assert_eq!(
            opts.context,
            Some(OneMany::Many(vec![
                "https://w3id.org/did/v1".to_string(),
                "https://example.com/v1".to_string()
            ]))
        );
    }

    #[test]
    fn builder() {
        let at = DateTime::from_timestamp_millis(1_577_836_800_000).expect("valid time");
        let opts = CreateOptions::new("did:example:123")
            .created(at)
            .updated(at)
            .public_key(PublicKey::new("did:example:123#key-1", "Ed25519", Map::new()));

        assert_eq!(opts.created, Some(json!("2020-01-01T00:00:00.000Z")));
        assert_eq!(opts.public_key.len(), 1);
        assert_eq!(opts.subject(), Some("did:example:123"));
    }
}
