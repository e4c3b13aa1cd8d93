//! # DID Document
//!
//! A DID Document is a JSON-LD document binding a DID to public keys,
//! authentication mechanisms and service endpoints.
//!
//! Documents built from options (or deserialized) trust their collections as
//! given. Entries attached afterwards through the `add_*` operations are
//! validated one at a time: re-adding an entry with a known key is a silent
//! no-op, while a malformed identifier is an error that leaves the document
//! untouched.

mod authentication;
mod options;
mod public_key;
mod service;
mod timestamp;

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub use self::authentication::Authentication;
pub use self::options::CreateOptions;
pub use self::public_key::PublicKey;
pub use self::service::Service;
use crate::core::{Entry, OneMany};
use crate::error::Err;
use crate::hashing::Encoding;
use crate::normalize::normalize;
use crate::url::{DidParser, DidSyntax, DidUrl};
use crate::{tracerr, Result};

/// The default JSON-LD context for a DID document.
pub const DID_CONTEXT: &str = "https://w3id.org/did/v1";

// Fields covered by the digest. `@context` and `proof` are excluded.
const DIGEST_FIELDS: [&str; 7] =
    ["id", "publicKey", "authentication", "service", "created", "updated", "revoked"];

/// JSON-LD context: a single URI or an ordered list of URIs.
pub type Context = OneMany<String>;

/// DID Document.
///
/// The parser `P` validates the document's own identifier at construction and
/// the key field of every entry added afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct DidDocument<P = DidSyntax> {
    context: Context,
    id: DidUrl,
    public_key: Vec<PublicKey>,
    authentication: Vec<Authentication>,
    service: Vec<Service>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    revoked: Option<DateTime<Utc>>,
    proof: Map<String, Value>,
    parser: P,
}

impl DidDocument {
    /// Create a document from `options`, using the generic DID syntax parser.
    ///
    /// `context` overrides any context carried in `options`; with neither,
    /// [`DID_CONTEXT`] is used.
    ///
    /// # Errors
    ///
    /// [`Err::InvalidIdentifier`] if the options carry no subject (`did` or
    /// `id`) or it is not a valid DID.
    pub fn new(options: CreateOptions, context: Option<Context>) -> Result<Self> {
        Self::with_parser(options, context, DidSyntax)
    }

    /// Create a document from a JSON value holding options or a serialized
    /// document. A value that is not an object is treated as empty options.
    ///
    /// # Errors
    ///
    /// [`Err::DeserializationError`] if the collections are malformed, and as
    /// for [`DidDocument::new`].
    pub fn from_value(value: &Value, context: Option<Context>) -> Result<Self> {
        Self::from_value_with(value, context, DidSyntax)
    }

    /// Parse a serialized document.
    ///
    /// # Errors
    ///
    /// [`Err::DeserializationError`] if `json` is not valid JSON, and as for
    /// [`DidDocument::from_value`].
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => tracerr!(Err::DeserializationError, "invalid DID document JSON: {e}"),
        };
        Self::from_value(&value, None)
    }
}

impl<P: DidParser> DidDocument<P> {
    /// Create a document from `options`, validating identifiers with `parser`.
    ///
    /// # Errors
    ///
    /// [`Err::InvalidIdentifier`] if the subject is missing or rejected by
    /// `parser`.
    pub fn with_parser(
        options: CreateOptions, context: Option<Context>, parser: P,
    ) -> Result<Self> {
        let Some(subject) = options.subject() else {
            tracerr!(Err::InvalidIdentifier, "DID document requires a `did` or `id`");
        };
        let id = match parser.parse(subject) {
            Ok(id) => id,
            Err(e) => tracerr!(Err::InvalidIdentifier, "invalid DID document id {subject:?}: {e}"),
        };

        let context = context.or(options.context).unwrap_or_else(|| DID_CONTEXT.into());
        let created = timestamp::or_now("created", options.created.as_ref());
        let updated = timestamp::or_now("updated", options.updated.as_ref());
        let revoked = timestamp::revoked(options.revoked.as_ref());

        tracing::debug!(%id, "DID document constructed");

        Ok(Self {
            context,
            id,
            public_key: options.public_key,
            authentication: options.authentication,
            service: options.service,
            created,
            updated,
            revoked,
            proof: options.proof,
            parser,
        })
    }

    /// As [`DidDocument::from_value`], validating identifiers with `parser`.
    ///
    /// # Errors
    ///
    /// As for [`DidDocument::from_value`].
    pub fn from_value_with(value: &Value, context: Option<Context>, parser: P) -> Result<Self> {
        let options = match value {
            Value::Object(_) => match CreateOptions::deserialize(value) {
                Ok(options) => options,
                Err(e) => tracerr!(Err::DeserializationError, "invalid DID document: {e}"),
            },
            _ => CreateOptions::default(),
        };
        Self::with_parser(options, context, parser)
    }

    /// Add a public key.
    ///
    /// A key whose `id` matches one already present is ignored.
    ///
    /// # Errors
    ///
    /// [`Err::InvalidArgument`] if `pk` is raw JSON but not an object, or
    /// [`Err::InvalidIdentifier`] if its `id` is not a valid DID URL. The
    /// document is unchanged on error.
    pub fn add_public_key(&mut self, pk: impl Into<Entry<PublicKey>>) -> Result<&mut Self> {
        let entry: Entry<PublicKey> = pk.into();
        let pk = entry.into_entity("add_public_key")?;

        if pk.id().is_some_and(|id| self.public_key.iter().any(|key| key.id() == Some(id))) {
            tracing::trace!(id = ?pk.id(), "public key already present");
            return Ok(self);
        }
        self.check_identifier("add_public_key", "id for publicKey", pk.id())?;

        tracing::debug!(id = ?pk.id(), "public key added");
        self.public_key.push(pk);
        Ok(self)
    }

    /// Add an authentication entry.
    ///
    /// An entry referencing a `publicKey` already referenced is ignored.
    ///
    /// # Errors
    ///
    /// [`Err::InvalidArgument`] if `auth` is raw JSON but not an object, or
    /// [`Err::InvalidIdentifier`] if its `publicKey` is not a valid DID URL.
    /// The document is unchanged on error.
    pub fn add_authentication(
        &mut self, auth: impl Into<Entry<Authentication>>,
    ) -> Result<&mut Self> {
        let entry: Entry<Authentication> = auth.into();
        let auth = entry.into_entity("add_authentication")?;

        let referenced =
            |pk: &str| self.authentication.iter().any(|a| a.public_key() == Some(pk));
        if auth.public_key().is_some_and(referenced) {
            tracing::trace!(public_key = ?auth.public_key(), "authentication already present");
            return Ok(self);
        }
        self.check_identifier(
            "add_authentication",
            "publicKey for authentication",
            auth.public_key(),
        )?;

        tracing::debug!(public_key = ?auth.public_key(), "authentication added");
        self.authentication.push(auth);
        Ok(self)
    }

    /// Add a service.
    ///
    /// A service whose `id` matches one already present is ignored. Only the
    /// part of the `id` before the first `;` has to be a valid DID URL.
    ///
    /// # Errors
    ///
    /// [`Err::InvalidArgument`] if `service` is raw JSON but not an object, or
    /// [`Err::InvalidIdentifier`] if its `id` does not start with a valid DID
    /// URL. The document is unchanged on error.
    pub fn add_service(&mut self, service: impl Into<Entry<Service>>) -> Result<&mut Self> {
        let entry: Entry<Service> = service.into();
        let service = entry.into_entity("add_service")?;

        if service.id().is_some_and(|id| self.service.iter().any(|s| s.id() == Some(id))) {
            tracing::trace!(id = ?service.id(), "service already present");
            return Ok(self);
        }
        self.check_identifier("add_service", "id for service", service.did())?;

        tracing::debug!(id = ?service.id(), "service added");
        self.service.push(service);
        Ok(self)
    }

    fn check_identifier(&self, op: &str, field: &str, candidate: Option<&str>) -> Result<()> {
        let Some(candidate) = candidate else {
            tracerr!(
                Err::InvalidIdentifier,
                "{op}: expecting {field} to be a valid DID, got none or a non-string"
            );
        };
        if let Err(e) = self.parser.parse(candidate) {
            tracerr!(
                Err::InvalidIdentifier,
                "{op}: expecting {field} to be a valid DID, got {candidate:?}: {e}"
            );
        }
        Ok(())
    }
}

impl<P> DidDocument<P> {
    /// Merge `patch` into the proof block (last write wins per key) and return
    /// the merged block.
    pub fn merge_proof(&mut self, patch: Map<String, Value>) -> &Map<String, Value> {
        self.proof.extend(patch);
        &self.proof
    }

    /// Set `updated` to now.
    pub fn update(&mut self) -> &mut Self {
        self.updated = timestamp::now();
        tracing::debug!(id = %self.id, "DID document updated");
        self
    }

    /// Mark the document revoked as of now.
    pub fn revoke(&mut self) -> &mut Self {
        self.revoke_at(timestamp::now())
    }

    /// Mark the document revoked as of `at`.
    pub fn revoke_at(&mut self, at: DateTime<Utc>) -> &mut Self {
        self.revoked = Some(at);
        tracing::debug!(id = %self.id, revoked = %timestamp::to_iso(&at), "DID document revoked");
        self
    }

    /// Compute the document digest with `hash`.
    ///
    /// The digest covers `id`, `publicKey`, `authentication`, `service`,
    /// `created`, `updated` and `revoked`; never `@context` or `proof`.
    ///
    /// # Errors
    ///
    /// [`Err::SerializationError`] if the digest input cannot be serialized.
    pub fn digest<H, D>(&self, hash: H) -> Result<Vec<u8>>
    where
        H: FnOnce(&[u8]) -> D,
        D: AsRef<[u8]>,
    {
        let input = self.digest_input()?;
        Ok(hash(input.as_bytes()).as_ref().to_vec())
    }

    /// Compute the document digest with `hash` and encode it as text.
    ///
    /// # Errors
    ///
    /// As for [`DidDocument::digest`].
    pub fn digest_encoded<H, D>(&self, hash: H, encoding: Encoding) -> Result<String>
    where
        H: FnOnce(&[u8]) -> D,
        D: AsRef<[u8]>,
    {
        self.digest(hash).map(|digest| encoding.encode(&digest))
    }

    /// The canonical JSON text that [`DidDocument::digest`] hashes.
    ///
    /// # Errors
    ///
    /// [`Err::SerializationError`] if the input cannot be serialized.
    pub fn digest_input(&self) -> Result<String> {
        let json = self.to_json_map();
        let digestible: Map<String, Value> = DIGEST_FIELDS
            .iter()
            .filter_map(|field| json.get(*field).map(|v| ((*field).to_string(), v.clone())))
            .collect();

        match serde_json::to_string(&normalize(&digestible)) {
            Ok(input) => Ok(input),
            Err(e) => tracerr!(Err::SerializationError, "failed to serialize digest input: {e}"),
        }
    }

    /// The serialized document.
    ///
    /// Keys appear in the order `@context`, `id`, `publicKey`,
    /// `authentication`, `service`, `created`, `updated`, `proof`, then
    /// `revoked` when set.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.to_json_map())
    }

    fn to_json_map(&self) -> Map<String, Value> {
        let context = match &self.context {
            OneMany::One(uri) => Value::String(uri.clone()),
            OneMany::Many(uris) => uris.iter().cloned().map(Value::String).collect(),
        };

        let mut ddo = Map::new();
        ddo.insert("@context".to_string(), context);
        ddo.insert("id".to_string(), Value::String(self.id.to_string()));
        ddo.insert(
            "publicKey".to_string(),
            self.public_key.iter().map(|pk| Value::Object(pk.to_json())).collect(),
        );
        ddo.insert(
            "authentication".to_string(),
            self.authentication.iter().map(|a| Value::Object(a.to_json())).collect(),
        );
        ddo.insert(
            "service".to_string(),
            self.service.iter().map(|s| Value::Object(s.to_json())).collect(),
        );
        ddo.insert("created".to_string(), Value::String(timestamp::to_iso(&self.created)));
        ddo.insert("updated".to_string(), Value::String(timestamp::to_iso(&self.updated)));
        ddo.insert("proof".to_string(), Value::Object(self.proof.clone()));
        if let Some(revoked) = &self.revoked {
            ddo.insert("revoked".to_string(), Value::String(timestamp::to_iso(revoked)));
        }
        ddo
    }

    /// JSON-LD context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// The DID subject.
    #[must_use]
    pub const fn id(&self) -> &DidUrl {
        &self.id
    }

    /// Public keys, in insertion order.
    #[must_use]
    pub fn public_key(&self) -> &[PublicKey] {
        &self.public_key
    }

    /// Authentication entries, in insertion order.
    #[must_use]
    pub fn authentication(&self) -> &[Authentication] {
        &self.authentication
    }

    /// Services, in insertion order.
    #[must_use]
    pub fn service(&self) -> &[Service] {
        &self.service
    }

    /// Creation time.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Last update time.
    #[must_use]
    pub const fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Revocation time, if revoked.
    #[must_use]
    pub const fn revoked(&self) -> Option<DateTime<Utc>> {
        self.revoked
    }

    /// Proof metadata.
    #[must_use]
    pub const fn proof(&self) -> &Map<String, Value> {
        &self.proof
    }
}

impl<P> Serialize for DidDocument<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DidDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value, None).map_err(serde::de::Error::custom)
    }
}

impl<P> Display for DidDocument<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self.to_json_map()).map_err(|_| fmt::Error)?;
        write!(f, "{json}")
    }
}

// Entity fields keep any non-null value as given.
fn present(value: Value) -> Option<Value> {
    Some(value).filter(|v| !v.is_null())
}
