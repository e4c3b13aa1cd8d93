//! Services express ways of communicating with the DID subject or associated
//! entities, for further discovery, authentication, authorization, or
//! interaction.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::present;
use crate::core::Entry;

/// A service entry: `{ id, type, serviceEndpoint, ..extension }`.
///
/// The `id` may carry a `;`-delimited suffix after the DID
/// (`did:example:123;openid`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Service {
    id: Option<Value>,
    type_: Option<Value>,
    service_endpoint: Option<Value>,
    extra: Map<String, Value>,
}

impl Service {
    /// Create a service entry with a URL endpoint.
    #[must_use]
    pub fn new(
        id: impl Into<String>, type_: impl Into<String>, service_endpoint: impl Into<String>,
        mut extra: Map<String, Value>,
    ) -> Self {
        extra.retain(|k, _| !matches!(k.as_str(), "id" | "type" | "serviceEndpoint"));
        Self {
            id: Some(Value::String(id.into())),
            type_: Some(Value::String(type_.into())),
            service_endpoint: Some(Value::String(service_endpoint.into())),
            extra,
        }
    }

    /// Read `id`, `type` and `serviceEndpoint` from `json`; other keys are
    /// extensions. Values are kept as given (the endpoint may be a URL string,
    /// or a map or set of endpoints).
    #[must_use]
    pub fn from_json(json: Map<String, Value>) -> Self {
        let mut service = Self::default();
        for (key, value) in json {
            match key.as_str() {
                "id" => service.id = present(value),
                "type" => service.type_ = present(value),
                "serviceEndpoint" => service.service_endpoint = present(value),
                _ => {
                    service.extra.insert(key, value);
                }
            }
        }
        service
    }

    /// Flat JSON form with `id`, `type` and `serviceEndpoint` always present.
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("id".to_string(), self.id.clone().unwrap_or(Value::Null));
        json.insert("type".to_string(), self.type_.clone().unwrap_or(Value::Null));
        json.insert(
            "serviceEndpoint".to_string(),
            self.service_endpoint.clone().unwrap_or(Value::Null),
        );
        json.extend(self.extra.clone());
        json
    }

    /// Service identifier. `None` unless the `id` is a string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    /// The DID portion of the identifier: everything before the first `;`.
    #[must_use]
    pub fn did(&self) -> Option<&str> {
        self.id().and_then(|id| id.split(';').next())
    }

    /// Service type, e.g. `AgentService`.
    #[must_use]
    pub fn type_(&self) -> Option<&str> {
        self.type_.as_ref().and_then(Value::as_str)
    }

    /// The endpoint when it is a single URL.
    #[must_use]
    pub fn service_endpoint(&self) -> Option<&str> {
        self.service_endpoint.as_ref().and_then(Value::as_str)
    }

    /// The endpoint in whatever shape it was given.
    #[must_use]
    pub const fn service_endpoint_value(&self) -> Option<&Value> {
        self.service_endpoint.as_ref()
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

impl From<Map<String, Value>> for Service {
    fn from(json: Map<String, Value>) -> Self {
        Self::from_json(json)
    }
}

impl From<Service> for Entry<Service> {
    fn from(service: Service) -> Self {
        Self::Typed(service)
    }
}

impl Serialize for Service {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Service {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_json)
    }
}
