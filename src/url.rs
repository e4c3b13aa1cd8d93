//! Destructure DID URLs into strongly typed components.
//!
//! A DID URL is of the form
//!
//! `did:<method>:<method-specific-id>[/<path>][?<query>][#<fragment>]`.
//!
//! Parsing is the only place identifiers are checked. The document accepts any
//! [`DidParser`] so callers can plug in a stricter (or method-aware) parser.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Err;
use crate::{tracerr, Result};

// did = "did:" method-name ":" method-specific-id
// idchar = ALPHA / DIGIT / "." / "-" / "_" / pct-encoded
static DID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^did:(?<method>[a-z0-9]+):(?<id>(?:(?:[A-Za-z0-9._\-]|%[0-9A-Fa-f]{2})*:)*(?:[A-Za-z0-9._\-]|%[0-9A-Fa-f]{2})+)$",
    )
    .expect("should compile")
});

// RFC 3986 pchar plus "/" for paths.
static PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9\-._~!$&'()*+,;=:@/]|%[0-9A-Fa-f]{2})*$").expect("should compile")
});

// Query and fragment also allow "?".
static QUERY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9\-._~!$&'()*+,;=:@/?]|%[0-9A-Fa-f]{2})*$").expect("should compile")
});

/// Structure of a DID URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DidUrl {
    /// DID method name, e.g. `example` in `did:example:123`.
    pub method: String,

    /// Method-specific ID.
    ///
    /// This may include any information that is needed by a DID method to
    /// address a specific DID document.
    pub id: String,

    /// Path, without the leading `/`.
    ///
    /// If present, a DID path is identical to a generic URI path. It is up to
    /// the method to define how to interpret the path.
    pub path: Option<String>,

    /// Query, without the leading `?`.
    pub query: Option<String>,

    /// Fragment, without the leading `#`.
    ///
    /// Typically identifies a service or public key within a DID document.
    pub fragment: Option<String>,
}

impl Display for DidUrl {
    /// Format the URL as a DID URL string.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}", self.method, self.id)?;
        if let Some(path) = &self.path {
            write!(f, "/{path}")?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for DidUrl {
    type Err = crate::Error;

    /// Parse a string if possible into a strongly typed DID URL struct.
    ///
    /// # Errors
    ///
    /// [`Err::InvalidIdentifier`] if the string is not a DID or DID URL.
    fn from_str(s: &str) -> Result<Self> {
        let (rest, fragment) = match s.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (s, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        let (did, path) = match rest.split_once('/') {
            Some((did, path)) => (did, Some(path)),
            None => (rest, None),
        };

        let Some(caps) = DID_REGEX.captures(did) else {
            tracerr!(Err::InvalidIdentifier, "invalid DID: {s:?}");
        };
        if path.is_some_and(|p| !PATH_REGEX.is_match(p)) {
            tracerr!(Err::InvalidIdentifier, "invalid DID URL path: {s:?}");
        }
        if query.is_some_and(|q| !QUERY_REGEX.is_match(q)) {
            tracerr!(Err::InvalidIdentifier, "invalid DID URL query: {s:?}");
        }
        if fragment.is_some_and(|f| !QUERY_REGEX.is_match(f)) {
            tracerr!(Err::InvalidIdentifier, "invalid DID URL fragment: {s:?}");
        }

        Ok(Self {
            method: caps["method"].to_string(),
            id: caps["id"].to_string(),
            path: path.map(ToString::to_string),
            query: query.map(ToString::to_string),
            fragment: fragment.map(ToString::to_string),
        })
    }
}

impl Serialize for DidUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DidUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Parses identifiers on behalf of a DID document.
///
/// Implemented for [`DidSyntax`] and for any `Fn(&str) -> Result<DidUrl>`, so
/// a closure can stand in for a custom parser.
pub trait DidParser {
    /// Parse `s` as a DID or DID URL.
    ///
    /// # Errors
    ///
    /// Implementations should return [`Err::InvalidIdentifier`] for text that
    /// is not an acceptable identifier.
    fn parse(&self, s: &str) -> Result<DidUrl>;
}

impl<F> DidParser for F
where
    F: Fn(&str) -> Result<DidUrl>,
{
    fn parse(&self, s: &str) -> Result<DidUrl> {
        self(s)
    }
}

/// Generic W3C DID syntax. Accepts any method name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DidSyntax;

impl DidParser for DidSyntax {
    fn parse(&self, s: &str) -> Result<DidUrl> {
        DidUrl::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_did() {
        let url = DidUrl::from_str("did:example:123456789abcdefghi").expect("should parse");
        assert_eq!(url.method, "example");
        assert_eq!(url.id, "123456789abcdefghi");
        assert_eq!(url.path, None);
        assert_eq!(url.to_string(), "did:example:123456789abcdefghi");
    }

    #[test]
    fn url_with_fragment() {
        let url = DidUrl::from_str("did:key:123456789abcdefghi#key-1").expect("should parse");
        assert_eq!(url.method, "key");
        assert_eq!(url.id, "123456789abcdefghi");
        assert_eq!(url.path, None);
        assert_eq!(url.query, None);
        assert_eq!(url.fragment, Some("key-1".to_string()));
        assert_eq!(url.to_string(), "did:key:123456789abcdefghi#key-1");
    }

    #[test]
    fn url_with_path() {
        let url = DidUrl::from_str("did:key:123456789abcdefghi/path/to/resource#key-1")
            .expect("should parse");
        assert_eq!(url.path, Some("path/to/resource".to_string()));
        assert_eq!(url.fragment, Some("key-1".to_string()));
        assert_eq!(url.to_string(), "did:key:123456789abcdefghi/path/to/resource#key-1");
    }

    #[test]
    fn url_with_the_works() {
        let url = DidUrl::from_str(
            "did:web:example.com:user:alice/path?service=example&hl=hashlink#key-1",
        )
        .expect("should parse");
        assert_eq!(url.method, "web");
        assert_eq!(url.id, "example.com:user:alice");
        assert_eq!(url.path, Some("path".to_string()));
        assert_eq!(url.query, Some("service=example&hl=hashlink".to_string()));
        assert_eq!(
            url.to_string(),
            "did:web:example.com:user:alice/path?service=example&hl=hashlink#key-1"
        );
    }

    #[test]
    fn percent_encoded_id() {
        let url = DidUrl::from_str("did:web:localhost%3A8080").expect("should parse");
        assert_eq!(url.id, "localhost%3A8080");
    }

    #[test]
    fn rejects_invalid() {
        for s in [
            "",
            "not-a-did",
            "did:",
            "did:example",
            "did:example:",
            "did:Example:123",
            "did:example:12 3",
            "did:example:123:",
            "did:example:%zz",
            "DID:example:123",
            "did:example:123#frag ment",
        ] {
            let err = DidUrl::from_str(s).expect_err(s);
            assert!(err.is(Err::InvalidIdentifier), "{s}");
        }
    }

    #[test]
    fn closure_parser() {
        let only_example = |s: &str| -> Result<DidUrl> {
            let url = DidUrl::from_str(s)?;
            if url.method != "example" {
                tracerr!(Err::InvalidIdentifier, "unsupported method: {}", url.method);
            }
            Ok(url)
        };
        assert!(only_example.parse("did:example:1").is_ok());
        assert!(only_example.parse("did:key:1").is_err());
        assert!(DidSyntax.parse("did:key:1").is_ok());
    }

    #[test]
    fn serde_as_string() {
        let url = DidUrl::from_str("did:example:123#key-1").expect("should parse");
        let json = serde_json::to_value(&url).expect("should serialize");
        assert_eq!(json, serde_json::json!("did:example:123#key-1"));
        let back: DidUrl = serde_json::from_value(json).expect("should deserialize");
        assert_eq!(back, url);
        assert!(serde_json::from_value::<DidUrl>(serde_json::json!("nope")).is_err());
    }
}
