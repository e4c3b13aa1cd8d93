//! # DID Document
//!
//! A library for building, mutating, serializing and fingerprinting W3C
//! [Decentralized Identifier](https://www.w3.org/TR/did-core/) documents.
//!
//! A [`DidDocument`] is created from [`CreateOptions`] (or parsed from JSON),
//! grows through validated `add_*` operations, and can be serialized or
//! digested. The digest is computed over a key-normalized subset of the
//! document and is independent of its context and proof.
//!
//! ```
//! use did_document::{sha256, CreateOptions, DidDocument, Encoding};
//! use serde_json::json;
//!
//! let mut doc = DidDocument::new(CreateOptions::new("did:example:123"), None)?;
//! doc.add_public_key(json!({"id": "did:example:123#key-1", "type": "Ed25519"}))?
//!     .add_authentication(json!({
//!         "type": "Ed25519SignatureAuthentication",
//!         "publicKey": "did:example:123#key-1"
//!     }))?;
//!
//! let digest = doc.digest_encoded(sha256, Encoding::Hex)?;
//! assert_eq!(digest.len(), 64);
//! # Ok::<(), did_document::error::Error>(())
//! ```

pub mod core;
mod document;
pub mod error;
pub mod hashing;
pub mod normalize;
mod url;

#[doc(hidden)]
pub use tracing;

pub use self::core::{Entry, OneMany};
pub use self::document::{
    Authentication, Context, CreateOptions, DidDocument, PublicKey, Service, DID_CONTEXT,
};
pub use self::error::Error;
pub use self::hashing::{sha256, Encoding};
pub use self::normalize::{compare, normalize};
pub use self::url::{DidParser, DidSyntax, DidUrl};

/// Result type for DID document operations.
pub type Result<T, E = error::Error> = std::result::Result<T, E>;
