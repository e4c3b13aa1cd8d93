//! Helper functions for hashing and encoding digests.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use base64ct::{Base64, Base64UrlUnpadded, Encoding as _};
use sha2::{Digest, Sha256};

use crate::error::Err;
use crate::{tracerr, Result};

/// Hashes the provided data using SHA-256.
///
/// Suitable as the hash function passed to
/// [`DidDocument::digest`](crate::DidDocument::digest).
#[must_use]
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Text encodings for a digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Lowercase hexadecimal.
    #[default]
    Hex,

    /// Standard base64 with padding.
    Base64,

    /// URL-safe base64 without padding.
    Base64Url,
}

impl Encoding {
    /// Encode `bytes` as text.
    #[must_use]
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => Base64::encode_string(bytes),
            Self::Base64Url => Base64UrlUnpadded::encode_string(bytes),
        }
    }
}

impl FromStr for Encoding {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            "base64url" => Ok(Self::Base64Url),
            _ => tracerr!(Err::InvalidArgument, "unsupported digest encoding: {s}"),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Base64 => write!(f, "base64"),
            Self::Base64Url => write!(f, "base64url"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_ok() {
        let hash = sha256(b"Hello, world!");
        assert_eq!(
            hex::encode(&hash),
            "315f5bdb76d078c43b8ac0064e4a0164612b1fce77c869345bfc94c75894edd3"
        );
    }

    #[test]
    fn encodings() {
        let bytes = [0xfb_u8, 0xff, 0x00];
        assert_eq!(Encoding::Hex.encode(&bytes), "fbff00");
        assert_eq!(Encoding::Base64.encode(&bytes), "+/8A");
        assert_eq!(Encoding::Base64Url.encode(&bytes), "-_8A");
        assert_eq!(Encoding::Base64.encode(&[1]), "AQ==");
        assert_eq!(Encoding::Base64Url.encode(&[1]), "AQ");
    }

    #[test]
    fn parse_encoding() {
        for e in [Encoding::Hex, Encoding::Base64, Encoding::Base64Url] {
            assert_eq!(Encoding::from_str(&e.to_string()).expect("should parse"), e);
        }
        let err = Encoding::from_str("utf16").expect_err("should fail");
        assert!(err.is(Err::InvalidArgument));
    }
}
