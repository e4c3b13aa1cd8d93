//! # Errors
//!
//! Error types returned when building or mutating a DID document. Every
//! failure carries an [`Err`] code plus a human-readable context message.

use std::fmt::Display;

use thiserror::Error;

/// Record an error and return early with it.
///
/// # Example
/// ```
/// use did_document::error::Err;
/// use did_document::{tracerr, Result};
///
/// fn with_msg() -> Result<()> {
///     tracerr!(Err::InvalidArgument, "expecting {}", "object")
/// }
///
/// fn no_msg() -> Result<()> {
///     tracerr!(Err::InvalidArgument)
/// }
///
/// assert!(with_msg().is_err());
/// assert!(no_msg().is_err());
/// ```
#[macro_export]
macro_rules! tracerr {
    // with context
    ($code:expr, $($msg:tt)*) => {
        {
        use $crate::error::Context as _;
        $crate::tracing::debug!($($msg)*);
        return Err($code).context(format!($($msg)*));
        }
    };
    // no context
    ($code:expr) => {
        {
        $crate::tracing::debug!("{}", $code);
        return Err($code.into());
        }
    }
}

/// Public error type for DID documents.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct Error(#[from] anyhow::Error);

impl Error {
    /// Render the error as `{"error": <code>, "error_description": <message>}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.0.root_cause().to_string(),
            "error_description": self.to_string(),
        })
    }

    /// Returns true if this error carries the code `err`.
    #[must_use]
    pub fn is(&self, err: Err) -> bool {
        self.0.downcast_ref::<Err>().is_some_and(|e| e == &err)
    }
}

/// Typed error codes.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum Err {
    /// The document's identifier, or an entry's key field, is not a
    /// syntactically valid DID (or DID URL).
    #[error("invalid_identifier")]
    InvalidIdentifier,

    /// A mutation received something other than a JSON object.
    #[error("invalid_argument")]
    InvalidArgument,

    /// An error occurred trying to deserialize data.
    #[error("deserialization_error")]
    DeserializationError,

    /// An error occurred trying to serialize data.
    #[error("serialization_error")]
    SerializationError,
}

/// Context is used to decorate errors with useful context information.
pub trait Context<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Adds context to the error.
    ///
    /// # Errors
    ///
    /// * Original error with context appended.
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> Context<T, E> for core::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static,
    {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(Error(anyhow::Error::from(e).context(context))),
        }
    }
}

impl From<Err> for Error {
    fn from(error: Err) -> Self {
        Self(error.into())
    }
}
