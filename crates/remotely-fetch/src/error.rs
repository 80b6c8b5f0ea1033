//! Error types for remotely-fetch.
//!
//! Each adapter layer owns one closed set of tags. Wider unions are built by
//! wrapping, never by dropping a variant.

use std::any::Any;

use serde::Serialize;
use thiserror::Error;

/// A boxed error coming out of a transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message used when a failure carries nothing readable.
pub const UNKNOWN_ERROR: &str = "Unknown error.";

/// The request never produced a response (offline, DNS, refused, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build an error out of a caught panic payload.
    ///
    /// String payloads keep their text; anything else becomes
    /// [`UNKNOWN_ERROR`].
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => UNKNOWN_ERROR.to_string(),
            },
        };
        Self { message }
    }
}

/// Reading the response body as JSON failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "tag", content = "value")]
pub enum JsonError {
    #[error("response is not JSON")]
    NotJson,

    #[error("invalid JSON body: {message}")]
    JsonParseError { message: String },
}

/// Failures of a request whose body is read as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "tag", content = "value")]
pub enum JsonBodyError {
    #[error(transparent)]
    FetchError(FetchError),

    #[error(transparent)]
    JsonError(JsonError),
}

/// One problem found while decoding a JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Where in the document the problem was found, when known.
    pub path: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// The full report of a failed decode.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("decode failed with {} error(s)", .0.len())]
pub struct DecodeErrors(pub Vec<ValidationError>);

impl DecodeErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationError> for DecodeErrors {
    fn from(error: ValidationError) -> Self {
        DecodeErrors(vec![error])
    }
}

/// Failures of a request whose JSON body is decoded into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "tag", content = "value")]
pub enum DecodedBodyError {
    #[error(transparent)]
    FetchError(FetchError),

    #[error(transparent)]
    JsonError(JsonError),

    #[error(transparent)]
    DecodeError(DecodeErrors),
}

impl From<JsonBodyError> for DecodedBodyError {
    fn from(error: JsonBodyError) -> Self {
        match error {
            JsonBodyError::FetchError(error) => DecodedBodyError::FetchError(error),
            JsonBodyError::JsonError(error) => DecodedBodyError::JsonError(error),
        }
    }
}

/// Transport-level failure of a tracked request.
///
/// Only errors of this type are reported as `Failed`; anything else a
/// transport raises is treated as a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum TransferError {
    #[error("{method} {url} failed with status {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
    },

    #[error("{method} {url} timed out")]
    Timeout { method: String, url: String },

    #[error("{method} {url} failed: {message}")]
    Network {
        method: String,
        url: String,
        message: String,
    },
}

impl TransferError {
    pub fn url(&self) -> &str {
        match self {
            TransferError::Status { url, .. }
            | TransferError::Timeout { url, .. }
            | TransferError::Network { url, .. } => url,
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransferError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
