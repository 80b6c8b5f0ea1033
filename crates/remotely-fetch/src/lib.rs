//! Request adapters that drive [`RemoteStream`]s.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - `data` - Request configuration and transfer events
//! - `core` - Pure transformations (content types, event folding)
//! - `effects` - Transports behind traits and the adapters built on them
//!
//! # Adapters
//!
//! - [`from_request`] issues one request per subscription and reports every
//!   failure as a [`FetchError`].
//! - [`with_json_body`] and [`with_decoded_body`] read the response body,
//!   widening the error to [`JsonBodyError`] and [`DecodedBodyError`].
//! - [`from_tracked_request`] forwards upload and download progress from a
//!   [`TrackedTransport`] and ends with the fully downloaded response.
//!
//! Subscriptions are cold: each one performs its own request, and dropping
//! it aborts that request.

mod core;
mod data;
mod effects;
mod error;

pub use remotely_data::{BoxStream, Progress, RemoteData, RemoteStream};

pub use crate::core::{JSON_MEDIA_TYPE, fold_event, is_json_content_type, media_type};
pub use data::{
    Direction, Method, RequestOptions, TrackedRequestConfig, TrackedResponse, TransferEvent,
    TransferStage,
};
pub use effects::{
    Decoder, HttpClient, HttpResponse, SerdeDecoder, TrackedTransport, fetch, from_request,
    from_request_decoded, from_request_with_json_body, from_tracked_request, with_decoded_body,
    with_json_body,
};

#[cfg(feature = "reqwest")]
pub use effects::{ReqwestClient, ReqwestResponse, ReqwestTransport};

pub use error::{
    BoxError, DecodeErrors, DecodedBodyError, FetchError, JsonBodyError, JsonError, TransferError,
    UNKNOWN_ERROR, ValidationError,
};
