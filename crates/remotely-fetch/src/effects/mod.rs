//! I/O operations and the adapters that turn them into remote streams.
//!
//! Transports sit behind the [`HttpClient`] and [`TrackedTransport`] traits;
//! the adapters only ever talk to those traits.

mod body;
mod http;
mod request;
mod tracked;
mod transport;

pub use body::{
    Decoder, SerdeDecoder, from_request_decoded, from_request_with_json_body, with_decoded_body,
    with_json_body,
};
pub use http::{HttpClient, HttpResponse};
pub use request::{fetch, from_request};
pub use tracked::from_tracked_request;
pub use transport::TrackedTransport;

#[cfg(feature = "reqwest")]
pub use http::{ReqwestClient, ReqwestResponse};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
