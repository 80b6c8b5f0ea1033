use std::future;
use std::marker::PhantomData;

use futures_util::stream;
use remotely_data::{RemoteData, RemoteStream};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::core::is_json_content_type;
use crate::data::RequestOptions;
use crate::effects::http::{HttpClient, HttpResponse};
use crate::effects::request::from_request;
use crate::error::{
    DecodeErrors, DecodedBodyError, FetchError, JsonBodyError, JsonError, UNKNOWN_ERROR,
    ValidationError,
};

/// Turns a JSON value into a typed value or a full report of what is wrong.
pub trait Decoder<T>: Send + Sync + 'static {
    fn decode(&self, value: Value) -> Result<T, DecodeErrors>;
}

impl<T, F> Decoder<T> for F
where
    F: Fn(Value) -> Result<T, DecodeErrors> + Send + Sync + 'static,
{
    fn decode(&self, value: Value) -> Result<T, DecodeErrors> {
        self(value)
    }
}

/// Decodes any `DeserializeOwned` type through serde.
///
/// serde stops at the first problem, so the report holds exactly one
/// [`ValidationError`].
pub struct SerdeDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeDecoder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerdeDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SerdeDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerdeDecoder")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned + 'static> Decoder<T> for SerdeDecoder<T> {
    fn decode(&self, value: Value) -> Result<T, DecodeErrors> {
        serde_json::from_value(value)
            .map_err(|error| DecodeErrors::from(ValidationError::new(error.to_string())))
    }
}

async fn read_json<R: HttpResponse>(response: R) -> RemoteData<JsonBodyError, Value> {
    if !is_json_content_type(response.content_type()) {
        debug!(content_type = ?response.content_type(), "response is not JSON, body left unread");
        return RemoteData::Failed(JsonBodyError::JsonError(JsonError::NotJson));
    }

    let parsed = match response.bytes().await {
        Ok(body) => serde_json::from_slice::<Value>(&body).map_err(|error| error.to_string()),
        Err(error) => Err(error.to_string()),
    };

    match parsed {
        Ok(json) => RemoteData::Succeeded(json),
        Err(message) => {
            let message = if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            };
            RemoteData::Failed(JsonBodyError::JsonError(JsonError::JsonParseError { message }))
        }
    }
}

/// Read the body of every successful response as JSON.
///
/// Upstream failures are tagged `FetchError`. A response whose content type
/// is not `application/json` fails with `JsonError(NotJson)` without its
/// body being read; a body that does not parse fails with
/// `JsonError(JsonParseError)`.
pub fn with_json_body<R>(responses: RemoteStream<FetchError, R>) -> RemoteStream<JsonBodyError, Value>
where
    R: HttpResponse,
{
    responses
        .map_left(JsonBodyError::FetchError)
        .chain_stream(|response| stream::once(read_json(response)))
}

/// Decode every parsed JSON body with `decoder`.
///
/// `FetchError` and `JsonError` failures are carried over unchanged;
/// decoder failures are tagged `DecodeError` with the decoder's full report.
pub fn with_decoded_body<T, D>(
    json: RemoteStream<JsonBodyError, Value>,
    decoder: D,
) -> RemoteStream<DecodedBodyError, T>
where
    T: Send + 'static,
    D: Decoder<T>,
{
    json.map_left(DecodedBodyError::from).chain_stream(move |value| {
        let decoded = decoder.decode(value).map_err(DecodedBodyError::DecodeError);
        stream::once(future::ready(RemoteData::from(decoded)))
    })
}

/// [`from_request`] followed by [`with_json_body`].
pub fn from_request_with_json_body<C>(
    client: C,
    url: impl Into<String>,
    options: RequestOptions,
) -> RemoteStream<JsonBodyError, Value>
where
    C: HttpClient + Clone + 'static,
{
    with_json_body(from_request(client, url, options))
}

/// [`from_request_with_json_body`] followed by [`with_decoded_body`].
pub fn from_request_decoded<C, T, D>(
    client: C,
    url: impl Into<String>,
    options: RequestOptions,
    decoder: D,
) -> RemoteStream<DecodedBodyError, T>
where
    C: HttpClient + Clone + 'static,
    T: Send + 'static,
    D: Decoder<T>,
{
    with_decoded_body(from_request_with_json_body(client, url, options), decoder)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Slideshow {
        author: String,
    }

    #[test]
    fn test_serde_decoder_success() {
        let decoded = SerdeDecoder::<Slideshow>::new().decode(json!({ "author": "Yours Truly" }));
        assert_eq!(decoded, Ok(Slideshow { author: "Yours Truly".into() }));
    }

    #[test]
    fn test_serde_decoder_reports_error() {
        let errors = SerdeDecoder::<Slideshow>::new()
            .decode(json!({ "author": 1 }))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().all(|error| !error.message.is_empty()));
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |value: Value| {
            value
                .as_u64()
                .ok_or_else(|| DecodeErrors::from(ValidationError::new("expected a number").at("$")))
        };
        assert_eq!(decoder.decode(json!(3)), Ok(3));
        let errors = decoder.decode(json!("3")).unwrap_err();
        assert_eq!(errors.0[0].path.as_deref(), Some("$"));
    }
}
