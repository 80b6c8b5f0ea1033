use std::future;
use std::panic::AssertUnwindSafe;

use futures_util::{FutureExt, StreamExt, stream};
use remotely_data::{RemoteData, RemoteStream};
use tracing::{debug, warn};

use crate::data::RequestOptions;
use crate::effects::http::HttpClient;
use crate::error::FetchError;

/// Issue one request and capture every failure as a [`FetchError`].
///
/// Transport errors keep their message. A panic raised while the request is
/// running is caught as well; its message is kept when it is a string and
/// replaced by [`UNKNOWN_ERROR`](crate::UNKNOWN_ERROR) otherwise.
///
/// Dropping the returned future aborts the request.
pub async fn fetch<C: HttpClient>(
    client: &C,
    url: &str,
    options: &RequestOptions,
) -> Result<C::Response, FetchError> {
    debug!(url, method = %options.method, "issuing request");

    match AssertUnwindSafe(client.fetch(url, options)).catch_unwind().await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(error)) => {
            warn!(url, %error, "request failed");
            Err(FetchError::new(error.to_string()))
        }
        Err(payload) => {
            let error = FetchError::from_panic(payload);
            warn!(url, error = %error.message, "request panicked");
            Err(error)
        }
    }
}

/// Lift a fetch-like request into a remote stream.
///
/// Each subscription emits `InProgress(None)` right away, then a single
/// `Succeeded(response)` or `Failed(FetchError)`. Every subscription issues
/// its own request; dropping the subscription aborts it if it is still
/// pending.
pub fn from_request<C>(
    client: C,
    url: impl Into<String>,
    options: RequestOptions,
) -> RemoteStream<FetchError, C::Response>
where
    C: HttpClient + Clone + 'static,
{
    let url = url.into();
    RemoteStream::new(move || {
        let client = client.clone();
        let url = url.clone();
        let options = options.clone();
        stream::once(future::ready(RemoteData::InProgress(None))).chain(stream::once(async move {
            RemoteData::from(fetch(&client, &url, &options).await)
        }))
    })
}
