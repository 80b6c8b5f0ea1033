use futures_util::stream::BoxStream;

use crate::data::{TrackedRequestConfig, TransferEvent};
use crate::error::BoxError;

/// Ajax-like transport that reports a request as a stream of events.
///
/// The stream yields progress events and finishes with
/// [`TransferEvent::Complete`]. Network failures are reported as a boxed
/// [`TransferError`](crate::TransferError); any other error type is treated
/// as a bug by the adapters. Dropping the stream must abort the request.
pub trait TrackedTransport: Send + Sync {
    fn send(&self, config: &TrackedRequestConfig) -> BoxStream<'static, Result<TransferEvent, BoxError>>;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::io;

    use bytes::{Bytes, BytesMut};
    use futures_util::stream::{self, PollNext, Stream, StreamExt};
    use reqwest::header::CONTENT_LENGTH;
    use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

    use super::*;
    use crate::data::{Method, TrackedResponse, TransferStage};
    use crate::error::TransferError;

    /// Size of the slices a request body is streamed in.
    pub(crate) const UPLOAD_CHUNK_SIZE: usize = 16 * 1024;

    /// Tracked transport implementation using reqwest.
    ///
    /// Upload progress is measured as the body is handed to the connection;
    /// download progress as chunks of the response body arrive.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl TrackedTransport for ReqwestTransport {
        fn send(&self, config: &TrackedRequestConfig) -> BoxStream<'static, Result<TransferEvent, BoxError>> {
            let mut request = self.client.request(config.method.into(), &config.url);
            for (key, value) in config.headers.iter() {
                request = request.header(key, value);
            }
            if let Some(timeout) = config.timeout {
                request = request.timeout(timeout);
            }

            let (uploads, mut upload_rx) = unbounded_channel();
            if let Some(body) = config.body.clone() {
                if config.include_upload_progress {
                    let total = body.len() as u64;
                    let _ = uploads.send(TransferEvent::upload(TransferStage::Start, 0, Some(total)));
                    request = request
                        .header(CONTENT_LENGTH, total)
                        .body(reqwest::Body::wrap_stream(upload_chunks(body, uploads)));
                } else {
                    request = request.body(body);
                }
            }

            let method = config.method;
            let url = config.url.clone();
            let response = stream::once(request.send()).flat_map(move |sent| match sent {
                Ok(response) => download_events(method, response),
                Err(error) => stream::once(std::future::ready(Err(transfer_error(method, &url, &error)))).boxed(),
            });

            let upload_events = stream::poll_fn(move |cx| upload_rx.poll_recv(cx));
            merge_transfer_events(upload_events, response)
        }
    }

    /// Interleave upload and response events.
    ///
    /// Queued upload events always go first, so the response's terminal event
    /// never overtakes upload progress that was already reported.
    pub(crate) fn merge_transfer_events(
        uploads: impl Stream<Item = TransferEvent> + Send + 'static,
        response: impl Stream<Item = Result<TransferEvent, BoxError>> + Send + 'static,
    ) -> BoxStream<'static, Result<TransferEvent, BoxError>> {
        stream::select_with_strategy(uploads.map(Ok), response, |_: &mut ()| PollNext::Left).boxed()
    }

    /// Split `body` into chunks, reporting upload progress as each chunk is
    /// pulled by the connection.
    pub(crate) fn upload_chunks(
        body: Bytes,
        events: UnboundedSender<TransferEvent>,
    ) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
        let total = body.len() as u64;
        stream::unfold((body, 0u64, events), move |(mut rest, sent, events)| async move {
            if rest.is_empty() {
                let _ = events.send(TransferEvent::upload(TransferStage::Load, sent, Some(total)));
                return None;
            }
            let chunk = rest.split_to(rest.len().min(UPLOAD_CHUNK_SIZE));
            let sent = sent + chunk.len() as u64;
            let _ = events.send(TransferEvent::upload(TransferStage::Progress, sent, Some(total)));
            Some((Ok(chunk), (rest, sent, events)))
        })
    }

    struct ResponseHead {
        method: Method,
        url: String,
        status: u16,
        headers: Vec<(String, String)>,
        total: Option<u64>,
    }

    enum Download {
        Streaming {
            head: ResponseHead,
            chunks: BoxStream<'static, reqwest::Result<Bytes>>,
            buffer: BytesMut,
        },
        Done,
    }

    fn download_events(
        method: Method,
        response: reqwest::Response,
    ) -> BoxStream<'static, Result<TransferEvent, BoxError>> {
        let url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            let error = TransferError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
            };
            return stream::once(std::future::ready(Err::<TransferEvent, BoxError>(error.into()))).boxed();
        }

        let head = ResponseHead {
            method,
            url,
            status: status.as_u16(),
            headers: response
                .headers()
                .iter()
                .filter_map(|(key, value)| Some((key.to_string(), value.to_str().ok()?.to_string())))
                .collect(),
            total: response.content_length(),
        };
        let start = TransferEvent::download(TransferStage::Start, 0, head.total);
        let state = Download::Streaming {
            head,
            chunks: response.bytes_stream().boxed(),
            buffer: BytesMut::new(),
        };

        let body = stream::unfold(state, |state| async move {
            let Download::Streaming { head, mut chunks, mut buffer } = state else {
                return None;
            };
            match chunks.next().await {
                Some(Ok(chunk)) => {
                    buffer.extend_from_slice(&chunk);
                    let event = TransferEvent::download(TransferStage::Progress, buffer.len() as u64, head.total);
                    Some((Ok(event), Download::Streaming { head, chunks, buffer }))
                }
                Some(Err(error)) => Some((Err(transfer_error(head.method, &head.url, &error)), Download::Done)),
                None => {
                    let response = TrackedResponse {
                        url: head.url,
                        status: head.status,
                        headers: head.headers,
                        body: buffer.freeze(),
                    };
                    Some((Ok(TransferEvent::Complete(response)), Download::Done))
                }
            }
        });

        stream::once(std::future::ready(Ok(start))).chain(body).boxed()
    }

    fn transfer_error(method: Method, url: &str, error: &reqwest::Error) -> BoxError {
        let method = method.to_string();
        let url = url.to_string();
        let error = if error.is_timeout() {
            TransferError::Timeout { method, url }
        } else if let Some(status) = error.status() {
            TransferError::Status {
                method,
                url,
                status: status.as_u16(),
            }
        } else {
            TransferError::Network {
                method,
                url,
                message: error.to_string(),
            }
        };
        Box::new(error)
    }

}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestTransport;
