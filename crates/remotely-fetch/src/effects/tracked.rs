use std::sync::Arc;

use futures_util::{StreamExt, future, stream};
use remotely_data::{RemoteData, RemoteStream};
use tracing::{debug, trace, warn};

use crate::core::{fold_event, until_terminal};
use crate::data::{TrackedRequestConfig, TrackedResponse};
use crate::effects::transport::TrackedTransport;
use crate::error::TransferError;

/// Lift a progress-reporting request into a remote stream.
///
/// Upload progress is always requested from the transport, whatever
/// `config.include_upload_progress` says. Each subscription emits
/// `InProgress(None)` before the transport is asked for anything, then one
/// `InProgress(Some(progress))` per progress event, and finishes with
/// `Succeeded(response)` or `Failed(error)`. Nothing is emitted after the
/// terminal value.
///
/// Dropping a subscription before it finished aborts the request.
///
/// # Panics
///
/// Polling a subscription panics when the transport reports an error that
/// is not a [`TransferError`].
pub fn from_tracked_request<T>(
    transport: T,
    config: TrackedRequestConfig,
) -> RemoteStream<TransferError, TrackedResponse>
where
    T: TrackedTransport + 'static,
{
    let transport = Arc::new(transport);
    let config = config.include_upload_progress(true);
    RemoteStream::new(move || {
        let transport = Arc::clone(&transport);
        let config = config.clone();
        let url = config.url.clone();
        let send = future::lazy(move |_| {
            debug!(url = %config.url, method = %config.method, "starting tracked request");
            transport.send(&config)
        });
        let events = stream::once(send).flatten().map(move |event| {
            let data = fold_event(event);
            match &data {
                RemoteData::InProgress(Some(progress)) => {
                    trace!(url, loaded = progress.loaded, total = ?progress.total, "transfer progress");
                }
                RemoteData::Failed(error) => warn!(url, %error, "tracked request failed"),
                _ => {}
            }
            data
        });
        stream::once(std::future::ready(RemoteData::InProgress(None))).chain(until_terminal(events))
    })
}
