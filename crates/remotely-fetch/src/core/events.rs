use futures_util::{Stream, StreamExt, stream};
use remotely_data::RemoteData;

use crate::data::{TrackedResponse, TransferEvent};
use crate::error::{BoxError, TransferError};

/// Map one transport event onto the remote data it represents.
///
/// Progress events become `InProgress`, the completion event becomes
/// `Succeeded` and a [`TransferError`] becomes `Failed`.
///
/// # Panics
///
/// Panics when the transport raises an error that is not a
/// [`TransferError`]. Such errors signal a bug in the transport rather than
/// a network condition and are not reported as `Failed`.
pub fn fold_event(
    event: Result<TransferEvent, BoxError>,
) -> RemoteData<TransferError, TrackedResponse> {
    match event {
        Ok(TransferEvent::Progress { progress, .. }) => RemoteData::InProgress(Some(progress)),
        Ok(TransferEvent::Complete(response)) => RemoteData::Succeeded(response),
        Err(error) => match error.downcast::<TransferError>() {
            Ok(error) => RemoteData::Failed(*error),
            Err(other) => panic!("unrecognized transport error: {other}"),
        },
    }
}

/// Forward values up to and including the first terminal one.
///
/// The source is not polled again once a terminal value went out.
pub(crate) fn until_terminal<S, E, A>(stream: S) -> impl Stream<Item = RemoteData<E, A>>
where
    S: Stream<Item = RemoteData<E, A>>,
{
    stream::unfold(Some(Box::pin(stream)), |source| async move {
        let mut source = source?;
        let value = source.next().await?;
        let source = (!value.is_terminal()).then_some(source);
        Some((value, source))
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures_util::FutureExt;
    use remotely_data::Progress;

    use super::*;
    use crate::data::TransferStage;

    fn response() -> TrackedResponse {
        TrackedResponse {
            url: "https://example.com".into(),
            status: 200,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_progress_event() {
        let event = TransferEvent::download(TransferStage::Progress, 10, None);
        assert_eq!(
            fold_event(Ok(event)),
            RemoteData::InProgress(Some(Progress::new(10, None)))
        );
    }

    #[test]
    fn test_start_events_carry_progress() {
        let event = TransferEvent::upload(TransferStage::Start, 0, Some(64));
        assert_eq!(
            fold_event(Ok(event)),
            RemoteData::InProgress(Some(Progress::new(0, Some(64))))
        );
    }

    #[test]
    fn test_complete_event() {
        assert_eq!(
            fold_event(Ok(TransferEvent::Complete(response()))),
            RemoteData::Succeeded(response())
        );
    }

    #[test]
    fn test_recognized_error() {
        let error = TransferError::Timeout {
            method: "GET".into(),
            url: "https://example.com".into(),
        };
        assert_eq!(
            fold_event(Err(Box::new(error.clone()))),
            RemoteData::Failed(error)
        );
    }

    #[test]
    #[should_panic(expected = "unrecognized transport error")]
    fn test_unrecognized_error_is_raised() {
        let error: BoxError = "callback exploded".into();
        let _ = fold_event(Err(error));
    }

    #[test]
    fn test_until_terminal_stops_after_first_terminal() {
        let values = stream::iter(vec![
            RemoteData::InProgress(None),
            RemoteData::Succeeded(1),
            RemoteData::InProgress(None),
            RemoteData::Failed("late"),
        ]);
        let forwarded: Vec<RemoteData<&str, i32>> =
            until_terminal(values).collect().now_or_never().unwrap();
        assert_eq!(
            forwarded,
            vec![RemoteData::InProgress(None), RemoteData::Succeeded(1)]
        );
    }

    #[test]
    fn test_until_terminal_does_not_poll_past_terminal() {
        let values = stream::iter(vec![RemoteData::<&str, i32>::Succeeded(1)]).chain(stream::pending());
        let forwarded: Vec<_> = until_terminal(values).collect().now_or_never().unwrap();
        assert_eq!(forwarded, vec![RemoteData::Succeeded(1)]);
    }
}
