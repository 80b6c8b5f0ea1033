use serde::Serialize;

use crate::progress::Progress;

/// Lifecycle of one asynchronous attempt.
///
/// A value is an immutable snapshot. Nothing here enforces a transition order:
/// a fresh attempt may emit `Uninitiated` or `InProgress` again after a
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "tag", content = "value")]
pub enum RemoteData<E, A> {
    /// The attempt has not started.
    Uninitiated,

    /// The attempt is running.
    ///
    /// Progress is present only once the transport reported at least one
    /// progress event.
    InProgress(Option<Progress>),

    /// The attempt ended in failure.
    Failed(E),

    /// The attempt ended in success.
    Succeeded(A),
}

impl<E, A> RemoteData<E, A> {
    /// Exhaustive match over the four variants.
    ///
    /// Every transformation below goes through this function.
    pub fn fold<R>(
        self,
        on_uninitiated: impl FnOnce() -> R,
        on_in_progress: impl FnOnce(Option<Progress>) -> R,
        on_failed: impl FnOnce(E) -> R,
        on_succeeded: impl FnOnce(A) -> R,
    ) -> R {
        match self {
            RemoteData::Uninitiated => on_uninitiated(),
            RemoteData::InProgress(progress) => on_in_progress(progress),
            RemoteData::Failed(error) => on_failed(error),
            RemoteData::Succeeded(value) => on_succeeded(value),
        }
    }

    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> RemoteData<E, B> {
        self.bimap(|error| error, f)
    }

    pub fn map_left<G>(self, g: impl FnOnce(E) -> G) -> RemoteData<G, A> {
        self.bimap(g, |value| value)
    }

    pub fn bimap<G, B>(self, g: impl FnOnce(E) -> G, f: impl FnOnce(A) -> B) -> RemoteData<G, B> {
        self.fold(
            || RemoteData::Uninitiated,
            RemoteData::InProgress,
            |error| RemoteData::Failed(g(error)),
            |value| RemoteData::Succeeded(f(value)),
        )
    }

    /// Continue with `f` only when the attempt succeeded.
    pub fn chain<B>(self, f: impl FnOnce(A) -> RemoteData<E, B>) -> RemoteData<E, B> {
        self.fold(
            || RemoteData::Uninitiated,
            RemoteData::InProgress,
            RemoteData::Failed,
            f,
        )
    }

    /// Replace a failure with `that()`, leaving every other state untouched.
    pub fn alt(self, that: impl FnOnce() -> RemoteData<E, A>) -> RemoteData<E, A> {
        self.fold(
            || RemoteData::Uninitiated,
            RemoteData::InProgress,
            |_| that(),
            RemoteData::Succeeded,
        )
    }

    /// Combine a function attempt with an argument attempt.
    ///
    /// Precedence, high to low: `Failed` (the function side wins when both
    /// failed), `InProgress` (progress combined with [`Progress::combine`]
    /// when both sides carry one), `Uninitiated`, then `Succeeded`.
    pub fn ap<X, B>(self, fa: RemoteData<E, X>) -> RemoteData<E, B>
    where
        A: FnOnce(X) -> B,
    {
        match (self, fa) {
            (RemoteData::Failed(error), _) | (_, RemoteData::Failed(error)) => {
                RemoteData::Failed(error)
            }
            (RemoteData::InProgress(left), RemoteData::InProgress(right)) => {
                RemoteData::InProgress(match (left, right) {
                    (Some(left), Some(right)) => Some(left.combine(right)),
                    (left, right) => left.or(right),
                })
            }
            (RemoteData::InProgress(progress), _) | (_, RemoteData::InProgress(progress)) => {
                RemoteData::InProgress(progress)
            }
            (RemoteData::Uninitiated, _) | (_, RemoteData::Uninitiated) => RemoteData::Uninitiated,
            (RemoteData::Succeeded(f), RemoteData::Succeeded(value)) => RemoteData::Succeeded(f(value)),
        }
    }

    pub fn as_ref(&self) -> RemoteData<&E, &A> {
        match self {
            RemoteData::Uninitiated => RemoteData::Uninitiated,
            RemoteData::InProgress(progress) => RemoteData::InProgress(*progress),
            RemoteData::Failed(error) => RemoteData::Failed(error),
            RemoteData::Succeeded(value) => RemoteData::Succeeded(value),
        }
    }

    pub fn is_uninitiated(&self) -> bool {
        matches!(self, RemoteData::Uninitiated)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, RemoteData::InProgress(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RemoteData::Failed(_))
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, RemoteData::Succeeded(_))
    }

    /// `Failed` and `Succeeded` end an attempt.
    pub fn is_terminal(&self) -> bool {
        self.is_failed() || self.is_succeeded()
    }

    /// Progress of a running attempt, if any was reported.
    pub fn progress(&self) -> Option<Progress> {
        match self {
            RemoteData::InProgress(progress) => *progress,
            _ => None,
        }
    }

    pub fn succeeded(self) -> Option<A> {
        self.fold(|| None, |_| None, |_| None, Some)
    }

    pub fn failed(self) -> Option<E> {
        self.fold(|| None, |_| None, Some, |_| None)
    }

    /// The outcome of a finished attempt; `None` while it is still open.
    pub fn into_result(self) -> Option<Result<A, E>> {
        self.fold(|| None, |_| None, |error| Some(Err(error)), |value| Some(Ok(value)))
    }
}

impl<E, A> Default for RemoteData<E, A> {
    fn default() -> Self {
        RemoteData::Uninitiated
    }
}

impl<E, A> From<Result<A, E>> for RemoteData<E, A> {
    fn from(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => RemoteData::Succeeded(value),
            Err(error) => RemoteData::Failed(error),
        }
    }
}
