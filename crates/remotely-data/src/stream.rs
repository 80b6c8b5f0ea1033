use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;

use futures_util::stream::{self, Stream, StreamExt};

use crate::progress::Progress;
use crate::remote_data::RemoteData;

/// A boxed stream type used for every subscription.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

type Factory<E, A> = dyn Fn() -> BoxStream<'static, RemoteData<E, A>> + Send + Sync;

/// A cold stream of [`RemoteData`] values.
///
/// A `RemoteStream` is a recipe, not a running effect: every call to
/// [`subscribe`](RemoteStream::subscribe) builds a fresh stream that owns its
/// own request. Dropping that stream cancels whatever it was driving.
/// Cloning is cheap and clones share the recipe, never a subscription.
pub struct RemoteStream<E, A> {
    factory: Arc<Factory<E, A>>,
}

impl<E, A> Clone for RemoteStream<E, A> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<E, A> fmt::Debug for RemoteStream<E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStream").finish_non_exhaustive()
    }
}

fn single<E, A>(value: RemoteData<E, A>) -> BoxStream<'static, RemoteData<E, A>>
where
    E: Send + 'static,
    A: Send + 'static,
{
    Box::pin(stream::once(future::ready(value)))
}

/// Map every upstream value to an inner stream and merge all of them.
///
/// The upstream keeps being polled while inner streams are open. Inner
/// streams are polled oldest first, before the upstream, so values that are
/// ready right away come out in the order a sequential flatten would give.
fn merge_map<T, U, F>(upstream: BoxStream<'static, T>, mut f: F) -> BoxStream<'static, U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> BoxStream<'static, U> + Send + 'static,
{
    let mut upstream = Some(upstream);
    let mut inners: Vec<BoxStream<'static, U>> = Vec::new();
    Box::pin(stream::poll_fn(move |cx| {
        loop {
            let mut index = 0;
            while index < inners.len() {
                match inners[index].poll_next_unpin(cx) {
                    Poll::Ready(Some(value)) => return Poll::Ready(Some(value)),
                    Poll::Ready(None) => {
                        inners.remove(index);
                    }
                    Poll::Pending => index += 1,
                }
            }

            let Some(source) = upstream.as_mut() else {
                return if inners.is_empty() { Poll::Ready(None) } else { Poll::Pending };
            };
            match source.poll_next_unpin(cx) {
                Poll::Ready(Some(value)) => inners.push(f(value)),
                Poll::Ready(None) => upstream = None,
                Poll::Pending => return Poll::Pending,
            }
        }
    }))
}

enum Latest<F, A> {
    Function(F),
    Argument(A),
}

impl<E, A> RemoteStream<E, A>
where
    E: Send + 'static,
    A: Send + 'static,
{
    /// Build a stream from a factory invoked once per subscription.
    pub fn new<F, S>(factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = RemoteData<E, A>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || Box::pin(factory()) as BoxStream<'static, RemoteData<E, A>>),
        }
    }

    /// Start a new subscription.
    ///
    /// The effect behind the stream starts here and is cancelled when the
    /// returned stream is dropped.
    pub fn subscribe(&self) -> BoxStream<'static, RemoteData<E, A>> {
        (self.factory)()
    }

    /// Emit `value` once per subscription.
    pub fn from_remote_data(value: RemoteData<E, A>) -> Self
    where
        E: Clone + Sync,
        A: Clone + Sync,
    {
        Self::new(move || stream::once(future::ready(value.clone())))
    }

    pub fn from_uninitiated() -> Self {
        Self::new(|| stream::once(future::ready(RemoteData::Uninitiated)))
    }

    pub fn from_in_progress(progress: Option<Progress>) -> Self {
        Self::new(move || stream::once(future::ready(RemoteData::InProgress(progress))))
    }

    pub fn from_failure(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::new(move || stream::once(future::ready(RemoteData::Failed(error.clone()))))
    }

    pub fn from_success(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::new(move || stream::once(future::ready(RemoteData::Succeeded(value.clone()))))
    }

    /// Lift every item of a plain stream into `Succeeded`.
    pub fn from_stream<F, S>(make: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = A> + Send + 'static,
    {
        Self::new(move || make().map(RemoteData::Succeeded))
    }

    /// Lift the output of a future into `Succeeded`.
    pub fn from_future<F, Fut>(make: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        Self::new(move || stream::once(make()).map(RemoteData::Succeeded))
    }

    /// Lift a stream of `Result`s, announcing `InProgress(None)` first.
    pub fn from_result_stream<F, S>(make: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = Result<A, E>> + Send + 'static,
    {
        Self::new(move || {
            stream::once(future::ready(RemoteData::InProgress(None)))
                .chain(make().map(RemoteData::from))
        })
    }

    pub fn map<B, F>(self, f: F) -> RemoteStream<E, B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.bimap(|error| error, f)
    }

    pub fn map_left<G, F>(self, g: F) -> RemoteStream<G, A>
    where
        F: Fn(E) -> G + Send + Sync + 'static,
        G: Send + 'static,
    {
        self.bimap(g, |value| value)
    }

    pub fn bimap<G, B, FE, FA>(self, g: FE, f: FA) -> RemoteStream<G, B>
    where
        FE: Fn(E) -> G + Send + Sync + 'static,
        FA: Fn(A) -> B + Send + Sync + 'static,
        G: Send + 'static,
        B: Send + 'static,
    {
        let g = Arc::new(g);
        let f = Arc::new(f);
        RemoteStream::new(move || {
            let g = Arc::clone(&g);
            let f = Arc::clone(&f);
            self.subscribe()
                .map(move |value| value.bimap(|error| g(error), |value| f(value)))
        })
    }

    /// Continue each success with a one-shot stream built by `f`.
    ///
    /// `f` runs once per success of each subscription, so it may move
    /// single-use values such as a response body into the stream it returns.
    /// Every other state is forwarded as is.
    pub fn chain_stream<B, S, F>(self, f: F) -> RemoteStream<E, B>
    where
        F: Fn(A) -> S + Send + Sync + 'static,
        S: Stream<Item = RemoteData<E, B>> + Send + 'static,
        B: Send + 'static,
    {
        let f = Arc::new(f);
        RemoteStream::new(move || {
            let f = Arc::clone(&f);
            merge_map(self.subscribe(), move |value| {
                value.fold(
                    || single(RemoteData::Uninitiated),
                    |progress| single(RemoteData::InProgress(progress)),
                    |error| single(RemoteData::Failed(error)),
                    |value| Box::pin(f(value)) as BoxStream<'static, RemoteData<E, B>>,
                )
            })
        })
    }

    /// Sequential composition.
    ///
    /// On `Succeeded(a)` the stream subscribes to `f(a)` and forwards its
    /// values; `f` is never called for any other state. Inner streams are
    /// merged: later upstream values are forwarded while `f(a)` is still
    /// running.
    pub fn chain<B, F>(self, f: F) -> RemoteStream<E, B>
    where
        F: Fn(A) -> RemoteStream<E, B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.chain_stream(move |value| f(value).subscribe())
    }

    /// Like [`chain`](RemoteStream::chain) but keeps the upstream success value.
    pub fn chain_first<B, F>(self, f: F) -> RemoteStream<E, A>
    where
        F: Fn(A) -> RemoteStream<E, B> + Send + Sync + 'static,
        A: Clone + Sync,
        B: Send + 'static,
    {
        self.chain(move |value: A| {
            let keep = value.clone();
            f(value).map(move |_| keep.clone())
        })
    }

    /// Failure-only fallback.
    ///
    /// On `Failed(_)` the stream subscribes to `that()` and forwards its
    /// values, merged with whatever the upstream emits afterwards. `that` is
    /// not called, and nothing is subscribed, unless a failure arrives.
    pub fn alt<F>(self, that: F) -> RemoteStream<E, A>
    where
        F: Fn() -> RemoteStream<E, A> + Send + Sync + 'static,
    {
        let that = Arc::new(that);
        RemoteStream::new(move || {
            let that = Arc::clone(&that);
            merge_map(self.subscribe(), move |value| {
                value.fold(
                    || single(RemoteData::Uninitiated),
                    |progress| single(RemoteData::InProgress(progress)),
                    |_| that().subscribe(),
                    |value| single(RemoteData::Succeeded(value)),
                )
            })
        })
    }

    /// Sequence both streams and keep this side's success value.
    pub fn ap_first<B>(self, fb: RemoteStream<E, B>) -> RemoteStream<E, A>
    where
        E: Clone,
        A: Clone,
        B: Clone + Send + 'static,
    {
        self.map(|value: A| move |_: B| value).ap(fb)
    }

    /// Sequence both streams and keep the other side's success value.
    pub fn ap_second<B>(self, fb: RemoteStream<E, B>) -> RemoteStream<E, B>
    where
        E: Clone,
        B: Clone + Send + 'static,
    {
        self.map(|_: A| |value: B| value).ap(fb)
    }
}

impl<E, F> RemoteStream<E, F>
where
    E: Clone + Send + 'static,
    F: Clone + Send + 'static,
{
    /// Apply the functions of this stream to the values of `fa`.
    ///
    /// Both sides are subscribed independently. Once each side emitted at
    /// least once, every emission from either side yields
    /// [`RemoteData::ap`] of the latest pair.
    pub fn ap<A, B>(self, fa: RemoteStream<E, A>) -> RemoteStream<E, B>
    where
        F: FnOnce(A) -> B,
        A: Clone + Send + 'static,
        B: Send + 'static,
    {
        RemoteStream::new(move || {
            let functions = self.subscribe().map(Latest::Function);
            let arguments = fa.subscribe().map(Latest::Argument);
            stream::select(functions, arguments)
                .scan((None, None), |(function, argument), latest| {
                    match latest {
                        Latest::Function(value) => *function = Some(value),
                        Latest::Argument(value) => *argument = Some(value),
                    }
                    let combined = match (function.as_ref(), argument.as_ref()) {
                        (Some(function), Some(argument)) => {
                            Some(RemoteData::ap(function.clone(), argument.clone()))
                        }
                        _ => None,
                    };
                    future::ready(Some(combined))
                })
                .filter_map(future::ready)
        })
    }
}

impl<E, A> RemoteStream<E, RemoteStream<E, A>>
where
    E: Send + 'static,
    A: Send + 'static,
{
    pub fn flatten(self) -> RemoteStream<E, A> {
        self.chain(|inner| inner)
    }
}
