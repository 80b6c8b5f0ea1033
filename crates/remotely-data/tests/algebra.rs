//! Laws and composition rules of the remote stream algebra.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures_util::stream::{self, StreamExt};
use proptest::prelude::*;
use remotely_data::{Progress, RemoteData, RemoteStream};

type Remote = RemoteStream<String, i64>;

async fn emissions<E, A>(remote: &RemoteStream<E, A>) -> Vec<RemoteData<E, A>>
where
    E: Send + 'static,
    A: Send + 'static,
{
    remote.subscribe().collect().await
}

fn counting(subscriptions: &Arc<AtomicUsize>, value: RemoteData<String, i64>) -> Remote {
    let subscriptions = Arc::clone(subscriptions);
    RemoteStream::new(move || {
        subscriptions.fetch_add(1, Ordering::SeqCst);
        stream::once(std::future::ready(value.clone()))
    })
}

proptest! {
    #[test]
    fn test_map_identity(a in any::<i64>()) {
        let remote = Remote::from_success(a);
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let mapped = runtime.block_on(emissions(&remote.clone().map(|x| x)));
        let plain = runtime.block_on(emissions(&remote));
        prop_assert_eq!(mapped, plain);
    }

    #[test]
    fn test_map_composition(a in -1_000_000i64..1_000_000, k in -1_000i64..1_000) {
        let f = move |x: i64| x + k;
        let g = |x: i64| x * 2;
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let twice = runtime.block_on(emissions(&Remote::from_success(a).map(f).map(g)));
        let composed = runtime.block_on(emissions(&Remote::from_success(a).map(move |x| g(f(x)))));
        prop_assert_eq!(twice, composed);
    }

    #[test]
    fn test_map_leaves_progress_untouched(loaded in any::<u64>(), total in any::<Option<u64>>()) {
        let progress = Some(Progress::new(loaded, total));
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let mapped = runtime.block_on(emissions(&Remote::from_in_progress(progress).map(|x| x + 1)));
        prop_assert_eq!(mapped, vec![RemoteData::InProgress(progress)]);
    }
}

#[tokio::test]
async fn test_chain_never_invokes_continuation_on_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let chained = Remote::from_failure("boom".to_string()).chain(move |value| {
        counter.fetch_add(1, Ordering::SeqCst);
        Remote::from_success(value)
    });

    assert_eq!(emissions(&chained).await, vec![RemoteData::Failed("boom".to_string())]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chain_preserves_bare_and_reported_progress() {
    let progress = Some(Progress::new(3, Some(9)));
    let upstream = RemoteStream::new(move || {
        stream::iter(vec![
            RemoteData::InProgress(None),
            RemoteData::InProgress(progress),
            RemoteData::Succeeded(1),
        ])
    });
    let chained: RemoteStream<String, String> =
        upstream.chain(|value: i64| RemoteStream::from_success(value.to_string()));

    assert_eq!(
        emissions(&chained).await,
        vec![
            RemoteData::InProgress(None),
            RemoteData::InProgress(progress),
            RemoteData::Succeeded("1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_alt_ignores_fallback_on_success() {
    let subscriptions = Arc::new(AtomicUsize::new(0));
    let fallback = counting(&subscriptions, RemoteData::Succeeded(2));
    let remote = Remote::from_success(1).alt(move || fallback.clone());

    assert_eq!(emissions(&remote).await, vec![RemoteData::Succeeded(1)]);
    assert_eq!(subscriptions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_alt_adopts_fallback_on_failure() {
    let remote = Remote::from_failure("boom".to_string()).alt(|| Remote::from_success(2));
    assert_eq!(emissions(&remote).await, vec![RemoteData::Succeeded(2)]);
}

#[tokio::test]
async fn test_alt_keeps_uninitiated_and_in_progress() {
    let upstream = RemoteStream::new(|| {
        stream::iter(vec![
            RemoteData::Uninitiated,
            RemoteData::InProgress(None),
            RemoteData::Failed("boom".to_string()),
        ])
    });
    let remote: Remote = upstream.alt(|| Remote::from_success(5));

    assert_eq!(
        emissions(&remote).await,
        vec![
            RemoteData::Uninitiated,
            RemoteData::InProgress(None),
            RemoteData::Succeeded(5),
        ]
    );
}

#[tokio::test]
async fn test_subscriptions_are_independent() {
    let subscriptions = Arc::new(AtomicUsize::new(0));
    let remote = counting(&subscriptions, RemoteData::Succeeded(1)).map(|x| x + 1);

    assert_eq!(emissions(&remote).await, vec![RemoteData::Succeeded(2)]);
    assert_eq!(emissions(&remote).await, vec![RemoteData::Succeeded(2)]);
    assert_eq!(subscriptions.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_bimap_and_map_left_transform_failures() {
    let remote = Remote::from_failure("boom".to_string());
    assert_eq!(
        emissions(&remote.clone().map_left(|error| error.len())).await,
        vec![RemoteData::Failed(4)]
    );
    assert_eq!(
        emissions(&remote.bimap(|error| error.to_uppercase(), |value| value * 2)).await,
        vec![RemoteData::Failed("BOOM".to_string())]
    );
}

#[tokio::test]
async fn test_ap_reports_in_progress_until_both_sides_succeed() {
    let functions: RemoteStream<String, fn(i64) -> i64> = RemoteStream::new(|| {
        stream::iter(vec![
            RemoteData::InProgress(Some(Progress::new(1, Some(2)))),
            RemoteData::Succeeded((|x: i64| x + 1) as fn(i64) -> i64),
        ])
    });
    let arguments = Remote::from_success(41);

    let values = emissions(&functions.ap(arguments)).await;
    assert_eq!(values.last(), Some(&RemoteData::Succeeded(42)));
    assert!(values.iter().rev().skip(1).all(RemoteData::is_in_progress));
}

/// Flags the subscription that owned it as dropped.
struct DropGuard(Arc<AtomicBool>);

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_dropping_a_subscription_drops_its_effect() {
    let dropped = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&dropped);
    let remote: Remote = RemoteStream::new(move || {
        let guard = DropGuard(Arc::clone(&flag));
        stream::once(std::future::ready(RemoteData::InProgress(None)))
            .chain(stream::pending())
            .map(move |value| {
                let _owner = &guard;
                value
            })
    });

    let mut subscription = remote.map(|x| x + 1).subscribe();
    assert_eq!(subscription.next().await, Some(RemoteData::InProgress(None)));
    assert!(!dropped.load(Ordering::SeqCst));

    drop(subscription);
    assert!(dropped.load(Ordering::SeqCst));
}

fn remote_data() -> impl Strategy<Value = RemoteData<u8, i64>> {
    prop_oneof![
        Just(RemoteData::Uninitiated),
        proptest::option::of((0u64..1_000_000, proptest::option::of(0u64..1_000_000)))
            .prop_map(|progress| RemoteData::InProgress(progress.map(|(loaded, total)| Progress::new(loaded, total)))),
        any::<u8>().prop_map(RemoteData::Failed),
        any::<i64>().prop_map(RemoteData::Succeeded),
    ]
}

proptest! {
    #[test]
    fn test_ap_precedence(f in remote_data(), a in remote_data()) {
        let combined = f.map(|k| move |x: i64| x.wrapping_add(k)).ap(a);
        match (f, a) {
            (RemoteData::Failed(error), _) | (_, RemoteData::Failed(error)) => {
                prop_assert_eq!(combined, RemoteData::Failed(error));
            }
            (RemoteData::InProgress(_), _) | (_, RemoteData::InProgress(_)) => {
                prop_assert!(combined.is_in_progress());
            }
            (RemoteData::Uninitiated, _) | (_, RemoteData::Uninitiated) => {
                prop_assert_eq!(combined, RemoteData::Uninitiated);
            }
            (RemoteData::Succeeded(k), RemoteData::Succeeded(x)) => {
                prop_assert_eq!(combined, RemoteData::Succeeded(x.wrapping_add(k)));
            }
        }
    }
}
