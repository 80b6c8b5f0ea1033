//! Remote data values and the stream algebra built on top of them.
//!
//! # Architecture
//!
//! - [`RemoteData`] - Four-state snapshot of one asynchronous attempt
//! - [`RemoteStream`] - Cold, cancellable stream of snapshots with
//!   `map`/`chain`/`ap`/`alt`/`bimap` combinators
//! - [`Progress`] - Loaded/total byte counts reported while in progress
//!
//! # Key Features
//!
//! - **Total**: every operator is a fold over all four variants
//! - **Cold**: each subscription runs its own effect
//! - **Cancellable**: dropping a subscription drops the effect behind it

mod progress;
mod remote_data;
mod stream;

pub use progress::Progress;
pub use remote_data::RemoteData;
pub use stream::{BoxStream, RemoteStream};
