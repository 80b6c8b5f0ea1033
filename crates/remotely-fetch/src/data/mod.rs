//! Immutable data types for request adapters.
//!
//! This module contains the request configuration and the transfer events
//! exchanged with transports. These types are plain values and are cloned
//! into every subscription.

pub mod event;
pub mod options;

pub use event::{Direction, TrackedResponse, TransferEvent, TransferStage};
pub use options::{Method, RequestOptions, TrackedRequestConfig};
