//! Pure transformations used by the request adapters.
//!
//! Nothing in this module performs I/O: content-type inspection and the
//! folding of transport events into remote data live here so they can be
//! tested without a transport.

mod content_type;
mod events;

pub use content_type::{JSON_MEDIA_TYPE, is_json_content_type, media_type};
pub use events::fold_event;

pub(crate) use events::until_terminal;
