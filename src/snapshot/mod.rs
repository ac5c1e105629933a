/* src/snapshot/mod.rs */

//!
//! Last-observed state of every tracked item, partitioned by collection key.

#[cfg(feature = "events")]
mod event;
mod state;
mod store;

#[cfg(feature = "events")]
pub use event::StoreEvent;
pub use state::{ItemId, ObservedState, SerializedSnapshot};
pub use store::{DEFAULT_EVENT_CAPACITY, Partition, Store};
