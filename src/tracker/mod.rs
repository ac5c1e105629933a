/* src/tracker/mod.rs */

//!
//! Session-level composition of the snapshot store, the diff engine, the
//! persister and the poll scheduler.

mod error;
mod session;

pub use error::TrackerError;
pub use session::{LoadOutcome, Tracker, TrackerBuilder};
