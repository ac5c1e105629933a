/* src/lib.rs */

//!
//! Polling snapshot-diff engine: repeatedly fetches remote collections,
//! compares each item with its last observed state and emits exactly one
//! notification per meaningful change.
//!
//! The crate is split into:
//!
//! - **rules**: Status classification and the notify-worthy transition policy.
//! - **snapshot**: Lock-free, partitioned store of last-observed states.
//! - **persist**: Pluggable persistence adapters and blob formats.
//! - **engine**: The diff engine turning a fetch into transitions.
//! - **notify**: Formatting and delivery of transitions.
//! - **poll**: Per-collection poll scheduler with no-overlap cycles.
//! - **tracker**: Session-level composition of all of the above (`Tracker`).
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `events`: Enables change events on the snapshot `Store`.
//! - `stream`: Exposes channel notifications as a `Stream`.
//! - `template`: Minijinja message templates.
//! - `toml`, `yaml`, `postcard`: Extra snapshot encodings (JSON is built in).
//! - `validate`: `validator` checks on `PollConfig`.
//!
//! ## Basic Usage
//!
//! ```ignore
//! let engine = DiffEngine::new(Arc::new(Store::new()))
//!     .with_dispatcher(Dispatcher::new(SinkNotifier::new(TracingSink)));
//! let tracker = Tracker::builder()
//!     .engine(engine)
//!     .persister(Persister::new(FilePersistence::new("state"), AnyFormat::Json))
//!     .build()?;
//!
//! tracker.load().await;
//! tracker.watch("my-registrations", source, PollConfig::default()).await?;
//! ```

pub mod engine;
pub mod notify;
pub mod persist;
pub mod poll;
pub mod rules;
pub mod snapshot;
pub mod tracker;

pub use engine::{DiffEngine, RawItem, Transition};
pub use notify::{Dispatcher, Notifier, Severity};
pub use persist::{AnyFormat, FilePersistence, MemoryPersistence, Persister};
pub use poll::{PollConfig, Poller, RemoteSource};
pub use rules::{NotifyPolicy, Status, StatusTable};
pub use snapshot::{ObservedState, Store};
pub use tracker::{Tracker, TrackerError};
