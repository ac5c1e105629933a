/* src/persist/mod.rs */

//!
//! Snapshot persistence: an abstract key-value [`PersistenceAdapter`], a set
//! of encodings ([`format`]) and the [`Persister`] tying them together.

pub mod adapter;
mod error;
pub mod format;
mod persister;

pub use adapter::{FilePersistence, MemoryPersistence};
pub use error::PersistError;
pub use format::AnyFormat;
pub use persister::{DEFAULT_SNAPSHOT_NAME, Persister, PersisterBuilder};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Where a loaded snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadInfo {
	/// Adapter key the blob was read from.
	pub key: String,
	/// Primary extension of the format that decoded it.
	pub format: &'static str,
	/// Size of the stored blob.
	pub bytes: usize,
}

/// Result of a loading operation.
#[derive(Debug)]
pub enum LoadResult<T> {
	/// Successfully loaded and parsed.
	Ok { value: T, info: LoadInfo },
	/// Nothing stored yet.
	NotFound,
	/// A blob exists but could not be read or decoded.
	Invalid(PersistError),
}

/// Abstract encoding that converts between bytes and a structured object.
pub trait Format: Send + Sync {
	/// List of supported extensions or identifiers.
	fn extensions(&self) -> &'static [&'static str];

	/// Parse the raw bytes into the target type.
	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, PersistError>;

	/// Encode the value into raw bytes.
	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, PersistError>;
}

/// External key-value resource holding serialized snapshots.
///
/// Implementations exist for memory and local files; a database row or
/// browser-style local storage fits the same shape.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
	/// Reads the blob stored under `key`; `Ok(None)` if nothing is stored.
	async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;

	/// Replaces the blob stored under `key`.
	async fn save(&self, key: &str, blob: &[u8]) -> Result<(), PersistError>;
}
