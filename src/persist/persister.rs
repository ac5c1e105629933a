/* src/persist/persister.rs */

use tokio::sync::Mutex;

use super::{AnyFormat, Format, LoadInfo, LoadResult, PersistError, PersistenceAdapter};
use crate::snapshot::{SerializedSnapshot, Store};

/// Base name of the persisted snapshot when none is configured.
pub const DEFAULT_SNAPSHOT_NAME: &str = "rosterwatch-snapshot";

/// Saves and restores a [`Store`] through an adapter and a format.
///
/// Saves are serialized behind an internal lock, so concurrent poll tasks
/// never interleave their writes. The persister remembers the store
/// revision it last wrote and skips saves when nothing changed.
pub struct Persister {
	adapter: Box<dyn PersistenceAdapter>,
	format: AnyFormat,
	name: String,
	last_saved: Mutex<Option<u64>>,
}

/// Builder for [`Persister`].
pub struct PersisterBuilder {
	adapter: Option<Box<dyn PersistenceAdapter>>,
	format: AnyFormat,
	name: String,
}

impl PersisterBuilder {
	pub fn new() -> Self {
		Self {
			adapter: None,
			format: AnyFormat::default(),
			name: DEFAULT_SNAPSHOT_NAME.to_string(),
		}
	}

	pub fn adapter(mut self, adapter: impl PersistenceAdapter + 'static) -> Self {
		self.adapter = Some(Box::new(adapter));
		self
	}

	pub fn format(mut self, format: AnyFormat) -> Self {
		self.format = format;
		self
	}

	/// Base name of the stored blob; the format's extension is appended.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn build(self) -> Result<Persister, PersistError> {
		let adapter = self
			.adapter
			.ok_or(PersistError::Custom("adapter is required"))?;
		if self.name.is_empty() {
			return Err(PersistError::Custom("name must not be empty"));
		}
		Ok(Persister {
			adapter,
			format: self.format,
			name: self.name,
			last_saved: Mutex::new(None),
		})
	}
}

impl Default for PersisterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl Persister {
	pub fn new(adapter: impl PersistenceAdapter + 'static, format: AnyFormat) -> Self {
		Self {
			adapter: Box::new(adapter),
			format,
			name: DEFAULT_SNAPSHOT_NAME.to_string(),
			last_saved: Mutex::new(None),
		}
	}

	pub fn builder() -> PersisterBuilder {
		PersisterBuilder::new()
	}

	/// Adapter key the snapshot is stored under.
	pub fn key(&self) -> String {
		format!("{}.{}", self.name, self.format.extension())
	}

	pub fn format(&self) -> AnyFormat {
		self.format
	}

	/// Reads and decodes the persisted snapshot.
	pub async fn load(&self) -> LoadResult<SerializedSnapshot> {
		let key = self.key();
		let bytes = match self.adapter.load(&key).await {
			Ok(Some(b)) => b,
			Ok(None) => return LoadResult::NotFound,
			Err(e) => return LoadResult::Invalid(e),
		};

		match self.format.parse::<SerializedSnapshot>(&bytes) {
			Ok(value) => LoadResult::Ok {
				value,
				info: LoadInfo {
					key,
					format: self.format.extension(),
					bytes: bytes.len(),
				},
			},
			Err(e) => LoadResult::Invalid(e),
		}
	}

	/// Encodes and writes a snapshot unconditionally.
	pub async fn save(&self, snapshot: &SerializedSnapshot) -> Result<(), PersistError> {
		let _guard = self.last_saved.lock().await;
		self.write(snapshot).await
	}

	/// Writes the store if its revision moved since the last save.
	///
	/// Returns `Ok(false)` when the save was skipped.
	pub async fn save_store(&self, store: &Store) -> Result<bool, PersistError> {
		let mut last_saved = self.last_saved.lock().await;
		// Read the revision before exporting: a concurrent write then only
		// causes one extra save later, never a missed one.
		let revision = store.revision();
		if *last_saved == Some(revision) {
			return Ok(false);
		}

		self.write(&store.export()).await?;
		*last_saved = Some(revision);
		tracing::debug!(key = %self.key(), revision, "snapshot persisted");
		Ok(true)
	}

	/// Records that the store at `revision` matches what is persisted.
	pub async fn mark_saved(&self, revision: u64) {
		*self.last_saved.lock().await = Some(revision);
	}

	async fn write(&self, snapshot: &SerializedSnapshot) -> Result<(), PersistError> {
		let blob = self.format.render(snapshot)?;
		self.adapter.save(&self.key(), &blob).await
	}
}

impl std::fmt::Debug for Persister {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Persister")
			.field("format", &self.format)
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::persist::MemoryPersistence;
	use crate::rules::Status;
	use crate::snapshot::ObservedState;

	#[tokio::test]
	async fn save_store_skips_unchanged_revision() {
		let memory = MemoryPersistence::new();
		let persister = Persister::new(memory.clone(), AnyFormat::Json);
		let store = Store::new();
		store.set("club-1", "7", ObservedState::new(Status::Pending, false));

		assert!(persister.save_store(&store).await.unwrap());
		assert!(!persister.save_store(&store).await.unwrap());

		store.set("club-1", "7", ObservedState::new(Status::Approved, false));
		assert!(persister.save_store(&store).await.unwrap());
		assert!(memory.get(&persister.key()).is_some());
	}

	#[tokio::test]
	async fn load_reports_missing_and_corrupt_blobs() {
		let memory = MemoryPersistence::new();
		let persister = Persister::new(memory.clone(), AnyFormat::Json);
		assert!(matches!(persister.load().await, LoadResult::NotFound));

		memory.insert(&persister.key(), b"{not json".to_vec());
		assert!(matches!(
			persister.load().await,
			LoadResult::Invalid(PersistError::Parse(_))
		));
	}

	#[test]
	fn builder_requires_adapter() {
		let err = Persister::builder().build().unwrap_err();
		assert!(matches!(err, PersistError::Custom(_)));
	}

	#[test]
	fn key_uses_format_extension() {
		let persister = Persister::builder()
			.adapter(MemoryPersistence::new())
			.name("club-snapshot")
			.build()
			.unwrap();
		assert_eq!(persister.key(), "club-snapshot.json");
	}
}
