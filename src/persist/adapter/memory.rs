/* src/persist/adapter/memory.rs */

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::super::{PersistError, PersistenceAdapter};

/// An in-memory adapter useful for testing and embedded environments.
///
/// Clones share the same storage, so a "restarted" engine can be handed a
/// clone of the adapter the previous one wrote to.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
	data: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryPersistence {
	/// Creates a new empty MemoryPersistence.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts data directly, bypassing any format.
	pub fn insert(&self, key: &str, value: Vec<u8>) {
		self.lock().insert(key.to_string(), value);
	}

	/// Returns a copy of the blob stored under `key`.
	pub fn get(&self, key: &str) -> Option<Vec<u8>> {
		self.lock().get(key).cloned()
	}

	fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
		self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

#[async_trait]
impl PersistenceAdapter for MemoryPersistence {
	async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
		Ok(self.get(key))
	}

	async fn save(&self, key: &str, blob: &[u8]) -> Result<(), PersistError> {
		self.insert(key, blob.to_vec());
		Ok(())
	}
}
