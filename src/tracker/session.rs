/* src/tracker/session.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::TrackerError;
use crate::engine::{DiffEngine, RawItem, Transition};
use crate::persist::{LoadInfo, LoadResult, PersistError, Persister};
use crate::poll::{CycleOutcome, ErrorCallback, PollConfig, Poller, RemoteSource, WatchError};
use crate::snapshot::Store;

/// What [`Tracker::load`] found.
#[derive(Debug)]
pub enum LoadOutcome {
	/// A persisted snapshot replaced the store.
	Restored { items: usize, info: LoadInfo },
	/// Nothing persisted, or no persister configured.
	Fresh,
	/// A persisted blob existed but could not be used; the store was left empty.
	Discarded(PersistError),
}

/// One tracking session: snapshot store, diff engine, persister and poller.
pub struct Tracker {
	engine: DiffEngine,
	persister: Option<Arc<Persister>>,
	poller: Poller,
	loaded: AtomicBool,
}

/// Builder for [`Tracker`].
#[derive(Default)]
pub struct TrackerBuilder {
	store: Option<Arc<Store>>,
	engine: Option<DiffEngine>,
	persister: Option<Arc<Persister>>,
	on_error: Option<ErrorCallback>,
}

impl TrackerBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn store(mut self, store: Arc<Store>) -> Self {
		self.store = Some(store);
		self
	}

	/// Uses a preconfigured engine, e.g. one with a dispatcher attached.
	pub fn engine(mut self, engine: DiffEngine) -> Self {
		self.engine = Some(engine);
		self
	}

	pub fn persister(mut self, persister: Persister) -> Self {
		self.persister = Some(Arc::new(persister));
		self
	}

	pub fn on_error<F>(mut self, callback: F) -> Self
	where
		F: Fn(WatchError) + Send + Sync + 'static,
	{
		self.on_error = Some(Arc::new(callback));
		self
	}

	pub fn build(self) -> Result<Tracker, TrackerError> {
		let engine = match (self.engine, self.store) {
			(Some(engine), Some(store)) => {
				if !Arc::ptr_eq(engine.store(), &store) {
					return Err(TrackerError::Builder(
						"engine and store must share the same Store".to_string(),
					));
				}
				engine
			}
			(Some(engine), None) => engine,
			(None, store) => DiffEngine::new(store.unwrap_or_default()),
		};

		let mut poller = Poller::new(engine.clone()).with_shared_error_callback(self.on_error);
		if let Some(persister) = &self.persister {
			poller = poller.with_persister(persister.clone());
		}

		Ok(Tracker {
			engine,
			persister: self.persister,
			poller,
			loaded: AtomicBool::new(false),
		})
	}
}

impl Tracker {
	pub fn builder() -> TrackerBuilder {
		TrackerBuilder::new()
	}

	/// In-memory session without persistence.
	pub fn new(engine: DiffEngine) -> Self {
		Self {
			poller: Poller::new(engine.clone()),
			engine,
			persister: None,
			loaded: AtomicBool::new(false),
		}
	}

	pub fn store(&self) -> &Arc<Store> {
		self.engine.store()
	}

	pub fn engine(&self) -> &DiffEngine {
		&self.engine
	}

	pub fn poller(&self) -> &Poller {
		&self.poller
	}

	pub fn is_loaded(&self) -> bool {
		self.loaded.load(Ordering::Acquire)
	}

	/// Restores the persisted snapshot. Never fails: an unreadable blob is
	/// logged and the session starts empty.
	pub async fn load(&self) -> LoadOutcome {
		let outcome = match &self.persister {
			None => LoadOutcome::Fresh,
			Some(persister) => match persister.load().await {
				LoadResult::Ok { value, info } => {
					let items = value.item_count();
					self.store().replace_all(value);
					persister.mark_saved(self.store().revision()).await;
					tracing::info!(key = %info.key, items, "snapshot restored");
					LoadOutcome::Restored { items, info }
				}
				LoadResult::NotFound => {
					tracing::debug!(key = %persister.key(), "no persisted snapshot, starting fresh");
					LoadOutcome::Fresh
				}
				LoadResult::Invalid(e) => {
					tracing::warn!(key = %persister.key(), error = %e, "discarding unreadable snapshot");
					LoadOutcome::Discarded(e)
				}
			},
		};
		self.loaded.store(true, Ordering::Release);
		outcome
	}

	/// Saves the store if it changed since the last save. `Ok(false)` if
	/// nothing was written.
	pub async fn persist(&self) -> Result<bool, TrackerError> {
		match &self.persister {
			Some(persister) => Ok(persister.save_store(self.store()).await?),
			None => Ok(false),
		}
	}

	/// Starts polling `collection`; see [`Poller::start`].
	pub async fn watch(
		&self,
		collection: impl Into<String>,
		source: impl RemoteSource + 'static,
		config: PollConfig,
	) -> Result<bool, TrackerError> {
		if !self.is_loaded() {
			return Err(TrackerError::NotLoaded);
		}
		Ok(self.poller.start(collection, source, config).await?)
	}

	pub async fn unwatch(&self, collection: &str) -> bool {
		self.poller.stop(collection).await
	}

	pub async fn poll_now(&self, collection: &str) -> Option<CycleOutcome> {
		self.poller.poll_now(collection).await
	}

	pub async fn watching(&self) -> Vec<String> {
		self.poller.list().await
	}

	/// Reconciles items fetched outside the scheduler, e.g. on a manual
	/// refresh; see [`Poller::reconcile_now`].
	pub async fn reconcile<I>(&self, collection: &str, items: I) -> Vec<Transition>
	where
		I: IntoIterator<Item = RawItem>,
	{
		self.poller.reconcile_now(collection, items).await.transitions
	}

	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::snapshot::StoreEvent> {
		self.store().subscribe()
	}

	/// Stops every poll task, then persists one last time.
	pub async fn shutdown(&self) -> Result<(), TrackerError> {
		let stopped = self.poller.stop_all().await;
		tracing::info!(stopped, "tracker shutting down");
		self.persist().await?;
		Ok(())
	}
}

impl std::fmt::Debug for Tracker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Tracker")
			.field("engine", &self.engine)
			.field("persister", &self.persister)
			.field("loaded", &self.is_loaded())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::persist::{AnyFormat, MemoryPersistence};

	#[tokio::test]
	async fn watch_requires_load() {
		let tracker = Tracker::builder().build().unwrap();
		let source = crate::poll::source_fn(|_key: String| async {
			Ok::<_, crate::poll::FetchError>(Vec::new())
		});
		assert!(matches!(
			tracker.watch("club-1", source, PollConfig::default()).await,
			Err(TrackerError::NotLoaded)
		));
	}

	#[tokio::test]
	async fn corrupt_snapshot_is_discarded() {
		let memory = MemoryPersistence::new();
		let persister = Persister::new(memory.clone(), AnyFormat::Json);
		memory.insert(&persister.key(), b"[1, 2".to_vec());

		let tracker = Tracker::builder().persister(persister).build().unwrap();
		assert!(matches!(tracker.load().await, LoadOutcome::Discarded(_)));
		assert!(tracker.is_loaded());
		assert!(tracker.store().is_empty());
	}

	#[test]
	fn mismatched_engine_and_store_are_rejected() {
		let engine = DiffEngine::new(Arc::new(Store::new()));
		let result = Tracker::builder()
			.engine(engine)
			.store(Arc::new(Store::new()))
			.build();
		assert!(matches!(result, Err(TrackerError::Builder(_))));
	}
}
