/* src/poll/group.rs */

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::worker::{Cycle, save_after_reconcile};
use super::{CycleOutcome, ErrorCallback, PollConfig, PollTask, RemoteSource, WatchError};
use crate::engine::{DiffEngine, RawItem, ReconcileReport};
use crate::persist::Persister;

/// Manages one poll task per collection key.
///
/// Every write to a key, scheduled or manual, holds that key's cycle guard,
/// so one collection has a single writer at a time.
///
/// Clones share the same tasks. Tasks stop when the last clone is dropped.
#[derive(Clone)]
pub struct Poller {
	engine: DiffEngine,
	persister: Option<Arc<Persister>>,
	on_error: Option<ErrorCallback>,
	tasks: Arc<Mutex<HashMap<String, PollTask>>>,
	guards: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl Poller {
	pub fn new(engine: DiffEngine) -> Self {
		Self {
			engine,
			persister: None,
			on_error: None,
			tasks: Arc::new(Mutex::new(HashMap::new())),
			guards: Arc::new(Mutex::new(HashMap::new())),
		}
	}

	/// Saves the store after every completed cycle.
	pub fn with_persister(mut self, persister: Arc<Persister>) -> Self {
		self.persister = Some(persister);
		self
	}

	pub fn with_error_callback<F>(mut self, callback: F) -> Self
	where
		F: Fn(WatchError) + Send + Sync + 'static,
	{
		self.on_error = Some(Arc::new(callback));
		self
	}

	pub(crate) fn with_shared_error_callback(mut self, callback: Option<ErrorCallback>) -> Self {
		self.on_error = callback;
		self
	}

	pub fn engine(&self) -> &DiffEngine {
		&self.engine
	}

	/// Starts polling `collection`, replacing any task already running for it.
	///
	/// Returns `Ok(false)` when `config.enabled` is false; an existing task
	/// for the key is stopped in that case too.
	pub async fn start(
		&self,
		collection: impl Into<String>,
		source: impl RemoteSource + 'static,
		config: PollConfig,
	) -> Result<bool, WatchError> {
		config.check()?;
		let collection = collection.into();
		let mut tasks = self.tasks.lock().await;

		if !config.enabled {
			if tasks.remove(&collection).is_some() {
				tracing::info!(%collection, "polling disabled, task stopped");
			}
			return Ok(false);
		}

		let cycle = Arc::new(Cycle {
			collection: collection.clone(),
			source: Arc::new(source),
			engine: self.engine.clone(),
			persister: self.persister.clone(),
			on_error: self.on_error.clone(),
			timeout: config.timeout(),
			// Shared with any replaced task and with `reconcile_now`.
			guard: self.guard(&collection).await,
		});

		if tasks
			.insert(collection.clone(), PollTask::spawn(cycle, config))
			.is_some()
		{
			tracing::debug!(%collection, "replaced running poll task");
		}
		Ok(true)
	}

	/// Stops polling `collection`. Returns false if it was not running.
	pub async fn stop(&self, collection: &str) -> bool {
		let removed = self.tasks.lock().await.remove(collection);
		match removed {
			Some(task) => {
				task.stop();
				tracing::info!(collection, "polling stopped");
				true
			}
			None => false,
		}
	}

	/// Stops every task; returns how many were running.
	pub async fn stop_all(&self) -> usize {
		let drained: Vec<PollTask> = self.tasks.lock().await.drain().map(|(_, t)| t).collect();
		for task in &drained {
			task.stop();
		}
		drained.len()
	}

	/// Runs one cycle for `collection` right away. `None` if it is not polled.
	pub async fn poll_now(&self, collection: &str) -> Option<CycleOutcome> {
		let cycle = {
			let tasks = self.tasks.lock().await;
			tasks.get(collection).map(|task| task.cycle().clone())
		};
		match cycle {
			Some(cycle) => Some(cycle.run().await),
			None => None,
		}
	}

	/// Reconciles items fetched outside the scheduler, e.g. on a manual
	/// refresh, then persists like a cycle does.
	///
	/// Waits for a running cycle of the same key instead of skipping, so the
	/// items are never dropped and never diffed twice against the same state.
	pub async fn reconcile_now<I>(&self, collection: &str, items: I) -> ReconcileReport
	where
		I: IntoIterator<Item = RawItem>,
	{
		let guard = self.guard(collection).await;
		let _running = guard.lock().await;
		let report = self.engine.reconcile_report(collection, items);
		save_after_reconcile(
			&self.engine,
			self.persister.as_ref(),
			self.on_error.as_ref(),
			collection,
		)
		.await;
		report
	}

	async fn guard(&self, collection: &str) -> Arc<Mutex<()>> {
		let mut guards = self.guards.lock().await;
		guards.entry(collection.to_string()).or_default().clone()
	}

	pub async fn is_running(&self, collection: &str) -> bool {
		let tasks = self.tasks.lock().await;
		tasks.get(collection).is_some_and(|task| !task.is_finished())
	}

	/// Returns the keys currently polled, sorted.
	pub async fn list(&self) -> Vec<String> {
		let tasks = self.tasks.lock().await;
		let mut keys: Vec<String> = tasks.keys().cloned().collect();
		keys.sort();
		keys
	}
}

impl std::fmt::Debug for Poller {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Poller")
			.field("engine", &self.engine)
			.field("persister", &self.persister)
			.finish_non_exhaustive()
	}
}
