/* src/poll/worker.rs */

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};

use super::{CycleOutcome, ErrorCallback, FetchError, PollConfig, RemoteSource, WatchError};
use crate::engine::DiffEngine;
use crate::persist::Persister;

/// Everything one key's cycles need.
pub(crate) struct Cycle {
	pub(crate) collection: String,
	pub(crate) source: Arc<dyn RemoteSource>,
	pub(crate) engine: DiffEngine,
	pub(crate) persister: Option<Arc<Persister>>,
	pub(crate) on_error: Option<ErrorCallback>,
	pub(crate) timeout: Duration,
	/// Held for the whole cycle; shared with any task that replaces this one.
	pub(crate) guard: Arc<Mutex<()>>,
}

impl Cycle {
	/// Runs fetch → reconcile → persist once, unless a cycle is in flight.
	pub(crate) async fn run(&self) -> CycleOutcome {
		let Ok(_running) = self.guard.try_lock() else {
			tracing::debug!(collection = %self.collection, "cycle still running, skipping");
			return CycleOutcome::Skipped;
		};

		let fetched = tokio::time::timeout(self.timeout, self.source.fetch(&self.collection)).await;
		let items = match fetched {
			Ok(Ok(items)) => items,
			Ok(Err(e)) => return self.fetch_failed(e),
			Err(_) => return self.fetch_failed(FetchError::Timeout(self.timeout)),
		};

		let report = self.engine.reconcile_report(&self.collection, items);

		save_after_reconcile(
			&self.engine,
			self.persister.as_ref(),
			self.on_error.as_ref(),
			&self.collection,
		)
		.await;

		CycleOutcome::Completed(report)
	}

	fn fetch_failed(&self, error: FetchError) -> CycleOutcome {
		tracing::warn!(collection = %self.collection, error = %error, "fetch failed, snapshot untouched");
		self.report(WatchError::Fetch {
			collection: self.collection.clone(),
			source: error.clone(),
		});
		CycleOutcome::Failed(error)
	}

	fn report(&self, error: WatchError) {
		report_error(self.on_error.as_ref(), error);
	}
}

fn report_error(on_error: Option<&ErrorCallback>, error: WatchError) {
	if let Some(callback) = on_error {
		callback(error);
	}
}

/// Persists the store after a reconcile. Failures are logged and reported,
/// never returned; the in-memory snapshot stays authoritative.
pub(crate) async fn save_after_reconcile(
	engine: &DiffEngine,
	persister: Option<&Arc<Persister>>,
	on_error: Option<&ErrorCallback>,
	collection: &str,
) {
	let Some(persister) = persister else {
		return;
	};
	if let Err(e) = persister.save_store(engine.store()).await {
		tracing::error!(collection, error = %e, "failed to persist snapshot");
		report_error(on_error, WatchError::Persist(e));
	}
}

/// Repeats cycles until the task is aborted.
pub(crate) async fn run_loop(cycle: Arc<Cycle>, config: PollConfig) {
	let interval = config.interval();
	let start = if config.immediate {
		Instant::now()
	} else {
		Instant::now() + interval
	};

	let mut ticker = tokio::time::interval_at(start, interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

	tracing::info!(collection = %cycle.collection, ?interval, "polling started");
	loop {
		ticker.tick().await;
		if let CycleOutcome::Completed(report) = cycle.run().await {
			if !report.is_noop() {
				tracing::debug!(
					collection = %cycle.collection,
					transitions = report.transitions.len(),
					"cycle completed"
				);
			}
		}
	}
}
