/* src/poll/task.rs */

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::worker::{Cycle, run_loop};
use super::PollConfig;

/// A running poll loop for one collection. Dropping it stops the loop.
pub(crate) struct PollTask {
	cycle: Arc<Cycle>,
	config: PollConfig,
	handle: JoinHandle<()>,
}

impl PollTask {
	#[must_use = "PollTask must be kept alive"]
	pub(crate) fn spawn(cycle: Arc<Cycle>, config: PollConfig) -> Self {
		let handle = tokio::spawn(run_loop(cycle.clone(), config.clone()));
		Self {
			cycle,
			config,
			handle,
		}
	}

	pub(crate) fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}

	/// Aborts the loop; an in-flight fetch is cancelled at its await point.
	pub(crate) fn stop(&self) {
		self.handle.abort();
	}

	pub(crate) fn cycle(&self) -> &Arc<Cycle> {
		&self.cycle
	}
}

impl Drop for PollTask {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

impl std::fmt::Debug for PollTask {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PollTask")
			.field("collection", &self.cycle.collection)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
