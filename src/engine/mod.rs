/* src/engine/mod.rs */

//!
//! Snapshot-diff engine.
//!
//! [`DiffEngine::reconcile`] compares a freshly fetched collection with the
//! snapshot store, records the new states and hands notify-worthy
//! [`Transition`]s to the dispatcher. An id seen for the first time is only
//! recorded as a baseline.

mod error;
mod item;
mod reconcile;
mod transition;

pub use error::ParseError;
pub use item::{DEFAULT_ID_FIELDS, RawItem};
pub use reconcile::ReconcileReport;
pub use transition::Transition;

use std::sync::Arc;

use crate::notify::Dispatcher;
use crate::rules::{NotifyPolicy, StatusTable};
use crate::snapshot::Store;

/// Compares fetched collections against the snapshot store.
///
/// Cheap to clone; clones share the store, the status table and the
/// dispatcher.
#[derive(Clone)]
pub struct DiffEngine {
	store: Arc<Store>,
	table: Arc<StatusTable>,
	policy: Arc<NotifyPolicy>,
	dispatcher: Option<Arc<Dispatcher>>,
}

impl DiffEngine {
	/// Creates an engine with the standard status table and policy and no
	/// dispatcher.
	pub fn new(store: Arc<Store>) -> Self {
		Self {
			store,
			table: Arc::new(StatusTable::default()),
			policy: Arc::new(NotifyPolicy::default()),
			dispatcher: None,
		}
	}

	pub fn with_table(mut self, table: StatusTable) -> Self {
		self.table = Arc::new(table);
		self
	}

	pub fn with_policy(mut self, policy: NotifyPolicy) -> Self {
		self.policy = Arc::new(policy);
		self
	}

	/// Transitions are dispatched inline by every reconcile call.
	pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
		self.dispatcher = Some(Arc::new(dispatcher));
		self
	}

	pub fn store(&self) -> &Arc<Store> {
		&self.store
	}

	pub fn table(&self) -> &StatusTable {
		&self.table
	}

	pub fn policy(&self) -> &NotifyPolicy {
		&self.policy
	}
}

impl std::fmt::Debug for DiffEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DiffEngine")
			.field("store", &self.store)
			.field("policy", &self.policy)
			.field("dispatcher", &self.dispatcher.is_some())
			.finish_non_exhaustive()
	}
}
