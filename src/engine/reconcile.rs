/* src/engine/reconcile.rs */

use std::collections::{HashMap, HashSet};
use std::time::SystemTime;

use serde_json::{Map, Value};

use super::{DiffEngine, ParseError, RawItem, Transition};
use crate::rules::Change;
use crate::snapshot::{ItemId, ObservedState};

/// Everything one reconcile pass did.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
	/// Notify-worthy transitions, in fetch order.
	pub transitions: Vec<Transition>,
	/// Ids recorded for the first time.
	pub baselined: Vec<ItemId>,
	/// Known ids whose stored state changed, notified or not.
	pub updated: Vec<ItemId>,
	/// Ids dropped because the fetch no longer returned them.
	pub pruned: Vec<ItemId>,
	/// Items that were skipped.
	pub errors: Vec<ParseError>,
}

impl ReconcileReport {
	/// Returns true if the pass left the snapshot untouched.
	pub fn is_noop(&self) -> bool {
		self.baselined.is_empty() && self.updated.is_empty() && self.pruned.is_empty()
	}
}

struct Normalized {
	id: ItemId,
	state: ObservedState,
	details: Map<String, Value>,
}

fn changes(old: ObservedState, new: ObservedState) -> impl Iterator<Item = Change> {
	let status = (old.status != new.status).then_some(Change::Status {
		from: old.status,
		to: new.status,
	});
	let paid = (old.is_paid != new.is_paid).then_some(Change::IsPaid {
		from: old.is_paid,
		to: new.is_paid,
	});
	status.into_iter().chain(paid)
}

impl DiffEngine {
	/// Reconciles one successful fetch of `collection` and returns the
	/// transitions that were dispatched.
	pub fn reconcile<I>(&self, collection: &str, items: I) -> Vec<Transition>
	where
		I: IntoIterator<Item = RawItem>,
	{
		self.reconcile_report(collection, items).transitions
	}

	/// Like [`reconcile`](Self::reconcile), returning the full report.
	pub fn reconcile_report<I>(&self, collection: &str, items: I) -> ReconcileReport
	where
		I: IntoIterator<Item = RawItem>,
	{
		let observed_at = SystemTime::now();
		let mut report = ReconcileReport::default();
		let mut present: HashSet<ItemId> = HashSet::new();
		let mut latest: Vec<Normalized> = Vec::new();
		let mut positions: HashMap<ItemId, usize> = HashMap::new();

		for (index, item) in items.into_iter().enumerate() {
			let Some(id) = item.id else {
				tracing::warn!(collection, index, "dropping item without id");
				report.errors.push(ParseError::MissingId { index });
				continue;
			};
			// An unreadable item is still present remotely; keep its baseline.
			present.insert(id.clone());

			let Some(raw_status) = item.status else {
				tracing::warn!(collection, id = %id, "dropping item without status");
				report.errors.push(ParseError::MissingStatus { id });
				continue;
			};

			let normalized = Normalized {
				state: ObservedState::new(
					self.table.normalize(&raw_status),
					item.is_paid.unwrap_or(false),
				),
				id: id.clone(),
				details: item.details,
			};
			// Last occurrence of a duplicated id wins.
			match positions.get(&id) {
				Some(&pos) => latest[pos] = normalized,
				None => {
					positions.insert(id, latest.len());
					latest.push(normalized);
				}
			}
		}

		self.store.touch_collection(collection);

		for Normalized { id, state, details } in latest {
			match self.store.get(collection, id.as_str()) {
				None => {
					self.store.set(collection, id.clone(), state);
					report.baselined.push(id);
				}
				Some(previous) if previous == state => {}
				Some(previous) => {
					for change in changes(previous, state) {
						if self.policy.is_notifyworthy(&change) {
							report.transitions.push(Transition {
								collection: collection.to_string(),
								id: id.clone(),
								change,
								observed_at,
								details: details.clone(),
							});
						} else {
							tracing::debug!(collection, id = %id, ?change, "silent change");
						}
					}
					self.store.set(collection, id.clone(), state);
					report.updated.push(id);
				}
			}
		}

		report.pruned = self.store.remove_missing(collection, &present);

		if let Some(dispatcher) = &self.dispatcher {
			dispatcher.dispatch(&report.transitions);
		}

		tracing::debug!(
			collection,
			transitions = report.transitions.len(),
			baselined = report.baselined.len(),
			updated = report.updated.len(),
			pruned = report.pruned.len(),
			skipped = report.errors.len(),
			"reconciled"
		);

		report
	}
}
