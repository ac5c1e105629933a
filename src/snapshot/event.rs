/* src/snapshot/event.rs */

use super::{ItemId, ObservedState};

/// Events emitted by the store on snapshot changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
	/// An item was seen for the first time.
	Baseline {
		collection: String,
		id: ItemId,
		state: ObservedState,
	},
	/// A known item changed.
	Changed {
		collection: String,
		id: ItemId,
		old: ObservedState,
		new: ObservedState,
	},
	/// An item disappeared from its collection and was dropped.
	Pruned {
		collection: String,
		id: ItemId,
		state: ObservedState,
	},
	/// The whole snapshot was replaced from persisted state.
	Restored { collections: usize, items: usize },
}
