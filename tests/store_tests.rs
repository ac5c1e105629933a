/* tests/store_tests.rs */

use std::collections::HashSet;

use rosterwatch::rules::Status;
use rosterwatch::snapshot::{ItemId, ObservedState, SerializedSnapshot, Store};

fn pending() -> ObservedState {
	ObservedState::new(Status::Pending, false)
}

#[test]
fn test_store_set_get() {
	let store = Store::new();
	assert_eq!(store.set("club-1", 7, pending()), None);
	assert_eq!(store.get("club-1", "7"), Some(pending()));
	assert_eq!(store.get("club-2", "7"), None);
	assert_eq!(store.len(), 1);
}

#[test]
fn test_store_unchanged_set_keeps_revision() {
	let store = Store::new();
	store.set("club-1", 7, pending());
	let revision = store.revision();

	assert_eq!(store.set("club-1", 7, pending()), Some(pending()));
	assert_eq!(store.revision(), revision);

	store.set("club-1", 7, ObservedState::new(Status::Approved, false));
	assert!(store.revision() > revision);
}

#[test]
fn test_store_remove_missing() {
	let store = Store::new();
	for id in 1..=3 {
		store.set("club-1", id, pending());
	}
	store.set("club-2", 1, pending());

	let present: HashSet<ItemId> = [ItemId::from(2)].into_iter().collect();
	let mut pruned = store.remove_missing("club-1", &present);
	pruned.sort();
	assert_eq!(pruned, vec![ItemId::from(1), ItemId::from(3)]);
	assert!(store.contains("club-2", "1"));
	assert_eq!(store.len(), 2);
}

#[test]
fn test_store_export_replace() {
	let store = Store::new();
	store.set("club-1", "a", pending());
	store.set("club-1", "b", ObservedState::new(Status::Left, true));
	let exported = store.export();
	assert_eq!(exported.item_count(), 2);

	let restored = Store::new();
	restored.replace_all(exported.clone());
	assert_eq!(restored.export(), exported);
	assert_eq!(restored.collections(), vec!["club-1".to_string()]);

	restored.replace_all(SerializedSnapshot::new());
	assert!(restored.is_empty());
}

#[test]
fn test_store_clear_collection() {
	let store = Store::new();
	store.set("club-1", 1, pending());
	store.set("club-1", 2, pending());
	assert_eq!(store.clear_collection("club-1"), 2);
	assert_eq!(store.remove("club-1", "1"), None);
	assert!(store.is_empty());
}

#[cfg(feature = "events")]
#[tokio::test]
async fn test_store_events() {
	use rosterwatch::snapshot::StoreEvent;

	let store = Store::new();
	let mut rx = store.subscribe();

	store.set("club-1", 1, pending());
	store.set("club-1", 1, ObservedState::new(Status::Approved, false));
	store.remove_missing("club-1", &HashSet::new());

	assert!(matches!(rx.recv().await.unwrap(), StoreEvent::Baseline { .. }));
	match rx.recv().await.unwrap() {
		StoreEvent::Changed { old, new, .. } => {
			assert_eq!(old.status, Status::Pending);
			assert_eq!(new.status, Status::Approved);
		}
		other => panic!("unexpected event {other:?}"),
	}
	assert!(matches!(rx.recv().await.unwrap(), StoreEvent::Pruned { .. }));
}
