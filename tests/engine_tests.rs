/* tests/engine_tests.rs */

use std::sync::Arc;

use rosterwatch::engine::{DEFAULT_ID_FIELDS, DiffEngine, RawItem};
use rosterwatch::notify::{ChannelNotifier, Dispatcher, Severity};
use rosterwatch::rules::{Change, NotifyPolicy, Rule, Status, StatusTable};
use rosterwatch::snapshot::{ObservedState, Store};
use serde_json::json;

const KEY: &str = "my-registrations";

fn engine_with_channel() -> (DiffEngine, ChannelNotifier) {
	let channel = ChannelNotifier::new();
	let engine = DiffEngine::new(Arc::new(Store::new()))
		.with_dispatcher(Dispatcher::new(channel.clone()));
	(engine, channel)
}

#[test]
fn test_first_sight_then_exactly_once() {
	let (engine, channel) = engine_with_channel();
	let mut rx = channel.subscribe();

	engine.reconcile(KEY, vec![RawItem::new(42, "ChoDuyet").detail("clubName", "Chess")]);
	assert!(rx.try_recv().is_err());

	let approved = || vec![RawItem::new(42, "DaDuyet").detail("clubName", "Chess")];
	assert_eq!(engine.reconcile(KEY, approved()).len(), 1);
	assert!(engine.reconcile(KEY, approved()).is_empty());

	let notification = rx.try_recv().unwrap();
	assert_eq!(notification.message, "🎉 Chess was approved!");
	assert_eq!(notification.severity, Severity::Success);
	assert!(rx.try_recv().is_err());
}

#[test]
fn test_status_and_payment_are_independent() {
	let (engine, _channel) = engine_with_channel();
	engine.reconcile(KEY, vec![RawItem::new(7, "pending").paid(false)]);

	let transitions = engine.reconcile(KEY, vec![RawItem::new(7, "approved").paid(true)]);
	let changes: Vec<Change> = transitions.iter().map(|t| t.change).collect();
	assert_eq!(
		changes,
		vec![
			Change::Status {
				from: Status::Pending,
				to: Status::Approved
			},
			Change::IsPaid {
				from: false,
				to: true
			},
		]
	);
}

#[test]
fn test_non_notifyworthy_change_is_silent_but_recorded() {
	let (engine, channel) = engine_with_channel();
	let mut rx = channel.subscribe();
	engine.reconcile(KEY, vec![RawItem::new(1, "ChoDuyet")]);

	assert!(engine.reconcile(KEY, vec![RawItem::new(1, "TuChoi")]).is_empty());
	assert!(rx.try_recv().is_err());
	assert_eq!(
		engine.store().get(KEY, "1"),
		Some(ObservedState::new(Status::Rejected, false))
	);
}

#[test]
fn test_custom_policy_notifies_rejections() {
	let policy = NotifyPolicy::builder()
		.rule(Rule::Status {
			from: None,
			to: Status::Rejected,
		})
		.build();
	let engine = DiffEngine::new(Arc::new(Store::new())).with_policy(policy);
	engine.reconcile(KEY, vec![RawItem::new(1, "DangCho")]);

	let transitions = engine.reconcile(KEY, vec![RawItem::new(1, "Từ chối")]);
	assert_eq!(transitions.len(), 1);
	assert!(transitions[0].is_status_to(Status::Rejected));
}

#[test]
fn test_unknown_status_never_notifies() {
	let table = StatusTable::empty()
		.exact("waiting", Status::Pending)
		.build()
		.unwrap();
	let engine = DiffEngine::new(Arc::new(Store::new())).with_table(table);
	engine.reconcile(KEY, vec![RawItem::new(1, "waiting")]);

	assert!(engine.reconcile(KEY, vec![RawItem::new(1, "approved")]).is_empty());
	assert_eq!(engine.store().get(KEY, "1").unwrap().status, Status::Unknown);
}

#[test]
fn test_pruned_item_reappears_as_baseline() {
	let (engine, _channel) = engine_with_channel();
	engine.reconcile(KEY, vec![RawItem::new(1, "ChoDuyet"), RawItem::new(2, "ChoDuyet")]);

	let report = engine.reconcile_report(KEY, vec![RawItem::new(2, "ChoDuyet")]);
	assert_eq!(report.pruned.len(), 1);
	assert!(!engine.store().contains(KEY, "1"));

	let report = engine.reconcile_report(KEY, vec![RawItem::new(1, "DaDuyet"), RawItem::new(2, "ChoDuyet")]);
	assert!(report.transitions.is_empty());
	assert_eq!(report.baselined.len(), 1);
}

#[test]
fn test_collections_are_partitioned() {
	let (engine, _channel) = engine_with_channel();
	engine.reconcile("club-1", vec![RawItem::new(5, "ChoDuyet")]);
	engine.reconcile("club-2", vec![RawItem::new(5, "DaDuyet")]);

	assert_eq!(engine.store().get("club-1", "5").unwrap().status, Status::Pending);
	assert!(engine.reconcile("club-1", Vec::new()).is_empty());
	assert!(engine.store().contains("club-2", "5"));
	assert!(engine.store().collection("club-1").unwrap().is_empty());
}

#[test]
fn test_items_from_json_payload() {
	let (engine, _channel) = engine_with_channel();
	let first = json!([
		{ "subscriptionId": 11, "status": "ChoDuyet", "isPaid": 0, "studentName": "An" },
		{ "requestId": "r-2", "status": "DangCho" },
		{ "status": "DaDuyet" }
	]);
	let report = engine.reconcile_report(KEY, RawItem::from_array(&first));
	assert_eq!(report.baselined.len(), 2);
	assert_eq!(report.errors.len(), 1);

	let second = json!([
		{ "subscriptionId": 11, "status": "ChoDuyet", "isPaid": 1, "studentName": "An" },
		{ "requestId": "r-2", "status": "DangCho" }
	]);
	let items: Vec<RawItem> = second
		.as_array()
		.unwrap()
		.iter()
		.map(|value| RawItem::from_value(value, DEFAULT_ID_FIELDS))
		.collect();
	let transitions = engine.reconcile(KEY, items);
	assert_eq!(transitions.len(), 1);
	assert!(transitions[0].is_payment_received());
	assert_eq!(transitions[0].detail_str(&["studentName"]), Some("An"));
}
