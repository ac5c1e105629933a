/* src/engine/item.rs */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::snapshot::ItemId;

/// Id fields tried, in order, by [`RawItem::from_value`].
///
/// Registrations carry `subscriptionId`, club-open requests `requestId`;
/// both fall back to `id`.
pub const DEFAULT_ID_FIELDS: &[&str] = &["subscriptionId", "requestId", "id"];

/// One entry of a fetched collection, before normalization.
///
/// Everything except `id`, `status` and `isPaid` is kept in `details` and
/// travels with emitted transitions, so message templates can mention the
/// club or student by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
	#[serde(default)]
	pub id: Option<ItemId>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(rename = "isPaid", default)]
	pub is_paid: Option<bool>,
	#[serde(flatten)]
	pub details: Map<String, Value>,
}

impl RawItem {
	pub fn new(id: impl Into<ItemId>, status: impl Into<String>) -> Self {
		Self {
			id: Some(id.into()),
			status: Some(status.into()),
			is_paid: None,
			details: Map::new(),
		}
	}

	pub fn paid(mut self, is_paid: bool) -> Self {
		self.is_paid = Some(is_paid);
		self
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.details.insert(key.into(), value.into());
		self
	}

	/// Extracts an item from a loosely-typed API object.
	///
	/// The id is the first non-null field of `id_fields`. `isPaid` follows
	/// JavaScript truthiness, which is what the remote API's consumers rely
	/// on. Non-object values yield an item without id, which reconcile drops.
	pub fn from_value(value: &Value, id_fields: &[&str]) -> Self {
		let Some(object) = value.as_object() else {
			return Self::default();
		};

		let id_field = id_fields
			.iter()
			.find(|field| object.get(**field).is_some_and(|v| !v.is_null()));
		let id = id_field.and_then(|field| match object.get(*field) {
			Some(Value::String(s)) if !s.is_empty() => Some(ItemId::new(s.clone())),
			Some(Value::Number(n)) => Some(ItemId::new(n.to_string())),
			_ => None,
		});

		let status = match object.get("status") {
			Some(Value::String(s)) => Some(s.clone()),
			_ => None,
		};

		let is_paid = match object.get("isPaid") {
			None | Some(Value::Null) => None,
			Some(Value::Bool(b)) => Some(*b),
			Some(Value::Number(n)) => Some(n.as_f64().is_some_and(|n| n != 0.0)),
			Some(Value::String(s)) => Some(!s.is_empty()),
			Some(_) => Some(true),
		};

		let details = object
			.iter()
			.filter(|(key, _)| {
				key.as_str() != "status"
					&& key.as_str() != "isPaid"
					&& id_field.is_none_or(|field| key.as_str() != *field)
			})
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect();

		Self {
			id,
			status,
			is_paid,
			details,
		}
	}

	/// Extracts every element of a JSON array with [`DEFAULT_ID_FIELDS`].
	pub fn from_array(value: &Value) -> Vec<Self> {
		value
			.as_array()
			.map(|items| {
				items
					.iter()
					.map(|item| Self::from_value(item, DEFAULT_ID_FIELDS))
					.collect()
			})
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn picks_first_present_id_field() {
		let item = RawItem::from_value(
			&json!({"subscriptionId": 12, "id": 99, "status": "ChoDuyet", "clubName": "Chess"}),
			DEFAULT_ID_FIELDS,
		);
		assert_eq!(item.id, Some(ItemId::from(12)));
		assert_eq!(item.status.as_deref(), Some("ChoDuyet"));
		assert_eq!(item.details.get("clubName"), Some(&json!("Chess")));
		assert_eq!(item.details.get("id"), Some(&json!(99)));
		assert!(!item.details.contains_key("subscriptionId"));
	}

	#[test]
	fn falls_back_past_null_ids() {
		let item = RawItem::from_value(
			&json!({"requestId": null, "id": "r-1", "status": "DangCho"}),
			DEFAULT_ID_FIELDS,
		);
		assert_eq!(item.id, Some(ItemId::from("r-1")));
	}

	#[test]
	fn is_paid_follows_truthiness() {
		let cases = [
			(json!(true), Some(true)),
			(json!(0), Some(false)),
			(json!(1), Some(true)),
			(json!(""), Some(false)),
			(json!(null), None),
		];
		for (raw, expected) in cases {
			let item = RawItem::from_value(&json!({"id": 1, "isPaid": raw}), DEFAULT_ID_FIELDS);
			assert_eq!(item.is_paid, expected);
		}
	}

	#[test]
	fn non_objects_have_no_id() {
		assert_eq!(RawItem::from_value(&json!(42), DEFAULT_ID_FIELDS).id, None);
		assert!(RawItem::from_array(&json!({"not": "an array"})).is_empty());
	}

	#[test]
	fn deserializes_api_shape() {
		let item: RawItem = serde_json::from_value(json!({
			"id": 42,
			"status": "DaDuyet",
			"isPaid": true,
			"studentName": "An"
		}))
		.unwrap();
		assert_eq!(item.id, Some(ItemId::from(42)));
		assert_eq!(item.is_paid, Some(true));
		assert_eq!(item.details.get("studentName"), Some(&json!("An")));
	}
}
