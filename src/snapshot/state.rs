/* src/snapshot/state.rs */

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::rules::Status;

/// Opaque identifier of a tracked item, stable across fetches.
///
/// The remote API hands out both numeric and string ids; numbers are kept in
/// their decimal form so `42` and `"42"` name the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ItemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for ItemId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ItemId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for ItemId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

macro_rules! item_id_from_int {
	($($t:ty),*) => {
		$(impl From<$t> for ItemId {
			fn from(id: $t) -> Self {
				Self(id.to_string())
			}
		})*
	};
}

item_id_from_int!(i32, i64, u32, u64);

impl Serialize for ItemId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

struct ItemIdVisitor;

impl Visitor<'_> for ItemIdVisitor {
	type Value = ItemId;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a string or integer id")
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<ItemId, E> {
		Ok(ItemId::from(v))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<ItemId, E> {
		Ok(ItemId(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<ItemId, E> {
		Ok(ItemId::from(v))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<ItemId, E> {
		Ok(ItemId::from(v))
	}
}

impl<'de> Deserialize<'de> for ItemId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		// Binary formats cannot be asked for "any"; they always store the string form.
		if deserializer.is_human_readable() {
			deserializer.deserialize_any(ItemIdVisitor)
		} else {
			deserializer.deserialize_string(ItemIdVisitor)
		}
	}
}

/// Last-observed state of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservedState {
	pub status: Status,
	#[serde(rename = "isPaid", default)]
	pub is_paid: bool,
}

impl ObservedState {
	pub fn new(status: Status, is_paid: bool) -> Self {
		Self { status, is_paid }
	}
}

/// Persisted form of the whole snapshot:
/// `{ [collectionKey]: { [id]: { status, isPaid } } }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedSnapshot(pub BTreeMap<String, BTreeMap<ItemId, ObservedState>>);

impl SerializedSnapshot {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Total number of items across all collections.
	pub fn item_count(&self) -> usize {
		self.0.values().map(BTreeMap::len).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_and_string_ids_are_equal() {
		let a: ItemId = serde_json::from_str("42").unwrap();
		let b: ItemId = serde_json::from_str("\"42\"").unwrap();
		assert_eq!(a, b);
		assert_eq!(a, ItemId::from(42u64));
	}

	#[test]
	fn serialized_snapshot_shape() {
		let mut snapshot = SerializedSnapshot::new();
		snapshot.0.entry("club-7".to_string()).or_default().insert(
			ItemId::from(42),
			ObservedState::new(Status::Approved, true),
		);
		let json = serde_json::to_value(&snapshot).unwrap();
		assert_eq!(
			json,
			serde_json::json!({"club-7": {"42": {"status": "approved", "isPaid": true}}})
		);
		assert_eq!(snapshot.item_count(), 1);
	}

	#[test]
	fn missing_is_paid_defaults_to_false() {
		let state: ObservedState = serde_json::from_str(r#"{"status": "pending"}"#).unwrap();
		assert_eq!(state, ObservedState::new(Status::Pending, false));
	}
}
