/* src/engine/transition.rs */

use std::time::SystemTime;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::rules::{Change, Field, Status};
use crate::snapshot::ItemId;

/// A notify-worthy change of one field of a previously seen item.
///
/// Constructed by the diff engine and consumed immediately by the notifier;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
	#[serde(rename = "collectionKey")]
	pub collection: String,
	pub id: ItemId,
	#[serde(flatten)]
	pub change: Change,
	pub observed_at: SystemTime,
	/// Domain fields of the raw item that produced this transition.
	pub details: Map<String, Value>,
}

impl Transition {
	pub fn field(&self) -> Field {
		self.change.field()
	}

	/// Returns true for a status change ending in `to`.
	pub fn is_status_to(&self, to: Status) -> bool {
		matches!(self.change, Change::Status { to: t, .. } if t == to)
	}

	/// Returns true for a payment flag turning on.
	pub fn is_payment_received(&self) -> bool {
		matches!(
			self.change,
			Change::IsPaid {
				from: false,
				to: true
			}
		)
	}

	/// First non-empty string detail among `keys`.
	pub fn detail_str(&self, keys: &[&str]) -> Option<&str> {
		keys.iter().find_map(|key| {
			self.details
				.get(*key)
				.and_then(Value::as_str)
				.filter(|s| !s.is_empty())
		})
	}
}
