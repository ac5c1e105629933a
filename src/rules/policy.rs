/* src/rules/policy.rs */

use serde::{Deserialize, Serialize};

use super::Status;

/// Tracked field of an observed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
	Status,
	IsPaid,
}

/// A single-field change between two observations of the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum Change {
	Status { from: Status, to: Status },
	IsPaid { from: bool, to: bool },
}

impl Change {
	pub fn field(&self) -> Field {
		match self {
			Self::Status { .. } => Field::Status,
			Self::IsPaid { .. } => Field::IsPaid,
		}
	}

	fn touches_unknown(&self) -> bool {
		matches!(
			self,
			Self::Status {
				from: Status::Unknown,
				..
			} | Self::Status {
				to: Status::Unknown,
				..
			}
		)
	}
}

/// One entry of the notification policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
	/// A status change into `to`; `from: None` matches any known origin.
	Status { from: Option<Status>, to: Status },
	/// A payment flag flip.
	IsPaid { from: bool, to: bool },
}

impl Rule {
	fn matches(&self, change: &Change) -> bool {
		match (self, change) {
			(Rule::Status { from, to }, Change::Status { from: f, to: t }) => {
				to == t && from.is_none_or(|from| from == *f)
			}
			(Rule::IsPaid { from, to }, Change::IsPaid { from: f, to: t }) => from == f && to == t,
			_ => false,
		}
	}
}

const STANDARD_RULES: &[Rule] = &[
	Rule::Status {
		from: Some(Status::Pending),
		to: Status::Approved,
	},
	Rule::IsPaid {
		from: false,
		to: true,
	},
];

/// Decides which changes are user-facing.
///
/// Changes not covered by a rule are still recorded in the snapshot; they
/// just never reach the notifier. Changes from or to [`Status::Unknown`] are
/// never notify-worthy.
#[derive(Debug, Clone)]
pub struct NotifyPolicy {
	rules: Vec<Rule>,
}

impl NotifyPolicy {
	/// Starts from the standard rules (`Pending -> Approved`, `isPaid false -> true`).
	pub fn builder() -> NotifyPolicyBuilder {
		NotifyPolicyBuilder {
			rules: STANDARD_RULES.to_vec(),
		}
	}

	/// Starts from an empty rule set.
	pub fn empty() -> NotifyPolicyBuilder {
		NotifyPolicyBuilder { rules: Vec::new() }
	}

	pub fn is_notifyworthy(&self, change: &Change) -> bool {
		if change.touches_unknown() {
			return false;
		}
		self.rules.iter().any(|rule| rule.matches(change))
	}

	pub fn rules(&self) -> &[Rule] {
		&self.rules
	}
}

impl Default for NotifyPolicy {
	fn default() -> Self {
		Self::builder().build()
	}
}

/// Builder for [`NotifyPolicy`].
#[derive(Debug, Clone)]
pub struct NotifyPolicyBuilder {
	rules: Vec<Rule>,
}

impl NotifyPolicyBuilder {
	pub fn rule(mut self, rule: Rule) -> Self {
		if !self.rules.contains(&rule) {
			self.rules.push(rule);
		}
		self
	}

	pub fn build(self) -> NotifyPolicy {
		NotifyPolicy { rules: self.rules }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn status(from: Status, to: Status) -> Change {
		Change::Status { from, to }
	}

	#[test]
	fn standard_rules() {
		let policy = NotifyPolicy::default();
		assert!(policy.is_notifyworthy(&status(Status::Pending, Status::Approved)));
		assert!(policy.is_notifyworthy(&Change::IsPaid {
			from: false,
			to: true
		}));

		assert!(!policy.is_notifyworthy(&status(Status::Pending, Status::Rejected)));
		assert!(!policy.is_notifyworthy(&status(Status::Approved, Status::Left)));
		assert!(!policy.is_notifyworthy(&status(Status::Rejected, Status::Approved)));
		assert!(!policy.is_notifyworthy(&Change::IsPaid {
			from: true,
			to: false
		}));
	}

	#[test]
	fn unknown_is_never_notifyworthy() {
		let policy = NotifyPolicy::builder()
			.rule(Rule::Status {
				from: None,
				to: Status::Approved,
			})
			.build();
		assert!(policy.is_notifyworthy(&status(Status::Rejected, Status::Approved)));
		assert!(!policy.is_notifyworthy(&status(Status::Unknown, Status::Approved)));

		let policy = NotifyPolicy::empty()
			.rule(Rule::Status {
				from: None,
				to: Status::Unknown,
			})
			.build();
		assert!(!policy.is_notifyworthy(&status(Status::Pending, Status::Unknown)));
	}

	#[test]
	fn empty_policy_notifies_nothing() {
		let policy = NotifyPolicy::empty().build();
		assert!(!policy.is_notifyworthy(&status(Status::Pending, Status::Approved)));
	}

	#[test]
	fn duplicate_rules_are_collapsed() {
		let policy = NotifyPolicy::builder()
			.rule(Rule::IsPaid {
				from: false,
				to: true,
			})
			.build();
		assert_eq!(policy.rules().len(), STANDARD_RULES.len());
	}

	#[test]
	fn change_serializes_with_field_tag() {
		let json = serde_json::to_value(status(Status::Pending, Status::Approved)).unwrap();
		assert_eq!(
			json,
			serde_json::json!({"field": "status", "from": "pending", "to": "approved"})
		);
		let json = serde_json::to_value(Change::IsPaid {
			from: false,
			to: true,
		})
		.unwrap();
		assert_eq!(json["field"], "isPaid");
	}
}
