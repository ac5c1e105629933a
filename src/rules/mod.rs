/* src/rules/mod.rs */

//!
//! Transition rules: canonical lifecycle states and the notification policy.
//!
//! - [`StatusTable`] maps raw status strings from the remote API to [`Status`].
//! - [`NotifyPolicy`] decides which observed changes are user-facing.

mod error;
mod policy;
mod status;

pub use error::RulesError;
pub use policy::{Change, Field, NotifyPolicy, NotifyPolicyBuilder, Rule};
pub use status::{StatusTable, StatusTableBuilder};

use serde::{Deserialize, Serialize};

/// Canonical lifecycle state of a tracked registration or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	/// Waiting for a leader or admin decision.
	Pending,
	/// Accepted.
	Approved,
	/// Declined.
	Rejected,
	/// The member left the club or cancelled the request.
	Left,
	/// The raw value did not match any known spelling.
	#[default]
	Unknown,
}

impl Status {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Approved => "approved",
			Self::Rejected => "rejected",
			Self::Left => "left",
			Self::Unknown => "unknown",
		}
	}
}

impl std::fmt::Display for Status {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
