/* src/notify/dispatcher.rs */

use std::sync::Arc;

use super::{Message, Notifier, Severity};
use crate::engine::Transition;
use crate::rules::{Change, Status};

/// Turns a transition into a message; `None` suppresses it.
pub type Formatter = Arc<dyn Fn(&Transition) -> Option<Message> + Send + Sync>;

const NAME_KEYS: &[&str] = &["clubName", "proposedName", "name"];
const PAYER_KEYS: &[&str] = &["studentName", "fullName", "memberName"];

/// Built-in wording, used when no formatter is configured.
pub fn default_message(transition: &Transition) -> Option<Message> {
	let subject = transition
		.detail_str(NAME_KEYS)
		.map(str::to_string)
		.unwrap_or_else(|| format!("request {}", transition.id));

	let message = match transition.change {
		Change::Status {
			to: Status::Approved,
			..
		} => Message::new(format!("🎉 {subject} was approved!"), Severity::Success),
		Change::Status {
			to: Status::Rejected,
			..
		} => Message::new(format!("{subject} was rejected."), Severity::Warning),
		Change::Status { from, to } => {
			Message::new(format!("{subject}: {from} → {to}"), Severity::Info)
		}
		Change::IsPaid {
			from: false,
			to: true,
		} => {
			let payer = transition
				.detail_str(PAYER_KEYS)
				.map(str::to_string)
				.unwrap_or_else(|| format!("Member {}", transition.id));
			Message::new(format!("💰 {payer} paid successfully!"), Severity::Success)
		}
		Change::IsPaid { .. } => Message::new(
			format!("Payment for {subject} was reverted."),
			Severity::Warning,
		),
	};
	Some(message)
}

/// Formats transitions and forwards them to a notifier, once each.
pub struct Dispatcher {
	formatter: Formatter,
	notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
	pub fn new(notifier: impl Notifier + 'static) -> Self {
		Self {
			formatter: Arc::new(default_message),
			notifier: Arc::new(notifier),
		}
	}

	/// Shares an existing notifier.
	pub fn shared(notifier: Arc<dyn Notifier>) -> Self {
		Self {
			formatter: Arc::new(default_message),
			notifier,
		}
	}

	pub fn with_formatter<F>(mut self, formatter: F) -> Self
	where
		F: Fn(&Transition) -> Option<Message> + Send + Sync + 'static,
	{
		self.formatter = Arc::new(formatter);
		self
	}

	/// Emits every transition the formatter accepts; returns how many were emitted.
	pub fn dispatch(&self, transitions: &[Transition]) -> usize {
		let mut emitted = 0;
		for transition in transitions {
			match (self.formatter)(transition) {
				Some(message) => {
					self.notifier
						.emit(transition, &message.text, message.severity);
					emitted += 1;
				}
				None => {
					tracing::debug!(
						collection = %transition.collection,
						id = %transition.id,
						"transition suppressed by formatter"
					);
				}
			}
		}
		emitted
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher").finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;
	use std::time::SystemTime;

	use serde_json::Map;

	use super::*;
	use crate::snapshot::ItemId;

	#[derive(Default)]
	struct Recorder(Mutex<Vec<(String, Severity)>>);

	impl Notifier for Arc<Recorder> {
		fn emit(&self, _transition: &Transition, message: &str, severity: Severity) {
			self.0.lock().unwrap().push((message.to_string(), severity));
		}
	}

	fn transition(change: Change, details: &[(&str, &str)]) -> Transition {
		let mut map = Map::new();
		for (k, v) in details {
			map.insert(k.to_string(), (*v).into());
		}
		Transition {
			collection: "club-1".to_string(),
			id: ItemId::from(42),
			change,
			observed_at: SystemTime::now(),
			details: map,
		}
	}

	#[test]
	fn default_messages() {
		let approved = transition(
			Change::Status {
				from: Status::Pending,
				to: Status::Approved,
			},
			&[("clubName", "Chess Club")],
		);
		let message = default_message(&approved).unwrap();
		assert_eq!(message.text, "🎉 Chess Club was approved!");
		assert_eq!(message.severity, Severity::Success);

		let paid = transition(
			Change::IsPaid {
				from: false,
				to: true,
			},
			&[("studentName", "An")],
		);
		assert_eq!(default_message(&paid).unwrap().text, "💰 An paid successfully!");

		let anonymous = transition(
			Change::Status {
				from: Status::Pending,
				to: Status::Approved,
			},
			&[],
		);
		assert_eq!(
			default_message(&anonymous).unwrap().text,
			"🎉 request 42 was approved!"
		);
	}

	#[test]
	fn dispatch_emits_once_per_accepted_transition() {
		let recorder = Arc::new(Recorder::default());
		let dispatcher = Dispatcher::new(recorder.clone()).with_formatter(|t| {
			t.is_payment_received()
				.then(|| Message::new("paid", Severity::Info))
		});

		let transitions = vec![
			transition(
				Change::IsPaid {
					from: false,
					to: true,
				},
				&[],
			),
			transition(
				Change::Status {
					from: Status::Pending,
					to: Status::Approved,
				},
				&[],
			),
		];
		assert_eq!(dispatcher.dispatch(&transitions), 1);
		assert_eq!(
			*recorder.0.lock().unwrap(),
			vec![("paid".to_string(), Severity::Info)]
		);
	}
}
