/* src/notify/template.rs */

//!
//! Minijinja message templates.
//!
//! Templates render against the serialized [`Transition`], so they can use
//! `collectionKey`, `id`, `field`, `from`, `to` and any `details.*` field:
//!
//! ```text
//! 🎉 Your request to join {{ details.clubName }} was approved!
//! ```

use super::{Message, Severity, default_message};
use crate::engine::Transition;
use crate::rules::Status;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
	#[error("invalid template '{template}': {message}")]
	Syntax { template: String, message: String },

	#[error("render failed: {0}")]
	Render(String),
}

#[derive(Debug, Clone, Copy)]
enum Matcher {
	StatusTo(Status),
	PaymentReceived,
	Any,
}

impl Matcher {
	fn matches(&self, transition: &Transition) -> bool {
		match self {
			Self::StatusTo(status) => transition.is_status_to(*status),
			Self::PaymentReceived => transition.is_payment_received(),
			Self::Any => true,
		}
	}
}

#[derive(Debug, Clone)]
struct Entry {
	matcher: Matcher,
	template: String,
	severity: Severity,
}

/// Formats transitions with the first matching template.
///
/// Transitions no template matches, and templates that fail to render, fall
/// back to [`default_message`].
#[derive(Debug, Clone, Default)]
pub struct TemplateFormatter {
	entries: Vec<Entry>,
}

impl TemplateFormatter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_status(mut self, to: Status, template: impl Into<String>, severity: Severity) -> Self {
		self.entries.push(Entry {
			matcher: Matcher::StatusTo(to),
			template: template.into(),
			severity,
		});
		self
	}

	pub fn on_payment(mut self, template: impl Into<String>, severity: Severity) -> Self {
		self.entries.push(Entry {
			matcher: Matcher::PaymentReceived,
			template: template.into(),
			severity,
		});
		self
	}

	pub fn otherwise(mut self, template: impl Into<String>, severity: Severity) -> Self {
		self.entries.push(Entry {
			matcher: Matcher::Any,
			template: template.into(),
			severity,
		});
		self
	}

	/// Checks every template for syntax errors without rendering.
	pub fn validate(&self) -> Result<(), TemplateError> {
		let env = minijinja::Environment::new();
		for entry in &self.entries {
			env.template_from_str(&entry.template)
				.map_err(|e| TemplateError::Syntax {
					template: entry.template.clone(),
					message: e.to_string(),
				})?;
		}
		Ok(())
	}

	pub fn render(&self, transition: &Transition) -> Result<Option<Message>, TemplateError> {
		let Some(entry) = self.entries.iter().find(|e| e.matcher.matches(transition)) else {
			return Ok(None);
		};
		let env = minijinja::Environment::new();
		let text = env
			.render_str(&entry.template, transition)
			.map_err(|e| TemplateError::Render(e.to_string()))?;
		Ok(Some(Message::new(text, entry.severity)))
	}

	/// Formatter entry point for [`Dispatcher::with_formatter`](super::Dispatcher::with_formatter).
	pub fn format(&self, transition: &Transition) -> Option<Message> {
		match self.render(transition) {
			Ok(Some(message)) => Some(message),
			Ok(None) => default_message(transition),
			Err(e) => {
				tracing::warn!(error = %e, "template failed, using default message");
				default_message(transition)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::SystemTime;

	use serde_json::Map;

	use super::*;
	use crate::rules::Change;
	use crate::snapshot::ItemId;

	fn approved(club: &str) -> Transition {
		let mut details = Map::new();
		details.insert("clubName".to_string(), club.into());
		Transition {
			collection: "my-registrations".to_string(),
			id: ItemId::from(3),
			change: Change::Status {
				from: Status::Pending,
				to: Status::Approved,
			},
			observed_at: SystemTime::now(),
			details,
		}
	}

	#[test]
	fn renders_details_and_change_fields() {
		let formatter = TemplateFormatter::new().on_status(
			Status::Approved,
			"🎉 {{ details.clubName }}: {{ from }} -> {{ to }} ({{ collectionKey }}#{{ id }})",
			Severity::Success,
		);
		let message = formatter.format(&approved("Chess")).unwrap();
		assert_eq!(
			message.text,
			"🎉 Chess: pending -> approved (my-registrations#3)"
		);
	}

	#[test]
	fn unmatched_transitions_use_default_message() {
		let formatter = TemplateFormatter::new().on_payment("paid", Severity::Success);
		let message = formatter.format(&approved("Chess")).unwrap();
		assert_eq!(message.text, "🎉 Chess was approved!");
	}

	#[test]
	fn validate_reports_syntax_errors() {
		let formatter = TemplateFormatter::new().otherwise("{{ unclosed", Severity::Info);
		assert!(matches!(
			formatter.validate(),
			Err(TemplateError::Syntax { .. })
		));
	}
}
