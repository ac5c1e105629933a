/* src/notify/mod.rs */

//!
//! Notification delivery for transitions.
//!
//! The diff engine guarantees at most one transition per actual change; the
//! [`Dispatcher`] turns each one into a message and calls the [`Notifier`]
//! exactly once. Rendering is left to the sink.

mod dispatcher;
mod sink;
#[cfg(feature = "template")]
mod template;

pub use dispatcher::{Dispatcher, Formatter, default_message};
pub use sink::{ChannelNotifier, Notification, NotificationSink, SinkNotifier, TracingSink};
#[cfg(feature = "stream")]
pub use sink::NotificationStream;
#[cfg(feature = "template")]
pub use template::{TemplateError, TemplateFormatter};

use serde::{Deserialize, Serialize};

use crate::engine::Transition;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Success,
	Error,
	Info,
	Warning,
}

impl Severity {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Error => "error",
			Self::Info => "info",
			Self::Warning => "warning",
		}
	}
}

impl std::fmt::Display for Severity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A rendered, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub text: String,
	pub severity: Severity,
}

impl Message {
	pub fn new(text: impl Into<String>, severity: Severity) -> Self {
		Self {
			text: text.into(),
			severity,
		}
	}
}

/// Receives classified, de-duplicated transitions.
///
/// Implementations need not de-duplicate; the dispatcher calls `emit` once
/// per transition.
pub trait Notifier: Send + Sync {
	fn emit(&self, transition: &Transition, message: &str, severity: Severity);
}
