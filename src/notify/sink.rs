/* src/notify/sink.rs */

use tokio::sync::broadcast;

use super::{Notifier, Severity};
use crate::engine::Transition;

/// Default channel capacity of [`ChannelNotifier`].
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Presentation layer for plain messages, e.g. a toast queue.
pub trait NotificationSink: Send + Sync {
	fn notify(&self, message: &str, severity: Severity);
}

impl<F> NotificationSink for F
where
	F: Fn(&str, Severity) + Send + Sync,
{
	fn notify(&self, message: &str, severity: Severity) {
		self(message, severity)
	}
}

/// A [`Notifier`] that drops the transition and forwards the message to a sink.
pub struct SinkNotifier<S> {
	sink: S,
}

impl<S: NotificationSink> SinkNotifier<S> {
	pub fn new(sink: S) -> Self {
		Self { sink }
	}
}

impl<S: NotificationSink> Notifier for SinkNotifier<S> {
	fn emit(&self, _transition: &Transition, message: &str, severity: Severity) {
		self.sink.notify(message, severity);
	}
}

/// Logs notifications through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
	fn notify(&self, message: &str, severity: Severity) {
		match severity {
			Severity::Error => tracing::error!(%severity, "{}", message),
			Severity::Warning => tracing::warn!(%severity, "{}", message),
			Severity::Success | Severity::Info => tracing::info!(%severity, "{}", message),
		}
	}
}

/// A delivered notification, as seen by channel subscribers.
#[derive(Debug, Clone)]
pub struct Notification {
	pub transition: Transition,
	pub message: String,
	pub severity: Severity,
}

/// Broadcasts notifications to any number of subscribers.
///
/// Sending with no subscribers is not an error; the notification is dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
	tx: broadcast::Sender<Notification>,
}

impl ChannelNotifier {
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
	}

	/// Note: slow subscribers lag and lose the oldest notifications once
	/// `capacity` is exceeded.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			tx: broadcast::channel(capacity).0,
		}
	}

	pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
		self.tx.subscribe()
	}

	/// Subscribes as a `Stream`.
	#[cfg(feature = "stream")]
	pub fn stream(&self) -> NotificationStream {
		NotificationStream {
			inner: tokio_stream::wrappers::BroadcastStream::new(self.subscribe()),
		}
	}
}

impl Default for ChannelNotifier {
	fn default() -> Self {
		Self::new()
	}
}

impl Notifier for ChannelNotifier {
	fn emit(&self, transition: &Transition, message: &str, severity: Severity) {
		let _ = self.tx.send(Notification {
			transition: transition.clone(),
			message: message.to_string(),
			severity,
		});
	}
}

#[cfg(feature = "stream")]
pub struct NotificationStream {
	inner: tokio_stream::wrappers::BroadcastStream<Notification>,
}

#[cfg(feature = "stream")]
impl futures_util::Stream for NotificationStream {
	type Item =
		std::result::Result<Notification, tokio_stream::wrappers::errors::BroadcastStreamRecvError>;

	fn poll_next(
		mut self: std::pin::Pin<&mut Self>,
		cx: &mut std::task::Context<'_>,
	) -> std::task::Poll<Option<Self::Item>> {
		futures_util::Stream::poll_next(std::pin::Pin::new(&mut self.inner), cx)
	}
}
