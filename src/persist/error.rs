/* src/persist/error.rs */

/// Errors raised while saving or restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
	/// The stored blob could not be decoded.
	#[error("parse error: {0}")]
	Parse(String),

	/// The snapshot could not be encoded.
	#[error("encode error: {0}")]
	Encode(String),

	/// Generic static error message.
	#[error("custom error: {0}")]
	Custom(&'static str),

	/// IO error from the adapter.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// Key escapes the file adapter's root directory.
	#[error("sandbox violation: {0}")]
	SandboxViolation(String),
}
