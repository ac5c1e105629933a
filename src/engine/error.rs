/* src/engine/error.rs */

use crate::snapshot::ItemId;

/// A fetched item that could not be normalized. Non-fatal: the item is
/// dropped and its siblings are still reconciled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("item at index {index} has no id")]
	MissingId { index: usize },

	#[error("item {id} has no status")]
	MissingStatus { id: ItemId },
}
