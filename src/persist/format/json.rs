/* src/persist/format/json.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::super::{Format, PersistError};

/// JSON encoding using `serde_json`. Pretty-printed so snapshots stay diffable.
pub struct Json;

impl Format for Json {
	fn extensions(&self) -> &'static [&'static str] {
		&["json"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, PersistError> {
		serde_json::from_slice(input).map_err(|e| PersistError::Parse(e.to_string()))
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, PersistError> {
		serde_json::to_vec_pretty(value).map_err(|e| PersistError::Encode(e.to_string()))
	}
}
