/* src/persist/format/postcard.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::super::{Format, PersistError};

/// Compact binary encoding using `postcard`.
pub struct Postcard;

impl Format for Postcard {
	fn extensions(&self) -> &'static [&'static str] {
		&["bin", "post"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, PersistError> {
		postcard::from_bytes(input).map_err(|e| PersistError::Parse(e.to_string()))
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, PersistError> {
		postcard::to_stdvec(value).map_err(|e| PersistError::Encode(e.to_string()))
	}
}
