/* src/persist/format/toml.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::super::{Format, PersistError};

/// TOML encoding using `toml`.
pub struct Toml;

impl Format for Toml {
	fn extensions(&self) -> &'static [&'static str] {
		&["toml"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, PersistError> {
		let s = std::str::from_utf8(input).map_err(|e| PersistError::Parse(e.to_string()))?;
		toml::from_str(s).map_err(|e| PersistError::Parse(e.to_string()))
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, PersistError> {
		toml::to_string(value)
			.map(String::into_bytes)
			.map_err(|e| PersistError::Encode(e.to_string()))
	}
}
