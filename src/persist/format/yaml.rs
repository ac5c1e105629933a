/* src/persist/format/yaml.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::super::{Format, PersistError};

/// YAML encoding using `serde_yaml`.
pub struct Yaml;

impl Format for Yaml {
	fn extensions(&self) -> &'static [&'static str] {
		&["yaml", "yml"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, PersistError> {
		serde_yaml::from_slice(input).map_err(|e| PersistError::Parse(e.to_string()))
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, PersistError> {
		serde_yaml::to_string(value)
			.map(String::into_bytes)
			.map_err(|e| PersistError::Encode(e.to_string()))
	}
}
