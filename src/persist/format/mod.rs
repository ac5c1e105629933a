/* src/persist/format/mod.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Format, PersistError};

mod json;
pub use json::Json;

#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "toml")]
pub use self::toml::Toml;

#[cfg(feature = "yaml")]
mod yaml;
#[cfg(feature = "yaml")]
pub use yaml::Yaml;

#[cfg(feature = "postcard")]
mod postcard;
#[cfg(feature = "postcard")]
pub use self::postcard::Postcard;

/// An enum wrapper for all supported formats, enabling dynamic dispatch-like behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnyFormat {
	#[default]
	Json,
	#[cfg(feature = "toml")]
	Toml,
	#[cfg(feature = "yaml")]
	Yaml,
	#[cfg(feature = "postcard")]
	Postcard,
}

impl AnyFormat {
	/// Primary extension, used to build adapter keys.
	pub fn extension(&self) -> &'static str {
		self.extensions().first().copied().unwrap_or("bin")
	}
}

impl Format for AnyFormat {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			Self::Json => Json.extensions(),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.extensions(),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.extensions(),
			#[cfg(feature = "postcard")]
			Self::Postcard => Postcard.extensions(),
		}
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, PersistError> {
		match self {
			Self::Json => Json.parse(input),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.parse(input),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.parse(input),
			#[cfg(feature = "postcard")]
			Self::Postcard => Postcard.parse(input),
		}
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, PersistError> {
		match self {
			Self::Json => Json.render(value),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.render(value),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.render(value),
			#[cfg(feature = "postcard")]
			Self::Postcard => Postcard.render(value),
		}
	}
}
