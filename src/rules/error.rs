/* src/rules/error.rs */

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
	/// A status pattern failed to compile.
	#[error("invalid status pattern '{pattern}': {source}")]
	Pattern {
		pattern: String,
		#[source]
		source: Box<fancy_regex::Error>,
	},
}
