/* src/rules/status.rs */

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use fancy_regex::Regex;

use super::{RulesError, Status};

const STANDARD_EXACT: &[(&str, Status)] = &[
	("choduyet", Status::Pending),
	("chờduyệt", Status::Pending),
	("dangcho", Status::Pending),
	("đangchờ", Status::Pending),
	("pending", Status::Pending),
	("daduyet", Status::Approved),
	("đãduyệt", Status::Approved),
	("chapthuan", Status::Approved),
	("chấpthuận", Status::Approved),
	("approved", Status::Approved),
	("tuchoi", Status::Rejected),
	("từchối", Status::Rejected),
	("rejected", Status::Rejected),
];

const STANDARD_PATTERNS: &[(&str, Status)] = &[
	(r"^(daroi|đãrời)", Status::Left),
	(r"^(roi|rời|left|leave|leaved|quit|cancell?ed)$", Status::Left),
];

/// Lowercases and strips whitespace, `_` and `-` so that `"Da Duyet"`,
/// `"da_duyet"` and `"DaDuyet"` share one table entry.
pub(crate) fn canonical_key(raw: &str) -> String {
	raw.trim()
		.chars()
		.filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
		.flat_map(char::to_lowercase)
		.collect()
}

/// Table-driven mapping from raw API status strings to [`Status`].
///
/// Lookup tries exact entries first, then patterns in insertion order.
/// Unmatched values become [`Status::Unknown`] and are logged once per
/// distinct raw value.
#[derive(Debug)]
pub struct StatusTable {
	exact: HashMap<String, Status>,
	patterns: Vec<(Regex, Status)>,
	unknown_seen: Mutex<HashSet<String>>,
}

impl StatusTable {
	/// Starts from the standard vocabulary.
	pub fn builder() -> StatusTableBuilder {
		StatusTableBuilder::standard()
	}

	/// Starts from an empty table.
	pub fn empty() -> StatusTableBuilder {
		StatusTableBuilder::default()
	}

	pub fn normalize(&self, raw: &str) -> Status {
		let key = canonical_key(raw);
		if let Some(status) = self.lookup(&key) {
			return status;
		}

		let first_sighting = match self.unknown_seen.lock() {
			Ok(mut seen) => seen.insert(raw.to_string()),
			Err(_) => false,
		};
		if first_sighting {
			tracing::warn!(raw = %raw, "unrecognized status, treating as unknown");
		}
		Status::Unknown
	}

	/// Classifies without recording unknown values.
	pub fn classify(&self, raw: &str) -> Option<Status> {
		self.lookup(&canonical_key(raw))
	}

	fn lookup(&self, key: &str) -> Option<Status> {
		if let Some(status) = self.exact.get(key) {
			return Some(*status);
		}
		self.patterns
			.iter()
			.find(|(re, _)| re.is_match(key).unwrap_or(false))
			.map(|(_, status)| *status)
	}
}

impl Default for StatusTable {
	fn default() -> Self {
		let mut table = Self {
			exact: HashMap::new(),
			patterns: Vec::new(),
			unknown_seen: Mutex::new(HashSet::new()),
		};
		for (raw, status) in STANDARD_EXACT {
			table.exact.insert(canonical_key(raw), *status);
		}
		// Literal patterns; covered by `standard_patterns_compile`.
		table.patterns = STANDARD_PATTERNS
			.iter()
			.filter_map(|(p, status)| Regex::new(p).ok().map(|re| (re, *status)))
			.collect();
		table
	}
}

/// Builder for [`StatusTable`].
#[derive(Debug, Default)]
pub struct StatusTableBuilder {
	exact: Vec<(String, Status)>,
	patterns: Vec<(String, Status)>,
}

impl StatusTableBuilder {
	fn standard() -> Self {
		Self {
			exact: STANDARD_EXACT
				.iter()
				.map(|(raw, status)| (raw.to_string(), *status))
				.collect(),
			patterns: STANDARD_PATTERNS
				.iter()
				.map(|(p, status)| (p.to_string(), *status))
				.collect(),
		}
	}

	/// Adds an exact spelling. Later entries override earlier ones.
	pub fn exact(mut self, raw: impl Into<String>, status: Status) -> Self {
		self.exact.push((raw.into(), status));
		self
	}

	/// Adds a pattern, matched against the canonical (lowercased, stripped) value.
	pub fn pattern(mut self, pattern: impl Into<String>, status: Status) -> Self {
		self.patterns.push((pattern.into(), status));
		self
	}

	pub fn build(self) -> Result<StatusTable, RulesError> {
		let mut exact = HashMap::new();
		for (raw, status) in self.exact {
			exact.insert(canonical_key(&raw), status);
		}

		let mut patterns = Vec::with_capacity(self.patterns.len());
		for (pattern, status) in self.patterns {
			let re = Regex::new(&pattern).map_err(|e| RulesError::Pattern {
				pattern: pattern.clone(),
				source: Box::new(e),
			})?;
			patterns.push((re, status));
		}

		Ok(StatusTable {
			exact,
			patterns,
			unknown_seen: Mutex::new(HashSet::new()),
		})
	}
}
