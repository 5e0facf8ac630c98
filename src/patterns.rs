use crate::staticdata::{Lookup, LOOKUPS_RAC, LOOKUPS_RAC_INSTANCE, LOOKUPS_STD};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::error;

/// Report dialect a lookup table is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
	Standard,
	RacGlobal,
	RacInstance,
}

/// A row or column matcher.
/// `matches` is start anchored and applied to trimmed cell text,
/// `found_in` searches anywhere in a text fragment.
#[derive(Debug, Clone)]
pub enum TextMatcher {
	Pattern { anchored: Regex, search: Regex },
	/// A cell holding exactly this label. Used for instance numbers
	/// so that instance 1 does not pick up the row of instance 10.
	Exact(String),
}

impl TextMatcher {
	pub fn new(pattern: &str) -> Result<TextMatcher, regex::Error> {
		Ok(TextMatcher::Pattern {
			anchored: Regex::new(&format!("^(?:{})", pattern))?,
			search: Regex::new(pattern)?,
		})
	}

	pub fn case_insensitive(pattern: &str) -> Result<TextMatcher, regex::Error> {
		Ok(TextMatcher::Pattern {
			anchored: RegexBuilder::new(&format!("^(?:{})", pattern)).case_insensitive(true).build()?,
			search: RegexBuilder::new(pattern).case_insensitive(true).build()?,
		})
	}

	pub fn exact(label: &str) -> TextMatcher {
		TextMatcher::Exact(label.trim().to_string())
	}

	pub fn matches(&self, text: &str) -> bool {
		match self {
			TextMatcher::Pattern { anchored, .. } => anchored.is_match(text.trim()),
			TextMatcher::Exact(label) => text.trim() == label.as_str(),
		}
	}

	pub fn found_in(&self, text: &str) -> bool {
		match self {
			TextMatcher::Pattern { search, .. } => search.is_match(text),
			TextMatcher::Exact(label) => text.trim() == label.as_str(),
		}
	}
}

/// A declared lookup with its matchers compiled. `None` means "any".
#[derive(Debug, Clone)]
pub struct LookupPattern {
	pub spec: Lookup,
	pub row: Option<TextMatcher>,
	pub col: Option<TextMatcher>,
}

impl LookupPattern {
	pub fn compile(spec: &Lookup) -> Result<LookupPattern, regex::Error> {
		Ok(LookupPattern {
			spec: *spec,
			row: optional_matcher(spec.row)?,
			col: optional_matcher(spec.col)?,
		})
	}

	/// Same lookup with the empty row matcher bound to an instance number.
	pub fn for_instance(&self, instance: u32) -> LookupPattern {
		let mut bound = self.clone();
		if self.row.is_none() {
			bound.row = Some(TextMatcher::exact(&instance.to_string()));
		}
		bound
	}
}

fn optional_matcher(pattern: &str) -> Result<Option<TextMatcher>, regex::Error> {
	if pattern.is_empty() {
		Ok(None)
	} else {
		TextMatcher::new(pattern).map(Some)
	}
}

pub struct Registry {
	standard: Vec<LookupPattern>,
	rac_global: Vec<LookupPattern>,
	rac_instance: Vec<LookupPattern>,
}

impl Registry {
	pub fn patterns(&self, dialect: Dialect) -> &[LookupPattern] {
		match dialect {
			Dialect::Standard => &self.standard,
			Dialect::RacGlobal => &self.rac_global,
			Dialect::RacInstance => &self.rac_instance,
		}
	}
}

fn compile_table(table: &[Lookup]) -> Vec<LookupPattern> {
	table
		.iter()
		.filter_map(|spec| match LookupPattern::compile(spec) {
			Ok(p) => Some(p),
			Err(e) => {
				error!(key = spec.key, row = spec.row, column = spec.col, "invalid lookup pattern skipped: {}", e);
				None
			}
		})
		.collect()
}

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(|| Registry {
	standard: compile_table(&LOOKUPS_STD),
	rac_global: compile_table(&LOOKUPS_RAC),
	rac_instance: compile_table(&LOOKUPS_RAC_INSTANCE),
});
