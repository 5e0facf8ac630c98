use crate::staticdata::{SqlPattern, SQL_DBMS, SQL_FEATURES, SQL_MODULES, SQL_TEXT};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
	/// `TAG(n) TAG2(m)`
	Count,
	/// `TAG TAG2`, zero counts left out
	Keys,
}

/// Occurrences per tag. Sorted by tag name so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally(BTreeMap<String, u32>);

impl Tally {
	pub fn bump(&mut self, tag: &str) {
		*self.0.entry(tag.to_string()).or_insert(0) += 1;
	}

	pub fn get(&self, tag: &str) -> u32 {
		self.0.get(tag).copied().unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn render(&self, mode: RenderMode) -> String {
		match mode {
			RenderMode::Count => self.0.iter().map(|(tag, n)| format!("{}({})", tag, n)).collect::<Vec<_>>().join(" "),
			RenderMode::Keys => self.0.iter().filter(|(_, n)| **n > 0).map(|(tag, _)| tag.as_str()).collect::<Vec<_>>().join(" "),
		}
	}
}

#[derive(Debug)]
enum Matcher {
	Literal { needle: String, case_insensitive: bool },
	Pattern(Regex),
}

#[derive(Debug)]
struct CompiledPattern {
	tag: &'static str,
	matcher: Matcher,
}

impl CompiledPattern {
	fn compile(p: &SqlPattern) -> Result<CompiledPattern, regex::Error> {
		let case_insensitive = !p.flags.contains('s');
		let matcher = if p.flags.contains('r') {
			Matcher::Pattern(RegexBuilder::new(p.pattern).case_insensitive(case_insensitive).build()?)
		} else if case_insensitive {
			Matcher::Literal { needle: p.pattern.to_lowercase(), case_insensitive }
		} else {
			Matcher::Literal { needle: p.pattern.to_string(), case_insensitive }
		};
		Ok(CompiledPattern { tag: p.tag, matcher })
	}

	fn is_match(&self, sql: &str, lowered: &str) -> bool {
		match &self.matcher {
			Matcher::Literal { needle, case_insensitive: true } => lowered.contains(needle.as_str()),
			Matcher::Literal { needle, case_insensitive: false } => sql.contains(needle.as_str()),
			Matcher::Pattern(re) => re.is_match(sql),
		}
	}
}

/// A compiled classification dictionary.
#[derive(Debug)]
pub struct Dictionary {
	patterns: Vec<CompiledPattern>,
}

impl Dictionary {
	pub fn compile(name: &str, table: &[SqlPattern]) -> Dictionary {
		let patterns = table
			.iter()
			.filter_map(|p| match CompiledPattern::compile(p) {
				Ok(c) => Some(c),
				Err(e) => {
					error!(dictionary = name, tag = p.tag, "invalid sql pattern skipped: {}", e);
					None
				}
			})
			.collect();
		Dictionary { patterns }
	}

	/// Counts every tag of the dictionary whose pattern occurs in `sql`.
	pub fn classify(&self, tally: &mut Tally, sql: &str) {
		let lowered = sql.to_lowercase();
		for p in &self.patterns {
			if p.is_match(sql, &lowered) {
				tally.bump(p.tag);
			}
		}
	}
}

pub struct Dictionaries {
	pub text: Dictionary,
	pub dbms: Dictionary,
	pub modules: Dictionary,
	pub features: Dictionary,
}

pub static DICTIONARIES: LazyLock<Dictionaries> = LazyLock::new(|| Dictionaries {
	text: Dictionary::compile("text", &SQL_TEXT),
	dbms: Dictionary::compile("dbms", &SQL_DBMS),
	modules: Dictionary::compile("modules", &SQL_MODULES),
	features: Dictionary::compile("features", &SQL_FEATURES),
});

/// Text of the first optimizer hint comment in `sql`, if any.
/// `--+` hints run to the end of the first token (line breaks are gone by now),
/// `/*+` hints run to `*/`, or to a lone `*` when the text was cut off.
fn hint_comment(sql: &str) -> Option<&str> {
	if let Some(pos) = sql.find("--+") {
		if let Some(token) = sql[pos + 3..].split_whitespace().next() {
			return Some(token);
		}
	}
	let pos = sql.find("/*+")?;
	let rest = &sql[pos + 3..];
	let end = rest.find("*/").or_else(|| rest.find('*')).unwrap_or(rest.len());
	Some(&rest[..end])
}

/// Hint names without their arguments: `USE_HASH(a b) PARALLEL(8)` gives `USE_HASH PARALLEL`.
fn hint_names(comment: &str) -> Vec<String> {
	let mut cleaned = String::with_capacity(comment.len());
	let mut in_args = false;
	for c in comment.chars() {
		if in_args {
			in_args = c != ')';
			continue;
		}
		match c {
			'(' => in_args = true,
			')' => {}
			c if c.is_ascii_digit() => {}
			c => cleaned.push(c),
		}
	}
	cleaned
		.to_uppercase()
		.split(|c: char| !(c.is_alphanumeric() || c == '_'))
		.filter(|w| !w.is_empty())
		.map(|w| w.to_string())
		.collect()
}

pub fn search_hints(tally: &mut Tally, sql: &str) {
	if let Some(comment) = hint_comment(sql) {
		for hint in hint_names(comment) {
			tally.bump(&hint);
		}
	}
}

/// Tallies of one report, fed with SQL fragments as they are found.
#[derive(Debug, Clone, Default)]
pub struct SqlSummary {
	pub text: Tally,
	pub dbms: Tally,
	pub modules: Tally,
	pub features: Tally,
	pub hints: Tally,
}

impl SqlSummary {
	/// `module` is the client module column when the report has one, else the SQL text again.
	pub fn add(&mut self, sql: &str, module: &str) {
		let d = &*DICTIONARIES;
		d.text.classify(&mut self.text, sql);
		d.dbms.classify(&mut self.dbms, sql);
		d.modules.classify(&mut self.modules, module);
		d.features.classify(&mut self.features, sql);
		search_hints(&mut self.hints, sql);
	}

	/// Rendered columns `db_sql`, `db_dbms`, `db_modules`, `db_features`, `db_hints`.
	pub fn render(&self, text_mode: RenderMode, tag_mode: RenderMode) -> [(&'static str, String); 5] {
		[
			("db_sql", self.text.render(text_mode)),
			("db_dbms", self.dbms.render(tag_mode)),
			("db_modules", self.modules.render(tag_mode)),
			("db_features", self.features.render(tag_mode)),
			("db_hints", self.hints.render(tag_mode)),
		]
	}
}
