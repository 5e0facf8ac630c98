use crate::patterns::{LookupPattern, TextMatcher};
use scraper::{ElementRef, Html};
use tracing::debug;

const OFFLOAD_ELIGIBLE_SUMMARY: &str = "SQL ordered by Offload Eligible Bytes";

#[derive(Debug, Clone)]
pub struct HeaderCell {
	pub text: String,
	/// grouping header covering several leaf columns
	pub spanning: bool,
}

/// Typed view of one html `<table>`.
#[derive(Debug, Clone, Default)]
pub struct MarkupTable {
	pub summary: Option<String>,
	/// every `th` of the table in document order, across all header rows
	pub headers: Vec<HeaderCell>,
	/// `td` texts per `tr`; header-only rows have no cells
	pub rows: Vec<Vec<String>>,
	/// raw text nodes, used to decide if a table mentions a row label at all
	texts: Vec<String>,
}

pub fn cell_text(el: ElementRef) -> String {
	el.text().collect::<String>().trim().to_string()
}

pub fn is_element(el: &ElementRef, name: &str) -> bool {
	el.value().name().eq_ignore_ascii_case(name)
}

impl MarkupTable {
	pub fn from_element(table: ElementRef) -> MarkupTable {
		let mut t = MarkupTable {
			summary: table.value().attr("summary").map(|s| s.to_string()),
			texts: table.text().map(|s| s.to_string()).collect(),
			..Default::default()
		};
		for node in table.descendants() {
			let Some(el) = ElementRef::wrap(node) else { continue };
			if is_element(&el, "th") {
				t.headers.push(HeaderCell {
					text: cell_text(el),
					spanning: spans_columns(&el),
				});
			} else if is_element(&el, "tr") {
				let cells = el
					.descendants()
					.filter_map(ElementRef::wrap)
					.filter(|c| is_element(c, "td"))
					.map(cell_text)
					.collect::<Vec<_>>();
				t.rows.push(cells);
			}
		}
		t
	}

	pub fn body_rows(&self) -> impl Iterator<Item = &Vec<String>> {
		self.rows.iter().filter(|r| !r.is_empty())
	}

	fn mentions(&self, m: &TextMatcher) -> bool {
		self.texts.iter().any(|t| m.found_in(t))
	}

	fn has_header(&self, col: Option<&TextMatcher>) -> bool {
		self.headers.iter().any(|h| col.map_or(true, |m| m.matches(&h.text)))
	}

	/// Index of the leaf column matching `col`, spanning group headers not counted.
	pub fn column_index(&self, col: Option<&TextMatcher>) -> Option<usize> {
		self.headers
			.iter()
			.filter(|h| !h.spanning)
			.position(|h| col.map_or(true, |m| m.matches(&h.text)))
	}

	fn is_init_parameters(&self) -> bool {
		match &self.summary {
			Some(s) => s.find("init").map_or(false, |i| s[i..].contains(" parameters")),
			None => false,
		}
	}

	fn is_offload_eligible(&self) -> bool {
		self.summary.as_deref().map_or(false, |s| s.starts_with(OFFLOAD_ELIGIBLE_SUMMARY))
	}

	/// Value at the intersection of the first row matching `row` and the column matching `col`.
	///
	/// The row label is looked for in the first three cells. Instance scoped lookups
	/// on init.ora tables only accept rows whose second cell is `*` or the instance number.
	pub fn value_at(&self, row: Option<&TextMatcher>, col: Option<&TextMatcher>, instance: u32) -> Option<String> {
		let idx = self.column_index(col)?;

		if instance > 0 && self.is_init_parameters() {
			let inst = instance.to_string();
			return self
				.body_rows()
				.find(|cells| {
					let label = row.map_or(true, |m| m.matches(&cells[0]));
					let scope = cells.get(1).map(|c| c.as_str());
					label && (scope == Some("*") || scope == Some(inst.as_str()))
				})
				.and_then(|cells| cells.get(idx).cloned());
		}

		self.body_rows()
			.find(|cells| match row {
				None => true,
				Some(m) => cells.iter().take(3).any(|c| m.matches(c)),
			})
			.and_then(|cells| cells.get(idx).cloned())
	}
}

/// Tables of the report body. Warning banners printed before the
/// "WORKLOAD REPOSITORY ... REPORT" heading are left out.
pub fn report_tables(doc: &Html, start: &TextMatcher) -> Vec<MarkupTable> {
	let mut all = Vec::new();
	let mut body = Vec::new();
	let mut in_body = false;
	for node in doc.root_element().descendants() {
		let Some(el) = ElementRef::wrap(node) else { continue };
		if !in_body && is_element(&el, "h1") && start.found_in(&cell_text(el)) {
			in_body = true;
		}
		if is_element(&el, "table") {
			let t = MarkupTable::from_element(el);
			if in_body {
				body.push(t.clone());
			}
			all.push(t);
		}
	}
	if in_body {
		body
	} else {
		debug!("no report heading found, using all {} tables", all.len());
		all
	}
}

/// First table that mentions the row label and carries the column header.
pub fn find_table<'t>(tables: &'t [MarkupTable], row: Option<&TextMatcher>, col: Option<&TextMatcher>) -> Option<&'t MarkupTable> {
	tables.iter().find(|t| {
		row.map_or(true, |m| t.mentions(m)) && !t.is_offload_eligible() && t.has_header(col)
	})
}

/// Runs one lookup. A missing table or cell is `None`, never an error.
pub fn lookup(tables: &[MarkupTable], pattern: &LookupPattern, instance: u32) -> Option<String> {
	let row = pattern.row.as_ref();
	let col = pattern.col.as_ref();
	match find_table(tables, row, col) {
		Some(table) => table.value_at(row, col, instance),
		None => {
			debug!(key = pattern.spec.key, row = pattern.spec.row, column = pattern.spec.col, instance, "no table for lookup");
			None
		}
	}
}

/// `colspan` above one; `colspan="1"` and unparsable values are leaf cells.
fn spans_columns(el: &ElementRef) -> bool {
	el.value()
		.attr("colspan")
		.and_then(|c| c.trim().parse::<u32>().ok())
		.map_or(false, |n| n > 1)
}
