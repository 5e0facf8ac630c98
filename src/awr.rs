use crate::error::ExtractError;
use crate::markup::{cell_text, find_table, is_element, lookup, report_tables, MarkupTable};
use crate::patterns::{Dialect, LookupPattern, TextMatcher, REGISTRY};
use crate::record::{Extraction, RawMetric, Scope, Status, Topology};
use crate::sqlclass::{RenderMode, SqlSummary};
use crate::staticdata::ValueKind;
use crate::value::{parse_locale_number, round_up, Value};
use scraper::{ElementRef, Html};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Marker phrases are only looked for this far into the document text.
const HEAD_CHARS: usize = 150;
const TOP_IO_HEADING: &str = "Top Databases by IO Requests";

/// Where SQL texts for the classifier are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlSource {
	/// "SQL ordered by ..." top N tables
	#[default]
	Ordered,
	/// "Complete List of SQL Text"
	List,
}

impl FromStr for SqlSource {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"ordered" => Ok(SqlSource::Ordered),
			"list" => Ok(SqlSource::List),
			other => Err(format!("unknown sql source {:?}, expected ordered or list", other)),
		}
	}
}

impl fmt::Display for SqlSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SqlSource::Ordered => write!(f, "ordered"),
			SqlSource::List => write!(f, "list"),
		}
	}
}

struct Markers {
	report_start: TextMatcher,
	rac_column: TextMatcher,
	total_column: TextMatcher,
	sql_ordered: TextMatcher,
	sql_list: TextMatcher,
	sql_module: TextMatcher,
}

impl Markers {
	fn compile() -> Result<Markers, regex::Error> {
		Ok(Markers {
			report_start: TextMatcher::case_insensitive("WORKLOAD REPOSITORY .*REPORT")?,
			rac_column: TextMatcher::new("RAC")?,
			total_column: TextMatcher::new("Total")?,
			sql_ordered: TextMatcher::new("SQL ordered by")?,
			sql_list: TextMatcher::new("Complete List of SQL Text")?,
			sql_module: TextMatcher::case_insensitive("SQL Module")?,
		})
	}
}

static MARKERS: LazyLock<Result<Markers, regex::Error>> = LazyLock::new(Markers::compile);

fn document_title(doc: &Html) -> String {
	doc.root_element()
		.descendants()
		.filter_map(ElementRef::wrap)
		.find(|e| is_element(e, "title"))
		.map(cell_text)
		.unwrap_or_default()
}

/// First `HEAD_CHARS` characters of the document text.
fn document_head(doc: &Html) -> String {
	let mut head = String::new();
	for piece in doc.root_element().text() {
		head.push_str(piece);
		if head.chars().count() >= HEAD_CHARS {
			break;
		}
	}
	head.chars().take(HEAD_CHARS).collect()
}

/// PDB / root level snapshot reports and compare period reports are not extracted.
fn unsupported_kind(head: &str) -> Option<Status> {
	if head.contains("(PDB snapshots)") || head.contains("(root snapshots)") {
		Some(Status::UnsupportedPdb)
	} else if head.contains("COMPARE PERIOD REPORT") {
		Some(Status::UnsupportedDiff)
	} else {
		None
	}
}

/// Value of the first body row of the first report table, in the column matching `col`.
fn summary_value(tables: &[MarkupTable], col: &TextMatcher) -> Option<String> {
	find_table(&tables[..tables.len().min(1)], None, Some(col))?.value_at(None, Some(col), 0)
}

/// Instance numbers listed in "Database Instances Included In Report".
fn instance_roster(table: &MarkupTable) -> Vec<u32> {
	table.body_rows().filter_map(|cells| cells.first()?.trim().parse().ok()).collect()
}

/// Unit suffixes some releases print into the cell.
fn fix_value(row: &str, raw: String) -> String {
	match row {
		"DB Time:" | "Elapsed:" => raw.replace("(mins)", "").trim().to_string(),
		"log file sync" | "log file parallel write" => {
			if raw.contains("us") {
				match parse_locale_number(&raw.replace("us", "")).as_f64() {
					Some(us) => round_up(us / 1000.0, 2).to_string(),
					None => raw,
				}
			} else {
				raw.replace("ms", "")
			}
		}
		_ => raw,
	}
}

fn typed_value(pattern: &LookupPattern, raw: &str) -> Value {
	let spec = &pattern.spec;
	match spec.kind {
		ValueKind::Text => Value::text(raw.trim()),
		ValueKind::Numeric => match parse_locale_number(raw) {
			Value::Float(f) => round_up(f / spec.divisor, spec.decimals),
			Value::Text(s) => {
				warn!(key = spec.key, value = s.as_str(), "not a number, kept as text");
				Value::Text(s)
			}
			other => other,
		},
	}
}

/// Runs lookups, skipping keys already resolved in the same scope.
struct Resolver<'t> {
	tables: &'t [MarkupTable],
	resolved: HashSet<(Scope, &'static str)>,
	metrics: Vec<RawMetric>,
}

impl<'t> Resolver<'t> {
	fn new(tables: &'t [MarkupTable]) -> Self {
		Resolver { tables, resolved: HashSet::new(), metrics: Vec::new() }
	}

	fn run(&mut self, pattern: &LookupPattern, scope: Scope) {
		let key = pattern.spec.key;
		if self.resolved.contains(&(scope, key)) {
			return;
		}
		let (instance, row) = match scope {
			Scope::Global => (0, pattern.spec.row.to_string()),
			Scope::Instance(id) if pattern.spec.row.is_empty() => (id, id.to_string()),
			Scope::Instance(id) => (id, pattern.spec.row.to_string()),
		};
		let bound;
		let pattern = if instance > 0 {
			bound = pattern.for_instance(instance);
			&bound
		} else {
			pattern
		};

		let Some(raw) = lookup(self.tables, pattern, instance) else { return };
		let raw = fix_value(pattern.spec.row, raw);
		if raw.is_empty() {
			return;
		}
		let value = typed_value(pattern, &raw);
		if value.is_blank() {
			return;
		}
		self.resolved.insert((scope, key));
		self.metrics.push(RawMetric { scope, row, col: pattern.spec.col, value, key });
	}
}

fn run_lookups(tables: &[MarkupTable], topology: &Topology) -> Vec<RawMetric> {
	let dialect = if topology.is_rac_report { Dialect::RacGlobal } else { Dialect::Standard };
	let mut resolver = Resolver::new(tables);
	for pattern in REGISTRY.patterns(dialect) {
		resolver.run(pattern, Scope::Global);
	}
	// every configured instance, present in the report or not
	if topology.is_rac_report {
		for id in 1..=topology.inst_total {
			for pattern in REGISTRY.patterns(Dialect::RacInstance) {
				resolver.run(pattern, Scope::Instance(id));
			}
		}
	}
	resolver.metrics
}

/// The table right after `<a name="target">`.
fn section_table<'a>(following: &[ElementRef<'a>], target: &str) -> Option<ElementRef<'a>> {
	let anchor = following.iter().position(|e| is_element(e, "a") && e.value().attr("name") == Some(target))?;
	following[anchor + 1..].iter().copied().find(|e| is_element(e, "table"))
}

/// Feeds the SQL text column of every linked SQL section into the classifier.
fn search_sql(doc: &Html, section: &TextMatcher, module_header: &TextMatcher) -> SqlSummary {
	let elements: Vec<ElementRef> = doc.root_element().descendants().filter_map(ElementRef::wrap).collect();
	let mut summary = SqlSummary::default();
	for (pos, link) in elements.iter().enumerate() {
		if !is_element(link, "a") || !section.found_in(&cell_text(*link)) {
			continue;
		}
		let Some(href) = link.value().attr("href") else { continue };
		let target = href.rsplit('#').next().unwrap_or(href);
		let Some(table) = section_table(&elements[pos + 1..], target) else {
			debug!(href, "sql section link without table");
			continue;
		};
		let table = MarkupTable::from_element(table);
		// non RAC reports carry a "SQL Module" column right before the SQL text
		let headers = &table.headers;
		let has_module = headers.len() >= 2 && module_header.matches(&headers[headers.len() - 2].text);
		for cells in table.body_rows() {
			let Some(sql) = cells.last() else { continue };
			let module = match cells.len() {
				n if has_module && n >= 2 => &cells[n - 2],
				_ => sql,
			};
			summary.add(sql, module);
		}
	}
	summary
}

/// IOPS and MB/s of the row flagged with `*` in "Top Databases by IO Requests".
fn top_databases_by_io(doc: &Html) -> Option<(Value, Value)> {
	let mut after_heading = false;
	let mut table = None;
	for node in doc.root_element().descendants() {
		if !after_heading {
			after_heading = node.value().as_text().map_or(false, |t| t.trim() == TOP_IO_HEADING);
			continue;
		}
		if let Some(el) = ElementRef::wrap(node) {
			if is_element(&el, "table") {
				table = Some(el);
				break;
			}
		}
	}
	let Some(table) = table else {
		debug!("no {:?} section", TOP_IO_HEADING);
		return None;
	};

	let mut found = None;
	for cells in MarkupTable::from_element(table).body_rows() {
		if cells.len() > 5 && cells[0].contains('*') {
			if let Some(iops) = parse_locale_number(&cells[4]).as_f64() {
				let mbps = cells.get(8).and_then(|c| parse_locale_number(c).as_f64());
				found = Some((Value::Float(iops), mbps.map_or(Value::Empty, Value::Float)));
			}
		}
	}
	if found.is_none() {
		debug!("no flagged database row in {:?}", TOP_IO_HEADING);
	}
	found
}

/// Extracts one AWR html report.
pub fn extract(text: &str, source: SqlSource) -> Result<Extraction, ExtractError> {
	let markers = MARKERS.as_ref().map_err(Clone::clone)?;
	let doc = Html::parse_document(text);

	let title = document_title(&doc);
	debug!(title = title.as_str(), "awr report");
	if let Some(status) = unsupported_kind(&document_head(&doc)) {
		warn!(status = status.as_str(), "skipping unsupported awr report");
		return Ok(Extraction::unsupported(status));
	}

	let tables = report_tables(&doc, &markers.report_start);
	if tables.is_empty() {
		return Err(ExtractError::NoReportTables);
	}

	let mut extraction = Extraction::default();
	let topology = &mut extraction.topology;
	topology.is_rac_report = title.chars().take(HEAD_CHARS).collect::<String>().contains("RAC");
	topology.is_rac_db = summary_value(&tables, &markers.rac_column).map_or(false, |v| v.trim().eq_ignore_ascii_case("YES"));

	if topology.is_rac_db && !topology.is_rac_report {
		warn!("non RAC report used for a RAC database");
		extraction.status = Some(Status::RacDatabaseWithoutRacReport);
	} else if !topology.is_rac_db && topology.is_rac_report {
		warn!("RAC report used for a non RAC database");
		extraction.status = Some(Status::RacReportWithoutRacDatabase);
	}

	if extraction.topology.is_rac_report {
		let raw = summary_value(&tables, &markers.total_column).unwrap_or_default();
		extraction.topology.inst_total = raw.trim().parse().map_err(|_| ExtractError::InvalidInstanceCount(raw.clone()))?;
		extraction.topology.inst_list = tables.get(1).map(instance_roster).unwrap_or_default();
		info!(total = extraction.topology.inst_total, present = ?extraction.topology.inst_list, "RAC instances");
	} else {
		extraction.topology.inst_total = 1;
	}

	let (db_rac, db_type) = if extraction.topology.is_rac_db { ("YES", "RAC") } else { ("NO", "SI") };
	extraction.push("db_rac", Value::text(db_rac));
	extraction.push("db_type", Value::text(db_type));

	let metrics = run_lookups(&tables, &extraction.topology);
	extraction.metrics.extend(metrics);
	extraction.push("db_inst_num", Value::Int(extraction.topology.inst_total as i64));

	let section = match source {
		SqlSource::Ordered => &markers.sql_ordered,
		SqlSource::List => &markers.sql_list,
	};
	let sql = search_sql(&doc, section, &markers.sql_module);
	for (key, rendered) in sql.render(RenderMode::Count, RenderMode::Count) {
		extraction.push(key, Value::Text(rendered));
	}

	if let Some((iops, mbps)) = top_databases_by_io(&doc) {
		extraction.push("iops_per_sec_from_top_10_section", iops);
		extraction.push("throughput_mb_per_sec_from_top_10_section", mbps);
	}

	Ok(extraction)
}
