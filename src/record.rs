use crate::staticdata::{INTERNAL_KEYS, OUTPUT_COLUMNS, SHARED_DATABASE_KEYS};
use crate::tools::normalize_filename;
use crate::value::Value;
use linked_hash_map::LinkedHashMap;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Passed,
	PassedLimitedRac,
	Failed,
	RacDatabaseWithoutRacReport,
	RacReportWithoutRacDatabase,
	NotInReport,
	UnsupportedPdb,
	UnsupportedDiff,
}

impl Status {
	pub fn as_str(&self) -> &'static str {
		match self {
			Status::Passed => "PASSED",
			Status::PassedLimitedRac => "PASSED (limited rac support)",
			Status::Failed => "FAILED",
			Status::RacDatabaseWithoutRacReport => "FAILED (RAC database but no RAC report)",
			Status::RacReportWithoutRacDatabase => "FAILED (RAC report but no RAC database)",
			Status::NotInReport => "FAILED (not in report)",
			Status::UnsupportedPdb => "UNSUPPORTED (pdb or root level report)",
			Status::UnsupportedDiff => "UNSUPPORTED (diff report)",
		}
	}

	pub fn is_unsupported(&self) -> bool {
		matches!(self, Status::UnsupportedPdb | Status::UnsupportedDiff)
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Which record a located value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
	Global,
	Instance(u32),
}

/// One located and typed value, produced by a single lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetric {
	pub scope: Scope,
	pub row: String,
	pub col: &'static str,
	pub value: Value,
	pub key: &'static str,
}

impl RawMetric {
	pub fn global(key: &'static str, value: Value) -> RawMetric {
		RawMetric { scope: Scope::Global, row: String::new(), col: "", value, key }
	}
}

/// RAC layout of a report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
	pub is_rac_db: bool,
	pub is_rac_report: bool,
	/// configured instances of the cluster
	pub inst_total: u32,
	/// instances the report actually covers
	pub inst_list: Vec<u32>,
}

/// Everything an extractor learned from one report.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
	pub metrics: Vec<RawMetric>,
	pub status: Option<Status>,
	pub topology: Topology,
}

impl Extraction {
	pub fn unsupported(status: Status) -> Extraction {
		Extraction { status: Some(status), ..Default::default() }
	}

	pub fn push(&mut self, key: &'static str, value: Value) {
		self.metrics.push(RawMetric::global(key, value));
	}
}

/// A row of the output table. Every output column and working key exists
/// from construction on, unresolved ones hold `Value::Empty`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseRecord {
	fields: LinkedHashMap<&'static str, Value>,
}

static EMPTY: Value = Value::Empty;

impl Default for DatabaseRecord {
	fn default() -> Self {
		Self::new()
	}
}

impl DatabaseRecord {
	pub fn new() -> DatabaseRecord {
		let mut fields = LinkedHashMap::new();
		for col in OUTPUT_COLUMNS.iter() {
			fields.insert(col.name, Value::Empty);
		}
		for key in INTERNAL_KEYS {
			fields.insert(key, Value::Empty);
		}
		DatabaseRecord { fields }
	}

	pub fn get(&self, key: &str) -> &Value {
		self.fields.get(key).unwrap_or(&EMPTY)
	}

	pub fn number(&self, key: &str) -> Option<f64> {
		self.get(key).as_f64()
	}

	pub fn set(&mut self, key: &str, value: Value) {
		match self.fields.get_mut(key) {
			Some(slot) => *slot = value,
			None => warn!(key, "value for unknown column dropped"),
		}
	}

	/// Stores `value` unless the key already holds something.
	pub fn set_if_blank(&mut self, key: &str, value: Value) {
		if self.get(key).is_blank() {
			self.set(key, value);
		}
	}

	pub fn set_status(&mut self, status: Status) {
		self.set("status", Value::text(status.as_str()));
	}

	pub fn status(&self) -> String {
		self.get("status").to_string()
	}

	pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.fields.keys().copied()
	}

	/// Exported columns only, canonical order.
	pub fn output_fields(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
		OUTPUT_COLUMNS.iter().map(move |c| (c.name, self.get(c.name)))
	}
}

/// The cluster (or single instance) record of a report plus its RAC instance records.
#[derive(Debug, Clone, Default)]
pub struct ReportRecords {
	pub global: DatabaseRecord,
	pub instances: Vec<DatabaseRecord>,
	pub topology: Topology,
}

impl ReportRecords {
	pub fn failed(filename: &str) -> ReportRecords {
		let mut global = DatabaseRecord::new();
		global.set("filename", Value::text(&normalize_filename(filename)));
		global.set_status(Status::Failed);
		ReportRecords { global, ..Default::default() }
	}

	pub fn is_unsupported(&self) -> bool {
		self.global.status().starts_with("UNSUPPORTED")
	}

	pub fn into_rows(self) -> Vec<DatabaseRecord> {
		let mut rows = Vec::with_capacity(1 + self.instances.len());
		rows.push(self.global);
		rows.extend(self.instances);
		rows
	}
}

/// Merges the scope tagged metrics of one report into its records.
pub fn assemble(filename: &str, extraction: Extraction) -> ReportRecords {
	let filename = normalize_filename(filename);
	let topo = extraction.topology;

	let mut global = DatabaseRecord::new();
	global.set("filename", Value::text(&filename));
	global.set("parent", Value::text("none"));
	if let Some(status) = extraction.status {
		global.set_status(status);
	}
	if extraction.status.map_or(false, |s| s.is_unsupported()) {
		return ReportRecords { global, instances: Vec::new(), topology: topo };
	}

	let mut instances: Vec<DatabaseRecord> = Vec::new();
	if topo.is_rac_report {
		for id in 1..=topo.inst_total {
			let mut inst = DatabaseRecord::new();
			inst.set("db_inst_id", Value::Int(id as i64));
			inst.set("db_type", Value::text("RACI"));
			inst.set("filename", Value::text(&filename));
			inst.set("parent", Value::text(&filename));
			instances.push(inst);
		}
	}

	for metric in extraction.metrics {
		if SHARED_DATABASE_KEYS.contains(&metric.key) && topo.inst_total > 1 {
			for inst in instances.iter_mut() {
				inst.set_if_blank(metric.key, metric.value.clone());
			}
		}
		match metric.scope {
			Scope::Instance(id) if id >= 1 && (id as usize) <= instances.len() => {
				instances[id as usize - 1].set_if_blank(metric.key, metric.value)
			}
			_ => global.set_if_blank(metric.key, metric.value),
		}
	}

	if !topo.is_rac_db {
		global.set("db_inst_id", Value::Int(1));
	}
	let db_rac = global.get("db_rac").clone();
	for inst in instances.iter_mut() {
		inst.set("db_rac", db_rac.clone());
	}

	if global.get("status").is_blank() {
		global.set_status(Status::Passed);
	}
	for inst in instances.iter_mut() {
		if inst.get("status").is_blank() {
			let in_report = inst.number("db_inst_id").map_or(false, |id| topo.inst_list.contains(&(id as u32)));
			inst.set_status(if in_report { Status::Passed } else { Status::NotInReport });
		}
	}

	ReportRecords { global, instances, topology: topo }
}
