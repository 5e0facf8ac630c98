use crate::awr::{self, SqlSource};
use crate::calc;
use crate::error::{BatchError, ExtractError};
use crate::rac;
use crate::record::{assemble, DatabaseRecord, ReportRecords};
use crate::sidedata::{Inventory, SideData};
use crate::staticdata::{INVENTORY_HOST_FILE, INVENTORY_INFO_FILE, SIZE_FILE_SUFFIX};
use crate::statspack;
use crate::tools::base_name;
use crate::value::Value;
use std::fs;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{error, info, warn};

/// One uploaded file: its name as given and its decoded text.
#[derive(Debug, Clone)]
pub struct InputFile {
	pub name: String,
	pub content: String,
}

impl InputFile {
	pub fn new(name: &str, content: &str) -> InputFile {
		InputFile { name: name.to_string(), content: content.to_string() }
	}

	/// Invalid UTF-8 sequences are replaced, reports are often written in a legacy charset.
	pub fn from_bytes(name: &str, bytes: &[u8]) -> InputFile {
		InputFile { name: name.to_string(), content: String::from_utf8_lossy(bytes).into_owned() }
	}

	pub fn read(path: &Path) -> Result<InputFile, BatchError> {
		let bytes = fs::read(path).map_err(|source| BatchError::Io { path: path.to_path_buf(), source })?;
		Ok(InputFile::from_bytes(&path.display().to_string(), &bytes))
	}

	pub fn kind(&self) -> FileKind {
		FileKind::of(&self.name)
	}
}

/// Every regular file of `dir`, in file name order.
pub fn read_dir(dir: &Path) -> Result<Vec<InputFile>, BatchError> {
	let io_err = |source| BatchError::Io { path: dir.to_path_buf(), source };
	let mut paths = Vec::new();
	for entry in fs::read_dir(dir).map_err(io_err)? {
		let path = entry.map_err(io_err)?.path();
		if path.is_file() {
			paths.push(path);
		}
	}
	paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
	paths.iter().map(|p| InputFile::read(p)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
	Awr,
	Statspack,
	InventoryInfo,
	InventoryHost,
	Size,
	Unsupported,
}

impl FileKind {
	pub fn of(name: &str) -> FileKind {
		let base = base_name(name);
		if base == INVENTORY_INFO_FILE {
			return FileKind::InventoryInfo;
		}
		if base == INVENTORY_HOST_FILE {
			return FileKind::InventoryHost;
		}
		if base.ends_with(SIZE_FILE_SUFFIX) {
			return FileKind::Size;
		}
		let lower = base.to_lowercase();
		if lower.ends_with(".html") || lower.ends_with(".htm") {
			FileKind::Awr
		} else if lower.ends_with(".lst") {
			FileKind::Statspack
		} else {
			FileKind::Unsupported
		}
	}

	pub fn is_report(&self) -> bool {
		matches!(self, FileKind::Awr | FileKind::Statspack)
	}
}

#[derive(Debug, Clone, Default)]
pub struct Options {
	pub sql_source: SqlSource,
	/// running "Number of reports parsed" counter on stderr
	pub progress: bool,
}

/// Reads the inventory and size files of a batch. Broken side files are
/// reported and left out, they never stop the reports from being parsed.
pub fn load_side_data(inputs: &[InputFile]) -> SideData {
	let mut side = SideData::default();
	let mut info: Option<&InputFile> = None;
	let mut hosts: Option<&InputFile> = None;

	for file in inputs {
		match file.kind() {
			FileKind::InventoryInfo | FileKind::InventoryHost => {
				let slot = if file.kind() == FileKind::InventoryInfo { &mut info } else { &mut hosts };
				if slot.is_some() {
					warn!(file = file.name.as_str(), "only one inventory file of each kind is used, ignoring");
					continue;
				}
				info!(file = file.name.as_str(), "found inventory file");
				*slot = Some(file);
			}
			FileKind::Size => {
				info!(file = file.name.as_str(), "found database size file");
				if let Err(e) = side.sizes.add_file(&file.name, &file.content) {
					warn!(error = %e, "database size file skipped");
				}
			}
			_ => {}
		}
	}

	match (info, hosts) {
		(Some(i), Some(h)) => match Inventory::load(&i.name, &i.content, &h.name, &h.content) {
			Ok(inv) => side.inventory = Some(inv),
			Err(e) => warn!(error = %e, "inventory files skipped"),
		},
		(None, None) => {}
		_ => warn!("inventory mapping needs both {} and {}", INVENTORY_INFO_FILE, INVENTORY_HOST_FILE),
	}
	side
}

fn extract_report(file: &InputFile, kind: FileKind, side: &SideData, source: SqlSource) -> Result<ReportRecords, ExtractError> {
	let extraction = match kind {
		FileKind::Statspack => statspack::extract(&file.content),
		_ => awr::extract(&file.content, source)?,
	};
	let mut report = assemble(&file.name, extraction);
	if report.is_unsupported() {
		return Ok(report);
	}

	let rac_report = report.topology.is_rac_report;
	side.join(&mut report.global, &mut report.instances, rac_report);
	rac::collapse_single_instance(&mut report);

	for inst in report.instances.iter_mut() {
		calc::apply_instance(inst);
	}
	rac::aggregate(&mut report.global, &report.instances);
	calc::apply_global(&mut report.global);
	Ok(report)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_string()
	}
}

/// Extracts one report. Whatever goes wrong inside ends up as a single `FAILED` row.
pub fn process_report(file: &InputFile, side: &SideData, source: SqlSource) -> ReportRecords {
	let kind = file.kind();
	info!(file = file.name.as_str(), "parse file");
	let result = panic::catch_unwind(AssertUnwindSafe(|| extract_report(file, kind, side, source)))
		.unwrap_or_else(|payload| Err(ExtractError::Panicked(panic_message(payload.as_ref()))));
	match result {
		Ok(report) => report,
		Err(e) => {
			error!(file = file.name.as_str(), error = %e, "error while processing report, moving on to next");
			ReportRecords::failed(&file.name)
		}
	}
}

/// Runs a whole batch and returns the output rows in input order, ids assigned.
pub fn run(inputs: &[InputFile], options: &Options) -> Result<Vec<DatabaseRecord>, BatchError> {
	for file in inputs.iter().filter(|f| f.kind() == FileKind::Unsupported) {
		warn!(file = file.name.as_str(), "skip unsupported file");
	}
	let reports: Vec<&InputFile> = inputs.iter().filter(|f| f.kind().is_report()).collect();
	if reports.is_empty() {
		return Err(BatchError::NoReports);
	}

	let side = load_side_data(inputs);
	let mut rows: Vec<DatabaseRecord> = Vec::new();
	for (n, file) in reports.iter().enumerate() {
		rows.extend(process_report(file, &side, options.sql_source).into_rows());
		if options.progress {
			eprint!("\rNumber of reports parsed: {}", n + 1);
			io::stderr().flush().ok();
		}
	}
	if options.progress {
		eprintln!();
	}

	for (i, row) in rows.iter_mut().enumerate() {
		row.set("id", Value::Int(i as i64 + 1));
	}
	Ok(rows)
}
