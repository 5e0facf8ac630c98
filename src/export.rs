use crate::error::ExportError;
use crate::record::DatabaseRecord;
use crate::staticdata::{OutputColumn, OUTPUT_COLUMNS};
use crate::value::Value;
use linked_hash_map::LinkedHashMap;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
	#[default]
	Csv,
	Json,
}

impl FromStr for Format {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"csv" => Ok(Format::Csv),
			"json" => Ok(Format::Json),
			other => Err(format!("unknown output format {:?}, expected csv or json", other)),
		}
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Format::Csv => write!(f, "csv"),
			Format::Json => write!(f, "json"),
		}
	}
}

/// Header naming and column order of the exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
	/// internal column names, canonical order
	#[default]
	Columns,
	/// spreadsheet names, display order
	Display,
}

impl FromStr for HeaderMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"columns" => Ok(HeaderMode::Columns),
			"display" => Ok(HeaderMode::Display),
			other => Err(format!("unknown header mode {:?}, expected columns or display", other)),
		}
	}
}

impl fmt::Display for HeaderMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HeaderMode::Columns => write!(f, "columns"),
			HeaderMode::Display => write!(f, "display"),
		}
	}
}

impl HeaderMode {
	pub fn columns(&self) -> Vec<&'static OutputColumn> {
		let mut cols: Vec<&'static OutputColumn> = OUTPUT_COLUMNS.iter().collect();
		match self {
			HeaderMode::Columns => cols.sort_by_key(|c| c.ccol),
			HeaderMode::Display => cols.sort_by_key(|c| c.xcol),
		}
		cols
	}

	fn header(&self, col: &OutputColumn) -> &'static str {
		match self {
			HeaderMode::Columns => col.name,
			HeaderMode::Display => col.display,
		}
	}
}

pub fn delimiter_byte(delimiter: &str) -> Result<u8, ExportError> {
	match delimiter.as_bytes() {
		[b] if b.is_ascii() => Ok(*b),
		_ => Err(ExportError::Delimiter(delimiter.to_string())),
	}
}

pub fn to_csv(rows: &[DatabaseRecord], headers: HeaderMode, delimiter: u8) -> Result<String, ExportError> {
	let cols = headers.columns();
	let mut wtr = csv::WriterBuilder::new().delimiter(delimiter).from_writer(Vec::new());
	wtr.write_record(cols.iter().map(|c| headers.header(c)))?;
	for row in rows {
		wtr.write_record(cols.iter().map(|c| row.get(c.name).to_string()))?;
	}
	let bytes = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn to_json(rows: &[DatabaseRecord], headers: HeaderMode) -> Result<String, ExportError> {
	let cols = headers.columns();
	let objects: Vec<LinkedHashMap<&str, &Value>> = rows
		.iter()
		.map(|row| cols.iter().map(|c| (headers.header(c), row.get(c.name))).collect())
		.collect();
	Ok(serde_json::to_string_pretty(&objects)?)
}

pub fn render(rows: &[DatabaseRecord], format: Format, headers: HeaderMode, delimiter: &str) -> Result<String, ExportError> {
	match format {
		Format::Csv => to_csv(rows, headers, delimiter_byte(delimiter)?),
		Format::Json => to_json(rows, headers),
	}
}
