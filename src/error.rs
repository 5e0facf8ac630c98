use std::path::PathBuf;
use thiserror::Error;

/// Failure that aborts the extraction of a single report.
/// The pipeline turns it into a `FAILED` row and moves on.
#[derive(Debug, Error)]
pub enum ExtractError {
	#[error("no html tables found in report")]
	NoReportTables,

	#[error("cannot read RAC instance count from {0:?}")]
	InvalidInstanceCount(String),

	#[error("extraction panicked: {0}")]
	Panicked(String),

	#[error("invalid built-in marker pattern: {0}")]
	Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum SideDataError {
	#[error("{file}: {source}")]
	Csv {
		file: String,
		#[source]
		source: csv::Error,
	},

	#[error("{file}: missing column {column:?}")]
	MissingColumn { file: String, column: &'static str },
}

#[derive(Debug, Error)]
pub enum BatchError {
	#[error("could not find any supported report files")]
	NoReports,

	#[error("cannot read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

#[derive(Debug, Error)]
pub enum ExportError {
	#[error("csv output: {0}")]
	Csv(#[from] csv::Error),

	#[error("json output: {0}")]
	Json(#[from] serde_json::Error),

	#[error("output delimiter must be a single ascii character, got {0:?}")]
	Delimiter(String),
}
