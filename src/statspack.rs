//! Statspack (`.lst`) text reports.
//!
//! Statspack has no markup, table layout is implicit in token positions.
//! Every line is tested against a fixed list of literal markers; a matched
//! marker splits the line (or a line a few rows below it) and picks tokens
//! by position. When a position is missing or a number does not parse, the
//! remaining markers of that line are skipped and the scan moves on.

use crate::record::{Extraction, Status, Topology};
use crate::sqlclass::{RenderMode, SqlSummary};
use crate::staticdata::NOT_AVAILABLE;
use crate::tools::{first_line_with, split_runs, token_after};
use crate::value::{parse_locale_number, Value};
use linked_hash_map::LinkedHashMap;
use tracing::trace;

const SQL_SECTION_START: &str = "SQL ordered by";
const SQL_SECTION_END: &str = "Instance Activity Stats";
const MIB: f64 = 1048576.0;

/// Not printed by Statspack at all, or only by some releases.
const UNAVAILABLE_KEYS: [&str; 7] = [
	"host_cpu_num",
	"platform",
	"host_memory_mb",
	"db_name",
	"db_uname",
	"db_edition",
	"db_cdb",
];

/// Layout generation of the database header table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Era {
	/// `DB Name  DB Id  Instance  Inst Num  Release  Cluster  Host`
	Pre10g,
	/// `Database  DB Id  Instance  Inst Num  Startup Time  Release  RAC`
	Modern,
}

impl Era {
	fn detect(line: &str) -> Option<Era> {
		if !line.contains("DB Id") {
			None
		} else if line.contains("DB Name") {
			Some(Era::Pre10g)
		} else if line.contains("Database") {
			Some(Era::Modern)
		} else {
			None
		}
	}
}

/// Tokens of one line, split on runs of blanks.
struct Tokens<'a>(Vec<&'a str>);

impl<'a> Tokens<'a> {
	/// Split on every run of spaces.
	fn spaces(line: &'a str) -> Tokens<'a> {
		Tokens(split_runs(line, 1))
	}

	/// Split on runs of two or more spaces, keeps multi word labels together.
	fn columns(line: &'a str) -> Tokens<'a> {
		Tokens(split_runs(line, 2))
	}

	fn text(&self, pos: usize) -> Option<Value> {
		self.0.get(pos).map(|t| Value::text(t.trim()))
	}

	fn raw(&self, pos: usize) -> Option<&'a str> {
		self.0.get(pos).map(|t| t.trim())
	}

	fn number(&self, pos: usize) -> Option<Value> {
		number(self.0.get(pos)?)
	}
}

/// A token that must be numeric. Empty gives NaN, text is a miss.
fn number(token: &str) -> Option<Value> {
	match parse_locale_number(token) {
		Value::Text(_) => None,
		v => Some(v),
	}
}

fn divided(v: Value, divisor: f64) -> Value {
	match v.as_f64() {
		Some(f) => Value::Float(f / divisor),
		None => v,
	}
}

#[derive(Default)]
struct Scan {
	values: LinkedHashMap<&'static str, Value>,
	db_cpu_seen: u32,
	log_file_sync_seen: bool,
	log_file_pwrite_seen: bool,
	read_blocks: Option<f64>,
	write_blocks: Option<f64>,
	block_size: Option<f64>,
}

impl Scan {
	fn set(&mut self, key: &'static str, value: Value) {
		self.values.insert(key, value);
	}

	fn is_unresolved(&self, key: &str) -> bool {
		match self.values.get(key) {
			None => true,
			Some(Value::Text(s)) => s == NOT_AVAILABLE,
			Some(v) => v.as_f64().is_none(),
		}
	}

	fn database_header(&mut self, era: Era, row: &str) -> Option<()> {
		let t = Tokens::spaces(row);
		match era {
			Era::Pre10g => {
				self.set("db_name", t.text(0)?);
				self.set("db_id", t.text(1)?);
				self.set("db_inst_name", t.text(2)?);
				self.set("db_inst_num", t.number(3)?);
				self.set("db_release", t.text(4)?);
				self.set("db_rac", t.text(5)?);
				self.set("host_name", t.text(6)?);
			}
			Era::Modern => {
				self.set("db_id", t.text(1)?);
				self.set("db_inst_name", t.text(2)?);
				self.set("db_inst_num", t.number(3)?);
				self.set("db_release", t.text(6)?);
				self.set("db_rac", t.text(7)?);
			}
		}
		Some(())
	}

	/// Applies every marker rule to line `i`. `None` means a matched rule
	/// could not read its tokens and the rest of the line was skipped.
	fn scan_line(&mut self, lines: &[&str], i: usize) -> Option<()> {
		let row = lines[i];

		if let Some(era) = Era::detect(row) {
			self.database_header(era, lines.get(i + 2)?)?;
		}

		if row.starts_with("db_name ") && self.is_unresolved("db_name") {
			self.set("db_name", Tokens::columns(row).text(1)?);
		}

		// 10.2.0.5 prints host name and cpu count on a single line
		if row.contains("Host  Name") {
			self.set("host_name", Tokens::spaces(row).text(2)?);
		}
		if row.contains("Num CPUs") {
			self.set("host_cpu_num", Tokens::spaces(row).number(5)?);
		}

		if row.contains("Host") && row.contains("Name") && row.contains("Platform") {
			let t = Tokens::columns(lines.get(i + 2)?);
			self.set("host_name", t.text(1)?);
			self.set("platform", t.text(2)?);
			self.set("host_cpu_num", t.number(3)?);
		}

		let snapshot_header = row.contains("Snap Id") && row.contains("Snap Time");
		if snapshot_header {
			let begin = Tokens::spaces(lines.get(i + 2)?);
			self.set("db_snap_begin_time", Value::Text(format!("{} {}", begin.raw(3)?, begin.raw(4)?)));
			let end = Tokens::spaces(lines.get(i + 3)?);
			self.set("db_snap_end_time", Value::Text(format!("{} {}", end.raw(4)?, end.raw(5)?)));
		}

		// cpu
		if row.starts_with("cpu_count ") {
			self.set("db_cpu_count", Tokens::columns(row).number(1)?);
		}
		// OS statistics are in centiseconds
		if row.contains("BUSY_TIME ") {
			self.set("host_cpu_busy_time_s", divided(Tokens::columns(row).number(1)?, 100.0));
		}
		if row.contains("IDLE_TIME ") {
			self.set("host_cpu_idle_time_s", divided(Tokens::columns(row).number(1)?, 100.0));
		}
		if row.contains("DB CPU ") {
			self.db_cpu_seen += 1;
			if self.db_cpu_seen == 1 {
				let t = Tokens::columns(row);
				self.set("db_cpu_fg_time_s", t.number(1)?);
				self.set("db_cpu_pct_db_time", t.number(2)?);
			}
		}
		if row.contains("background cpu time ") {
			self.set("db_cpu_bg_time_s", Tokens::columns(row).number(1)?);
		}

		// memory
		for (marker, key) in [
			("Host Mem (MB):", "host_memory_mb"),
			("SGA use (MB):", "db_sga_usage_mb"),
			("PGA use (MB):", "db_pga_usage_mb"),
		] {
			if row.contains(marker) {
				self.set(key, Tokens::spaces(row).number(4)?);
			}
		}

		// io
		if row.contains("physical read total IO requests") {
			self.set("db_physical_read_total_io_ps", Tokens::spaces(row).number(6)?);
		}
		if row.contains("physical write total IO requests") {
			self.set("db_physical_write_total_io_ps", Tokens::spaces(row).number(6)?);
		}
		if row.contains("Physical reads:") {
			self.read_blocks = Tokens::columns(row).number(2)?.as_f64();
		}
		if row.contains("Physical writes:") {
			self.write_blocks = Tokens::columns(row).number(2)?.as_f64();
		}
		if row.starts_with("db_block_size") {
			self.block_size = Tokens::columns(row).number(1)?.as_f64();
		}

		// workload
		if row.contains("User calls:") {
			let t = Tokens::spaces(row);
			self.set("db_user_calls_ps", t.number(3)?);
			self.set("db_user_calls_pt", t.number(4)?);
		}
		if row.contains("user commits") {
			let t = Tokens::spaces(row);
			self.set("db_user_commits_ps", t.number(3)?);
			self.set("db_user_commits_pt", t.number(4)?);
		}
		if row.contains("Redo size:") {
			self.set("db_redo_mbps", divided(Tokens::spaces(row).number(3)?, MIB));
		}
		// foreground, background or both: the first table printed wins
		if row.contains("log file sync") && !self.log_file_sync_seen {
			self.set("db_log_file_sync_avg_wait_ms", Tokens::spaces(row).number(6)?);
			self.log_file_sync_seen = true;
		}
		if row.contains("log file parallel write") && !self.log_file_pwrite_seen {
			self.set("db_log_file_pwrite_avg_wait_ms", Tokens::spaces(row).number(7)?);
			self.log_file_pwrite_seen = true;
		}
		if row.contains("table scans (direct read)") {
			self.set("db_table_scans_dread_total", Tokens::spaces(row).number(4)?);
		}

		// time
		if snapshot_header {
			let elapsed = Tokens::columns(lines.get(i + 4)?);
			let minutes = token_after(&elapsed.0, "Elapsed:")?;
			self.set("elapsed_time_min", number(minutes.split(' ').next()?)?);
		}
		if row.contains("DB time:") && row.contains("DB CPU:") {
			let t = Tokens::spaces(row);
			let minutes = token_after(&t.0, "time:")?;
			self.set("db_time_min", number(&minutes.replace('#', ""))?);
		}
		if row.starts_with("DB time ") && self.is_unresolved("db_time_min") {
			self.set("db_time_min", divided(Tokens::columns(row).number(1)?, 60.0));
		}

		// init.ora
		if row.starts_with("compatible") {
			self.set("db_compatible", Tokens::spaces(row).text(1)?);
		}
		if row.starts_with("optimizer_features_enable") {
			self.set("db_optimizer_features_enable", Tokens::spaces(row).text(1)?);
		}

		Some(())
	}

	fn throughput(&mut self) {
		if let (Some(blocks), Some(size)) = (self.read_blocks, self.block_size) {
			self.set("db_physical_read_total_mbps", Value::Float(blocks * size / MIB));
		}
		if let (Some(blocks), Some(size)) = (self.write_blocks, self.block_size) {
			self.set("db_physical_write_total_mbps", Value::Float(blocks * size / MIB));
		}
	}
}

/// Lines strictly between the first `SQL ordered by` and the first
/// `Instance Activity Stats` line.
fn sql_section(lines: &[&str]) -> Option<std::ops::Range<usize>> {
	let first = first_line_with(lines, SQL_SECTION_START)?;
	let last = first_line_with(lines, SQL_SECTION_END)?;
	Some(first + 1..last.max(first + 1))
}

pub fn extract(text: &str) -> Extraction {
	let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
	let mut scan = Scan::default();
	for key in UNAVAILABLE_KEYS {
		scan.set(key, Value::text(NOT_AVAILABLE));
	}

	let mut sql = SqlSummary::default();
	if let Some(range) = sql_section(&lines) {
		for line in lines[range].iter().filter(|l| !l.is_empty()) {
			sql.add(line, line);
		}
	}

	for i in 0..lines.len() {
		if lines[i].is_empty() {
			continue;
		}
		if scan.scan_line(&lines, i).is_none() {
			trace!(line = i + 1, "statspack line skipped");
		}
	}
	scan.throughput();

	for (key, rendered) in sql.render(RenderMode::Count, RenderMode::Keys) {
		scan.set(key, Value::Text(rendered));
	}

	// RAC instances are not broken down, the report is read as single instance
	let is_rac = scan.values.get("db_rac").and_then(|v| v.as_str()) == Some("YES");
	let (db_type, status) = if is_rac { ("RAC", Status::PassedLimitedRac) } else { ("SI", Status::Passed) };
	scan.set("db_type", Value::text(db_type));

	let mut extraction = Extraction {
		status: Some(status),
		topology: Topology { inst_total: 1, ..Default::default() },
		..Default::default()
	};
	for (key, value) in scan.values {
		extraction.push(key, value);
	}
	extraction
}

#[cfg(test)]
mod tests {
	use super::*;

	const MODERN: &str = "\
STATSPACK report for

Database    DB Id    Instance     Inst Num  Startup Time   Release     RAC
~~~~~~~~ ----------- ------------ -------- --------------- ----------- ---
          1234567890 orcl                1 01-Jan-20 10:00 10.2.0.5.0  NO

Host  Name:   dbhost01          Num CPUs:   16        Phys Memory (MB):   16,384

              Snap Id     Snap Time      Sessions Curs/Sess Comment
            --------- ------------------ -------- --------- -------------------
Begin Snap:      1001 01-Jan-20 10:00:00       50       2.0
  End Snap:      1002 01-Jan-20 11:00:00       52       2.1
   Elapsed:               60.00 (mins)

Load Profile              Per Second    Per Transaction
      Redo size:        1,048,576.0          5,000.0
  Physical reads:             100.0             10.0
  Physical writes:              50.0              5.0
      User calls:             200.0             20.0

Event                                            Waits    Timeouts  Time (s)    (ms)   /txn
log file sync                                    1,000         0          2       2      0.1
log file parallel write                          1,000         0          1       1      0.1
log file sync                                    9,999         0          9       9      0.9

Statistic                                       Time (s) % of DB time
DB CPU                                           1,800.0         25.0
background cpu time                                180.0
DB time                                          7,200.0

SQL ordered by Gets  DB/Inst: ORCL/orcl
select count(*) from orders
select * from (select /*+ full(o) */ id from orders o)

Instance Activity Stats  DB/Inst: ORCL/orcl  Snaps: 1001-1002
physical read total IO requests              360,000          100.0         10.0
physical write total IO requests             180,000           50.0          5.0
table scans (direct read)                          12            0.0          0.0
user commits                                  36,000           10.0          1.0

Statistic                                  Total
BUSY_TIME                                360,000
IDLE_TIME                                360,000

                                   Begin          End
                Host Mem (MB):      16,384.0     16,384.0
                 SGA use (MB):       3,000.0      3,000.0
                 PGA use (MB):       1,000.0      1,100.0

Parameter Name                Begin value
compatible                    10.2.0.5.0
cpu_count                     16
db_block_size                 8192
db_name                       ORCL
optimizer_features_enable     10.2.0.5
";

	fn value<'e>(e: &'e Extraction, key: &str) -> Option<&'e Value> {
		e.metrics.iter().find(|m| m.key == key).map(|m| &m.value)
	}

	#[test]
	fn modern_report_header_and_host() {
		let e = extract(MODERN);
		assert_eq!(value(&e, "db_id"), Some(&Value::text("1234567890")));
		assert_eq!(value(&e, "db_inst_name"), Some(&Value::text("orcl")));
		assert_eq!(value(&e, "db_release"), Some(&Value::text("10.2.0.5.0")));
		assert_eq!(value(&e, "db_rac"), Some(&Value::text("NO")));
		assert_eq!(value(&e, "db_name"), Some(&Value::text("ORCL")));
		assert_eq!(value(&e, "host_name"), Some(&Value::text("dbhost01")));
		assert_eq!(value(&e, "host_cpu_num"), Some(&Value::Float(16.0)));
		assert_eq!(value(&e, "platform"), Some(&Value::text("n.a.")));
		assert_eq!(value(&e, "db_type"), Some(&Value::text("SI")));
		assert_eq!(e.status, Some(Status::Passed));
	}

	#[test]
	fn modern_report_snapshot_and_time() {
		let e = extract(MODERN);
		assert_eq!(value(&e, "db_snap_begin_time"), Some(&Value::text("01-Jan-20 10:00:00")));
		assert_eq!(value(&e, "db_snap_end_time"), Some(&Value::text("01-Jan-20 11:00:00")));
		assert_eq!(value(&e, "elapsed_time_min"), Some(&Value::Float(60.0)));
		assert_eq!(value(&e, "db_time_min"), Some(&Value::Float(120.0)));
	}

	#[test]
	fn modern_report_load() {
		let e = extract(MODERN);
		assert_eq!(value(&e, "host_cpu_busy_time_s"), Some(&Value::Float(3600.0)));
		assert_eq!(value(&e, "host_cpu_idle_time_s"), Some(&Value::Float(3600.0)));
		assert_eq!(value(&e, "db_cpu_fg_time_s"), Some(&Value::Float(1800.0)));
		assert_eq!(value(&e, "db_cpu_pct_db_time"), Some(&Value::Float(25.0)));
		assert_eq!(value(&e, "db_cpu_bg_time_s"), Some(&Value::Float(180.0)));
		assert_eq!(value(&e, "db_cpu_count"), Some(&Value::Float(16.0)));
		assert_eq!(value(&e, "host_memory_mb"), Some(&Value::Float(16384.0)));
		assert_eq!(value(&e, "db_sga_usage_mb"), Some(&Value::Float(3000.0)));
		assert_eq!(value(&e, "db_redo_mbps"), Some(&Value::Float(1.0)));
		assert_eq!(value(&e, "db_user_calls_pt"), Some(&Value::Float(20.0)));
		assert_eq!(value(&e, "db_user_commits_ps"), Some(&Value::Float(10.0)));
		assert_eq!(value(&e, "db_physical_read_total_io_ps"), Some(&Value::Float(100.0)));
		assert_eq!(value(&e, "db_physical_read_total_mbps"), Some(&Value::Float(0.78125)));
		assert_eq!(value(&e, "db_physical_write_total_mbps"), Some(&Value::Float(0.390625)));
		assert_eq!(value(&e, "db_table_scans_dread_total"), Some(&Value::Float(12.0)));
		assert_eq!(value(&e, "db_compatible"), Some(&Value::text("10.2.0.5.0")));
		assert_eq!(value(&e, "db_optimizer_features_enable"), Some(&Value::text("10.2.0.5")));
	}

	#[test]
	fn first_wait_event_table_wins() {
		let e = extract(MODERN);
		assert_eq!(value(&e, "db_log_file_sync_avg_wait_ms"), Some(&Value::Float(2.0)));
		assert_eq!(value(&e, "db_log_file_pwrite_avg_wait_ms"), Some(&Value::Float(1.0)));
	}

	#[test]
	fn sql_between_section_markers() {
		let e = extract(MODERN);
		assert_eq!(value(&e, "db_sql"), Some(&Value::text("count*(1) select*(1)")));
		assert_eq!(value(&e, "db_hints"), Some(&Value::text("FULL")));
	}

	#[test]
	fn pre_10g_header_and_rac_flag() {
		let text = "\
DB Name         DB Id    Instance     Inst Num Release     Cluster Host
------------ ----------- ------------ -------- ----------- ------- ------------
PROD           987654321 prod1               1 9.2.0.8.0   YES     node1
";
		let e = extract(text);
		assert_eq!(value(&e, "db_name"), Some(&Value::text("PROD")));
		assert_eq!(value(&e, "db_release"), Some(&Value::text("9.2.0.8.0")));
		assert_eq!(value(&e, "host_name"), Some(&Value::text("node1")));
		assert_eq!(value(&e, "db_type"), Some(&Value::text("RAC")));
		assert_eq!(e.status, Some(Status::PassedLimitedRac));
		assert!(!e.topology.is_rac_report);
	}

	#[test]
	fn unreadable_line_is_skipped() {
		let text = "BUSY_TIME   n/a\nIDLE_TIME   500\n";
		let e = extract(text);
		assert_eq!(value(&e, "host_cpu_busy_time_s"), None);
		assert_eq!(value(&e, "host_cpu_idle_time_s"), Some(&Value::Float(5.0)));
	}
}
