// Declarative tables driving the extraction.
//
// - lookup tables, one per AWR dialect (single instance, RAC global, RAC instance)
// - SQL text dictionaries for the classifier
// - RAC aggregation rules
// - output column catalog and side file column maps
//
// Row and column matchers are regular expressions, start anchored when applied.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Numeric,
}

/// One declared lookup: where the value sits and how it is stored.
#[derive(Debug, Clone, Copy)]
pub struct Lookup {
    pub row: &'static str,
    pub col: &'static str,
    pub key: &'static str,
    pub kind: ValueKind,
    /// `<= 0` stores an integer
    pub decimals: i32,
    pub divisor: f64,
}

const fn s(row: &'static str, col: &'static str, key: &'static str) -> Lookup {
    Lookup { row, col, key, kind: ValueKind::Text, decimals: 0, divisor: 1.0 }
}

const fn n(row: &'static str, col: &'static str, key: &'static str, decimals: i32, divisor: f64) -> Lookup {
    Lookup { row, col, key, kind: ValueKind::Numeric, decimals, divisor }
}

// ─────────────────────────────────────────────────────────────────────────────
// AWR single instance report
// ─────────────────────────────────────────────────────────────────────────────
pub const LOOKUPS_STD: [Lookup; 40] = [
    // report header
    s("", "DB Id", "db_id"),
    s("", "DB Name", "db_name"),
    s("", "Unique Name", "db_uname"),
    // 12.1 headers have no "Unique Name" column
    s("db_unique_name", "Begin value", "db_uname"),
    s("", "Instance", "db_inst_name"),
    s("", "Edition", "db_edition"),
    s("", "CDB", "db_cdb"),
    s("", "Release", "db_release"),
    s("", "Host Name", "host_name"),
    s("", "Platform", "platform"),
    s("Begin Snap:", "Snap Time", "db_snap_begin_time"),
    s("End Snap:", "Snap Time", "db_snap_end_time"),

    // CPU
    n("", "CPUs", "host_cpu_num", 0, 1.0),
    n("cpu_count", "Begin value", "db_cpu_count", 0, 1.0),
    n("BUSY_TIME", "Value", "host_cpu_busy_time_s", 2, 100.0),
    n("IDLE_TIME", "Value", "host_cpu_idle_time_s", 2, 100.0),
    n("DB CPU", r"Time \(s\)", "db_cpu_fg_time_s", 2, 1.0),
    n("background cpu time", r"Time \(s\)", "db_cpu_bg_time_s", 2, 1.0),

    // memory
    n(r"Host Mem \(MB\):", "Begin", "host_memory_mb", 0, 1.0),
    n(r"SGA use \(MB\):", "Begin", "db_sga_usage_mb", 0, 1.0),
    n(r"PGA use \(MB\):", "Begin", "db_pga_usage_mb", 0, 1.0),

    // IO
    n("physical read total IO requests", "per Second", "db_physical_read_total_io_ps", 2, 1.0),
    n("physical write total IO requests", "per Second", "db_physical_write_total_io_ps", 2, 1.0),
    n("physical read total bytes", "per Second", "db_physical_read_total_mbps", 2, 1048576.0),
    n("physical write total bytes", "per Second", "db_physical_write_total_mbps", 2, 1048576.0),

    // workload
    n("user calls", "per Second", "db_user_calls_ps", 2, 1.0),
    n("user commits", "per Second", "db_user_commits_ps", 2, 1.0),
    n("user calls", "per Trans", "db_user_calls_pt", 2, 1.0),
    n("user commits", "per Trans", "db_user_commits_pt", 2, 1.0),
    n(r"Redo size \(bytes\):", "Per Second", "db_redo_mbps", 6, 1048576.0),
    n("log file sync", "Avg wait", "db_log_file_sync_avg_wait_ms", 2, 1.0),
    n("log file sync", r"Avg wait \(ms\)", "db_log_file_sync_avg_wait_ms", 2, 1.0),
    n("log file parallel write", "Avg wait", "db_log_file_pwrite_avg_wait_ms", 2, 1.0),
    n("log file parallel write", r"Avg wait \(ms\)", "db_log_file_pwrite_avg_wait_ms", 2, 1.0),
    n(r"table scans \(direct read\)", "Total", "db_table_scans_dread_total", 0, 1.0),

    // time
    n("Elapsed:", "Snap Time", "elapsed_time_min", 2, 1.0),
    n("DB Time:", "Snap Time", "db_time_min", 2, 1.0),
    n("DB CPU", "% DB time", "db_cpu_pct_db_time", 2, 1.0),

    // init.ora
    s("compatible", "Begin value", "db_compatible"),
    s("optimizer_features_enable", "Begin value", "db_optimizer_features_enable"),
];

// ─────────────────────────────────────────────────────────────────────────────
// AWR RAC report, cluster wide tables
// ─────────────────────────────────────────────────────────────────────────────
pub const LOOKUPS_RAC: [Lookup; 19] = [
    // "Database Summary"
    s("", "Id", "db_id"),
    s("", "Name", "db_name"),
    s("", "Unique Name", "db_uname"),
    s("", "Edition", "db_edition"),
    s("", "CDB", "db_cdb"),

    // "System Statistics (Global)", IO is only reported cluster wide
    n("physical read total IO requests", "per Second", "db_physical_read_total_io_ps", 2, 1.0),
    n("physical write total IO requests", "per Second", "db_physical_write_total_io_ps", 2, 1.0),
    n("physical read total bytes", "per Second", "db_physical_read_total_mbps", 2, 1048576.0),
    n("physical write total bytes", "per Second", "db_physical_write_total_mbps", 2, 1048576.0),

    n("user calls", "per Second", "db_user_calls_ps", 2, 1.0),
    n("user commits", "per Second", "db_user_commits_ps", 2, 1.0),
    n("user calls", "per Trans", "db_user_calls_pt", 2, 1.0),
    n("user commits", "per Trans", "db_user_commits_pt", 2, 1.0),
    n("redo size", "per Second", "db_redo_mbps", 6, 1048576.0),
    n(r"table scans \(direct read\)", "Total", "db_table_scans_dread_total", 0, 1.0),
    n("log file sync", "Avg Wait", "db_log_file_sync_avg_wait_ms", 2, 1.0),
    n("log file parallel write", "Avg Wait", "db_log_file_pwrite_avg_wait_ms", 2, 1.0),

    // "Database Summary"
    n("", "Elapsed time", "elapsed_time_min", 2, 1.0),
    n("", "DB time", "db_time_min", 2, 1.0),
];

// ─────────────────────────────────────────────────────────────────────────────
// AWR RAC report, per instance tables.
// An empty row matcher is replaced by the instance number.
// ─────────────────────────────────────────────────────────────────────────────
pub const LOOKUPS_RAC_INSTANCE: [Lookup; 26] = [
    // "Database Instances Included In Report"
    s("", "Instance", "db_inst_name"),
    s("", "Release", "db_release"),
    s("", "Host", "host_name"),
    s("", "Platform", "platform"),
    s("", "Begin Snap Time", "db_snap_begin_time"),
    s("", "End Snap Time", "db_snap_end_time"),

    // "OS Statistics By Instance", 19c and 11.2 headers
    n("", "#CPUs", "host_cpu_num", 0, 1.0),
    n("", "Num CPUs", "host_cpu_num", 0, 1.0),
    n("cpu_count", "Begin value", "db_cpu_count", 0, 1.0),
    n("", "Busy", "host_cpu_busy_time_s", 2, 1.0),
    n("", "Idle", "host_cpu_idle_time_s", 2, 1.0),
    n("", r"DB CPU \(s\)", "db_cpu_fg_time_s", 2, 1.0),
    n("", r"bg CPU \(s\)", "db_cpu_bg_time_s", 2, 1.0),

    // memory, 11.2/12.1 and 18c/19c headers
    n("", r"Memory \(M\)", "host_memory_mb", 0, 1.0),
    n("", "MB", "host_memory_mb", 0, 1.0),
    n("pga_aggregate_target", "Begin value", "db_pga_usage_mb", 0, 1048576.0),
    n("sga_max_size", "Begin value", "db_sga_usage_mb", 0, 1048576.0),
    n("sga_target", "Begin value", "db_sga_usage_mb", 0, 1048576.0),
    n("memory_target", "Begin value", "db_memory_mb", 0, 1048576.0),

    n("", r"Redo Size \(k\)/s", "db_redo_mbps", 6, 1024.0),

    n("", r"Elapsed Time\(min\)", "elapsed_time_min", 2, 1.0),
    n("", r"DB time\(min\)", "db_time_min", 2, 1.0),
    n("", "DB CPU", "db_cpu_pct_db_time", 2, 1.0),
    n("", "DB CPU +%DB time", "db_cpu_pct_db_time", 2, 1.0),

    // "init.ora Parameters", rows filtered by instance
    s("compatible", "Begin value", "db_compatible"),
    s("optimizer_features_enable", "Begin value", "db_optimizer_features_enable"),
];

// ─────────────────────────────────────────────────────────────────────────────
// SQL text dictionaries
// flags: i = case insensitive (default), s = case sensitive, r = regex
// ─────────────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy)]
pub struct SqlPattern {
    pub tag: &'static str,
    pub pattern: &'static str,
    pub flags: &'static str,
}

const fn sp(tag: &'static str, pattern: &'static str, flags: &'static str) -> SqlPattern {
    SqlPattern { tag, pattern, flags }
}

pub const SQL_TEXT: [SqlPattern; 6] = [
    sp("count*", "count(*)", ""),
    sp("distinct", "distinct", ""),
    sp("begin", "begin", ""),
    sp("select_max", "select.*max", "r"),
    sp("select*", "select *", ""),
    sp("order_by", "order by", ""),
];

pub const SQL_DBMS: [SqlPattern; 19] = [
    sp("DBMS", "dbms", ""),
    sp("DBMS_SCHEDULER", "dbms_scheduler", ""),
    sp("DBMS_SNAPSHOT", "dbms_snapshot", ""),
    sp("DBMS_LOCK_ALLOCATED", "dbms_lock_allocated", ""),
    sp("DBMS_AQ", "dbms_aq", ""),
    sp("DBMS_JAVA", "dbms_java", ""),
    sp("DBMS_MVIEW", "dbms_mview", ""),
    sp("DBMS_XDB", "dbms_xdb", ""),
    sp("DBMS_JSON", "dbms_json", ""),
    sp("DBMS_RANDOM", "dbms_random", ""),
    sp("DBMS_XML", "dbms_xml", ""),
    sp("DBMS_UTILITY", "dbms_utility", ""),
    sp("DBMS_NLE", "dbms_nle", ""),
    sp("DBMS_TF", "dbms_tf", ""),
    sp("DBMS_OUTPUT", "dbms_output", ""),
    sp("DBMS_JOB", "dbms_job", ""),
    sp("DBMS_ASSERT", "dbms_assert", ""),
    sp("DBMS_SQLTUNE", "dbms_sqltune", ""),
    sp("DBMS_XPLAN", "dbms_xplan", ""),
];

/// Matched against the "SQL Module" column when the table has one,
/// otherwise against the SQL text.
pub const SQL_MODULES: [SqlPattern; 6] = [
    sp("ESRI", "ESRI", "s"),
    sp("ArcSOC", "ArcSOC", "s"),
    sp("arcserver", "arcserver", ""),
    sp("JDBC", "module: jdbc thin client", ""),
    sp("Python", "python", ""),
    sp("DBMS_SCHEDULER", "dbms_scheduler", ""),
];

pub const SQL_FEATURES: [SqlPattern; 21] = [
    sp("xml", r"xml[a-z]*\(", "r"),
    sp("corr", r"corr(_[sk])*\(", "r"),
    sp("first_value", "first_value(", ""),
    sp("stddev", r"stddev(_pop|_samp)*\(", "r"),
    // also dense_rank
    sp("rank", "rank(", ""),
    sp("variance", r"var(iance|_pop|_samp)+\(", "r"),
    sp("sysdate", "sysdate", ""),
    sp("to_timestamp", r"to_timestamp(_tz)*\(", "r"),
    sp("to_lob", r"to_[c]*lob\(", "r"),
    sp("to_number", "to_number(", ""),
    sp("cast", "cast(", ""),
    sp("rownum", "rownum", ""),
    sp("rowid", "rowid", ""),
    sp("scn", r"to_scn\(|scn_to_timestamp|ora_rowscn", "r"),
    sp("user", r"[ ,(]+user[ ,)]+", "r"),
    sp("userenv", "userenv(", ""),
    sp("regexp", "regexp_", ""),
    sp("bfilename", "bfilename(", ""),
    sp("coalesce", "coalesce(", ""),
    sp("decode", "decode(", ""),
    sp("nvl", "nvl(", ""),
];

// ─────────────────────────────────────────────────────────────────────────────
// RAC instance -> cluster aggregation
// ─────────────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    Sum,
    Avg,
}

#[derive(Debug, Clone, Copy)]
pub struct AggRule {
    pub column: &'static str,
    pub op: AggOp,
    pub decimals: i32,
}

const fn sum(column: &'static str, decimals: i32) -> AggRule {
    AggRule { column, op: AggOp::Sum, decimals }
}

const fn avg(column: &'static str, decimals: i32) -> AggRule {
    AggRule { column, op: AggOp::Avg, decimals }
}

pub const AGGREGATION_RULES: [AggRule; 18] = [
    sum("host_cpu_num", 0),
    sum("db_cpu_count", 0),
    sum("host_cpu_busy_time_s", 2),
    sum("host_cpu_idle_time_s", 2),
    sum("db_cpu_fg_time_s", 2),
    sum("db_cpu_bg_time_s", 2),
    sum("host_memory_mb", 0),
    sum("db_sga_usage_mb", 0),
    sum("db_pga_usage_mb", 0),
    sum("db_memory_mb", 0),
    // max would be the honest pick, avg equals it when every instance reports
    avg("elapsed_time_min", 2),
    sum("db_time_min", 2),
    avg("db_cpu_pct_db_time", 2),
    sum("esx_cpu_num", 0),
    sum("esx_cores", 0),
    avg("esx_cpu_usage_pct", 0),
    sum("esx_memory_mb", 0),
    avg("esx_memory_usage_pct", 0),
];

// ─────────────────────────────────────────────────────────────────────────────
// Output columns
// `ccol` is the canonical (csv) position, `xcol` the display position.
// Never reorder existing entries, append new ones at the end.
// ─────────────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy)]
pub struct OutputColumn {
    pub name: &'static str,
    pub display: &'static str,
    pub ccol: u16,
    pub xcol: u16,
}

const fn oc(ccol: u16, name: &'static str, xcol: u16, display: &'static str) -> OutputColumn {
    OutputColumn { name, display, ccol, xcol }
}

pub const OUTPUT_COLUMNS: [OutputColumn; 71] = [
    // general
    oc(1, "id", 1, "ID"),
    oc(2, "filename", 2, "Filename"),
    oc(3, "parent", 3, "Parent"),
    oc(4, "db_type", 4, "Type"),
    oc(5, "status", 5, "Status"),
    oc(6, "db_snap_begin_time", 6, "Begin Snap"),
    oc(7, "db_snap_end_time", 7, "End Snap"),
    oc(8, "db_edition", 8, "Edition"),
    oc(9, "db_release", 9, "Release"),
    oc(10, "db_cdb", 10, "CDB"),
    oc(11, "db_rac", 11, "RAC"),
    oc(12, "db_inst_num", 12, "Number of Instances"),
    oc(13, "db_inst_id", 13, "Instance ID"),
    oc(14, "db_name", 14, "DB Name"),
    oc(15, "db_uname", 15, "DB Unique Name"),
    oc(16, "db_inst_name", 16, "Instance Name"),
    oc(17, "host_name", 17, "Host Name"),
    oc(18, "platform", 18, "Platform"),
    // CPU
    oc(19, "host_cpu_num", 19, "Host CPUs"),
    oc(20, "db_cpu_count", 20, "DB cpu_count"),
    oc(21, "db_cpu_num", 22, "DB CPUs"),
    oc(22, "db_cpu_usage_pct", 21, "DB CPU usage %"),
    // memory
    oc(23, "host_memory_mb", 23, "Host Memory (mb)"),
    oc(24, "db_sga_usage_mb", 24, "SGA use (mb)"),
    oc(25, "db_pga_usage_mb", 25, "PGA use (mb)"),
    oc(26, "db_memory_mb", 26, "DB Memory (mb)"),
    oc(27, "db_memory_usage_pct", 27, "DB Memory usage %"),
    // IO
    oc(28, "db_physical_read_total_io_ps", 28, "DB io read (iops)"),
    oc(29, "db_physical_write_total_io_ps", 29, "DB io write (iops)"),
    oc(30, "db_iops", 30, "DB IOPS"),
    oc(31, "db_physical_read_total_mbps", 31, "DB io read (mbps)"),
    oc(32, "db_physical_write_total_mbps", 32, "DB io write (mbps)"),
    oc(33, "db_physical_read_pct", 34, "DB io read (%)"),
    oc(34, "db_io_throughput_mbps", 33, "DB io throughput (mbps)"),
    // size
    oc(35, "db_size_gb", 35, "DB (gb)"),
    oc(36, "db_tables_gb", 36, "Tables (gb)"),
    oc(37, "db_indexes_gb", 37, "Indexes (gb)"),
    // workload
    oc(38, "db_compatible", 38, "compatible"),
    oc(39, "db_optimizer_features_enable", 39, "optimizer_ features_ enable"),
    oc(40, "db_user_calls_ps", 40, "user calls (ps)"),
    oc(41, "db_user_commits_ps", 41, "user commits (ps)"),
    oc(42, "db_user_calls_pt", 42, "user calls (pt)"),
    oc(43, "db_user_commits_pt", 43, "user commits (pt)"),
    oc(44, "db_overfitting", 44, "Overfitting (calls / commits)"),
    oc(45, "elapsed_time_min", 45, "Elapsed Time (min)"),
    oc(46, "db_time_min", 46, "DB Time (min)"),
    oc(47, "db_avg_active_sessions", 47, "Avg Active Sessions"),
    oc(48, "db_cpu_pct_db_time", 48, "DB CPU (% DB Time)"),
    oc(49, "db_redo_mbps", 49, "Redo (mbps)"),
    oc(50, "db_net_bandwidth_mbitps", 50, "Net. Bandwidth (mbitps)"),
    oc(51, "db_log_file_sync_avg_wait_ms", 51, "log file sync avg wait (ms)"),
    oc(52, "db_log_file_pwrite_avg_wait_ms", 52, "log file parallel write avg wait (ms)"),
    oc(53, "db_table_scans_dread_total", 53, "table scans (direct read) total"),
    // SQL tags
    oc(54, "db_sql", 54, "SQL"),
    oc(55, "db_dbms", 55, "DBMS_Packages"),
    oc(56, "db_modules", 56, "Modules"),
    oc(57, "db_features", 57, "Oracle Features"),
    oc(58, "db_hints", 58, "Hints"),
    // inventory
    oc(59, "esx_cpu_model", 59, "ESX CPU Model"),
    oc(60, "esx_cpu_speed", 60, "ESX CPU Speed"),
    oc(61, "esx_ht_available", 61, "ESX HT Available"),
    oc(62, "esx_ht_active", 62, "ESX HT Active"),
    oc(63, "esx_cpu_num", 63, "ESX CPUs"),
    oc(64, "esx_cores_per_cpu", 64, "ESX Cores per CPU"),
    oc(65, "esx_cores", 65, "ESX Cores"),
    oc(66, "esx_cpu_usage_pct", 66, "ESX CPU usage %"),
    oc(67, "esx_memory_mb", 67, "ESX Memory"),
    oc(68, "esx_memory_usage_pct", 68, "ESX Memory usage %"),
    // appended later
    oc(69, "db_id", 69, "DB ID"),
    oc(70, "iops_per_sec_from_top_10_section", 70, "IOPS per sec from Top 10 section"),
    oc(71, "throughput_mb_per_sec_from_top_10_section", 71, "Throughput per sec from Top 10 section"),
];

/// Working values kept on every record but never exported.
pub const INTERNAL_KEYS: [&str; 4] = [
    "host_cpu_busy_time_s",
    "host_cpu_idle_time_s",
    "db_cpu_fg_time_s",
    "db_cpu_bg_time_s",
];

/// Resolved on the cluster record, repeated on each instance record.
pub const SHARED_DATABASE_KEYS: [&str; 5] = ["db_name", "db_uname", "db_edition", "db_cdb", "db_id"];

/// Identity of a record, kept when a single instance collapses into its cluster record.
pub const IDENTITY_KEYS: [&str; 4] = ["filename", "parent", "db_type", "status"];

pub const NOT_AVAILABLE: &str = "n.a.";

// ─────────────────────────────────────────────────────────────────────────────
// Side files
// ─────────────────────────────────────────────────────────────────────────────
pub const INVENTORY_HOST_FILE: &str = "RVTools_tabvHost.csv";
pub const INVENTORY_INFO_FILE: &str = "RVTools_tabvInfo.csv";
pub const SIZE_FILE_SUFFIX: &str = "-dbSize.csv";

pub const INVENTORY_DNS_COLUMN: &str = "DNS Name";
pub const INVENTORY_HOST_COLUMN: &str = "Host";

pub const INVENTORY_HOST_COLUMNS: [(&str, &str); 10] = [
    ("HT Available", "esx_ht_available"),
    ("HT Active", "esx_ht_active"),
    ("CPU Model", "esx_cpu_model"),
    ("Speed", "esx_cpu_speed"),
    ("# CPU", "esx_cpu_num"),
    ("Cores per CPU", "esx_cores_per_cpu"),
    ("# Cores", "esx_cores"),
    ("CPU usage %", "esx_cpu_usage_pct"),
    ("# Memory", "esx_memory_mb"),
    ("Memory usage %", "esx_memory_usage_pct"),
];

pub const SIZE_NAME_COLUMN: &str = "DB_NAME";
pub const SIZE_UNAME_COLUMN: &str = "DB_UNAME";

pub const SIZE_COLUMNS: [(&str, &str); 3] = [
    ("NETTO_GB", "db_size_gb"),
    ("TABLE_GB", "db_tables_gb"),
    ("INDEX_GB", "db_indexes_gb"),
];
