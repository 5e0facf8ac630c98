//! Derived capacity metrics.
//!
//! Every formula checks its own inputs. When one is missing or not numeric the
//! outputs get the caller's default: empty on RAC instance records, `n.a.` on
//! the cluster or single instance record.

use crate::record::DatabaseRecord;
use crate::staticdata::NOT_AVAILABLE;
use crate::value::{round_half, round_up, Value};

/// CPU usage rate = db cpu time (foreground + background) / host cpu time (busy + idle).
pub fn db_cpu_usage(rec: &mut DatabaseRecord, default: &Value) {
	let mut cpus = default.clone();
	let mut pct = default.clone();
	let inputs = (
		rec.number("host_cpu_num"),
		rec.number("host_cpu_busy_time_s"),
		rec.number("host_cpu_idle_time_s"),
		rec.number("db_cpu_fg_time_s"),
		rec.number("db_cpu_bg_time_s"),
	);
	if let (Some(host_cpus), Some(busy), Some(idle), Some(fg), Some(bg)) = inputs {
		let host_time = busy + idle;
		if host_time > 0.0 {
			let rate = (fg + bg) / host_time;
			cpus = round_half(host_cpus * rate, 0);
			pct = round_up(rate * 100.0, 2);
		}
	}
	rec.set("db_cpu_num", cpus);
	rec.set("db_cpu_usage_pct", pct);
}

/// SGA + PGA unless the report gave a memory target directly (0 means unset).
pub fn db_memory_usage(rec: &mut DatabaseRecord, default: &Value) {
	let memory = match rec.number("db_memory_mb") {
		Some(m) if m > 0.0 => Some(m),
		_ => match (rec.number("db_sga_usage_mb"), rec.number("db_pga_usage_mb")) {
			(Some(sga), Some(pga)) => Some(sga + pga),
			_ => None,
		},
	};
	let pct = match (memory, rec.number("host_memory_mb")) {
		(Some(m), Some(host)) if host > 0.0 => round_up(m / host * 100.0, 2),
		_ => default.clone(),
	};
	rec.set("db_memory_mb", memory.map_or_else(|| default.clone(), |m| round_up(m, 0)));
	rec.set("db_memory_usage_pct", pct);
}

pub fn db_io_usage(rec: &mut DatabaseRecord, default: &Value) {
	let iops = match (rec.number("db_physical_read_total_io_ps"), rec.number("db_physical_write_total_io_ps")) {
		(Some(r), Some(w)) => round_up(r + w, 2),
		_ => default.clone(),
	};
	let (throughput, read_pct) = match (rec.number("db_physical_read_total_mbps"), rec.number("db_physical_write_total_mbps")) {
		(Some(r), Some(w)) => {
			let pct = if r + w > 0.0 { round_up(r / (r + w) * 100.0, 2) } else { Value::Float(0.0) };
			(round_up(r + w, 2), pct)
		}
		_ => (default.clone(), default.clone()),
	};
	rec.set("db_iops", iops);
	rec.set("db_io_throughput_mbps", throughput);
	rec.set("db_physical_read_pct", read_pct);
}

/// Standby network bandwidth from redo volume: MB/s to Mbit/s, 75% line efficiency.
pub fn db_net_bandwidth(rec: &mut DatabaseRecord, default: &Value) {
	let bandwidth = match rec.number("db_redo_mbps") {
		Some(redo) => round_up(redo / 0.75 * 8.0, 2),
		None => default.clone(),
	};
	rec.set("db_net_bandwidth_mbitps", bandwidth);
}

pub fn db_avg_active_sessions(rec: &mut DatabaseRecord, default: &Value) {
	let aas = match (rec.number("db_time_min"), rec.number("elapsed_time_min")) {
		(Some(db_time), Some(elapsed)) if elapsed > 0.0 => round_up(db_time / elapsed, 2),
		_ => default.clone(),
	};
	rec.set("db_avg_active_sessions", aas);
}

/// User calls per commit, taken per transaction since per second calls are sometimes reported as 0.
pub fn db_overfitting(rec: &mut DatabaseRecord, default: &Value) {
	let ratio = match (rec.number("db_user_calls_pt"), rec.number("db_user_commits_pt")) {
		(Some(calls), Some(commits)) if commits > 0.0 => round_up(calls / commits, 2),
		_ => default.clone(),
	};
	rec.set("db_overfitting", ratio);
}

pub fn apply_instance(rec: &mut DatabaseRecord) {
	let default = Value::Empty;
	db_cpu_usage(rec, &default);
	db_memory_usage(rec, &default);
	db_net_bandwidth(rec, &default);
	db_io_usage(rec, &default);
	db_avg_active_sessions(rec, &default);
}

pub fn apply_global(rec: &mut DatabaseRecord) {
	let default = Value::text(NOT_AVAILABLE);
	db_cpu_usage(rec, &default);
	db_memory_usage(rec, &default);
	db_io_usage(rec, &default);
	db_net_bandwidth(rec, &default);
	db_overfitting(rec, &default);
	db_avg_active_sessions(rec, &default);
}
