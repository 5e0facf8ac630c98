mod common;

use awr_capacity::value::Value;
use common::*;

#[test]
fn single_instance_report() {
	let rows = run(&[("awr/orcl_100_101.html", AWR_SINGLE)]);
	assert_eq!(rows.len(), 1);
	let r = &rows[0];

	assert_eq!(r.get("id"), &Value::Int(1));
	assert_eq!(r.get("filename"), &Value::text("awr/orcl_100_101.html"));
	assert_eq!(r.get("parent"), &Value::text("none"));
	assert_eq!(r.status(), "PASSED");
	assert_eq!(r.get("db_type"), &Value::text("SI"));
	assert_eq!(r.get("db_rac"), &Value::text("NO"));
	assert_eq!(r.get("db_inst_id"), &Value::Int(1));
	assert_eq!(r.get("db_inst_num"), &Value::Int(1));
	assert_eq!(r.get("db_name"), &Value::text("ORCL"));
	assert_eq!(r.get("db_uname"), &Value::text("ORCL_SITE1"));
	assert_eq!(r.get("db_id"), &Value::text("1234567890"));
	assert_eq!(r.get("db_inst_name"), &Value::text("orcl"));
	assert_eq!(r.get("host_name"), &Value::text("db01.example.com"));
	assert_eq!(r.get("platform"), &Value::text("Linux x86 64-bit"));
	assert_eq!(r.get("db_snap_begin_time"), &Value::text("01-Jan-24 10:00:00"));
	assert_eq!(r.get("db_compatible"), &Value::text("19.0.0"));
}

#[test]
fn single_instance_cpu_from_time_model() {
	let rows = run(&[("orcl.html", AWR_SINGLE)]);
	let r = &rows[0];
	assert_eq!(r.get("host_cpu_num"), &Value::Int(16));
	assert_eq!(r.get("db_cpu_count"), &Value::Int(8));
	assert_eq!(r.get("db_cpu_num"), &Value::Int(4));
	assert_eq!(r.get("db_cpu_usage_pct"), &Value::Float(27.5));
	assert_eq!(r.get("db_cpu_pct_db_time"), &Value::Float(100.0));
}

#[test]
fn single_instance_memory_io_and_workload() {
	let rows = run(&[("orcl.html", AWR_SINGLE)]);
	let r = &rows[0];
	assert_eq!(r.get("host_memory_mb"), &Value::Int(64000));
	assert_eq!(r.get("db_memory_mb"), &Value::Int(16000));
	assert_eq!(r.get("db_memory_usage_pct"), &Value::Float(25.0));

	assert_eq!(r.get("db_iops"), &Value::Float(150.75));
	assert_eq!(r.get("db_io_throughput_mbps"), &Value::Float(40.0));
	assert_eq!(r.get("db_physical_read_pct"), &Value::Float(75.0));
	assert_eq!(r.get("db_table_scans_dread_total"), &Value::Int(42));

	assert_eq!(r.get("db_redo_mbps"), &Value::Float(1.5));
	assert_eq!(r.get("db_net_bandwidth_mbitps"), &Value::Float(16.0));
	assert_eq!(r.get("db_log_file_sync_avg_wait_ms"), &Value::Float(1.25));
	assert_eq!(r.get("elapsed_time_min"), &Value::Float(60.0));
	assert_eq!(r.get("db_time_min"), &Value::Float(30.0));
	assert_eq!(r.get("db_avg_active_sessions"), &Value::Float(0.5));
	assert_eq!(r.get("db_overfitting"), &Value::Float(33.34));
	assert_eq!(r.get("db_sql"), &Value::text("count*(1) select*(1)"));
}

#[test]
fn rac_report_sums_instances() {
	let rows = run(&[("rac.html", &awr_rac(2, &["8", "8"]))]);
	assert_eq!(rows.len(), 3);
	let global = &rows[0];
	assert_eq!(global.get("db_type"), &Value::text("RAC"));
	assert_eq!(global.get("db_rac"), &Value::text("YES"));
	assert_eq!(global.status(), "PASSED");
	assert_eq!(global.get("db_inst_num"), &Value::Int(2));
	assert_eq!(global.get("host_cpu_num"), &Value::Int(16));
	assert_eq!(global.get("host_memory_mb"), &Value::Int(64000));
	assert_eq!(global.get("db_time_min"), &Value::Float(40.0));
	assert_eq!(global.get("elapsed_time_min"), &Value::Float(60.0));
	assert_eq!(global.get("db_cpu_num"), &Value::Int(2));
	assert_eq!(global.get("db_cpu_usage_pct"), &Value::Float(13.75));
	assert_eq!(global.get("db_iops"), &Value::Float(300.0));
	assert_eq!(global.get("db_overfitting"), &Value::Float(25.0));

	for (n, inst) in rows[1..].iter().enumerate() {
		let id = n as i64 + 1;
		assert_eq!(inst.get("db_type"), &Value::text("RACI"));
		assert_eq!(inst.get("db_inst_id"), &Value::Int(id));
		assert_eq!(inst.get("parent"), &Value::text("rac.html"));
		assert_eq!(inst.get("db_name"), &Value::text("RACDB"));
		assert_eq!(inst.get("db_rac"), &Value::text("YES"));
		assert_eq!(inst.get("host_name"), &Value::text(&format!("node{}.example.com", id)));
		assert_eq!(inst.get("host_cpu_num"), &Value::Int(8));
		assert_eq!(inst.get("db_cpu_num"), &Value::Int(1));
		assert_eq!(inst.get("db_memory_usage_pct"), &Value::Empty);
		assert_eq!(inst.status(), "PASSED");
	}
	let ids: Vec<&Value> = rows.iter().map(|r| r.get("id")).collect();
	assert_eq!(ids, vec![&Value::Int(1), &Value::Int(2), &Value::Int(3)]);
}

#[test]
fn rac_instance_without_value_abandons_the_sum() {
	let rows = run(&[("rac.html", &awr_rac(2, &["8", ""]))]);
	assert_eq!(rows.len(), 3);
	assert_eq!(rows[2].get("host_cpu_num"), &Value::Empty);
	assert_eq!(rows[0].get("host_cpu_num"), &Value::Empty);
	assert_eq!(rows[0].get("db_cpu_num"), &Value::text("n.a."));
	assert_eq!(rows[0].get("host_memory_mb"), &Value::Int(64000));
}

#[test]
fn configured_instance_missing_from_report() {
	let rows = run(&[("rac.html", &awr_rac(3, &["8", "8"]))]);
	assert_eq!(rows.len(), 4);
	assert_eq!(rows[3].get("db_inst_id"), &Value::Int(3));
	assert_eq!(rows[3].status(), "FAILED (not in report)");
	assert_eq!(rows[0].get("host_cpu_num"), &Value::Empty);
}

#[test]
fn single_live_instance_collapses_into_global() {
	let rows = run(&[("rac1.html", &awr_rac(1, &["8"]))]);
	assert_eq!(rows.len(), 1);
	let r = &rows[0];
	assert_eq!(r.get("db_type"), &Value::text("RAC"));
	assert_eq!(r.get("parent"), &Value::text("none"));
	assert_eq!(r.get("db_inst_id"), &Value::Int(1));
	assert_eq!(r.get("host_name"), &Value::text("node1.example.com"));
	assert_eq!(r.get("host_cpu_num"), &Value::Int(8));
	assert_eq!(r.get("db_name"), &Value::text("RACDB"));
	assert_eq!(r.get("db_cpu_num"), &Value::Int(1));
}

#[test]
fn compare_period_report_is_unsupported() {
	let rows = run(&[("diff.html", AWR_COMPARE)]);
	assert_eq!(rows.len(), 1);
	assert!(rows[0].status().starts_with("UNSUPPORTED"));
	let filled: Vec<&str> = rows[0].output_fields().filter(|(_, v)| !v.is_blank()).map(|(k, _)| k).collect();
	assert_eq!(filled, vec!["id", "filename", "parent", "status"]);
}

#[test]
fn list_mode_reads_complete_sql_list() {
	let inputs = vec![awr_capacity::InputFile::new("orcl.html", AWR_SINGLE)];
	let options = awr_capacity::Options { sql_source: awr_capacity::SqlSource::List, progress: false };
	let rows = awr_capacity::run(&inputs, &options).unwrap();
	assert!(rows[0].get("db_sql").is_blank());
	assert_eq!(rows[0].get("db_cpu_num"), &Value::Int(4));
}
