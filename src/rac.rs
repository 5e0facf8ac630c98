use crate::record::{DatabaseRecord, ReportRecords};
use crate::staticdata::{AggOp, AggRule, AGGREGATION_RULES, IDENTITY_KEYS};
use crate::value::{round_up, Value};
use tracing::debug;

/// A cluster report that covers a single instance is folded into its global record.
/// Identity fields of the global record stay, every resolved instance field is copied over.
pub fn collapse_single_instance(report: &mut ReportRecords) {
	if report.instances.len() != 1 {
		return;
	}
	let inst = report.instances.remove(0);
	for key in inst.keys() {
		let value = inst.get(key);
		if !IDENTITY_KEYS.contains(&key) && !value.is_blank() {
			report.global.set(key, value.clone());
		}
	}
}

/// Sum or average of one column over all instances. `None` as soon as a
/// single instance has no number for it, partial aggregates are never built.
fn aggregate_column(rule: &AggRule, instances: &[DatabaseRecord]) -> Option<Value> {
	let mut total = 0.0;
	for inst in instances {
		let Some(v) = inst.number(rule.column) else {
			debug!(column = rule.column, instance = %inst.get("db_inst_id"), "aggregate abandoned");
			return None;
		};
		total += v;
	}
	let n = instances.len() as f64;
	let result = match rule.op {
		AggOp::Sum => total,
		AggOp::Avg => total / n,
	};
	Some(round_up(result, rule.decimals))
}

/// Writes the cluster wide value of every aggregable column to `global`.
/// Columns that cannot be aggregated keep their global value.
pub fn aggregate(global: &mut DatabaseRecord, instances: &[DatabaseRecord]) {
	if instances.is_empty() {
		return;
	}
	for rule in AGGREGATION_RULES.iter() {
		if let Some(v) = aggregate_column(rule, instances) {
			global.set(rule.column, v);
		}
	}
}
