//! Joins with the semicolon separated side files: the VMware inventory
//! (`RVTools_tabvInfo.csv` + `RVTools_tabvHost.csv`) and the database size extracts.

use crate::error::SideDataError;
use crate::record::DatabaseRecord;
use crate::staticdata::{
	INVENTORY_DNS_COLUMN, INVENTORY_HOST_COLUMN, INVENTORY_HOST_COLUMNS, SIZE_COLUMNS, SIZE_NAME_COLUMN, SIZE_UNAME_COLUMN,
};
use crate::value::Value;
use tracing::{debug, info};

/// Parsed content of one side file.
#[derive(Debug, Clone, Default)]
struct CsvTable {
	file: String,
	headers: Vec<String>,
	rows: Vec<Vec<String>>,
}

impl CsvTable {
	fn parse(file: &str, content: &str) -> Result<CsvTable, SideDataError> {
		let content = content.trim_start_matches('\u{feff}');
		let mut reader = csv::ReaderBuilder::new()
			.delimiter(b';')
			.flexible(true)
			.from_reader(content.as_bytes());
		let csv_err = |source| SideDataError::Csv { file: file.to_string(), source };

		let headers = reader.headers().map_err(csv_err)?.iter().map(|h| h.trim().to_string()).collect();
		let mut rows = Vec::new();
		for record in reader.records() {
			let record = record.map_err(csv_err)?;
			if record.iter().all(|c| c.trim().is_empty()) {
				continue;
			}
			rows.push(record.iter().map(|c| c.trim().to_string()).collect());
		}
		Ok(CsvTable { file: file.to_string(), headers, rows })
	}

	fn column(&self, name: &'static str) -> Result<usize, SideDataError> {
		self.headers
			.iter()
			.position(|h| h == name)
			.ok_or_else(|| SideDataError::MissingColumn { file: self.file.clone(), column: name })
	}
}

fn cell(row: &[String], idx: usize) -> &str {
	row.get(idx).map_or("", |c| c.as_str())
}

/// VMware inventory: virtual machine DNS name -> ESX host -> host capabilities.
#[derive(Debug, Clone)]
pub struct Inventory {
	info: CsvTable,
	info_dns: usize,
	info_host: usize,
	hosts: CsvTable,
	hosts_host: usize,
	host_columns: Vec<(usize, &'static str)>,
}

impl Inventory {
	pub fn load(info_file: &str, info: &str, host_file: &str, hosts: &str) -> Result<Inventory, SideDataError> {
		let info = CsvTable::parse(info_file, info)?;
		let hosts = CsvTable::parse(host_file, hosts)?;
		let info_dns = info.column(INVENTORY_DNS_COLUMN)?;
		let info_host = info.column(INVENTORY_HOST_COLUMN)?;
		let hosts_host = hosts.column(INVENTORY_HOST_COLUMN)?;
		let host_columns = INVENTORY_HOST_COLUMNS
			.iter()
			.map(|(column, key)| Ok((hosts.column(column)?, *key)))
			.collect::<Result<Vec<_>, SideDataError>>()?;
		Ok(Inventory { info, info_dns, info_host, hosts, hosts_host, host_columns })
	}

	/// ESX host running the virtual machine with this DNS name.
	pub fn esx_host(&self, dns_name: &str) -> Option<&str> {
		self.info
			.rows
			.iter()
			.find(|row| cell(row, self.info_dns) == dns_name)
			.map(|row| cell(row, self.info_host))
	}

	/// Copies the `esx_*` fields of the record's host. Returns whether a host matched.
	pub fn join(&self, rec: &mut DatabaseRecord) -> bool {
		let dns_name = rec.get("host_name").to_string();
		if dns_name.is_empty() {
			return false;
		}
		debug!(dns_name = %dns_name, "map inventory records");
		let Some(esx) = self.esx_host(&dns_name) else {
			info!(dns_name = %dns_name, file = %self.info.file, "DNS name not found in inventory");
			return false;
		};
		let Some(row) = self.hosts.rows.iter().find(|row| cell(row, self.hosts_host) == esx) else {
			info!(host = esx, file = %self.hosts.file, "host not found in inventory");
			return false;
		};
		for (idx, key) in &self.host_columns {
			rec.set(key, Value::from_cell(cell(row, *idx)));
		}
		true
	}
}

#[derive(Debug, Clone)]
struct SizeRow {
	name: String,
	uname: String,
	values: Vec<(&'static str, Value)>,
}

/// Database sizes, concatenated over every `*-dbSize.csv` file of a batch.
#[derive(Debug, Clone, Default)]
pub struct SizeTable {
	rows: Vec<SizeRow>,
}

impl SizeTable {
	pub fn add_file(&mut self, file: &str, content: &str) -> Result<(), SideDataError> {
		let table = CsvTable::parse(file, content)?;
		let name = table.column(SIZE_NAME_COLUMN)?;
		let uname = table.column(SIZE_UNAME_COLUMN)?;
		let columns = SIZE_COLUMNS
			.iter()
			.map(|(column, key)| Ok((table.column(column)?, *key)))
			.collect::<Result<Vec<_>, SideDataError>>()?;

		for row in &table.rows {
			self.rows.push(SizeRow {
				name: cell(row, name).to_lowercase(),
				uname: cell(row, uname).to_lowercase(),
				values: columns.iter().map(|(idx, key)| (*key, Value::from_cell(cell(row, *idx)))).collect(),
			});
		}
		Ok(())
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Matches on database name, and on unique name when the record has one.
	/// Case is ignored, the first matching row wins.
	pub fn join(&self, rec: &mut DatabaseRecord) -> bool {
		let name = rec.get("db_name").to_string().to_lowercase();
		if name.is_empty() {
			return false;
		}
		let uname = rec.get("db_uname").to_string().to_lowercase();
		let found = self.rows.iter().find(|r| r.name == name && (uname.is_empty() || r.uname == uname));
		let Some(row) = found else {
			info!(db_name = %name, db_uname = %uname, "database not found in size files");
			return false;
		};
		for (key, value) in &row.values {
			rec.set(key, value.clone());
		}
		true
	}
}

/// Side data of one batch, read once and shared by every report.
#[derive(Debug, Clone, Default)]
pub struct SideData {
	pub inventory: Option<Inventory>,
	pub sizes: SizeTable,
}

impl SideData {
	/// Inventory fields go to the instance records of a cluster report and to the
	/// global record otherwise. Sizes always go to the global record.
	pub fn join(&self, global: &mut DatabaseRecord, instances: &mut [DatabaseRecord], rac_report: bool) {
		if let Some(inventory) = &self.inventory {
			if rac_report {
				for inst in instances.iter_mut() {
					inventory.join(inst);
				}
			} else {
				inventory.join(global);
			}
		}
		if !self.sizes.is_empty() {
			self.sizes.join(global);
		}
	}
}
