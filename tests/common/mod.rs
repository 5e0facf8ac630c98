#![allow(dead_code)]

use awr_capacity::{DatabaseRecord, InputFile};

pub const AWR_SINGLE: &str = r##"<html><head><title>AWR Report for DB: ORCL, Inst: orcl, Snaps: 100-101</title></head><body class="awr">
<h1 class="awr">WORKLOAD REPOSITORY report for</h1>
<table summary="This table displays database instance information">
<tr><th>DB Name</th><th>DB Id</th><th>Unique Name</th><th>Role</th><th>Edition</th><th>Release</th><th>RAC</th><th>CDB</th></tr>
<tr><td>ORCL</td><td>1234567890</td><td>ORCL_SITE1</td><td>PRIMARY</td><td>EE</td><td>19.0.0.0.0</td><td>NO</td><td>NO</td></tr>
</table>
<table summary="This table displays instance information">
<tr><th>Instance</th><th>Inst Num</th><th>Startup Time</th></tr>
<tr><td>orcl</td><td>1</td><td>01-Jan-24 08:00</td></tr>
</table>
<table summary="This table displays host information">
<tr><th>Host Name</th><th>Platform</th><th>CPUs</th><th>Cores</th><th>Sockets</th><th>Memory (GB)</th></tr>
<tr><td>db01.example.com</td><td>Linux x86 64-bit</td><td>16</td><td>8</td><td>2</td><td>62.50</td></tr>
</table>
<table summary="This table displays snapshot information">
<tr><th></th><th>Snap Id</th><th>Snap Time</th><th>Sessions</th><th>Cursors/Session</th></tr>
<tr><td>Begin Snap:</td><td>100</td><td>01-Jan-24 10:00:00</td><td>50</td><td>1.2</td></tr>
<tr><td>End Snap:</td><td>101</td><td>01-Jan-24 11:00:00</td><td>52</td><td>1.3</td></tr>
<tr><td>Elapsed:</td><td>&#160;</td><td>60.00 (mins)</td><td>&#160;</td><td>&#160;</td></tr>
<tr><td>DB Time:</td><td>&#160;</td><td>30.00 (mins)</td><td>&#160;</td><td>&#160;</td></tr>
</table>
<ul>
<li><a class="awr" href="#400">SQL ordered by Elapsed Time</a></li>
</ul>
<table summary="This table displays load profile">
<tr><th></th><th>Per Second</th><th>Per Transaction</th><th>Per Exec</th><th>Per Call</th></tr>
<tr><td>Redo size (bytes):</td><td>1,572,864.0</td><td>5,000.0</td><td></td><td></td></tr>
</table>
<table summary="This table displays memory statistics">
<tr><th></th><th>Begin</th><th>End</th></tr>
<tr><td>Host Mem (MB):</td><td>64,000.0</td><td>64,000.0</td></tr>
<tr><td>SGA use (MB):</td><td>12,288.0</td><td>12,288.0</td></tr>
<tr><td>PGA use (MB):</td><td>3,712.0</td><td>3,800.0</td></tr>
</table>
<table summary="This table displays time model statistics">
<tr><th>Statistic Name</th><th>Time (s)</th><th>% of DB Time</th><th>% of Total CPU Time</th></tr>
<tr><td>DB CPU</td><td>1,800.00</td><td>100.00</td><td>90.91</td></tr>
<tr><td>background cpu time</td><td>180.00</td><td></td><td>9.09</td></tr>
</table>
<table summary="This table displays top 10 wait events by total wait time">
<tr><th>Event</th><th>Waits</th><th>Total Wait Time (sec)</th><th>Avg wait</th><th>% DB time</th><th>Wait Class</th></tr>
<tr><td>DB CPU</td><td></td><td>1800</td><td></td><td>100.0</td><td></td></tr>
<tr><td>log file sync</td><td>1,000</td><td>1.2</td><td>1.25ms</td><td>0.1</td><td>Commit</td></tr>
</table>
<table summary="This table displays operating system statistics">
<tr><th>Statistic</th><th>Value</th><th>End Value</th></tr>
<tr><td>BUSY_TIME</td><td>360,000</td><td></td></tr>
<tr><td>IDLE_TIME</td><td>360,000</td><td></td></tr>
</table>
<table summary="This table displays key instance activity statistics">
<tr><th>Statistic</th><th>Total</th><th>per Second</th><th>per Trans</th></tr>
<tr><td>physical read total IO requests</td><td>361,000</td><td>100.25</td><td>1.00</td></tr>
<tr><td>physical write total IO requests</td><td>181,800</td><td>50.5</td><td>0.50</td></tr>
<tr><td>physical read total bytes</td><td>113,246,208,000</td><td>31,457,280.0</td><td>314,572.8</td></tr>
<tr><td>physical write total bytes</td><td>37,748,736,000</td><td>10,485,760.0</td><td>104,857.6</td></tr>
<tr><td>table scans (direct read)</td><td>42</td><td>0.01</td><td>0.00</td></tr>
<tr><td>user calls</td><td>360,000</td><td>100.00</td><td>100.00</td></tr>
<tr><td>user commits</td><td>10,800</td><td>3.00</td><td>3.00</td></tr>
</table>
<a class="awr" name="400"></a>
<h3 class="awr">SQL ordered by Elapsed Time</h3>
<table summary="This table displays top SQL by elapsed time">
<tr><th>Elapsed Time (s)</th><th>Executions</th><th>SQL Id</th><th>SQL Module</th><th>SQL Text</th></tr>
<tr><td>10.5</td><td>2</td><td>abc</td><td>SQL*Plus</td><td>SELECT COUNT(*) FROM t</td></tr>
<tr><td>5.1</td><td>1</td><td>def</td><td>SQL*Plus</td><td>select * from t</td></tr>
</table>
<table summary="This table displays initialization parameters">
<tr><th>Parameter Name</th><th>Begin value</th><th>End value (if different)</th></tr>
<tr><td>compatible</td><td>19.0.0</td><td></td></tr>
<tr><td>cpu_count</td><td>8</td><td></td></tr>
<tr><td>db_unique_name</td><td>ORCL_SITE1</td><td></td></tr>
<tr><td>optimizer_features_enable</td><td>19.1.0</td><td></td></tr>
</table>
</body></html>
"##;

/// Cluster report. `total` configured instances, `cpus` per instance row
/// (an empty string leaves that instance without a cpu count).
pub fn awr_rac(total: u32, cpus: &[&str]) -> String {
	let mut roster = String::new();
	let mut os = String::new();
	let mut time = String::new();
	for (i, cpu) in cpus.iter().enumerate() {
		let id = i + 1;
		roster.push_str(&format!(
			"<tr><td>{id}</td><td>racdb{id}</td><td>node{id}.example.com</td><td>01-Jan-24 08:00</td>\
			<td>01-Jan-24 10:00</td><td>01-Jan-24 11:00</td><td>19.0.0.0.0</td><td>60.00</td><td>20.00</td><td>3.00</td><td>Linux x86 64-bit</td></tr>\n"
		));
		os.push_str(&format!(
			"<tr><td>{id}</td><td>{cpu}</td><td>4</td><td>3</td><td>0.5</td><td>0.6</td><td>50.0</td><td>1,800.00</td><td>1,800.00</td><td>3,600.00</td><td>32,000</td></tr>\n"
		));
		time.push_str(&format!("<tr><td>{id}</td><td>1200.0</td><td>450.00</td><td>800.0</td><td>100.0</td><td>45.00</td></tr>\n"));
	}
	format!(
		r##"<html><head><title>AWR RAC Report for DB: RACDB</title></head><body class="awr">
<h1 class="awr">WORKLOAD REPOSITORY REPORT (RAC)</h1>
<table summary="This table displays database summary">
<tr><th>Id</th><th>Name</th><th>Unique Name</th><th>Role</th><th>Edition</th><th>RAC</th><th>CDB</th><th>Elapsed time</th><th>DB time</th><th>Total</th><th>Report</th></tr>
<tr><td>987654321</td><td>RACDB</td><td>RACDB_A</td><td>PRIMARY</td><td>EE</td><td>YES</td><td>NO</td><td>60.00</td><td>40.00</td><td>{total}</td><td>{present}</td></tr>
</table>
<table summary="This table displays database instances included in this report">
<tr><th>I#</th><th>Instance</th><th>Host</th><th>Startup</th><th>Begin Snap Time</th><th>End Snap Time</th><th>Release</th><th>Elapsed Time(min)</th><th>DB time(min)</th><th>Up Time(hrs)</th><th>Platform</th></tr>
{roster}</table>
<table summary="This table displays OS statistics by instance">
<tr><th>I#</th><th>Num CPUs</th><th>CPU Cores</th><th>CPU Sckts</th><th>Load Begin</th><th>Load End</th><th>% Busy</th><th>Busy</th><th>Idle</th><th>Total Time (s)</th><th>Memory (M)</th></tr>
{os}</table>
<table summary="This table displays time model statistics by instance">
<tr><th>I#</th><th>DB time (s)</th><th>DB CPU (s)</th><th>SQL exec elapsed time (s)</th><th>background elapsed time (s)</th><th>bg CPU (s)</th></tr>
{time}</table>
<table summary="This table displays global system statistics">
<tr><th>Statistic</th><th>Total</th><th>per Second</th><th>per Trans</th></tr>
<tr><td>physical read total IO requests</td><td>720,000</td><td>200.00</td><td>2.00</td></tr>
<tr><td>physical write total IO requests</td><td>360,000</td><td>100.00</td><td>1.00</td></tr>
<tr><td>user calls</td><td>360,000</td><td>100.00</td><td>50.00</td></tr>
<tr><td>user commits</td><td>7,200</td><td>2.00</td><td>2.00</td></tr>
</table>
</body></html>
"##,
		present = cpus.len(),
	)
}

pub const AWR_COMPARE: &str = r##"<html><head><title>AWR Compare Period Report</title></head><body class="awr">
<h1 class="awr">WORKLOAD REPOSITORY COMPARE PERIOD REPORT</h1>
<table summary="This table displays database information">
<tr><th>DB Name</th><th>DB Id</th><th>Release</th><th>RAC</th></tr>
<tr><td>ORCL</td><td>1234567890</td><td>19.0.0.0.0</td><td>NO</td></tr>
</table>
</body></html>
"##;

pub const STATSPACK: &str = "\
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

Statistic                                       Time (s) % of DB time
DB CPU                                           1,800.0         25.0
background cpu time                                180.0
DB time                                          7,200.0

Instance Activity Stats  DB/Inst: ORCL/orcl  Snaps: 1001-1002
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

pub fn run(files: &[(&str, &str)]) -> Vec<DatabaseRecord> {
	let inputs: Vec<InputFile> = files.iter().map(|(name, content)| InputFile::new(name, content)).collect();
	awr_capacity::run(&inputs, &awr_capacity::Options::default()).unwrap()
}
