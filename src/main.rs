use anyhow::{bail, Context, Result};
use awr_capacity::config::{load_config, Config};
use awr_capacity::export::{self, Format, HeaderMode};
use awr_capacity::pipeline::{self, InputFile, Options};
use awr_capacity::SqlSource;
use clap::Parser;
use colored::*;
use std::fs;
use std::path::Path;

///This tool extracts capacity figures (cpu, memory, io, size, workload) from AWR html reports
///and STATSPACK text reports into one flat table, one row per database and RAC instance.
///RVTools_tabvInfo.csv / RVTools_tabvHost.csv and *-dbSize.csv files given next to the reports are joined in.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct Args {
	///Report and side files to process
	files: Vec<String>,

	///Process every file of a directory
	#[clap(short, long, default_value="NO")]
	directory: String,

	///Write output to a file instead of stdout
	#[clap(short, long, default_value="NO")]
	outfile: String,

	///TOML configuration file
	#[clap(short, long)]
	config: Option<String>,

	///Where AWR sql texts are taken from: ordered | list
	#[clap(short, long)]
	sql_source: Option<SqlSource>,

	///Output format: csv | json
	#[clap(short, long)]
	format: Option<Format>,

	///Header names: columns | display
	#[clap(long)]
	headers: Option<HeaderMode>,

	///Should I be quiet? Only warnings and errors are logged
	#[clap(short, long)]
	quiet: bool,
}

fn init_logging(quiet: bool) {
	let fallback = if quiet { "warn" } else { "info" };
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
		)
		.init();
}

fn collect_inputs(args: &Args) -> Result<Vec<InputFile>> {
	let mut inputs = Vec::new();
	if args.directory != "NO" {
		inputs.extend(pipeline::read_dir(Path::new(&args.directory)).with_context(|| format!("Cannot list directory {}", args.directory))?);
	}
	for f in &args.files {
		inputs.push(InputFile::read(Path::new(f)).with_context(|| format!("Cannot read {}", f))?);
	}
	if inputs.is_empty() {
		bail!("nothing to do, give report files or --directory");
	}
	Ok(inputs)
}

fn main() -> Result<()> {
	let args = Args::parse();
	init_logging(args.quiet);
	if !args.quiet {
		eprintln!("{}{}", "AWR-CAPACITY v".bright_yellow(), env!("CARGO_PKG_VERSION").bright_yellow());
	}

	let config = match &args.config {
		Some(path) => load_config(Path::new(path))?,
		None => Config::default(),
	};
	let options = Options {
		sql_source: args.sql_source.unwrap_or(config.extract.sql_source),
		progress: !args.quiet,
	};
	let format = args.format.unwrap_or(config.output.format);
	let headers = args.headers.unwrap_or(config.output.headers);

	let inputs = collect_inputs(&args)?;
	if !args.quiet {
		eprintln!("{}", "\n==== PARSING REPORTS ===".bright_cyan());
	}
	let rows = pipeline::run(&inputs, &options)?;
	let table = export::render(&rows, format, headers, &config.output.delimiter)?;

	if args.outfile != "NO" {
		fs::write(&args.outfile, table).with_context(|| format!("Cannot write {}", args.outfile))?;
		if !args.quiet {
			eprintln!("{} rows written to {}", rows.len(), args.outfile.bright_green());
		}
	} else {
		print!("{}", table);
	}
	Ok(())
}
