use crate::awr::SqlSource;
use crate::export::{delimiter_byte, Format, HeaderMode};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
	#[serde(default)]
	pub extract: ExtractConfig,
	#[serde(default)]
	pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExtractConfig {
	#[serde(default)]
	pub sql_source: SqlSource,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
	#[serde(default)]
	pub format: Format,
	#[serde(default = "default_delimiter")]
	pub delimiter: String,
	#[serde(default)]
	pub headers: HeaderMode,
}

fn default_delimiter() -> String {
	";".to_string()
}

impl Default for OutputConfig {
	fn default() -> Self {
		OutputConfig { format: Format::default(), delimiter: default_delimiter(), headers: HeaderMode::default() }
	}
}

pub fn parse_config(content: &str) -> Result<Config> {
	let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
	delimiter_byte(&config.output.delimiter).with_context(|| "output.delimiter")?;
	Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read config file: {}", path.display()))?;
	parse_config(&content)
}
