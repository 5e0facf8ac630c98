use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single cell of a database record.
///
/// `Nan` marks a value that was looked up but could not be read as a number
/// (for example an empty cell). It renders exactly like `Empty` but is kept
/// apart so that "absent" never turns into zero on the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	#[default]
	Empty,
	Nan,
	Int(i64),
	Float(f64),
	Text(String),
}

impl Value {
	pub fn text(s: &str) -> Value {
		Value::Text(s.to_string())
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int(i) => Some(*i as f64),
			Value::Float(f) if !f.is_nan() => Some(*f),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(s) => Some(s.as_str()),
			_ => None,
		}
	}

	/// Nothing usable stored: empty placeholder, NaN or blank text.
	pub fn is_blank(&self) -> bool {
		match self {
			Value::Empty => true,
			Value::Text(s) => s.is_empty(),
			v => is_missing(v),
		}
	}

	/// Converts a cell from one of the semicolon separated side files.
	/// Integral numbers written without a decimal point stay integers.
	pub fn from_cell(raw: &str) -> Value {
		let raw = raw.trim();
		match parse_locale_number(raw) {
			Value::Nan => Value::Empty,
			Value::Float(f) if !raw.contains('.') && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::Int(f as i64),
			other => other,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Empty | Value::Nan => Ok(()),
			Value::Int(i) => write!(f, "{}", i),
			Value::Float(v) => write!(f, "{}", v),
			Value::Text(s) => write!(f, "{}", s),
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Empty | Value::Nan => serializer.serialize_str(""),
			Value::Int(i) => serializer.serialize_i64(*i),
			Value::Float(v) => serializer.serialize_f64(*v),
			Value::Text(s) => serializer.serialize_str(s),
		}
	}
}

pub fn is_missing(v: &Value) -> bool {
	matches!(v, Value::Nan) || matches!(v, Value::Float(f) if f.is_nan())
}

// Products like 0.275 * 100 land a hair above the integer they mean,
// ceil() must not push those up a whole step.
const CEIL_EPSILON: f64 = 1e-9;

/// Ceiling rounding at `decimals` places. `decimals <= 0` yields an integer.
pub fn round_up(n: f64, decimals: i32) -> Value {
	if n.is_nan() {
		return Value::Nan;
	}
	let multiplier = 10f64.powi(decimals);
	let scaled = n * multiplier;
	let nearest = scaled.round();
	let scaled = if (scaled - nearest).abs() < CEIL_EPSILON { nearest } else { scaled.ceil() };
	let result = scaled / multiplier;
	if decimals < 1 {
		Value::Int(result as i64)
	} else {
		Value::Float(result)
	}
}

/// Nearest rounding, halves away from zero.
pub fn round_half(n: f64, decimals: i32) -> Value {
	if n.is_nan() {
		return Value::Nan;
	}
	let multiplier = 10f64.powi(decimals);
	let result = (n * multiplier).round() / multiplier;
	if decimals < 1 {
		Value::Int(result as i64)
	} else {
		Value::Float(result)
	}
}

/// Parses report numbers like `1,234.5`. Empty input gives the NaN sentinel,
/// anything that is not a number comes back as trimmed text.
pub fn parse_locale_number(s: &str) -> Value {
	let s = s.trim();
	if s.is_empty() {
		return Value::Nan;
	}
	let cleaned = s.replace(',', "");
	// only the last dot separates decimals
	let cleaned = match cleaned.rfind('.') {
		Some(pos) => {
			let (int_part, frac_part) = cleaned.split_at(pos);
			format!("{}{}", int_part.replace('.', ""), frac_part)
		}
		None => cleaned,
	};
	let numeric_chars = cleaned.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
	if !numeric_chars || !cleaned.chars().any(|c| c.is_ascii_digit()) {
		return Value::Text(s.to_string());
	}
	match f64::from_str(&cleaned) {
		Ok(v) => Value::Float(v),
		Err(_) => Value::Text(s.to_string()),
	}
}
