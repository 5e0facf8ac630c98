/// Splits `line` on runs of at least `min` spaces.
/// Leading or trailing runs produce empty tokens, so token positions
/// of fixed layout report lines stay stable.
pub fn split_runs(line: &str, min: usize) -> Vec<&str> {
	let bytes = line.as_bytes();
	let mut tokens = Vec::new();
	let mut start = 0;
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b' ' {
			let run_start = i;
			while i < bytes.len() && bytes[i] == b' ' {
				i += 1;
			}
			if i - run_start >= min {
				tokens.push(&line[start..run_start]);
				start = i;
			}
		} else {
			i += 1;
		}
	}
	tokens.push(&line[start..]);
	tokens
}

/// Token right after `marker`, e.g. the value following `Elapsed:`.
pub fn token_after<'a>(tokens: &[&'a str], marker: &str) -> Option<&'a str> {
	let pos = tokens.iter().position(|t| *t == marker)?;
	tokens.get(pos + 1).copied()
}

pub fn first_line_with(lines: &[&str], phrase: &str) -> Option<usize> {
	lines.iter().position(|l| l.contains(phrase))
}

pub fn normalize_filename(name: &str) -> String {
	name.replace('\\', "/")
}

/// File name component of a path as given on the command line or in a directory listing.
pub fn base_name(path: &str) -> &str {
	path.rfind(['/', '\\']).map_or(path, |i| &path[i + 1..])
}
