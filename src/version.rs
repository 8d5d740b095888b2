//! Numeric dotted versions and the release lines derived from them.

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::error::ChangelogError;

/// A dotted version compared numerically, component by component.
///
/// Missing trailing components count as zero, so `1.2 == 1.2.0` and `1.10 > 1.2`.
/// Components are kept as digit strings without leading zeros, so there is no upper bound.
#[derive(Clone, Debug, Default)]
pub struct Version {
	components: Vec<String>,
}

impl Version {
	/// Parse a dotted version string. Every component must be a non-negative integer.
	pub fn parse(s: &str) -> Result<Self, ChangelogError> {
		let malformed = || ChangelogError::MalformedVersion { version: s.to_string(), span: None };
		let trimmed = s.trim();
		if trimmed.is_empty() {
			return Err(malformed());
		}
		let components = trimmed
			.split('.')
			.map(|part| {
				if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
					return Err(malformed());
				}
				let digits = part.trim_start_matches('0');
				Ok(if digits.is_empty() { "0" } else { digits }.to_string())
			})
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { components })
	}

	pub fn components(&self) -> &[String] {
		&self.components
	}

	/// `self >= other`, numerically.
	pub fn at_least(&self, other: &Version) -> bool {
		self >= other
	}
}

impl FromStr for Version {
	type Err = ChangelogError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		let len = self.components.len().max(other.components.len());
		(0..len)
			.map(|i| {
				let a = self.components.get(i).map_or("0", String::as_str);
				let b = other.components.get(i).map_or("0", String::as_str);
				compare_digits(a, b)
			})
			.find(|ord| ord.is_ne())
			.unwrap_or(Ordering::Equal)
	}
}

/// Numeric order of two digit strings without leading zeros.
fn compare_digits(a: &str, b: &str) -> Ordering {
	a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Version {}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.components.join("."))
	}
}

/// A release line: a version with its last component dropped (`1.2.7` -> `1.2`).
///
/// Lines keep the text they were derived from, so `1` and `1.0` stay distinct buckets
/// even though they compare equal as versions.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Line {
	version: Version,
	name: String,
}

impl Line {
	/// Derive the line of a release version string.
	pub fn of_release(version: &str) -> Result<Self, ChangelogError> {
		let parsed = Version::parse(version)?;
		let name = match version.trim().rsplit_once('.') {
			Some((head, _)) => head.to_string(),
			None => String::new(),
		};
		let components = parsed.components[..parsed.components.len() - 1].to_vec();
		Ok(Self {
			version: Version { components },
			name,
		})
	}

	/// A line given directly by name, e.g. `1.2`.
	pub fn parse(name: &str) -> Result<Self, ChangelogError> {
		Ok(Self {
			version: Version::parse(name)?,
			name: name.trim().to_string(),
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> &Version {
		&self.version
	}
}

impl fmt::Display for Line {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name)
	}
}
