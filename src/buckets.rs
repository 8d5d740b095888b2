//! Line buckets: pending issues per release line.
//!
//! Buckets hold shared references. An issue may sit in many buckets at once, and
//! membership is by identity: removing it from one bucket leaves the others alone.

use std::{collections::BTreeMap, fmt, rc::Rc};

use serde::Serialize;

use crate::{issue::Issue, version::Line};

/// The two always-present buckets of not-yet-released work.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentinel {
	Bugfix,
	Feature,
}

impl Sentinel {
	pub const ALL: [Sentinel; 2] = [Sentinel::Bugfix, Sentinel::Feature];

	pub fn bucket_name(&self) -> &'static str {
		match self {
			Sentinel::Bugfix => "unreleased_bugfix",
			Sentinel::Feature => "unreleased_feature",
		}
	}

	/// Header label of the pseudo-release built from this bucket.
	pub fn label(&self) -> &'static str {
		match self {
			Sentinel::Bugfix => "Next bugfix release",
			Sentinel::Feature => "Next feature release",
		}
	}
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum BucketKey {
	Unreleased(Sentinel),
	Line(Line),
}

impl BucketKey {
	pub const UNRELEASED_BUGFIX: BucketKey = BucketKey::Unreleased(Sentinel::Bugfix);
	pub const UNRELEASED_FEATURE: BucketKey = BucketKey::Unreleased(Sentinel::Feature);

	pub fn as_line(&self) -> Option<&Line> {
		match self {
			BucketKey::Line(line) => Some(line),
			BucketKey::Unreleased(_) => None,
		}
	}
}

impl fmt::Display for BucketKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BucketKey::Unreleased(sentinel) => write!(f, "{}", sentinel.bucket_name()),
			BucketKey::Line(line) => write!(f, "{line}"),
		}
	}
}

impl From<Line> for BucketKey {
	fn from(line: Line) -> Self {
		BucketKey::Line(line)
	}
}

impl From<Sentinel> for BucketKey {
	fn from(sentinel: Sentinel) -> Self {
		BucketKey::Unreleased(sentinel)
	}
}

/// Named, ordered collections of issue references.
#[derive(Debug)]
pub struct LineBuckets {
	buckets: BTreeMap<BucketKey, Vec<Rc<Issue>>>,
}

impl Default for LineBuckets {
	fn default() -> Self {
		Self::new()
	}
}

impl LineBuckets {
	/// A store holding only the two (empty) sentinel buckets.
	pub fn new() -> Self {
		let buckets = Sentinel::ALL.into_iter().map(|s| (BucketKey::from(s), Vec::new())).collect();
		Self { buckets }
	}

	/// Create an empty bucket if absent.
	pub fn ensure(&mut self, key: impl Into<BucketKey>) {
		self.buckets.entry(key.into()).or_default();
	}

	pub fn contains(&self, key: &BucketKey) -> bool {
		self.buckets.contains_key(key)
	}

	/// Bucket contents in insertion order; empty if the bucket was never created.
	pub fn get(&self, key: &BucketKey) -> &[Rc<Issue>] {
		self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Append to an existing bucket. Unknown buckets are left uncreated.
	pub fn append(&mut self, key: &BucketKey, issue: &Rc<Issue>) {
		if let Some(bucket) = self.buckets.get_mut(key) {
			bucket.push(Rc::clone(issue));
		}
	}

	/// Remove the first occurrence of this exact issue, if present.
	pub fn remove_if_present(&mut self, key: &BucketKey, issue: &Rc<Issue>) -> bool {
		let Some(bucket) = self.buckets.get_mut(key) else {
			return false;
		};
		match bucket.iter().position(|held| Rc::ptr_eq(held, issue)) {
			Some(index) => {
				bucket.remove(index);
				true
			}
			None => false,
		}
	}

	/// Empty a bucket, keeping it known.
	pub fn clear(&mut self, key: &BucketKey) {
		if let Some(bucket) = self.buckets.get_mut(key) {
			bucket.clear();
		}
	}

	/// Every currently known bucket name, sentinels first, then lines in version order.
	pub fn names(&self) -> impl Iterator<Item = &BucketKey> {
		self.buckets.keys()
	}

	/// Take the contents of a bucket, leaving it empty.
	pub fn take(&mut self, key: &BucketKey) -> Vec<Rc<Issue>> {
		self.buckets.get_mut(key).map(std::mem::take).unwrap_or_default()
	}
}
