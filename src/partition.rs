//! Release partitioning.
//!
//! Changelogs are authored newest-first, so the record stream is walked back to front:
//! issues are fanned out into line buckets as they are met, and each release marker
//! consumes the buckets it owns. The result is the list of releases in chronological
//! (oldest-first) order, followed by two pseudo-releases for whatever is still unreleased.
//!
//! Bucket rules:
//! - Features and support items go into `unreleased_feature`, for the next feature release.
//! - Bugs go into every known line and into `unreleased_bugfix`, so they can show up in more
//!   than one bugfix release. `major` bugs go into `unreleased_feature` instead; bugs with a
//!   minimum line (`1.2+`) only go into lines at or above it.
//! - `backported` features and support items go into every bucket, on the assumption that they
//!   were released to all active lines.

use std::rc::Rc;

use miette::SourceSpan;

use crate::{
	buckets::{BucketKey, LineBuckets, Sentinel},
	error::ChangelogError,
	issue::{Inline, Issue, ReleaseMarker, ReleaseVersion},
	registry::IssueRegistry,
	version::Line,
};

/// One record of the authored changelog.
#[derive(Clone, Debug)]
pub enum Entry {
	Issue(Issue),
	Release(ReleaseMarker),
	/// A line item with no annotation. Treated as an anonymous bug.
	PlainItem { description: Vec<Inline>, span: Option<SourceSpan> },
}

/// A release with the entries resolved for it.
#[derive(Clone, Debug, derive_new::new)]
pub struct Release {
	pub marker: ReleaseMarker,
	pub entries: Vec<Rc<Issue>>,
}

impl Release {
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// State of one partitioning run.
#[derive(Debug, Default)]
pub struct Partitioner {
	registry: IssueRegistry,
	buckets: LineBuckets,
	releases: Vec<Release>,
}

impl Partitioner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Process the next record in chronological order.
	pub fn feed(&mut self, entry: Entry) -> Result<(), ChangelogError> {
		match entry {
			Entry::Issue(issue) => classify_issue(Rc::new(issue), &mut self.registry, &mut self.buckets),
			Entry::PlainItem { description, span } => {
				tracing::debug!("found line item w/ no real issue object, creating bug");
				classify_issue(Rc::new(Issue::anonymous_bug(description).with_span(span)), &mut self.registry, &mut self.buckets)
			}
			Entry::Release(marker) => {
				let release = cut_release(marker, &self.registry, &mut self.buckets)?;
				self.releases.push(release);
				Ok(())
			}
		}
	}

	pub fn buckets(&self) -> &LineBuckets {
		&self.buckets
	}

	pub fn registry(&self) -> &IssueRegistry {
		&self.registry
	}

	pub fn releases(&self) -> &[Release] {
		&self.releases
	}

	/// Close the run: append the `unreleased_bugfix` and `unreleased_feature` pseudo-releases.
	pub fn finish(mut self) -> Vec<Release> {
		for sentinel in Sentinel::ALL {
			let entries = self.buckets.take(&BucketKey::from(sentinel));
			tracing::debug!("creating '{}' faux-release with {} entries", sentinel.bucket_name(), entries.len());
			self.releases.push(Release::new(ReleaseMarker::unreleased(sentinel), entries));
		}
		self.releases
	}
}

/// Partition an authored (newest-first) record stream into chronological releases.
pub fn construct_releases(entries: Vec<Entry>) -> Result<Vec<Release>, ChangelogError> {
	let mut partitioner = Partitioner::new();
	for entry in entries.into_iter().rev() {
		partitioner.feed(entry)?;
	}
	Ok(partitioner.finish())
}

/// Register an issue and append it to every bucket it belongs in.
pub fn classify_issue(issue: Rc<Issue>, registry: &mut IssueRegistry, buckets: &mut LineBuckets) -> Result<(), ChangelogError> {
	tracing::debug!("{issue}");
	registry.register(&issue)?;

	let targets: Vec<BucketKey> = if issue.is_bug() {
		if issue.is_major() {
			vec![BucketKey::UNRELEASED_FEATURE]
		} else if let Some(min_line) = issue.min_line() {
			let mut targets: Vec<BucketKey> = buckets
				.names()
				.filter_map(BucketKey::as_line)
				.filter(|line| line.version().at_least(min_line))
				.cloned()
				.map(BucketKey::Line)
				.collect();
			targets.push(BucketKey::UNRELEASED_BUGFIX);
			targets
		} else {
			buckets.names().filter(|key| **key != BucketKey::UNRELEASED_FEATURE).cloned().collect()
		}
	} else if issue.is_backported() {
		buckets.names().cloned().collect()
	} else {
		vec![BucketKey::UNRELEASED_FEATURE]
	};

	for key in &targets {
		tracing::debug!("adding {issue} to {key}");
		buckets.append(key, &issue);
	}
	Ok(())
}

/// Build the release for a marker, consuming bucket contents as needed.
pub fn cut_release(marker: ReleaseMarker, registry: &IssueRegistry, buckets: &mut LineBuckets) -> Result<Release, ChangelogError> {
	tracing::debug!("{marker}");
	let version = match &marker.version {
		ReleaseVersion::Tagged(version) => version,
		ReleaseVersion::Unreleased(sentinel) => {
			let entries = buckets.get(&BucketKey::from(*sentinel)).to_vec();
			return Ok(Release::new(marker, entries));
		}
	};
	let line = Line::of_release(version).map_err(|e| e.with_span(marker.span))?;
	tracing::debug!("release for line {line:?}", line = line.name());

	if let Some(numbers) = marker.explicit_issues.as_deref().filter(|n| !n.is_empty()) {
		tracing::debug!("explicit issues requested: {numbers:?}");
		let entries = registry.resolve_all(numbers).map_err(|e| e.with_span(marker.span))?;
		tracing::debug!("entries in this release: {}", display_list(&entries));
		release_explicit(&entries, &BucketKey::Line(line), buckets);
		return Ok(Release::new(marker, entries));
	}

	let key = BucketKey::Line(line);
	let entries = if !buckets.contains(&key) {
		tracing::debug!("not seen prior, making feature release");
		let entries: Vec<Rc<Issue>> = buckets
			.get(&BucketKey::UNRELEASED_FEATURE)
			.iter()
			.filter(|issue| !issue.is_bug() || issue.is_major())
			.cloned()
			.collect();
		buckets.ensure(key);
		buckets.clear(&BucketKey::UNRELEASED_FEATURE);
		entries
	} else {
		tracing::debug!("pre-existing, making bugfix release");
		// Major bugs belong to the next feature release and already sit in unreleased_feature.
		let entries: Vec<Rc<Issue>> = buckets.get(&key).iter().filter(|issue| !issue.is_major()).cloned().collect();
		buckets.clear(&key);
		// unreleased_bugfix may still hold bugs for other lines, so only drop what was released here.
		for issue in &entries {
			buckets.remove_if_present(&BucketKey::UNRELEASED_BUGFIX, issue);
		}
		entries
	};
	tracing::debug!("entries in this release: {}", display_list(&entries));
	Ok(Release::new(marker, entries))
}

/// Drop explicitly released issues from the buckets they were waiting in.
fn release_explicit(entries: &[Rc<Issue>], line: &BucketKey, buckets: &mut LineBuckets) {
	for issue in entries {
		if issue.is_bug() && !issue.is_major() {
			buckets.remove_if_present(&BucketKey::UNRELEASED_BUGFIX, issue);
		} else {
			buckets.remove_if_present(&BucketKey::UNRELEASED_FEATURE, issue);
			if issue.is_bug() {
				continue;
			}
		}
		if buckets.remove_if_present(line, issue) {
			tracing::debug!("removing {issue} from {line}");
		}
	}
}

fn display_list(issues: &[Rc<Issue>]) -> String {
	let shown: Vec<String> = issues.iter().map(ToString::to_string).collect();
	format!("[{}]", shown.join(", "))
}
