//! Core changelog record types.
//!
//! Issues and release markers are what the partitioner consumes. Both are immutable once
//! built: buckets and releases share them by reference.

use std::fmt;

use miette::SourceSpan;
use serde::Serialize;

use super::content::Inline;
use crate::{buckets::Sentinel, version::Version};

/// Issue type, as given by the annotation role.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
	#[display("bug")]
	Bug,
	#[display("feature")]
	Feature,
	#[display("support")]
	Support,
}

impl IssueKind {
	pub const ALL: [IssueKind; 3] = [IssueKind::Bug, IssueKind::Feature, IssueKind::Support];

	/// Look up the kind for a role name (`bug`, `feature`, `support`).
	pub fn from_role(role: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.to_string() == role)
	}

	/// Capitalized name used on badges.
	pub fn title(&self) -> &'static str {
		match self {
			IssueKind::Bug => "Bug",
			IssueKind::Feature => "Feature",
			IssueKind::Support => "Support",
		}
	}

	/// Badge color, as an RGB hex triplet without the leading `#`.
	pub fn color(&self) -> &'static str {
		match self {
			IssueKind::Bug => "A04040",
			IssueKind::Feature => "40A056",
			IssueKind::Support => "4070A0",
		}
	}
}

/// Trailing metadata of an issue annotation. The forms are mutually exclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum IssueFlag {
	#[default]
	None,
	/// Feature/support already shipped to every active line.
	Backported,
	/// Bug released in a feature release, like a feature.
	Major,
	/// Bug only applies to lines at or above this one (`1.2+`).
	MinLine(Version),
}

/// One changelog entry.
#[derive(Clone, Debug)]
pub struct Issue {
	/// None for anonymous entries and for `-`/`0` numbers.
	pub number: Option<String>,
	pub kind: IssueKind,
	pub flag: IssueFlag,
	pub description: Vec<Inline>,
	pub span: Option<SourceSpan>,
}

impl Issue {
	pub fn new(kind: IssueKind, number: Option<String>) -> Self {
		Self {
			number,
			kind,
			flag: IssueFlag::None,
			description: Vec::new(),
			span: None,
		}
	}

	/// A bare line item with no annotation: always a bug, and its own description.
	pub fn anonymous_bug(description: Vec<Inline>) -> Self {
		Self::new(IssueKind::Bug, None).with_description(description)
	}

	pub fn with_flag(mut self, flag: IssueFlag) -> Self {
		self.flag = flag;
		self
	}

	pub fn with_description(mut self, description: Vec<Inline>) -> Self {
		self.description = description;
		self
	}

	pub fn with_span(mut self, span: impl Into<Option<SourceSpan>>) -> Self {
		self.span = span.into();
		self
	}

	pub fn is_bug(&self) -> bool {
		self.kind == IssueKind::Bug
	}

	pub fn is_major(&self) -> bool {
		self.flag == IssueFlag::Major
	}

	pub fn is_backported(&self) -> bool {
		self.flag == IssueFlag::Backported
	}

	pub fn min_line(&self) -> Option<&Version> {
		match &self.flag {
			IssueFlag::MinLine(line) => Some(line),
			_ => None,
		}
	}
}

impl fmt::Display for Issue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<{} #{}", self.kind, self.number.as_deref().unwrap_or("-"))?;
		match &self.flag {
			IssueFlag::None => {}
			IssueFlag::Backported => write!(f, " (backported)")?,
			IssueFlag::Major => write!(f, " (major)")?,
			IssueFlag::MinLine(line) => write!(f, " ({line}+)")?,
		}
		write!(f, ">")
	}
}

/// What a release marker stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum ReleaseVersion {
	/// A real, authored release such as `1.2.7`.
	Tagged(String),
	/// Pseudo-release collecting what the given sentinel bucket still holds.
	Unreleased(Sentinel),
}

/// An authored (or synthesized) release declaration.
#[derive(Clone, Debug, PartialEq, derive_new::new)]
pub struct ReleaseMarker {
	pub version: ReleaseVersion,
	pub date: Option<String>,
	/// Issue numbers pinned to this release. Overrides bucket logic when present.
	pub explicit_issues: Option<Vec<String>>,
	#[new(default)]
	pub span: Option<SourceSpan>,
}

impl ReleaseMarker {
	/// A dated release with no explicit issue list.
	pub fn tagged(version: impl Into<String>, date: impl Into<String>) -> Self {
		Self::new(ReleaseVersion::Tagged(version.into()), Some(date.into()), None)
	}

	/// Synthetic marker for a sentinel bucket. Carries no date.
	pub fn unreleased(sentinel: Sentinel) -> Self {
		Self::new(ReleaseVersion::Unreleased(sentinel), None, None)
	}

	pub fn with_explicit_issues<S: Into<String>>(mut self, numbers: impl IntoIterator<Item = S>) -> Self {
		self.explicit_issues = Some(numbers.into_iter().map(Into::into).collect());
		self
	}

	pub fn with_span(mut self, span: impl Into<Option<SourceSpan>>) -> Self {
		self.span = span.into();
		self
	}
}

impl fmt::Display for ReleaseMarker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.version {
			ReleaseVersion::Tagged(version) => write!(f, "<release {version}>"),
			ReleaseVersion::Unreleased(sentinel) => write!(f, "<release {}>", sentinel.bucket_name()),
		}
	}
}
