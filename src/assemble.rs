//! Output assembly: turn partitioned releases into render-ready blocks, newest first.

use serde::Serialize;

use crate::{
	config::Settings,
	issue::{Inline, Issue, IssueKind, IssueLink, ReleaseVersion},
	partition::Release,
};

/// Slug used for links of the unreleased pseudo-releases.
pub const UNRELEASED_SLUG: &str = "master";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReleaseHeader {
	/// Version, or the "Next ... release" label of a pseudo-release.
	pub label: String,
	pub slug: String,
	pub href: Option<String>,
	pub date: Option<String>,
}

impl ReleaseHeader {
	fn new(version: &ReleaseVersion, date: Option<&str>, settings: &Settings) -> Self {
		let (label, slug) = match version {
			ReleaseVersion::Tagged(version) => (version.clone(), version.clone()),
			ReleaseVersion::Unreleased(sentinel) => (sentinel.label().to_string(), UNRELEASED_SLUG.to_string()),
		};
		Self {
			href: settings.release_href(&slug),
			label,
			slug,
			date: date.map(str::to_string),
		}
	}
}

/// Presentation of an issue: its type badge and optional `#N` link.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IssueFragment {
	/// None for untyped `:issue:` references, which show only the link.
	pub kind: Option<IssueKind>,
	pub link: Option<IssueLink>,
}

impl IssueFragment {
	pub fn new(kind: Option<IssueKind>, number: Option<&str>, settings: &Settings) -> Self {
		let link = number.map(|number| IssueLink {
			number: number.to_string(),
			href: settings.issue_href(number),
		});
		Self { kind, link }
	}

	pub fn of_issue(issue: &Issue, settings: &Settings) -> Self {
		Self::new(Some(issue.kind), issue.number.as_deref(), settings)
	}

	/// Inline form: badge, then the link if any.
	pub fn to_inlines(&self) -> Vec<Inline> {
		let mut inlines = Vec::with_capacity(3);
		if let Some(kind) = self.kind {
			inlines.push(Inline::Badge(kind));
		}
		if let Some(link) = &self.link {
			if !inlines.is_empty() {
				inlines.push(Inline::text(" "));
			}
			inlines.push(Inline::IssueLink(link.clone()));
		}
		inlines
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntryBlock {
	pub fragment: IssueFragment,
	pub description: Vec<Inline>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReleaseBlock {
	pub header: ReleaseHeader,
	pub entries: Vec<EntryBlock>,
}

/// Build blocks newest-first, skipping releases with no entries.
pub fn assemble(releases: &[Release], settings: &Settings) -> Vec<ReleaseBlock> {
	releases
		.iter()
		.rev()
		.filter(|release| !release.is_empty())
		.map(|release| {
			let entries = release
				.entries
				.iter()
				.map(|issue| EntryBlock {
					fragment: IssueFragment::of_issue(issue, settings),
					description: resolve_references(&issue.description, settings),
				})
				.collect();
			ReleaseBlock {
				header: ReleaseHeader::new(&release.marker.version, release.marker.date.as_deref(), settings),
				entries,
			}
		})
		.collect()
}

/// Copy a description, replacing top-level issue references with their fragments.
///
/// Only the top level is scanned; references nested in emphasis, links and the like are
/// left as they are, and substituted fragments are not scanned again.
pub fn resolve_references(description: &[Inline], settings: &Settings) -> Vec<Inline> {
	let mut resolved = Vec::with_capacity(description.len());
	for inline in description.iter().cloned() {
		match inline {
			Inline::Reference(reference) => resolved.extend(IssueFragment::new(reference.kind, reference.number.as_deref(), settings).to_inlines()),
			other => resolved.push(other),
		}
	}
	resolved
}
