//! Structured changelogs from a flat, newest-first log of issues and release markers.
//!
//! The pipeline is `document` (markdown records) → `partition` (releases) → `assemble`
//! (presentation blocks) → `render`.

pub mod assemble;
pub mod buckets;
pub mod config;
pub mod document;
pub mod error;
pub mod issue;
pub mod partition;
pub mod registry;
pub mod render;
pub mod version;

pub use assemble::{EntryBlock, IssueFragment, ReleaseBlock, ReleaseHeader, assemble};
pub use buckets::{BucketKey, LineBuckets, Sentinel};
pub use crate::config::Settings;
pub use document::{is_changelog, parse_document};
pub use error::{ChangelogError, SourceFile};
pub use issue::{Annotation, Inline, Issue, IssueFlag, IssueKind, IssueLink, Reference, ReleaseMarker, ReleaseVersion};
pub use partition::{Entry, Partitioner, Release, construct_releases};
pub use registry::IssueRegistry;
pub use render::{OutputFormat, RenderError, render};
pub use version::{Line, Version};

/// Run the whole transform over a markdown document.
///
/// Returns `Ok(None)` for documents that are not the changelog. Any error aborts the run;
/// nothing is produced for a partially valid changelog.
pub fn generate_changelog(source: &str, settings: &Settings) -> Result<Option<Vec<ReleaseBlock>>, ChangelogError> {
	let Some(entries) = parse_document(source)? else {
		return Ok(None);
	};
	let releases = construct_releases(entries)?;
	let blocks = assemble(&releases, settings);
	tracing::debug!("assembled {} non-empty releases out of {}", blocks.len(), releases.len());
	Ok(Some(blocks))
}
