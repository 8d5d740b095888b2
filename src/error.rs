//! Error types for changelog construction.
//!
//! Uses miette for rich diagnostics with source code spans.
//! Every variant is fatal to the run: no partial changelog is ever emitted.

#![allow(unused_assignments)] // Fields are read by miette's derive macro via attributes

use miette::{NamedSource, Report, SourceSpan};

/// Error type for changelog parsing and partitioning.
#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum ChangelogError {
	#[error("issue #{number} is defined more than once")]
	#[diagnostic(code(releases::partition::duplicate_issue), help("every numbered issue may appear only once in the changelog; double check the number"))]
	DuplicateIssueNumber {
		number: String,
		#[label("second definition of #{number}")]
		span: Option<SourceSpan>,
	},

	#[error("couldn't find issue(s) #{} in the changelog", .missing.join(", #"))]
	#[diagnostic(code(releases::partition::unknown_issue), help("explicit release lists may only cite issues defined below the release"))]
	UnknownIssueNumber {
		missing: Vec<String>,
		#[label("release cites unknown issue(s)")]
		span: Option<SourceSpan>,
	},

	#[error("malformed version '{version}'")]
	#[diagnostic(code(releases::version::malformed), help("versions must be dot-separated non-negative integers, e.g. '1.2.7'"))]
	MalformedVersion {
		version: String,
		#[label("expected numeric dotted version")]
		span: Option<SourceSpan>,
	},

	#[error("unknown issue metadata '{metadata}' for issue {}", .number.as_deref().map(|n| format!("#{n}")).unwrap_or_else(|| "without number".to_string()))]
	#[diagnostic(code(releases::annotation::malformed_metadata), help("issue metadata must be one of: 'backported', 'major', or a minimum release line such as '1.2+'"))]
	MalformedAnnotationMetadata {
		metadata: String,
		number: Option<String>,
		#[label("unrecognized metadata")]
		span: Option<SourceSpan>,
	},

	#[error("release '{text}' has no date")]
	#[diagnostic(code(releases::annotation::missing_date), help("releases must be written as ':release:`1.2.0 <YYYY-MM-DD>`'"))]
	MissingReleaseDate {
		text: String,
		#[label("must specify release date")]
		span: Option<SourceSpan>,
	},
}

impl ChangelogError {
	/// Attach a span to an error that was raised without one.
	pub fn with_span(mut self, at: impl Into<Option<SourceSpan>>) -> Self {
		let Some(at) = at.into() else {
			return self;
		};
		let slot = match &mut self {
			ChangelogError::DuplicateIssueNumber { span, .. }
			| ChangelogError::UnknownIssueNumber { span, .. }
			| ChangelogError::MalformedVersion { span, .. }
			| ChangelogError::MalformedAnnotationMetadata { span, .. }
			| ChangelogError::MissingReleaseDate { span, .. } => span,
		};
		slot.get_or_insert(at);
		self
	}
}

/// Holds source content and filename for error reporting.
#[derive(Clone, Debug)]
pub struct SourceFile {
	pub content: String,
	pub filename: String,
}

impl SourceFile {
	pub fn new(content: String, filename: impl Into<String>) -> Self {
		Self { content, filename: filename.into() }
	}

	/// Create a NamedSource for miette diagnostics.
	pub fn named_source(&self) -> NamedSource<String> {
		NamedSource::new(&self.filename, self.content.clone())
	}

	/// Turn an error into a report that renders against this file.
	pub fn report(&self, err: ChangelogError) -> Report {
		Report::new(err).with_source_code(self.named_source())
	}
}
