//! Changelog record model.
//!
//! This module contains the issue and release types the partitioner works on,
//! the annotation grammar that produces them, and the inline description content.

mod annotation;
pub use annotation::{Annotation, IssueAnnotation, ROLES, ReleaseAnnotation};

mod content;
pub use content::{Inline, IssueLink, Reference, plain_text, trim_end, trim_start};

mod types;
pub use types::{Issue, IssueFlag, IssueKind, ReleaseMarker, ReleaseVersion};
