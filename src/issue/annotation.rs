//! Annotation roles used in changelog documents.
//!
//! Roles are written as `:role:` followed by a code span holding the argument:
//! ``:bug:`12 major` ``, ``:feature:`7 backported` ``, ``:bug:`30 1.2+` ``, ``:issue:`4` ``,
//! ``:release:`1.2.0 <2020-01-01>` ``.
//! This module decodes and encodes the role arguments; locating roles in markup is the
//! document parser's job.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use super::types::{IssueFlag, IssueKind};
use crate::{error::ChangelogError, version::Version};

/// `1.2+`, optionally parenthesized as `(1.2+)`.
static MIN_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:\((\d+\.\d+)\+\)|(\d+\.\d+)\+)$").unwrap());

/// `<version> <date>`, date in angle brackets.
static RELEASE_ARG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^(.+?)\s*<(.*?)>$").unwrap());

/// Role names that are recognized.
pub const ROLES: [&str; 5] = ["bug", "feature", "support", "issue", "release"];

/// A decoded issue annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct IssueAnnotation {
	/// None for the legacy untyped `:issue:` role.
	pub kind: Option<IssueKind>,
	pub number: Option<String>,
	pub flag: IssueFlag,
}

/// A decoded `:release:` annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseAnnotation {
	pub version: String,
	pub date: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
	Issue(IssueAnnotation),
	Release(ReleaseAnnotation),
}

impl Annotation {
	/// Decode a role and its argument.
	/// Returns Ok(None) if the role is not one of ours.
	pub fn decode(role: &str, argument: &str) -> Result<Option<Self>, ChangelogError> {
		match role {
			"release" => Self::decode_release(argument).map(|release| Some(Annotation::Release(release))),
			"issue" => Ok(Some(Annotation::Issue(IssueAnnotation {
				kind: None,
				number: Self::decode_number(argument).0,
				flag: IssueFlag::None,
			}))),
			other => match IssueKind::from_role(other) {
				Some(kind) => Self::decode_issue(kind, argument).map(|a| Some(Annotation::Issue(a))),
				None => Ok(None),
			},
		}
	}

	/// Split `<number> [metadata]`; `-` and `0` mean "no linkable number".
	fn decode_number(argument: &str) -> (Option<String>, &str) {
		let argument = argument.trim();
		let (number, rest) = argument.split_once(' ').unwrap_or((argument, ""));
		let number = match number {
			"-" | "0" | "" => None,
			n => Some(n.to_string()),
		};
		(number, rest.trim())
	}

	fn decode_issue(kind: IssueKind, argument: &str) -> Result<IssueAnnotation, ChangelogError> {
		let (number, metadata) = Self::decode_number(argument);
		let flag = match metadata {
			"" => IssueFlag::None,
			"backported" => IssueFlag::Backported,
			"major" => IssueFlag::Major,
			other => {
				let line = MIN_LINE_RE
					.captures(other)
					.and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
					.ok_or_else(|| ChangelogError::MalformedAnnotationMetadata {
						metadata: other.to_string(),
						number: number.clone(),
						span: None,
					})?;
				IssueFlag::MinLine(Version::parse(line.as_str())?)
			}
		};
		Ok(IssueAnnotation { kind: Some(kind), number, flag })
	}

	fn decode_release(argument: &str) -> Result<ReleaseAnnotation, ChangelogError> {
		let missing = || ChangelogError::MissingReleaseDate {
			text: argument.trim().to_string(),
			span: None,
		};
		let caps = RELEASE_ARG_RE.captures(argument.trim()).ok_or_else(missing)?;
		let date = caps[2].trim();
		if date.is_empty() {
			return Err(missing());
		}
		Ok(ReleaseAnnotation {
			version: caps[1].trim().to_string(),
			date: date.to_string(),
		})
	}

	/// Encode back to role syntax.
	pub fn encode(&self) -> String {
		match self {
			Annotation::Release(release) => format!(":release:`{} <{}>`", release.version, release.date),
			Annotation::Issue(issue) => {
				let role = issue.kind.map(|k| k.to_string()).unwrap_or_else(|| "issue".to_string());
				let number = issue.number.as_deref().unwrap_or("-");
				match &issue.flag {
					IssueFlag::None => format!(":{role}:`{number}`"),
					IssueFlag::Backported => format!(":{role}:`{number} backported`"),
					IssueFlag::Major => format!(":{role}:`{number} major`"),
					IssueFlag::MinLine(line) => format!(":{role}:`{number} {line}+`"),
				}
			}
		}
	}
}

impl fmt::Display for Annotation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.encode())
	}
}
