//! Description content of changelog entries.
//!
//! Descriptions are kept as a small owned inline tree. Cloning a description gives a
//! fully independent copy, which the assembler relies on when the same issue appears
//! in more than one release.

use serde::Serialize;

use super::types::IssueKind;

/// An issue mention embedded in descriptive text, e.g. ``see :bug:`12` ``.
/// `kind` is None for the legacy untyped `:issue:` form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reference {
	pub kind: Option<IssueKind>,
	pub number: Option<String>,
}

/// A rendered-ready link to an issue.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IssueLink {
	pub number: String,
	/// None when no issue URI template is configured.
	pub href: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
	Text(String),
	Code(String),
	Html(String),
	Emphasis(Vec<Inline>),
	Strong(Vec<Inline>),
	Strikethrough(Vec<Inline>),
	Link { href: String, children: Vec<Inline> },
	SoftBreak,
	HardBreak,
	/// Unresolved mention of another issue; replaced during assembly.
	Reference(Reference),
	/// Issue type badge, produced by assembly.
	Badge(IssueKind),
	/// `#N` link, produced by assembly.
	IssueLink(IssueLink),
}

impl Inline {
	pub fn text(s: impl Into<String>) -> Self {
		Inline::Text(s.into())
	}
}

/// Flatten inlines to plain text (for explicit release lists and log output).
pub fn plain_text(inlines: &[Inline]) -> String {
	let mut out = String::new();
	push_plain_text(inlines, &mut out);
	out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
	for inline in inlines {
		match inline {
			Inline::Text(t) | Inline::Code(t) => out.push_str(t),
			Inline::Emphasis(children) | Inline::Strong(children) | Inline::Strikethrough(children) | Inline::Link { children, .. } => push_plain_text(children, out),
			Inline::SoftBreak | Inline::HardBreak => out.push(' '),
			Inline::Reference(Reference { number: Some(n), .. }) => {
				out.push('#');
				out.push_str(n);
			}
			Inline::IssueLink(link) => {
				out.push('#');
				out.push_str(&link.number);
			}
			Inline::Badge(kind) => {
				out.push('[');
				out.push_str(kind.title());
				out.push(']');
			}
			Inline::Reference(_) | Inline::Html(_) => {}
		}
	}
}

/// Drop leading whitespace from the first text node, removing it if it becomes empty.
pub fn trim_start(inlines: &mut Vec<Inline>) {
	while let Some(first) = inlines.first_mut() {
		match first {
			Inline::Text(t) => {
				let trimmed = t.trim_start();
				if trimmed.is_empty() {
					inlines.remove(0);
				} else {
					*t = trimmed.to_string();
					return;
				}
			}
			Inline::SoftBreak | Inline::HardBreak => {
				inlines.remove(0);
			}
			_ => return,
		}
	}
}

/// Drop trailing whitespace from the last text node, removing it if it becomes empty.
pub fn trim_end(inlines: &mut Vec<Inline>) {
	while let Some(last) = inlines.last_mut() {
		match last {
			Inline::Text(t) => {
				let trimmed = t.trim_end();
				if trimmed.is_empty() {
					inlines.pop();
				} else {
					*t = trimmed.to_string();
					return;
				}
			}
			Inline::SoftBreak | Inline::HardBreak => {
				inlines.pop();
			}
			_ => return,
		}
	}
}
