//! Markdown changelog front end.
//!
//! A changelog document starts with a `Changelog` heading, followed by a bullet list with one
//! record per item, newest on top:
//!
//! ```markdown
//! # Changelog
//!
//! - :release:`1.0.1 <2020-02-01>`
//! - :bug:`3 1.0+` Fixed a crash, see :issue:`2`.
//! - :release:`1.0.0 <2020-01-01>`
//! - :feature:`2` Added `thing`.
//! ```

use std::{ops::Range, sync::LazyLock};

use miette::SourceSpan;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::{
	error::ChangelogError,
	issue::{Annotation, Inline, Issue, IssueAnnotation, ROLES, Reference, ReleaseMarker, ReleaseVersion, plain_text, trim_end, trim_start},
	partition::Entry,
};

/// Title of the heading that marks a document as the changelog.
pub const CHANGELOG_TITLE: &str = "Changelog";

/// `:role:` at the very end of a text run, right before its code-span argument.
static ROLE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":([a-z]+):$").unwrap());

fn options() -> Options {
	Options::ENABLE_STRIKETHROUGH
}

/// Whether the first heading of the document is `Changelog` (ASCII case-insensitive).
pub fn is_changelog(source: &str) -> bool {
	let mut title = String::new();
	let mut in_heading = false;
	for event in Parser::new_ext(source, options()) {
		match event {
			Event::Start(Tag::Heading { .. }) => in_heading = true,
			Event::End(TagEnd::Heading(_)) => break,
			Event::Text(text) | Event::Code(text) if in_heading => title.push_str(&text),
			_ => {}
		}
	}
	title.trim().eq_ignore_ascii_case(CHANGELOG_TITLE)
}

/// Parse a changelog document into its records, in authored order.
/// Returns `Ok(None)` when the document is not the changelog.
pub fn parse_document(source: &str) -> Result<Option<Vec<Entry>>, ChangelogError> {
	if !is_changelog(source) {
		tracing::debug!("first heading is not '{CHANGELOG_TITLE}', leaving document alone");
		return Ok(None);
	}
	let mut entries = Vec::new();
	for item in list_items(source) {
		let span = trimmed_span(source, &item.range);
		match parse_item(&item.events, span)? {
			Some(entry) => entries.push(entry),
			None => tracing::debug!("skipping empty list item at {}", item.range.start),
		}
	}
	tracing::debug!("parsed {} changelog records", entries.len());
	Ok(Some(entries))
}

/// Events of one top-level list item, limited to its inline content.
struct ListItem<'a> {
	range: Range<usize>,
	events: Vec<(Event<'a>, Range<usize>)>,
}

/// Collect the items of the first top-level bullet list following the first heading.
fn list_items(source: &str) -> Vec<ListItem<'_>> {
	let mut items = Vec::new();
	let mut seen_heading = false;
	// Block nesting outside the target list; the changelog list must sit at document level.
	let mut depth = 0usize;
	let mut in_target = false;
	let mut current: Option<ListItem<'_>> = None;
	// Depth of block containers nested inside the current item, which are skipped.
	let mut nested = 0usize;

	for (event, range) in Parser::new_ext(source, options()).into_offset_iter() {
		if !in_target {
			match event {
				Event::Start(Tag::List(None)) if seen_heading && depth == 0 => in_target = true,
				Event::Start(tag) => {
					seen_heading |= matches!(tag, Tag::Heading { .. });
					depth += 1;
				}
				Event::End(_) => depth = depth.saturating_sub(1),
				_ => {}
			}
			continue;
		}

		if nested > 0 {
			match event {
				Event::Start(_) => nested += 1,
				Event::End(_) => nested -= 1,
				_ => {}
			}
			continue;
		}

		match event {
			Event::Start(Tag::Item) => current = Some(ListItem { range, events: Vec::new() }),
			Event::End(TagEnd::Item) => items.extend(current.take()),
			Event::End(TagEnd::List(_)) => break,
			Event::Start(Tag::Paragraph) => {
				if let Some(item) = current.as_mut().filter(|item| !item.events.is_empty()) {
					item.events.push((Event::SoftBreak, range));
				}
			}
			Event::End(TagEnd::Paragraph) => {}
			Event::Start(ref tag) if !is_inline_tag(tag) => nested = 1,
			Event::Start(_) | Event::End(_) | Event::Text(_) | Event::Code(_) | Event::InlineHtml(_) | Event::SoftBreak | Event::HardBreak => {
				if let Some(item) = current.as_mut() {
					item.events.push((event, range));
				}
			}
			_ => {}
		}
	}
	items
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
	matches!(tag, Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. })
}

fn trimmed_span(source: &str, range: &Range<usize>) -> SourceSpan {
	let len = source.get(range.clone()).map(|text| text.trim_end().len()).unwrap_or(range.len());
	SourceSpan::from(range.start..range.start + len)
}

/// Turn one list item into a record.
fn parse_item(events: &[(Event<'_>, Range<usize>)], span: SourceSpan) -> Result<Option<Entry>, ChangelogError> {
	let mut builder = InlineBuilder::new();
	for (event, range) in events {
		builder.feed(event, range)?;
	}
	let (leading, mut description) = builder.finish();
	trim_start(&mut description);
	trim_end(&mut description);

	let entry = match leading {
		Some(Annotation::Release(release)) => {
			let listed = plain_text(&description);
			let explicit: Vec<String> = listed.split(',').map(str::trim).filter(|n| !n.is_empty()).map(str::to_string).collect();
			let explicit = (!explicit.is_empty()).then_some(explicit);
			Entry::Release(ReleaseMarker::new(ReleaseVersion::Tagged(release.version), Some(release.date), explicit).with_span(span))
		}
		Some(Annotation::Issue(IssueAnnotation { kind: Some(kind), number, flag })) => {
			Entry::Issue(Issue::new(kind, number).with_flag(flag).with_description(description).with_span(span))
		}
		_ if description.is_empty() => return Ok(None),
		_ => Entry::PlainItem { description, span: Some(span) },
	};
	Ok(Some(entry))
}

enum Frame {
	Root,
	Emphasis,
	Strong,
	Strikethrough,
	Link(String),
}

/// Builds an inline tree out of a flat event stream, picking out annotation roles.
struct InlineBuilder {
	frames: Vec<(Frame, Vec<Inline>)>,
	leading: Option<Annotation>,
	seen_code: bool,
}

impl InlineBuilder {
	fn new() -> Self {
		Self {
			frames: vec![(Frame::Root, Vec::new())],
			leading: None,
			seen_code: false,
		}
	}

	fn children(&mut self) -> &mut Vec<Inline> {
		// The root frame is never popped.
		let last = self.frames.len() - 1;
		&mut self.frames[last].1
	}

	fn push(&mut self, inline: Inline) {
		let children = self.children();
		if let (Some(Inline::Text(prev)), Inline::Text(next)) = (children.last_mut(), &inline) {
			prev.push_str(next);
			return;
		}
		children.push(inline);
	}

	fn feed(&mut self, event: &Event<'_>, range: &Range<usize>) -> Result<(), ChangelogError> {
		match event {
			Event::Text(text) => self.push(Inline::text(text.to_string())),
			Event::Code(code) => self.code(code, range)?,
			Event::InlineHtml(html) => self.push(Inline::Html(html.to_string())),
			Event::SoftBreak => self.push(Inline::SoftBreak),
			Event::HardBreak => self.push(Inline::HardBreak),
			Event::Start(Tag::Emphasis) => self.frames.push((Frame::Emphasis, Vec::new())),
			Event::Start(Tag::Strong) => self.frames.push((Frame::Strong, Vec::new())),
			Event::Start(Tag::Strikethrough) => self.frames.push((Frame::Strikethrough, Vec::new())),
			Event::Start(Tag::Link { dest_url, .. }) => self.frames.push((Frame::Link(dest_url.to_string()), Vec::new())),
			Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => self.close(),
			_ => {}
		}
		Ok(())
	}

	fn close(&mut self) {
		if self.frames.len() < 2 {
			return;
		}
		let Some((frame, children)) = self.frames.pop() else { return };
		let inline = match frame {
			Frame::Emphasis => Inline::Emphasis(children),
			Frame::Strong => Inline::Strong(children),
			Frame::Strikethrough => Inline::Strikethrough(children),
			Frame::Link(href) => Inline::Link { href, children },
			Frame::Root => return,
		};
		self.children().push(inline);
	}

	/// A code span: either the argument of a role written just before it, or plain code.
	fn code(&mut self, argument: &str, range: &Range<usize>) -> Result<(), ChangelogError> {
		let first_code = !self.seen_code;
		self.seen_code = true;
		let at_root = self.frames.len() == 1;

		let role = match self.children().last() {
			Some(Inline::Text(text)) => ROLE_SUFFIX_RE.captures(text).map(|caps| caps[1].to_string()),
			_ => None,
		};
		let Some(role) = role.filter(|role| ROLES.contains(&role.as_str())) else {
			self.push(Inline::Code(argument.to_string()));
			return Ok(());
		};
		let role_len = role.len() + 2;
		let span = SourceSpan::from(range.start.saturating_sub(role_len)..range.end);

		let starts_item = at_root && first_code && matches!(self.children().as_slice(), [Inline::Text(text)] if text.trim_start().len() == role_len);
		let annotation = if starts_item || role != "release" {
			Annotation::decode(&role, argument).map_err(|e| e.with_span(span))?
		} else {
			None
		};

		match annotation {
			Some(annotation) if starts_item && is_record(&annotation) => {
				self.children().clear();
				self.leading = Some(annotation);
			}
			Some(Annotation::Issue(issue)) => {
				self.strip_role_suffix(role_len);
				self.push(Inline::Reference(Reference {
					kind: issue.kind,
					number: issue.number,
				}));
			}
			Some(Annotation::Release(_)) | None => self.push(Inline::Code(argument.to_string())),
		}
		Ok(())
	}

	fn strip_role_suffix(&mut self, role_len: usize) {
		let children = self.children();
		if let Some(Inline::Text(text)) = children.last_mut() {
			text.truncate(text.len().saturating_sub(role_len));
			if text.is_empty() {
				children.pop();
			}
		}
	}

	fn finish(mut self) -> (Option<Annotation>, Vec<Inline>) {
		while self.frames.len() > 1 {
			self.close();
		}
		let description = self.frames.pop().map(|(_, children)| children).unwrap_or_default();
		(self.leading, description)
	}
}

/// Annotations that make an item a record of its own: releases and typed issues.
fn is_record(annotation: &Annotation) -> bool {
	match annotation {
		Annotation::Release(_) => true,
		Annotation::Issue(issue) => issue.kind.is_some(),
	}
}
