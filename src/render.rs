//! Renderers for assembled changelog blocks.

use html_escape::{encode_double_quoted_attribute, encode_text};
use pulldown_cmark::{CowStr, Event, HeadingLevel, LinkType, Tag, TagEnd};
use serde::{Deserialize, Serialize};

use crate::{
	assemble::{EntryBlock, IssueFragment, ReleaseBlock, ReleaseHeader},
	issue::{Inline, IssueKind, IssueLink, Reference},
};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Html,
	Markdown,
	Json,
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum RenderError {
	#[error("failed to write markdown output: {0}")]
	#[diagnostic(code(releases::render::markdown))]
	Markdown(String),

	#[error("failed to serialize changelog")]
	#[diagnostic(code(releases::render::json))]
	Json(#[from] serde_json::Error),
}

pub fn render(blocks: &[ReleaseBlock], format: OutputFormat) -> Result<String, RenderError> {
	match format {
		OutputFormat::Html => Ok(render_html(blocks)),
		OutputFormat::Markdown => render_markdown(blocks),
		OutputFormat::Json => Ok(serde_json::to_string_pretty(blocks)?),
	}
}

//=============================================================================
// HTML
//=============================================================================

pub fn render_html(blocks: &[ReleaseBlock]) -> String {
	let mut out = String::new();
	for block in blocks {
		out.push_str(&format!("<section id=\"{}\">\n", section_id(&block.header.label)));
		push_header_html(&block.header, &mut out);
		out.push_str("<ul>\n");
		for entry in &block.entries {
			out.push_str("<li><p>");
			push_entry_html(entry, &mut out);
			out.push_str("</p></li>\n");
		}
		out.push_str("</ul>\n</section>\n");
	}
	out
}

fn push_header_html(header: &ReleaseHeader, out: &mut String) {
	out.push_str("<h2 style=\"margin-bottom: 0.3em;\">");
	match &header.href {
		Some(href) => out.push_str(&format!("<a class=\"reference external\" href=\"{}\">{}</a>", encode_double_quoted_attribute(href), encode_text(&header.label))),
		None => out.push_str(&encode_text(&header.label)),
	}
	if let Some(date) = &header.date {
		out.push_str(&format!(" <span style=\"font-size: 75%;\">{}</span>", encode_text(date)));
	}
	out.push_str("</h2>\n");
}

/// `[Bug] #12: description`, or `[Bug]: description` for unnumbered entries.
fn push_entry_html(entry: &EntryBlock, out: &mut String) {
	push_fragment_html(&entry.fragment, out);
	out.push(':');
	if !entry.description.is_empty() {
		out.push(' ');
		push_inlines_html(&entry.description, out);
	}
}

fn push_fragment_html(fragment: &IssueFragment, out: &mut String) {
	push_inlines_html(&fragment.to_inlines(), out);
}

fn push_inlines_html(inlines: &[Inline], out: &mut String) {
	for inline in inlines {
		match inline {
			Inline::Text(text) => out.push_str(&encode_text(text)),
			Inline::Code(code) => out.push_str(&format!("<code>{}</code>", encode_text(code))),
			Inline::Html(html) => out.push_str(html),
			Inline::Emphasis(children) => wrap_html("em", children, out),
			Inline::Strong(children) => wrap_html("strong", children, out),
			Inline::Strikethrough(children) => wrap_html("del", children, out),
			Inline::Link { href, children } => {
				out.push_str(&format!("<a href=\"{}\">", encode_double_quoted_attribute(href)));
				push_inlines_html(children, out);
				out.push_str("</a>");
			}
			Inline::SoftBreak => out.push('\n'),
			Inline::HardBreak => out.push_str("<br />\n"),
			Inline::Reference(reference) => out.push_str(&encode_text(&reference_text(reference))),
			Inline::Badge(kind) => out.push_str(&badge_html(*kind)),
			Inline::IssueLink(IssueLink { number, href: Some(href) }) => out.push_str(&format!("<a class=\"reference external\" href=\"{}\">#{}</a>", encode_double_quoted_attribute(href), encode_text(number))),
			Inline::IssueLink(IssueLink { number, href: None }) => out.push_str(&format!("#{}", encode_text(number))),
		}
	}
}

fn wrap_html(tag: &str, children: &[Inline], out: &mut String) {
	out.push_str(&format!("<{tag}>"));
	push_inlines_html(children, out);
	out.push_str(&format!("</{tag}>"));
}

fn badge_html(kind: IssueKind) -> String {
	format!("[<span style=\"color: #{};\">{}</span>]", kind.color(), kind.title())
}

/// A reference nested too deep to be resolved shows as its bare number.
fn reference_text(reference: &Reference) -> String {
	reference.number.as_deref().map(|n| format!("#{n}")).unwrap_or_default()
}

fn section_id(label: &str) -> String {
	let mut id = String::with_capacity(label.len());
	for c in label.chars() {
		if c.is_ascii_alphanumeric() {
			id.push(c.to_ascii_lowercase());
		} else if !id.is_empty() && !id.ends_with('-') {
			id.push('-');
		}
	}
	id.trim_end_matches('-').to_string()
}

//=============================================================================
// Markdown
//=============================================================================

pub fn render_markdown(blocks: &[ReleaseBlock]) -> Result<String, RenderError> {
	let mut events: Vec<Event<'static>> = Vec::new();
	for block in blocks {
		push_header_events(&block.header, &mut events);
		events.push(Event::Start(Tag::List(None)));
		for entry in &block.entries {
			events.push(Event::Start(Tag::Item));
			push_inline_events(&entry.fragment.to_inlines(), &mut events);
			events.push(Event::Text(":".into()));
			if !entry.description.is_empty() {
				events.push(Event::Text(" ".into()));
				push_inline_events(&entry.description, &mut events);
			}
			events.push(Event::End(TagEnd::Item));
		}
		events.push(Event::End(TagEnd::List(false)));
	}

	let mut output = String::new();
	pulldown_cmark_to_cmark::cmark(events.iter(), &mut output).map_err(|e| RenderError::Markdown(e.to_string()))?;
	output.push('\n');
	Ok(output)
}

fn push_header_events(header: &ReleaseHeader, events: &mut Vec<Event<'static>>) {
	events.push(Event::Start(Tag::Heading {
		level: HeadingLevel::H2,
		id: None,
		classes: Vec::new(),
		attrs: Vec::new(),
	}));
	match &header.href {
		Some(href) => push_link_events(href, vec![Event::Text(header.label.clone().into())], events),
		None => events.push(Event::Text(header.label.clone().into())),
	}
	if let Some(date) = &header.date {
		events.push(Event::Text(format!(" ({date})").into()));
	}
	events.push(Event::End(TagEnd::Heading(HeadingLevel::H2)));
}

fn push_link_events(href: &str, children: Vec<Event<'static>>, events: &mut Vec<Event<'static>>) {
	events.push(Event::Start(Tag::Link {
		link_type: LinkType::Inline,
		dest_url: CowStr::from(href.to_string()),
		title: CowStr::from(""),
		id: CowStr::from(""),
	}));
	events.extend(children);
	events.push(Event::End(TagEnd::Link));
}

fn push_wrapped_events(start: Tag<'static>, end: TagEnd, children: &[Inline], events: &mut Vec<Event<'static>>) {
	events.push(Event::Start(start));
	push_inline_events(children, events);
	events.push(Event::End(end));
}

fn push_inline_events(inlines: &[Inline], events: &mut Vec<Event<'static>>) {
	for inline in inlines {
		match inline {
			Inline::Text(text) => events.push(Event::Text(text.clone().into())),
			Inline::Code(code) => events.push(Event::Code(code.clone().into())),
			Inline::Html(html) => events.push(Event::InlineHtml(html.clone().into())),
			Inline::Emphasis(children) => push_wrapped_events(Tag::Emphasis, TagEnd::Emphasis, children, events),
			Inline::Strong(children) => push_wrapped_events(Tag::Strong, TagEnd::Strong, children, events),
			Inline::Strikethrough(children) => push_wrapped_events(Tag::Strikethrough, TagEnd::Strikethrough, children, events),
			Inline::Link { href, children } => {
				let mut inner = Vec::new();
				push_inline_events(children, &mut inner);
				push_link_events(href, inner, events);
			}
			Inline::SoftBreak => events.push(Event::SoftBreak),
			Inline::HardBreak => events.push(Event::HardBreak),
			Inline::Reference(reference) => events.push(Event::Text(reference_text(reference).into())),
			Inline::Badge(kind) => push_wrapped_events(Tag::Strong, TagEnd::Strong, &[Inline::text(format!("[{}]", kind.title()))], events),
			Inline::IssueLink(IssueLink { number, href: Some(href) }) => push_link_events(href, vec![Event::Text(format!("#{number}").into())], events),
			Inline::IssueLink(IssueLink { number, href: None }) => events.push(Event::Text(format!("#{number}").into())),
		}
	}
}
