//! Whole-document runs through the library API.

use releases::{OutputFormat, Settings, generate_changelog, render};

use crate::fixtures::changelog;

pub const SAMPLE_ITEMS: &str = "\
- :release:`1.1.0 <2020-03-01>`
- :feature:`5` Added **widgets**, building on :bug:`3`.
- :release:`1.0.1 <2020-02-01>`
- :bug:`4 major` Reworked parsing
- :bug:`3` Fixed crash
- :release:`1.0.0 <2020-01-01>`
- :feature:`2` Initial feature
- Tidied up docs
";

fn settings() -> Settings {
	Settings {
		issue_uri: Some("https://github.com/acme/widgets/issues/%s".to_string()),
		release_uri: Some("https://github.com/acme/widgets/tree/%s".to_string()),
		debug: false,
	}
}

#[test]
fn test_html_output() {
	let blocks = generate_changelog(&changelog(SAMPLE_ITEMS), &settings()).unwrap().unwrap();
	insta::assert_snapshot!(render(&blocks, OutputFormat::Html).unwrap(), @r##"
	<section id="next-bugfix-release">
	<h2 style="margin-bottom: 0.3em;"><a class="reference external" href="https://github.com/acme/widgets/tree/master">Next bugfix release</a></h2>
	<ul>
	<li><p>[<span style="color: #A04040;">Bug</span>]: Tidied up docs</p></li>
	</ul>
	</section>
	<section id="1-1-0">
	<h2 style="margin-bottom: 0.3em;"><a class="reference external" href="https://github.com/acme/widgets/tree/1.1.0">1.1.0</a> <span style="font-size: 75%;">2020-03-01</span></h2>
	<ul>
	<li><p>[<span style="color: #A04040;">Bug</span>] <a class="reference external" href="https://github.com/acme/widgets/issues/4">#4</a>: Reworked parsing</p></li>
	<li><p>[<span style="color: #40A056;">Feature</span>] <a class="reference external" href="https://github.com/acme/widgets/issues/5">#5</a>: Added <strong>widgets</strong>, building on [<span style="color: #A04040;">Bug</span>] <a class="reference external" href="https://github.com/acme/widgets/issues/3">#3</a>.</p></li>
	</ul>
	</section>
	<section id="1-0-1">
	<h2 style="margin-bottom: 0.3em;"><a class="reference external" href="https://github.com/acme/widgets/tree/1.0.1">1.0.1</a> <span style="font-size: 75%;">2020-02-01</span></h2>
	<ul>
	<li><p>[<span style="color: #A04040;">Bug</span>] <a class="reference external" href="https://github.com/acme/widgets/issues/3">#3</a>: Fixed crash</p></li>
	</ul>
	</section>
	<section id="1-0-0">
	<h2 style="margin-bottom: 0.3em;"><a class="reference external" href="https://github.com/acme/widgets/tree/1.0.0">1.0.0</a> <span style="font-size: 75%;">2020-01-01</span></h2>
	<ul>
	<li><p>[<span style="color: #40A056;">Feature</span>] <a class="reference external" href="https://github.com/acme/widgets/issues/2">#2</a>: Initial feature</p></li>
	</ul>
	</section>
	"##);
}

#[test]
fn test_unlinked_output_without_templates() {
	let blocks = generate_changelog(&changelog(SAMPLE_ITEMS), &Settings::default()).unwrap().unwrap();
	let html = render(&blocks, OutputFormat::Html).unwrap();
	assert!(!html.contains("<a "), "{html}");
	assert!(html.contains("<h2 style=\"margin-bottom: 0.3em;\">1.0.1 <span style=\"font-size: 75%;\">2020-02-01</span></h2>"), "{html}");
	assert!(html.contains("[<span style=\"color: #A04040;\">Bug</span>] #3: Fixed crash"), "{html}");
}

#[test]
fn test_shared_issue_is_copied_per_release() {
	let items = "\
- :release:`1.1.0 <2020-02-02>`
- :release:`1.0.1 <2020-02-01>`
- :feature:`7 backported` Shared *feature*
- :release:`1.0.0 <2020-01-01>`
- :feature:`1` First
";
	let blocks = generate_changelog(&changelog(items), &Settings::default()).unwrap().unwrap();
	let labels: Vec<_> = blocks.iter().map(|b| b.header.label.as_str()).collect();
	assert_eq!(labels, vec!["1.1.0", "1.0.1", "1.0.0"]);
	assert_eq!(blocks[0].entries, blocks[1].entries);
}

#[test]
fn test_markdown_output_is_a_changelog_outline() {
	let blocks = generate_changelog(&changelog(SAMPLE_ITEMS), &settings()).unwrap().unwrap();
	let markdown = render(&blocks, OutputFormat::Markdown).unwrap();
	let headings: Vec<String> = markdown.lines().filter(|l| l.starts_with("## ")).map(str::to_string).collect();
	assert_eq!(headings.len(), 4, "{markdown}");
	assert!(headings[0].contains("Next bugfix release"), "{markdown}");
	assert!(headings[3].contains("2020-01-01"), "{markdown}");
}
