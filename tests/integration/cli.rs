//! Tests driving the compiled `releases` binary.

use rstest::rstest;

use crate::{
	fixtures::{ChangelogContext, changelog, ctx, stderr, stdout},
	pipeline::SAMPLE_ITEMS,
};

#[rstest]
fn test_renders_html_from_file(ctx: ChangelogContext) {
	let input = ctx.write("CHANGELOG.md", &changelog(SAMPLE_ITEMS));
	let output = ctx.run(&["--issue-uri", "https://example.com/issues/%s", input.to_str().unwrap()]);

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	let html = stdout(&output);
	assert!(html.starts_with("<section id=\"next-bugfix-release\">"), "{html}");
	assert!(html.contains("<a class=\"reference external\" href=\"https://example.com/issues/5\">#5</a>"), "{html}");
	assert_eq!(html.matches("<section ").count(), 4);
}

#[rstest]
fn test_reads_stdin(ctx: ChangelogContext) {
	let output = ctx.run_with_stdin(&["--format", "markdown"], &changelog(SAMPLE_ITEMS));
	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert!(stdout(&output).starts_with("## "), "{}", stdout(&output));
}

#[rstest]
fn test_json_output(ctx: ChangelogContext) {
	let output = ctx.run_with_stdin(&["--format", "json"], &changelog(SAMPLE_ITEMS));
	assert!(output.status.success(), "stderr: {}", stderr(&output));
	let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
	let labels: Vec<&str> = value.as_array().unwrap().iter().map(|block| block["header"]["label"].as_str().unwrap()).collect();
	assert_eq!(labels, vec!["Next bugfix release", "1.1.0", "1.0.1", "1.0.0"]);
}

#[rstest]
fn test_non_changelog_passes_through(ctx: ChangelogContext) {
	let readme = "# Readme\n\n- :bug:`1` not a changelog entry\n";
	let output = ctx.run_with_stdin(&[], readme);
	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert_eq!(stdout(&output), readme);
	assert!(stderr(&output).contains("is not a changelog"), "{}", stderr(&output));
}

#[rstest]
fn test_duplicate_issue_fails_without_output(ctx: ChangelogContext) {
	let input = ctx.write("CHANGELOG.md", &changelog("- :bug:`12` again\n- :bug:`12` first\n"));
	let output = ctx.run(&[input.to_str().unwrap()]);

	assert!(!output.status.success());
	assert!(stdout(&output).is_empty());
	let err = stderr(&output);
	assert!(err.contains("issue #12 is defined more than once"), "{err}");
	assert!(err.contains("releases::partition::duplicate_issue"), "{err}");
}

#[rstest]
fn test_missing_input_file(ctx: ChangelogContext) {
	let output = ctx.run(&["does-not-exist.md"]);
	assert!(!output.status.success());
	assert!(stderr(&output).contains("failed to read does-not-exist.md"), "{}", stderr(&output));
}

#[rstest]
#[case::from_config_file(&[], "https://config.example/issues/2")]
#[case::flag_overrides_config(&["--issue-uri", "https://flag.example/i/%s"], "https://flag.example/i/2")]
fn test_settings_precedence(ctx: ChangelogContext, #[case] extra: &[&str], #[case] expected_href: &str) {
	let config = ctx.write("releases.toml", "issue_uri = \"https://config.example/issues/%s\"\n");
	let input = ctx.write("CHANGELOG.md", &changelog(SAMPLE_ITEMS));
	let mut args = vec!["--config", config.to_str().unwrap()];
	args.extend_from_slice(extra);
	args.push(input.to_str().unwrap());

	let output = ctx.run(&args);
	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert!(stdout(&output).contains(&format!("href=\"{expected_href}\"")), "{}", stdout(&output));
}

#[rstest]
fn test_settings_from_environment(ctx: ChangelogContext) {
	let input = ctx.write("CHANGELOG.md", &changelog(SAMPLE_ITEMS));
	let output = ctx.command().env("RELEASES_RELEASE_URI", "https://env.example/tree/%s").arg(&input).output().unwrap();
	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert!(stdout(&output).contains("href=\"https://env.example/tree/1.1.0\""), "{}", stdout(&output));
}
