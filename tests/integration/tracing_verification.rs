//! Integration tests that verify partitioning decisions via tracing output.
//!
//! These tests spawn the binary with RELEASES_TRACE_FILE set, then examine the trace log.

use rstest::rstest;

use crate::{
	assert_traced,
	fixtures::{ChangelogContext, changelog, ctx, stderr},
	pipeline::SAMPLE_ITEMS,
	tracing_utils::TraceLog,
};

#[rstest]
fn test_debug_traces_partitioning(ctx: ChangelogContext) {
	let input = ctx.write("CHANGELOG.md", &changelog(SAMPLE_ITEMS));
	let trace_file = ctx.path("trace.jsonl");
	let output = ctx.command().arg("--debug").arg(&input).env("RELEASES_TRACE_FILE", &trace_file).output().unwrap();
	assert!(output.status.success(), "stderr: {}", stderr(&output));

	let trace = TraceLog::from_file(&trace_file);
	assert_traced!(trace, "<bug #3>");
	assert_traced!(trace, "adding <bug #3> to unreleased_bugfix");
	assert_traced!(trace, "adding <bug #4 (major)> to unreleased_feature");
	assert_traced!(trace, "not seen prior, making feature release");
	assert_traced!(trace, "pre-existing, making bugfix release");
	assert_traced!(trace, "found line item w/ no real issue object, creating bug");
	assert_traced!(trace, "creating 'unreleased_bugfix' faux-release with 1 entries");
}

#[rstest]
fn test_quiet_by_default(ctx: ChangelogContext) {
	let input = ctx.write("CHANGELOG.md", &changelog(SAMPLE_ITEMS));
	let trace_file = ctx.path("trace.jsonl");
	let output = ctx.command().arg(&input).env("RELEASES_TRACE_FILE", &trace_file).output().unwrap();
	assert!(output.status.success(), "stderr: {}", stderr(&output));

	let trace = TraceLog::from_file(&trace_file);
	assert_eq!(trace.count_level("DEBUG"), 0, "{:#?}", trace.messages());
}
