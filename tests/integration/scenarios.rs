//! End-to-end partitioning scenarios, written as authored (newest-first) changelogs.

use releases::{ChangelogError, Release, construct_releases, parse_document};
use rstest::rstest;

use crate::fixtures::changelog;

fn partition(items: &str) -> Result<Vec<Release>, ChangelogError> {
	let entries = parse_document(&changelog(items))?.expect("document is a changelog");
	construct_releases(entries)
}

fn summarize(releases: &[Release]) -> Vec<String> {
	releases
		.iter()
		.map(|release| {
			let numbers: Vec<&str> = release.entries.iter().map(|issue| issue.number.as_deref().unwrap_or("-")).collect();
			format!("{} [{}]", release.marker, numbers.join(", "))
		})
		.collect()
}

#[rstest]
#[case::plain_bug_skips_feature_release(
	"- :release:`1.0 <2020-01-01>`\n- :bug:`1` one\n",
	&["<release 1.0> []", "<release unreleased_bugfix> [1]", "<release unreleased_feature> []"]
)]
#[case::feature_release_originates_line(
	"- :release:`1.0 <2020-01-01>`\n- :feature:`2` two\n",
	&["<release 1.0> [2]", "<release unreleased_bugfix> []", "<release unreleased_feature> []"]
)]
#[case::bugfix_release_on_existing_line(
	"- :release:`1.0 <2020-02-01>`\n- :bug:`3 1.0+` three\n- :release:`1.0 <2020-01-01>`\n- :feature:`2` two\n",
	&["<release 1.0> [2]", "<release 1.0> [3]", "<release unreleased_bugfix> []", "<release unreleased_feature> []"]
)]
#[case::explicit_release_takes_only_listed(
	"- :release:`1.1 <2020-03-01>` 6\n- :bug:`6` six\n- :bug:`5` five\n",
	&["<release 1.1> [6]", "<release unreleased_bugfix> [5]", "<release unreleased_feature> []"]
)]
#[case::backported_feature_pending_everywhere(
	"- :feature:`7 backported` seven\n- :release:`1.0.0 <2020-01-01>`\n- :feature:`1` one\n",
	&["<release 1.0.0> [1]", "<release unreleased_bugfix> [7]", "<release unreleased_feature> [7]"]
)]
#[case::min_line_is_numeric(
	"\
- :release:`1.10.1 <2020-05-01>`
- :release:`1.2.1 <2020-04-01>`
- :bug:`5 1.3+` five
- :release:`1.10.0 <2020-02-01>`
- :feature:`3` three
- :release:`1.2.0 <2020-01-01>`
- :feature:`2` two
",
	&[
		"<release 1.2.0> [2]",
		"<release 1.10.0> [3]",
		"<release 1.2.1> []",
		"<release 1.10.1> [5]",
		"<release unreleased_bugfix> []",
		"<release unreleased_feature> []",
	]
)]
#[case::major_bug_ships_with_features(
	"\
- :release:`1.1.0 <2020-03-01>`
- :release:`1.0.1 <2020-02-01>`
- :bug:`4 major` four
- :bug:`3` three
- :release:`1.0.0 <2020-01-01>`
- :feature:`2` two
",
	&[
		"<release 1.0.0> [2]",
		"<release 1.0.1> [3]",
		"<release 1.1.0> [4]",
		"<release unreleased_bugfix> []",
		"<release unreleased_feature> []",
	]
)]
#[case::anonymous_items_are_bugs(
	"- :release:`1.0.1 <2020-02-01>`\n- Fixed a typo\n- :release:`1.0.0 <2020-01-01>`\n- :support:`1` docs\n",
	&["<release 1.0.0> [1]", "<release 1.0.1> [-]", "<release unreleased_bugfix> []", "<release unreleased_feature> []"]
)]
fn test_partition_scenarios(#[case] items: &str, #[case] expected: &[&str]) {
	let releases = partition(items).unwrap();
	assert_eq!(summarize(&releases), expected);
}

#[test]
fn test_rerun_is_identical() {
	let items = "- :release:`1.0.1 <2020-02-01>`\n- :feature:`4 backported` four\n- :bug:`3` three\n- :release:`1.0.0 <2020-01-01>`\n- :feature:`2` two\n";
	assert_eq!(summarize(&partition(items).unwrap()), summarize(&partition(items).unwrap()));
}

#[test]
fn test_unknown_explicit_numbers_are_all_reported() {
	let err = partition("- :release:`1.1 <2020-03-01>` 8, 5, 9\n- :bug:`5` five\n").unwrap_err();
	assert_eq!(err.to_string(), "couldn't find issue(s) #8, #9 in the changelog");
}

#[rstest]
#[case::duplicate("- :bug:`1` again\n- :feature:`1` once\n", "issue #1 is defined more than once")]
#[case::bad_metadata("- :bug:`1 sometimes` x\n", "unknown issue metadata 'sometimes' for issue #1")]
#[case::missing_date("- :release:`1.0.0`\n", "release '1.0.0' has no date")]
#[case::malformed_version("- :release:`1.x <2020-01-01>`\n", "malformed version '1.x'")]
fn test_fatal_errors(#[case] items: &str, #[case] message: &str) {
	assert_eq!(partition(items).unwrap_err().to_string(), message);
}
