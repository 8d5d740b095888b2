//! Settings injected into the changelog transform.
//!
//! Sources, lowest precedence first: an optional TOML file, then `RELEASES_*` environment
//! variables. Command-line flags are applied on top by the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Placeholder substituted in URI templates.
pub const PLACEHOLDER: &str = "%s";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Settings {
	/// Issue link template, e.g. `https://github.com/owner/repo/issues/%s`.
	pub issue_uri: Option<String>,
	/// Release link template, e.g. `https://github.com/owner/repo/tree/%s`.
	pub release_uri: Option<String>,
	/// Emit debug traces of the partitioning.
	#[default(false)]
	pub debug: bool,
}

impl Settings {
	pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
		let mut builder = config::Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(config::File::from(path).required(true));
		}
		builder.add_source(config::Environment::with_prefix("RELEASES")).build()?.try_deserialize()
	}

	pub fn issue_href(&self, number: &str) -> Option<String> {
		self.issue_uri.as_deref().map(|template| expand(template, number))
	}

	pub fn release_href(&self, slug: &str) -> Option<String> {
		self.release_uri.as_deref().map(|template| expand(template, slug))
	}
}

/// Fill a URI template. Templates without a placeholder get the value appended.
fn expand(template: &str, value: &str) -> String {
	if template.contains(PLACEHOLDER) {
		template.replace(PLACEHOLDER, value)
	} else {
		format!("{template}{value}")
	}
}
