//! Issue registry: every numbered issue seen during one partitioning run.

use std::{collections::HashMap, rc::Rc};

use crate::{error::ChangelogError, issue::Issue};

/// Dedup map from issue number to issue.
/// Anonymous issues (no number) are never registered and never collide.
#[derive(Debug, Default)]
pub struct IssueRegistry {
	issues: HashMap<String, Rc<Issue>>,
}

impl IssueRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record an issue. Fails if its number was already registered.
	pub fn register(&mut self, issue: &Rc<Issue>) -> Result<(), ChangelogError> {
		let Some(number) = &issue.number else {
			return Ok(());
		};
		if self.issues.contains_key(number) {
			return Err(ChangelogError::DuplicateIssueNumber {
				number: number.clone(),
				span: issue.span,
			});
		}
		self.issues.insert(number.clone(), Rc::clone(issue));
		Ok(())
	}

	/// Look up a single issue by number.
	pub fn resolve(&self, number: &str) -> Result<Rc<Issue>, ChangelogError> {
		self.issues.get(number).cloned().ok_or_else(|| ChangelogError::UnknownIssueNumber {
			missing: vec![number.to_string()],
			span: None,
		})
	}

	/// Look up every number, reporting the full set of missing ones on failure.
	pub fn resolve_all(&self, numbers: &[String]) -> Result<Vec<Rc<Issue>>, ChangelogError> {
		let missing: Vec<String> = numbers.iter().filter(|n| !self.issues.contains_key(n.as_str())).cloned().collect();
		if !missing.is_empty() {
			return Err(ChangelogError::UnknownIssueNumber { missing, span: None });
		}
		numbers.iter().map(|n| self.resolve(n)).collect()
	}

	pub fn len(&self) -> usize {
		self.issues.len()
	}

	pub fn is_empty(&self) -> bool {
		self.issues.is_empty()
	}
}
