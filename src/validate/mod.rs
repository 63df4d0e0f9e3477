//! Declarative validation rules.
//!
//! This module handles:
//! - The built-in rule table (`required`, `url`, `email`, `range`, `min`, `max`)
//! - Per-loader registries that custom rules can extend or shadow
//! - Parsing comma-separated rule expressions such as `required,range:1000,9999`

pub mod builtin;

pub use builtin::builtin_validators;

use crate::error::{RuleError, ValidationError};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A validation rule: `(value, parameter)` to pass or a message.
pub type ValidatorFn = Arc<dyn Fn(&Value, &str) -> Result<(), RuleError> + Send + Sync>;

/// One `name` or `name:param` clause of a rule expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleClause {
	pub name: String,
	pub param: String,
}

/// Split a rule expression into clauses.
///
/// Clauses are comma-separated, but a segment that does not start with a
/// rule name continues the previous clause's parameter, so
/// `range:1000,9999,required` yields `range` with `1000,9999` followed by
/// `required`.
pub fn parse_expression(expression: &str) -> Vec<RuleClause> {
	let mut clauses: Vec<RuleClause> = Vec::new();

	for segment in expression.split(',') {
		let segment = segment.trim();

		if let Some(last) = clauses.last_mut()
			&& !last.param.is_empty()
			&& !starts_with_rule_name(segment)
		{
			last.param.push(',');
			last.param.push_str(segment);
			continue;
		}

		if segment.is_empty() {
			continue;
		}

		let (name, param) = segment.split_once(':').unwrap_or((segment, ""));
		clauses.push(RuleClause {
			name: name.trim().to_string(),
			param: param.trim().to_string(),
		});
	}

	clauses
}

fn starts_with_rule_name(segment: &str) -> bool {
	let name = segment.split_once(':').map_or(segment, |(name, _)| name);
	let mut chars = name.chars();
	matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Rule name to rule function, owned by one loader.
#[derive(Clone)]
pub struct ValidatorRegistry {
	rules: HashMap<String, ValidatorFn>,
}

impl Default for ValidatorRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}

impl std::fmt::Debug for ValidatorRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ValidatorRegistry")
			.field("rules", &self.names())
			.finish()
	}
}

impl ValidatorRegistry {
	/// A registry seeded with the built-in rules.
	pub fn builtin() -> Self {
		ValidatorRegistry {
			rules: builtin_validators(),
		}
	}

	/// A registry with no rules at all.
	pub fn empty() -> Self {
		ValidatorRegistry {
			rules: HashMap::new(),
		}
	}

	/// Add or replace the rule called `name`.
	pub fn register<F>(&mut self, name: impl Into<String>, rule: F)
	where
		F: Fn(&Value, &str) -> Result<(), RuleError> + Send + Sync + 'static,
	{
		self.rules.insert(name.into(), Arc::new(rule));
	}

	pub fn get(&self, name: &str) -> Option<&ValidatorFn> {
		self.rules.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.rules.contains_key(name)
	}

	/// Registered rule names, sorted.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Run every clause of `expression` against `value`, stopping at the
	/// first failure. Unregistered rule names are skipped.
	pub fn validate(
		&self,
		field: &str,
		value: &Value,
		expression: &str,
	) -> Result<(), ValidationError> {
		for clause in parse_expression(expression) {
			let Some(rule) = self.rules.get(&clause.name) else {
				tracing::warn!(field, rule = %clause.name, "unknown validation rule, skipping");
				continue;
			};

			if let Err(err) = rule(value, &clause.param) {
				return Err(ValidationError {
					field: field.to_string(),
					value: value.clone(),
					rule: clause.name,
					message: err.to_string(),
				});
			}
		}

		Ok(())
	}
}
