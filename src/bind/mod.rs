//! Binding merged values onto typed records.
//!
//! This module handles:
//! - Declaring fields with config keys, env keys, rules and defaults
//! - Target-typed coercion of loosely-typed values
//! - The per-field resolve, validate, assign, default pass

pub mod coerce;
pub mod field;

pub use coerce::{FieldKind, FieldValue, parse_bool};
pub use field::{Configurable, Field, FieldMeta};

use crate::error::{ConfigFlowError, Result};
use crate::merge::Namespace;
use crate::source::SourceKind;
use crate::validate::ValidatorRegistry;
use crate::value::Value;
use std::collections::BTreeSet;

/// Where a field's value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	EnvKey,
	ConfigKey,
}

/// Applies one merged namespace to a binding table.
#[derive(Debug)]
pub struct Binder<'a> {
	namespace: &'a Namespace,
	validators: &'a ValidatorRegistry,
	validation: bool,
}

impl<'a> Binder<'a> {
	pub fn new(namespace: &'a Namespace, validators: &'a ValidatorRegistry) -> Self {
		Binder {
			namespace,
			validators,
			validation: true,
		}
	}

	/// Whether validate expressions are honored.
	pub fn validation(mut self, enabled: bool) -> Self {
		self.validation = enabled;
		self
	}

	/// Look up a field's value: env key first (case-insensitive), then the
	/// config key. A `null` value counts as absent. Returns the namespace key
	/// that matched.
	pub fn resolve(&self, meta: &FieldMeta) -> Option<(Resolution, String, &'a Value)> {
		let found = meta
			.env_key
			.as_ref()
			.map(|key| key.to_lowercase())
			.and_then(|key| {
				self.namespace
					.get(&key)
					.map(|v| (Resolution::EnvKey, key, v))
			})
			.or_else(|| {
				meta.config_key.as_ref().and_then(|key| {
					self.namespace
						.get(key)
						.map(|v| (Resolution::ConfigKey, key.clone(), v))
				})
			});

		found.filter(|(_, _, v)| !v.is_null())
	}

	/// Bind every field in declaration order, stopping at the first error.
	///
	/// Fields bound before a failure keep their new values.
	pub fn bind<T>(&self, target: &mut T, fields: &[Field<T>]) -> Result<()> {
		for field in fields {
			self.bind_field(target, field)?;
		}
		Ok(())
	}

	fn bind_field<T>(&self, target: &mut T, field: &Field<T>) -> Result<()> {
		let meta = field.meta();

		if let Some((resolution, key, value)) = self.resolve(meta) {
			if self.validation
				&& let Some(ref expression) = meta.validate
			{
				self.validators.validate(field.name(), value, expression)?;
			}

			field
				.assign(target, value)
				.map_err(|source| ConfigFlowError::FieldAssignment {
					field: field.name().to_string(),
					source,
				})?;

			tracing::debug!(field = field.name(), key = %key, ?resolution, "bound field");
		} else if let Some(ref text) = meta.default {
			let parsed = Value::parse_loose(text);
			field
				.assign(target, &parsed)
				.map_err(|source| ConfigFlowError::DefaultAssignment {
					field: field.name().to_string(),
					source,
				})?;

			tracing::debug!(field = field.name(), default = %text, "bound default");
		}

		Ok(())
	}
}

/// Keys in `namespace` that no field claims, ignoring keys that came from
/// the environment. Returned sorted.
pub fn unknown_keys<T>(namespace: &Namespace, fields: &[Field<T>]) -> Vec<String> {
	let mut claimed: BTreeSet<String> = BTreeSet::new();
	for field in fields {
		let meta = field.meta();
		if let Some(ref key) = meta.config_key {
			claimed.insert(key.clone());
		}
		if let Some(ref key) = meta.env_key {
			claimed.insert(key.to_lowercase());
		}
	}

	namespace
		.values
		.keys()
		.filter(|key| !claimed.contains(*key))
		.filter(|key| {
			namespace
				.origin(key)
				.is_none_or(|origin| origin.kind != SourceKind::Env)
		})
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::merge::{MergeOrder, merge_sources};
	use crate::source::{EnvSource, MapSource, Source};
	use crate::value::Table;

	#[derive(Debug, Default)]
	struct Settings {
		port: i64,
		debug: bool,
		name: String,
	}

	fn settings_fields() -> Vec<Field<Settings>> {
		vec![
			Field::new("Port", |s: &mut Settings| &mut s.port)
				.key("port")
				.env("APP_PORT")
				.validate("range:1000,9999")
				.default("8080"),
			Field::new("Debug", |s: &mut Settings| &mut s.debug)
				.key("debug")
				.default("false"),
			Field::new("Name", |s: &mut Settings| &mut s.name).key("app.name"),
		]
	}

	fn namespace(sources: Vec<Box<dyn Source>>) -> Namespace {
		merge_sources(&sources, MergeOrder::Registration).unwrap()
	}

	fn map(entries: &[(&str, Value)]) -> Box<dyn Source> {
		let data: Table = entries
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect();
		Box::new(MapSource::new(data))
	}

	#[test]
	fn test_env_key_beats_config_key() {
		let ns = namespace(vec![
			Box::new(EnvSource::from_entries(["APP_PORT=8081"])),
			map(&[("port", Value::Int(3000))]),
		]);
		let registry = ValidatorRegistry::builtin();
		let binder = Binder::new(&ns, &registry);

		let fields = settings_fields();
		let (resolution, key, value) = binder.resolve(fields[0].meta()).unwrap();
		assert_eq!(resolution, Resolution::EnvKey);
		assert_eq!(key, "app_port");
		assert_eq!(value, &Value::Int(8081));
	}

	#[test]
	fn test_resolve_reports_config_key() {
		let ns = namespace(vec![map(&[("app.name", Value::from("Demo"))])]);
		let registry = ValidatorRegistry::builtin();
		let binder = Binder::new(&ns, &registry);

		let fields = settings_fields();
		let (resolution, key, value) = binder.resolve(fields[2].meta()).unwrap();
		assert_eq!(resolution, Resolution::ConfigKey);
		assert_eq!(key, "app.name");
		assert_eq!(value, &Value::from("Demo"));
		assert!(binder.resolve(fields[0].meta()).is_none());
	}

	#[test]
	fn test_null_falls_back_to_default() {
		let ns = namespace(vec![map(&[("port", Value::Null)])]);
		let registry = ValidatorRegistry::builtin();
		let mut settings = Settings::default();

		Binder::new(&ns, &registry)
			.bind(&mut settings, &settings_fields())
			.unwrap();
		assert_eq!(settings.port, 8080);
	}

	#[test]
	fn test_defaults_are_not_validated() {
		let fields = vec![
			Field::new("Port", |s: &mut Settings| &mut s.port)
				.key("port")
				.validate("min:10000")
				.default("80"),
		];
		let ns = Namespace::default();
		let registry = ValidatorRegistry::builtin();
		let mut settings = Settings::default();

		Binder::new(&ns, &registry).bind(&mut settings, &fields).unwrap();
		assert_eq!(settings.port, 80);
	}

	#[test]
	fn test_absent_required_field_is_left_zero() {
		let fields = vec![
			Field::new("Name", |s: &mut Settings| &mut s.name)
				.key("name")
				.validate("required"),
		];
		let ns = Namespace::default();
		let registry = ValidatorRegistry::builtin();
		let mut settings = Settings::default();

		Binder::new(&ns, &registry).bind(&mut settings, &fields).unwrap();
		assert_eq!(settings.name, "");
	}

	#[test]
	fn test_validation_can_be_disabled() {
		let ns = namespace(vec![map(&[("port", Value::Int(5))])]);
		let registry = ValidatorRegistry::builtin();
		let mut settings = Settings::default();

		Binder::new(&ns, &registry)
			.validation(false)
			.bind(&mut settings, &settings_fields())
			.unwrap();
		assert_eq!(settings.port, 5);
	}

	#[test]
	fn test_first_error_stops_without_rollback() {
		let fields = vec![
			Field::new("Name", |s: &mut Settings| &mut s.name).key("name"),
			Field::new("Port", |s: &mut Settings| &mut s.port).key("port"),
			Field::new("Debug", |s: &mut Settings| &mut s.debug).default("true"),
		];
		let ns = namespace(vec![map(&[
			("name", Value::from("svc")),
			("port", Value::from("not-a-number")),
		])]);
		let registry = ValidatorRegistry::builtin();
		let mut settings = Settings::default();

		let err = Binder::new(&ns, &registry)
			.bind(&mut settings, &fields)
			.unwrap_err();
		match err {
			ConfigFlowError::FieldAssignment { field, .. } => assert_eq!(field, "Port"),
			other => panic!("Expected FieldAssignment error, got {other:?}"),
		}
		assert_eq!(settings.name, "svc");
		assert!(!settings.debug);
	}

	#[test]
	fn test_bad_default_is_default_assignment_error() {
		let fields = vec![Field::new("Port", |s: &mut Settings| &mut s.port).default("eighty")];
		let ns = Namespace::default();
		let registry = ValidatorRegistry::builtin();
		let mut settings = Settings::default();

		match Binder::new(&ns, &registry)
			.bind(&mut settings, &fields)
			.unwrap_err()
		{
			ConfigFlowError::DefaultAssignment { field, .. } => assert_eq!(field, "Port"),
			other => panic!("Expected DefaultAssignment error, got {other:?}"),
		}
	}

	#[test]
	fn test_unknown_keys_ignore_env_and_claimed() {
		let ns = namespace(vec![
			map(&[
				("port", Value::Int(1)),
				("app.name", Value::from("x")),
				("extra", Value::Int(2)),
			]),
			Box::new(EnvSource::from_entries(["HOME=/root", "APP_PORT=3"])),
		]);

		assert_eq!(unknown_keys(&ns, &settings_fields()), vec!["extra".to_string()]);
	}
}
