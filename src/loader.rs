use crate::bind::{Binder, Configurable, Field, unknown_keys};
use crate::error::{ConfigFlowError, Result, RuleError};
use crate::merge::{MergeOrder, Namespace, merge_sources};
use crate::source::{EnvSource, FileSource, MapSource, Source};
use crate::validate::ValidatorRegistry;
use crate::value::{Table, Value};
use std::path::PathBuf;

/// Loads configuration from registered sources into typed records.
///
/// Sources and validators persist across calls to [`Loader::load`]; every
/// load re-reads all sources and builds a fresh namespace.
#[derive(Debug)]
pub struct Loader {
	sources: Vec<Box<dyn Source>>,
	validators: ValidatorRegistry,
	strict: bool,
	validation: bool,
	order: MergeOrder,
}

impl Default for Loader {
	fn default() -> Self {
		Self::new()
	}
}

impl Loader {
	/// A loader with no sources and the built-in validators.
	pub fn new() -> Self {
		Loader {
			sources: Vec::new(),
			validators: ValidatorRegistry::builtin(),
			strict: false,
			validation: true,
			order: MergeOrder::Registration,
		}
	}

	/// Add an in-memory map, typically defaults.
	pub fn add_map(self, data: Table) -> Self {
		self.add_source(MapSource::new(data))
	}

	/// Add a JSON, YAML or TOML file. A missing file contributes nothing.
	pub fn add_file(self, path: impl Into<PathBuf>) -> Self {
		self.add_source(FileSource::new(path))
	}

	/// Add the process environment, read at load time.
	pub fn add_env(self) -> Self {
		self.add_source(EnvSource::new())
	}

	/// Add a fixed list of `KEY=value` entries as an environment source.
	pub fn add_env_entries<I, S>(self, entries: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.add_source(EnvSource::from_entries(entries))
	}

	/// Add any [`Source`] implementation.
	pub fn add_source(mut self, source: impl Source + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Register a rule under `name`, replacing any rule already there.
	pub fn add_validator<F>(mut self, name: impl Into<String>, rule: F) -> Self
	where
		F: Fn(&Value, &str) -> std::result::Result<(), RuleError> + Send + Sync + 'static,
	{
		self.validators.register(name, rule);
		self
	}

	/// Fail when a non-environment key matches no declared field.
	pub fn strict(mut self) -> Self {
		self.strict = true;
		self
	}

	pub fn enable_validation(mut self) -> Self {
		self.validation = true;
		self
	}

	/// Ignore validate expressions entirely.
	pub fn disable_validation(mut self) -> Self {
		self.validation = false;
		self
	}

	/// Merge by declared priority (env over file over map) instead of
	/// registration order.
	pub fn order_by_priority(mut self) -> Self {
		self.order = MergeOrder::Priority;
		self
	}

	pub fn sources(&self) -> &[Box<dyn Source>] {
		&self.sources
	}

	pub fn validators(&self) -> &ValidatorRegistry {
		&self.validators
	}

	/// Load every source and merge them into one namespace.
	pub fn namespace(&self) -> Result<Namespace> {
		merge_sources(&self.sources, self.order)
	}

	/// Load configuration into `target` using its declared fields.
	pub fn load<T: Configurable>(&self, target: &mut T) -> Result<()> {
		let fields = T::fields();
		self.load_fields(target, &fields)
	}

	/// Load configuration into a fresh `T::default()`.
	pub fn load_new<T: Configurable + Default>(&self) -> Result<T> {
		let mut target = T::default();
		self.load(&mut target)?;
		Ok(target)
	}

	/// Load configuration into `target` using an explicit binding table.
	pub fn load_fields<T>(&self, target: &mut T, fields: &[Field<T>]) -> Result<()> {
		let namespace = self.namespace()?;

		if self.strict {
			let keys = unknown_keys(&namespace, fields);
			if !keys.is_empty() {
				return Err(ConfigFlowError::UnknownKeys { keys });
			}
		}

		Binder::new(&namespace, &self.validators)
			.validation(self.validation)
			.bind(target, fields)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Default)]
	struct Server {
		host: String,
		port: u16,
	}

	impl Configurable for Server {
		fn fields() -> Vec<Field<Self>> {
			vec![
				Field::new("Host", |s: &mut Self| &mut s.host)
					.key("server.host")
					.default("localhost"),
				Field::new("Port", |s: &mut Self| &mut s.port)
					.key("server.port")
					.env("SERVER_PORT")
					.default("8080"),
			]
		}
	}

	fn table(entries: &[(&str, Value)]) -> Table {
		entries
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	#[test]
	fn test_new_loader_defaults() {
		let loader = Loader::new();
		assert!(loader.sources().is_empty());
		assert!(loader.validators().contains("required"));
		assert!(!loader.strict);
		assert!(loader.validation);
		assert_eq!(loader.order, MergeOrder::Registration);
	}

	#[test]
	fn test_load_new_uses_defaults() {
		let server: Server = Loader::new().load_new().unwrap();
		assert_eq!(server.host, "localhost");
		assert_eq!(server.port, 8080);
	}

	#[test]
	fn test_order_by_priority() {
		let loader = Loader::new()
			.add_env_entries(["SERVER_PORT=9000", "SERVER.PORT=9001"])
			.add_map(table(&[("server.port", Value::Int(1))]));

		let ns = loader.namespace().unwrap();
		assert_eq!(ns.get("server.port"), Some(&Value::Int(1)));

		let ns = loader.order_by_priority().namespace().unwrap();
		assert_eq!(ns.get("server.port"), Some(&Value::Int(9001)));
	}

	#[test]
	fn test_strict_rejects_unknown_keys() {
		let loader = Loader::new()
			.add_map(table(&[
				("server.port", Value::Int(1)),
				("server.hots", Value::from("typo")),
			]))
			.strict();

		let mut server = Server::default();
		match loader.load(&mut server).unwrap_err() {
			ConfigFlowError::UnknownKeys { keys } => assert_eq!(keys, vec!["server.hots"]),
			other => panic!("Expected UnknownKeys error, got {other:?}"),
		}
		assert_eq!(server.port, 0);
	}

	#[test]
	fn test_strict_ignores_environment() {
		let loader = Loader::new()
			.add_env_entries(["PATH=/usr/bin", "SERVER_PORT=9000"])
			.strict();

		let server: Server = loader.load_new().unwrap();
		assert_eq!(server.port, 9000);
	}

	#[test]
	fn test_validators_are_per_loader() {
		let custom = Loader::new().add_validator("even", |v: &Value, _: &str| {
			if v.to_string().parse::<i64>().is_ok_and(|n| n % 2 == 0) {
				Ok(())
			} else {
				Err("must be even".into())
			}
		});
		let plain = Loader::new();

		assert!(custom.validators().contains("even"));
		assert!(!plain.validators().contains("even"));
	}
}
