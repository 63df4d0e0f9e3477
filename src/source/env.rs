use crate::error::SourceError;
use crate::source::{ENV_PRIORITY, Source, SourceKind};
use crate::value::{FlatMap, Value};

/// Environment variables as a source.
///
/// Keys are lower-cased and values are loosely typed (bool, int, float,
/// string). By default the process environment is read at load time; a
/// fixed list of `KEY=value` entries can be supplied instead.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
	entries: Option<Vec<String>>,
}

impl EnvSource {
	/// Read the process environment each time the source is loaded.
	pub fn new() -> Self {
		EnvSource { entries: None }
	}

	/// Use a fixed set of `KEY=value` entries instead of the process environment.
	pub fn from_entries<I, S>(entries: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		EnvSource {
			entries: Some(entries.into_iter().map(Into::into).collect()),
		}
	}
}

/// Fold `KEY=value` pairs into a flat map. Entries without `=` are skipped.
pub fn parse_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> FlatMap {
	let mut result = FlatMap::new();

	for entry in entries {
		if let Some((key, value)) = entry.split_once('=') {
			result.insert(key.to_lowercase(), Value::parse_loose(value));
		}
	}

	result
}

impl Source for EnvSource {
	fn load(&self) -> Result<FlatMap, SourceError> {
		let map = match &self.entries {
			Some(entries) => parse_entries(entries.iter().map(String::as_str)),
			None => {
				let mut result = FlatMap::new();
				// Non-UTF-8 entries cannot be represented as keys or values
				for (key, value) in std::env::vars_os() {
					if let (Some(key), Some(value)) = (key.to_str(), value.to_str()) {
						result.insert(key.to_lowercase(), Value::parse_loose(value));
					}
				}
				result
			}
		};

		Ok(map)
	}

	fn priority(&self) -> i32 {
		ENV_PRIORITY
	}

	fn name(&self) -> String {
		"env".to_string()
	}

	fn kind(&self) -> SourceKind {
		SourceKind::Env
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_entries_are_lowercased_and_typed() {
		let source = EnvSource::from_entries([
			"APP_PORT=8080",
			"DEBUG=true",
			"RATE=0.25",
			"NAME=service",
		]);
		let flat = source.load().unwrap();

		assert_eq!(flat["app_port"], Value::Int(8080));
		assert_eq!(flat["debug"], Value::Bool(true));
		assert_eq!(flat["rate"], Value::Float(0.25));
		assert_eq!(flat["name"], Value::from("service"));
	}

	#[test]
	fn test_only_first_equals_splits() {
		let flat = parse_entries(["DSN=host=db user=app", "BROKEN", "EMPTY="]);
		assert_eq!(flat["dsn"], Value::from("host=db user=app"));
		assert_eq!(flat["empty"], Value::from(""));
		assert!(!flat.contains_key("broken"));
	}

	#[test]
	fn test_process_environment_snapshot() {
		// SAFETY: The variable name is unique to this test
		unsafe {
			std::env::set_var("CONFIGFLOW_ENV_SOURCE_TEST", "42");
		}

		let flat = EnvSource::new().load().unwrap();
		assert_eq!(flat["configflow_env_source_test"], Value::Int(42));

		// SAFETY: See above
		unsafe {
			std::env::remove_var("CONFIGFLOW_ENV_SOURCE_TEST");
		}
	}

	#[test]
	fn test_env_priority_is_highest() {
		assert_eq!(EnvSource::new().priority(), 2);
	}
}
