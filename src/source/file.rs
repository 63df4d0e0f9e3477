use crate::error::{ParseError, SourceError};
use crate::flatten::flatten;
use crate::source::{FILE_PRIORITY, Source, SourceKind};
use crate::value::{FlatMap, Table, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// File formats a [`FileSource`] can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
	Json,
	Yaml,
	Toml,
}

impl FileFormat {
	/// Pick a format from a lower-cased file extension.
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext {
			"json" => Some(FileFormat::Json),
			"yaml" | "yml" => Some(FileFormat::Yaml),
			"toml" => Some(FileFormat::Toml),
			_ => None,
		}
	}

	/// Decode `content` into a nested table.
	///
	/// An empty YAML document or a JSON/YAML `null` root decodes to an empty
	/// table; any other non-mapping root is rejected.
	pub fn parse(&self, content: &str) -> Result<Table, ParseError> {
		let doc = match self {
			FileFormat::Json => Value::from(serde_json::from_str::<serde_json::Value>(content)?),
			FileFormat::Yaml => {
				if content.trim().is_empty() {
					return Ok(Table::new());
				}
				Value::from(serde_yaml::from_str::<serde_yaml::Value>(content)?)
			}
			FileFormat::Toml => Value::from(toml::Value::Table(toml::from_str::<toml::Table>(
				content,
			)?)),
		};

		match doc {
			Value::Table(table) => Ok(table),
			Value::Null => Ok(Table::new()),
			other => Err(ParseError::NotATable {
				found: other.kind_name(),
			}),
		}
	}
}

impl fmt::Display for FileFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FileFormat::Json => f.write_str("JSON"),
			FileFormat::Yaml => f.write_str("YAML"),
			FileFormat::Toml => f.write_str("TOML"),
		}
	}
}

/// A JSON, YAML or TOML file on disk.
///
/// A missing file is an empty source, not an error.
#[derive(Debug, Clone)]
pub struct FileSource {
	pub path: PathBuf,
}

impl FileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		FileSource { path: path.into() }
	}

	fn extension(&self) -> String {
		extension_of(&self.path)
	}
}

fn extension_of(path: &Path) -> String {
	path.extension()
		.map(|e| e.to_string_lossy().to_lowercase())
		.unwrap_or_default()
}

impl Source for FileSource {
	fn load(&self) -> Result<FlatMap, SourceError> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %self.path.display(), "config file not found, skipping");
				return Ok(FlatMap::new());
			}
			Err(source) => {
				return Err(SourceError::Read {
					path: self.path.clone(),
					source,
				});
			}
		};

		let extension = self.extension();
		let format =
			FileFormat::from_extension(&extension).ok_or_else(|| SourceError::UnsupportedFormat {
				path: self.path.clone(),
				extension: extension.clone(),
			})?;

		let table = format
			.parse(&content)
			.map_err(|source| SourceError::Parse {
				path: self.path.clone(),
				format,
				source,
			})?;

		Ok(flatten(&table))
	}

	fn priority(&self) -> i32 {
		FILE_PRIORITY
	}

	fn name(&self) -> String {
		format!("file:{}", self.path.display())
	}

	fn kind(&self) -> SourceKind {
		SourceKind::File
	}
}
