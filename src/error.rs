use crate::bind::FieldKind;
use crate::source::FileFormat;
use crate::value::Value;
use std::fmt;
use std::path::PathBuf;

/// Library-level structured errors for configflow.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFlowError {
	#[error("Failed to load from source: {source_name}")]
	SourceLoad {
		source_name: String,
		#[source]
		source: SourceError,
	},

	#[error("Failed to set field {field}")]
	FieldAssignment {
		field: String,
		#[source]
		source: CoerceError,
	},

	#[error("Failed to set default for field {field}")]
	DefaultAssignment {
		field: String,
		#[source]
		source: CoerceError,
	},

	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("Unknown configuration keys: {}", keys.join(", "))]
	UnknownKeys { keys: Vec<String> },
}

impl ConfigFlowError {
	/// The validation failure behind this error, if that is what it is.
	pub fn as_validation(&self) -> Option<&ValidationError> {
		match self {
			ConfigFlowError::Validation(err) => Some(err),
			_ => None,
		}
	}
}

/// Errors raised while a [`Source`](crate::source::Source) produces its map.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("Failed to read config file: {path}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse {format} file: {path}")]
	Parse {
		path: PathBuf,
		format: FileFormat,
		#[source]
		source: ParseError,
	},

	#[error("Unsupported file format: {extension:?} ({path})")]
	UnsupportedFormat { path: PathBuf, extension: String },

	#[error(transparent)]
	Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Decoder failures for the supported file formats.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Yaml(#[from] serde_yaml::Error),

	#[error(transparent)]
	Toml(#[from] toml::de::Error),

	#[error("document root must be a mapping, found {found}")]
	NotATable { found: &'static str },
}

/// Failure to convert a value into a field's declared kind.
#[derive(Debug, thiserror::Error)]
pub enum CoerceError {
	#[error("cannot parse {value:?} as {kind}")]
	Parse { value: String, kind: FieldKind },

	#[error("{value} is out of range for {kind}")]
	OutOfRange { value: String, kind: FieldKind },
}

/// A named rule rejected a field value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("validation failed for field '{field}': {message}")]
pub struct ValidationError {
	pub field: String,
	pub value: Value,
	pub rule: String,
	pub message: String,
}

/// The error a validator function returns; its text becomes
/// [`ValidationError::message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError(pub String);

impl RuleError {
	pub fn new(message: impl Into<String>) -> Self {
		RuleError(message.into())
	}
}

impl fmt::Display for RuleError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl std::error::Error for RuleError {}

impl From<String> for RuleError {
	fn from(message: String) -> Self {
		RuleError(message)
	}
}

impl From<&str> for RuleError {
	fn from(message: &str) -> Self {
		RuleError(message.to_string())
	}
}

/// Result type alias using ConfigFlowError.
pub type Result<T> = std::result::Result<T, ConfigFlowError>;
