//! Configuration sources.
//!
//! This module handles:
//! - The [`Source`] trait every origin of values implements
//! - In-memory maps, the process environment and JSON/YAML/TOML files

pub mod env;
pub mod file;
pub mod map;

pub use env::EnvSource;
pub use file::{FileFormat, FileSource};
pub use map::MapSource;

use crate::error::SourceError;
use crate::value::FlatMap;
use std::fmt;

/// Declared priority of a [`MapSource`]; the lowest, used for defaults.
pub const MAP_PRIORITY: i32 = 0;
/// Declared priority of a [`FileSource`].
pub const FILE_PRIORITY: i32 = 1;
/// Declared priority of an [`EnvSource`]; the highest.
pub const ENV_PRIORITY: i32 = 2;

/// Which family a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
	Map,
	File,
	Env,
	Custom,
}

impl SourceKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			SourceKind::Map => "map",
			SourceKind::File => "file",
			SourceKind::Env => "env",
			SourceKind::Custom => "custom",
		}
	}
}

impl fmt::Display for SourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An origin of configuration values.
///
/// Implement this trait to plug other stores into a
/// [`Loader`](crate::Loader).
pub trait Source: Send + Sync {
	/// Produce this source's values as a flat map with dotted keys.
	fn load(&self) -> Result<FlatMap, SourceError>;

	/// Declared precedence; higher wins when the loader orders by priority.
	fn priority(&self) -> i32;

	/// Human-readable name for logging and provenance display.
	fn name(&self) -> String;

	fn kind(&self) -> SourceKind {
		SourceKind::Custom
	}
}

impl fmt::Debug for dyn Source {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Source")
			.field("name", &self.name())
			.field("kind", &self.kind())
			.field("priority", &self.priority())
			.finish()
	}
}
