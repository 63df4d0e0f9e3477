use crate::error::SourceError;
use crate::flatten::flatten;
use crate::source::{MAP_PRIORITY, Source, SourceKind};
use crate::value::{FlatMap, Table};

/// Values supplied in memory, typically defaults or test fixtures.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
	pub data: Table,
}

impl MapSource {
	pub fn new(data: Table) -> Self {
		MapSource { data }
	}
}

impl Source for MapSource {
	fn load(&self) -> Result<FlatMap, SourceError> {
		Ok(flatten(&self.data))
	}

	fn priority(&self) -> i32 {
		MAP_PRIORITY
	}

	fn name(&self) -> String {
		"map".to_string()
	}

	fn kind(&self) -> SourceKind {
		SourceKind::Map
	}
}
