use crate::error::{ConfigFlowError, Result};
use crate::source::{Source, SourceKind};
use crate::value::{FlatMap, Value};
use std::collections::BTreeMap;

/// How registered sources are folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeOrder {
	/// Fold in registration order; the last source to define a key wins.
	#[default]
	Registration,

	/// Stable-sort by [`Source::priority`] ascending before folding, so
	/// higher-priority sources win regardless of registration order.
	Priority,
}

/// Where a merged key's winning value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
	pub name: String,
	pub kind: SourceKind,
}

/// The merged flat namespace for one load, with per-key provenance.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
	pub values: FlatMap,
	pub origins: BTreeMap<String, Origin>,
}

impl Namespace {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	pub fn origin(&self, key: &str) -> Option<&Origin> {
		self.origins.get(key)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Overwrite every key in `map`, recording `origin` as its source.
	fn fold(&mut self, map: FlatMap, origin: &Origin) {
		for (key, value) in map {
			if self.values.contains_key(&key) {
				tracing::trace!(key = %key, source = %origin.name, "overriding key");
			}
			self.origins.insert(key.clone(), origin.clone());
			self.values.insert(key, value);
		}
	}
}

/// Load every source and fold the results into one namespace.
///
/// The first source that fails aborts the merge; no partial namespace is
/// returned.
pub fn merge_sources(sources: &[Box<dyn Source>], order: MergeOrder) -> Result<Namespace> {
	let mut ordered: Vec<&dyn Source> = sources.iter().map(|source| source.as_ref()).collect();
	if order == MergeOrder::Priority {
		ordered.sort_by_key(|source| source.priority());
	}

	let mut namespace = Namespace::default();

	for source in ordered {
		let name = source.name();
		let map = source
			.load()
			.map_err(|err| ConfigFlowError::SourceLoad {
				source_name: name.clone(),
				source: err,
			})?;

		tracing::debug!(
			source = %name,
			kind = %source.kind(),
			priority = source.priority(),
			keys = map.len(),
			"loaded configuration source"
		);

		let origin = Origin {
			name,
			kind: source.kind(),
		};
		namespace.fold(map, &origin);
	}

	Ok(namespace)
}
