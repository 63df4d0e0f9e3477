use crate::value::{FlatMap, Table, Value};

/// Flatten a nested table into dot-joined keys.
///
/// Nested tables are walked to their leaves; arrays and scalars are leaves.
/// An empty nested table contributes no keys. Flattening an already flat
/// map returns it unchanged.
pub fn flatten(table: &Table) -> FlatMap {
	flatten_with_prefix(table, "")
}

/// Flatten `table`, prefixing every produced key with `prefix.`.
pub fn flatten_with_prefix(table: &Table, prefix: &str) -> FlatMap {
	let mut result = FlatMap::new();
	flatten_into(&mut result, table, prefix);
	result
}

fn flatten_into(out: &mut FlatMap, table: &Table, prefix: &str) {
	for (k, v) in table {
		let key = if prefix.is_empty() {
			k.clone()
		} else {
			format!("{prefix}.{k}")
		};

		match v {
			Value::Table(nested) => flatten_into(out, nested, &key),
			other => {
				out.insert(key, other.clone());
			}
		}
	}
}

/// Rebuild a nested table from dotted keys.
///
/// When a scalar and a deeper path share a prefix (`a` and `a.b`), the table
/// wins and the scalar is dropped.
pub fn unflatten(flat: &FlatMap) -> Table {
	let mut root = Table::new();

	for (key, value) in flat {
		let mut segments: Vec<&str> = key.split('.').collect();
		let Some(leaf) = segments.pop() else {
			continue;
		};

		let mut node = &mut root;
		for segment in segments {
			let entry = node
				.entry(segment.to_string())
				.or_insert_with(|| Value::Table(Table::new()));
			if !matches!(entry, Value::Table(_)) {
				*entry = Value::Table(Table::new());
			}
			let Value::Table(next) = entry else {
				unreachable!("entry was just replaced by a table");
			};
			node = next;
		}

		match node.get(leaf) {
			Some(Value::Table(_)) if !matches!(value, Value::Table(_)) => {}
			_ => {
				node.insert(leaf.to_string(), value.clone());
			}
		}
	}

	root
}
