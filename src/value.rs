//! Loosely-typed configuration values.
//!
//! Every source decodes into [`Value`]. Nested documents are [`Table`]s; the
//! merged namespace is a [`FlatMap`] whose keys are dot-joined paths.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A nested mapping as produced by a decoder or supplied by a caller.
pub type Table = BTreeMap<String, Value>;

/// A single-level mapping keyed by dotted paths.
pub type FlatMap = BTreeMap<String, Value>;

/// A loosely-typed configuration value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Array(Vec<Value>),
	Table(Table),
}

const TRUE_WORDS: [&str; 3] = ["true", "True", "TRUE"];
const FALSE_WORDS: [&str; 3] = ["false", "False", "FALSE"];

impl Value {
	/// Best-effort typing of untyped text: boolean, then integer, then
	/// float, falling back to the text itself.
	pub fn parse_loose(text: &str) -> Value {
		if TRUE_WORDS.contains(&text) {
			return Value::Bool(true);
		}
		if FALSE_WORDS.contains(&text) {
			return Value::Bool(false);
		}
		if let Ok(i) = text.parse::<i64>() {
			return Value::Int(i);
		}
		if let Ok(f) = text.parse::<f64>() {
			return Value::Float(f);
		}
		Value::String(text.to_string())
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_table(&self) -> Option<&Table> {
		match self {
			Value::Table(t) => Some(t),
			_ => None,
		}
	}

	/// Short name of the variant, used in error messages.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "integer",
			Value::Float(_) => "float",
			Value::String(_) => "string",
			Value::Array(_) => "array",
			Value::Table(_) => "table",
		}
	}
}

/// Canonical stringification. Target-typed coercion and the built-in
/// validators all work on this form.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("<nil>"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Int(i) => write!(f, "{i}"),
			Value::Float(x) => write!(f, "{x}"),
			Value::String(s) => f.write_str(s),
			Value::Array(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(" ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Value::Table(table) => {
				f.write_str("map[")?;
				for (i, (k, v)) in table.iter().enumerate() {
					if i > 0 {
						f.write_str(" ")?;
					}
					write!(f, "{k}:{v}")?;
				}
				f.write_str("]")
			}
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

macro_rules! impl_from_int {
	($($t:ty),*) => {
		$(
			impl From<$t> for Value {
				fn from(i: $t) -> Self {
					Value::Int(i64::from(i))
				}
			}
		)*
	};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
	fn from(x: f32) -> Self {
		Value::Float(f64::from(x))
	}
}

impl From<f64> for Value {
	fn from(x: f64) -> Self {
		Value::Float(x)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl<V: Into<Value>> From<Vec<V>> for Value {
	fn from(items: Vec<V>) -> Self {
		Value::Array(items.into_iter().map(Into::into).collect())
	}
}

impl From<Table> for Value {
	fn from(table: Table) -> Self {
		Value::Table(table)
	}
}

impl From<serde_json::Value> for Value {
	fn from(v: serde_json::Value) -> Self {
		match v {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => n.as_f64().map_or(Value::Null, Value::Float),
			},
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => {
				Value::Array(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(map) => {
				Value::Table(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

impl From<serde_yaml::Value> for Value {
	fn from(v: serde_yaml::Value) -> Self {
		match v {
			serde_yaml::Value::Null => Value::Null,
			serde_yaml::Value::Bool(b) => Value::Bool(b),
			serde_yaml::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => n.as_f64().map_or(Value::Null, Value::Float),
			},
			serde_yaml::Value::String(s) => Value::String(s),
			serde_yaml::Value::Sequence(items) => {
				Value::Array(items.into_iter().map(Value::from).collect())
			}
			serde_yaml::Value::Mapping(map) => Value::Table(
				map.into_iter()
					.filter_map(|(k, v)| yaml_key(&k).map(|k| (k, Value::from(v))))
					.collect(),
			),
			serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
		}
	}
}

/// YAML allows non-string keys; scalars are stringified, collections are dropped.
fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
	match key {
		serde_yaml::Value::String(s) => Some(s.clone()),
		serde_yaml::Value::Number(n) => Some(n.to_string()),
		serde_yaml::Value::Bool(b) => Some(b.to_string()),
		serde_yaml::Value::Null => Some("null".to_string()),
		serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
		serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
	}
}

impl From<toml::Value> for Value {
	fn from(v: toml::Value) -> Self {
		match v {
			toml::Value::String(s) => Value::String(s),
			toml::Value::Integer(i) => Value::Int(i),
			toml::Value::Float(x) => Value::Float(x),
			toml::Value::Boolean(b) => Value::Bool(b),
			toml::Value::Datetime(dt) => Value::String(dt.to_string()),
			toml::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
			toml::Value::Table(table) => {
				Value::Table(table.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_loose_order() {
		assert_eq!(Value::parse_loose("true"), Value::Bool(true));
		assert_eq!(Value::parse_loose("FALSE"), Value::Bool(false));
		assert_eq!(Value::parse_loose("42"), Value::Int(42));
		assert_eq!(Value::parse_loose("-7"), Value::Int(-7));
		assert_eq!(Value::parse_loose("3.14"), Value::Float(3.14));
		assert_eq!(Value::parse_loose("hello"), Value::String("hello".to_string()));
	}

	#[test]
	fn test_parse_loose_keeps_digits_as_integers() {
		// Only true/false spellings guess as booleans. "1", "0", "t" and "f"
		// are not, so "1" stays numeric for integer fields and "t" binds to a
		// string field as "t" rather than "true".
		assert_eq!(Value::parse_loose("1"), Value::Int(1));
		assert_eq!(Value::parse_loose("0"), Value::Int(0));
		assert_eq!(Value::parse_loose("t"), Value::String("t".to_string()));
		assert_eq!(Value::parse_loose("F"), Value::String("F".to_string()));
		assert_eq!(Value::parse_loose(""), Value::String(String::new()));
	}

	#[test]
	fn test_display_canonical_forms() {
		assert_eq!(Value::Null.to_string(), "<nil>");
		assert_eq!(Value::Bool(true).to_string(), "true");
		assert_eq!(Value::Int(3000).to_string(), "3000");
		assert_eq!(Value::Float(3.14).to_string(), "3.14");
		assert_eq!(Value::Float(8080.0).to_string(), "8080");
		assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a b]");

		let mut table = Table::new();
		table.insert("k".to_string(), Value::Int(1));
		assert_eq!(Value::Table(table).to_string(), "map[k:1]");
	}

	#[test]
	fn test_from_json() {
		let json: serde_json::Value =
			serde_json::from_str(r#"{"port": 8080, "rate": 0.5, "tags": ["a"], "db": {"url": null}}"#)
				.unwrap();
		let value = Value::from(json);
		let table = value.as_table().unwrap();

		assert_eq!(table["port"], Value::Int(8080));
		assert_eq!(table["rate"], Value::Float(0.5));
		assert_eq!(table["tags"], Value::Array(vec![Value::from("a")]));
		assert_eq!(table["db"].as_table().unwrap()["url"], Value::Null);
	}

	#[test]
	fn test_from_yaml_stringifies_scalar_keys() {
		let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\nname: app\n").unwrap();
		let value = Value::from(yaml);
		let table = value.as_table().unwrap();

		assert_eq!(table["1"], Value::from("one"));
		assert_eq!(table["true"], Value::from("yes"));
		assert_eq!(table["name"], Value::from("app"));
	}

	#[test]
	fn test_from_toml() {
		let doc: toml::Table = toml::from_str("port = 1\n[server]\nhost = \"h\"\n").unwrap();
		let value = Value::from(toml::Value::Table(doc));
		let table = value.as_table().unwrap();

		assert_eq!(table["port"], Value::Int(1));
		assert_eq!(table["server"].as_table().unwrap()["host"], Value::from("h"));
	}
}
