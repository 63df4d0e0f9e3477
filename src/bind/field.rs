use crate::bind::coerce::{FieldKind, FieldValue};
use crate::error::CoerceError;
use crate::value::Value;
use std::fmt;

/// Per-field binding metadata: where to look and what to fall back to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
	/// Dotted key in the merged namespace, e.g. `database.url`.
	pub config_key: Option<String>,

	/// Environment variable name, matched case-insensitively.
	pub env_key: Option<String>,

	/// Rule expression such as `required,range:1000,9999`.
	pub validate: Option<String>,

	/// Text loosely parsed and bound when no value resolves.
	pub default: Option<String>,
}

type Assign<T> = Box<dyn Fn(&mut T, &Value) -> Result<(), CoerceError>>;

/// A bindable field of `T`: its name, metadata and typed setter.
pub struct Field<T> {
	name: String,
	kind: FieldKind,
	meta: FieldMeta,
	assign: Assign<T>,
}

fn non_empty(text: impl Into<String>) -> Option<String> {
	Some(text.into()).filter(|t| !t.is_empty())
}

impl<T: 'static> Field<T> {
	/// Declare a field reached through `accessor`.
	///
	/// ```
	/// use configflow::Field;
	///
	/// #[derive(Default)]
	/// struct Server {
	///     port: u16,
	/// }
	///
	/// let field = Field::new("port", |s: &mut Server| &mut s.port)
	///     .key("server.port")
	///     .env("PORT")
	///     .validate("range:1000,9999")
	///     .default("8080");
	/// assert_eq!(field.meta().env_key.as_deref(), Some("PORT"));
	/// ```
	pub fn new<V, F>(name: impl Into<String>, accessor: F) -> Self
	where
		V: FieldValue + 'static,
		F: Fn(&mut T) -> &mut V + 'static,
	{
		Field {
			name: name.into(),
			kind: V::KIND,
			meta: FieldMeta::default(),
			assign: Box::new(move |target: &mut T, value: &Value| {
				*accessor(target) = V::coerce(value)?;
				Ok(())
			}),
		}
	}
}

impl<T> Field<T> {
	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.meta.config_key = non_empty(key);
		self
	}

	pub fn env(mut self, key: impl Into<String>) -> Self {
		self.meta.env_key = non_empty(key);
		self
	}

	pub fn validate(mut self, expression: impl Into<String>) -> Self {
		self.meta.validate = non_empty(expression);
		self
	}

	pub fn default(mut self, text: impl Into<String>) -> Self {
		self.meta.default = non_empty(text);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	pub fn meta(&self) -> &FieldMeta {
		&self.meta
	}

	/// Coerce `value` to the field's type and store it in `target`.
	pub fn assign(&self, target: &mut T, value: &Value) -> Result<(), CoerceError> {
		(self.assign)(target, value)
	}
}

impl<T> fmt::Debug for Field<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("meta", &self.meta)
			.finish_non_exhaustive()
	}
}

/// A record whose fields can be bound from a merged namespace.
///
/// ```
/// use configflow::{Configurable, Field};
///
/// #[derive(Default)]
/// struct AppConfig {
///     port: i64,
///     debug: bool,
/// }
///
/// impl Configurable for AppConfig {
///     fn fields() -> Vec<Field<Self>> {
///         vec![
///             Field::new("Port", |c: &mut Self| &mut c.port).key("port").default("8080"),
///             Field::new("Debug", |c: &mut Self| &mut c.debug).key("debug"),
///         ]
///     }
/// }
/// ```
pub trait Configurable: Sized {
	/// The binding table, in the order fields are processed.
	fn fields() -> Vec<Field<Self>>;
}
