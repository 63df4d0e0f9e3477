use crate::error::CoerceError;
use crate::value::Value;
use std::fmt;

/// The declared type of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	String,
	Bool,
	I8,
	I16,
	I32,
	I64,
	Isize,
	U8,
	U16,
	U32,
	U64,
	Usize,
	F32,
	F64,
}

impl FieldKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			FieldKind::String => "string",
			FieldKind::Bool => "bool",
			FieldKind::I8 => "i8",
			FieldKind::I16 => "i16",
			FieldKind::I32 => "i32",
			FieldKind::I64 => "i64",
			FieldKind::Isize => "isize",
			FieldKind::U8 => "u8",
			FieldKind::U16 => "u16",
			FieldKind::U32 => "u32",
			FieldKind::U64 => "u64",
			FieldKind::Usize => "usize",
			FieldKind::F32 => "f32",
			FieldKind::F64 => "f64",
		}
	}
}

impl fmt::Display for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A Rust type a configuration value can be bound to.
///
/// Conversion goes through the value's canonical string form, so `"8080"`
/// and `8080` both bind to an integer field and `123` binds to a string
/// field as `"123"`.
pub trait FieldValue: Sized {
	const KIND: FieldKind;

	fn coerce(value: &Value) -> Result<Self, CoerceError>;
}

impl FieldValue for String {
	const KIND: FieldKind = FieldKind::String;

	fn coerce(value: &Value) -> Result<Self, CoerceError> {
		Ok(value.to_string())
	}
}

/// Boolean spellings accepted when binding to a `bool` field.
pub fn parse_bool(text: &str) -> Option<bool> {
	match text {
		"1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
		"0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
		_ => None,
	}
}

impl FieldValue for bool {
	const KIND: FieldKind = FieldKind::Bool;

	fn coerce(value: &Value) -> Result<Self, CoerceError> {
		let text = value.to_string();
		parse_bool(&text).ok_or(CoerceError::Parse {
			value: text,
			kind: Self::KIND,
		})
	}
}

macro_rules! impl_field_value_int {
	($wide:ty => $($t:ty : $kind:ident),*) => {
		$(
			impl FieldValue for $t {
				const KIND: FieldKind = FieldKind::$kind;

				fn coerce(value: &Value) -> Result<Self, CoerceError> {
					let text = value.to_string();
					let wide = text.parse::<$wide>().map_err(|_| CoerceError::Parse {
						value: text.clone(),
						kind: Self::KIND,
					})?;
					<$t>::try_from(wide).map_err(|_| CoerceError::OutOfRange {
						value: text,
						kind: Self::KIND,
					})
				}
			}
		)*
	};
}

impl_field_value_int!(i64 => i8: I8, i16: I16, i32: I32, i64: I64, isize: Isize);
impl_field_value_int!(u64 => u8: U8, u16: U16, u32: U32, u64: U64, usize: Usize);

impl FieldValue for f64 {
	const KIND: FieldKind = FieldKind::F64;

	fn coerce(value: &Value) -> Result<Self, CoerceError> {
		let text = value.to_string();
		text.parse::<f64>().map_err(|_| CoerceError::Parse {
			value: text,
			kind: Self::KIND,
		})
	}
}

impl FieldValue for f32 {
	const KIND: FieldKind = FieldKind::F32;

	fn coerce(value: &Value) -> Result<Self, CoerceError> {
		let wide = f64::coerce(value).map_err(|_| CoerceError::Parse {
			value: value.to_string(),
			kind: Self::KIND,
		})?;
		let narrow = wide as f32;
		if wide.is_finite() && narrow.is_infinite() {
			return Err(CoerceError::OutOfRange {
				value: value.to_string(),
				kind: Self::KIND,
			});
		}
		Ok(narrow)
	}
}

/// Optional fields stay `None` until a value or default is bound.
impl<V: FieldValue> FieldValue for Option<V> {
	const KIND: FieldKind = V::KIND;

	fn coerce(value: &Value) -> Result<Self, CoerceError> {
		V::coerce(value).map(Some)
	}
}
