use std::sync::Arc;

use uuid::Uuid;

/// Decoded runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Explicit or defaulted null.
	Null,
	/// Boolean.
	Bool(bool),
	/// 8-bit signed integer.
	I8(i8),
	/// 16-bit signed integer.
	I16(i16),
	/// 32-bit signed integer.
	I32(i32),
	/// 64-bit signed integer.
	I64(i64),
	/// Arbitrary-precision integer as canonical decimal text.
	BigInt(Box<str>),
	/// Single-precision float.
	F32(f32),
	/// Double-precision float.
	F64(f64),
	/// UTF-8 text.
	String(Box<str>),
	/// Opaque bytes.
	Binary(Vec<u8>),
	/// UUID.
	Uuid(Uuid),
	/// Homogeneous list.
	List(Vec<Value>),
	/// Nested record.
	Record(Box<Record>),
}

impl Value {
	/// Stable label for the value's variant.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::I8(_) => "i8",
			Self::I16(_) => "i16",
			Self::I32(_) => "i32",
			Self::I64(_) => "i64",
			Self::BigInt(_) => "bigint",
			Self::F32(_) => "f32",
			Self::F64(_) => "f64",
			Self::String(_) => "string",
			Self::Binary(_) => "binary",
			Self::Uuid(_) => "uuid",
			Self::List(_) => "list",
			Self::Record(_) => "record",
		}
	}

	/// Whether this is [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

/// Three-valued container distinguishing absent, null, and present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState<T> {
	/// Field did not appear in the payload.
	#[default]
	Undefined,
	/// Field appeared with an explicit null.
	Null,
	/// Field appeared with a value.
	Value(T),
}

impl<T> TriState<T> {
	/// Whether the field appeared at all.
	pub fn is_defined(&self) -> bool {
		!matches!(self, Self::Undefined)
	}

	/// Borrow the contained value.
	pub fn as_ref(&self) -> TriState<&T> {
		match self {
			Self::Undefined => TriState::Undefined,
			Self::Null => TriState::Null,
			Self::Value(value) => TriState::Value(value),
		}
	}

	/// Map the contained value.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TriState<U> {
		match self {
			Self::Undefined => TriState::Undefined,
			Self::Null => TriState::Null,
			Self::Value(value) => TriState::Value(f(value)),
		}
	}

	/// Collapse absent and null into `None`.
	pub fn value(self) -> Option<T> {
		match self {
			Self::Value(value) => Some(value),
			Self::Undefined | Self::Null => None,
		}
	}
}

/// Finalized content of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
	/// Required or nullable field; absent nullable fields hold [`Value::Null`].
	Value(Value),
	/// Tri-state field.
	Optional(TriState<Value>),
}

impl Slot {
	/// Borrow the value if the slot holds one that is not null.
	pub fn value(&self) -> Option<&Value> {
		match self {
			Self::Value(Value::Null) => None,
			Self::Value(value) => Some(value),
			Self::Optional(TriState::Value(value)) => Some(value),
			Self::Optional(_) => None,
		}
	}
}

/// Decoded struct instance, fields in ordinal order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	/// Schema type name.
	pub type_name: Arc<str>,
	/// Field values in ordinal order.
	pub fields: Vec<FieldValue>,
}

/// One named field value inside a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field name.
	pub name: Arc<str>,
	/// Field content.
	pub slot: Slot,
}

impl Record {
	/// Look up a field slot by name.
	pub fn get(&self, name: &str) -> Option<&Slot> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.slot)
	}

	/// Look up a field's non-null value by name.
	pub fn value(&self, name: &str) -> Option<&Value> {
		self.get(name).and_then(Slot::value)
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the record has no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}
