use std::sync::Arc;

use uuid::Uuid;

use crate::rec::{DecodeError, DecodeOptions, FieldValue, Record, Result, SchemaId, SchemaSet, Slot, TokenCursor, TriState, Value, decode_record};

/// Rust type built positionally from a decoded [`Record`].
///
/// Implementations usually keep their [`SchemaSet`] in a `static OnceLock` and read fields in
/// ordinal order through a [`RecordReader`].
pub trait FromRecord: Sized {
	/// Schema set describing this type, and this type's id inside it.
	fn schema() -> (&'static SchemaSet, SchemaId);

	/// Build the value from a record of this type.
	fn from_record(record: Record) -> Result<Self>;
}

/// Field location passed to [`FromValue`] for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct FieldAt<'a> {
	/// Owning type.
	pub type_name: &'a Arc<str>,
	/// Field being converted.
	pub field: &'a Arc<str>,
}

impl FieldAt<'_> {
	/// Conversion error for `value` where `expected` was wanted.
	pub fn mismatch(&self, expected: &'static str, value: &Value) -> DecodeError {
		DecodeError::Conversion {
			type_name: self.type_name.clone(),
			field: self.field.clone(),
			expected,
			got: value.kind_name(),
		}
	}
}

/// Rust type built from one decoded [`Value`].
pub trait FromValue: Sized {
	/// Convert `value`, reporting failures against `at`.
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self>;
}

/// Positional reader over a record's fields.
#[derive(Debug)]
pub struct RecordReader {
	type_name: Arc<str>,
	fields: std::vec::IntoIter<FieldValue>,
	read: usize,
}

impl RecordReader {
	/// Start reading at ordinal 0.
	pub fn new(record: Record) -> Self {
		Self {
			type_name: record.type_name,
			fields: record.fields.into_iter(),
			read: 0,
		}
	}

	/// Type name of the record being read.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Number of fields not read yet.
	pub fn remaining(&self) -> usize {
		self.fields.len()
	}

	/// Convert the next field. Tri-state slots collapse absence into null.
	pub fn next<T: FromValue>(&mut self) -> Result<T> {
		let field = self.take()?;
		let at = FieldAt {
			type_name: &self.type_name,
			field: &field.name,
		};
		match field.slot {
			Slot::Value(value) => T::from_value(value, at),
			Slot::Optional(state) => T::from_value(state.value().unwrap_or(Value::Null), at),
		}
	}

	/// Convert the next field keeping absence and null apart.
	pub fn next_tri<T: FromValue>(&mut self) -> Result<TriState<T>> {
		let field = self.take()?;
		let at = FieldAt {
			type_name: &self.type_name,
			field: &field.name,
		};
		match field.slot {
			Slot::Optional(TriState::Undefined) => Ok(TriState::Undefined),
			Slot::Optional(TriState::Null) | Slot::Value(Value::Null) => Ok(TriState::Null),
			Slot::Optional(TriState::Value(value)) | Slot::Value(value) => T::from_value(value, at).map(TriState::Value),
		}
	}

	fn take(&mut self) -> Result<FieldValue> {
		let field = self.fields.next().ok_or_else(|| DecodeError::Conversion {
			type_name: self.type_name.clone(),
			field: Arc::from(format!("#{}", self.read)),
			expected: "field",
			got: "end of record",
		})?;
		self.read += 1;
		Ok(field)
	}
}

/// Decode a `T` from the cursor's current token with default options.
pub fn decode<T: FromRecord, C: TokenCursor + ?Sized>(cursor: &mut C) -> Result<Option<T>> {
	decode_with(cursor, &DecodeOptions::default())
}

/// Decode a `T` from the cursor's current token.
pub fn decode_with<T: FromRecord, C: TokenCursor + ?Sized>(cursor: &mut C, opt: &DecodeOptions) -> Result<Option<T>> {
	let (set, id) = T::schema();
	match decode_record(set, id, cursor, opt)? {
		Some(record) => T::from_record(record).map(Some),
		None => Ok(None),
	}
}

macro_rules! from_int {
	($ty:ty, $label:literal, $($variant:ident),+) => {
		impl FromValue for $ty {
			fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
				match value {
					$(Value::$variant(inner) => Ok(<$ty>::from(inner)),)+
					other => Err(at.mismatch($label, &other)),
				}
			}
		}
	};
}

from_int!(i8, "i8", I8);
from_int!(i16, "i16", I8, I16);
from_int!(i32, "i32", I8, I16, I32);
from_int!(i64, "i64", I8, I16, I32, I64);

impl FromValue for i128 {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::BigInt(text) => match text.parse() {
				Ok(inner) => Ok(inner),
				Err(_) => Err(at.mismatch("i128", &Value::BigInt(text))),
			},
			Value::I8(inner) => Ok(inner.into()),
			Value::I16(inner) => Ok(inner.into()),
			Value::I32(inner) => Ok(inner.into()),
			Value::I64(inner) => Ok(inner.into()),
			other => Err(at.mismatch("i128", &other)),
		}
	}
}

impl FromValue for bool {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::Bool(inner) => Ok(inner),
			other => Err(at.mismatch("bool", &other)),
		}
	}
}

impl FromValue for f32 {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::F32(inner) => Ok(inner),
			other => Err(at.mismatch("f32", &other)),
		}
	}
}

impl FromValue for f64 {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::F64(inner) => Ok(inner),
			Value::F32(inner) => Ok(inner.into()),
			other => Err(at.mismatch("f64", &other)),
		}
	}
}

impl FromValue for String {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::String(inner) => Ok(inner.into()),
			Value::BigInt(inner) => Ok(inner.into()),
			other => Err(at.mismatch("string", &other)),
		}
	}
}

impl FromValue for Box<[u8]> {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::Binary(inner) => Ok(inner.into_boxed_slice()),
			other => Err(at.mismatch("binary", &other)),
		}
	}
}

impl FromValue for Uuid {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::Uuid(inner) => Ok(inner),
			other => Err(at.mismatch("uuid", &other)),
		}
	}
}

impl FromValue for Value {
	fn from_value(value: Value, _at: FieldAt<'_>) -> Result<Self> {
		Ok(value)
	}
}

impl<T: FromValue> FromValue for Option<T> {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::Null => Ok(None),
			other => T::from_value(other, at).map(Some),
		}
	}
}

impl<T: FromValue> FromValue for Vec<T> {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::List(items) => items.into_iter().map(|item| T::from_value(item, at)).collect(),
			other => Err(at.mismatch("list", &other)),
		}
	}
}

impl<T: FromRecord> FromValue for Box<T> {
	fn from_value(value: Value, at: FieldAt<'_>) -> Result<Self> {
		match value {
			Value::Record(record) => T::from_record(*record).map(Box::new),
			other => Err(at.mismatch("record", &other)),
		}
	}
}
