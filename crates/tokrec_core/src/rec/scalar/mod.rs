use std::fmt;

use uuid::Uuid;

use crate::rec::value::Value;
use crate::rec::{CursorError, TokenCursor, TokenKind, TokenSet};

/// Closed set of primitive field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	/// UTF-8 text.
	String,
	/// Boolean.
	Bool,
	/// 8-bit signed integer.
	I8,
	/// 16-bit signed integer.
	I16,
	/// 32-bit signed integer.
	I32,
	/// 64-bit signed integer.
	I64,
	/// Arbitrary-precision integer.
	BigInt,
	/// Single-precision float.
	F32,
	/// Double-precision float.
	F64,
	/// Opaque bytes carried as base64 text.
	Binary,
	/// UUID carried as text.
	Uuid,
}

impl ScalarKind {
	/// Every scalar kind.
	pub const ALL: [ScalarKind; 11] = [
		Self::String,
		Self::Bool,
		Self::I8,
		Self::I16,
		Self::I32,
		Self::I64,
		Self::BigInt,
		Self::F32,
		Self::F64,
		Self::Binary,
		Self::Uuid,
	];

	/// Token kinds this decoder accepts, excluding null.
	pub fn accepts(self) -> TokenSet {
		match self {
			Self::String | Self::Binary | Self::Uuid => TokenSet::STRING,
			Self::Bool => TokenSet::BOOL,
			Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::BigInt => TokenSet::INT,
			Self::F32 | Self::F64 => TokenSet::NUMBER,
		}
	}

	/// Stable lowercase name, as used in schema documents.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Bool => "bool",
			Self::I8 => "i8",
			Self::I16 => "i16",
			Self::I32 => "i32",
			Self::I64 => "i64",
			Self::BigInt => "bigint",
			Self::F32 => "f32",
			Self::F64 => "f64",
			Self::Binary => "binary",
			Self::Uuid => "uuid",
		}
	}

	/// Parse a schema-document name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == name)
	}
}

impl fmt::Display for ScalarKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Why a scalar could not be read; the caller attaches field context.
#[derive(Debug)]
pub(crate) enum ScalarFault {
	/// Token kind outside the accepted set.
	Mismatch { expected: TokenSet, actual: TokenKind },
	/// Token kind accepted, value unusable.
	Invalid(String),
	/// Token source failure.
	Cursor(CursorError),
}

impl From<CursorError> for ScalarFault {
	fn from(err: CursorError) -> Self {
		if err.is_value_fault() {
			return Self::Invalid(err.to_string());
		}
		Self::Cursor(err)
	}
}

/// Decode the current token as `kind`. Null is handled by the caller.
pub(crate) fn decode_scalar<C: TokenCursor + ?Sized>(kind: ScalarKind, cursor: &C) -> Result<Value, ScalarFault> {
	let actual = cursor.current_kind();
	let expected = kind.accepts();
	if !expected.contains(actual) {
		return Err(ScalarFault::Mismatch { expected, actual });
	}

	let value = match kind {
		ScalarKind::String => Value::String(cursor.text()?.into()),
		ScalarKind::Bool => Value::Bool(actual == TokenKind::True),
		ScalarKind::I8 => Value::I8(narrow(cursor.int()?, "i8")?),
		ScalarKind::I16 => Value::I16(narrow(cursor.int()?, "i16")?),
		ScalarKind::I32 => Value::I32(narrow(cursor.int()?, "i32")?),
		ScalarKind::I64 => Value::I64(cursor.int()?),
		ScalarKind::BigInt => Value::BigInt(canonical_integer(cursor.number_text()?)?),
		ScalarKind::F32 => {
			let wide = cursor.float()?;
			let value = wide as f32;
			if wide.is_finite() && value.is_infinite() {
				return Err(ScalarFault::Invalid(format!("{wide} out of range for f32")));
			}
			Value::F32(value)
		}
		ScalarKind::F64 => Value::F64(cursor.float()?),
		ScalarKind::Binary => Value::Binary(cursor.binary()?),
		ScalarKind::Uuid => {
			let text = cursor.text()?;
			let id = Uuid::parse_str(text).map_err(|err| ScalarFault::Invalid(format!("{text:?}: {err}")))?;
			Value::Uuid(id)
		}
	};
	Ok(value)
}

fn narrow<T: TryFrom<i64>>(value: i64, label: &str) -> Result<T, ScalarFault> {
	T::try_from(value).map_err(|_| ScalarFault::Invalid(format!("{value} out of range for {label}")))
}

fn canonical_integer(text: &str) -> Result<Box<str>, ScalarFault> {
	let (negative, digits) = match text.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, text),
	};
	if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
		return Err(ScalarFault::Invalid(format!("{text:?} is not an integer")));
	}

	let trimmed = digits.trim_start_matches('0');
	let out = match (negative, trimmed.is_empty()) {
		(_, true) => "0".to_owned(),
		(true, false) => format!("-{trimmed}"),
		(false, false) => trimmed.to_owned(),
	};
	Ok(out.into_boxed_str())
}

#[cfg(test)]
mod tests;
