use std::sync::Arc;

use thiserror::Error;

use crate::rec::{Position, ScalarKind, TokenKind, TokenSet};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Coarse classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Current token is not accepted where it appeared.
	TokenMismatch,
	/// Explicit null for a field that is neither nullable nor tri-state.
	NullViolation,
	/// Required fields were absent at object end.
	MissingFields,
	/// Token kind was accepted but its value does not fit the field.
	InvalidScalar,
	/// Unknown member while unknown fields are denied.
	UnknownField,
	/// Nesting depth or list length limit hit.
	LimitExceeded,
	/// Record-to-type conversion failed.
	Conversion,
	/// Schema id does not belong to the set being decoded with.
	UnknownSchema,
	/// Token source failed or was cancelled.
	Cursor,
}

impl ErrorKind {
	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::TokenMismatch => "token_mismatch",
			Self::NullViolation => "null_violation",
			Self::MissingFields => "missing_fields",
			Self::InvalidScalar => "invalid_scalar",
			Self::UnknownField => "unknown_field",
			Self::LimitExceeded => "limit_exceeded",
			Self::Conversion => "conversion",
			Self::UnknownSchema => "unknown_schema",
			Self::Cursor => "cursor",
		}
	}
}

/// Errors produced while decoding a record from a token cursor.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// Current token kind is not in the accepted set.
	#[error("{}: expected {expected}, got {actual}{}", object_path(.type_name, .field), at(.position))]
	TokenMismatch {
		/// Type being decoded.
		type_name: Arc<str>,
		/// Field being decoded, `None` for the object itself.
		field: Option<Arc<str>>,
		/// Accepted token kinds.
		expected: TokenSet,
		/// Actual token kind.
		actual: TokenKind,
		/// Cursor position, when known.
		position: Option<Position>,
	},
	/// Null appeared for a required field.
	#[error("{}: null is not allowed for a required field{}", field_path(.type_name, .field), at(.position))]
	NullViolation {
		/// Type being decoded.
		type_name: Arc<str>,
		/// Offending field.
		field: Arc<str>,
		/// Cursor position, when known.
		position: Option<Position>,
	},
	/// Object ended before every required field was seen.
	#[error("{type_name}: missing required fields: {}", join_names(.fields))]
	MissingFields {
		/// Type being decoded.
		type_name: Arc<str>,
		/// Every missing field, in ordinal order.
		fields: Vec<Arc<str>>,
		/// Position of the closing `}`, when known.
		position: Option<Position>,
	},
	/// Accepted token carried a value the field cannot hold.
	#[error("{}: invalid {scalar}: {reason}{}", field_path(.type_name, .field), at(.position))]
	InvalidScalar {
		/// Type being decoded.
		type_name: Arc<str>,
		/// Offending field.
		field: Arc<str>,
		/// Scalar kind being decoded.
		scalar: ScalarKind,
		/// Human-readable failure reason.
		reason: String,
		/// Cursor position, when known.
		position: Option<Position>,
	},
	/// Member name not present in the schema while unknown fields are denied.
	#[error("{type_name}: unknown field {field:?}{}", at(.position))]
	UnknownField {
		/// Type being decoded.
		type_name: Arc<str>,
		/// Unknown member name.
		field: Box<str>,
		/// Cursor position, when known.
		position: Option<Position>,
	},
	/// Nested objects or lists exceeded the configured depth.
	#[error("decode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// List field exceeded the configured element count.
	#[error("{}: list too long (max={max})", field_path(.type_name, .field))]
	ListTooLong {
		/// Type being decoded.
		type_name: Arc<str>,
		/// Offending field.
		field: Arc<str>,
		/// Maximum permitted element count.
		max: usize,
	},
	/// Decoded slot could not be converted into the requested Rust type.
	#[error("{}: cannot convert {got} into {expected}", field_path(.type_name, .field))]
	Conversion {
		/// Type being converted.
		type_name: Arc<str>,
		/// Offending field.
		field: Arc<str>,
		/// Requested Rust-side shape.
		expected: &'static str,
		/// Decoded value kind.
		got: &'static str,
	},
	/// Schema id is not part of the set.
	#[error("schema #{index} is not part of this schema set")]
	UnknownSchema {
		/// Offending schema index.
		index: usize,
	},
	/// Token source failed.
	#[error("cursor: {0}")]
	Cursor(#[from] CursorError),
}

impl DecodeError {
	/// Classify this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::TokenMismatch { .. } => ErrorKind::TokenMismatch,
			Self::NullViolation { .. } => ErrorKind::NullViolation,
			Self::MissingFields { .. } => ErrorKind::MissingFields,
			Self::InvalidScalar { .. } => ErrorKind::InvalidScalar,
			Self::UnknownField { .. } => ErrorKind::UnknownField,
			Self::DepthExceeded { .. } | Self::ListTooLong { .. } => ErrorKind::LimitExceeded,
			Self::Conversion { .. } => ErrorKind::Conversion,
			Self::UnknownSchema { .. } => ErrorKind::UnknownSchema,
			Self::Cursor(_) => ErrorKind::Cursor,
		}
	}

	/// Field names this error is about, if any.
	pub fn field_names(&self) -> Vec<&str> {
		match self {
			Self::TokenMismatch { field, .. } => field.as_deref().into_iter().collect(),
			Self::NullViolation { field, .. }
			| Self::InvalidScalar { field, .. }
			| Self::ListTooLong { field, .. }
			| Self::Conversion { field, .. } => vec![field.as_ref()],
			Self::UnknownField { field, .. } => vec![field.as_ref()],
			Self::MissingFields { fields, .. } => fields.iter().map(|item| item.as_ref()).collect(),
			Self::DepthExceeded { .. } | Self::UnknownSchema { .. } | Self::Cursor(_) => Vec::new(),
		}
	}

	/// Cursor position recorded with this error, if any.
	pub fn position(&self) -> Option<Position> {
		match self {
			Self::TokenMismatch { position, .. }
			| Self::NullViolation { position, .. }
			| Self::InvalidScalar { position, .. }
			| Self::UnknownField { position, .. }
			| Self::MissingFields { position, .. } => *position,
			_ => None,
		}
	}
}

/// Errors raised by token sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
	/// Input ended in the middle of a value.
	#[error("unexpected eof at offset {at}")]
	UnexpectedEof {
		/// Byte offset where more input was needed.
		at: usize,
	},
	/// Input byte does not fit the grammar at this point.
	#[error("unexpected byte {byte:#04x} at offset {at}, expected {expected}")]
	UnexpectedByte {
		/// Offending byte.
		byte: u8,
		/// Byte offset.
		at: usize,
		/// What the tokenizer was looking for.
		expected: &'static str,
	},
	/// Malformed number literal.
	#[error("invalid number at offset {at}")]
	InvalidNumber {
		/// Byte offset of the literal.
		at: usize,
	},
	/// Number literal does not fit the requested representation.
	#[error("number out of range at offset {at}")]
	NumberOutOfRange {
		/// Byte offset of the literal.
		at: usize,
	},
	/// Malformed string escape.
	#[error("invalid escape at offset {at}")]
	InvalidEscape {
		/// Byte offset of the backslash.
		at: usize,
	},
	/// String bytes are not valid UTF-8.
	#[error("invalid utf-8 at offset {at}")]
	InvalidUtf8 {
		/// Byte offset of the string.
		at: usize,
	},
	/// String does not hold valid base64.
	#[error("invalid base64 at offset {at}")]
	InvalidBase64 {
		/// Byte offset of the string.
		at: usize,
	},
	/// Accessor called while the cursor sits on another token kind.
	#[error("accessor for {expected} called on {actual}")]
	WrongToken {
		/// Kind the accessor reads.
		expected: TokenKind,
		/// Kind of the current token.
		actual: TokenKind,
	},
	/// Non-whitespace input after the root value.
	#[error("trailing data at offset {at}")]
	TrailingData {
		/// Byte offset of the first trailing byte.
		at: usize,
	},
	/// `advance` called after the root value was complete.
	#[error("token stream exhausted")]
	Exhausted,
	/// Source was cancelled by its owner.
	#[error("cursor cancelled")]
	Cancelled,
}

impl CursorError {
	/// Whether this error describes the current value rather than the token stream.
	pub fn is_value_fault(&self) -> bool {
		matches!(self, Self::NumberOutOfRange { .. } | Self::InvalidBase64 { .. })
	}
}

/// Errors produced while building schemas or loading schema documents.
#[derive(Debug, Error)]
pub enum SchemaError {
	/// Filesystem failure while reading a schema document.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Schema document is not valid JSON for the expected shape.
	#[error("schema document: {0}")]
	Json(#[from] serde_json::Error),
	/// Two types share a name.
	#[error("duplicate type {name}")]
	DuplicateType {
		/// Duplicated type name.
		name: String,
	},
	/// Two fields of one type share a name.
	#[error("{type_name}: duplicate field {field}")]
	DuplicateField {
		/// Owning type.
		type_name: String,
		/// Duplicated field name.
		field: String,
	},
	/// Explicit ordinal outside `0..count`.
	#[error("{type_name}.{field}: ordinal {ordinal} out of range (fields={count})")]
	OrdinalOutOfRange {
		/// Owning type.
		type_name: String,
		/// Offending field.
		field: String,
		/// Declared ordinal.
		ordinal: usize,
		/// Number of fields in the type.
		count: usize,
	},
	/// Two fields claim the same ordinal.
	#[error("{type_name}: ordinal {ordinal} used more than once")]
	DuplicateOrdinal {
		/// Owning type.
		type_name: String,
		/// Reused ordinal.
		ordinal: usize,
	},
	/// Some fields have explicit ordinals and others do not.
	#[error("{type_name}: ordinals must be given for all fields or none")]
	MixedOrdinals {
		/// Owning type.
		type_name: String,
	},
	/// Field references a type that was never declared.
	#[error("{type_name}.{field}: unknown type {target}")]
	UnknownType {
		/// Owning type.
		type_name: String,
		/// Referencing field.
		field: String,
		/// Missing type name.
		target: String,
	},
	/// Requested root type was never declared.
	#[error("unknown root type {name}")]
	UnknownRoot {
		/// Requested type name.
		name: String,
	},
	/// Type string in a schema document could not be parsed.
	#[error("{type_name}.{field}: invalid type {spec:?}")]
	InvalidTypeSpec {
		/// Owning type.
		type_name: String,
		/// Offending field.
		field: String,
		/// Raw type string.
		spec: String,
	},
}

/// Errors produced while loading payload bytes.
#[derive(Debug, Error)]
pub enum SourceError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
}

fn field_path(type_name: &Arc<str>, field: &Arc<str>) -> String {
	format!("{type_name}.{field}")
}

fn object_path(type_name: &Arc<str>, field: &Option<Arc<str>>) -> String {
	match field {
		Some(field) => field_path(type_name, field),
		None => type_name.to_string(),
	}
}

fn at(position: &Option<Position>) -> String {
	match position {
		Some(position) => format!(" at {position}"),
		None => String::new(),
	}
}

fn join_names(fields: &[Arc<str>]) -> String {
	fields.iter().map(|item| item.as_ref()).collect::<Vec<_>>().join(", ")
}
