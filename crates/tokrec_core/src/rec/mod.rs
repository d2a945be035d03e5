pub mod base64;
mod decode;
mod doc;
mod error;
mod json;
mod presence;
mod replay;
mod scalar;
mod schema;
mod source;
mod token;
mod typed;
mod value;

/// Schema-driven decoding entry points, options and counters.
pub use decode::{DecodeOptions, DecodeStats, decode_record, decode_record_with_stats};
/// Schema documents and their loader.
pub use doc::{FieldDoc, LoadedSchema, SchemaDoc, TypeDoc, load_schema, parse_schema, parse_type_spec};
/// Error and result aliases.
pub use error::{CursorError, DecodeError, ErrorKind, Result, SchemaError, SourceError};
/// JSON pull tokenizer.
pub use json::JsonCursor;
/// Required-field presence tracking.
pub use presence::{MissingOrdinals, PresenceMask, PresenceSeed, WORD_BITS};
/// Cursor over pre-built tokens.
pub use replay::{Token, TokenReplay};
/// Primitive field types.
pub use scalar::ScalarKind;
/// Schema registry and declaration builders.
pub use schema::{FieldDef, FieldDescriptor, FieldKind, FieldType, Schema, SchemaId, SchemaSet, SchemaSetBuilder, TypeDef};
/// Payload loading with compression detection.
pub use source::{Compression, MAX_PAYLOAD_BYTES, decode_payload, read_payload};
/// Token model and cursor trait.
pub use token::{Position, TokenCursor, TokenKind, TokenSet};
/// Typed conversion layer.
pub use typed::{FieldAt, FromRecord, FromValue, RecordReader, decode, decode_with};
/// Decoded runtime value types.
pub use value::{FieldValue, Record, Slot, TriState, Value};
