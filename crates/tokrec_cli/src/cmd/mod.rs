use thiserror::Error;
use tokrec::rec::{CursorError, DecodeError, SchemaError, SourceError};

/// Payload decode command.
pub mod decode;
/// Record and value rendering.
pub mod print;
/// Schema inspection command.
pub mod schema;
/// Token dump command.
pub mod tokens;
/// Shared helpers.
pub mod util;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Record decoding failed.
	#[error("{0}")]
	Decode(#[from] DecodeError),
	/// Schema document could not be loaded.
	#[error("schema: {0}")]
	Schema(#[from] SchemaError),
	/// Payload could not be read.
	#[error("payload: {0}")]
	Source(#[from] SourceError),
	/// Payload is not well-formed.
	#[error("payload: {0}")]
	Cursor(#[from] CursorError),
	/// Requested type is not declared.
	#[error("type {name} is not declared in the schema")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
	/// Schema declares no types and none was requested.
	#[error("schema declares no types")]
	NoRootType,
	/// JSON output could not be produced.
	#[error("json output: {0}")]
	Json(#[from] serde_json::Error),
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;
