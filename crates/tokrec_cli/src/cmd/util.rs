use tokrec::rec::{LoadedSchema, SchemaId};

use crate::cmd::{CliError, Result};

/// Pretty-print a serializable payload on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Pick the requested type, or the document root.
pub(crate) fn resolve_type(loaded: &LoadedSchema, type_name: Option<&str>) -> Result<SchemaId> {
	match type_name {
		Some(name) => loaded.set.id_of(name).ok_or_else(|| CliError::UnknownType { name: name.to_owned() }),
		None => loaded.root.ok_or(CliError::NoRootType),
	}
}

/// Shorten text to `max_len` Unicode scalar values.
pub(crate) fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}
