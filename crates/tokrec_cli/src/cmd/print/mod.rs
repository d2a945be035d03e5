use std::fmt::{self, Write};

use serde_json::{Map, Number};
use tokrec::rec::{Record, Slot, TriState, Value, base64};

use crate::cmd::util::truncate;

/// Output truncation limits for decoded records.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for lists.
	pub max_list_items: usize,
	/// Maximum nesting depth printed for records and lists.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_list_items: 16,
			max_print_depth: 8,
		}
	}
}

/// Render a record as an indented tree.
pub fn render_record(record: &Record, options: PrintOptions) -> String {
	let mut out = String::new();
	let _ = write_record(&mut out, record, 0, 0, options);
	out
}

fn write_record(out: &mut String, record: &Record, indent: usize, depth: u32, options: PrintOptions) -> fmt::Result {
	let pad = " ".repeat(indent);
	if depth >= options.max_print_depth {
		return writeln!(out, "{pad}{} {{ ... }}", record.type_name);
	}

	writeln!(out, "{pad}{} {{", record.type_name)?;
	for field in &record.fields {
		write!(out, "{pad}  {} = ", field.name)?;
		match &field.slot {
			Slot::Optional(TriState::Undefined) => writeln!(out, "undefined")?,
			Slot::Optional(TriState::Null) => writeln!(out, "null")?,
			Slot::Value(value) | Slot::Optional(TriState::Value(value)) => {
				if matches!(value, Value::Record(_) | Value::List(_)) {
					writeln!(out)?;
					write_value(out, value, indent + 4, depth + 1, options)?;
				} else {
					write_value(out, value, 0, depth + 1, options)?;
				}
			}
		}
	}
	writeln!(out, "{pad}}}")
}

fn write_value(out: &mut String, value: &Value, indent: usize, depth: u32, options: PrintOptions) -> fmt::Result {
	let pad = " ".repeat(indent);
	match value {
		Value::Null => writeln!(out, "{pad}null"),
		Value::Bool(v) => writeln!(out, "{pad}{v}"),
		Value::I8(v) => writeln!(out, "{pad}{v}"),
		Value::I16(v) => writeln!(out, "{pad}{v}"),
		Value::I32(v) => writeln!(out, "{pad}{v}"),
		Value::I64(v) => writeln!(out, "{pad}{v}"),
		Value::BigInt(v) => writeln!(out, "{pad}{v}"),
		Value::F32(v) => writeln!(out, "{pad}{v}"),
		Value::F64(v) => writeln!(out, "{pad}{v}"),
		Value::String(v) => writeln!(out, "{pad}\"{}\"", truncate(v, options.max_string_len)),
		Value::Binary(v) => writeln!(out, "{pad}bytes[{}]", v.len()),
		Value::Uuid(v) => writeln!(out, "{pad}{v}"),
		Value::List(items) => {
			if depth >= options.max_print_depth {
				return writeln!(out, "{pad}[... {} items]", items.len());
			}
			writeln!(out, "{pad}[")?;
			for item in items.iter().take(options.max_list_items) {
				write_value(out, item, indent + 2, depth + 1, options)?;
			}
			if items.len() > options.max_list_items {
				writeln!(out, "{pad}  ... {} more", items.len() - options.max_list_items)?;
			}
			writeln!(out, "{pad}]")
		}
		Value::Record(record) => write_record(out, record, indent, depth, options),
	}
}

/// Convert a record into a JSON object. Undefined tri-state fields are omitted.
pub fn record_json(record: &Record) -> serde_json::Value {
	let mut object = Map::with_capacity(record.fields.len());
	for field in &record.fields {
		let value = match &field.slot {
			Slot::Optional(TriState::Undefined) => continue,
			Slot::Optional(TriState::Null) => serde_json::Value::Null,
			Slot::Value(value) | Slot::Optional(TriState::Value(value)) => value_json(value),
		};
		object.insert(field.name.to_string(), value);
	}
	serde_json::Value::Object(object)
}

/// Convert a decoded value into JSON. Big integers and binary payloads become strings.
pub fn value_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Null => serde_json::Value::Null,
		Value::Bool(v) => serde_json::Value::Bool(*v),
		Value::I8(v) => serde_json::Value::from(*v),
		Value::I16(v) => serde_json::Value::from(*v),
		Value::I32(v) => serde_json::Value::from(*v),
		Value::I64(v) => serde_json::Value::from(*v),
		Value::BigInt(v) => serde_json::Value::String(v.to_string()),
		Value::F32(v) => float_json(f64::from(*v)),
		Value::F64(v) => float_json(*v),
		Value::String(v) => serde_json::Value::String(v.to_string()),
		Value::Binary(v) => serde_json::Value::String(base64::encode(v)),
		Value::Uuid(v) => serde_json::Value::String(v.to_string()),
		Value::List(items) => serde_json::Value::Array(items.iter().map(value_json).collect()),
		Value::Record(record) => record_json(record),
	}
}

fn float_json(value: f64) -> serde_json::Value {
	Number::from_f64(value).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
mod tests;
