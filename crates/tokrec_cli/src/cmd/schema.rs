use std::path::PathBuf;

use tokrec::rec::{FieldDescriptor, Schema, SchemaSet, load_schema};

use crate::cmd::util::emit_json;
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print field descriptors and presence layout of a schema document.
pub fn run(args: Args) -> Result<()> {
	let Args { schema: path, type_name, json } = args;

	let loaded = load_schema(&path)?;
	let selected: Vec<&Schema> = match type_name.as_deref() {
		Some(name) => vec![loaded.set.schema(name).ok_or_else(|| CliError::UnknownType { name: name.to_owned() })?],
		None => loaded.set.iter().collect(),
	};
	let root = loaded.root.and_then(|id| loaded.set.get(id)).map(|item| item.type_name().to_string());

	if json {
		let out = SchemaJson {
			root,
			types: selected.iter().map(|schema| type_json(&loaded.set, schema)).collect(),
		};
		return emit_json(&out);
	}

	println!("schema: {}", path.display());
	println!("root: {}", root.as_deref().unwrap_or("-"));
	for schema in selected {
		println!("{} (fields={}, presence={})", schema.type_name(), schema.len(), presence_label(schema));
		for field in schema.fields() {
			println!("  #{} {}: {} {}", field.ordinal(), field.name(), loaded.set.describe(field.kind(), schema), mode_label(field));
		}
	}
	Ok(())
}

fn presence_label(schema: &Schema) -> &'static str {
	if schema.seed().is_word() { "word" } else { "wide" }
}

fn mode_label(field: &FieldDescriptor) -> &'static str {
	if field.is_tri_state() {
		"optional"
	} else if field.is_nullable() {
		"nullable"
	} else {
		"required"
	}
}

fn type_json(set: &SchemaSet, schema: &Schema) -> TypeJson {
	TypeJson {
		name: schema.type_name().to_string(),
		presence: presence_label(schema),
		fields: schema
			.fields()
			.iter()
			.map(|field| FieldJson {
				name: field.name().to_owned(),
				ordinal: field.ordinal(),
				ty: set.describe(field.kind(), schema),
				mode: mode_label(field),
			})
			.collect(),
	}
}

#[derive(serde::Serialize)]
struct FieldJson {
	name: String,
	ordinal: usize,
	#[serde(rename = "type")]
	ty: String,
	mode: &'static str,
}

#[derive(serde::Serialize)]
struct TypeJson {
	name: String,
	presence: &'static str,
	fields: Vec<FieldJson>,
}

#[derive(serde::Serialize)]
struct SchemaJson {
	root: Option<String>,
	types: Vec<TypeJson>,
}
