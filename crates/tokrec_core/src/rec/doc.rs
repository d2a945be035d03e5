use std::path::Path;

use crate::rec::{FieldDef, FieldType, ScalarKind, SchemaError, SchemaId, SchemaSet, TypeDef};

/// JSON schema document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDoc {
	/// Type decoded when no other is requested; defaults to the first declared type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub root: Option<String>,
	/// Declared types.
	pub types: Vec<TypeDoc>,
}

/// One declared type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDoc {
	/// Type name.
	pub name: String,
	/// Field declarations.
	#[serde(default)]
	pub fields: Vec<FieldDoc>,
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDoc {
	/// Member name in payloads.
	pub name: String,
	/// Type string: a scalar name, a declared type name, or either with a `[]` suffix.
	#[serde(rename = "type")]
	pub ty: String,
	/// Null or absence allowed.
	#[serde(default, skip_serializing_if = "is_false")]
	pub nullable: bool,
	/// Tri-state: absence and null reported separately.
	#[serde(default, skip_serializing_if = "is_false")]
	pub optional: bool,
	/// Explicit ordinal.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ordinal: Option<usize>,
}

fn is_false(value: &bool) -> bool {
	!*value
}

/// Schema set built from a document, with its resolved root type.
#[derive(Debug)]
pub struct LoadedSchema {
	/// Built schemas.
	pub set: SchemaSet,
	/// Root type, `None` for a document without types.
	pub root: Option<SchemaId>,
}

impl SchemaDoc {
	/// Validate the document and build its schema set.
	pub fn build(&self) -> Result<LoadedSchema, SchemaError> {
		let mut builder = SchemaSet::builder();
		for ty in &self.types {
			let mut def = TypeDef::new(ty.name.as_str());
			for field in &ty.fields {
				let spec = parse_type_spec(&field.ty).ok_or_else(|| SchemaError::InvalidTypeSpec {
					type_name: ty.name.clone(),
					field: field.name.clone(),
					spec: field.ty.clone(),
				})?;
				let mut decl = FieldDef::new(field.name.as_str(), spec);
				if field.nullable {
					decl = decl.nullable();
				}
				if field.optional {
					decl = decl.tri_state();
				}
				if let Some(ordinal) = field.ordinal {
					decl = decl.at(ordinal);
				}
				def = def.field(decl);
			}
			builder = builder.add(def);
		}
		let set = builder.build()?;

		let root = match &self.root {
			Some(name) => Some(set.id_of(name).ok_or_else(|| SchemaError::UnknownRoot { name: name.clone() })?),
			None => set.iter().next().map(|schema| schema.id()),
		};
		Ok(LoadedSchema { set, root })
	}

	/// Describe an existing set as a document.
	pub fn from_set(set: &SchemaSet, root: Option<SchemaId>) -> Self {
		let types = set
			.iter()
			.map(|schema| TypeDoc {
				name: schema.type_name().to_string(),
				fields: schema
					.fields()
					.iter()
					.map(|field| FieldDoc {
						name: field.name().to_owned(),
						ty: set.describe(field.kind(), schema),
						nullable: field.is_nullable(),
						optional: field.is_tri_state(),
						ordinal: Some(field.ordinal()),
					})
					.collect(),
			})
			.collect();

		Self {
			root: root.and_then(|id| set.get(id)).map(|schema| schema.type_name().to_string()),
			types,
		}
	}
}

/// Parse a type string such as `i64`, `Customer` or `string[]`.
pub fn parse_type_spec(spec: &str) -> Option<FieldType> {
	let spec = spec.trim();
	if let Some(inner) = spec.strip_suffix("[]") {
		return parse_type_spec(inner).map(FieldType::list);
	}
	if let Some(kind) = ScalarKind::from_name(spec) {
		return Some(kind.into());
	}

	let mut chars = spec.chars();
	let starts_ok = chars.next().is_some_and(|ch| ch.is_alphabetic() || ch == '_');
	(starts_ok && chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '.')).then(|| FieldType::named(spec))
}

/// Parse and build a schema document from JSON text.
pub fn parse_schema(text: &str) -> Result<LoadedSchema, SchemaError> {
	let doc: SchemaDoc = serde_json::from_str(text)?;
	doc.build()
}

/// Read, parse and build a schema document file.
pub fn load_schema(path: &Path) -> Result<LoadedSchema, SchemaError> {
	let text = std::fs::read_to_string(path)?;
	parse_schema(&text)
}

#[cfg(test)]
mod tests {
	use super::{SchemaDoc, parse_schema, parse_type_spec};
	use crate::rec::{FieldKind, FieldType, ScalarKind, SchemaError};

	const ORDER: &str = r#"{
		"root": "Order",
		"types": [
			{ "name": "Customer", "fields": [ { "name": "name", "type": "string" } ] },
			{ "name": "Order", "fields": [
				{ "name": "id", "type": "i64" },
				{ "name": "customer", "type": "Customer" },
				{ "name": "lines", "type": "Line[]" },
				{ "name": "note", "type": "string", "nullable": true },
				{ "name": "discount", "type": "f64", "optional": true },
				{ "name": "parent", "type": "Order", "nullable": true }
			] },
			{ "name": "Line", "fields": [ { "name": "sku", "type": "string" }, { "name": "qty", "type": "i32" } ] }
		]
	}"#;

	#[test]
	fn type_specs_parse() {
		assert_eq!(parse_type_spec("i64"), Some(FieldType::Scalar(ScalarKind::I64)));
		assert_eq!(parse_type_spec(" Customer "), Some(FieldType::named("Customer")));
		assert_eq!(parse_type_spec("uuid[][]"), Some(FieldType::list(FieldType::list(ScalarKind::Uuid))));
		assert_eq!(parse_type_spec(""), None);
		assert_eq!(parse_type_spec("[]"), None);
		assert_eq!(parse_type_spec("9lives"), None);
		assert_eq!(parse_type_spec("a b"), None);
	}

	#[test]
	fn document_builds_with_named_root() {
		let loaded = parse_schema(ORDER).expect("document loads");
		let root = loaded.root.and_then(|id| loaded.set.get(id)).expect("root resolves");
		assert_eq!(root.type_name().as_ref(), "Order");

		let line = loaded.set.id_of("Line").expect("line declared");
		assert_eq!(root.field(2).map(|field| field.kind()), Some(&FieldKind::List(Box::new(FieldKind::Nested(line)))));
		assert_eq!(root.field(5).map(|field| field.kind()), Some(&FieldKind::Recursive));
		assert!(root.field(3).is_some_and(|field| field.is_nullable()));
		assert!(root.field(4).is_some_and(|field| field.is_tri_state()));
	}

	#[test]
	fn root_defaults_to_first_type() {
		let loaded = parse_schema(r#"{ "types": [ { "name": "A" }, { "name": "B" } ] }"#).expect("document loads");
		assert_eq!(loaded.root, loaded.set.id_of("A"));

		let empty = parse_schema(r#"{ "types": [] }"#).expect("document loads");
		assert_eq!(empty.root, None);
	}

	#[test]
	fn bad_documents_are_rejected() {
		let err = parse_schema(r#"{ "root": "Nope", "types": [ { "name": "A" } ] }"#).expect_err("unknown root");
		assert!(matches!(err, SchemaError::UnknownRoot { .. }), "got {err:?}");

		let err = parse_schema(r#"{ "types": [ { "name": "A", "fields": [ { "name": "x", "type": "i64?" } ] } ] }"#).expect_err("bad spec");
		assert!(matches!(err, SchemaError::InvalidTypeSpec { .. }), "got {err:?}");

		let err = parse_schema(r#"{ "types": [ { "name": "A", "fields": [ { "name": "x", "type": "B" } ] } ] }"#).expect_err("unknown type");
		assert!(matches!(err, SchemaError::UnknownType { .. }), "got {err:?}");

		let err = parse_schema(r#"{ "types": [], "extra": 1 }"#).expect_err("unknown key");
		assert!(matches!(err, SchemaError::Json(_)), "got {err:?}");
	}

	#[test]
	fn described_set_rebuilds_identically() {
		let loaded = parse_schema(ORDER).expect("document loads");
		let doc = SchemaDoc::from_set(&loaded.set, loaded.root);
		assert_eq!(doc.root.as_deref(), Some("Order"));

		let rebuilt = doc.build().expect("described document builds");
		assert_eq!(SchemaDoc::from_set(&rebuilt.set, rebuilt.root), doc);
	}
}
