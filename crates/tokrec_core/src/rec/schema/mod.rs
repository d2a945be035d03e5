use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::rec::{PresenceMask, PresenceSeed, ScalarKind, SchemaError};

/// Index of a schema inside its [`SchemaSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaId(u32);

impl SchemaId {
	/// Position inside the owning set.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Resolved field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	/// Primitive decoded by a known-type decoder.
	Scalar(ScalarKind),
	/// Another schema in the same set.
	Nested(SchemaId),
	/// The enclosing schema itself.
	Recursive,
	/// Homogeneous array of the inner kind.
	List(Box<FieldKind>),
}

/// Immutable description of one field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
	name: Arc<str>,
	ordinal: usize,
	kind: FieldKind,
	nullable: bool,
	tri_state: bool,
}

impl FieldDescriptor {
	/// Field name as it appears in payloads.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Shared handle to the interned name.
	pub fn name_arc(&self) -> &Arc<str> {
		&self.name
	}

	/// Construction order and presence bit.
	pub fn ordinal(&self) -> usize {
		self.ordinal
	}

	/// Resolved field type.
	pub fn kind(&self) -> &FieldKind {
		&self.kind
	}

	/// Whether an explicit null or absence is allowed.
	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	/// Whether absence and null are reported separately.
	pub fn is_tri_state(&self) -> bool {
		self.tri_state
	}

	/// Whether the field must appear with a non-null value.
	pub fn is_required(&self) -> bool {
		!self.nullable && !self.tri_state
	}
}

/// Immutable field list for one target type.
#[derive(Debug)]
pub struct Schema {
	id: SchemaId,
	type_name: Arc<str>,
	fields: Vec<FieldDescriptor>,
	by_name: HashMap<Arc<str>, usize>,
	seed: PresenceSeed,
}

impl Schema {
	/// Id inside the owning set.
	pub fn id(&self) -> SchemaId {
		self.id
	}

	/// Target type name.
	pub fn type_name(&self) -> &Arc<str> {
		&self.type_name
	}

	/// Fields in ordinal order.
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Field by ordinal.
	pub fn field(&self, ordinal: usize) -> Option<&FieldDescriptor> {
		self.fields.get(ordinal)
	}

	/// Ordinal of the field named `name`.
	pub fn ordinal_of(&self, name: &str) -> Option<usize> {
		self.by_name.get(name).copied()
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the type has no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Presence seed chosen for this schema.
	pub fn seed(&self) -> &PresenceSeed {
		&self.seed
	}

	/// Fresh presence mask for one decode call.
	pub fn presence(&self) -> PresenceMask {
		self.seed.mask()
	}
}

/// Registry of schemas; nested and recursive references resolve to [`SchemaId`]s.
#[derive(Debug, Default)]
pub struct SchemaSet {
	schemas: Vec<Schema>,
	by_name: HashMap<Arc<str>, SchemaId>,
}

impl SchemaSet {
	/// Start declaring types.
	pub fn builder() -> SchemaSetBuilder {
		SchemaSetBuilder::default()
	}

	/// Schema by id.
	pub fn get(&self, id: SchemaId) -> Option<&Schema> {
		self.schemas.get(id.index())
	}

	/// Id of the type named `name`.
	pub fn id_of(&self, name: &str) -> Option<SchemaId> {
		self.by_name.get(name).copied()
	}

	/// Schema of the type named `name`.
	pub fn schema(&self, name: &str) -> Option<&Schema> {
		self.id_of(name).and_then(|id| self.get(id))
	}

	/// All schemas in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &Schema> {
		self.schemas.iter()
	}

	/// Number of schemas.
	pub fn len(&self) -> usize {
		self.schemas.len()
	}

	/// Whether the set is empty.
	pub fn is_empty(&self) -> bool {
		self.schemas.is_empty()
	}

	/// Render a field kind using type names.
	pub fn describe(&self, kind: &FieldKind, owner: &Schema) -> String {
		match kind {
			FieldKind::Scalar(scalar) => scalar.as_str().to_owned(),
			FieldKind::Nested(id) => self.get(*id).map_or_else(|| format!("#{}", id.index()), |schema| schema.type_name.to_string()),
			FieldKind::Recursive => owner.type_name.to_string(),
			FieldKind::List(inner) => format!("{}[]", self.describe(inner, owner)),
		}
	}
}

/// Unresolved field type, as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
	/// Primitive.
	Scalar(ScalarKind),
	/// Reference to a declared type by name.
	Named(String),
	/// Array of the inner type.
	List(Box<FieldType>),
}

impl FieldType {
	/// Reference a declared type.
	pub fn named(name: impl Into<String>) -> Self {
		Self::Named(name.into())
	}

	/// Array of `inner`.
	pub fn list(inner: impl Into<FieldType>) -> Self {
		Self::List(Box::new(inner.into()))
	}
}

impl From<ScalarKind> for FieldType {
	fn from(kind: ScalarKind) -> Self {
		Self::Scalar(kind)
	}
}

/// Declared field.
#[derive(Debug, Clone)]
pub struct FieldDef {
	name: String,
	ty: FieldType,
	nullable: bool,
	tri_state: bool,
	ordinal: Option<usize>,
}

impl FieldDef {
	/// Required field.
	pub fn new(name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
		Self {
			name: name.into(),
			ty: ty.into(),
			nullable: false,
			tri_state: false,
			ordinal: None,
		}
	}

	/// Allow null or absence.
	pub fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}

	/// Report absence and null separately.
	pub fn tri_state(mut self) -> Self {
		self.tri_state = true;
		self
	}

	/// Pin the ordinal instead of using declaration order.
	pub fn at(mut self, ordinal: usize) -> Self {
		self.ordinal = Some(ordinal);
		self
	}
}

/// Declared type.
#[derive(Debug, Clone)]
pub struct TypeDef {
	name: String,
	fields: Vec<FieldDef>,
}

impl TypeDef {
	/// Empty type.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: Vec::new(),
		}
	}

	/// Append a field declaration.
	pub fn field(mut self, field: FieldDef) -> Self {
		self.fields.push(field);
		self
	}

	/// Append a required field.
	pub fn required(self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
		self.field(FieldDef::new(name, ty))
	}

	/// Append a nullable field.
	pub fn nullable(self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
		self.field(FieldDef::new(name, ty).nullable())
	}

	/// Append a tri-state field.
	pub fn tri_state(self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
		self.field(FieldDef::new(name, ty).tri_state())
	}
}

/// Collects type declarations and resolves them into a [`SchemaSet`].
#[derive(Debug, Default)]
pub struct SchemaSetBuilder {
	types: Vec<TypeDef>,
}

impl SchemaSetBuilder {
	/// Add a type declaration.
	pub fn add(mut self, ty: TypeDef) -> Self {
		self.types.push(ty);
		self
	}

	/// Validate declarations and resolve references.
	pub fn build(self) -> Result<SchemaSet, SchemaError> {
		let mut by_name: HashMap<Arc<str>, SchemaId> = HashMap::with_capacity(self.types.len());
		let mut type_names = Vec::with_capacity(self.types.len());
		for (idx, ty) in self.types.iter().enumerate() {
			let name: Arc<str> = Arc::from(ty.name.as_str());
			match by_name.entry(name.clone()) {
				Entry::Occupied(_) => return Err(SchemaError::DuplicateType { name: ty.name.clone() }),
				Entry::Vacant(slot) => {
					slot.insert(SchemaId(idx as u32));
				}
			}
			type_names.push(name);
		}

		let mut schemas = Vec::with_capacity(self.types.len());
		for (idx, (ty, type_name)) in self.types.into_iter().zip(type_names).enumerate() {
			schemas.push(build_schema(SchemaId(idx as u32), type_name, ty, &by_name)?);
		}

		Ok(SchemaSet { schemas, by_name })
	}
}

fn build_schema(id: SchemaId, type_name: Arc<str>, ty: TypeDef, types: &HashMap<Arc<str>, SchemaId>) -> Result<Schema, SchemaError> {
	let count = ty.fields.len();
	let ordinals = assign_ordinals(&ty)?;

	let mut slots: Vec<Option<FieldDescriptor>> = vec![None; count];
	let mut by_name = HashMap::with_capacity(count);
	for (def, ordinal) in ty.fields.into_iter().zip(ordinals) {
		let name: Arc<str> = Arc::from(def.name.as_str());
		if by_name.insert(name.clone(), ordinal).is_some() {
			return Err(SchemaError::DuplicateField {
				type_name: ty.name.clone(),
				field: def.name,
			});
		}

		let kind = resolve(&def.ty, &ty.name, &def.name, types)?;
		slots[ordinal] = Some(FieldDescriptor {
			name,
			ordinal,
			kind,
			nullable: def.nullable,
			tri_state: def.tri_state,
		});
	}

	let fields: Vec<FieldDescriptor> = slots.into_iter().flatten().collect();
	let seed = PresenceSeed::new(count, fields.iter().filter(|field| !field.is_required()).map(FieldDescriptor::ordinal));

	Ok(Schema {
		id,
		type_name,
		fields,
		by_name,
		seed,
	})
}

fn assign_ordinals(ty: &TypeDef) -> Result<Vec<usize>, SchemaError> {
	let count = ty.fields.len();
	let pinned = ty.fields.iter().filter(|field| field.ordinal.is_some()).count();
	if pinned == 0 {
		return Ok((0..count).collect());
	}
	if pinned != count {
		return Err(SchemaError::MixedOrdinals { type_name: ty.name.clone() });
	}

	let mut used = vec![false; count];
	let mut out = Vec::with_capacity(count);
	for field in &ty.fields {
		let ordinal = field.ordinal.unwrap_or_default();
		if ordinal >= count {
			return Err(SchemaError::OrdinalOutOfRange {
				type_name: ty.name.clone(),
				field: field.name.clone(),
				ordinal,
				count,
			});
		}
		if std::mem::replace(&mut used[ordinal], true) {
			return Err(SchemaError::DuplicateOrdinal {
				type_name: ty.name.clone(),
				ordinal,
			});
		}
		out.push(ordinal);
	}
	Ok(out)
}

fn resolve(ty: &FieldType, owner: &str, field: &str, types: &HashMap<Arc<str>, SchemaId>) -> Result<FieldKind, SchemaError> {
	match ty {
		FieldType::Scalar(kind) => Ok(FieldKind::Scalar(*kind)),
		FieldType::Named(target) if target == owner => Ok(FieldKind::Recursive),
		FieldType::Named(target) => types
			.get(target.as_str())
			.map(|id| FieldKind::Nested(*id))
			.ok_or_else(|| SchemaError::UnknownType {
				type_name: owner.to_owned(),
				field: field.to_owned(),
				target: target.clone(),
			}),
		FieldType::List(inner) => Ok(FieldKind::List(Box::new(resolve(inner, owner, field, types)?))),
	}
}

#[cfg(test)]
mod tests;
