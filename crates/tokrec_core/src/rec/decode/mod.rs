use log::{debug, trace};

use crate::rec::scalar::{ScalarFault, decode_scalar};
use crate::rec::{DecodeError, FieldDescriptor, FieldKind, FieldValue, Position, PresenceMask, Record, Result, ScalarKind, Schema, SchemaId, SchemaSet, Slot, TokenCursor, TokenKind, TokenSet, TriState, Value};

mod dispatch;
mod ordered;

/// Runtime limits and behavior switches for record decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum nesting depth of objects and lists.
	pub max_depth: u32,
	/// Maximum element count of a single list.
	pub max_list_len: usize,
	/// Try matching fields in ordinal order before falling back to name lookup.
	pub fast_path: bool,
	/// Fail on member names the schema does not declare instead of skipping them.
	pub deny_unknown_fields: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 16,
			max_list_len: 4096,
			fast_path: true,
			deny_unknown_fields: false,
		}
	}
}

impl DecodeOptions {
	/// Preset that rejects unknown members.
	pub fn strict() -> Self {
		Self {
			deny_unknown_fields: true,
			..Self::default()
		}
	}
}

/// Per-call counters describing how fields were matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
	/// Objects entered, root included.
	pub objects: usize,
	/// Fields matched by the in-order fast path.
	pub in_order: usize,
	/// Fast-path matches decided by pointer identity alone.
	pub identity_hits: usize,
	/// Fields matched by name lookup.
	pub dispatched: usize,
	/// Unknown members skipped.
	pub skipped: usize,
}

/// Decode one record of schema `id` from the cursor's current token.
///
/// Returns `Ok(None)` when the current token is an explicit null. On success the cursor rests on
/// the closing `}` of the decoded object.
pub fn decode_record<C: TokenCursor + ?Sized>(set: &SchemaSet, id: SchemaId, cursor: &mut C, opt: &DecodeOptions) -> Result<Option<Record>> {
	let mut stats = DecodeStats::default();
	decode_record_with_stats(set, id, cursor, opt, &mut stats)
}

/// Like [`decode_record`], also accumulating match counters into `stats`.
pub fn decode_record_with_stats<C: TokenCursor + ?Sized>(set: &SchemaSet, id: SchemaId, cursor: &mut C, opt: &DecodeOptions, stats: &mut DecodeStats) -> Result<Option<Record>> {
	let schema = set.get(id).ok_or(DecodeError::UnknownSchema { index: id.index() })?;
	let mut decoder = Decoder { set, opt, stats };
	decoder.object(schema, cursor, 0)
}

struct Decoder<'a> {
	set: &'a SchemaSet,
	opt: &'a DecodeOptions,
	stats: &'a mut DecodeStats,
}

impl Decoder<'_> {
	fn object<C: TokenCursor + ?Sized>(&mut self, schema: &Schema, cursor: &mut C, depth: u32) -> Result<Option<Record>> {
		match cursor.current_kind() {
			TokenKind::Null => return Ok(None),
			TokenKind::ObjectStart => {}
			actual => {
				return Err(DecodeError::TokenMismatch {
					type_name: schema.type_name().clone(),
					field: None,
					expected: TokenSet::OBJECT,
					actual,
					position: cursor.position(),
				});
			}
		}

		if depth >= self.opt.max_depth {
			return Err(DecodeError::DepthExceeded { max_depth: self.opt.max_depth });
		}

		self.stats.objects += 1;
		let mut slots: Vec<TriState<Value>> = vec![TriState::Undefined; schema.len()];
		let mut presence = schema.presence();
		cursor.advance()?;

		if self.opt.fast_path {
			ordered::match_in_order(self, schema, cursor, &mut slots, &mut presence, depth)?;
		}
		dispatch::dispatch_fields(self, schema, cursor, &mut slots, &mut presence, depth)?;

		complete(schema, slots, &presence, cursor.position()).map(Some)
	}

	/// Decode the value under the cursor into its slot and mark presence.
	fn store<C: TokenCursor + ?Sized>(&mut self, schema: &Schema, field: &FieldDescriptor, cursor: &mut C, slots: &mut [TriState<Value>], presence: &mut PresenceMask, depth: u32) -> Result<()> {
		let state = self.field(schema, field, cursor, depth)?;
		if let Some(slot) = slots.get_mut(field.ordinal()) {
			*slot = state;
		}
		presence.mark(field.ordinal());
		Ok(())
	}

	fn field<C: TokenCursor + ?Sized>(&mut self, schema: &Schema, field: &FieldDescriptor, cursor: &mut C, depth: u32) -> Result<TriState<Value>> {
		if cursor.current_kind() == TokenKind::Null {
			if field.is_required() {
				return Err(DecodeError::NullViolation {
					type_name: schema.type_name().clone(),
					field: field.name_arc().clone(),
					position: cursor.position(),
				});
			}
			return Ok(TriState::Null);
		}
		self.value(schema, field, field.kind(), cursor, depth).map(TriState::Value)
	}

	fn value<C: TokenCursor + ?Sized>(&mut self, schema: &Schema, field: &FieldDescriptor, kind: &FieldKind, cursor: &mut C, depth: u32) -> Result<Value> {
		match kind {
			FieldKind::Scalar(scalar) => match decode_scalar(*scalar, &*cursor) {
				Ok(value) => Ok(value),
				Err(fault) => Err(scalar_error(schema, field, *scalar, fault, cursor.position())),
			},
			FieldKind::Nested(id) => {
				let target = self.set.get(*id).ok_or(DecodeError::UnknownSchema { index: id.index() })?;
				self.nested(schema, field, target, cursor, depth)
			}
			FieldKind::Recursive => self.nested(schema, field, schema, cursor, depth),
			FieldKind::List(inner) => self.list(schema, field, inner, cursor, depth),
		}
	}

	fn nested<C: TokenCursor + ?Sized>(&mut self, schema: &Schema, field: &FieldDescriptor, target: &Schema, cursor: &mut C, depth: u32) -> Result<Value> {
		let actual = cursor.current_kind();
		if actual != TokenKind::ObjectStart {
			return Err(mismatch(schema, field, TokenSet::OBJECT, actual, cursor.position()));
		}

		trace!("{}.{}: descending into {}", schema.type_name(), field.name(), target.type_name());
		match self.object(target, cursor, depth + 1)? {
			Some(record) => Ok(Value::Record(Box::new(record))),
			None => Ok(Value::Null),
		}
	}

	fn list<C: TokenCursor + ?Sized>(&mut self, schema: &Schema, field: &FieldDescriptor, inner: &FieldKind, cursor: &mut C, depth: u32) -> Result<Value> {
		let actual = cursor.current_kind();
		if actual != TokenKind::ArrayStart {
			return Err(mismatch(schema, field, TokenSet::ARRAY, actual, cursor.position()));
		}
		if depth + 1 >= self.opt.max_depth {
			return Err(DecodeError::DepthExceeded { max_depth: self.opt.max_depth });
		}

		let mut items = Vec::new();
		loop {
			match cursor.advance()? {
				TokenKind::ArrayEnd => break,
				TokenKind::Null => {
					return Err(DecodeError::NullViolation {
						type_name: schema.type_name().clone(),
						field: field.name_arc().clone(),
						position: cursor.position(),
					});
				}
				_ => {
					if items.len() >= self.opt.max_list_len {
						return Err(DecodeError::ListTooLong {
							type_name: schema.type_name().clone(),
							field: field.name_arc().clone(),
							max: self.opt.max_list_len,
						});
					}
					items.push(self.value(schema, field, inner, cursor, depth + 1)?);
				}
			}
		}
		Ok(Value::List(items))
	}
}

fn complete(schema: &Schema, slots: Vec<TriState<Value>>, presence: &PresenceMask, position: Option<Position>) -> Result<Record> {
	if !presence.is_complete() {
		let fields: Vec<_> = presence.missing_ordinals().filter_map(|ordinal| schema.field(ordinal)).map(|field| field.name_arc().clone()).collect();
		debug!("{}: {} required field(s) missing", schema.type_name(), fields.len());
		return Err(DecodeError::MissingFields {
			type_name: schema.type_name().clone(),
			fields,
			position,
		});
	}

	let fields = schema
		.fields()
		.iter()
		.zip(slots)
		.map(|(field, state)| FieldValue {
			name: field.name_arc().clone(),
			slot: finalize(field, state),
		})
		.collect();

	Ok(Record {
		type_name: schema.type_name().clone(),
		fields,
	})
}

fn finalize(field: &FieldDescriptor, state: TriState<Value>) -> Slot {
	if field.is_tri_state() {
		return Slot::Optional(state);
	}
	match state {
		TriState::Value(value) => Slot::Value(value),
		TriState::Null | TriState::Undefined => Slot::Value(Value::Null),
	}
}

fn mismatch(schema: &Schema, field: &FieldDescriptor, expected: TokenSet, actual: TokenKind, position: Option<Position>) -> DecodeError {
	DecodeError::TokenMismatch {
		type_name: schema.type_name().clone(),
		field: Some(field.name_arc().clone()),
		expected,
		actual,
		position,
	}
}

fn scalar_error(schema: &Schema, field: &FieldDescriptor, scalar: ScalarKind, fault: ScalarFault, position: Option<Position>) -> DecodeError {
	match fault {
		ScalarFault::Mismatch { expected, actual } => mismatch(schema, field, expected, actual, position),
		ScalarFault::Invalid(reason) => DecodeError::InvalidScalar {
			type_name: schema.type_name().clone(),
			field: field.name_arc().clone(),
			scalar,
			reason,
			position,
		},
		ScalarFault::Cursor(err) => DecodeError::Cursor(err),
	}
}
