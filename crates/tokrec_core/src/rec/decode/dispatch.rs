use log::trace;

use super::Decoder;
use crate::rec::{DecodeError, PresenceMask, Result, Schema, TokenCursor, TokenKind, TokenSet, TriState, Value};

/// Consume members by name lookup until the closing `}`.
///
/// Known members overwrite their slot (last one wins); unknown members are skipped structurally
/// unless the options deny them.
pub(super) fn dispatch_fields<C: TokenCursor + ?Sized>(decoder: &mut Decoder<'_>, schema: &Schema, cursor: &mut C, slots: &mut [TriState<Value>], presence: &mut PresenceMask, depth: u32) -> Result<()> {
	loop {
		match cursor.current_kind() {
			TokenKind::ObjectEnd => return Ok(()),
			TokenKind::FieldName => {}
			actual => {
				return Err(DecodeError::TokenMismatch {
					type_name: schema.type_name().clone(),
					field: None,
					expected: TokenSet::FIELD_OR_END,
					actual,
					position: cursor.position(),
				});
			}
		}

		let ordinal = {
			let name = cursor.field_name()?;
			let ordinal = schema.ordinal_of(name);
			if ordinal.is_none() {
				if decoder.opt.deny_unknown_fields {
					return Err(DecodeError::UnknownField {
						type_name: schema.type_name().clone(),
						field: name.into(),
						position: cursor.position(),
					});
				}
				trace!("{}: skipping unknown field {name:?}", schema.type_name());
			}
			ordinal
		};

		cursor.advance()?;
		match ordinal.and_then(|ordinal| schema.field(ordinal)) {
			Some(field) => {
				decoder.store(schema, field, cursor, slots, presence, depth)?;
				decoder.stats.dispatched += 1;
			}
			None => {
				cursor.skip_value()?;
				decoder.stats.skipped += 1;
			}
		}
		cursor.advance()?;
	}
}
