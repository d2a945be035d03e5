use log::trace;

use super::Decoder;
use crate::rec::{PresenceMask, Result, Schema, TokenCursor, TokenKind, TriState, Value};

enum NameMatch {
	Identity,
	Equal,
}

/// Match members against fields in ordinal order until the first miss.
///
/// Leaves the cursor on the first token it did not consume and returns how many fields matched.
/// Nothing decoded here is undone when the dispatch loop takes over.
pub(super) fn match_in_order<C: TokenCursor + ?Sized>(decoder: &mut Decoder<'_>, schema: &Schema, cursor: &mut C, slots: &mut [TriState<Value>], presence: &mut PresenceMask, depth: u32) -> Result<usize> {
	for field in schema.fields() {
		if cursor.current_kind() != TokenKind::FieldName {
			return Ok(field.ordinal());
		}

		let hit = {
			let name = cursor.field_name()?;
			let hit = same_name(name, field.name());
			if hit.is_none() {
				trace!("{}: in-order match stopped at {name:?}, expected {:?}", schema.type_name(), field.name());
			}
			hit
		};
		match hit {
			None => return Ok(field.ordinal()),
			Some(NameMatch::Identity) => decoder.stats.identity_hits += 1,
			Some(NameMatch::Equal) => {}
		}

		cursor.advance()?;
		decoder.store(schema, field, cursor, slots, presence, depth)?;
		decoder.stats.in_order += 1;
		cursor.advance()?;
	}
	Ok(schema.len())
}

fn same_name(actual: &str, expected: &str) -> Option<NameMatch> {
	if std::ptr::eq(actual, expected) {
		return Some(NameMatch::Identity);
	}
	(actual == expected).then_some(NameMatch::Equal)
}
