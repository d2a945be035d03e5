use std::sync::Arc;

use crate::rec::token::expect_kind;
use crate::rec::{CursorError, TokenCursor, TokenKind, base64};

/// Owned token, as fed to [`TokenReplay`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
	/// `{`
	ObjectStart,
	/// `}`
	ObjectEnd,
	/// Member name.
	FieldName(Arc<str>),
	/// String scalar.
	String(Arc<str>),
	/// Integer scalar that fits `i64`.
	Int(i64),
	/// Integer scalar of any size, as decimal text.
	BigInt(Box<str>),
	/// Float scalar.
	Float(f64),
	/// Boolean scalar.
	Bool(bool),
	/// Null.
	Null,
	/// `[`
	ArrayStart,
	/// `]`
	ArrayEnd,
}

impl Token {
	/// Member-name token.
	pub fn name(name: impl Into<Arc<str>>) -> Self {
		Self::FieldName(name.into())
	}

	/// String token.
	pub fn string(text: impl Into<Arc<str>>) -> Self {
		Self::String(text.into())
	}

	/// Kind reported by the cursor for this token.
	pub fn kind(&self) -> TokenKind {
		match self {
			Self::ObjectStart => TokenKind::ObjectStart,
			Self::ObjectEnd => TokenKind::ObjectEnd,
			Self::FieldName(_) => TokenKind::FieldName,
			Self::String(_) => TokenKind::StringValue,
			Self::Int(_) | Self::BigInt(_) => TokenKind::IntValue,
			Self::Float(_) => TokenKind::FloatValue,
			Self::Bool(true) => TokenKind::True,
			Self::Bool(false) => TokenKind::False,
			Self::Null => TokenKind::Null,
			Self::ArrayStart => TokenKind::ArrayStart,
			Self::ArrayEnd => TokenKind::ArrayEnd,
		}
	}
}

/// Cursor over a pre-built token list.
///
/// Field names are handed out as the exact `Arc<str>` they were built from, so a replay
/// assembled from a schema's own names hits the identity comparison of the in-order matcher.
#[derive(Debug)]
pub struct TokenReplay {
	tokens: Vec<Token>,
	number_text: Vec<Option<Box<str>>>,
	idx: usize,
	advances: usize,
	cancel_after: Option<usize>,
}

impl TokenReplay {
	/// Create a replay positioned on the first token.
	pub fn new(tokens: Vec<Token>) -> Result<Self, CursorError> {
		if tokens.is_empty() {
			return Err(CursorError::Exhausted);
		}

		let number_text = tokens
			.iter()
			.map(|token| match token {
				Token::Int(value) => Some(value.to_string().into_boxed_str()),
				Token::BigInt(text) => Some(text.clone()),
				Token::Float(value) => Some(value.to_string().into_boxed_str()),
				_ => None,
			})
			.collect();

		Ok(Self {
			tokens,
			number_text,
			idx: 0,
			advances: 0,
			cancel_after: None,
		})
	}

	/// Fail every `advance` after `count` successful ones with [`CursorError::Cancelled`].
	pub fn cancel_after(mut self, count: usize) -> Self {
		self.cancel_after = Some(count);
		self
	}

	/// Index of the current token.
	pub fn index(&self) -> usize {
		self.idx
	}

	/// Whether the cursor sits on the last token.
	pub fn is_at_end(&self) -> bool {
		self.idx + 1 == self.tokens.len()
	}

	fn current(&self) -> &Token {
		&self.tokens[self.idx]
	}

	/// Shared name handle of the current field-name token.
	pub fn field_name_arc(&self) -> Result<&Arc<str>, CursorError> {
		match self.current() {
			Token::FieldName(name) => Ok(name),
			other => Err(CursorError::WrongToken {
				expected: TokenKind::FieldName,
				actual: other.kind(),
			}),
		}
	}
}

impl TokenCursor for TokenReplay {
	fn current_kind(&self) -> TokenKind {
		self.current().kind()
	}

	fn advance(&mut self) -> Result<TokenKind, CursorError> {
		if self.cancel_after.is_some_and(|limit| self.advances >= limit) {
			return Err(CursorError::Cancelled);
		}
		if self.idx + 1 >= self.tokens.len() {
			return Err(CursorError::Exhausted);
		}

		self.idx += 1;
		self.advances += 1;
		Ok(self.current_kind())
	}

	fn field_name(&self) -> Result<&str, CursorError> {
		self.field_name_arc().map(|name| &**name)
	}

	fn text(&self) -> Result<&str, CursorError> {
		match self.current() {
			Token::String(text) => Ok(&**text),
			other => Err(CursorError::WrongToken {
				expected: TokenKind::StringValue,
				actual: other.kind(),
			}),
		}
	}

	fn int(&self) -> Result<i64, CursorError> {
		match self.current() {
			Token::Int(value) => Ok(*value),
			Token::BigInt(text) => text.parse().map_err(|_| CursorError::NumberOutOfRange { at: self.idx }),
			other => Err(CursorError::WrongToken {
				expected: TokenKind::IntValue,
				actual: other.kind(),
			}),
		}
	}

	fn number_text(&self) -> Result<&str, CursorError> {
		match &self.number_text[self.idx] {
			Some(text) => Ok(&**text),
			None => Err(CursorError::WrongToken {
				expected: TokenKind::IntValue,
				actual: self.current_kind(),
			}),
		}
	}

	fn float(&self) -> Result<f64, CursorError> {
		match self.current() {
			Token::Float(value) => Ok(*value),
			Token::Int(value) => Ok(*value as f64),
			Token::BigInt(text) => text.parse().map_err(|_| CursorError::InvalidNumber { at: self.idx }),
			other => Err(CursorError::WrongToken {
				expected: TokenKind::FloatValue,
				actual: other.kind(),
			}),
		}
	}

	fn binary(&self) -> Result<Vec<u8>, CursorError> {
		expect_kind(self.current_kind(), TokenKind::StringValue)?;
		let text = self.text()?;
		base64::decode(text).ok_or(CursorError::InvalidBase64 { at: self.idx })
	}
}

#[cfg(test)]
mod tests {
	use super::{Token, TokenReplay};
	use crate::rec::{CursorError, TokenCursor, TokenKind};

	#[test]
	fn empty_replay_is_rejected() {
		assert_eq!(TokenReplay::new(Vec::new()).err(), Some(CursorError::Exhausted));
	}

	#[test]
	fn skip_value_walks_nested_containers() {
		let mut replay = TokenReplay::new(vec![
			Token::ArrayStart,
			Token::ObjectStart,
			Token::name("a"),
			Token::ArrayStart,
			Token::Int(1),
			Token::ArrayEnd,
			Token::ObjectEnd,
			Token::ArrayEnd,
			Token::Null,
		])
		.expect("replay builds");

		replay.skip_value().expect("skip succeeds");
		assert_eq!(replay.current_kind(), TokenKind::ArrayEnd);
		assert_eq!(replay.index(), 7);
		assert_eq!(replay.advance().expect("advance"), TokenKind::Null);
		assert!(replay.is_at_end());
	}

	#[test]
	fn advance_past_end_is_exhausted() {
		let mut replay = TokenReplay::new(vec![Token::Null]).expect("replay builds");
		assert_eq!(replay.advance(), Err(CursorError::Exhausted));
	}

	#[test]
	fn cancellation_fires_after_budget() {
		let mut replay = TokenReplay::new(vec![Token::ArrayStart, Token::Int(1), Token::ArrayEnd])
			.expect("replay builds")
			.cancel_after(1);

		assert_eq!(replay.advance(), Ok(TokenKind::IntValue));
		assert_eq!(replay.advance(), Err(CursorError::Cancelled));
	}

	#[test]
	fn accessors_reject_other_kinds() {
		let replay = TokenReplay::new(vec![Token::Int(7)]).expect("replay builds");
		assert_eq!(replay.int(), Ok(7));
		assert_eq!(replay.number_text(), Ok("7"));
		assert_eq!(
			replay.text(),
			Err(CursorError::WrongToken {
				expected: TokenKind::StringValue,
				actual: TokenKind::IntValue,
			})
		);
	}

	#[test]
	fn big_integers_overflow_int_but_keep_text() {
		let replay = TokenReplay::new(vec![Token::BigInt("123456789012345678901234567890".into())]).expect("replay builds");
		assert_eq!(replay.int(), Err(CursorError::NumberOutOfRange { at: 0 }));
		assert_eq!(replay.number_text(), Ok("123456789012345678901234567890"));
	}
}
