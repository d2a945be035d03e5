use std::fmt;

use crate::rec::CursorError;

/// Lexical token kinds produced by a [`TokenCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// Start of an object (`{`).
	ObjectStart,
	/// End of an object (`}`).
	ObjectEnd,
	/// Object member name.
	FieldName,
	/// String scalar.
	StringValue,
	/// Integral number scalar.
	IntValue,
	/// Number scalar with a fraction or exponent.
	FloatValue,
	/// Boolean `true`.
	True,
	/// Boolean `false`.
	False,
	/// Explicit null.
	Null,
	/// Start of an array (`[`).
	ArrayStart,
	/// End of an array (`]`).
	ArrayEnd,
}

impl TokenKind {
	/// Every token kind, in declaration order.
	pub const ALL: [TokenKind; 11] = [
		Self::ObjectStart,
		Self::ObjectEnd,
		Self::FieldName,
		Self::StringValue,
		Self::IntValue,
		Self::FloatValue,
		Self::True,
		Self::False,
		Self::Null,
		Self::ArrayStart,
		Self::ArrayEnd,
	];

	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ObjectStart => "object start",
			Self::ObjectEnd => "object end",
			Self::FieldName => "field name",
			Self::StringValue => "string",
			Self::IntValue => "integer",
			Self::FloatValue => "float",
			Self::True => "true",
			Self::False => "false",
			Self::Null => "null",
			Self::ArrayStart => "array start",
			Self::ArrayEnd => "array end",
		}
	}

	/// Whether this token opens a container that `skip_value` must walk.
	pub fn opens_container(self) -> bool {
		matches!(self, Self::ObjectStart | Self::ArrayStart)
	}

	fn bit(self) -> u16 {
		1 << (self as u16)
	}
}

impl fmt::Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Small set of token kinds, used to describe what a decoder accepts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet(u16);

impl TokenSet {
	/// Empty set.
	pub const EMPTY: TokenSet = TokenSet(0);
	/// String scalars only.
	pub const STRING: TokenSet = TokenSet::of(&[TokenKind::StringValue]);
	/// Boolean literals.
	pub const BOOL: TokenSet = TokenSet::of(&[TokenKind::True, TokenKind::False]);
	/// Integral numbers only.
	pub const INT: TokenSet = TokenSet::of(&[TokenKind::IntValue]);
	/// Any number; integral values are accepted where floats are expected.
	pub const NUMBER: TokenSet = TokenSet::of(&[TokenKind::IntValue, TokenKind::FloatValue]);
	/// Object start.
	pub const OBJECT: TokenSet = TokenSet::of(&[TokenKind::ObjectStart]);
	/// Array start.
	pub const ARRAY: TokenSet = TokenSet::of(&[TokenKind::ArrayStart]);
	/// What may follow `{` or a member value.
	pub const FIELD_OR_END: TokenSet = TokenSet::of(&[TokenKind::FieldName, TokenKind::ObjectEnd]);

	/// Build a set from a list of kinds.
	pub const fn of(kinds: &[TokenKind]) -> Self {
		let mut bits = 0_u16;
		let mut idx = 0;
		while idx < kinds.len() {
			bits |= 1 << (kinds[idx] as u16);
			idx += 1;
		}
		Self(bits)
	}

	/// Whether `kind` is a member.
	pub fn contains(self, kind: TokenKind) -> bool {
		self.0 & kind.bit() != 0
	}

	/// Set union.
	pub fn union(self, other: TokenSet) -> Self {
		Self(self.0 | other.0)
	}

	/// Whether the set has no members.
	pub fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// Iterate members in declaration order.
	pub fn iter(self) -> impl Iterator<Item = TokenKind> {
		TokenKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
	}
}

impl fmt::Debug for TokenSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl fmt::Display for TokenSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for kind in self.iter() {
			if !first {
				f.write_str(" | ")?;
			}
			first = false;
			f.write_str(kind.as_str())?;
		}
		if first {
			f.write_str("nothing")?;
		}
		Ok(())
	}
}

/// Location of the current token inside the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
	/// Byte offset of the token start.
	pub offset: usize,
	/// 1-based line.
	pub line: u32,
	/// 1-based column, counted in bytes.
	pub column: u32,
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "line {}, column {} (offset {})", self.line, self.column, self.offset)
	}
}

/// Pull cursor over a lexical token stream.
///
/// A cursor always sits on one token. Scalar accessors are only valid while the current
/// token has the matching kind and return [`CursorError::WrongToken`] otherwise. After a
/// value has been consumed the cursor rests on its last token (the scalar itself, or the
/// closing `}`/`]` of a container); callers `advance` past it.
pub trait TokenCursor {
	/// Kind of the current token.
	fn current_kind(&self) -> TokenKind;

	/// Move to the next token and return its kind.
	fn advance(&mut self) -> Result<TokenKind, CursorError>;

	/// Name of the current [`TokenKind::FieldName`] token.
	fn field_name(&self) -> Result<&str, CursorError>;

	/// Text of the current [`TokenKind::StringValue`] token.
	fn text(&self) -> Result<&str, CursorError>;

	/// Value of the current [`TokenKind::IntValue`] token.
	fn int(&self) -> Result<i64, CursorError>;

	/// Source text of the current number token, for arbitrary-precision reads.
	fn number_text(&self) -> Result<&str, CursorError>;

	/// Value of the current number token as a double.
	fn float(&self) -> Result<f64, CursorError>;

	/// Binary payload carried by the current string token.
	fn binary(&self) -> Result<Vec<u8>, CursorError>;

	/// Location of the current token, when the source tracks one.
	fn position(&self) -> Option<Position> {
		None
	}

	/// Structurally consume the current value.
	///
	/// Scalars are left in place; containers are walked until the matching end token.
	fn skip_value(&mut self) -> Result<(), CursorError> {
		if !self.current_kind().opens_container() {
			return Ok(());
		}

		let mut depth = 1_usize;
		while depth > 0 {
			match self.advance()? {
				TokenKind::ObjectStart | TokenKind::ArrayStart => depth += 1,
				TokenKind::ObjectEnd | TokenKind::ArrayEnd => depth -= 1,
				_ => {}
			}
		}
		Ok(())
	}
}

impl<C: TokenCursor + ?Sized> TokenCursor for &mut C {
	fn current_kind(&self) -> TokenKind {
		(**self).current_kind()
	}

	fn advance(&mut self) -> Result<TokenKind, CursorError> {
		(**self).advance()
	}

	fn field_name(&self) -> Result<&str, CursorError> {
		(**self).field_name()
	}

	fn text(&self) -> Result<&str, CursorError> {
		(**self).text()
	}

	fn int(&self) -> Result<i64, CursorError> {
		(**self).int()
	}

	fn number_text(&self) -> Result<&str, CursorError> {
		(**self).number_text()
	}

	fn float(&self) -> Result<f64, CursorError> {
		(**self).float()
	}

	fn binary(&self) -> Result<Vec<u8>, CursorError> {
		(**self).binary()
	}

	fn position(&self) -> Option<Position> {
		(**self).position()
	}

	fn skip_value(&mut self) -> Result<(), CursorError> {
		(**self).skip_value()
	}
}

/// Fail with [`CursorError::WrongToken`] unless the current token is `expected`.
pub(crate) fn expect_kind(actual: TokenKind, expected: TokenKind) -> Result<(), CursorError> {
	if actual != expected {
		return Err(CursorError::WrongToken { expected, actual });
	}
	Ok(())
}
