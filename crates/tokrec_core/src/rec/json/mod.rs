use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::rec::token::expect_kind;
use crate::rec::{CursorError, Position, TokenCursor, TokenKind, base64};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
	Object,
	Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
	/// Any value: the root, or after a `:`.
	Value,
	/// A value or `]` right after `[`.
	ValueOrEnd,
	/// A member name or `}` right after `{`.
	KeyOrEnd,
	/// `,` or the closing token of the innermost container.
	AfterValue,
	/// Root value complete.
	Done,
}

/// Pull tokenizer over JSON text.
///
/// Object member names surface as [`TokenKind::FieldName`] tokens; the `:` and `,`
/// punctuation is consumed internally. The cursor is primed on the first token by
/// [`JsonCursor::new`].
pub struct JsonCursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	start: usize,
	kind: TokenKind,
	scratch: String,
	number_end: usize,
	stack: Vec<Frame>,
	expect: Expect,
	cancel: Option<Arc<AtomicBool>>,
}

impl<'a> JsonCursor<'a> {
	/// Create a cursor and read the first token.
	pub fn new(bytes: &'a [u8]) -> Result<Self, CursorError> {
		let mut cursor = Self {
			bytes,
			pos: 0,
			start: 0,
			kind: TokenKind::Null,
			scratch: String::new(),
			number_end: 0,
			stack: Vec::new(),
			expect: Expect::Value,
			cancel: None,
		};
		cursor.advance()?;
		Ok(cursor)
	}

	/// Make every later `advance` fail with [`CursorError::Cancelled`] once `flag` is set.
	pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
		self.cancel = Some(flag);
		self
	}

	/// Whether the root value has been read completely.
	pub fn is_complete(&self) -> bool {
		self.expect == Expect::Done
	}

	/// Nesting depth of the current position.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// Check that the root value is complete and only whitespace follows it.
	pub fn finish(&mut self) -> Result<(), CursorError> {
		if self.expect != Expect::Done {
			return Err(CursorError::UnexpectedEof { at: self.bytes.len() });
		}
		self.skip_ws();
		if self.pos < self.bytes.len() {
			return Err(CursorError::TrailingData { at: self.pos });
		}
		Ok(())
	}

	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	fn skip_ws(&mut self) {
		while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
			self.pos += 1;
		}
	}

	fn unexpected(&self, expected: &'static str) -> CursorError {
		match self.peek() {
			Some(byte) => CursorError::UnexpectedByte { byte, at: self.pos, expected },
			None => CursorError::UnexpectedEof { at: self.pos },
		}
	}

	fn after_value(&mut self) {
		self.expect = if self.stack.is_empty() { Expect::Done } else { Expect::AfterValue };
	}

	fn close(&mut self, kind: TokenKind) {
		self.start = self.pos;
		self.pos += 1;
		self.stack.pop();
		self.kind = kind;
		self.after_value();
	}

	fn read_key(&mut self) -> Result<(), CursorError> {
		if self.peek() != Some(b'"') {
			return Err(self.unexpected("'\"'"));
		}
		self.start = self.pos;
		self.read_string()?;
		self.skip_ws();
		if self.peek() != Some(b':') {
			return Err(self.unexpected("':'"));
		}
		self.pos += 1;
		self.kind = TokenKind::FieldName;
		self.expect = Expect::Value;
		Ok(())
	}

	fn read_value(&mut self) -> Result<(), CursorError> {
		self.start = self.pos;
		let Some(byte) = self.peek() else {
			return Err(CursorError::UnexpectedEof { at: self.pos });
		};

		match byte {
			b'{' => {
				self.pos += 1;
				self.stack.push(Frame::Object);
				self.kind = TokenKind::ObjectStart;
				self.expect = Expect::KeyOrEnd;
				return Ok(());
			}
			b'[' => {
				self.pos += 1;
				self.stack.push(Frame::Array);
				self.kind = TokenKind::ArrayStart;
				self.expect = Expect::ValueOrEnd;
				return Ok(());
			}
			b'"' => {
				self.read_string()?;
				self.kind = TokenKind::StringValue;
			}
			b'-' | b'0'..=b'9' => {
				self.kind = self.read_number()?;
			}
			b't' => self.kind = self.read_literal(b"true", TokenKind::True)?,
			b'f' => self.kind = self.read_literal(b"false", TokenKind::False)?,
			b'n' => self.kind = self.read_literal(b"null", TokenKind::Null)?,
			_ => return Err(self.unexpected("value")),
		}
		self.after_value();
		Ok(())
	}

	fn read_literal(&mut self, word: &'static [u8], kind: TokenKind) -> Result<TokenKind, CursorError> {
		let end = self.pos + word.len();
		if self.bytes.get(self.pos..end) != Some(word) {
			if end > self.bytes.len() && self.bytes[self.pos..].iter().zip(word).all(|(a, b)| a == b) {
				return Err(CursorError::UnexpectedEof { at: self.bytes.len() });
			}
			return Err(self.unexpected("literal"));
		}
		self.pos = end;
		Ok(kind)
	}

	fn read_number(&mut self) -> Result<TokenKind, CursorError> {
		let at = self.pos;
		let invalid = CursorError::InvalidNumber { at };
		let mut is_float = false;

		if self.peek() == Some(b'-') {
			self.pos += 1;
		}
		match self.peek() {
			Some(b'0') => self.pos += 1,
			Some(b'1'..=b'9') => self.skip_digits(),
			_ => return Err(invalid),
		}
		if self.peek() == Some(b'.') {
			self.pos += 1;
			if !matches!(self.peek(), Some(b'0'..=b'9')) {
				return Err(invalid);
			}
			self.skip_digits();
			is_float = true;
		}
		if let Some(b'e' | b'E') = self.peek() {
			self.pos += 1;
			if let Some(b'+' | b'-') = self.peek() {
				self.pos += 1;
			}
			if !matches!(self.peek(), Some(b'0'..=b'9')) {
				return Err(invalid);
			}
			self.skip_digits();
			is_float = true;
		}

		self.number_end = self.pos;
		Ok(if is_float { TokenKind::FloatValue } else { TokenKind::IntValue })
	}

	fn skip_digits(&mut self) {
		while let Some(b'0'..=b'9') = self.peek() {
			self.pos += 1;
		}
	}

	fn read_string(&mut self) -> Result<(), CursorError> {
		let at = self.pos;
		self.pos += 1;
		self.scratch.clear();

		loop {
			let run_start = self.pos;
			while let Some(byte) = self.peek() {
				if byte == b'"' || byte == b'\\' || byte < 0x20 {
					break;
				}
				self.pos += 1;
			}
			let run = std::str::from_utf8(&self.bytes[run_start..self.pos]).map_err(|_| CursorError::InvalidUtf8 { at })?;
			self.scratch.push_str(run);

			match self.peek() {
				None => return Err(CursorError::UnexpectedEof { at: self.pos }),
				Some(b'"') => {
					self.pos += 1;
					return Ok(());
				}
				Some(b'\\') => self.read_escape()?,
				Some(_) => return Err(self.unexpected("string character")),
			}
		}
	}

	fn read_escape(&mut self) -> Result<(), CursorError> {
		let at = self.pos;
		self.pos += 1;
		let Some(byte) = self.peek() else {
			return Err(CursorError::UnexpectedEof { at: self.pos });
		};
		self.pos += 1;

		let ch = match byte {
			b'"' => '"',
			b'\\' => '\\',
			b'/' => '/',
			b'b' => '\u{8}',
			b'f' => '\u{c}',
			b'n' => '\n',
			b'r' => '\r',
			b't' => '\t',
			b'u' => {
				let unit = self.read_hex4(at)?;
				match unit {
					0xD800..=0xDBFF => {
						if self.bytes.get(self.pos..self.pos + 2) != Some(b"\\u") {
							return Err(CursorError::InvalidEscape { at });
						}
						self.pos += 2;
						let low = self.read_hex4(at)?;
						if !(0xDC00..=0xDFFF).contains(&low) {
							return Err(CursorError::InvalidEscape { at });
						}
						let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
						char::from_u32(code).ok_or(CursorError::InvalidEscape { at })?
					}
					0xDC00..=0xDFFF => return Err(CursorError::InvalidEscape { at }),
					_ => char::from_u32(u32::from(unit)).ok_or(CursorError::InvalidEscape { at })?,
				}
			}
			_ => return Err(CursorError::InvalidEscape { at }),
		};
		self.scratch.push(ch);
		Ok(())
	}

	fn read_hex4(&mut self, at: usize) -> Result<u16, CursorError> {
		let Some(raw) = self.bytes.get(self.pos..self.pos + 4) else {
			return Err(CursorError::UnexpectedEof { at: self.bytes.len() });
		};
		let text = std::str::from_utf8(raw).map_err(|_| CursorError::InvalidEscape { at })?;
		let unit = u16::from_str_radix(text, 16).map_err(|_| CursorError::InvalidEscape { at })?;
		self.pos += 4;
		Ok(unit)
	}

	fn number_lexeme(&self) -> Result<&str, CursorError> {
		std::str::from_utf8(&self.bytes[self.start..self.number_end]).map_err(|_| CursorError::InvalidNumber { at: self.start })
	}
}

impl TokenCursor for JsonCursor<'_> {
	fn current_kind(&self) -> TokenKind {
		self.kind
	}

	fn advance(&mut self) -> Result<TokenKind, CursorError> {
		if self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
			return Err(CursorError::Cancelled);
		}

		self.skip_ws();
		match self.expect {
			Expect::Done => return Err(CursorError::Exhausted),
			Expect::Value => self.read_value()?,
			Expect::ValueOrEnd => {
				if self.peek() == Some(b']') {
					self.close(TokenKind::ArrayEnd);
				} else {
					self.read_value()?;
				}
			}
			Expect::KeyOrEnd => {
				if self.peek() == Some(b'}') {
					self.close(TokenKind::ObjectEnd);
				} else {
					self.read_key()?;
				}
			}
			Expect::AfterValue => match (self.stack.last().copied(), self.peek()) {
				(Some(Frame::Object), Some(b',')) => {
					self.pos += 1;
					self.skip_ws();
					self.read_key()?;
				}
				(Some(Frame::Object), Some(b'}')) => self.close(TokenKind::ObjectEnd),
				(Some(Frame::Object), _) => return Err(self.unexpected("',' or '}'")),
				(Some(Frame::Array), Some(b',')) => {
					self.pos += 1;
					self.skip_ws();
					self.read_value()?;
				}
				(Some(Frame::Array), Some(b']')) => self.close(TokenKind::ArrayEnd),
				(Some(Frame::Array), _) => return Err(self.unexpected("',' or ']'")),
				(None, _) => return Err(CursorError::Exhausted),
			},
		}
		Ok(self.kind)
	}

	fn field_name(&self) -> Result<&str, CursorError> {
		expect_kind(self.kind, TokenKind::FieldName)?;
		Ok(&self.scratch)
	}

	fn text(&self) -> Result<&str, CursorError> {
		expect_kind(self.kind, TokenKind::StringValue)?;
		Ok(&self.scratch)
	}

	fn int(&self) -> Result<i64, CursorError> {
		expect_kind(self.kind, TokenKind::IntValue)?;
		self.number_lexeme()?
			.parse()
			.map_err(|_| CursorError::NumberOutOfRange { at: self.start })
	}

	fn number_text(&self) -> Result<&str, CursorError> {
		if !matches!(self.kind, TokenKind::IntValue | TokenKind::FloatValue) {
			return Err(CursorError::WrongToken {
				expected: TokenKind::IntValue,
				actual: self.kind,
			});
		}
		self.number_lexeme()
	}

	fn float(&self) -> Result<f64, CursorError> {
		let value: f64 = self.number_text()?.parse().map_err(|_| CursorError::InvalidNumber { at: self.start })?;
		if value.is_infinite() {
			return Err(CursorError::NumberOutOfRange { at: self.start });
		}
		Ok(value)
	}

	fn binary(&self) -> Result<Vec<u8>, CursorError> {
		expect_kind(self.kind, TokenKind::StringValue)?;
		base64::decode(&self.scratch).ok_or(CursorError::InvalidBase64 { at: self.start })
	}

	fn position(&self) -> Option<Position> {
		let before = &self.bytes[..self.start.min(self.bytes.len())];
		let line = before.iter().filter(|byte| **byte == b'\n').count() + 1;
		let line_start = before.iter().rposition(|byte| *byte == b'\n').map_or(0, |idx| idx + 1);
		Some(Position {
			offset: self.start,
			line: u32::try_from(line).unwrap_or(u32::MAX),
			column: u32::try_from(self.start - line_start + 1).unwrap_or(u32::MAX),
		})
	}
}

#[cfg(test)]
mod tests;
