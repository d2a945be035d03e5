use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::rec::{CursorError, JsonCursor, TokenCursor, TokenKind};

fn kinds(input: &str) -> Vec<TokenKind> {
	let mut cursor = JsonCursor::new(input.as_bytes()).expect("first token reads");
	let mut out = vec![cursor.current_kind()];
	while !cursor.is_complete() {
		out.push(cursor.advance().expect("token reads"));
	}
	cursor.finish().expect("no trailing data");
	out
}

#[test]
fn object_members_surface_as_field_names() {
	use TokenKind::*;

	assert_eq!(
		kinds(r#"{"a": 1, "b": [true, false, null], "c": {"d": "x"}, "e": 1.5}"#),
		vec![
			ObjectStart,
			FieldName,
			IntValue,
			FieldName,
			ArrayStart,
			True,
			False,
			Null,
			ArrayEnd,
			FieldName,
			ObjectStart,
			FieldName,
			StringValue,
			ObjectEnd,
			FieldName,
			FloatValue,
			ObjectEnd,
		]
	);
}

#[test]
fn empty_containers_and_root_scalars() {
	assert_eq!(kinds("{}"), vec![TokenKind::ObjectStart, TokenKind::ObjectEnd]);
	assert_eq!(kinds(" [ ] "), vec![TokenKind::ArrayStart, TokenKind::ArrayEnd]);
	assert_eq!(kinds("null"), vec![TokenKind::Null]);
	assert_eq!(kinds("-12"), vec![TokenKind::IntValue]);
}

#[test]
fn string_escapes_decode() {
	let cursor = JsonCursor::new(r#""a\"b\\c\/\né😀""#.as_bytes()).expect("string reads");
	assert_eq!(cursor.text(), Ok("a\"b\\c/\n\u{e9}\u{1F600}"));
}

#[test]
fn lone_low_surrogate_is_rejected() {
	let err = JsonCursor::new(br#""\udc00""#).err().expect("escape rejected");
	assert!(matches!(err, CursorError::InvalidEscape { at: 1 }), "got {err:?}");
}

#[test]
fn numbers_are_classified() {
	let cursor = JsonCursor::new(b"1e3").expect("number reads");
	assert_eq!(cursor.current_kind(), TokenKind::FloatValue);
	assert_eq!(cursor.float(), Ok(1000.0));
	assert!(matches!(cursor.int(), Err(CursorError::WrongToken { .. })));

	let cursor = JsonCursor::new(b"-0").expect("number reads");
	assert_eq!(cursor.current_kind(), TokenKind::IntValue);
	assert_eq!(cursor.int(), Ok(0));

	let cursor = JsonCursor::new(b"92233720368547758070").expect("number reads");
	assert_eq!(cursor.int(), Err(CursorError::NumberOutOfRange { at: 0 }));
	assert_eq!(cursor.number_text(), Ok("92233720368547758070"));
}

#[test]
fn malformed_numbers_fail() {
	for input in ["-", "1.", "1e", "-a"] {
		let err = JsonCursor::new(input.as_bytes()).err().expect("number rejected");
		assert_eq!(err, CursorError::InvalidNumber { at: 0 }, "input {input:?}");
	}
}

#[test]
fn missing_separator_reports_offset() {
	let mut cursor = JsonCursor::new(br#"{"a" 1}"#).expect("object start reads");
	let err = cursor.advance().expect_err("colon missing");
	assert_eq!(
		err,
		CursorError::UnexpectedByte {
			byte: b'1',
			at: 5,
			expected: "':'",
		}
	);
}

#[test]
fn truncated_input_is_eof() {
	let mut cursor = JsonCursor::new(br#"{"a": "#).expect("object start reads");
	assert_eq!(cursor.advance(), Ok(TokenKind::FieldName));
	assert_eq!(cursor.advance(), Err(CursorError::UnexpectedEof { at: 6 }));
}

#[test]
fn trailing_data_is_reported_by_finish() {
	let mut cursor = JsonCursor::new(b"{} x").expect("object start reads");
	assert_eq!(cursor.advance(), Ok(TokenKind::ObjectEnd));
	assert_eq!(cursor.advance(), Err(CursorError::Exhausted));
	assert_eq!(cursor.finish(), Err(CursorError::TrailingData { at: 3 }));
}

#[test]
fn skip_value_consumes_nested_member() {
	let mut cursor = JsonCursor::new(br#"{"skip": {"a": [1, {"b": []}]}, "keep": 2}"#).expect("object start reads");
	assert_eq!(cursor.advance(), Ok(TokenKind::FieldName));
	assert_eq!(cursor.advance(), Ok(TokenKind::ObjectStart));
	cursor.skip_value().expect("skip succeeds");
	assert_eq!(cursor.current_kind(), TokenKind::ObjectEnd);
	assert_eq!(cursor.advance(), Ok(TokenKind::FieldName));
	assert_eq!(cursor.field_name(), Ok("keep"));
}

#[test]
fn positions_track_lines_and_columns() {
	let mut cursor = JsonCursor::new(b"{\n  \"a\": true\n}").expect("object start reads");
	cursor.advance().expect("name reads");
	let position = cursor.position().expect("json tracks positions");
	assert_eq!((position.offset, position.line, position.column), (4, 2, 3));
}

#[test]
fn binary_reads_base64_strings() {
	let cursor = JsonCursor::new(br#""aGVsbG8=""#).expect("string reads");
	assert_eq!(cursor.binary(), Ok(b"hello".to_vec()));

	let cursor = JsonCursor::new(br#""not base64!""#).expect("string reads");
	assert_eq!(cursor.binary(), Err(CursorError::InvalidBase64 { at: 0 }));
}

#[test]
fn cancellation_stops_the_next_advance() {
	let flag = Arc::new(AtomicBool::new(false));
	let mut cursor = JsonCursor::new(br#"[1, 2]"#).expect("array start reads").with_cancel(flag.clone());
	assert_eq!(cursor.advance(), Ok(TokenKind::IntValue));
	flag.store(true, Ordering::Relaxed);
	assert_eq!(cursor.advance(), Err(CursorError::Cancelled));
}
