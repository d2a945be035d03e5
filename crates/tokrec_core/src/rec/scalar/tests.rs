use uuid::Uuid;

use crate::rec::scalar::{ScalarFault, decode_scalar};
use crate::rec::{ScalarKind, Token, TokenKind, TokenReplay, TokenSet, Value};

fn one(token: Token) -> TokenReplay {
	TokenReplay::new(vec![token]).expect("replay has a token")
}

#[test]
fn int_decoder_accepts_int_and_rejects_string() {
	let value = decode_scalar(ScalarKind::I32, &one(Token::Int(-7))).expect("int decodes");
	assert_eq!(value, Value::I32(-7));

	match decode_scalar(ScalarKind::I32, &one(Token::string("7"))) {
		Err(ScalarFault::Mismatch { expected, actual }) => {
			assert_eq!(expected, TokenSet::INT);
			assert_eq!(actual, TokenKind::StringValue);
		}
		other => panic!("expected mismatch, got {other:?}"),
	}
}

#[test]
fn floats_accept_integral_tokens() {
	assert_eq!(decode_scalar(ScalarKind::F64, &one(Token::Int(3))).expect("f64 decodes"), Value::F64(3.0));
	assert_eq!(decode_scalar(ScalarKind::F32, &one(Token::Float(0.5))).expect("f32 decodes"), Value::F32(0.5));
	assert!(matches!(decode_scalar(ScalarKind::F32, &one(Token::Float(1e300))), Err(ScalarFault::Invalid(_))));
}

#[test]
fn narrow_integers_reject_overflow() {
	assert_eq!(decode_scalar(ScalarKind::I8, &one(Token::Int(127))).expect("i8 decodes"), Value::I8(127));
	assert!(matches!(decode_scalar(ScalarKind::I8, &one(Token::Int(128))), Err(ScalarFault::Invalid(_))));
	assert!(matches!(decode_scalar(ScalarKind::I16, &one(Token::Int(-40_000))), Err(ScalarFault::Invalid(_))));
	assert!(matches!(decode_scalar(ScalarKind::I64, &one(Token::BigInt("99999999999999999999".into()))), Err(ScalarFault::Invalid(_))));
}

#[test]
fn bigint_is_canonical_text() {
	let value = decode_scalar(ScalarKind::BigInt, &one(Token::BigInt("-000123456789012345678901234567890".into()))).expect("bigint decodes");
	assert_eq!(value, Value::BigInt("-123456789012345678901234567890".into()));

	let zero = decode_scalar(ScalarKind::BigInt, &one(Token::BigInt("-0".into()))).expect("bigint decodes");
	assert_eq!(zero, Value::BigInt("0".into()));
}

#[test]
fn bool_reads_both_literals() {
	assert_eq!(decode_scalar(ScalarKind::Bool, &one(Token::Bool(true))).expect("bool decodes"), Value::Bool(true));
	assert_eq!(decode_scalar(ScalarKind::Bool, &one(Token::Bool(false))).expect("bool decodes"), Value::Bool(false));
	assert!(matches!(decode_scalar(ScalarKind::Bool, &one(Token::Int(1))), Err(ScalarFault::Mismatch { .. })));
}

#[test]
fn uuid_and_binary_parse_strings() {
	let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
	let value = decode_scalar(ScalarKind::Uuid, &one(Token::string(text))).expect("uuid decodes");
	assert_eq!(value, Value::Uuid(Uuid::parse_str(text).expect("literal parses")));
	assert!(matches!(decode_scalar(ScalarKind::Uuid, &one(Token::string("not-a-uuid"))), Err(ScalarFault::Invalid(_))));

	let value = decode_scalar(ScalarKind::Binary, &one(Token::string("AQID"))).expect("binary decodes");
	assert_eq!(value, Value::Binary(vec![1, 2, 3]));
	assert!(matches!(decode_scalar(ScalarKind::Binary, &one(Token::string("A"))), Err(ScalarFault::Invalid(_))));
}

#[test]
fn binary_rejects_bad_padding_and_stray_bits() {
	for text in ["Zm9v=", "Zg=", "Zh==", "Zh"] {
		assert!(matches!(decode_scalar(ScalarKind::Binary, &one(Token::string(text))), Err(ScalarFault::Invalid(_))), "{text} should be rejected");
	}
	assert_eq!(decode_scalar(ScalarKind::Binary, &one(Token::string("Zg=="))).expect("binary decodes"), Value::Binary(b"f".to_vec()));
	assert_eq!(decode_scalar(ScalarKind::Binary, &one(Token::string("Zg"))).expect("binary decodes"), Value::Binary(b"f".to_vec()));
}

#[test]
fn float_sets_are_int_plus_float() {
	let number = TokenSet::INT.union(TokenSet::of(&[TokenKind::FloatValue]));
	assert_eq!(number, TokenSet::NUMBER);
	assert_eq!(ScalarKind::F64.accepts(), number);
	assert_eq!(number.to_string(), "integer | float");
	assert!(!number.is_empty());
	assert!(TokenSet::EMPTY.union(TokenSet::EMPTY).is_empty());
}

#[test]
fn names_round_trip_through_lookup() {
	for kind in ScalarKind::ALL {
		assert_eq!(ScalarKind::from_name(kind.as_str()), Some(kind));
	}
	assert_eq!(ScalarKind::from_name("int"), None);
}
