use std::sync::Arc;

use tokrec::rec::{FieldValue, Record, Slot, TriState, Value};

use super::{PrintOptions, record_json, render_record};

fn field(name: &str, slot: Slot) -> FieldValue {
	FieldValue { name: Arc::from(name), slot }
}

fn sample() -> Record {
	let customer = Record {
		type_name: Arc::from("Customer"),
		fields: vec![field("name", Slot::Value(Value::String("Ada".into())))],
	};
	Record {
		type_name: Arc::from("Order"),
		fields: vec![
			field("id", Slot::Value(Value::I64(7))),
			field("note", Slot::Value(Value::Null)),
			field("discount", Slot::Optional(TriState::Undefined)),
			field("customer", Slot::Value(Value::Record(Box::new(customer)))),
			field("tags", Slot::Value(Value::List(vec![Value::String("a".into()), Value::String("b".into())]))),
			field("blob", Slot::Value(Value::Binary(vec![1, 2, 3]))),
			field("total", Slot::Value(Value::BigInt("123456789012345678901234567890".into()))),
		],
	}
}

#[test]
fn tree_rendering_nests_records_and_lists() {
	let text = render_record(&sample(), PrintOptions::default());
	let expected = [
		"Order {",
		"  id = 7",
		"  note = null",
		"  discount = undefined",
		"  customer = ",
		"    Customer {",
		"      name = \"Ada\"",
		"    }",
		"  tags = ",
		"    [",
		"      \"a\"",
		"      \"b\"",
		"    ]",
		"  blob = bytes[3]",
		"  total = 123456789012345678901234567890",
		"}",
		"",
	]
	.join("\n");
	assert_eq!(text, expected);
}

#[test]
fn tree_rendering_truncates() {
	let options = PrintOptions {
		max_string_len: 2,
		max_list_items: 1,
		max_print_depth: 1,
	};
	let text = render_record(&sample(), options);
	assert!(text.contains("Customer { ... }"), "got {text}");
	assert!(text.contains("[... 2 items]"), "got {text}");

	let options = PrintOptions {
		max_string_len: 2,
		max_list_items: 1,
		max_print_depth: 8,
	};
	let text = render_record(&sample(), options);
	assert!(text.contains("\"Ad...\""), "got {text}");
	assert!(text.contains("... 1 more"), "got {text}");
}

#[test]
fn json_omits_undefined_and_stringifies_wide_values() {
	let json = record_json(&sample());
	assert_eq!(json["id"], 7);
	assert!(json["note"].is_null());
	assert!(json.get("discount").is_none());
	assert_eq!(json["customer"]["name"], "Ada");
	assert_eq!(json["tags"], serde_json::json!(["a", "b"]));
	assert_eq!(json["blob"], "AQID");
	assert_eq!(json["total"], "123456789012345678901234567890");
}
