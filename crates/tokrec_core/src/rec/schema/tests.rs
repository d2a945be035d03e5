use crate::rec::{FieldDef, FieldKind, FieldType, ScalarKind, SchemaError, SchemaSet, TypeDef};

fn order_set() -> SchemaSet {
	SchemaSet::builder()
		.add(
			TypeDef::new("Order")
				.required("id", ScalarKind::I64)
				.nullable("note", ScalarKind::String)
				.tri_state("discount", ScalarKind::F64)
				.required("customer", FieldType::named("Customer"))
				.nullable("parent", FieldType::named("Order"))
				.required("tags", FieldType::list(ScalarKind::String)),
		)
		.add(TypeDef::new("Customer").required("name", ScalarKind::String))
		.build()
		.expect("schema set builds")
}

#[test]
fn fields_resolve_in_declaration_order() {
	let set = order_set();
	let order = set.schema("Order").expect("order schema exists");

	let names: Vec<_> = order.fields().iter().map(|field| field.name()).collect();
	assert_eq!(names, ["id", "note", "discount", "customer", "parent", "tags"]);
	for (idx, field) in order.fields().iter().enumerate() {
		assert_eq!(field.ordinal(), idx);
		assert_eq!(order.ordinal_of(field.name()), Some(idx));
	}

	let customer = set.id_of("Customer").expect("customer id exists");
	assert_eq!(order.field(3).map(|field| field.kind()), Some(&FieldKind::Nested(customer)));
	assert_eq!(order.field(4).map(|field| field.kind()), Some(&FieldKind::Recursive));
	assert_eq!(
		order.field(5).map(|field| field.kind()),
		Some(&FieldKind::List(Box::new(FieldKind::Scalar(ScalarKind::String))))
	);
	assert_eq!(set.describe(&FieldKind::List(Box::new(FieldKind::Recursive)), order), "Order[]");
}

#[test]
fn presence_seed_marks_optional_fields() {
	let set = order_set();
	let order = set.schema("Order").expect("order schema exists");
	let mask = order.presence();

	assert!(order.seed().is_word());
	assert_eq!(mask.missing_ordinals().collect::<Vec<_>>(), vec![0, 3, 5]);
}

#[test]
fn explicit_ordinals_reorder_fields() {
	let set = SchemaSet::builder()
		.add(
			TypeDef::new("Pair")
				.field(FieldDef::new("second", ScalarKind::I32).at(1))
				.field(FieldDef::new("first", ScalarKind::I32).at(0)),
		)
		.build()
		.expect("schema set builds");
	let pair = set.schema("Pair").expect("pair schema exists");

	assert_eq!(pair.field(0).map(|field| field.name()), Some("first"));
	assert_eq!(pair.ordinal_of("second"), Some(1));
}

#[test]
fn invalid_ordinals_are_rejected() {
	let mixed = SchemaSet::builder()
		.add(
			TypeDef::new("T")
				.field(FieldDef::new("a", ScalarKind::I32).at(0))
				.field(FieldDef::new("b", ScalarKind::I32)),
		)
		.build();
	assert!(matches!(mixed, Err(SchemaError::MixedOrdinals { .. })));

	let duplicate = SchemaSet::builder()
		.add(
			TypeDef::new("T")
				.field(FieldDef::new("a", ScalarKind::I32).at(0))
				.field(FieldDef::new("b", ScalarKind::I32).at(0)),
		)
		.build();
	assert!(matches!(duplicate, Err(SchemaError::DuplicateOrdinal { ordinal: 0, .. })));

	let out_of_range = SchemaSet::builder()
		.add(TypeDef::new("T").field(FieldDef::new("a", ScalarKind::I32).at(1)))
		.build();
	assert!(matches!(out_of_range, Err(SchemaError::OrdinalOutOfRange { ordinal: 1, count: 1, .. })));
}

#[test]
fn duplicate_names_are_rejected() {
	let fields = SchemaSet::builder()
		.add(TypeDef::new("T").required("a", ScalarKind::I32).nullable("a", ScalarKind::String))
		.build();
	assert!(matches!(fields, Err(SchemaError::DuplicateField { .. })));

	let types = SchemaSet::builder().add(TypeDef::new("T")).add(TypeDef::new("T")).build();
	assert!(matches!(types, Err(SchemaError::DuplicateType { .. })));
}

#[test]
fn unknown_references_are_rejected() {
	let result = SchemaSet::builder()
		.add(TypeDef::new("T").required("other", FieldType::list(FieldType::named("Missing"))))
		.build();
	match result {
		Err(SchemaError::UnknownType { type_name, field, target }) => {
			assert_eq!((type_name.as_str(), field.as_str(), target.as_str()), ("T", "other", "Missing"));
		}
		other => panic!("expected unknown type error, got {other:?}"),
	}
}

#[test]
fn mutually_recursive_types_resolve() {
	let set = SchemaSet::builder()
		.add(TypeDef::new("A").nullable("b", FieldType::named("B")))
		.add(TypeDef::new("B").nullable("a", FieldType::named("A")))
		.build()
		.expect("schema set builds");

	let a = set.id_of("A").expect("a exists");
	let b = set.id_of("B").expect("b exists");
	assert_eq!(set.get(a).and_then(|schema| schema.field(0)).map(|field| field.kind()), Some(&FieldKind::Nested(b)));
	assert_eq!(set.get(b).and_then(|schema| schema.field(0)).map(|field| field.kind()), Some(&FieldKind::Nested(a)));
}

#[test]
fn schema_sets_are_shareable_across_threads() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<SchemaSet>();

	let set = std::sync::Arc::new(order_set());
	let handles: Vec<_> = (0..4)
		.map(|_| {
			let set = set.clone();
			std::thread::spawn(move || set.schema("Order").map(|schema| schema.len()))
		})
		.collect();
	for handle in handles {
		assert_eq!(handle.join().expect("thread joins"), Some(6));
	}
}
