use crate::rec::{PresenceMask, PresenceSeed};

#[test]
fn zero_fields_are_trivially_complete() {
	let mask = PresenceSeed::new(0, []).mask();
	assert!(mask.is_complete());
	assert_eq!(mask.missing_ordinals().count(), 0);
}

#[test]
fn small_schemas_use_a_word() {
	assert!(PresenceSeed::new(1, []).is_word());
	assert!(PresenceSeed::new(32, []).is_word());
	assert!(!PresenceSeed::new(33, []).is_word());
}

#[test]
fn exempt_fields_start_marked() {
	let mask = PresenceSeed::new(4, [1, 3]).mask();
	assert!(!mask.is_marked(0));
	assert!(mask.is_marked(1));
	assert!(!mask.is_marked(2));
	assert!(mask.is_marked(3));
	assert_eq!(mask.missing_ordinals().collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn marking_twice_does_not_double_count() {
	let mut mask = PresenceSeed::new(2, []).mask();
	mask.mark(0);
	mask.mark(0);
	assert!(!mask.is_complete());
	assert_eq!(mask.missing_ordinals().collect::<Vec<_>>(), vec![1]);
	mask.mark(1);
	assert!(mask.is_complete());
}

#[test]
fn full_word_completes() {
	let mut mask = PresenceSeed::new(32, []).mask();
	for ordinal in 0..32 {
		assert!(!mask.is_complete());
		mask.mark(ordinal);
	}
	assert!(mask.is_complete());
}

#[test]
fn out_of_range_marks_are_ignored() {
	let mut mask = PresenceSeed::new(3, [0, 1]).mask();
	mask.mark(5);
	mask.mark(64);
	assert!(!mask.is_complete());
	assert_eq!(mask.missing_ordinals().collect::<Vec<_>>(), vec![2]);

	let mut wide = PresenceSeed::new(40, 0..39).mask();
	wide.mark(40);
	wide.mark(1000);
	assert!(!wide.is_complete());
}

#[test]
fn wide_mask_reports_exact_missing_field() {
	let mut mask = PresenceSeed::new(40, []).mask();
	assert!(matches!(mask, PresenceMask::Wide { .. }));
	for ordinal in (0..40).filter(|ordinal| *ordinal != 35) {
		mask.mark(ordinal);
	}
	assert!(!mask.is_complete());
	assert_eq!(mask.missing_ordinals().collect::<Vec<_>>(), vec![35]);

	mask.mark(35);
	assert!(mask.is_complete());
}

#[test]
fn wide_mask_spanning_word_boundary() {
	let mut mask = PresenceSeed::new(130, (0..130).filter(|ordinal| ordinal % 2 == 0)).mask();
	let missing: Vec<_> = mask.missing_ordinals().collect();
	assert_eq!(missing.len(), 65);
	assert_eq!(missing.first(), Some(&1));
	assert_eq!(missing.last(), Some(&129));

	for ordinal in missing {
		mask.mark(ordinal);
	}
	assert!(mask.is_complete());
}

#[test]
fn word_and_wide_agree() {
	let exempt = [2, 5, 7];
	let mut word = PresenceSeed::new(10, exempt).mask();
	let mut wide = PresenceSeed::new(40, exempt).mask();
	for ordinal in [0, 1, 3, 4, 6] {
		word.mark(ordinal);
		wide.mark(ordinal);
	}

	let word_missing: Vec<_> = word.missing_ordinals().collect();
	let wide_missing: Vec<_> = wide.missing_ordinals().take_while(|ordinal| *ordinal < 10).collect();
	assert_eq!(word_missing, vec![8, 9]);
	assert_eq!(word_missing, wide_missing);
}

#[test]
fn missing_ordinals_iterator_is_consumed_once() {
	let mask = PresenceSeed::new(3, []).mask();
	let mut missing = mask.missing_ordinals();
	assert_eq!(missing.by_ref().count(), 3);
	assert_eq!(missing.next(), None);
}
