/// Widest schema tracked in a single inline word.
pub const WORD_BITS: usize = 32;

const WIDE_BITS: usize = 64;

/// Initial presence state for a schema, chosen once when the schema is built.
///
/// Nullable and tri-state fields are pre-marked; only required fields start unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceSeed {
	/// Up to [`WORD_BITS`] fields.
	Word {
		/// Pre-marked bits.
		seeded: u32,
		/// All-ones pattern for the field count.
		full: u32,
	},
	/// More than [`WORD_BITS`] fields.
	Wide {
		/// Pre-marked bits, 64 per word.
		seeded: Box<[u64]>,
		/// Field count.
		len: usize,
	},
}

impl PresenceSeed {
	/// Build the seed for `len` fields, pre-marking every ordinal in `exempt`.
	pub fn new(len: usize, exempt: impl IntoIterator<Item = usize>) -> Self {
		if len <= WORD_BITS {
			let full = if len == WORD_BITS { u32::MAX } else { (1_u32 << len) - 1 };
			let seeded = exempt.into_iter().filter(|ordinal| *ordinal < len).fold(0_u32, |acc, ordinal| acc | (1 << ordinal));
			return Self::Word { seeded, full };
		}

		let mut seeded = vec![0_u64; len.div_ceil(WIDE_BITS)];
		for ordinal in exempt.into_iter().filter(|ordinal| *ordinal < len) {
			seeded[ordinal / WIDE_BITS] |= 1 << (ordinal % WIDE_BITS);
		}
		Self::Wide {
			seeded: seeded.into_boxed_slice(),
			len,
		}
	}

	/// Whether this seed uses the inline-word representation.
	pub fn is_word(&self) -> bool {
		matches!(self, Self::Word { .. })
	}

	/// Number of tracked fields.
	pub fn len(&self) -> usize {
		match self {
			Self::Word { full, .. } => full.count_ones() as usize,
			Self::Wide { len, .. } => *len,
		}
	}

	/// Whether no fields are tracked.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Fresh per-call mask in the seeded state.
	pub fn mask(&self) -> PresenceMask {
		match self {
			Self::Word { seeded, full } => PresenceMask::Word { bits: *seeded, full: *full },
			Self::Wide { seeded, len } => PresenceMask::Wide {
				words: seeded.to_vec(),
				len: *len,
			},
		}
	}
}

/// Per-call record of which fields have been satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceMask {
	/// Inline word.
	Word {
		/// Marked bits.
		bits: u32,
		/// All-ones pattern for the field count.
		full: u32,
	},
	/// Growable bit-vector.
	Wide {
		/// Marked bits, 64 per word.
		words: Vec<u64>,
		/// Field count.
		len: usize,
	},
}

impl PresenceMask {
	/// Mark `ordinal` as seen. Idempotent; out-of-range ordinals are ignored.
	pub fn mark(&mut self, ordinal: usize) {
		match self {
			Self::Word { bits, full } => {
				if ordinal < WORD_BITS {
					*bits |= (1 << ordinal) & *full;
				}
			}
			Self::Wide { words, len } => {
				if ordinal < *len {
					words[ordinal / WIDE_BITS] |= 1 << (ordinal % WIDE_BITS);
				}
			}
		}
	}

	/// Whether `ordinal` is marked.
	pub fn is_marked(&self, ordinal: usize) -> bool {
		match self {
			Self::Word { bits, full } => ordinal < WORD_BITS && (*bits & *full) & (1 << ordinal) != 0,
			Self::Wide { words, len } => ordinal < *len && words[ordinal / WIDE_BITS] & (1 << (ordinal % WIDE_BITS)) != 0,
		}
	}

	/// Whether every field is marked.
	pub fn is_complete(&self) -> bool {
		match self {
			Self::Word { bits, full } => bits == full,
			Self::Wide { words, len } => words.iter().enumerate().all(|(idx, word)| word ^ full_word(*len, idx) == 0),
		}
	}

	/// Number of tracked fields.
	pub fn len(&self) -> usize {
		match self {
			Self::Word { full, .. } => full.count_ones() as usize,
			Self::Wide { len, .. } => *len,
		}
	}

	/// Whether no fields are tracked.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Lazily enumerate unmarked ordinals in ascending order.
	pub fn missing_ordinals(&self) -> MissingOrdinals<'_> {
		MissingOrdinals { mask: self, next: 0 }
	}
}

fn full_word(len: usize, idx: usize) -> u64 {
	let used = len.saturating_sub(idx * WIDE_BITS).min(WIDE_BITS);
	if used == WIDE_BITS { u64::MAX } else { (1_u64 << used) - 1 }
}

/// Iterator over unmarked ordinals of a [`PresenceMask`].
#[derive(Debug)]
pub struct MissingOrdinals<'a> {
	mask: &'a PresenceMask,
	next: usize,
}

impl Iterator for MissingOrdinals<'_> {
	type Item = usize;

	fn next(&mut self) -> Option<usize> {
		while self.next < self.mask.len() {
			let ordinal = self.next;
			self.next += 1;
			if !self.mask.is_marked(ordinal) {
				return Some(ordinal);
			}
		}
		None
	}
}

#[cfg(test)]
mod tests;
