//! Standard-alphabet base64 used for binary scalars carried in string tokens.

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encode bytes with padding.
pub fn encode(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
	for chunk in bytes.chunks(3) {
		let b0 = chunk[0];
		let b1 = chunk.get(1).copied().unwrap_or(0);
		let b2 = chunk.get(2).copied().unwrap_or(0);
		let triple = (u32::from(b0) << 16) | (u32::from(b1) << 8) | u32::from(b2);

		out.push(char::from(ALPHABET[(triple >> 18) as usize & 63]));
		out.push(char::from(ALPHABET[(triple >> 12) as usize & 63]));
		out.push(if chunk.len() > 1 { char::from(ALPHABET[(triple >> 6) as usize & 63]) } else { '=' });
		out.push(if chunk.len() > 2 { char::from(ALPHABET[triple as usize & 63]) } else { '=' });
	}
	out
}

/// Decode padded or unpadded base64; `None` on any malformed input.
pub fn decode(text: &str) -> Option<Vec<u8>> {
	let trimmed = text.trim_end_matches('=');
	let pad = text.len() - trimmed.len();
	if pad > 2 || trimmed.len() % 4 == 1 {
		return None;
	}
	if pad > 0 && trimmed.len() % 4 + pad != 4 {
		return None;
	}

	let mut out = Vec::with_capacity(trimmed.len() * 3 / 4);
	let mut acc = 0_u32;
	let mut bits = 0_u32;
	for byte in trimmed.bytes() {
		acc = (acc << 6) | u32::from(sextet(byte)?);
		bits += 6;
		if bits >= 8 {
			bits -= 8;
			out.push((acc >> bits) as u8);
			acc &= (1 << bits) - 1;
		}
	}
	// Leftover bits of the last group must be zero.
	(acc == 0).then_some(out)
}

fn sextet(byte: u8) -> Option<u8> {
	match byte {
		b'A'..=b'Z' => Some(byte - b'A'),
		b'a'..=b'z' => Some(byte - b'a' + 26),
		b'0'..=b'9' => Some(byte - b'0' + 52),
		b'+' => Some(62),
		b'/' => Some(63),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::{decode, encode};

	#[test]
	fn encodes_with_padding() {
		assert_eq!(encode(b""), "");
		assert_eq!(encode(b"f"), "Zg==");
		assert_eq!(encode(b"fo"), "Zm8=");
		assert_eq!(encode(b"foo"), "Zm9v");
		assert_eq!(encode(b"foobar"), "Zm9vYmFy");
	}

	#[test]
	fn decodes_padded_and_unpadded() {
		assert_eq!(decode("Zm9vYmE=").as_deref(), Some(&b"fooba"[..]));
		assert_eq!(decode("Zm9vYmE").as_deref(), Some(&b"fooba"[..]));
		assert_eq!(decode("").as_deref(), Some(&b""[..]));
	}

	#[test]
	fn rejects_malformed_input() {
		assert!(decode("Zm9v!").is_none());
		assert!(decode("Z").is_none());
		assert!(decode("Zg===").is_none());
		assert!(decode("Zm9v=").is_none());
		assert!(decode("Zg=").is_none());
		assert!(decode("Zh==").is_none());
		assert!(decode("Zh").is_none());
	}
}
