use std::io::Read;
use std::path::Path;

use crate::rec::SourceError;

/// Ceiling on decompressed payload size.
pub const MAX_PAYLOAD_BYTES: usize = 256 * 1024 * 1024;
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw bytes.
	None,
	/// zstd frame.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Read a payload file, decompressing it when it starts with a zstd frame.
pub fn read_payload(path: &Path) -> Result<(Compression, Vec<u8>), SourceError> {
	let raw = std::fs::read(path)?;
	decode_payload(raw)
}

/// Detect compression and return `(mode, decoded_bytes)`.
pub fn decode_payload(raw: Vec<u8>) -> Result<(Compression, Vec<u8>), SourceError> {
	decode_payload_with_limit(raw, MAX_PAYLOAD_BYTES)
}

fn decode_payload_with_limit(raw: Vec<u8>, limit: usize) -> Result<(Compression, Vec<u8>), SourceError> {
	if !raw.starts_with(&ZSTD_MAGIC) {
		return Ok((Compression::None, raw));
	}

	let mut decoder = zstd::stream::read::Decoder::new(raw.as_slice())?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];
	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}
		if out.len() + read > limit {
			return Err(SourceError::DecompressedTooLarge { limit });
		}
		out.extend_from_slice(&buf[..read]);
	}

	log::debug!("zstd payload: {} -> {} bytes", raw.len(), out.len());
	Ok((Compression::Zstd, out))
}
