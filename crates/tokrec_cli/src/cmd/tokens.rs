use std::path::PathBuf;

use tokrec::rec::{CursorError, JsonCursor, TokenCursor, TokenKind, read_payload};

use crate::cmd::Result;
use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub payload: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Dump every token of a JSON payload with its position.
pub fn run(args: Args) -> Result<()> {
	let Args { payload, json } = args;

	let (compression, bytes) = read_payload(&payload)?;
	let rows = collect_tokens(&bytes)?;

	if json {
		let out = TokensJson {
			payload: payload.display().to_string(),
			compression: compression.as_str(),
			tokens: rows,
		};
		return emit_json(&out);
	}

	println!("payload: {}", payload.display());
	println!("compression: {}", compression.as_str());
	println!("tokens: {}", rows.len());
	for row in &rows {
		let pad = "  ".repeat(row.depth);
		match &row.text {
			Some(text) => println!("{:>6} {:>4}:{:<4} {pad}{} {text}", row.offset, row.line, row.column, row.kind),
			None => println!("{:>6} {:>4}:{:<4} {pad}{}", row.offset, row.line, row.column, row.kind),
		}
	}
	Ok(())
}

fn collect_tokens(bytes: &[u8]) -> std::result::Result<Vec<TokenJson>, CursorError> {
	let mut cursor = JsonCursor::new(bytes)?;
	let mut rows = vec![token_row(&cursor)?];
	while !cursor.is_complete() {
		cursor.advance()?;
		rows.push(token_row(&cursor)?);
	}
	cursor.finish()?;
	Ok(rows)
}

fn token_row(cursor: &JsonCursor<'_>) -> std::result::Result<TokenJson, CursorError> {
	let kind = cursor.current_kind();
	let text = match kind {
		TokenKind::FieldName => Some(format!("{:?}", cursor.field_name()?)),
		TokenKind::StringValue => Some(format!("{:?}", cursor.text()?)),
		TokenKind::IntValue | TokenKind::FloatValue => Some(cursor.number_text()?.to_owned()),
		_ => None,
	};
	let position = cursor.position();
	let depth = match kind {
		TokenKind::ObjectStart | TokenKind::ArrayStart => cursor.depth().saturating_sub(1),
		_ => cursor.depth(),
	};

	Ok(TokenJson {
		kind: kind.as_str(),
		depth,
		offset: position.map_or(0, |item| item.offset),
		line: position.map_or(0, |item| item.line),
		column: position.map_or(0, |item| item.column),
		text,
	})
}

#[derive(serde::Serialize)]
struct TokenJson {
	kind: &'static str,
	depth: usize,
	offset: usize,
	line: u32,
	column: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	text: Option<String>,
}

#[derive(serde::Serialize)]
struct TokensJson {
	payload: String,
	compression: &'static str,
	tokens: Vec<TokenJson>,
}
