use std::path::PathBuf;

use log::debug;
use tokrec::rec::{DecodeOptions, DecodeStats, JsonCursor, decode_record_with_stats, load_schema, read_payload};

use crate::cmd::Result;
use crate::cmd::print::{PrintOptions, record_json, render_record};
use crate::cmd::util::{emit_json, resolve_type};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	pub payload: PathBuf,
	#[arg(long = "type")]
	pub type_name: Option<String>,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "no-fast-path")]
	pub no_fast_path: bool,
	#[arg(long = "deny-unknown")]
	pub deny_unknown: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-list")]
	pub max_list: Option<usize>,
	#[arg(long)]
	pub stats: bool,
}

/// Decode a payload file against a schema document and print the record.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema,
		payload,
		type_name,
		json,
		no_fast_path,
		deny_unknown,
		max_depth,
		max_list,
		stats: show_stats,
	} = args;

	let loaded = load_schema(&schema)?;
	let id = resolve_type(&loaded, type_name.as_deref())?;
	let root_name = loaded.set.get(id).map(|item| item.type_name().to_string()).unwrap_or_default();

	let defaults = DecodeOptions::default();
	let options = DecodeOptions {
		max_depth: max_depth.unwrap_or(defaults.max_depth),
		max_list_len: max_list.unwrap_or(defaults.max_list_len),
		fast_path: !no_fast_path,
		deny_unknown_fields: deny_unknown,
	};

	let (compression, bytes) = read_payload(&payload)?;
	debug!("{}: {} payload bytes ({})", payload.display(), bytes.len(), compression.as_str());
	let mut cursor = JsonCursor::new(&bytes)?;
	let mut stats = DecodeStats::default();
	let record = decode_record_with_stats(&loaded.set, id, &mut cursor, &options, &mut stats)?;
	cursor.finish()?;
	debug!("decoded {root_name}: {stats:?}");

	if json {
		let out = DecodeJson {
			payload: payload.display().to_string(),
			compression: compression.as_str(),
			type_name: root_name,
			value: record.as_ref().map_or(serde_json::Value::Null, record_json),
			stats: show_stats.then(|| StatsJson::from(stats)),
		};
		return emit_json(&out);
	}

	println!("schema: {}", schema.display());
	println!("payload: {}", payload.display());
	println!("compression: {}", compression.as_str());
	println!("type: {root_name}");
	if show_stats {
		println!(
			"stats: objects={} in_order={} identity_hits={} dispatched={} skipped={}",
			stats.objects, stats.in_order, stats.identity_hits, stats.dispatched, stats.skipped
		);
	}
	println!("decoded:");
	match &record {
		Some(record) => print!("{}", render_record(record, PrintOptions::default())),
		None => println!("null"),
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct StatsJson {
	objects: usize,
	in_order: usize,
	identity_hits: usize,
	dispatched: usize,
	skipped: usize,
}

impl From<DecodeStats> for StatsJson {
	fn from(stats: DecodeStats) -> Self {
		Self {
			objects: stats.objects,
			in_order: stats.in_order,
			identity_hits: stats.identity_hits,
			dispatched: stats.dispatched,
			skipped: stats.skipped,
		}
	}
}

#[derive(serde::Serialize)]
struct DecodeJson {
	payload: String,
	compression: &'static str,
	#[serde(rename = "type")]
	type_name: String,
	value: serde_json::Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	stats: Option<StatsJson>,
}
