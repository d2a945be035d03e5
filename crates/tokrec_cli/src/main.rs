#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "tokrec", about = "Schema-driven record decoding tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode a payload against a schema document.
	Decode(cmd::decode::Args),
	/// Print the fields of a schema document.
	Schema(cmd::schema::Args),
	/// Dump the token stream of a payload.
	Tokens(cmd::tokens::Args),
}

fn main() {
	init_logging();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> cmd::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Decode(args) => cmd::decode::run(args),
		Commands::Schema(args) => cmd::schema::run(args),
		Commands::Tokens(args) => cmd::tokens::run(args),
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
