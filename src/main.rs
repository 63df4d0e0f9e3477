use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use configflow::{Loader, Namespace, Table, Value, unflatten};

#[derive(Parser)]
#[command(name = "configflow")]
#[command(
	author,
	version,
	about = "Inspect layered configuration merged from files, environment and inline values"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Configuration file to load (JSON, YAML or TOML); may be repeated
	#[arg(short, long = "file", value_name = "PATH", global = true)]
	files: Vec<PathBuf>,

	/// Include process environment variables
	#[arg(long, global = true)]
	env: bool,

	/// Set a value inline; may be repeated
	#[arg(long = "set", value_name = "KEY=VALUE", global = true, value_parser = parse_assignment)]
	sets: Vec<(String, String)>,

	/// Merge by declared priority (env > file > inline) instead of files, env, inline
	#[arg(long, global = true)]
	by_priority: bool,

	/// Enable verbose logging (sets log level to DEBUG)
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Display the merged namespace with the source of each key
	Show {
		#[arg(long, value_enum, default_value_t = Format::Text)]
		format: Format,
	},
	/// Print a single merged value
	Get {
		/// Dotted key, e.g. database.url
		key: String,
	},
	/// Run validation rules against merged values
	Check {
		/// Key and rule expression, e.g. port=range:1000,9999
		#[arg(required = true, value_name = "KEY=RULES", value_parser = parse_assignment)]
		checks: Vec<(String, String)>,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
	Text,
	Json,
}

fn parse_assignment(input: &str) -> std::result::Result<(String, String), String> {
	match input.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got '{input}'")),
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	let loader = build_loader(&cli);
	let namespace = loader
		.namespace()
		.context("Failed to load configuration sources")?;

	match cli.command {
		Commands::Show { format } => handle_show(&namespace, format),
		Commands::Get { ref key } => handle_get(&namespace, key),
		Commands::Check { ref checks } => Ok(handle_check(&loader, &namespace, checks)),
	}
}

fn init_tracing(verbose: bool) {
	// RUST_LOG takes precedence; --verbose falls back to DEBUG
	let level = if verbose { Level::DEBUG } else { Level::WARN };
	let filter = EnvFilter::from_default_env().add_directive(level.into());
	let _ = tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.try_init();
}

/// Sources are registered files first, then env, then inline values, so
/// inline values win unless `--by-priority` is given.
fn build_loader(cli: &Cli) -> Loader {
	let mut loader = Loader::new();

	for path in &cli.files {
		loader = loader.add_file(path);
	}

	if cli.env {
		loader = loader.add_env();
	}

	if !cli.sets.is_empty() {
		let inline: Table = cli
			.sets
			.iter()
			.map(|(key, value)| (key.clone(), Value::parse_loose(value)))
			.collect();
		loader = loader.add_map(inline);
	}

	if cli.by_priority {
		loader = loader.order_by_priority();
	}

	loader
}

fn handle_show(namespace: &Namespace, format: Format) -> Result<ExitCode> {
	match format {
		Format::Text => {
			if namespace.is_empty() {
				println!("No configuration values found.");
				return Ok(ExitCode::SUCCESS);
			}

			for (key, value) in &namespace.values {
				let source = namespace
					.origin(key)
					.map(|o| o.name.as_str())
					.unwrap_or("unknown");
				println!("{key} = {value}  # {source}");
			}
		}
		Format::Json => {
			let nested = unflatten(&namespace.values);
			let rendered =
				serde_json::to_string_pretty(&nested).context("Failed to render configuration")?;
			println!("{rendered}");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_get(namespace: &Namespace, key: &str) -> Result<ExitCode> {
	let value = namespace
		.get(key)
		.with_context(|| format!("Key not found: {key}"))?;
	println!("{value}");
	Ok(ExitCode::SUCCESS)
}

fn handle_check(loader: &Loader, namespace: &Namespace, checks: &[(String, String)]) -> ExitCode {
	let mut failed = false;

	for (key, rules) in checks {
		match namespace.get(key).filter(|v| !v.is_null()) {
			None => println!("{key}: skipped (not set)"),
			Some(value) => match loader.validators().validate(key, value, rules) {
				Ok(()) => println!("{key}: ok"),
				Err(err) => {
					failed = true;
					println!("{key}: FAIL [{}] {}", err.rule, err.message);
				}
			},
		}
	}

	if failed {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}
