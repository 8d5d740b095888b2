use std::{
	fs::{self, File},
	io::{self, Read, Write},
	path::{Path, PathBuf},
	sync::Mutex,
};

use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use releases::{OutputFormat, Settings, SourceFile, generate_changelog, render};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// When set, trace events are also written to this file as JSON lines.
const TRACE_FILE_ENV: &str = "RELEASES_TRACE_FILE";

#[derive(Debug, Parser)]
#[command(author, version, about = "Build a structured changelog from a newest-first markdown log", long_about = None)]
struct Cli {
	/// Changelog document; read from stdin when omitted
	file: Option<PathBuf>,
	/// TOML settings file
	#[arg(long, short)]
	config: Option<PathBuf>,
	/// Issue link template, `%s` is replaced by the issue number
	#[arg(long)]
	issue_uri: Option<String>,
	/// Release link template, `%s` is replaced by the version
	#[arg(long)]
	release_uri: Option<String>,
	/// Trace how issues are partitioned into releases
	#[arg(long, short)]
	debug: bool,
	#[arg(long, short, value_enum, default_value_t = OutputFormat::Html)]
	format: OutputFormat,
}

fn main() -> miette::Result<()> {
	let cli = Cli::parse();

	let mut settings = Settings::load(cli.config.as_deref()).into_diagnostic().wrap_err("failed to load settings")?;
	if let Some(uri) = cli.issue_uri {
		settings.issue_uri = Some(uri);
	}
	if let Some(uri) = cli.release_uri {
		settings.release_uri = Some(uri);
	}
	settings.debug |= cli.debug;
	init_tracing(settings.debug)?;
	tracing::debug!(?settings);

	let source = read_input(cli.file.as_deref())?;
	let output = match generate_changelog(&source.content, &settings) {
		Ok(Some(blocks)) => render(&blocks, cli.format)?,
		Ok(None) => {
			tracing::warn!("{} is not a changelog (first heading must be 'Changelog'), passing it through", source.filename);
			source.content.clone()
		}
		Err(e) => return Err(source.report(e)),
	};
	io::stdout().write_all(output.as_bytes()).into_diagnostic()?;
	Ok(())
}

fn read_input(path: Option<&Path>) -> miette::Result<SourceFile> {
	match path {
		Some(path) => {
			let content = fs::read_to_string(path).into_diagnostic().wrap_err_with(|| format!("failed to read {}", path.display()))?;
			Ok(SourceFile::new(content, path.display().to_string()))
		}
		None => {
			let mut content = String::new();
			io::stdin().read_to_string(&mut content).into_diagnostic().wrap_err("failed to read stdin")?;
			Ok(SourceFile::new(content, "<stdin>"))
		}
	}
}

fn init_tracing(debug: bool) -> miette::Result<()> {
	let filter = if debug {
		EnvFilter::new("releases=debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(option_env!("LOG_DIRECTIVES").unwrap_or("warn")))
	};

	let json_layer = match std::env::var_os(TRACE_FILE_ENV) {
		Some(path) => {
			let file = File::create(&path).into_diagnostic().wrap_err_with(|| format!("failed to create trace file {}", Path::new(&path).display()))?;
			Some(tracing_subscriber::fmt::layer().json().with_writer(Mutex::new(file)))
		}
		None => None,
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
		.with(json_layer)
		.init();
	Ok(())
}
