use std::{path::PathBuf, process::ExitCode};

use anyhow::{bail, Context};
use clap::Parser;
use pagesplice::{
	config::{self, Config},
	fetch::Fetcher,
	images,
	pipeline::{self, Mode, Report},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[command(version, about = "Refresh the generated regions of a static site")]
struct Args {
	/// The path to a configuration file (TOML, or JSON if it ends in `.json`). You can specify as many of these as you need to.
	#[arg(short, long = "config")]
	config_path: Vec<PathBuf>,
	/// The HTML document to update, overriding the configured one.
	#[arg(short, long)]
	document: Option<PathBuf>,
	/// Print the updated document to stdout instead of writing it.
	#[arg(long)]
	dry_run: bool,
	#[command(subcommand)]
	command: Command,
}

#[derive(clap::Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
	/// Render the configured GitHub repositories.
	Repos,
	/// Render the newest videos from the YouTube channel feed.
	Videos,
	/// Generate the resized profile picture variants.
	Images,
	/// Run repos, videos and images in that order.
	All,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagesplice=info")),
		)
		.with_writer(std::io::stderr)
		.init();

	match run(Args::parse()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(args: Args) -> anyhow::Result<()> {
	for location in &args.config_path {
		if !location.is_file() {
			bail!("config file {} does not exist", location.display());
		}
	}
	let mut config: Config = config::figment(&args.config_path)
		.extract()
		.context("Invalid config")?;
	if let Some(document) = args.document {
		config.document = document;
	}
	let mode = if args.dry_run { Mode::DryRun } else { Mode::Write };

	if matches!(args.command, Command::Repos | Command::Videos | Command::All) {
		let rt = tokio::runtime::Builder::new_current_thread()
			.enable_all()
			.build()
			.context("Init runtime")?;
		let fetcher = Fetcher::new(&config.fetch)?;
		if matches!(args.command, Command::Repos | Command::All) {
			let report = rt
				.block_on(pipeline::repos::run(&config, &fetcher, mode))
				.context("Repository update failed")?;
			finish("repos", report);
		}
		if matches!(args.command, Command::Videos | Command::All) {
			let report = rt
				.block_on(pipeline::videos::run(&config, &fetcher, mode))
				.context("Video update failed")?;
			finish("videos", report);
		}
	}

	if matches!(args.command, Command::Images | Command::All) {
		let written = images::generate(&config.images).context("Image optimization failed")?;
		info!(count = written.len(), "image optimization complete");
	}
	Ok(())
}

fn finish(region: &str, report: Report) {
	if let Some(document) = report.document {
		print!("{document}");
	}
	info!(
		region,
		rendered = report.rendered,
		skipped = report.skipped,
		"done"
	);
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use clap::Parser;

	use super::{Args, Command};

	#[test]
	fn accepts_repeated_config_flags() {
		let args = Args::try_parse_from([
			"pagesplice",
			"--config",
			"repos.json",
			"-c",
			"pagesplice.toml",
			"--dry-run",
			"repos",
		])
		.unwrap();
		assert_eq!(
			args.config_path,
			[PathBuf::from("repos.json"), PathBuf::from("pagesplice.toml")]
		);
		assert!(args.dry_run);
		assert!(args.command == Command::Repos);
	}

	#[test]
	fn rejects_unknown_config_spelling() {
		assert!(Args::try_parse_from(["pagesplice", "--config-path", "x.toml", "all"]).is_err());
	}
}
