use std::path::PathBuf;

use clap::{
	Args,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Arguments every jobhunt binary accepts.
#[derive(Debug, Args)]
pub struct ConfigArgs {
	/// TOML configuration file.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Tracing filter that replaces `service.log_level`, e.g. "jobhunt_service=debug,info".
	#[arg(long, value_name = "FILTER")]
	pub log_level: Option<String>,
}
impl ConfigArgs {
	/// The filter to install: the command-line override when present, else the configured one.
	pub fn log_filter<'a>(&'a self, configured: &'a str) -> &'a str {
		self.log_level
			.as_deref()
			.map(str::trim)
			.filter(|level| !level.is_empty())
			.unwrap_or(configured)
	}
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}
