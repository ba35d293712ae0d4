use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file at {path:?}.")]
	ReadConfig { path: PathBuf, source: io::Error },
	#[error("Failed to parse config file at {path:?}: {source}")]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	/// The file parsed but a value is out of range; the message names the offending key.
	#[error("Invalid config: {message}")]
	Validation { message: String },
}
