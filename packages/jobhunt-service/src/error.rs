pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Internal error during {stage}: {message}")]
	Internal { stage: &'static str, message: String },
}
impl From<jobhunt_domain::Error> for Error {
	fn from(err: jobhunt_domain::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
