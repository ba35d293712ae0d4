pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid {field}: {message}")]
	InvalidProfile { field: &'static str, message: String },
}
