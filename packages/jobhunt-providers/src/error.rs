use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures talking to a job source or the relevance model. Callers treat all of them as soft.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] InvalidHeaderValue),
	#[error("Invalid provider config: {message}")]
	InvalidConfig { message: String },
	#[error("Invalid provider response: {message}")]
	InvalidResponse { message: String },
}
