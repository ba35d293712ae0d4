use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use jobhunt_service::{Error as ServiceError, HealthResponse, SearchRequest, SearchResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/search-jobs", post(search_jobs))
		.with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(state.service.health())
}

/// An empty result is "not found" at this boundary but still carries the normal response body.
async fn search_jobs(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SearchResponse>), ApiError> {
	let Json(payload) = payload.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	})?;
	let response = state.service.search(payload).await?;
	let status =
		if response.relevant_jobs.is_empty() { StatusCode::NOT_FOUND } else { StatusCode::OK };

	Ok((status, Json(response)))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::Internal { stage, message } => {
				tracing::error!(stage, error = %message, "Search failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
