use std::{collections::HashMap, time::Duration};

use axum::{
	Json, Router,
	extract::Query,
	http::{HeaderMap, StatusCode},
	response::IntoResponse,
	routing,
};
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use jobhunt_config::{Ai, SourceEndpoint};
use jobhunt_domain::{RawPosting, SearchProfile};
use jobhunt_providers::{
	Error, relevance,
	sources::{self, SourceKind, SourceQuery},
};

async fn spawn_board() -> String {
	let app = Router::new()
		.route("/v1/indeed/jobs", routing::get(indeed_jobs))
		.route("/v1/broken/jobs", routing::get(|| async { StatusCode::BAD_GATEWAY }))
		.route("/chat/completions", routing::post(chat_completion));
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock board.");
	let addr = listener.local_addr().expect("Failed to read mock board address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, app).await;
	});

	format!("http://{addr}")
}

async fn indeed_jobs(
	headers: HeaderMap,
	Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
	if headers.get("authorization").is_some_and(|value| value != "Bearer board-key") {
		return StatusCode::UNAUTHORIZED.into_response();
	}

	let wanted: usize = params.get("results_wanted").and_then(|v| v.parse().ok()).unwrap_or(0);
	let jobs: Vec<Value> = (0..wanted + 2)
		.map(|i| {
			serde_json::json!({
				"title": params.get("search_term"),
				"company": format!("Company {i}"),
				"location": params.get("location"),
				"job_url": format!("https://jobs.example.com/{i}"),
				"country_seen": params.get("country"),
			})
		})
		.collect();

	Json(serde_json::json!({ "jobs": jobs })).into_response()
}

async fn chat_completion(Json(body): Json<Value>) -> Json<Value> {
	let model = body["model"].as_str().unwrap_or_default().to_string();
	let content = format!(
		"```json\n{{\"scores\":[{{\"index\":0,\"score\":0.8}}],\"model\":\"{model}\"}}\n```"
	);

	Json(serde_json::json!({ "choices": [{ "message": { "content": content } }] }))
}

fn endpoint(api_base: &str, path: &str, api_key: Option<&str>) -> SourceEndpoint {
	SourceEndpoint {
		enabled: true,
		api_base: api_base.to_string(),
		path: path.to_string(),
		api_key: api_key.map(str::to_string),
		default_headers: Map::new(),
	}
}

fn query(kind: SourceKind) -> SourceQuery {
	let profile =
		SearchProfile::new("Rust Developer", "2 years", "", "Full Time", "Lahore, Pakistan", "Rust")
			.expect("Profile must be valid.");

	SourceQuery::from_profile(kind, &profile, 3, 72)
}

#[tokio::test]
async fn fetches_postings_from_board() {
	let base = spawn_board().await;
	let endpoint = endpoint(&base, "/v1/indeed/jobs", Some("board-key"));
	let query = query(SourceKind::Indeed);
	let postings = sources::fetch(&endpoint, Duration::from_secs(5), SourceKind::Indeed, &query)
		.await
		.expect("Fetch failed.");

	assert_eq!(postings.len(), 5);
	assert!(matches!(
		&postings[0],
		RawPosting::Indeed(p) if p.title.as_deref() == Some("Rust Developer")
			&& p.location.as_deref() == Some("Lahore, Pakistan")
	));
}

#[tokio::test]
async fn wrong_key_surfaces_http_error() {
	let base = spawn_board().await;
	let endpoint = endpoint(&base, "/v1/indeed/jobs", Some("stale-key"));
	let query = query(SourceKind::Indeed);
	let err = sources::fetch(&endpoint, Duration::from_secs(5), SourceKind::Indeed, &query)
		.await
		.expect_err("Expected unauthorized.");

	assert!(matches!(err, Error::Reqwest(_)));
}

#[tokio::test]
async fn server_error_surfaces_http_error() {
	let base = spawn_board().await;
	let endpoint = endpoint(&base, "/v1/broken/jobs", None);
	let query = query(SourceKind::LinkedIn);
	let err = sources::fetch(&endpoint, Duration::from_secs(5), SourceKind::LinkedIn, &query)
		.await
		.expect_err("Expected bad gateway.");

	assert!(matches!(err, Error::Reqwest(_)));
}

#[tokio::test]
async fn scores_batch_through_chat_completion() {
	let base = spawn_board().await;
	let cfg = Ai {
		enabled: true,
		provider_id: "test".to_string(),
		api_base: base,
		path: "/chat/completions".to_string(),
		api_key: "test-key".to_string(),
		model: "test-model".to_string(),
		temperature: 0.0,
		timeout_ms: 5_000,
		default_headers: Map::new(),
		batch_size: 2,
		calls_per_window: 15,
		window_ms: 60_000,
		max_wait_ms: 0,
	};
	let messages = vec![serde_json::json!({ "role": "user", "content": "Score these jobs." })];
	let scores = relevance::score(&cfg, &messages, 2).await.expect("Scoring failed.");

	assert_eq!(scores, vec![Some(0.8), None]);
}

#[test]
fn builds_bearer_auth_header() {
	let headers = jobhunt_providers::auth_headers(Some("secret"), &Map::new())
		.expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn omits_auth_header_without_key() {
	let mut extra = Map::new();

	extra.insert("x-client".to_string(), Value::String("jobhunt".to_string()));

	let headers = jobhunt_providers::auth_headers(None, &extra).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
	assert_eq!(headers.get("x-client").expect("Missing extra header."), "jobhunt");
}

#[test]
fn rejects_non_string_header_values() {
	let mut extra = Map::new();

	extra.insert("x-retries".to_string(), Value::from(3));

	let err = jobhunt_providers::auth_headers(None, &extra).expect_err("Expected config error.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[test]
fn source_ids_round_trip() {
	for kind in SourceKind::ALL {
		assert_eq!(SourceKind::from_id(kind.id()), Some(kind));
	}

	assert_eq!(SourceKind::from_id("monster"), None);
	assert_eq!(SourceKind::Rozee.label(), "Rozee.pk");
}
