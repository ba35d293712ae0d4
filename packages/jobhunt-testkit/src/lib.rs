//! Shared fixtures for service and API tests.

use serde_json::Map;

use jobhunt_config::{Ai, Cache, Config, Ranking, Service, Sources};
use jobhunt_domain::{IndeedPosting, RawPosting, RozeePosting};

/// A complete, valid config with no HTTP sources configured. Tests inject their own adapters.
pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			request_timeout_ms: 120_000,
			bind_localhost_only: true,
		},
		sources: Sources {
			max_results_per_source: 5,
			timeout_ms: 30_000,
			max_attempts: 3,
			retry_delay_ms: 10,
			job_age_hours: 72,
			default_country: "Pakistan".to_string(),
			indeed: None,
			linkedin: None,
			rozee: None,
		},
		ai: Ai {
			enabled: true,
			provider_id: "test".to_string(),
			api_base: "http://127.0.0.1:1".to_string(),
			path: "/chat/completions".to_string(),
			api_key: "test-key".to_string(),
			model: "test-model".to_string(),
			temperature: 0.0,
			timeout_ms: 1_000,
			default_headers: Map::new(),
			batch_size: 5,
			calls_per_window: 15,
			window_ms: 60_000,
			max_wait_ms: 0,
		},
		ranking: Ranking::default(),
		cache: Cache { enabled: true, ttl_seconds: 60, sweep_interval_seconds: 30 },
	}
}

/// The Full Stack Developer search used across scenario tests, in wire form.
pub fn scenario_request() -> serde_json::Value {
	serde_json::json!({
		"position": "Full Stack Developer",
		"experience": "2 years",
		"salary": "100000",
		"job_nature": "Full Time",
		"location": "Lahore, Pakistan",
		"skills": "Python, JavaScript, React, Node.js",
	})
}

/// A Rozee posting that fully matches [`scenario_request`].
pub fn matching_posting(link: &str) -> RawPosting {
	RawPosting::Rozee(RozeePosting {
		title: Some("Full Stack Developer".to_string()),
		company: Some("Example Corp".to_string()),
		location: Some("Lahore, Pakistan".to_string()),
		url: Some(link.to_string()),
		experience: Some("2 years".to_string()),
		job_type: Some("Full Time".to_string()),
		full_details: Some(
			"Ship features with Python, JavaScript, React and Node.js across the stack.".to_string(),
		),
		..Default::default()
	})
}

/// An Indeed posting with the given title that shares only the location with the scenario.
pub fn indeed_posting(title: &str, company: &str, link: &str) -> RawPosting {
	RawPosting::Indeed(IndeedPosting {
		title: Some(title.to_string()),
		company: Some(company.to_string()),
		location: Some("Lahore, Pakistan".to_string()),
		job_url: Some(link.to_string()),
		job_type: Some("fulltime".to_string()),
		..Default::default()
	})
}
