use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Asks an OpenAI-compatible chat completion endpoint to score `job_count` jobs.
///
/// The returned vector is aligned with the batch; `None` marks a job the model did not score.
pub async fn score(
	cfg: &jobhunt_config::Ai,
	messages: &[Value],
	job_count: usize,
) -> Result<Vec<Option<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(Some(&cfg.api_key), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_relevance_response(json, job_count)
}

pub fn parse_relevance_response(json: Value, job_count: usize) -> Result<Vec<Option<f32>>> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Relevance response is missing message content.".to_string(),
		})?;
	let parsed: Value = serde_json::from_str(strip_code_fence(content)).map_err(|_| {
		Error::InvalidResponse { message: "Relevance content is not valid JSON.".to_string() }
	})?;
	let entries = match &parsed {
		Value::Array(entries) => entries,
		Value::Object(map) => map.get("scores").and_then(|v| v.as_array()).ok_or_else(|| {
			Error::InvalidResponse {
				message: "Relevance content is missing scores array.".to_string(),
			}
		})?,
		_ =>
			return Err(Error::InvalidResponse {
				message: "Relevance content must be an object or an array.".to_string(),
			}),
	};
	let mut scores = vec![None; job_count];

	for (fallback_index, entry) in entries.iter().enumerate() {
		let (index, value) = match entry {
			Value::Number(number) => (fallback_index, number.as_f64()),
			Value::Object(_) => (
				entry
					.get("index")
					.and_then(|v| v.as_u64())
					.map(|v| v as usize)
					.unwrap_or(fallback_index),
				entry.get("score").and_then(|v| v.as_f64()),
			),
			_ => continue,
		};
		let Some(value) = value.filter(|value| value.is_finite()) else { continue };

		if let Some(slot) = scores.get_mut(index) {
			*slot = Some((value as f32).clamp(0.0, 1.0));
		}
	}

	Ok(scores)
}

fn strip_code_fence(content: &str) -> &str {
	let trimmed = content.trim();
	let Some(rest) = trimmed.strip_prefix("```") else { return trimmed };
	let rest = rest.strip_suffix("```").unwrap_or(rest);

	match rest.split_once('\n') {
		Some((lang, body)) if !lang.trim_start().starts_with(['{', '[']) => body.trim(),
		_ => rest.trim(),
	}
}
