mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Ai, Cache, Config, Ranking, Service, SourceEndpoint, Sources};

use std::{fs, path::Path};

/// Upper bound for millisecond settings. Deadlines are computed as `now + value`.
const MAX_DURATION_MS: u64 = 86_400_000;
/// Upper bound for the cache TTL and sweep interval, in seconds.
const MAX_CACHE_SECONDS: u64 = 2_592_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.request_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "service.request_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.sources.max_results_per_source == 0 {
		return Err(Error::Validation {
			message: "sources.max_results_per_source must be greater than zero.".to_string(),
		});
	}
	if cfg.sources.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "sources.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.sources.max_attempts == 0 {
		return Err(Error::Validation {
			message: "sources.max_attempts must be greater than zero.".to_string(),
		});
	}

	for (label, endpoint) in source_endpoints(cfg) {
		let Some(endpoint) = endpoint else { continue };

		if endpoint.enabled && endpoint.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("sources.{label}.api_base must be non-empty when enabled."),
			});
		}

		validate_headers(&format!("sources.{label}"), endpoint)?;
	}

	if cfg.ai.enabled {
		if cfg.ai.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "ai.api_base must be non-empty when enabled.".to_string(),
			});
		}
		if cfg.ai.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: "ai.api_key must be non-empty when enabled.".to_string(),
			});
		}
	}
	if cfg.ai.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "ai.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.ai.batch_size == 0 {
		return Err(Error::Validation {
			message: "ai.batch_size must be greater than zero.".to_string(),
		});
	}
	if cfg.ai.calls_per_window == 0 {
		return Err(Error::Validation {
			message: "ai.calls_per_window must be greater than zero.".to_string(),
		});
	}
	if cfg.ai.window_ms == 0 {
		return Err(Error::Validation {
			message: "ai.window_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.ai.temperature.is_finite() {
		return Err(Error::Validation {
			message: "ai.temperature must be a finite number.".to_string(),
		});
	}
	if cfg.ai.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "ai.default_headers values must be strings.".to_string(),
		});
	}

	for (label, value) in [
		("ranking.min_relevance_score", cfg.ranking.min_relevance_score),
		("ranking.ai_weight", cfg.ranking.ai_weight),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if cfg.ranking.max_results == 0 {
		return Err(Error::Validation {
			message: "ranking.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.enabled && cfg.cache.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "cache.ttl_seconds must be greater than zero when enabled.".to_string(),
		});
	}
	if cfg.cache.enabled && cfg.cache.sweep_interval_seconds == 0 {
		return Err(Error::Validation {
			message: "cache.sweep_interval_seconds must be greater than zero when enabled."
				.to_string(),
		});
	}

	for (label, value) in [
		("service.request_timeout_ms", cfg.service.request_timeout_ms),
		("sources.timeout_ms", cfg.sources.timeout_ms),
		("sources.retry_delay_ms", cfg.sources.retry_delay_ms),
		("ai.timeout_ms", cfg.ai.timeout_ms),
		("ai.window_ms", cfg.ai.window_ms),
		("ai.max_wait_ms", cfg.ai.max_wait_ms),
	] {
		if value > MAX_DURATION_MS {
			return Err(Error::Validation {
				message: format!("{label} must be at most {MAX_DURATION_MS}."),
			});
		}
	}
	for (label, value) in [
		("cache.ttl_seconds", cfg.cache.ttl_seconds),
		("cache.sweep_interval_seconds", cfg.cache.sweep_interval_seconds),
	] {
		if value > MAX_CACHE_SECONDS {
			return Err(Error::Validation {
				message: format!("{label} must be at most {MAX_CACHE_SECONDS}."),
			});
		}
	}

	Ok(())
}

/// Per-source endpoint sections in a fixed order: indeed, linkedin, rozee.
pub fn source_endpoints(cfg: &Config) -> [(&'static str, Option<&SourceEndpoint>); 3] {
	[
		("indeed", cfg.sources.indeed.as_ref()),
		("linkedin", cfg.sources.linkedin.as_ref()),
		("rozee", cfg.sources.rozee.as_ref()),
	]
}

fn validate_headers(label: &str, endpoint: &SourceEndpoint) -> Result<()> {
	if endpoint.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: format!("{label}.default_headers values must be strings."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for endpoint in
		[&mut cfg.sources.indeed, &mut cfg.sources.linkedin, &mut cfg.sources.rozee]
			.into_iter()
			.flatten()
	{
		if endpoint.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
			endpoint.api_key = None;
		}

		trim_base(&mut endpoint.api_base);
	}

	trim_base(&mut cfg.ai.api_base);

	cfg.sources.default_country = cfg.sources.default_country.trim().to_string();
}

fn trim_base(api_base: &mut String) {
	let trimmed = api_base.trim().trim_end_matches('/');

	if trimmed.len() != api_base.len() {
		*api_base = trimmed.to_string();
	}
}
