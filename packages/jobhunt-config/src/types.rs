use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub sources: Sources,
	pub ai: Ai,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub cache: Cache,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Upper bound on a single search, covering source fan-out and AI refinement.
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	#[serde(default = "default_true")]
	pub bind_localhost_only: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Sources {
	#[serde(default = "default_max_results_per_source")]
	pub max_results_per_source: u32,
	#[serde(default = "default_source_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_retry_delay_ms")]
	pub retry_delay_ms: u64,
	#[serde(default = "default_job_age_hours")]
	pub job_age_hours: u32,
	/// Appended to locations that carry no country component, e.g. "Lahore" -> "Lahore, Pakistan".
	#[serde(default = "default_country")]
	pub default_country: String,
	pub indeed: Option<SourceEndpoint>,
	pub linkedin: Option<SourceEndpoint>,
	pub rozee: Option<SourceEndpoint>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SourceEndpoint {
	#[serde(default = "default_true")]
	pub enabled: bool,
	pub api_base: String,
	pub path: String,
	pub api_key: Option<String>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Ai {
	pub enabled: bool,
	pub provider_id: String,
	pub api_base: String,
	pub path: String,
	pub api_key: String,
	pub model: String,
	#[serde(default)]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	#[serde(default = "default_batch_size")]
	pub batch_size: u32,
	/// Sliding-window quota: at most this many calls start within any `window_ms`.
	#[serde(default = "default_calls_per_window")]
	pub calls_per_window: u32,
	#[serde(default = "default_window_ms")]
	pub window_ms: u64,
	#[serde(default = "default_max_wait_ms")]
	pub max_wait_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub min_relevance_score: f32,
	/// 1.0 lets the AI score replace the heuristic score; lower values blend the two.
	pub ai_weight: f32,
	pub max_results: u32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { min_relevance_score: 0.4, ai_weight: 1.0, max_results: 15 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub enabled: bool,
	pub ttl_seconds: u64,
	pub sweep_interval_seconds: u64,
}
impl Default for Cache {
	fn default() -> Self {
		Self { enabled: true, ttl_seconds: 3_600, sweep_interval_seconds: 300 }
	}
}

fn default_true() -> bool {
	true
}

fn default_request_timeout_ms() -> u64 {
	120_000
}

fn default_max_results_per_source() -> u32 {
	5
}

fn default_source_timeout_ms() -> u64 {
	30_000
}

fn default_max_attempts() -> u32 {
	3
}

fn default_retry_delay_ms() -> u64 {
	5_000
}

fn default_job_age_hours() -> u32 {
	72
}

fn default_country() -> String {
	"Pakistan".to_string()
}

fn default_batch_size() -> u32 {
	5
}

fn default_calls_per_window() -> u32 {
	15
}

fn default_window_ms() -> u64 {
	60_000
}

fn default_max_wait_ms() -> u64 {
	5_000
}
