pub mod cache;
pub mod rate_limit;
pub mod refine;
pub mod search;

mod error;

pub use cache::ResultCache;
pub use error::{Error, Result};
pub use rate_limit::{Acquire, RateLimiter};
pub use search::{HealthResponse, JobListing, SearchRequest, SearchResponse};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::Value;

use jobhunt_config::{Ai, Config, SourceEndpoint};
use jobhunt_domain::{RawPosting, SearchProfile};
use jobhunt_providers::{
	relevance,
	sources::{self, SourceKind, SourceQuery},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type ProviderResult<T> = jobhunt_providers::Result<T>;

/// One job source. Adapters are stateless per call and may be invoked concurrently.
pub trait SourceAdapter
where
	Self: Send + Sync,
{
	/// Name stamped into `Job::source`.
	fn name(&self) -> &str;

	fn fetch<'a>(
		&'a self,
		profile: &'a SearchProfile,
		max_results: u32,
	) -> BoxFuture<'a, ProviderResult<Vec<RawPosting>>>;
}

pub trait RelevanceProvider
where
	Self: Send + Sync,
{
	/// Scores a batch; the result is aligned with the batch order.
	fn score<'a>(
		&'a self,
		cfg: &'a Ai,
		messages: &'a [Value],
		job_count: usize,
	) -> BoxFuture<'a, ProviderResult<Vec<Option<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	/// Registration order is the fetch-order tie-break.
	pub sources: Vec<Arc<dyn SourceAdapter>>,
	pub relevance: Arc<dyn RelevanceProvider>,
}
impl Providers {
	pub fn new(sources: Vec<Arc<dyn SourceAdapter>>, relevance: Arc<dyn RelevanceProvider>) -> Self {
		Self { sources, relevance }
	}

	/// HTTP adapters for every enabled source section, plus the HTTP relevance client.
	pub fn from_config(cfg: &Config) -> Self {
		let sources = jobhunt_config::source_endpoints(cfg)
			.into_iter()
			.filter_map(|(id, endpoint)| {
				let endpoint = endpoint.filter(|endpoint| endpoint.enabled)?;
				let kind = SourceKind::from_id(id)?;
				let adapter: Arc<dyn SourceAdapter> = Arc::new(HttpSource {
					kind,
					endpoint: endpoint.clone(),
					timeout: Duration::from_millis(cfg.sources.timeout_ms),
					hours_old: cfg.sources.job_age_hours,
				});

				Some(adapter)
			})
			.collect();

		Self { sources, relevance: Arc::new(HttpRelevance) }
	}
}

pub struct JobHuntService {
	pub cfg: Config,
	pub providers: Providers,
	pub cache: ResultCache,
	pub limiter: RateLimiter,
}
impl JobHuntService {
	pub fn new(cfg: Config) -> Self {
		let providers = Providers::from_config(&cfg);

		Self::with_providers(cfg, providers)
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let cache = ResultCache::new(Duration::from_secs(cfg.cache.ttl_seconds));
		let limiter =
			RateLimiter::new(cfg.ai.calls_per_window, Duration::from_millis(cfg.ai.window_ms));

		Self { cfg, providers, cache, limiter }
	}
}

struct HttpSource {
	kind: SourceKind,
	endpoint: SourceEndpoint,
	timeout: Duration,
	hours_old: u32,
}
impl SourceAdapter for HttpSource {
	fn name(&self) -> &str {
		self.kind.label()
	}

	fn fetch<'a>(
		&'a self,
		profile: &'a SearchProfile,
		max_results: u32,
	) -> BoxFuture<'a, ProviderResult<Vec<RawPosting>>> {
		Box::pin(async move {
			let query = SourceQuery::from_profile(self.kind, profile, max_results, self.hours_old);

			sources::fetch(&self.endpoint, self.timeout, self.kind, &query).await
		})
	}
}

struct HttpRelevance;
impl RelevanceProvider for HttpRelevance {
	fn score<'a>(
		&'a self,
		cfg: &'a Ai,
		messages: &'a [Value],
		job_count: usize,
	) -> BoxFuture<'a, ProviderResult<Vec<Option<f32>>>> {
		Box::pin(relevance::score(cfg, messages, job_count))
	}
}
