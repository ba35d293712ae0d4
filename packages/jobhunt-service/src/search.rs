use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::{task::JoinSet, time::Instant};
use uuid::Uuid;

use jobhunt_domain::{
	Job, RankedJobs, RawPosting, ScoredJob, SearchProfile, is_unknown, rank, scoring, standardize,
};

use crate::{
	Error, JobHuntService, Result, SourceAdapter,
	cache::{self, cache_key_prefix},
	refine,
};

const DESCRIPTION_SNIPPET_CHARS: usize = 200;

/// Inbound search request. Every field is a string; skills are comma-separated.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
	pub position: String,
	pub experience: String,
	pub salary: String,
	#[serde(alias = "jobNature")]
	pub job_nature: String,
	pub location: String,
	pub skills: String,
}
impl SearchRequest {
	pub fn to_profile(&self) -> Result<SearchProfile> {
		Ok(SearchProfile::new(
			&self.position,
			&self.experience,
			&self.salary,
			&self.job_nature,
			&self.location,
			&self.skills,
		)?)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
	pub job_title: String,
	pub company: String,
	pub experience: String,
	pub job_nature: String,
	pub location: String,
	pub salary: String,
	pub apply_link: String,
	pub source: String,
	pub relevance_score: f32,
	pub posted_date: String,
	pub description_snippet: String,
	pub skills: Vec<String>,
}
impl From<&Job> for JobListing {
	fn from(job: &Job) -> Self {
		let description_snippet = if is_unknown(&job.description) {
			job.description.clone()
		} else {
			job.description.chars().take(DESCRIPTION_SNIPPET_CHARS).collect()
		};

		Self {
			job_title: job.job_title.clone(),
			company: job.company.clone(),
			experience: job.experience.clone(),
			job_nature: job.job_nature.clone(),
			location: job.location.clone(),
			salary: job.salary.clone(),
			apply_link: job.apply_link.clone(),
			source: job.source.clone(),
			relevance_score: job.relevance_score,
			posted_date: job.posted_date.clone(),
			description_snippet,
			skills: job.skills.clone(),
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub relevant_jobs: Vec<JobListing>,
	pub total_jobs_found: usize,
	#[serde(with = "time::serde::rfc3339")]
	pub search_timestamp: OffsetDateTime,
}
impl SearchResponse {
	fn new(ranked: &RankedJobs) -> Self {
		Self {
			relevant_jobs: ranked.jobs.iter().map(JobListing::from).collect(),
			total_jobs_found: ranked.total_found,
			search_timestamp: OffsetDateTime::now_utc(),
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	/// Live (unexpired) cache entries.
	pub cache_size: usize,
}

#[derive(Clone, Copy, Debug)]
struct FetchPlan {
	max_results: u32,
	timeout: Duration,
	max_attempts: u32,
	retry_delay: Duration,
	deadline: Instant,
}

impl JobHuntService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let profile = req.to_profile()?.with_default_country(&self.cfg.sources.default_country);
		let key = cache::fingerprint(&profile)?;
		let search_id = Uuid::new_v4();

		if !self.cfg.cache.enabled {
			let ranked = self.run_pipeline(&profile, &key, search_id).await?;

			return Ok(SearchResponse::new(&ranked));
		}
		if let Some(hit) = self.cache.get(&key) {
			tracing::info!(
				%search_id,
				cache_key_prefix = cache_key_prefix(&key),
				hit = true,
				job_count = hit.jobs.len(),
				"Cache hit."
			);

			return Ok(SearchResponse::new(&hit));
		}

		let _guard = self.cache.lock_key(&key).await;

		// A concurrent miss on the same key may have filled the entry while this call waited.
		if let Some(hit) = self.cache.get(&key) {
			tracing::info!(
				%search_id,
				cache_key_prefix = cache_key_prefix(&key),
				hit = true,
				job_count = hit.jobs.len(),
				"Cache filled by concurrent search."
			);

			return Ok(SearchResponse::new(&hit));
		}

		tracing::info!(
			%search_id,
			cache_key_prefix = cache_key_prefix(&key),
			hit = false,
			"Cache miss."
		);

		let ranked = self.run_pipeline(&profile, &key, search_id).await?;

		if ranked.jobs.is_empty() {
			tracing::info!(
				%search_id,
				cache_key_prefix = cache_key_prefix(&key),
				"No results; skipping cache store."
			);
		} else {
			self.cache.insert(key.clone(), ranked.clone());

			tracing::info!(
				%search_id,
				cache_key_prefix = cache_key_prefix(&key),
				job_count = ranked.jobs.len(),
				ttl_seconds = self.cfg.cache.ttl_seconds,
				"Cache stored."
			);
		}

		Ok(SearchResponse::new(&ranked))
	}

	pub fn health(&self) -> HealthResponse {
		HealthResponse {
			status: "healthy".to_string(),
			timestamp: OffsetDateTime::now_utc(),
			cache_size: self.cache.live_len(),
		}
	}

	/// Drops expired cache entries; called periodically by the API binary.
	pub fn sweep_cache(&self) -> usize {
		self.cache.purge_expired()
	}

	async fn run_pipeline(
		&self,
		profile: &SearchProfile,
		key: &str,
		search_id: Uuid,
	) -> Result<RankedJobs> {
		let deadline = Instant::now() + Duration::from_millis(self.cfg.service.request_timeout_ms);
		let fetched = self.fetch_all(profile, key, search_id, deadline).await?;
		let raw_count: usize = fetched.iter().map(|(_, postings)| postings.len()).sum();
		let floor = self.cfg.ranking.min_relevance_score;
		let mut fetch_order = 0;
		let mut standardized = 0;
		let mut candidates = Vec::new();

		for (source, postings) in fetched {
			for raw in postings {
				let Some(job) = standardize::standardize(raw, &source) else { continue };
				let heuristic = scoring::score(&job, profile);

				standardized += 1;
				fetch_order += 1;

				if heuristic >= floor {
					candidates.push(ScoredJob::new(job, heuristic, fetch_order));
				}
			}
		}

		let stats = refine::refine(
			&self.cfg.ai,
			self.providers.relevance.as_ref(),
			&self.limiter,
			profile,
			&mut candidates,
			deadline,
		)
		.await;
		let candidate_count = candidates.len();
		let ranked = rank::rank(
			candidates,
			self.cfg.ranking.ai_weight,
			self.cfg.ranking.max_results as usize,
		);

		tracing::info!(
			%search_id,
			cache_key_prefix = cache_key_prefix(key),
			raw_count,
			standardized,
			candidate_count,
			ai_batches = stats.batches,
			ai_refined = stats.refined,
			ai_denied = stats.denied,
			ai_failed = stats.failed,
			total_found = ranked.total_found,
			returned = ranked.jobs.len(),
			"Search pipeline finished."
		);

		Ok(ranked)
	}

	/// Fans out to every source concurrently. The result is in source registration order.
	async fn fetch_all(
		&self,
		profile: &SearchProfile,
		key: &str,
		search_id: Uuid,
		deadline: Instant,
	) -> Result<Vec<(String, Vec<RawPosting>)>> {
		let cfg = &self.cfg.sources;
		let plan = FetchPlan {
			max_results: cfg.max_results_per_source,
			timeout: Duration::from_millis(cfg.timeout_ms),
			max_attempts: cfg.max_attempts.max(1),
			retry_delay: Duration::from_millis(cfg.retry_delay_ms),
			deadline,
		};
		let mut tasks = JoinSet::new();

		for (index, adapter) in self.providers.sources.iter().enumerate() {
			let adapter = Arc::clone(adapter);
			let profile = profile.clone();

			tasks.spawn(async move {
				let postings = fetch_source(adapter.as_ref(), &profile, plan, search_id).await;

				(index, adapter.name().to_string(), postings)
			});
		}

		let mut slots: Vec<Option<(String, Vec<RawPosting>)>> =
			vec![None; self.providers.sources.len()];

		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok((index, source, postings)) => slots[index] = Some((source, postings)),
				Err(err) => {
					tracing::error!(
						%search_id,
						error = %err,
						cache_key_prefix = cache_key_prefix(key),
						stage = "fetch",
						"Source task aborted."
					);

					return Err(Error::Internal { stage: "fetch", message: err.to_string() });
				},
			}
		}

		Ok(slots.into_iter().flatten().collect())
	}
}

/// Runs one adapter with retries inside its timeout. Failures contribute no postings.
async fn fetch_source(
	adapter: &dyn SourceAdapter,
	profile: &SearchProfile,
	plan: FetchPlan,
	search_id: Uuid,
) -> Vec<RawPosting> {
	let source = adapter.name();
	let limit = plan.deadline.min(Instant::now() + plan.timeout);
	let attempts = async {
		let mut attempt = 0;

		loop {
			attempt += 1;

			match adapter.fetch(profile, plan.max_results).await {
				Ok(postings) => return Ok(postings),
				Err(err) if attempt < plan.max_attempts => {
					tracing::warn!(
						%search_id,
						source,
						attempt,
						error = %err,
						"Source fetch failed; retrying."
					);
					tokio::time::sleep(plan.retry_delay).await;
				},
				Err(err) => return Err(err),
			}
		}
	};

	match tokio::time::timeout_at(limit, attempts).await {
		Ok(Ok(mut postings)) => {
			postings.truncate(plan.max_results as usize);

			tracing::info!(%search_id, source, count = postings.len(), "Source fetch finished.");

			postings
		},
		Ok(Err(err)) => {
			tracing::warn!(
				%search_id,
				source,
				error = %err,
				"Source fetch failed; contributing no jobs."
			);

			Vec::new()
		},
		Err(_) => {
			tracing::warn!(%search_id, source, "Source fetch timed out; contributing no jobs.");

			Vec::new()
		},
	}
}
