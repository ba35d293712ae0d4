use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use jobhunt_config::Ai;
use jobhunt_domain::{ScoredJob, SearchProfile, is_unknown};

use crate::{RateLimiter, RelevanceProvider};

const DESCRIPTION_PROMPT_CHARS: usize = 1_200;

/// Outcome counters for one refinement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefineStats {
	pub batches: usize,
	pub refined: usize,
	pub denied: usize,
	pub failed: usize,
}

/// Sets `ai_score` on the jobs the relevance model scores. Batches that are denied by the limiter,
/// fail, or time out keep their heuristic scores.
pub async fn refine(
	cfg: &Ai,
	relevance: &dyn RelevanceProvider,
	limiter: &RateLimiter,
	profile: &SearchProfile,
	jobs: &mut [ScoredJob],
	deadline: Instant,
) -> RefineStats {
	let mut stats = RefineStats::default();

	if !cfg.enabled || jobs.is_empty() {
		return stats;
	}

	let batch_size = (cfg.batch_size as usize).max(1);

	for batch in jobs.chunks_mut(batch_size) {
		stats.batches += 1;

		let wait_until = deadline.min(Instant::now() + Duration::from_millis(cfg.max_wait_ms));

		if !limiter.acquire_blocking(wait_until).await.is_granted() {
			tracing::warn!(batch_len = batch.len(), "AI quota exhausted; keeping heuristic scores.");

			stats.denied += 1;

			continue;
		}

		let messages = build_relevance_messages(profile, batch);
		let call_deadline = deadline.min(Instant::now() + Duration::from_millis(cfg.timeout_ms));
		let call = relevance.score(cfg, &messages, batch.len());

		match tokio::time::timeout_at(call_deadline, call).await {
			Ok(Ok(scores)) =>
				for (job, score) in batch.iter_mut().zip(scores) {
					if let Some(score) = score {
						job.ai_score = Some(score);
						stats.refined += 1;
					}
				},
			Ok(Err(err)) => {
				tracing::warn!(
					error = %err,
					batch_len = batch.len(),
					"AI relevance call failed; keeping heuristic scores."
				);

				stats.failed += 1;
			},
			Err(_) => {
				tracing::warn!(
					batch_len = batch.len(),
					"AI relevance call timed out; keeping heuristic scores."
				);

				stats.failed += 1;
			},
		}
	}

	stats
}

pub fn build_relevance_messages(profile: &SearchProfile, batch: &[ScoredJob]) -> Vec<Value> {
	let schema = serde_json::json!({
		"scores": [{ "index": 0, "score": 0.0 }]
	});
	let schema_text = serde_json::to_string_pretty(&schema)
		.unwrap_or_else(|_| "{\"scores\": [{\"index\": 0, \"score\": 0.0}]}".to_string());
	let criteria = serde_json::json!({
		"position": profile.position,
		"experience": profile.experience,
		"salary": profile.salary,
		"job_nature": profile.job_nature,
		"location": profile.location,
		"skills": profile.skills,
	});
	let jobs: Vec<Value> = batch
		.iter()
		.enumerate()
		.map(|(index, scored)| {
			let job = &scored.job;

			serde_json::json!({
				"index": index,
				"title": job.job_title,
				"company": job.company,
				"location": job.location,
				"salary": job.salary,
				"experience": job.experience,
				"job_nature": job.job_nature,
				"source": job.source,
				"posted_date": job.posted_date,
				"skills": job.skills,
				"details": job.details,
				"description": description_excerpt(&job.description),
			})
		})
		.collect();
	let jobs_text = serde_json::to_string_pretty(&jobs).unwrap_or_else(|_| "[]".to_string());
	let criteria_text =
		serde_json::to_string_pretty(&criteria).unwrap_or_else(|_| "{}".to_string());
	let system_prompt = "You are a job relevance scorer for a job search assistant. \
Output must be valid JSON only and must match the provided schema exactly. \
Score every job from 0.0 (not relevant) to 1.0 (perfect match) against the candidate criteria. \
Weigh position, experience level, location, skills, job nature, salary and career level. \
Do not add explanations or extra fields.";
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema_text}\nConstraints:\n- One entry per job, using the job's index.\n- JOB_COUNT = {count}\nCandidate criteria:\n{criteria_text}\nJobs:\n{jobs_text}",
		count = batch.len(),
	);

	vec![
		serde_json::json!({ "role": "system", "content": system_prompt }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

fn description_excerpt(description: &str) -> String {
	if is_unknown(description) {
		return String::new();
	}

	description.chars().take(DESCRIPTION_PROMPT_CHARS).collect()
}
