use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel stored in every string field whose value is unknown.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
	pub job_title: String,
	pub company: String,
	pub experience: String,
	pub job_nature: String,
	pub location: String,
	pub salary: String,
	pub apply_link: String,
	pub source: String,
	pub posted_date: String,
	pub description: String,
	pub skills: Vec<String>,
	/// Source-specific context such as industry or seniority, keyed by a snake_case label.
	pub details: BTreeMap<String, String>,
	pub relevance_score: f32,
}
impl Job {
	pub fn has_apply_link(&self) -> bool {
		!is_unknown(&self.apply_link)
	}

	/// Lower-cased text the heuristic skills term searches: title, description, skills and details.
	pub fn searchable_text(&self) -> String {
		let mut parts: Vec<&str> = Vec::with_capacity(3 + self.skills.len() + self.details.len());

		for value in [&self.job_title, &self.description] {
			if !is_unknown(value) {
				parts.push(value);
			}
		}

		parts.extend(self.skills.iter().map(String::as_str));
		parts.extend(self.details.values().filter(|value| !is_unknown(value)).map(String::as_str));

		parts.join("\n").to_lowercase()
	}
}

/// A standardized job moving through the pipeline with its intermediate scores.
#[derive(Clone, Debug)]
pub struct ScoredJob {
	pub job: Job,
	pub heuristic_score: f32,
	pub ai_score: Option<f32>,
	/// Position in source registration order, then within-source order. Used as the tie-break.
	pub fetch_order: usize,
}
impl ScoredJob {
	pub fn new(job: Job, heuristic_score: f32, fetch_order: usize) -> Self {
		Self { job, heuristic_score, ai_score: None, fetch_order }
	}

	pub fn final_score(&self, ai_weight: f32) -> f32 {
		match self.ai_score {
			Some(ai) => (ai_weight * ai + (1.0 - ai_weight) * self.heuristic_score).clamp(0.0, 1.0),
			None => self.heuristic_score,
		}
	}

	pub fn into_job(self, ai_weight: f32) -> Job {
		let relevance_score = self.final_score(ai_weight);
		let mut job = self.job;

		job.relevance_score = relevance_score;

		job
	}
}

pub fn is_unknown(value: &str) -> bool {
	let trimmed = value.trim();

	trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn job() -> Job {
		Job {
			job_title: "Backend Engineer".to_string(),
			company: "Acme".to_string(),
			experience: NOT_AVAILABLE.to_string(),
			job_nature: "Full Time".to_string(),
			location: "Karachi, Pakistan".to_string(),
			salary: NOT_AVAILABLE.to_string(),
			apply_link: NOT_AVAILABLE.to_string(),
			source: "Indeed".to_string(),
			posted_date: NOT_AVAILABLE.to_string(),
			description: "Build Rust services.".to_string(),
			skills: vec!["PostgreSQL".to_string()],
			details: BTreeMap::from([("industry".to_string(), "Fintech".to_string())]),
			relevance_score: 0.0,
		}
	}

	#[test]
	fn searchable_text_skips_sentinels() {
		let mut job = job();

		job.description = NOT_AVAILABLE.to_string();

		let text = job.searchable_text();

		assert!(text.contains("backend engineer"));
		assert!(text.contains("postgresql"));
		assert!(text.contains("fintech"));
		assert!(!text.contains("n/a"));
	}

	#[test]
	fn ai_score_replaces_heuristic_at_full_weight() {
		let mut scored = ScoredJob::new(job(), 0.5, 0);

		assert_eq!(scored.final_score(1.0), 0.5);

		scored.ai_score = Some(0.9);

		assert_eq!(scored.final_score(1.0), 0.9);
		assert_eq!(scored.into_job(1.0).relevance_score, 0.9);
	}

	#[test]
	fn ai_weight_blends_scores() {
		let mut scored = ScoredJob::new(job(), 0.5, 0);

		scored.ai_score = Some(1.0);

		assert!((scored.final_score(0.7) - 0.85).abs() < 1e-6);
	}
}
