use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::{Job, ScoredJob, is_unknown};

/// Final, ordered output of one pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedJobs {
	/// Sorted non-increasing by `relevance_score`.
	pub jobs: Vec<Job>,
	/// Distinct jobs that passed the floor, before truncation.
	pub total_found: usize,
}

/// Collapses scores, sorts, drops duplicates (keeping the higher-ranked copy) and truncates.
pub fn rank(scored: Vec<ScoredJob>, ai_weight: f32, max_results: usize) -> RankedJobs {
	let mut entries: Vec<(usize, Job)> = scored
		.into_iter()
		.map(|scored| {
			let order = scored.fetch_order;

			(order, scored.into_job(ai_weight))
		})
		.collect();

	entries.sort_by(|(a_order, a), (b_order, b)| {
		cmp_score_desc(a.relevance_score, b.relevance_score).then(a_order.cmp(b_order))
	});

	let mut jobs = dedup(entries.into_iter().map(|(_, job)| job));
	let total_found = jobs.len();

	jobs.truncate(max_results);

	RankedJobs { jobs, total_found }
}

/// Keeps the first occurrence of each job. Two jobs are the same when they share a known apply
/// link, or a case-insensitive (title, company) pair with both parts known.
pub fn dedup(jobs: impl IntoIterator<Item = Job>) -> Vec<Job> {
	let mut seen_links = HashSet::new();
	let mut seen_pairs = HashSet::new();
	let mut out = Vec::new();

	for job in jobs {
		let link = link_key(&job);
		let pair = pair_key(&job);
		let duplicate = link.as_ref().is_some_and(|key| seen_links.contains(key))
			|| pair.as_ref().is_some_and(|key| seen_pairs.contains(key));

		if duplicate {
			continue;
		}
		if let Some(link) = link {
			seen_links.insert(link);
		}
		if let Some(pair) = pair {
			seen_pairs.insert(pair);
		}

		out.push(job);
	}

	out
}

pub fn cmp_score_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn link_key(job: &Job) -> Option<String> {
	if !job.has_apply_link() {
		return None;
	}

	Some(job.apply_link.trim().trim_end_matches('/').to_string())
}

fn pair_key(job: &Job) -> Option<(String, String)> {
	if is_unknown(&job.job_title) || is_unknown(&job.company) {
		return None;
	}

	Some((job.job_title.trim().to_lowercase(), job.company.trim().to_lowercase()))
}
