//! Deterministic heuristic relevance of a job to a search profile.
//!
//! The score is a weighted sum of independent sub-matches, each in [0, 1]. All comparisons are
//! case-insensitive and no term performs I/O.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::{Job, SearchProfile, is_unknown, profile::compact};

pub const HEURISTIC_WEIGHTS: Weights =
	Weights { title: 0.30, skills: 0.40, location: 0.10, job_nature: 0.10, experience: 0.10 };

/// Skills shorter than this only match whole tokens ("Go", "C", "R").
const MIN_SUBSTRING_SKILL_CHARS: usize = 3;

static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").ok());

#[derive(Clone, Copy, Debug)]
pub struct Weights {
	pub title: f32,
	pub skills: f32,
	pub location: f32,
	pub job_nature: f32,
	pub experience: f32,
}
impl Weights {
	pub fn sum(&self) -> f32 {
		self.title + self.skills + self.location + self.job_nature + self.experience
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreBreakdown {
	pub title: f32,
	pub skills: f32,
	pub location: f32,
	pub job_nature: f32,
	pub experience: f32,
}
impl ScoreBreakdown {
	pub fn weighted(&self, weights: &Weights) -> f32 {
		let terms = [
			(weights.title, self.title),
			(weights.skills, self.skills),
			(weights.location, self.location),
			(weights.job_nature, self.job_nature),
			(weights.experience, self.experience),
		];
		// Accumulate in f64 so a full match lands on exactly 1.0.
		let total: f64 =
			terms.iter().map(|(weight, term)| f64::from(*weight) * f64::from(*term)).sum();

		(total as f32).clamp(0.0, 1.0)
	}
}

pub fn score(job: &Job, profile: &SearchProfile) -> f32 {
	breakdown(job, profile).weighted(&HEURISTIC_WEIGHTS)
}

pub fn breakdown(job: &Job, profile: &SearchProfile) -> ScoreBreakdown {
	ScoreBreakdown {
		title: title_match(&profile.position, &job.job_title),
		skills: skills_match(&profile.skills, &job.searchable_text()),
		location: location_match(&profile.location, &job.location),
		job_nature: job_nature_match(&profile.job_nature, &job.job_nature),
		experience: experience_match(&profile.experience, &job.experience),
	}
}

/// 1.0 when the title contains the whole position, otherwise the share of position tokens found
/// in the title.
pub fn title_match(position: &str, title: &str) -> f32 {
	if is_unknown(position) || is_unknown(title) {
		return 0.0;
	}

	let position = normalize_spaces(position);
	let title = normalize_spaces(title);

	if title.contains(&position) {
		return 1.0;
	}

	let wanted = tokens(&position, 2);

	if wanted.is_empty() {
		return 0.0;
	}

	let present: HashSet<String> = tokens(&title, 2).into_iter().collect();
	let matched = wanted.iter().filter(|token| present.contains(token.as_str())).count();

	matched as f32 / wanted.len() as f32
}

/// Share of profile skills mentioned in `text`. `text` must already be lower-cased.
pub fn skills_match(skills: &[String], text: &str) -> f32 {
	if skills.is_empty() || text.trim().is_empty() {
		return 0.0;
	}

	let text_tokens: HashSet<String> = tokens(text, 1).into_iter().collect();
	let matched = skills.iter().filter(|skill| skill_present(skill, text, &text_tokens)).count();

	matched as f32 / skills.len() as f32
}

pub fn location_match(wanted: &str, actual: &str) -> f32 {
	if is_unknown(wanted) || is_unknown(actual) {
		return 0.0;
	}

	let wanted = normalize_spaces(wanted);
	let actual = normalize_spaces(actual);

	if actual.contains(&wanted) || wanted.contains(&actual) {
		return 1.0;
	}

	// "Lahore, Pakistan" still matches "Lahore, Punjab, Pakistan" through its leading city.
	let city = wanted.split(',').next().map(str::trim).unwrap_or_default();

	if !city.is_empty() && actual.contains(city) {
		return 1.0;
	}

	0.0
}

pub fn job_nature_match(wanted: &str, actual: &str) -> f32 {
	if is_unknown(wanted) || is_unknown(actual) {
		return 0.0;
	}

	let wanted = compact(wanted);

	if !wanted.is_empty() && wanted == compact(actual) { 1.0 } else { 0.0 }
}

/// Overlap of year ranges when both sides carry numbers, else a case-insensitive containment
/// check.
pub fn experience_match(wanted: &str, actual: &str) -> f32 {
	if is_unknown(wanted) || is_unknown(actual) {
		return 0.0;
	}

	if let (Some(wanted), Some(actual)) = (years_range(wanted), years_range(actual)) {
		return if wanted.0 <= actual.1 && actual.0 <= wanted.1 { 1.0 } else { 0.0 };
	}

	let wanted = normalize_spaces(wanted);
	let actual = normalize_spaces(actual);

	if actual.contains(&wanted) || wanted.contains(&actual) { 1.0 } else { 0.0 }
}

/// Parses "2 years" -> (2, 2), "2-5 years" -> (2, 5), "3+ years" -> (3, inf).
pub fn years_range(value: &str) -> Option<(f32, f32)> {
	let re = NUMBER.as_ref()?;
	let numbers: Vec<f32> =
		re.find_iter(value).filter_map(|m| m.as_str().parse::<f32>().ok()).take(2).collect();
	let first = *numbers.first()?;
	let lowered = value.to_lowercase();
	let open_ended = lowered.contains('+')
		|| ["at least", "minimum", "min.", "or more", "plus"].iter().any(|kw| lowered.contains(kw));

	match numbers.get(1) {
		Some(&second) if !open_ended => Some((first.min(second), first.max(second))),
		_ if open_ended => Some((first, f32::INFINITY)),
		_ => Some((first, first)),
	}
}

fn skill_present(skill: &str, text: &str, text_tokens: &HashSet<String>) -> bool {
	let skill = normalize_spaces(skill);
	let significant = skill.chars().filter(|ch| ch.is_alphanumeric()).count();

	if significant >= MIN_SUBSTRING_SKILL_CHARS && text.contains(&skill) {
		return true;
	}

	let wanted = tokens(&skill, 1);

	!wanted.is_empty() && wanted.iter().all(|token| text_tokens.contains(token.as_str()))
}

fn normalize_spaces(value: &str) -> String {
	value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn tokens(value: &str, min_len: usize) -> Vec<String> {
	let mut normalized = String::with_capacity(value.len());

	for ch in value.chars() {
		if ch.is_alphanumeric() {
			normalized.extend(ch.to_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in normalized.split_whitespace() {
		if token.chars().count() < min_len {
			continue;
		}
		if seen.insert(token) {
			out.push(token.to_string());
		}
	}

	out
}
