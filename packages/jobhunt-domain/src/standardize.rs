use std::collections::BTreeMap;

use crate::{IndeedPosting, Job, LinkedInPosting, NOT_AVAILABLE, RawPosting, RozeePosting};

const PLACEHOLDER_VALUES: [&str; 6] = ["n/a", "nan", "none", "null", "not specified", "unknown"];

/// Maps a provider record onto the canonical job schema.
///
/// Returns `None` when the record has neither a title nor an apply link.
pub fn standardize(raw: RawPosting, source: &str) -> Option<Job> {
	let job = match raw {
		RawPosting::Indeed(posting) => from_indeed(posting, source),
		RawPosting::LinkedIn(posting) => from_linkedin(posting, source),
		RawPosting::Rozee(posting) => from_rozee(posting, source),
	};

	if job.job_title == NOT_AVAILABLE && job.apply_link == NOT_AVAILABLE {
		return None;
	}

	Some(job)
}

fn from_indeed(posting: IndeedPosting, source: &str) -> Job {
	let mut details = BTreeMap::new();

	insert_detail(&mut details, "company_industry", posting.company_industry);
	insert_detail(&mut details, "job_level", posting.job_level.clone());
	insert_detail(&mut details, "company_rating", posting.company_rating.map(|r| format!("{r:.1}")));

	if posting.is_remote == Some(true) {
		details.insert("remote".to_string(), "yes".to_string());
	}

	Job {
		job_title: text(posting.title),
		company: text(posting.company),
		experience: text(posting.job_level),
		job_nature: nature(posting.job_type),
		location: text(posting.location),
		salary: salary_range(
			posting.min_amount,
			posting.max_amount,
			posting.currency.as_deref(),
			posting.interval.as_deref(),
		),
		apply_link: text(posting.job_url),
		source: text(Some(source.to_string())),
		posted_date: text(posting.date_posted),
		description: text(posting.description),
		skills: Vec::new(),
		details,
		relevance_score: 0.0,
	}
}

fn from_linkedin(posting: LinkedInPosting, source: &str) -> Job {
	let mut details = BTreeMap::new();

	insert_detail(&mut details, "company_industry", posting.company_industry);
	insert_detail(&mut details, "job_function", posting.job_function);
	insert_detail(&mut details, "seniority_level", posting.job_level.clone());
	insert_detail(&mut details, "applicants", posting.applicants);

	Job {
		job_title: text(posting.title),
		company: text(posting.company),
		experience: text(posting.job_level),
		job_nature: nature(posting.job_type),
		location: text(posting.location),
		salary: salary_range(
			posting.min_amount,
			posting.max_amount,
			posting.currency.as_deref(),
			posting.interval.as_deref(),
		),
		apply_link: text(posting.job_url),
		source: text(Some(source.to_string())),
		posted_date: text(posting.date_posted),
		description: text(posting.description),
		skills: Vec::new(),
		details,
		relevance_score: 0.0,
	}
}

fn from_rozee(posting: RozeePosting, source: &str) -> Job {
	let mut details = BTreeMap::new();

	insert_detail(&mut details, "industry", posting.industry);
	insert_detail(&mut details, "functional_area", posting.functional_area);
	insert_detail(&mut details, "career_level", posting.career_level);
	insert_detail(&mut details, "minimum_education", posting.minimum_education);
	insert_detail(&mut details, "total_positions", posting.total_positions);
	insert_detail(&mut details, "job_shift", posting.job_shift);
	insert_detail(&mut details, "apply_before", posting.apply_before);

	let skills = posting
		.skills
		.unwrap_or_default()
		.into_iter()
		.map(|skill| skill.trim().to_string())
		.filter(|skill| !is_placeholder(skill))
		.collect();

	Job {
		job_title: text(posting.title),
		company: text(posting.company),
		experience: text(posting.experience),
		job_nature: nature(posting.job_type),
		location: text(posting.location),
		salary: text(posting.salary),
		apply_link: text(posting.url),
		source: text(Some(source.to_string())),
		posted_date: text(posting.posting_date),
		description: text(posting.full_details),
		skills,
		details,
		relevance_score: 0.0,
	}
}

fn text(value: Option<String>) -> String {
	match value {
		Some(value) if !is_placeholder(&value) => value.trim().to_string(),
		_ => NOT_AVAILABLE.to_string(),
	}
}

fn is_placeholder(value: &str) -> bool {
	let lowered = value.trim().to_lowercase();

	lowered.is_empty() || PLACEHOLDER_VALUES.contains(&lowered.as_str())
}

fn insert_detail(details: &mut BTreeMap<String, String>, key: &str, value: Option<String>) {
	let value = text(value);

	if value != NOT_AVAILABLE {
		details.insert(key.to_string(), value);
	}
}

/// Title-cases a provider job type, e.g. "fulltime" -> "Fulltime", "part time" -> "Part Time".
fn nature(value: Option<String>) -> String {
	let value = text(value);

	if value == NOT_AVAILABLE {
		return value;
	}

	value
		.split_whitespace()
		.map(|word| {
			let mut chars = word.chars();

			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}

/// "USD 90,000 - 120,000 per yearly", or a single amount when both bounds agree.
pub fn salary_range(
	min_amount: Option<f64>,
	max_amount: Option<f64>,
	currency: Option<&str>,
	interval: Option<&str>,
) -> String {
	let amounts = match (min_amount.filter(|v| v.is_finite()), max_amount.filter(|v| v.is_finite())) {
		(Some(min), Some(max)) if group_thousands(min) == group_thousands(max) => group_thousands(min),
		(Some(min), Some(max)) => format!("{} - {}", group_thousands(min), group_thousands(max)),
		(Some(amount), None) | (None, Some(amount)) => group_thousands(amount),
		(None, None) => return NOT_AVAILABLE.to_string(),
	};
	let currency = currency.map(str::trim).filter(|c| !c.is_empty()).unwrap_or("USD");
	let interval = interval.map(str::trim).filter(|i| !i.is_empty()).unwrap_or("yearly");

	format!("{currency} {amounts} per {interval}")
}

fn group_thousands(amount: f64) -> String {
	let rounded = amount.round() as i64;
	let digits = rounded.unsigned_abs().to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

	if rounded < 0 {
		out.push('-');
	}

	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}

		out.push(ch);
	}

	out
}
