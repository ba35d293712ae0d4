use std::collections::HashSet;

use serde::Serialize;

use crate::{Error, Result};

/// The caller's search request after validation. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchProfile {
	pub position: String,
	pub experience: String,
	pub salary: String,
	pub job_nature: String,
	pub location: String,
	/// Ordered, case-insensitively unique.
	pub skills: Vec<String>,
}
impl SearchProfile {
	pub fn new(
		position: &str,
		experience: &str,
		salary: &str,
		job_nature: &str,
		location: &str,
		skills: &str,
	) -> Result<Self> {
		let position = position.trim();
		let location = location.trim();

		if position.is_empty() {
			return Err(Error::InvalidProfile {
				field: "position",
				message: "must be non-empty".to_string(),
			});
		}
		if location.is_empty() {
			return Err(Error::InvalidProfile {
				field: "location",
				message: "must be non-empty".to_string(),
			});
		}

		Ok(Self {
			position: position.to_string(),
			experience: experience.trim().to_string(),
			salary: salary.trim().to_string(),
			job_nature: job_nature.trim().to_string(),
			location: location.to_string(),
			skills: parse_skills(skills),
		})
	}

	/// Appends `country` to a location that has no comma-separated components.
	pub fn with_default_country(mut self, country: &str) -> Self {
		let country = country.trim();

		if !country.is_empty() && !self.location.contains(',') {
			self.location = format!("{}, {country}", self.location);
		}

		self
	}

	/// Job-board employment filter derived from the requested job nature.
	pub fn job_type(&self) -> &'static str {
		match compact(&self.job_nature).as_str() {
			"parttime" => "parttime",
			"contract" => "contract",
			"internship" => "internship",
			_ => "fulltime",
		}
	}

	pub fn is_remote(&self) -> bool {
		self.job_nature.to_lowercase().contains("remote")
	}

	pub fn city(&self) -> &str {
		self.location.split(',').next().map(str::trim).unwrap_or_default()
	}

	pub fn country(&self) -> &str {
		self.location.rsplit(',').next().map(str::trim).unwrap_or_default()
	}
}

/// Splits a comma-separated skill list, dropping blanks and case-insensitive repeats.
pub fn parse_skills(raw: &str) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for skill in raw.split(',') {
		let trimmed = skill.trim();

		if trimmed.is_empty() {
			continue;
		}
		if seen.insert(trimmed.to_lowercase()) {
			out.push(trimmed.to_string());
		}
	}

	out
}

/// Lower-cased alphanumeric characters only, so "Full-Time" and "full time" compare equal.
pub(crate) fn compact(value: &str) -> String {
	value.chars().filter(|ch| ch.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}
