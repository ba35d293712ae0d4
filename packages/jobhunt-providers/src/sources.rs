//! JSON job-board clients. Each source is reached through an HTTP endpoint that accepts the query
//! parameters of [`SourceQuery`] and answers with `{"jobs": [...]}` or a bare array of records.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use jobhunt_config::SourceEndpoint;
use jobhunt_domain::{IndeedPosting, LinkedInPosting, RawPosting, RozeePosting, SearchProfile};

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
	Indeed,
	LinkedIn,
	Rozee,
}
impl SourceKind {
	pub const ALL: [Self; 3] = [Self::Indeed, Self::LinkedIn, Self::Rozee];

	/// Config section name.
	pub fn id(self) -> &'static str {
		match self {
			Self::Indeed => "indeed",
			Self::LinkedIn => "linkedin",
			Self::Rozee => "rozee",
		}
	}

	/// Name stamped on every job this source produces.
	pub fn label(self) -> &'static str {
		match self {
			Self::Indeed => "Indeed",
			Self::LinkedIn => "LinkedIn",
			Self::Rozee => "Rozee.pk",
		}
	}

	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.id() == id)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceQuery {
	pub search_term: String,
	pub location: String,
	pub results_wanted: u32,
	pub hours_old: u32,
	pub job_type: &'static str,
	pub is_remote: bool,
	pub country: Option<String>,
}
impl SourceQuery {
	pub fn from_profile(
		kind: SourceKind,
		profile: &SearchProfile,
		results_wanted: u32,
		hours_old: u32,
	) -> Self {
		let country = match kind {
			SourceKind::Indeed if !profile.country().is_empty() =>
				Some(profile.country().to_string()),
			_ => None,
		};

		Self {
			search_term: profile.position.clone(),
			location: profile.location.clone(),
			results_wanted,
			hours_old,
			job_type: profile.job_type(),
			is_remote: profile.is_remote(),
			country,
		}
	}

	pub fn params(&self) -> Vec<(&'static str, String)> {
		let mut params = vec![
			("search_term", self.search_term.clone()),
			("location", self.location.clone()),
			("results_wanted", self.results_wanted.to_string()),
			("hours_old", self.hours_old.to_string()),
			("job_type", self.job_type.to_string()),
			("is_remote", self.is_remote.to_string()),
		];

		if let Some(country) = &self.country {
			params.push(("country", country.clone()));
		}

		params
	}
}

pub async fn fetch(
	endpoint: &SourceEndpoint,
	timeout: Duration,
	kind: SourceKind,
	query: &SourceQuery,
) -> Result<Vec<RawPosting>> {
	let client = Client::builder().timeout(timeout).build()?;
	let url = format!("{}{}", endpoint.api_base, endpoint.path);
	let res = client
		.get(url)
		.headers(crate::auth_headers(endpoint.api_key.as_deref(), &endpoint.default_headers)?)
		.query(&query.params())
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_postings(kind, json)
}

/// Decodes a source response into typed postings. Records that do not match the source's shape
/// are skipped.
pub fn parse_postings(kind: SourceKind, json: Value) -> Result<Vec<RawPosting>> {
	let items = match json {
		Value::Array(items) => items,
		Value::Object(mut map) => match map.remove("jobs") {
			Some(Value::Array(items)) => items,
			Some(Value::Null) | None => Vec::new(),
			Some(_) => {
				return Err(Error::InvalidResponse {
					message: format!("{} response jobs field must be an array.", kind.label()),
				});
			},
		},
		_ => {
			return Err(Error::InvalidResponse {
				message: format!("{} response must be an object or an array.", kind.label()),
			});
		},
	};
	let mut postings = Vec::with_capacity(items.len());

	for item in items {
		match decode_posting(kind, item) {
			Ok(posting) => postings.push(posting),
			Err(err) => {
				tracing::debug!(source = kind.label(), error = %err, "Skipping malformed posting.");
			},
		}
	}

	Ok(postings)
}

fn decode_posting(kind: SourceKind, item: Value) -> Result<RawPosting> {
	let posting = match kind {
		SourceKind::Indeed => RawPosting::Indeed(serde_json::from_value::<IndeedPosting>(item)?),
		SourceKind::LinkedIn =>
			RawPosting::LinkedIn(serde_json::from_value::<LinkedInPosting>(item)?),
		SourceKind::Rozee => RawPosting::Rozee(serde_json::from_value::<RozeePosting>(item)?),
	};

	Ok(posting)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile(job_nature: &str, location: &str) -> SearchProfile {
		SearchProfile::new("Data Engineer", "3 years", "", job_nature, location, "SQL")
			.expect("Profile must be valid.")
	}

	#[test]
	fn maps_profile_to_query() {
		let profile = profile("Remote", "Lahore, Pakistan");
		let query = SourceQuery::from_profile(SourceKind::Indeed, &profile, 5, 72);

		assert_eq!(query.search_term, "Data Engineer");
		assert_eq!(query.job_type, "fulltime");
		assert!(query.is_remote);
		assert_eq!(query.country.as_deref(), Some("Pakistan"));
	}

	#[test]
	fn only_indeed_carries_country() {
		let profile = profile("Part Time", "Karachi, Pakistan");
		let query = SourceQuery::from_profile(SourceKind::Rozee, &profile, 5, 72);

		assert_eq!(query.job_type, "parttime");
		assert!(query.country.is_none());
		assert!(query.params().iter().all(|(key, _)| *key != "country"));
	}

	#[test]
	fn parses_wrapped_and_bare_arrays() {
		let wrapped = serde_json::json!({ "jobs": [{ "title": "A", "job_url": "https://x/1" }] });
		let bare = serde_json::json!([{ "title": "B" }, { "title": "C" }]);

		assert_eq!(parse_postings(SourceKind::Indeed, wrapped).expect("parse failed").len(), 1);
		assert_eq!(parse_postings(SourceKind::LinkedIn, bare).expect("parse failed").len(), 2);
	}

	#[test]
	fn skips_malformed_records() {
		let json =
			serde_json::json!({ "jobs": [{ "title": 7 }, { "title": "Ok", "skills": ["Go"] }] });
		let postings = parse_postings(SourceKind::Rozee, json).expect("parse failed");

		assert_eq!(postings.len(), 1);
		assert!(
			matches!(&postings[0], RawPosting::Rozee(p) if p.skills == Some(vec!["Go".to_string()]))
		);
	}

	#[test]
	fn keeps_records_with_null_skills() {
		let json = serde_json::json!({
			"jobs": [{ "title": "Dev", "url": "https://rozee.pk/job/1", "skills": null }],
		});
		let postings = parse_postings(SourceKind::Rozee, json).expect("parse failed");

		assert_eq!(postings.len(), 1);
		assert!(matches!(&postings[0], RawPosting::Rozee(p) if p.skills.is_none()));
	}

	#[test]
	fn rejects_non_collection_response() {
		let err = parse_postings(SourceKind::Indeed, Value::String("nope".to_string()))
			.expect_err("Expected invalid response.");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}
}
