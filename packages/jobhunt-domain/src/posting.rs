//! Provider-specific records as returned by the source adapters.
//!
//! Field names follow each provider's wire format. Every field is optional; the standardizer
//! decides what is usable.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum RawPosting {
	Indeed(IndeedPosting),
	#[serde(rename = "linkedin")]
	LinkedIn(LinkedInPosting),
	Rozee(RozeePosting),
}
impl RawPosting {
	pub fn provider(&self) -> &'static str {
		match self {
			Self::Indeed(_) => "indeed",
			Self::LinkedIn(_) => "linkedin",
			Self::Rozee(_) => "rozee",
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndeedPosting {
	pub title: Option<String>,
	pub company: Option<String>,
	pub location: Option<String>,
	pub job_url: Option<String>,
	pub description: Option<String>,
	pub job_type: Option<String>,
	pub job_level: Option<String>,
	pub date_posted: Option<String>,
	pub min_amount: Option<f64>,
	pub max_amount: Option<f64>,
	pub currency: Option<String>,
	pub interval: Option<String>,
	pub company_industry: Option<String>,
	pub company_rating: Option<f64>,
	pub is_remote: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInPosting {
	pub title: Option<String>,
	pub company: Option<String>,
	pub location: Option<String>,
	pub job_url: Option<String>,
	pub description: Option<String>,
	pub job_type: Option<String>,
	pub job_level: Option<String>,
	pub job_function: Option<String>,
	pub company_industry: Option<String>,
	pub date_posted: Option<String>,
	pub min_amount: Option<f64>,
	pub max_amount: Option<f64>,
	pub currency: Option<String>,
	pub interval: Option<String>,
	pub applicants: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RozeePosting {
	pub title: Option<String>,
	pub company: Option<String>,
	pub location: Option<String>,
	pub url: Option<String>,
	pub experience: Option<String>,
	pub salary: Option<String>,
	pub job_type: Option<String>,
	pub industry: Option<String>,
	pub functional_area: Option<String>,
	pub career_level: Option<String>,
	pub minimum_education: Option<String>,
	pub total_positions: Option<String>,
	pub job_shift: Option<String>,
	pub posting_date: Option<String>,
	pub apply_before: Option<String>,
	pub full_details: Option<String>,
	pub skills: Option<Vec<String>>,
}
