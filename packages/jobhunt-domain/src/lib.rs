pub mod job;
pub mod posting;
pub mod profile;
pub mod rank;
pub mod scoring;
pub mod standardize;

mod error;

pub use error::{Error, Result};
pub use job::{Job, NOT_AVAILABLE, ScoredJob, is_unknown};
pub use posting::{IndeedPosting, LinkedInPosting, RawPosting, RozeePosting};
pub use profile::SearchProfile;
pub use rank::RankedJobs;
