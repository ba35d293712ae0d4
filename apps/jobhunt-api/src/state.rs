use std::sync::Arc;

use jobhunt_service::{JobHuntService, Providers};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<JobHuntService>,
}
impl AppState {
	pub fn new(config: jobhunt_config::Config) -> Self {
		Self { service: Arc::new(JobHuntService::new(config)) }
	}

	pub fn with_providers(config: jobhunt_config::Config, providers: Providers) -> Self {
		Self { service: Arc::new(JobHuntService::with_providers(config, providers)) }
	}
}
