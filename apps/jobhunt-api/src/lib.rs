pub mod routes;
pub mod state;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::Parser;
use color_eyre::eyre;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing_subscriber::EnvFilter;

use jobhunt_service::JobHuntService;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = jobhunt_cli::VERSION,
	rename_all = "kebab",
	styles = jobhunt_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub common: jobhunt_cli::ConfigArgs,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = jobhunt_config::load(&args.common.config)?;

	init_tracing(args.common.log_filter(&config.service.log_level))?;

	let http_addr: SocketAddr = config.service.http_bind.parse()?;

	if config.service.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(eyre::eyre!(
			"http_bind must be a loopback address when bind_localhost_only is true."
		));
	}

	let sweep_every = config
		.cache
		.enabled
		.then(|| Duration::from_secs(config.cache.sweep_interval_seconds));
	let state = AppState::new(config);

	tracing::info!(sources = state.service.providers.sources.len(), "Job sources registered.");

	let sweeper = sweep_every.map(|period| spawn_cache_sweep(state.service.clone(), period));
	let app = routes::router(state);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	let served = axum::serve(http_listener, app).await;

	if let Some(sweeper) = sweeper {
		sweeper.abort();
	}

	served?;

	Ok(())
}

/// Periodically drops expired cache entries. Lookups still expire entries lazily in between.
pub fn spawn_cache_sweep(service: Arc<JobHuntService>, period: Duration) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(period);

		// The first tick completes immediately.
		ticker.tick().await;

		loop {
			ticker.tick().await;

			let removed = service.sweep_cache();

			if removed > 0 {
				tracing::debug!(removed, "Expired cache entries swept.");
			}
		}
	})
}

fn init_tracing(log_level: &str) -> color_eyre::Result<()> {
	let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
