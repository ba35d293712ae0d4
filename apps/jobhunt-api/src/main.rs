use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = jobhunt_api::Args::parse();

	jobhunt_api::run(args).await
}
