pub mod auth;
pub mod routes;
pub mod state;
pub mod time_serde;
pub mod views;

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = jotter_cli::VERSION,
	rename_all = "kebab",
	styles = jotter_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = jotter_config::load(&args.config)?;
	init_tracing(&config)?;
	let http_addr = jotter_config::http_addr(&config)?;
	let state = AppState::new(config).await?;
	let app = routes::router(state);

	let http_listener = TcpListener::bind(http_addr).await?;
	tracing::info!(%http_addr, "HTTP server listening.");
	axum::serve(http_listener, app).await?;

	Ok(())
}

fn init_tracing(config: &jotter_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|err| {
		color_eyre::eyre::eyre!("Failed to install tracing subscriber: {err}")
	})?;
	Ok(())
}
