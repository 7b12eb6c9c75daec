use std::sync::Arc;

use anyhow::Context;
use figment::{
	providers::{Env, Format, Toml},
	Figment,
};
use futures::FutureExt;
use gear_selector::{catalog, http, tracing};
use serde::Deserialize;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
struct Config {
	// tracing: tracing::Config, - read individually.
	http: http::Config,
	catalog: catalog::Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// Prepare the configuration hierarchy.
	let figment = Figment::new()
		.merge(Toml::file("gear_selector.toml"))
		.merge(Env::prefixed("GS_").split("_"));

	// Tracing is bootstrapped from its own section first, so anything that
	// traces while the rest of the configuration is read is captured.
	let tracing_config = figment
		.extract_inner::<tracing::Config>("tracing")
		.context("failed to initialize tracing config")?;
	tracing::init(tracing_config);

	// Load the rest of the configuration.
	let config = figment
		.extract::<Config>()
		.context("failed to extract config")?;

	let catalog =
		Arc::new(catalog::Catalog::new(config.catalog).context("failed to create catalog")?);

	// Set up a cancellation token that will fire when a shutdown signal is recieved.
	let shutdown_token = shutdown_token();

	tokio::try_join!(
		catalog
			.start(shutdown_token.child_token())
			.map(|result| result.context("catalog service")),
		http::serve(shutdown_token, config.http, catalog.clone()),
	)
	.context("failed to start server")?;

	Ok(())
}

fn shutdown_token() -> CancellationToken {
	// Create a token to represent the shutdown signal.
	let token = CancellationToken::new();

	// Set up a background task to wait for the signal with a copy of the token.
	let inner_token = token.clone();
	tokio::spawn(async move {
		shutdown_signal().await;
		inner_token.cancel();
	});

	token
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("Failed to install Ctrl+C handler.");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("Failed to install SIGTERM handler.")
			.recv()
			.await
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	::tracing::info!("shutdown signal received");
}
