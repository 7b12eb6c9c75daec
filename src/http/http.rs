use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use axum::{extract::FromRef, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::query::MAX_LEVEL_FACTOR;

use super::{api1, health, service, view};

#[derive(Debug, Deserialize)]
pub struct Config {
	api1: api1::Config,

	#[serde(default)]
	display: DisplayConfig,

	address: Option<IpAddr>,
	port: u16,
}

/// Presentation settings shared by the HTML views and the JSON API.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DisplayConfig {
	/// Multiplier applied to effect values when max-level figures are requested.
	pub maxfactor: f64,
}

impl Default for DisplayConfig {
	fn default() -> Self {
		Self {
			maxfactor: MAX_LEVEL_FACTOR,
		}
	}
}

#[derive(Clone, FromRef)]
pub struct HttpState {
	pub services: service::Service,
	pub display: DisplayConfig,
}

pub async fn serve(
	cancel: CancellationToken,
	config: Config,
	catalog: service::Catalog,
) -> Result<()> {
	let bind_address = SocketAddr::new(
		config.address.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
		config.port,
	);

	tracing::info!("http binding to {bind_address:?}");

	let state = HttpState {
		services: service::Service { catalog },
		display: config.display,
	};

	let listener = TcpListener::bind(bind_address)
		.await
		.with_context(|| format!("failed to bind {bind_address}"))?;

	axum::serve(listener, router(config.api1, state))
		.with_graceful_shutdown(cancel.cancelled_owned())
		.await
		.context("http server failed")?;

	Ok(())
}

pub(super) fn router(api1: api1::Config, state: HttpState) -> Router {
	Router::new()
		.merge(view::router(state.clone()))
		.nest("/api/1", api1::router(api1, state.clone()))
		.nest("/health", health::router(state))
		.layer(
			// Set up tracing, but downgrade access logs to TRACE. Spans will remain
			// at DEBUG, allowing them to show up as relevant metadata for other
			// traces / failures in the system.
			TraceLayer::new_for_http()
				.on_request(DefaultOnRequest::new().level(Level::TRACE))
				.on_response(DefaultOnResponse::new().level(Level::TRACE))
				.on_failure(DefaultOnFailure::new().level(Level::TRACE)),
		)
}
