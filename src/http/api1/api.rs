use std::sync::Arc;

use aide::{axum::ApiRouter, openapi, transform::TransformOpenApi};
use axum::{
	debug_handler,
	extract::{FromRef, State},
	http::Uri,
	response::IntoResponse,
	routing::get,
	Json, Router,
};
use git_version::git_version;
use maud::{html, DOCTYPE};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::http::{http::HttpState, service::Service, DisplayConfig};

use super::{equipment, facets, search};

const OPENAPI_JSON_ROUTE: &str = "/openapi.json";

#[derive(Debug, Deserialize)]
pub struct Config {
	search: search::Config,
}

#[derive(Clone, FromRef)]
pub struct ApiState {
	pub services: Service,
	pub display: DisplayConfig,
}

pub fn router(config: Config, state: HttpState) -> Router {
	let mut openapi = openapi::OpenApi::default();

	let state = ApiState {
		services: state.services,
		display: state.display,
	};

	ApiRouter::new()
		.nest(
			"/equipment",
			equipment::router(state.clone()).with_path_items(|item| item.tag("equipment")),
		)
		.nest(
			"/facets",
			facets::router(state.clone()).with_path_items(|item| item.tag("facets")),
		)
		.nest(
			"/search",
			search::router(config.search, state).with_path_items(|item| item.tag("search")),
		)
		.finish_api_with(&mut openapi, api_docs)
		.route(
			OPENAPI_JSON_ROUTE,
			get(openapi_json).with_state(OpenApiState {
				openapi: Arc::new(openapi),
			}),
		)
		.layer(CorsLayer::permissive())
		.route("/docs", get(scalar))
}

fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
	let mut api = api
		.title("gear_selector")
		.version(git_version!(prefix = "1-", fallback = "unknown"))
		.tag(openapi::Tag {
			name: "equipment".into(),
			description: Some("Endpoints for reading individual equipment records, addressed by their position in the catalog.".into()),
			..Default::default()
		})
		.tag(openapi::Tag {
			name: "facets".into(),
			description: Some("Endpoints describing the values each search facet accepts.".into()),
			..Default::default()
		})
		.tag(openapi::Tag {
			name: "search".into(),
			description: Some("Endpoints for filtering the equipment catalog by facet selection.".into()),
			..Default::default()
		});

	let openapi = api.inner_mut();

	if let Some(paths) = openapi.paths.take() {
		openapi.paths = Some(openapi::Paths {
			paths: paths
				.paths
				.into_iter()
				// Ensure we've not ended up with any trailing slashes.
				.map(|(path, item)| (path.trim_end_matches('/').into(), item))
				.collect(),
			..paths
		})
	}

	api
}

#[derive(Clone, FromRef)]
struct OpenApiState {
	openapi: Arc<openapi::OpenApi>,
}

#[debug_handler]
async fn openapi_json(State(openapi): State<Arc<openapi::OpenApi>>) -> impl IntoResponse {
	Json(openapi.as_ref()).into_response()
}

#[debug_handler]
async fn scalar(uri: Uri) -> impl IntoResponse {
	html! {
		(DOCTYPE)
		html {
			head {
				title { "gear_selector API documentation" }
				meta charset="utf-8";
				meta name="viewport" content="width=device-width, initial-scale=1";
			}
			body {
				script id="api-reference" data-url={ "." (OPENAPI_JSON_ROUTE) } {}
				// Point the reference at the server the browser actually reached, so
				// urls stay relative to the API mount point behind reverse proxies.
				script {
					"var route = '" (uri.to_string()) "';"
					r#"
					var serverUrl = location.origin + location.pathname.replace(new RegExp(route + '$'), '');
					var configuration = { servers: [{ url: serverUrl }] };
					document.getElementById('api-reference').dataset.configuration = JSON.stringify(configuration);
					"#
				}
				script src="https://cdn.jsdelivr.net/npm/@scalar/api-reference" {}
			}
		}
	}
}
