use axum::{routing::get, Router};

use crate::http::http::HttpState;

use super::{detail, lookup};

pub fn router(state: HttpState) -> Router {
	Router::new()
		.route("/", get(lookup::lookup))
		.route("/item/{index}", get(detail::detail))
		.with_state(state)
}
