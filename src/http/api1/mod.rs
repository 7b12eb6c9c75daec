mod api;
mod equipment;
mod error;
mod extract;
mod facets;
mod list;
mod search;

pub use {
	api::{router, Config},
	list::ListString,
};
