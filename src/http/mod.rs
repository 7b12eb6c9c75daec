mod api1;
mod health;
mod http;
mod service;
mod view;

pub use http::{serve, Config, DisplayConfig};
