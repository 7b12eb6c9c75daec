mod base;
mod card;
mod detail;
mod error;
mod lookup;
mod view;

pub use view::router;
