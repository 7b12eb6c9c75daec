pub mod catalog;
pub mod http;
pub mod query;
pub mod tracing;
