use std::sync::Arc;

use aide::OperationIo;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::request::Parts,
};

use crate::{catalog::Dataset, http::service::Service};

use super::error::Error;

/// The loaded catalog dataset. Rejects with 503 while the catalog is loading
/// or after it has failed to load.
#[derive(OperationIo)]
pub struct LoadedDataset(pub Arc<Dataset>);

impl<S> FromRequestParts<S> for LoadedDataset
where
	S: Send + Sync,
	Service: FromRef<S>,
{
	type Rejection = Error;

	async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Service { catalog } = Service::from_ref(state);
		let dataset = catalog.dataset()?;
		Ok(Self(dataset))
	}
}

#[derive(FromRequestParts, OperationIo)]
#[from_request(via(axum::extract::Path), rejection(Error))]
#[aide(input_with = "axum::extract::Path<T>", json_schema)]
pub struct Path<T>(pub T);

#[derive(FromRequestParts, OperationIo)]
#[from_request(via(axum::extract::Query), rejection(Error))]
#[aide(input_with = "axum::extract::Query<T>", json_schema)]
pub struct Query<T>(pub T);
