use aide::OperationOutput;
use axum::{
	extract::rejection::{PathRejection, QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response as AxumResponse},
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::catalog;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("not found: {0}")]
	NotFound(String),

	#[error("invalid request: {0}")]
	Invalid(String),

	#[error("unavailable: {0}")]
	Unavailable(String),

	#[error("internal server error")]
	Other(#[from] anyhow::Error),
}

impl From<catalog::Error> for Error {
	fn from(error: catalog::Error) -> Self {
		use catalog::Error as CE;
		match error {
			CE::NotFound { .. } => Self::NotFound(error.to_string()),
			CE::Pending | CE::Unavailable(..) => Self::Unavailable(error.to_string()),
			CE::Status { .. } => Self::Other(error.into()),
			CE::Failure(inner) => Self::Other(inner),
		}
	}
}

impl From<PathRejection> for Error {
	fn from(value: PathRejection) -> Self {
		match value {
			PathRejection::FailedToDeserializePathParams(error) => Self::Invalid(error.body_text()),
			other => Self::Other(other.into()),
		}
	}
}

impl From<QueryRejection> for Error {
	fn from(value: QueryRejection) -> Self {
		match value {
			QueryRejection::FailedToDeserializeQueryString(error) => {
				Self::Invalid(error.body_text())
			}
			other => Self::Other(other.into()),
		}
	}
}

/// General purpose error response structure.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
	/// HTTP status code of the error. Will match the server response code.
	code: u16,

	/// Description of what went wrong.
	message: String,
}

impl Error {
	fn status_code(&self) -> StatusCode {
		match self {
			Self::NotFound(..) => StatusCode::NOT_FOUND,
			Self::Invalid(..) => StatusCode::BAD_REQUEST,
			Self::Unavailable(..) => StatusCode::SERVICE_UNAVAILABLE,
			Self::Other(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<Error> for ErrorResponse {
	fn from(value: Error) -> Self {
		Self {
			code: value.status_code().as_u16(),
			message: value.to_string(),
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> AxumResponse {
		// Log the full error for ISEs - we don't show this info anywhere else in case it contains something sensitive.
		if let Self::Other(ref error) = self {
			tracing::error!("{error:?}")
		}

		let status_code = self.status_code();
		(status_code, Json(ErrorResponse::from(self))).into_response()
	}
}

impl OperationOutput for Error {
	type Inner = ErrorResponse;
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod test {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn catalog_errors_map_to_status() {
		let cases = [
			(
				catalog::Error::NotFound {
					path: "id_dict.json".into(),
				},
				StatusCode::NOT_FOUND,
			),
			(catalog::Error::Pending, StatusCode::SERVICE_UNAVAILABLE),
			(
				catalog::Error::Unavailable("boom".into()),
				StatusCode::SERVICE_UNAVAILABLE,
			),
			(
				catalog::Error::Status {
					path: "id_dict.json".into(),
					status: StatusCode::BAD_GATEWAY,
				},
				StatusCode::INTERNAL_SERVER_ERROR,
			),
		];

		for (error, expected) in cases {
			assert_eq!(Error::from(error).status_code(), expected);
		}
	}

	#[test]
	fn response_body() {
		let response = ErrorResponse::from(Error::Invalid("unknown rarity \"9\"".into()));
		assert_eq!(
			serde_json::to_value(response).expect("serializable"),
			serde_json::json!({
				"code": 400,
				"message": "invalid request: unknown rarity \"9\"",
			})
		);
	}

	#[test]
	fn unavailable_message() {
		let error = Error::from(catalog::Error::Unavailable("id_dict.json not found".into()));
		assert_eq!(
			error.to_string(),
			"unavailable: catalog failed to load: id_dict.json not found"
		);
	}
}
