use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use maud::{html, Render};

use crate::catalog;

use super::base::BaseTemplate;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("not found: {0}")]
	NotFound(String),

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

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		if let Self::Other(ref error) = self {
			tracing::error!("{error:?}")
		}

		let status_code = match self {
			Self::NotFound(..) => StatusCode::NOT_FOUND,
			Self::Unavailable(..) => StatusCode::SERVICE_UNAVAILABLE,
			Self::Other(..) => StatusCode::INTERNAL_SERVER_ERROR,
		};

		let page = BaseTemplate {
			title: status_code.to_string(),
			content: html! {
				article {
					h2 { (status_code.to_string()) }
					p { (self.to_string()) }
					footer { a href="/" { "返回查詢" } }
				}
			},
		};

		(status_code, page.render()).into_response()
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
