#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{path} not found")]
	NotFound { path: String },

	#[error("{path} {status}")]
	Status {
		path: String,
		status: reqwest::StatusCode,
	},

	#[error("catalog is still loading")]
	Pending,

	#[error("catalog failed to load: {0}")]
	Unavailable(String),

	#[error(transparent)]
	Failure(#[from] anyhow::Error),
}

impl From<reqwest::Error> for Error {
	fn from(value: reqwest::Error) -> Self {
		Self::Failure(value.into())
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
