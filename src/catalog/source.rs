use std::{io, path::PathBuf};

use anyhow::Context;
use futures::{future::BoxFuture, FutureExt};
use reqwest::{header, Url};
use serde::Deserialize;

use super::error::{Error, Result};

/// Where the catalog documents are read from.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Config {
	Directory { path: PathBuf },
	Http { url: String },
}

/// A location that named catalog documents can be fetched from.
pub trait Source: Send + Sync {
	fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
}

pub fn from_config(config: Config) -> Result<Box<dyn Source>> {
	let source: Box<dyn Source> = match config {
		Config::Directory { path } => Box::new(DirectorySource::new(path)),
		Config::Http { url } => Box::new(HttpSource::new(&url)?),
	};
	Ok(source)
}

/// Documents stored on the local filesystem.
#[derive(Debug)]
pub struct DirectorySource {
	root: PathBuf,
}

impl DirectorySource {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	async fn read(&self, name: &str) -> Result<Vec<u8>> {
		let path = self.root.join(name);
		tracing::debug!(path = %path.display(), "reading catalog document");

		match tokio::fs::read(&path).await {
			Ok(bytes) => Ok(bytes),
			Err(error) if error.kind() == io::ErrorKind::NotFound => Err(Error::NotFound {
				path: path.display().to_string(),
			}),
			Err(error) => Err(anyhow::Error::new(error)
				.context(format!("failed to read {}", path.display()))
				.into()),
		}
	}
}

impl Source for DirectorySource {
	fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
		self.read(name).boxed()
	}
}

/// Documents served from a remote base URL.
#[derive(Debug)]
pub struct HttpSource {
	base: Url,
	client: reqwest::Client,
}

impl HttpSource {
	pub fn new(base: &str) -> Result<Self> {
		// Url::join replaces the final segment unless the base ends in a slash.
		let base = match base.ends_with('/') {
			true => base.to_string(),
			false => format!("{base}/"),
		};

		Ok(Self {
			base: Url::parse(&base).with_context(|| format!("invalid catalog url {base}"))?,
			client: reqwest::Client::new(),
		})
	}

	async fn download(&self, name: &str) -> Result<Vec<u8>> {
		let url = self
			.base
			.join(name)
			.with_context(|| format!("invalid document name {name}"))?;
		tracing::debug!(%url, "fetching catalog document");

		let response = self
			.client
			.get(url.clone())
			.header(header::CACHE_CONTROL, "no-cache")
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::Status {
				path: url.to_string(),
				status,
			});
		}

		Ok(response.bytes().await?.to_vec())
	}
}

impl Source for HttpSource {
	fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
		self.download(name).boxed()
	}
}
