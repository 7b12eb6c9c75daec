use std::sync::Arc;

use serde::Deserialize;
use tokio::{select, sync::watch};
use tokio_util::sync::CancellationToken;

use crate::query;

use super::{
	error::{Error, Result},
	icon::IconIndex,
	record::{parse_records, EquipmentRecord},
	source::{self, Source},
};

#[derive(Debug, Deserialize)]
pub struct Config {
	source: source::Config,
	#[serde(default)]
	documents: Documents,
	iconbase: String,
}

/// File names of the two documents that make up the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Documents {
	pub equipment: String,
	pub icons: String,
}

impl Default for Documents {
	fn default() -> Self {
		Self {
			equipment: "裝備資料庫.json".into(),
			icons: "id_dict.json".into(),
		}
	}
}

/// Load state of the catalog. Loading happens exactly once; a failure is final.
#[derive(Debug, Clone)]
pub enum Status {
	Pending,
	Ready(Arc<Dataset>),
	Failed(String),
}

/// The loaded, immutable catalog contents.
#[derive(Debug)]
pub struct Dataset {
	records: Vec<EquipmentRecord>,
	icons: IconIndex,
	basic_effect_keys: Vec<String>,
}

impl Dataset {
	pub fn new(records: Vec<EquipmentRecord>, icons: IconIndex) -> Self {
		let basic_effect_keys = query::basic_effect_key_universe(&records);
		Self {
			records,
			icons,
			basic_effect_keys,
		}
	}

	pub fn records(&self) -> &[EquipmentRecord] {
		&self.records
	}

	pub fn record(&self, index: usize) -> Option<&EquipmentRecord> {
		self.records.get(index)
	}

	pub fn icons(&self) -> &IconIndex {
		&self.icons
	}

	/// Every distinct basic effect key in the catalog, sorted.
	pub fn basic_effect_keys(&self) -> &[String] {
		&self.basic_effect_keys
	}
}

pub struct Catalog {
	source: Box<dyn Source>,
	documents: Documents,
	icon_base: String,

	channel: watch::Sender<Status>,
}

impl Catalog {
	pub fn new(config: Config) -> Result<Self> {
		let source = source::from_config(config.source)?;
		Ok(Self::with_source(source, config.documents, config.iconbase))
	}

	pub fn with_source(source: Box<dyn Source>, documents: Documents, icon_base: String) -> Self {
		let (sender, _receiver) = watch::channel(Status::Pending);

		Self {
			source,
			documents,
			icon_base,
			channel: sender,
		}
	}

	pub fn ready(&self) -> bool {
		matches!(*self.channel.borrow(), Status::Ready(_))
	}

	pub fn status(&self) -> Status {
		self.channel.borrow().clone()
	}

	/// Get the loaded dataset, failing if the catalog is not (or never will be) ready.
	pub fn dataset(&self) -> Result<Arc<Dataset>> {
		match self.status() {
			Status::Ready(dataset) => Ok(dataset),
			Status::Pending => Err(Error::Pending),
			Status::Failed(message) => Err(Error::Unavailable(message)),
		}
	}

	pub async fn start(&self, cancel: CancellationToken) -> Result<()> {
		select! {
			result = self.load() => self.complete(result),
			_ = cancel.cancelled() => {},
		}

		Ok(())
	}

	fn complete(&self, result: Result<Dataset>) {
		let status = match result {
			Ok(dataset) => {
				tracing::info!(
					records = dataset.records.len(),
					icons = dataset.icons.len(),
					basic_effects = dataset.basic_effect_keys.len(),
					"catalog loaded"
				);
				Status::Ready(Arc::new(dataset))
			}
			// There is no retry - the failure stays visible until restart.
			Err(error) => {
				tracing::error!(reason = %error, "catalog failed to load");
				Status::Failed(error.to_string())
			}
		};

		self.channel.send_replace(status);
	}

	async fn load(&self) -> Result<Dataset> {
		let equipment = self.source.fetch(&self.documents.equipment).await?;
		let icons = self.source.fetch(&self.documents.icons).await?;

		let records = parse_records(&equipment)?;
		let icons = IconIndex::parse(&self.icon_base, &icons)?;

		Ok(Dataset::new(records, icons))
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use figment::{
		providers::{Format, Toml},
		Figment,
	};
	use futures::{future::BoxFuture, FutureExt};
	use pretty_assertions::assert_eq;

	use super::*;

	struct MemorySource(HashMap<&'static str, &'static str>);

	impl Source for MemorySource {
		fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
			let result = self
				.0
				.get(name)
				.map(|document| document.as_bytes().to_vec())
				.ok_or_else(|| Error::NotFound { path: name.into() });
			futures::future::ready(result).boxed()
		}
	}

	fn catalog(documents: impl IntoIterator<Item = (&'static str, &'static str)>) -> Catalog {
		Catalog::with_source(
			Box::new(MemorySource(documents.into_iter().collect())),
			Documents::default(),
			"/".into(),
		)
	}

	const EQUIPMENT: &str = r#"[
		{ "裝備名稱": "炎之劍", "裝備星級": 5, "裝備種類": "武器", "基本效果": { "攻擊力": "+10" } },
		{ "裝備名稱": "冰之盾", "裝備星級": 3, "裝備種類": "防具", "基本效果": { "防禦力": 8, "攻擊力": 1 } }
	]"#;

	#[tokio::test]
	async fn load_ready() {
		let catalog = catalog([
			("裝備資料庫.json", EQUIPMENT),
			("id_dict.json", r#"{ "炎之劍": "1001" }"#),
		]);
		assert!(matches!(catalog.dataset(), Err(Error::Pending)));

		catalog
			.start(CancellationToken::new())
			.await
			.expect("start should not fail");

		assert!(catalog.ready());
		let dataset = catalog.dataset().expect("dataset should be ready");
		assert_eq!(dataset.records().len(), 2);
		assert_eq!(dataset.basic_effect_keys(), ["攻擊力", "防禦力"]);
		assert_eq!(
			dataset.icons().url("炎之劍").as_deref(),
			Some("/gear_icon/1001_icon.png")
		);
		assert_eq!(dataset.record(1).map(|record| record.name.as_str()), Some("冰之盾"));
	}

	#[tokio::test]
	async fn missing_icon_document_fails() {
		let catalog = catalog([("裝備資料庫.json", EQUIPMENT)]);

		catalog
			.start(CancellationToken::new())
			.await
			.expect("start should not fail");

		assert!(!catalog.ready());
		match catalog.dataset() {
			Err(Error::Unavailable(message)) => assert_eq!(message, "id_dict.json not found"),
			other => panic!("unexpected result {other:?}"),
		}
	}

	#[tokio::test]
	async fn malformed_equipment_fails() {
		let catalog = catalog([
			("裝備資料庫.json", r#"{ "not": "an array" }"#),
			("id_dict.json", "{}"),
		]);

		catalog
			.start(CancellationToken::new())
			.await
			.expect("start should not fail");

		assert!(matches!(catalog.status(), Status::Failed(_)));
	}

	#[tokio::test]
	async fn cancelled_start_is_not_ready() {
		let catalog = catalog([]);
		let cancel = CancellationToken::new();
		cancel.cancel();

		// Empty source, so whichever branch wins the catalog never becomes ready.
		catalog.start(cancel).await.expect("start should not fail");
		assert!(!catalog.ready());
	}

	#[test]
	fn config_default_documents() {
		let config = Figment::new()
			.merge(Toml::string(
				r#"
				iconbase = "/"
				source = { kind = "directory", path = "public" }
				"#,
			))
			.extract::<Config>()
			.expect("config should parse");

		assert_eq!(config.documents.equipment, "裝備資料庫.json");
		assert_eq!(config.documents.icons, "id_dict.json");
	}
}
