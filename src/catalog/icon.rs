use std::collections::HashMap;

use anyhow::Context;
use serde_json::{Map, Value};

use super::error::Result;

const ICON_DIRECTORY: &str = "gear_icon";
const ICON_SUFFIX: &str = "_icon.png";

/// Lookup from equipment name to icon identifier, and the public base path
/// icon images are served from.
#[derive(Debug, Clone, Default)]
pub struct IconIndex {
	base: String,
	icons: HashMap<String, String>,
}

impl IconIndex {
	pub fn new(base: &str, icons: HashMap<String, String>) -> Self {
		let base = match base.ends_with('/') {
			true => base.to_string(),
			false => format!("{base}/"),
		};

		Self { base, icons }
	}

	/// Decode the icon index document, a flat JSON object of name to id.
	/// Numeric ids are accepted; entries of any other shape are dropped.
	pub fn parse(base: &str, bytes: &[u8]) -> Result<Self> {
		let map = serde_json::from_slice::<Map<String, Value>>(bytes)
			.context("icon index document is not a JSON object")?;

		let icons = map
			.into_iter()
			.filter_map(|(name, id)| {
				let id = match id {
					Value::String(string) => string,
					Value::Number(number) => number.to_string(),
					_ => return None,
				};
				Some((name, id))
			})
			.collect();

		Ok(Self::new(base, icons))
	}

	pub fn len(&self) -> usize {
		self.icons.len()
	}

	pub fn is_empty(&self) -> bool {
		self.icons.is_empty()
	}

	pub fn id(&self, name: &str) -> Option<&str> {
		self.icons
			.get(name)
			.map(String::as_str)
			.filter(|id| !id.is_empty())
	}

	/// Image URL for the named equipment, or `None` if no icon is available.
	pub fn url(&self, name: &str) -> Option<String> {
		let id = self.id(name)?;
		Some(format!("{}{ICON_DIRECTORY}/{id}{ICON_SUFFIX}", self.base))
	}
}

#[cfg(test)]
mod test {
	use pretty_assertions::assert_eq;

	use super::*;

	fn index(base: &str) -> IconIndex {
		IconIndex::parse(
			base,
			r#"{"炎之劍": "1001", "冰之盾": 2002, "空": "", "壞": null}"#.as_bytes(),
		)
		.expect("index should parse")
	}

	#[test]
	fn url_from_base() {
		let icons = index("/lr_gear_selector/");
		assert_eq!(
			icons.url("炎之劍").as_deref(),
			Some("/lr_gear_selector/gear_icon/1001_icon.png")
		);
	}

	#[test]
	fn url_base_without_slash() {
		let icons = index("https://example.com/static");
		assert_eq!(
			icons.url("冰之盾").as_deref(),
			Some("https://example.com/static/gear_icon/2002_icon.png")
		);
	}

	#[test]
	fn missing_icon() {
		let icons = index("/");
		assert_eq!(icons.url("不存在"), None);
		assert_eq!(icons.url("空"), None);
		assert_eq!(icons.url("壞"), None);
		assert_eq!(icons.len(), 3);
	}

	#[test]
	fn parse_not_object() {
		assert!(IconIndex::parse("/", b"[]").is_err());
	}
}
